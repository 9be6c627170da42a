//! Standard validators
//!
//! Validators see the raw value before munging. All of them accept the
//! `default` sentinel (either as text or as the sentinel itself) so that a
//! munge can convert it afterwards.

use crate::error::{Error, Result};
use crate::types::Value;
use regex::Regex;
use std::net::IpAddr;
use std::sync::Arc;

/// Shared validator function
pub type ValidateFn = Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>;

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Accept scalars whose literal text matches `pattern`
pub fn matches(pattern: &str) -> Result<ValidateFn> {
    let regex = compile(pattern)?;
    Ok(Arc::new(move |value: &Value| {
        if value.is_default_literal() {
            return Ok(());
        }
        match value.literal_text() {
            Some(text) if regex.is_match(&text) => Ok(()),
            Some(_) => Err(format!("does not match /{}/", regex.as_str())),
            None => Err("expected a single value".to_string()),
        }
    }))
}

/// Accept integers (or integer text) in `low..=high`
pub fn integer_in(low: i64, high: i64) -> ValidateFn {
    Arc::new(move |value: &Value| -> std::result::Result<(), String> {
        if value.is_default_literal() {
            return Ok(());
        }
        let n = match value {
            Value::Int(n) => *n,
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| "expected an integer".to_string())?,
            _ => return Err("expected an integer".to_string()),
        };
        if (low..=high).contains(&n) {
            Ok(())
        } else {
            Err(format!("must be between {low} and {high}"))
        }
    })
}

/// Accept text only
pub fn string() -> ValidateFn {
    Arc::new(|value: &Value| match value {
        Value::Str(_) | Value::Default => Ok(()),
        _ => Err("expected a string".to_string()),
    })
}

/// Accept text whose space-separated words all match `pattern`
pub fn each_word(pattern: &str, what: &str) -> Result<ValidateFn> {
    let regex = compile(pattern)?;
    let what = what.to_string();
    Ok(Arc::new(move |value: &Value| {
        if value.is_default_literal() {
            return Ok(());
        }
        let Some(text) = value.literal_text() else {
            return Err("expected a single value".to_string());
        };
        match text.split_whitespace().find(|word| !regex.is_match(word)) {
            Some(word) => Err(format!("'{word}' is not a valid {what}")),
            None => Ok(()),
        }
    }))
}

/// Accept an IPv4 or IPv6 address, with an optional `/prefix`
pub fn ip_address() -> ValidateFn {
    Arc::new(|value: &Value| -> std::result::Result<(), String> {
        if value.is_default_literal() {
            return Ok(());
        }
        let Some(text) = value.as_str() else {
            return Err("expected an IP address".to_string());
        };
        let (address, prefix) = match text.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (text, None),
        };
        let address: IpAddr = address
            .parse()
            .map_err(|_| "expected an IP address".to_string())?;
        if let Some(prefix) = prefix {
            let max = if address.is_ipv4() { 32 } else { 128 };
            match prefix.parse::<u8>() {
                Ok(bits) if bits <= max => {}
                _ => return Err(format!("invalid prefix length '{prefix}'")),
            }
        }
        Ok(())
    })
}

/// Accept one of the listed texts, case-sensitively
pub fn one_of(choices: &[&str]) -> ValidateFn {
    let choices: Vec<String> = choices.iter().map(|c| (*c).to_string()).collect();
    Arc::new(move |value: &Value| {
        match value.literal_text() {
            Some(text) if choices.contains(&text) => Ok(()),
            _ => Err(format!("expected one of: {}", choices.join(", "))),
        }
    })
}
