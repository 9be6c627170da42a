//! Standard normalizers
//!
//! Each function has the shape expected by
//! [`PropertyDescriptor::munge`](crate::PropertyDescriptor::munge) and is
//! idempotent: applying it to its own output changes nothing. Every
//! normalizer checks for the `default` sentinel before parsing.

use crate::range;
use crate::types::Value;
use std::net::IpAddr;

/// Result of a normalizer
pub type MungeResult = Result<Value, String>;

/// Turn the text `default` into the sentinel; leave anything else alone
pub fn default_keyword(value: Value) -> MungeResult {
    if value.is_default_literal() {
        Ok(Value::Default)
    } else {
        Ok(value)
    }
}

/// Parse an integer
pub fn integer(value: Value) -> MungeResult {
    match value {
        Value::Int(n) => Ok(Value::Int(n)),
        Value::Str(ref s) => s
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|_| "expected an integer".to_string()),
        other => Err(format!("expected an integer, got '{other}'")),
    }
}

/// Parse an integer or the `default` sentinel
pub fn integer_or_default(value: Value) -> MungeResult {
    match default_keyword(value)? {
        Value::Default => Ok(Value::Default),
        other => integer(other),
    }
}

/// Stringify a scalar or keep the `default` sentinel
pub fn string_or_default(value: Value) -> MungeResult {
    match default_keyword(value)? {
        Value::Default => Ok(Value::Default),
        Value::Str(s) | Value::Keyword(s) => Ok(Value::Str(s)),
        Value::Int(n) => Ok(Value::Str(n.to_string())),
        Value::Bool(b) => Ok(Value::Str(b.to_string())),
        Value::List(_) => Err("expected a single value, got a list".to_string()),
    }
}

/// Lowercase text or keep the `default` sentinel
pub fn lowercase_or_default(value: Value) -> MungeResult {
    map_text(value, str::to_lowercase)
}

/// Lowercase text with whitespace removed, or keep the `default` sentinel
pub fn compact_lowercase_or_default(value: Value) -> MungeResult {
    map_text(value, |s| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
    })
}

/// Split text into a list of words, or keep the `default` sentinel
pub fn words_or_default(value: Value) -> MungeResult {
    match string_or_default(value)? {
        Value::Str(s) => Ok(Value::list(s.split_whitespace())),
        other => Ok(other),
    }
}

/// Canonicalize a range list such as `2-5,3,7`, or keep the `default` sentinel
pub fn range_summary_or_default(value: Value) -> MungeResult {
    match string_or_default(value)? {
        Value::Str(s) => {
            let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
            range::summarize(&compact).map(Value::Str)
        }
        other => Ok(other),
    }
}

/// Canonicalize an address, masking host bits when a prefix length is given.
///
/// `10.1.1.5/24` becomes `10.1.1.0/24`; a bare address is kept as written
/// in its canonical text form.
pub fn network_address(value: Value) -> MungeResult {
    let text = match string_or_default(value)? {
        Value::Str(s) => s,
        other => return Ok(other),
    };

    let (address, prefix) = match text.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (text.as_str(), None),
    };
    let address: IpAddr = address
        .trim()
        .parse()
        .map_err(|_| format!("'{text}' is not an IP address"))?;

    let Some(prefix) = prefix else {
        return Ok(Value::Str(address.to_string()));
    };
    let bits: u32 = prefix
        .trim()
        .parse()
        .map_err(|_| format!("invalid prefix length in '{text}'"))?;

    let network = match address {
        IpAddr::V4(v4) => {
            if bits > 32 {
                return Err(format!("prefix length {bits} out of range"));
            }
            let mask = u32::MAX.checked_shl(32 - bits).unwrap_or(0);
            IpAddr::from((u32::from(v4) & mask).to_be_bytes())
        }
        IpAddr::V6(v6) => {
            if bits > 128 {
                return Err(format!("prefix length {bits} out of range"));
            }
            let mask = u128::MAX.checked_shl(128 - bits).unwrap_or(0);
            IpAddr::from((u128::from(v6) & mask).to_be_bytes())
        }
    };
    Ok(Value::Str(format!("{network}/{bits}")))
}

/// Convert a BGP AS number to ASPLAIN.
///
/// ASDOT `1.5` becomes `65541`; ASPLAIN numbers pass through.
pub fn asplain(value: Value) -> MungeResult {
    let text = match value {
        Value::Int(n) => return Ok(Value::Int(n)),
        Value::Str(s) => s,
        other => return Err(format!("'{other}' is not an AS number")),
    };
    let text = text.trim();

    let number = match text.split_once('.') {
        Some((high, low)) => {
            let high: i64 = high.parse().map_err(|_| format!("'{text}' is not an AS number"))?;
            let low: i64 = low.parse().map_err(|_| format!("'{text}' is not an AS number"))?;
            ((high & 0xFFFF) << 16) + (low & 0xFFFF)
        }
        None => text
            .parse()
            .map_err(|_| format!("'{text}' is not an AS number"))?,
    };
    Ok(Value::Int(number))
}

fn map_text(value: Value, f: impl Fn(&str) -> String) -> MungeResult {
    match string_or_default(value)? {
        Value::Str(s) => Ok(Value::Str(f(&s))),
        other => Ok(other),
    }
}
