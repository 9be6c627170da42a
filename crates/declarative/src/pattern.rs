//! Title patterns - map a resource title onto key fields
//!
//! A type declares an ordered list of patterns. The first pattern that
//! matches the whole title wins, and its capture groups are bound, in
//! order, to the pattern's fields.

use crate::error::{Error, Result};
use crate::types::Value;
use indexmap::IndexMap;
use regex::Regex;

/// Conversion applied to a captured title segment.
pub type TransformFn = fn(&str) -> std::result::Result<Value, String>;

/// How a captured segment becomes a field value
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Keep the captured text
    Identity,
    /// Parse as an integer
    Integer,
    /// Lowercase the captured text
    Lowercase,
    /// Custom conversion
    Custom(TransformFn),
}

impl Transform {
    /// Apply the transform to a captured segment
    pub fn apply(&self, raw: &str) -> std::result::Result<Value, String> {
        match self {
            Self::Identity => Ok(Value::Str(raw.to_string())),
            Self::Integer => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| "expected an integer".to_string()),
            Self::Lowercase => Ok(Value::Str(raw.to_lowercase())),
            Self::Custom(f) => f(raw),
        }
    }
}

/// Why a title could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    /// No pattern matched the whole title
    #[error("title does not match any title pattern")]
    NoMatch,
    /// A capture could not be converted
    #[error("title field '{field}' cannot take '{value}': {reason}")]
    Transform {
        /// Field the capture is bound to
        field: String,
        /// Captured text
        value: String,
        /// Why the transform failed
        reason: String,
    },
}

/// One anchored title pattern with its field bindings
#[derive(Debug, Clone)]
pub struct TitlePattern {
    source: String,
    regex: Regex,
    fields: Vec<(String, Transform)>,
}

impl TitlePattern {
    /// Compile a pattern binding each capture group to a field.
    ///
    /// The pattern is always anchored at both ends; the number of capture
    /// groups must equal the number of fields.
    pub fn new(pattern: &str, fields: &[(&str, Transform)]) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let groups = regex.captures_len() - 1;
        if groups != fields.len() {
            return Err(Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!(
                    "{groups} capture groups but {} fields bound",
                    fields.len()
                ),
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
            fields: fields
                .iter()
                .map(|(name, transform)| ((*name).to_string(), *transform))
                .collect(),
        })
    }

    /// Compile a pattern whose captures are all kept as text
    pub fn fields(pattern: &str, names: &[&str]) -> Result<Self> {
        let fields: Vec<(&str, Transform)> =
            names.iter().map(|n| (*n, Transform::Identity)).collect();
        Self::new(pattern, &fields)
    }

    /// A pattern matching exactly one literal title and binding nothing
    pub fn literal(title: &str) -> Result<Self> {
        Self::new(&regex::escape(title), &[])
    }

    /// The pattern as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the bound fields, in capture order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Try this pattern against a title.
    ///
    /// Returns `None` when the pattern does not match. Capture groups that
    /// did not participate in the match bind the empty string.
    pub fn capture(
        &self,
        title: &str,
    ) -> Option<std::result::Result<IndexMap<String, Value>, TitleError>> {
        let caps = self.regex.captures(title)?;
        let mut bound = IndexMap::with_capacity(self.fields.len());
        for (i, (field, transform)) in self.fields.iter().enumerate() {
            let raw = caps.get(i + 1).map_or("", |m| m.as_str());
            match transform.apply(raw) {
                Ok(value) => {
                    bound.insert(field.clone(), value);
                }
                Err(reason) => {
                    return Some(Err(TitleError::Transform {
                        field: field.clone(),
                        value: raw.to_string(),
                        reason,
                    }));
                }
            }
        }
        Some(Ok(bound))
    }
}

/// Ordered list of title patterns; first match wins
#[derive(Debug, Clone, Default)]
pub struct TitlePatterns {
    patterns: Vec<TitlePattern>,
}

impl TitlePatterns {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pattern with the lowest precedence so far
    pub fn push(&mut self, pattern: TitlePattern) {
        self.patterns.push(pattern);
    }

    /// Iterate in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &TitlePattern> {
        self.patterns.iter()
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if no pattern is declared
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Resolve a title into field values using the first full match
    pub fn resolve(
        &self,
        title: &str,
    ) -> std::result::Result<IndexMap<String, Value>, TitleError> {
        for pattern in &self.patterns {
            if let Some(result) = pattern.capture(title) {
                log::trace!("title '{title}' matched pattern '{}'", pattern.source());
                return result;
            }
        }
        Err(TitleError::NoMatch)
    }
}

impl FromIterator<TitlePattern> for TitlePatterns {
    fn from_iter<I: IntoIterator<Item = TitlePattern>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor_af_patterns() -> TitlePatterns {
        [
            TitlePattern::fields(r"(\d+|\d+\.\d+)", &["asn"]).unwrap(),
            TitlePattern::fields(r"(\d+|\d+\.\d+) (\S+)", &["asn", "vrf"]).unwrap(),
            TitlePattern::fields(
                r"(\d+|\d+\.\d+) (\S+) (\S+) (\S+) (\S+)",
                &["asn", "vrf", "neighbor", "afi", "safi"],
            )
            .unwrap(),
            TitlePattern::fields(r"(\S+)", &["name"]).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_first_full_match_wins() {
        let patterns = neighbor_af_patterns();
        let keys = patterns.resolve("2 red 1.1.1.1 ipv4 unicast").unwrap();
        assert_eq!(keys.len(), 5);
        assert_eq!(keys["asn"], Value::from("2"));
        assert_eq!(keys["vrf"], Value::from("red"));
        assert_eq!(keys["safi"], Value::from("unicast"));

        let keys = patterns.resolve("55").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys["asn"], Value::from("55"));

        let keys = patterns.resolve("my-neighbor").unwrap();
        assert_eq!(keys["name"], Value::from("my-neighbor"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let patterns: TitlePatterns = [TitlePattern::fields(r"(\d+)", &["vlan"]).unwrap()]
            .into_iter()
            .collect();
        assert_eq!(patterns.resolve("100 extra"), Err(TitleError::NoMatch));
        assert_eq!(patterns.resolve("x100"), Err(TitleError::NoMatch));
        assert!(patterns.resolve("100").is_ok());
    }

    #[test]
    fn test_literal_pattern() {
        let patterns: TitlePatterns = [TitlePattern::literal("default").unwrap()]
            .into_iter()
            .collect();
        assert!(patterns.resolve("default").unwrap().is_empty());
        assert_eq!(patterns.resolve("other"), Err(TitleError::NoMatch));
    }

    #[test]
    fn test_transforms() {
        let pattern = TitlePattern::new(
            r"(\S+)\s+(\d+)",
            &[("interface", Transform::Lowercase), ("vni", Transform::Integer)],
        )
        .unwrap();
        let keys = pattern.capture("NVE1 5000").unwrap().unwrap();
        assert_eq!(keys["interface"], Value::from("nve1"));
        assert_eq!(keys["vni"], Value::Int(5000));
    }

    #[test]
    fn test_transform_failure() {
        let pattern = TitlePattern::new(r"(\d+)", &[("vlan", Transform::Integer)]).unwrap();
        let err = pattern.capture("99999999999999999999").unwrap().unwrap_err();
        assert!(matches!(err, TitleError::Transform { ref field, .. } if field == "vlan"));
    }

    #[test]
    fn test_optional_group_binds_empty() {
        let pattern = TitlePattern::fields(r"(\S+)(?:\s+(\S+))?", &["user", "engine_id"]).unwrap();
        let keys = pattern.capture("admin").unwrap().unwrap();
        assert_eq!(keys["engine_id"], Value::from(""));
    }

    #[test]
    fn test_capture_count_mismatch() {
        let err = TitlePattern::fields(r"(\S+) (\S+)", &["only_one"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        let err = TitlePattern::fields(r"(unclosed", &["x"]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
