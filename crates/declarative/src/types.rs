//! Core types for declarative resources

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal text of the reset-to-device-default sentinel.
pub const DEFAULT_LITERAL: &str = "default";

/// An attribute value.
///
/// Raw input only ever produces `Bool`, `Int`, `Str`, `List` and (from a
/// JSON `null`) `Default`. `Keyword` and `Default` are the canonical forms
/// produced by literal matching and munging.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Free-form text
    Str(String),
    /// Ordered sequence (element order is not significant for unordered comparisons)
    List(Vec<Value>),
    /// Reset to the device's default value
    Default,
    /// Symbolic literal such as `mst` or `rapid-pvst`
    Keyword(String),
}

impl Value {
    /// Build a list value from anything convertible to values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Canonical value for a matched literal.
    pub fn from_literal(text: &str) -> Self {
        match text {
            DEFAULT_LITERAL => Self::Default,
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            other => Self::Keyword(other.to_string()),
        }
    }

    /// Literal text of a scalar, `None` for lists.
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Str(s) | Self::Keyword(s) => Some(s.clone()),
            Self::Default => Some(DEFAULT_LITERAL.to_string()),
            Self::List(_) => None,
        }
    }

    /// Text of a string or keyword.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is the device-default sentinel
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Check if this is the sentinel or its literal text
    pub fn is_default_literal(&self) -> bool {
        self.is_default() || self.as_str() == Some(DEFAULT_LITERAL)
    }

    /// Check if this is `true`
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) | Self::Keyword(s) => write!(f, "{s}"),
            Self::Default => write!(f, "{DEFAULT_LITERAL}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

/// Whether a resource should exist on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    /// Resource should be configured
    #[default]
    Present,
    /// Resource should be removed
    Absent,
}

impl Ensure {
    /// Check if state represents presence
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    /// Check if state represents absence
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

/// A `type[title]` reference to a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Title as declared
    pub title: String,
}

impl ResourceRef {
    /// Create a new reference
    pub fn new(type_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.type_name, self.title)
    }
}

/// A request to build one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Resource type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Title, parsed by the type's title patterns
    pub title: String,
    /// Desired existence; unspecified means present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensure: Option<Ensure>,
    /// Explicitly supplied attribute values, in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl ResourceRequest {
    /// Create a request with no explicit attributes
    pub fn new(type_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            title: title.into(),
            ensure: None,
            properties: IndexMap::new(),
        }
    }

    /// Set an attribute value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set the desired existence
    pub fn ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = Some(ensure);
        self
    }

    /// Reference to the requested resource
    pub fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(&self.type_name, &self.title)
    }
}

/// How attribute errors are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop at the first error
    #[default]
    FailFast,
    /// Collect every attribute error before failing
    Batch,
}

/// Options for compiling a set of requests
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Error reporting mode
    pub mode: ValidationMode,
    /// Number of parallel build jobs
    pub jobs: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: ValidationMode::FailFast,
            jobs: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_round_trip() {
        assert_eq!(Value::from_literal("default"), Value::Default);
        assert_eq!(Value::from_literal("true"), Value::Bool(true));
        assert_eq!(Value::from_literal("mst"), Value::Keyword("mst".into()));
        assert_eq!(Value::Default.literal_text().as_deref(), Some("default"));
        assert_eq!(Value::Int(7).literal_text().as_deref(), Some("7"));
        assert!(Value::list(["a"]).literal_text().is_none());
    }

    #[test]
    fn test_default_literal_detection() {
        assert!(Value::Default.is_default_literal());
        assert!(Value::from("default").is_default_literal());
        assert!(!Value::from("DEFAULT").is_default_literal());
        assert!(!Value::from("default").is_default());
    }

    #[test]
    fn test_display() {
        let v = Value::list(vec![Value::from("a"), Value::Int(2), Value::Default]);
        assert_eq!(v.to_string(), "[a, 2, default]");
        assert_eq!(ResourceRef::new("cisco_vlan", "100").to_string(), "cisco_vlan[100]");
    }

    #[test]
    fn test_json_deserialize() {
        let v: Value = serde_json::from_str(r#"["a", 1, true, null]"#).unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Str("a".into()),
                Value::Int(1),
                Value::Bool(true),
                Value::Default,
            ])
        );

        // The text "default" is not the sentinel until munged
        let v: Value = serde_json::from_str(r#""default""#).unwrap();
        assert_eq!(v, Value::Str("default".into()));
    }

    #[test]
    fn test_request_deserialize() {
        let req: ResourceRequest = serde_json::from_str(
            r#"{"type": "cisco_vlan", "title": "100", "properties": {"vlan_name": "red"}}"#,
        )
        .unwrap();
        assert_eq!(req.type_name, "cisco_vlan");
        assert!(req.ensure.is_none());
        assert_eq!(req.properties["vlan_name"], Value::from("red"));
    }

    #[test]
    fn test_ensure_serde() {
        let e: Ensure = serde_json::from_str(r#""absent""#).unwrap();
        assert!(e.is_absent());
        assert_eq!(Ensure::default(), Ensure::Present);
    }
}
