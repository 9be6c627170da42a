//! Error types for resource construction and catalog assembly.
//!
//! Every error raised while turning a request into a canonical instance
//! names the offending resource as `type[title]`, and attribute errors also
//! name the attribute. Errors are grouped into categories so that callers can
//! decide how to present them.

use crate::types::ResourceRef;
use thiserror::Error;

/// Categories of errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The title could not be mapped to key fields
    Identity,
    /// A single attribute value was rejected
    Validation,
    /// Attribute values are individually valid but inconsistent together
    Consistency,
    /// The request does not fit the registered types or the catalog
    Catalog,
    /// A resource type definition is itself broken
    Definition,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "Resource identity could not be determined",
            Self::Validation => "Invalid attribute value",
            Self::Consistency => "Conflicting attribute values",
            Self::Catalog => "Invalid resource declaration",
            Self::Definition => "Broken resource type definition",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Identity => "Check the title format, or set the key fields explicitly",
            Self::Validation => "Use one of the accepted values for the attribute",
            Self::Consistency => "Review the related attributes together and remove the conflict",
            Self::Catalog => "Check the type name and make sure each resource is declared once",
            Self::Definition => "Fix the resource type definition; this is not a manifest problem",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A rejected attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A validator rejected the raw value
    #[error("invalid value '{value}' for '{property}': {reason}")]
    Validation {
        /// Attribute name
        property: String,
        /// The rejected value, as written
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The value passed validation but could not be normalized
    #[error("cannot normalize '{value}' for '{property}': {reason}")]
    Munge {
        /// Attribute name
        property: String,
        /// The value that failed to normalize
        value: String,
        /// Why normalization failed
        reason: String,
    },
}

impl PropertyError {
    /// Name of the attribute that rejected the value.
    pub fn property(&self) -> &str {
        match self {
            Self::Validation { property, .. } | Self::Munge { property, .. } => property,
        }
    }
}

/// Errors that can occur while defining types or building instances.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The title matched none of the type's title patterns
    #[error("{resource}: title does not match any title pattern")]
    NoMatch {
        /// The offending resource
        resource: ResourceRef,
    },

    /// A title pattern matched but a captured field could not be converted
    #[error("{resource}: title field '{field}' cannot take '{value}': {reason}")]
    TitleTransform {
        /// The offending resource
        resource: ResourceRef,
        /// Key field the capture was bound to
        field: String,
        /// Captured text
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// A key field is bound neither by the title nor explicitly
    #[error("{resource}: the '{field}' parameter must be set")]
    MissingKeyField {
        /// The offending resource
        resource: ResourceRef,
        /// The unbound key field
        field: String,
    },

    /// An attribute value failed validation or normalization
    #[error("{resource}: {source}")]
    Property {
        /// The offending resource
        resource: ResourceRef,
        /// The attribute failure
        source: PropertyError,
    },

    /// A resource-level rule rejected a combination of values
    #[error("{resource}: {message}")]
    CrossField {
        /// The offending resource
        resource: ResourceRef,
        /// Name of the rule that failed
        rule: String,
        /// Attributes involved in the violation
        properties: Vec<String>,
        /// Human-readable explanation
        message: String,
    },

    /// A supplied attribute is not declared by the type
    #[error("{resource}: unknown attribute '{name}'")]
    UnknownAttribute {
        /// The offending resource
        resource: ResourceRef,
        /// The undeclared attribute
        name: String,
    },

    /// `ensure = absent` was requested for a type that cannot be removed
    #[error("{resource}: type is not ensurable, it cannot be declared absent")]
    NotEnsurable {
        /// The offending resource
        resource: ResourceRef,
    },

    /// Several problems found while validating in batch mode
    #[error("{resource}: {} problems found", .errors.len())]
    Invalid {
        /// The offending resource
        resource: ResourceRef,
        /// Every problem found, in attribute declaration order
        errors: Vec<Error>,
    },

    /// No type with this name is registered
    #[error("unknown resource type '{type_name}'")]
    UnknownType {
        /// The requested type name
        type_name: String,
    },

    /// A type with this name was registered twice
    #[error("resource type '{type_name}' is already registered")]
    DuplicateType {
        /// The duplicated type name
        type_name: String,
    },

    /// Two declarations resolve to the same resource identity
    #[error("{resource}: duplicate declaration of '{identity}', already declared as {existing}")]
    DuplicateResource {
        /// The later declaration
        resource: ResourceRef,
        /// The earlier declaration
        existing: ResourceRef,
        /// The shared identity
        identity: String,
    },

    /// A type definition is inconsistent
    #[error("invalid definition of '{type_name}': {message}")]
    InvalidDefinition {
        /// The type being defined
        type_name: String,
        /// What is wrong with it
        message: String,
    },

    /// A title pattern or validator regex is malformed
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The worker pool for parallel compilation could not be created
    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoMatch { .. } | Self::TitleTransform { .. } | Self::MissingKeyField { .. } => {
                ErrorCategory::Identity
            }
            Self::Property { .. } | Self::UnknownAttribute { .. } => ErrorCategory::Validation,
            Self::CrossField { .. } => ErrorCategory::Consistency,
            Self::Invalid { errors, .. } => errors
                .first()
                .map_or(ErrorCategory::Validation, Self::category),
            Self::NotEnsurable { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateResource { .. }
            | Self::ThreadPool(_) => ErrorCategory::Catalog,
            Self::DuplicateType { .. }
            | Self::InvalidDefinition { .. }
            | Self::InvalidPattern { .. } => ErrorCategory::Definition,
        }
    }

    /// The resource this error is about, if any.
    pub fn resource(&self) -> Option<&ResourceRef> {
        match self {
            Self::NoMatch { resource }
            | Self::TitleTransform { resource, .. }
            | Self::MissingKeyField { resource, .. }
            | Self::Property { resource, .. }
            | Self::CrossField { resource, .. }
            | Self::UnknownAttribute { resource, .. }
            | Self::NotEnsurable { resource }
            | Self::Invalid { resource, .. }
            | Self::DuplicateResource { resource, .. } => Some(resource),
            _ => None,
        }
    }

    /// Attributes named by this error.
    pub fn attributes(&self) -> Vec<&str> {
        match self {
            Self::TitleTransform { field, .. } | Self::MissingKeyField { field, .. } => {
                vec![field.as_str()]
            }
            Self::Property { source, .. } => vec![source.property()],
            Self::CrossField { properties, .. } => properties.iter().map(String::as_str).collect(),
            Self::UnknownAttribute { name, .. } => vec![name.as_str()],
            Self::Invalid { errors, .. } => errors.iter().flat_map(Self::attributes).collect(),
            _ => Vec::new(),
        }
    }

    /// The individual problems behind this error.
    ///
    /// Batch errors are flattened; any other error yields itself.
    pub fn problems(&self) -> Vec<&Error> {
        match self {
            Self::Invalid { errors, .. } => errors.iter().flat_map(Self::problems).collect(),
            other => vec![other],
        }
    }
}

/// Result type for declarative operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn vlan(title: &str) -> ResourceRef {
        ResourceRef::new("cisco_vlan", title)
    }

    #[test]
    fn test_error_names_resource() {
        let err = Error::NoMatch {
            resource: vlan("abc"),
        };
        assert_eq!(
            err.to_string(),
            "cisco_vlan[abc]: title does not match any title pattern"
        );
        assert_eq!(err.resource(), Some(&vlan("abc")));
    }

    #[test]
    fn test_property_error_names_attribute() {
        let err = Error::Property {
            resource: vlan("100"),
            source: PropertyError::Validation {
                property: "state".into(),
                value: "up".into(),
                reason: "expected one of: active, suspend, default".into(),
            },
        };
        assert!(err.to_string().contains("cisco_vlan[100]"));
        assert!(err.to_string().contains("'state'"));
        assert_eq!(err.attributes(), vec!["state"]);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_categories() {
        let missing = Error::MissingKeyField {
            resource: vlan("x"),
            field: "vlan".into(),
        };
        assert_eq!(missing.category(), ErrorCategory::Identity);

        let rule = Error::CrossField {
            resource: vlan("x"),
            rule: "mutually_exclusive".into(),
            properties: vec!["a".into(), "b".into()],
            message: "nope".into(),
        };
        assert_eq!(rule.category(), ErrorCategory::Consistency);
        assert_eq!(rule.attributes(), vec!["a", "b"]);

        let dup = Error::DuplicateType {
            type_name: "cisco_vlan".into(),
        };
        assert_eq!(dup.category(), ErrorCategory::Definition);
        assert!(dup.resource().is_none());
    }

    #[test]
    fn test_batch_error_flattens() {
        let err = Error::Invalid {
            resource: vlan("100"),
            errors: vec![
                Error::UnknownAttribute {
                    resource: vlan("100"),
                    name: "colour".into(),
                },
                Error::MissingKeyField {
                    resource: vlan("100"),
                    field: "vlan".into(),
                },
            ],
        };
        assert_eq!(err.to_string(), "cisco_vlan[100]: 2 problems found");
        assert_eq!(err.problems().len(), 2);
        assert_eq!(err.attributes(), vec!["colour", "vlan"]);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_category_advice_nonempty() {
        for category in [
            ErrorCategory::Identity,
            ErrorCategory::Validation,
            ErrorCategory::Consistency,
            ErrorCategory::Catalog,
            ErrorCategory::Definition,
        ] {
            assert!(!category.advice().is_empty());
            assert_eq!(category.to_string(), category.description());
        }
    }
}
