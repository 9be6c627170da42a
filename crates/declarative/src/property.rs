//! Property descriptors - validation, normalization and comparison of one attribute

use crate::error::PropertyError;
use crate::insync::Comparison;
use crate::types::Value;
use crate::validate::ValidateFn;
use std::fmt;
use std::sync::Arc;

/// Shared normalizer function
pub type MungeFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Whether an attribute is compared against the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Identity or behaviour switch; never compared
    Parameter,
    /// Managed state; compared for idempotence
    Property,
}

/// Whether an attribute holds one value or a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// A single value
    Scalar,
    /// A list of values; a lone scalar is wrapped
    List,
}

/// Declaration of one attribute of a resource type
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    doc: String,
    kind: AttributeKind,
    cardinality: Cardinality,
    literals: Vec<String>,
    validators: Vec<ValidateFn>,
    munge: Option<MungeFn>,
    comparison: Option<Comparison>,
    default: Option<Value>,
    device_default: Option<Value>,
    deprecated: Option<String>,
}

impl PropertyDescriptor {
    fn new(name: &str, kind: AttributeKind) -> Self {
        Self {
            name: name.to_string(),
            doc: String::new(),
            kind,
            cardinality: Cardinality::Scalar,
            literals: Vec::new(),
            validators: Vec::new(),
            munge: None,
            comparison: None,
            default: None,
            device_default: None,
            deprecated: None,
        }
    }

    /// Declare a managed property
    pub fn property(name: &str) -> Self {
        Self::new(name, AttributeKind::Property)
    }

    /// Declare a parameter
    pub fn parameter(name: &str) -> Self {
        Self::new(name, AttributeKind::Parameter)
    }

    /// Set the documentation string
    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    /// Accept these literal values verbatim.
    ///
    /// `true`/`false` become booleans, `default` the sentinel, anything else a
    /// keyword. Without validators, only these literals are accepted.
    pub fn literals(mut self, literals: &[&str]) -> Self {
        self.literals = literals.iter().map(|l| (*l).to_string()).collect();
        self
    }

    /// Add a validator
    pub fn validate(
        mut self,
        f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(f));
        self
    }

    /// Add a shared validator
    pub fn validator(mut self, validator: ValidateFn) -> Self {
        self.validators.push(validator);
        self
    }

    /// Set the normalizer; it must be idempotent
    pub fn munge(mut self, f: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        self.munge = Some(Arc::new(f));
        self
    }

    /// Hold a list of values
    pub fn array(mut self) -> Self {
        self.cardinality = Cardinality::List;
        self
    }

    /// Override the comparison strategy
    pub fn comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    /// Value used when neither the title nor the request supplies one
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value the device reports when this attribute is at its default.
    ///
    /// A desired `default` is in sync with a live value equal to this.
    pub fn device_default(mut self, value: impl Into<Value>) -> Self {
        self.device_default = Some(value.into());
        self
    }

    /// Mark as deprecated; supplying it logs a warning
    pub fn deprecated(mut self, note: &str) -> Self {
        self.deprecated = Some(note.to_string());
        self
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string
    pub fn doc_str(&self) -> &str {
        &self.doc
    }

    /// Parameter or property
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Check if this is a parameter
    pub fn is_parameter(&self) -> bool {
        self.kind == AttributeKind::Parameter
    }

    /// Check if this is a managed property
    pub fn is_property(&self) -> bool {
        self.kind == AttributeKind::Property
    }

    /// Scalar or list
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Check if this attribute holds a list
    pub fn is_list(&self) -> bool {
        self.cardinality == Cardinality::List
    }

    /// Accepted literals
    pub fn allowed_literals(&self) -> &[String] {
        &self.literals
    }

    /// Default applied when the attribute is not supplied
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Value the device reports at its default
    pub fn device_default_value(&self) -> Option<&Value> {
        self.device_default.as_ref()
    }

    /// Deprecation note
    pub fn deprecation(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// Effective comparison strategy
    pub fn comparison_strategy(&self) -> Comparison {
        match (&self.comparison, self.cardinality) {
            (Some(c), _) => c.clone(),
            (None, Cardinality::Scalar) => Comparison::Exact,
            (None, Cardinality::List) => Comparison::Unordered,
        }
    }

    /// Validate and normalize a raw value into its canonical form
    pub fn process(&self, raw: Value) -> Result<Value, PropertyError> {
        match self.cardinality {
            Cardinality::Scalar => self.process_scalar(raw),
            Cardinality::List => {
                let items = match raw {
                    Value::List(items) => items,
                    other => vec![other],
                };
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let was_list = item.is_list();
                    match self.process_scalar(item)? {
                        Value::List(words) if !was_list => out.extend(words),
                        other => out.push(other),
                    }
                }
                Ok(collapse_default(out))
            }
        }
    }

    fn process_scalar(&self, raw: Value) -> Result<Value, PropertyError> {
        if let Some(literal) = self.literal_match(&raw) {
            return Ok(literal);
        }

        if !self.literals.is_empty() && self.validators.is_empty() {
            return Err(PropertyError::Validation {
                property: self.name.clone(),
                value: raw.to_string(),
                reason: format!("expected one of: {}", self.literals.join(", ")),
            });
        }

        for validator in &self.validators {
            validator(&raw).map_err(|reason| PropertyError::Validation {
                property: self.name.clone(),
                value: raw.to_string(),
                reason,
            })?;
        }

        match &self.munge {
            Some(munge) => {
                let shown = raw.to_string();
                munge(raw).map_err(|reason| PropertyError::Munge {
                    property: self.name.clone(),
                    value: shown,
                    reason,
                })
            }
            None => Ok(raw),
        }
    }

    fn literal_match(&self, raw: &Value) -> Option<Value> {
        let text = raw.literal_text()?;
        self.literals
            .iter()
            .any(|l| *l == text)
            .then(|| Value::from_literal(&text))
    }

    /// Bring a live value into canonical form without validating it.
    ///
    /// Values the normalizer rejects are kept as reported.
    pub fn normalize(&self, live: &Value) -> Value {
        match (self.cardinality, live) {
            (Cardinality::List, Value::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match self.normalize_scalar(item) {
                        Value::List(words) if !item.is_list() => out.extend(words),
                        other => out.push(other),
                    }
                }
                collapse_default(out)
            }
            _ => self.normalize_scalar(live),
        }
    }

    fn normalize_scalar(&self, live: &Value) -> Value {
        if let Some(literal) = self.literal_match(live) {
            return literal;
        }
        match &self.munge {
            Some(munge) => munge(live.clone()).unwrap_or_else(|_| live.clone()),
            None => live.clone(),
        }
    }

    /// Check whether a live value satisfies a canonical desired value
    pub fn in_sync(&self, live: &Value, desired: &Value) -> bool {
        let live = self.normalize(live);
        if desired.is_default()
            && let Some(device_default) = &self.device_default
            && (live == *device_default || live == self.normalize(device_default))
        {
            return true;
        }
        self.comparison_strategy().matches(&live, desired)
    }
}

/// A list holding only the sentinel means the whole attribute resets
fn collapse_default(items: Vec<Value>) -> Value {
    if items.len() == 1 && items[0].is_default() {
        Value::Default
    } else {
        Value::List(items)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("cardinality", &self.cardinality)
            .field("literals", &self.literals)
            .field("validators", &self.validators.len())
            .field("munge", &self.munge.is_some())
            .field("comparison", &self.comparison_strategy())
            .field("default", &self.default)
            .finish()
    }
}
