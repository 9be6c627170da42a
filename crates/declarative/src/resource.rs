//! Resource descriptors - the declarative definition of a resource type
//!
//! A descriptor names the type, its key fields (which together identify an
//! instance), its title patterns, its attributes, its cross-field rules and
//! the resources it implicitly depends on.
//!
//! # Example
//!
//! ```
//! use declarative::{munge, PropertyDescriptor, ResourceDescriptor, TitlePattern, Transform};
//!
//! let vlan = ResourceDescriptor::builder("cisco_vlan")
//!     .key("vlan")
//!     .pattern(TitlePattern::new(r"(\d+)", &[("vlan", Transform::Integer)]).unwrap())
//!     .attribute(PropertyDescriptor::parameter("vlan").munge(munge::integer))
//!     .attribute(PropertyDescriptor::property("vlan_name").munge(munge::string_or_default))
//!     .ensurable()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(vlan.key_fields(), ["vlan"]);
//! ```

use crate::error::{Error, Result};
use crate::instance::ResourceInstance;
use crate::pattern::{TitlePattern, TitlePatterns};
use crate::property::PropertyDescriptor;
use crate::rules::Rule;
use crate::types::{Ensure, ValidationMode, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Shared function listing the titles an instance refers to
pub type TitlesFn = Arc<dyn Fn(&ResourceInstance) -> Vec<String> + Send + Sync>;

/// An implicit dependency on resources of another type
#[derive(Clone)]
pub struct Autorequire {
    target: String,
    titles: TitlesFn,
}

impl Autorequire {
    /// Depend on whatever titles `f` returns
    pub fn new(
        target: &str,
        f: impl Fn(&ResourceInstance) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            target: target.to_string(),
            titles: Arc::new(f),
        }
    }

    /// Always depend on one fixed title
    pub fn fixed(target: &str, title: &str) -> Self {
        let title = title.to_string();
        Self::new(target, move |_| vec![title.clone()])
    }

    /// Depend on the title(s) held by an attribute
    pub fn from_field(target: &str, field: &str) -> Self {
        let field = field.to_string();
        Self::new(target, move |instance| match instance.get(&field) {
            Some(Value::List(items)) => items
                .iter()
                .filter(|v| !v.is_default())
                .map(ToString::to_string)
                .collect(),
            Some(Value::Default) | None => Vec::new(),
            Some(value) => vec![value.to_string()],
        })
    }

    /// Target resource type
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Titles referenced by an instance
    pub fn titles(&self, instance: &ResourceInstance) -> Vec<String> {
        (self.titles)(instance)
    }
}

impl fmt::Debug for Autorequire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autorequire")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Declarative definition of a resource type
#[derive(Clone)]
pub struct ResourceDescriptor {
    name: String,
    doc: String,
    key_fields: Vec<String>,
    patterns: TitlePatterns,
    attributes: IndexMap<String, PropertyDescriptor>,
    rules: Vec<Rule>,
    autorequires: Vec<Autorequire>,
    ensurable: bool,
}

impl ResourceDescriptor {
    /// Start defining a type
    pub fn builder(name: &str) -> ResourceBuilder {
        ResourceBuilder {
            name: name.to_string(),
            doc: String::new(),
            key_fields: Vec::new(),
            patterns: Vec::new(),
            attributes: IndexMap::new(),
            duplicates: Vec::new(),
            rules: Vec::new(),
            autorequires: Vec::new(),
            ensurable: false,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation string
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Key fields, in identity order
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Check if a field is part of the identity
    pub fn is_key(&self, name: &str) -> bool {
        self.key_fields.iter().any(|k| k == name)
    }

    /// Title patterns, in precedence order
    pub fn patterns(&self) -> &TitlePatterns {
        &self.patterns
    }

    /// Look up an attribute
    pub fn attribute(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.attributes.get(name)
    }

    /// All attributes, in declaration order
    pub fn attributes(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.attributes.values()
    }

    /// Managed properties, in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.attributes().filter(|a| a.is_property())
    }

    /// Parameters, in declaration order
    pub fn parameters(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.attributes().filter(|a| a.is_parameter())
    }

    /// Cross-field rules, in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Implicit dependencies
    pub fn autorequires(&self) -> &[Autorequire] {
        &self.autorequires
    }

    /// Check if instances can be declared absent
    pub fn is_ensurable(&self) -> bool {
        self.ensurable
    }

    /// Check if the type has exactly one instance
    pub fn is_singleton(&self) -> bool {
        self.key_fields.is_empty()
    }

    /// Build a canonical instance
    pub fn instance(
        &self,
        title: &str,
        supplied: &IndexMap<String, Value>,
        ensure: Option<Ensure>,
        mode: ValidationMode,
    ) -> Result<ResourceInstance> {
        ResourceInstance::build(self, title, supplied, ensure, mode)
    }

    /// Identity a title resolves to, without building a full instance.
    ///
    /// Key fields come from the title and attribute defaults and are
    /// normalized the way live values are.
    pub fn identity_of(&self, title: &str) -> Result<String> {
        crate::instance::identity_of(self, title)
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.name)
            .field("key_fields", &self.key_fields)
            .field("patterns", &self.patterns.len())
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("rules", &self.rules)
            .field("ensurable", &self.ensurable)
            .finish()
    }
}

/// Builder for [`ResourceDescriptor`]
pub struct ResourceBuilder {
    name: String,
    doc: String,
    key_fields: Vec<String>,
    patterns: Vec<TitlePattern>,
    attributes: IndexMap<String, PropertyDescriptor>,
    duplicates: Vec<String>,
    rules: Vec<Rule>,
    autorequires: Vec<Autorequire>,
    ensurable: bool,
}

impl ResourceBuilder {
    /// Set the documentation string
    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    /// Add a key field; it must also be declared as a parameter
    pub fn key(mut self, name: &str) -> Self {
        self.key_fields.push(name.to_string());
        self
    }

    /// Add a title pattern with the lowest precedence so far
    pub fn pattern(mut self, pattern: TitlePattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Declare an attribute
    pub fn attribute(mut self, attribute: PropertyDescriptor) -> Self {
        let name = attribute.name().to_string();
        if self.attributes.insert(name.clone(), attribute).is_some() {
            self.duplicates.push(name);
        }
        self
    }

    /// Add a cross-field rule
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add an implicit dependency
    pub fn autorequire(mut self, autorequire: Autorequire) -> Self {
        self.autorequires.push(autorequire);
        self
    }

    /// Allow instances to be declared absent
    pub fn ensurable(mut self) -> Self {
        self.ensurable = true;
        self
    }

    /// Check the definition and build the descriptor
    pub fn build(self) -> Result<ResourceDescriptor> {
        let invalid = |message: String| Error::InvalidDefinition {
            type_name: self.name.clone(),
            message,
        };

        if let Some(name) = self.duplicates.first() {
            return Err(invalid(format!("attribute '{name}' declared twice")));
        }

        for key in &self.key_fields {
            match self.attributes.get(key) {
                Some(attr) if attr.is_parameter() => {}
                Some(_) => return Err(invalid(format!("key field '{key}' must be a parameter"))),
                None => return Err(invalid(format!("key field '{key}' is not declared"))),
            }
        }

        let mut patterns: TitlePatterns = self.patterns.iter().cloned().collect();
        if patterns.is_empty() {
            match self.key_fields.as_slice() {
                [only] => patterns.push(TitlePattern::fields(r"(\S+)", &[only.as_str()])?),
                _ => {
                    return Err(invalid(
                        "types without exactly one key field must declare title patterns".into(),
                    ));
                }
            }
        }

        for pattern in patterns.iter() {
            if let Some(field) = pattern
                .field_names()
                .find(|f| !self.attributes.get(*f).is_some_and(PropertyDescriptor::is_parameter))
            {
                return Err(invalid(format!(
                    "title pattern '{}' binds '{field}', which is not a declared parameter",
                    pattern.source()
                )));
            }
        }

        Ok(ResourceDescriptor {
            name: self.name.clone(),
            doc: self.doc.clone(),
            key_fields: self.key_fields.clone(),
            patterns,
            attributes: self.attributes.clone(),
            rules: self.rules.clone(),
            autorequires: self.autorequires.clone(),
            ensurable: self.ensurable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::munge;

    #[test]
    fn test_default_pattern_binds_single_key() {
        let d = ResourceDescriptor::builder("cisco_ospf")
            .key("name")
            .attribute(PropertyDescriptor::parameter("name"))
            .build()
            .unwrap();
        assert_eq!(d.patterns().len(), 1);
        assert_eq!(d.identity_of("Sample").unwrap(), "Sample");
        assert!(!d.is_singleton());
    }

    #[test]
    fn test_key_must_be_declared_parameter() {
        let err = ResourceDescriptor::builder("t")
            .key("name")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefinition { .. }));

        let err = ResourceDescriptor::builder("t")
            .key("name")
            .attribute(PropertyDescriptor::property("name"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("must be a parameter"));
    }

    #[test]
    fn test_pattern_fields_must_be_declared() {
        let err = ResourceDescriptor::builder("t")
            .key("a")
            .attribute(PropertyDescriptor::parameter("a"))
            .pattern(TitlePattern::fields(r"(\S+) (\S+)", &["a", "b"]).unwrap())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = ResourceDescriptor::builder("t")
            .key("a")
            .attribute(PropertyDescriptor::parameter("a"))
            .attribute(PropertyDescriptor::parameter("a"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_singleton_needs_pattern() {
        assert!(ResourceDescriptor::builder("t").build().is_err());
        let d = ResourceDescriptor::builder("t")
            .pattern(TitlePattern::literal("default").unwrap())
            .build()
            .unwrap();
        assert!(d.is_singleton());
    }

    #[test]
    fn test_attribute_partitions() {
        let d = ResourceDescriptor::builder("cisco_vlan")
            .key("vlan")
            .attribute(PropertyDescriptor::parameter("vlan").munge(munge::integer))
            .attribute(PropertyDescriptor::property("vlan_name"))
            .attribute(PropertyDescriptor::property("shutdown"))
            .build()
            .unwrap();
        assert_eq!(d.parameters().count(), 1);
        assert_eq!(
            d.properties().map(PropertyDescriptor::name).collect::<Vec<_>>(),
            ["vlan_name", "shutdown"]
        );
    }
}
