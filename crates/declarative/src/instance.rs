//! Resource instances - canonical, fully validated resource declarations
//!
//! Building an instance runs a fixed pipeline:
//!
//! 1. resolve the title against the type's title patterns
//! 2. overlay explicitly supplied attributes (explicit values win)
//! 3. apply attribute defaults
//! 4. check that every key field is bound
//! 5. validate and munge every attribute, in declaration order
//! 6. run the cross-field rules, which may force sibling values
//!
//! The result is canonical: building it again from its own values yields
//! the same instance.

use crate::error::{Error, Result};
use crate::pattern::TitleError;
use crate::resource::ResourceDescriptor;
use crate::rules::Draft;
use crate::types::{Ensure, ResourceRef, ValidationMode, Value};
use indexmap::IndexMap;
use serde::Serialize;

/// A canonical resource declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInstance {
    resource: ResourceRef,
    identity: String,
    ensure: Ensure,
    keys: IndexMap<String, Value>,
    parameters: IndexMap<String, Value>,
    properties: IndexMap<String, Value>,
}

/// Error sink honouring the validation mode
struct Problems {
    mode: ValidationMode,
    found: Vec<Error>,
}

impl Problems {
    fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            found: Vec::new(),
        }
    }

    /// Fail immediately in fail-fast mode, collect in batch mode
    fn record(&mut self, error: Error) -> Result<()> {
        match self.mode {
            ValidationMode::FailFast => Err(error),
            ValidationMode::Batch => {
                self.found.push(error);
                Ok(())
            }
        }
    }

    fn finish(mut self, resource: &ResourceRef) -> Result<()> {
        match self.found.len() {
            0 => Ok(()),
            1 => Err(self.found.remove(0)),
            _ => Err(Error::Invalid {
                resource: resource.clone(),
                errors: self.found,
            }),
        }
    }
}

fn title_error(resource: &ResourceRef, error: TitleError) -> Error {
    match error {
        TitleError::NoMatch => Error::NoMatch {
            resource: resource.clone(),
        },
        TitleError::Transform {
            field,
            value,
            reason,
        } => Error::TitleTransform {
            resource: resource.clone(),
            field,
            value,
            reason,
        },
    }
}

fn join_identity(keys: &IndexMap<String, Value>, title: &str) -> String {
    if keys.is_empty() {
        return title.to_string();
    }
    // Optional title segments bind "" and take no place in the identity
    keys.values()
        .map(ToString::to_string)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ResourceInstance {
    /// Build a canonical instance from a title and supplied attributes
    pub fn build(
        descriptor: &ResourceDescriptor,
        title: &str,
        supplied: &IndexMap<String, Value>,
        ensure: Option<Ensure>,
        mode: ValidationMode,
    ) -> Result<Self> {
        let resource = ResourceRef::new(descriptor.name(), title);
        let ensure = match ensure {
            Some(Ensure::Absent) if !descriptor.is_ensurable() => {
                return Err(Error::NotEnsurable { resource });
            }
            Some(ensure) => ensure,
            None => Ensure::Present,
        };
        let mut problems = Problems::new(mode);

        let mut raw = match descriptor.patterns().resolve(title) {
            Ok(bound) => bound,
            Err(e) => {
                problems.record(title_error(&resource, e))?;
                IndexMap::new()
            }
        };

        for (name, value) in supplied {
            if descriptor.attribute(name).is_none() {
                problems.record(Error::UnknownAttribute {
                    resource: resource.clone(),
                    name: name.clone(),
                })?;
                continue;
            }
            raw.insert(name.clone(), value.clone());
        }

        for attribute in descriptor.attributes() {
            if !raw.contains_key(attribute.name())
                && let Some(default) = attribute.default()
            {
                raw.insert(attribute.name().to_string(), default.clone());
            }
        }

        for key in descriptor.key_fields() {
            if !raw.contains_key(key) {
                problems.record(Error::MissingKeyField {
                    resource: resource.clone(),
                    field: key.clone(),
                })?;
            }
        }

        let mut values = IndexMap::with_capacity(raw.len());
        for attribute in descriptor.attributes() {
            let Some(value) = raw.shift_remove(attribute.name()) else {
                continue;
            };
            if let Some(note) = attribute.deprecation()
                && supplied.contains_key(attribute.name())
            {
                log::warn!("{resource}: '{}' is deprecated: {note}", attribute.name());
            }
            match attribute.process(value) {
                Ok(canonical) => {
                    values.insert(attribute.name().to_string(), canonical);
                }
                Err(source) => problems.record(Error::Property {
                    resource: resource.clone(),
                    source,
                })?,
            }
        }

        problems.finish(&resource)?;

        // Rules only see a complete, individually valid set of values
        let mut problems = Problems::new(mode);
        let mut draft = Draft::new(resource.clone(), ensure, values);
        for rule in descriptor.rules() {
            if let Err(violation) = rule.apply(&mut draft) {
                problems.record(Error::CrossField {
                    resource: resource.clone(),
                    rule: rule.name().to_string(),
                    properties: violation.properties,
                    message: violation.message,
                })?;
            }
        }
        problems.finish(&resource)?;

        let mut values = draft.into_values();
        let mut keys = IndexMap::with_capacity(descriptor.key_fields().len());
        for key in descriptor.key_fields() {
            if let Some(value) = values.shift_remove(key) {
                keys.insert(key.clone(), value);
            }
        }
        let (properties, parameters): (IndexMap<_, _>, IndexMap<_, _>) =
            values.into_iter().partition(|(name, _)| {
                descriptor
                    .attribute(name)
                    .is_some_and(|a| a.is_property())
            });

        let identity = join_identity(&keys, title);
        log::debug!(
            "{resource}: built '{identity}' ({} properties, {} parameters)",
            properties.len(),
            parameters.len()
        );

        Ok(Self {
            resource,
            identity,
            ensure,
            keys,
            parameters,
            properties,
        })
    }

    /// Reference to the declaration
    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Type name
    pub fn type_name(&self) -> &str {
        &self.resource.type_name
    }

    /// Title as declared
    pub fn title(&self) -> &str {
        &self.resource.title
    }

    /// Key values joined by a space; the title for singleton types
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Desired existence
    pub fn ensure(&self) -> Ensure {
        self.ensure
    }

    /// Key field values, in key order
    pub fn keys(&self) -> &IndexMap<String, Value> {
        &self.keys
    }

    /// Non-key parameter values
    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    /// Managed property values
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Look up any attribute value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.keys
            .get(name)
            .or_else(|| self.parameters.get(name))
            .or_else(|| self.properties.get(name))
    }

    /// Every attribute value, keys first
    pub fn values(&self) -> IndexMap<String, Value> {
        self.keys
            .iter()
            .chain(&self.parameters)
            .chain(&self.properties)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Identity a title resolves to, from the title and key defaults only
pub(crate) fn identity_of(descriptor: &ResourceDescriptor, title: &str) -> Result<String> {
    let resource = ResourceRef::new(descriptor.name(), title);
    let bound = descriptor
        .patterns()
        .resolve(title)
        .map_err(|e| title_error(&resource, e))?;

    let mut keys = IndexMap::with_capacity(descriptor.key_fields().len());
    for key in descriptor.key_fields() {
        let attribute = descriptor.attribute(key);
        let value = bound
            .get(key)
            .or_else(|| attribute.and_then(|a| a.default()))
            .ok_or_else(|| Error::MissingKeyField {
                resource: resource.clone(),
                field: key.clone(),
            })?;
        let value = attribute.map_or_else(|| value.clone(), |a| a.normalize(value));
        keys.insert(key.clone(), value);
    }
    Ok(join_identity(&keys, title))
}
