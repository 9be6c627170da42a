//! Type registry - the set of resource types known to a process
//!
//! The registry is built once at startup and only read afterwards, so it
//! can be shared freely between worker threads.

use crate::error::{Error, Result};
use crate::instance::ResourceInstance;
use crate::resource::ResourceDescriptor;
use crate::types::{ResourceRequest, ValidationMode};
use indexmap::IndexMap;
use std::sync::Arc;

/// Registered resource types, in registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: IndexMap<String, Arc<ResourceDescriptor>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type; names must be unique
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<()> {
        let name = descriptor.name().to_string();
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateType { type_name: name });
        }
        log::trace!("registered resource type '{name}'");
        self.types.insert(name, Arc::new(descriptor));
        Ok(())
    }

    /// Look up a type
    pub fn get(&self, name: &str) -> Option<&Arc<ResourceDescriptor>> {
        self.types.get(name)
    }

    /// Look up a type, failing if it is not registered
    pub fn descriptor(&self, name: &str) -> Result<&ResourceDescriptor> {
        self.get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| Error::UnknownType {
                type_name: name.to_string(),
            })
    }

    /// Check if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no type is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate types in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.types.values().map(AsRef::as_ref)
    }

    /// Registered type names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Build a canonical instance from a request
    pub fn build(&self, request: &ResourceRequest, mode: ValidationMode) -> Result<ResourceInstance> {
        self.descriptor(&request.type_name)?.instance(
            &request.title,
            &request.properties,
            request.ensure,
            mode,
        )
    }
}
