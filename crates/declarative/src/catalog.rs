//! Catalog - the set of compiled resource instances
//!
//! A catalog holds at most one instance per `(type, identity)`. Two
//! declarations that resolve to the same identity (for example `"55"` and
//! `"55 default"` for a BGP router whose VRF defaults to `default`) are a
//! duplicate declaration.

use crate::error::{Error, Result};
use crate::instance::ResourceInstance;
use crate::registry::Registry;
use crate::types::ResourceRef;
use serde::Serialize;
use std::collections::HashMap;

/// An implicit dependency between two declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// The declaration that depends on another
    pub source: ResourceRef,
    /// The declaration depended on, as `type[title]`
    pub target: ResourceRef,
    /// Whether the target is declared in the catalog
    pub resolved: bool,
}

/// Compiled resource instances, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    instances: Vec<ResourceInstance>,
    index: HashMap<(String, String), usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance; its identity must be new for its type
    pub fn add(&mut self, instance: ResourceInstance) -> Result<()> {
        let key = (
            instance.type_name().to_string(),
            instance.identity().to_string(),
        );
        if let Some(&existing) = self.index.get(&key) {
            return Err(Error::DuplicateResource {
                resource: instance.resource().clone(),
                existing: self.instances[existing].resource().clone(),
                identity: key.1,
            });
        }
        self.index.insert(key, self.instances.len());
        self.instances.push(instance);
        Ok(())
    }

    /// Look up by type and identity
    pub fn get(&self, type_name: &str, identity: &str) -> Option<&ResourceInstance> {
        self.index
            .get(&(type_name.to_string(), identity.to_string()))
            .map(|&i| &self.instances[i])
    }

    /// Look up by type and either identity or declared title
    pub fn find(&self, type_name: &str, name: &str) -> Option<&ResourceInstance> {
        self.get(type_name, name).or_else(|| {
            self.instances
                .iter()
                .find(|i| i.type_name() == type_name && i.title() == name)
        })
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceInstance> {
        self.instances.iter()
    }

    /// Instances of one type
    pub fn of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a ResourceInstance> {
        self.instances
            .iter()
            .filter(move |i| i.type_name() == type_name)
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Filter catalog to only include instances matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&ResourceInstance) -> bool,
    {
        let mut filtered = Self::new();
        for instance in self.instances.into_iter().filter(|i| predicate(i)) {
            let key = (
                instance.type_name().to_string(),
                instance.identity().to_string(),
            );
            filtered.index.insert(key, filtered.instances.len());
            filtered.instances.push(instance);
        }
        filtered
    }

    /// Filter catalog to only include instances matching a target pattern
    ///
    /// Target format: "type" or "type.name"
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (resource_type, name) = parse_target(t);
                self.filter(|i| matches_filter(i, resource_type.as_deref(), name.as_deref()))
            }
        }
    }

    /// Resolve every autorequire hint into a dependency edge.
    ///
    /// Targets that are not declared are kept as unresolved edges; the
    /// device is expected to provide them.
    pub fn dependencies(&self, registry: &Registry) -> Vec<Dependency> {
        let mut edges = Vec::new();
        for instance in &self.instances {
            let Some(descriptor) = registry.get(instance.type_name()) else {
                continue;
            };
            for autorequire in descriptor.autorequires() {
                for title in autorequire.titles(instance) {
                    let found = self.find(autorequire.target(), &title);
                    let target = found.map_or_else(
                        || ResourceRef::new(autorequire.target(), &title),
                        |t| t.resource().clone(),
                    );
                    if found.is_none() {
                        log::info!(
                            "{}: {target} was not found in catalog. Will obtain from device.",
                            instance.resource()
                        );
                    }
                    edges.push(Dependency {
                        source: instance.resource().clone(),
                        target,
                        resolved: found.is_some(),
                    });
                }
            }
        }
        edges
    }
}

/// Parse a target string like "type.name" into (type, name)
///
/// Only the first dot separates: names such as interface `ethernet1/1.5`
/// or addresses may contain dots themselves.
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        None => (Some(target.to_string()), None),
        Some((resource_type, name)) => (Some(resource_type.to_string()), Some(name.to_string())),
    }
}

/// Check if an instance matches the filter criteria
///
/// The type must match exactly, with or without its `cisco_` prefix. The
/// name must equal the instance's identity or its title.
fn matches_filter(instance: &ResourceInstance, resource_type: Option<&str>, name: Option<&str>) -> bool {
    if let Some(rt) = resource_type {
        let type_name = instance.type_name();
        if type_name != rt && type_name.strip_prefix("cisco_") != Some(rt) {
            return false;
        }
    }

    if let Some(n) = name
        && instance.identity() != n
        && instance.title() != n
    {
        return false;
    }

    true
}
