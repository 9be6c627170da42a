//! Idempotence checks and diffs between live and desired state

use crate::catalog::Catalog;
use crate::instance::ResourceInstance;
use crate::registry::Registry;
use crate::resource::ResourceDescriptor;
use crate::types::{Ensure, ResourceRef, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// State of one resource as reported by the device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveState {
    /// Whether the resource exists
    #[serde(default)]
    pub ensure: Ensure,
    /// Reported property values, possibly not yet canonical
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
}

impl LiveState {
    /// A present resource with no reported properties
    pub fn present() -> Self {
        Self::default()
    }

    /// A resource that does not exist
    pub fn absent() -> Self {
        Self {
            ensure: Ensure::Absent,
            properties: IndexMap::new(),
        }
    }

    /// Add a reported property value
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    /// The live state that exactly matches an instance
    pub fn from_instance(instance: &ResourceInstance) -> Self {
        Self {
            ensure: instance.ensure(),
            properties: instance.properties().clone(),
        }
    }
}

/// Per-property outcome of an idempotence check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// The checked resource
    pub resource: ResourceRef,
    /// Whether existence matches
    pub ensure_in_sync: bool,
    /// Whether each desired property matches
    pub properties: IndexMap<String, bool>,
}

impl SyncReport {
    /// Check if nothing needs to change
    pub fn is_in_sync(&self) -> bool {
        self.ensure_in_sync && self.properties.values().all(|in_sync| *in_sync)
    }

    /// Names of the properties that differ
    pub fn out_of_sync(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, in_sync)| !**in_sync)
            .map(|(name, _)| name.as_str())
    }
}

/// Compare live state against a canonical instance.
///
/// When the instance is declared absent only existence is compared. A
/// property the device does not report is in sync only when the desired
/// value is the `default` sentinel.
pub fn in_sync(
    descriptor: &ResourceDescriptor,
    live: &LiveState,
    desired: &ResourceInstance,
) -> SyncReport {
    let ensure_in_sync = live.ensure == desired.ensure();
    let mut properties = IndexMap::new();

    if desired.ensure().is_present() {
        for (name, value) in desired.properties() {
            let matches = match (live.properties.get(name), descriptor.attribute(name)) {
                (None, _) => value.is_default(),
                (Some(reported), Some(attribute)) => attribute.in_sync(reported, value),
                (Some(reported), None) => reported == value,
            };
            properties.insert(name.clone(), matches);
        }
    }

    SyncReport {
        resource: desired.resource().clone(),
        ensure_in_sync,
        properties,
    }
}

/// One property that needs to change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyChange {
    /// Property name
    pub name: String,
    /// Value reported by the device, if any
    pub live: Option<Value>,
    /// Canonical desired value
    pub desired: Value,
}

/// A diff between live and desired state of a resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDiff {
    /// Identity of the resource
    pub resource_id: String,
    /// Type of the resource
    pub resource_type: String,
    /// Title as declared
    pub title: String,
    /// Existence reported by the device
    pub live_ensure: Ensure,
    /// Desired existence
    pub desired_ensure: Ensure,
    /// Properties that differ
    pub changes: Vec<PropertyChange>,
}

impl ResourceDiff {
    /// Create a diff for an instance, returning None if no changes needed
    pub fn compute(
        descriptor: &ResourceDescriptor,
        live: Option<&LiveState>,
        desired: &ResourceInstance,
    ) -> Option<Self> {
        let absent = LiveState::absent();
        let live = live.unwrap_or(&absent);
        let report = in_sync(descriptor, live, desired);
        if report.is_in_sync() {
            return None;
        }

        let changes = report
            .out_of_sync()
            .filter_map(|name| {
                desired.properties().get(name).map(|value| PropertyChange {
                    name: name.to_string(),
                    live: live.properties.get(name).cloned(),
                    desired: value.clone(),
                })
            })
            .collect();

        Some(Self {
            resource_id: desired.identity().to_string(),
            resource_type: desired.type_name().to_string(),
            title: desired.title().to_string(),
            live_ensure: live.ensure,
            desired_ensure: desired.ensure(),
            changes,
        })
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        self.live_ensure.is_absent() && self.desired_ensure.is_present()
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        self.live_ensure.is_present() && self.desired_ensure.is_absent()
    }

    /// Check if this diff represents a modification
    pub fn is_modification(&self) -> bool {
        self.live_ensure == self.desired_ensure && !self.changes.is_empty()
    }
}

/// Live states keyed by `(type, identity)`
#[derive(Debug, Clone, Default)]
pub struct LiveInventory {
    states: HashMap<(String, String), LiveState>,
}

impl LiveInventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the live state of a resource
    pub fn insert(&mut self, type_name: &str, identity: &str, state: LiveState) {
        self.states
            .insert((type_name.to_string(), identity.to_string()), state);
    }

    /// Live state of a resource, if reported
    pub fn get(&self, type_name: &str, identity: &str) -> Option<&LiveState> {
        self.states
            .get(&(type_name.to_string(), identity.to_string()))
    }

    /// Number of reported resources
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if nothing is reported
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Compute diffs for every instance in a catalog
///
/// Returns only resources whose live state differs from the desired state;
/// a resource missing from the inventory is treated as absent.
pub fn compute_diffs(registry: &Registry, catalog: &Catalog, live: &LiveInventory) -> Vec<ResourceDiff> {
    catalog
        .iter()
        .filter_map(|instance| {
            let descriptor = registry.get(instance.type_name())?;
            ResourceDiff::compute(
                descriptor,
                live.get(instance.type_name(), instance.identity()),
                instance,
            )
        })
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources to modify
    pub modifications: usize,
    /// Number of property changes across all modifications
    pub property_changes: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_removal() {
                summary.removals += 1;
            } else {
                summary.modifications += 1;
            }
            summary.property_changes += diff.changes.len();
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group diffs by resource type
pub fn group_by_type(diffs: &[ResourceDiff]) -> BTreeMap<String, Vec<&ResourceDiff>> {
    let mut groups: BTreeMap<String, Vec<&ResourceDiff>> = BTreeMap::new();
    for diff in diffs {
        groups
            .entry(diff.resource_type.clone())
            .or_default()
            .push(diff);
    }
    groups
}
