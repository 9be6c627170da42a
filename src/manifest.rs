//! Manifest and live snapshot files
//!
//! A manifest is TOML with one `[[resource]]` table per declaration:
//!
//! ```toml
//! [[resource]]
//! type = "cisco_vlan"
//! title = "100"
//! ensure = "present"
//!
//! [resource.properties]
//! vlan_name = "red"
//! shutdown = false
//! ```
//!
//! A live snapshot is a JSON array of `{type, title, ensure, properties}`
//! objects as reported by a device. Snapshot entries are matched to
//! declarations by identity, so `"55"` and `"55 default"` are the same BGP
//! router.

use anyhow::{Context, Result};
use declarative::{LiveInventory, LiveState, Registry, ResourceRequest};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    resource: Vec<ResourceRequest>,
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<Vec<ResourceRequest>> {
    let file: ManifestFile = toml::from_str(content).context("Invalid manifest format")?;
    Ok(file.resource)
}

/// Load a manifest file
pub fn load_manifest(path: &Path) -> Result<Vec<ResourceRequest>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let requests = parse_manifest(&content).with_context(|| format!("In {}", path.display()))?;
    log::debug!("Loaded {} declaration(s) from {}", requests.len(), path.display());
    Ok(requests)
}

#[derive(Debug, Deserialize)]
struct LiveEntry {
    #[serde(rename = "type")]
    type_name: String,
    title: String,
    #[serde(flatten)]
    state: LiveState,
}

/// Parse snapshot text into an inventory keyed by identity
pub fn parse_snapshot(content: &str, registry: &Registry) -> Result<LiveInventory> {
    let entries: Vec<LiveEntry> = serde_json::from_str(content).context("Invalid snapshot format")?;
    let mut inventory = LiveInventory::new();
    for entry in entries {
        let Some(descriptor) = registry.get(&entry.type_name) else {
            log::warn!("Skipping live {}[{}]: unknown type", entry.type_name, entry.title);
            continue;
        };
        let identity = descriptor
            .identity_of(&entry.title)
            .with_context(|| format!("Live {}[{}]", entry.type_name, entry.title))?;
        log::trace!("live {}[{}] is '{identity}'", entry.type_name, entry.title);
        inventory.insert(&entry.type_name, &identity, entry.state);
    }
    Ok(inventory)
}

/// Load a snapshot file
pub fn load_snapshot(path: &Path, registry: &Registry) -> Result<LiveInventory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse_snapshot(&content, registry).with_context(|| format!("In {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Ensure, Value};
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[[resource]]
type = "cisco_vlan"
title = "100"

[resource.properties]
vlan_name = "red"
shutdown = false
mapped_vni = 5000

[[resource]]
type = "cisco_interface"
title = "Ethernet1/1"
ensure = "absent"

[[resource]]
type = "cisco_aaa_group_tacacs"
title = "admins"

[resource.properties]
server_hosts = ["1.1.1.1", "2.2.2.2"]
"#;

    #[test]
    fn test_parse_manifest() {
        let requests = parse_manifest(MANIFEST).unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].type_name, "cisco_vlan");
        assert_eq!(requests[0].properties["vlan_name"], Value::from("red"));
        assert_eq!(requests[0].properties["shutdown"], Value::Bool(false));
        assert_eq!(requests[0].properties["mapped_vni"], Value::Int(5000));
        assert_eq!(requests[1].ensure, Some(Ensure::Absent));
        assert!(requests[1].properties.is_empty());
        assert_eq!(
            requests[2].properties["server_hosts"],
            Value::list(["1.1.1.1", "2.2.2.2"])
        );
    }

    #[test]
    fn test_manifest_keeps_property_order() {
        let requests = parse_manifest(MANIFEST).unwrap();
        let names: Vec<&str> = requests[0].properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["vlan_name", "shutdown", "mapped_vni"]);
    }

    #[test]
    fn test_bad_manifest() {
        assert!(parse_manifest("[[resource]]\ntitle = \"100\"\n").is_err());
        assert!(parse_manifest("[[resources]]\ntype = \"cisco_vlan\"\ntitle = \"1\"\n").is_err());
        assert!(parse_manifest("").unwrap().is_empty());
    }

    #[test]
    fn test_load_manifest_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, MANIFEST).unwrap();
        assert_eq!(load_manifest(&path).unwrap().len(), 3);
        assert!(load_manifest(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_snapshot_matches_by_identity() {
        let registry = nxkit::registry().unwrap();
        let snapshot = r#"[
            {"type": "cisco_bgp", "title": "55", "properties": {"router_id": "1.1.1.1"}},
            {"type": "cisco_vlan", "title": "100", "ensure": "absent"},
            {"type": "cisco_ntp_server", "title": "1.1.1.1"}
        ]"#;
        let inventory = parse_snapshot(snapshot, &registry).unwrap();
        assert_eq!(inventory.len(), 2);

        let bgp = inventory.get("cisco_bgp", "55 default").unwrap();
        assert_eq!(bgp.ensure, Ensure::Present);
        assert_eq!(bgp.properties["router_id"], Value::from("1.1.1.1"));
        assert!(inventory.get("cisco_vlan", "100").unwrap().ensure.is_absent());
    }

    #[test]
    fn test_snapshot_with_unparseable_title() {
        let registry = nxkit::registry().unwrap();
        let snapshot = r#"[{"type": "cisco_vlan", "title": "blue"}]"#;
        assert!(parse_snapshot(snapshot, &registry).is_err());
    }
}
