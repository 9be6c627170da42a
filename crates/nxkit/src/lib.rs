//! # nxkit
//!
//! Cisco NX-OS resource types for the `declarative` engine.
//!
//! This crate provides:
//! - One descriptor constructor per NX-OS resource type
//! - Shared attribute shapes (flags, numbers, keyword sets, pairs)
//! - [`registry`], which registers every type at once
//!
//! ## Example
//!
//! ```
//! use declarative::{ResourceRequest, ValidationMode};
//!
//! let registry = nxkit::registry()?;
//! let request = ResourceRequest::new("cisco_bgp", "1.5 red").with("router_id", "10.0.0.1");
//! let bgp = registry.build(&request, ValidationMode::FailFast)?;
//! assert_eq!(bgp.identity(), "65541 red");
//! # Ok::<(), declarative::Error>(())
//! ```

pub mod aaa;
pub mod bgp;
pub mod common;
pub mod interface;
pub mod ospf;
pub mod snmp;
pub mod stp;
pub mod tacacs;
pub mod vlan;
pub mod vxlan;

use declarative::{Registry, ResourceDescriptor, Result};

type Constructor = fn() -> Result<ResourceDescriptor>;

const TYPES: &[Constructor] = &[
    aaa::cisco_aaa_authentication_login,
    aaa::cisco_aaa_authorization_login_cfg_svc,
    aaa::cisco_aaa_group_tacacs,
    bgp::cisco_bgp,
    bgp::cisco_bgp_neighbor_af,
    vxlan::cisco_encapsulation,
    vxlan::cisco_evpn_vni,
    interface::cisco_interface,
    interface::cisco_interface_ospf,
    ospf::cisco_ospf,
    ospf::cisco_ospf_area,
    snmp::cisco_snmp_group,
    snmp::cisco_snmp_user,
    stp::cisco_stp_global,
    tacacs::cisco_tacacs_server,
    vlan::cisco_vlan,
    vxlan::cisco_vxlan_vtep_vni,
];

/// Build a registry holding every NX-OS type
pub fn registry() -> Result<Registry> {
    let mut registry = Registry::new();
    for constructor in TYPES {
        registry.register(constructor()?)?;
    }
    log::debug!("registered {} resource types", registry.len());
    Ok(registry)
}
