//! VLAN type

use crate::common::{flag, keywords, number, text};
use declarative::{munge, PropertyDescriptor, ResourceDescriptor, Result, TitlePattern, Transform, Value};

/// Extended VLANs reserved for internal use
const RESERVED: std::ops::RangeInclusive<i64> = 3968..=4047;

/// Configurable VLAN ids.
///
/// VLAN 1 is accepted so that it can be referenced, but the device will not
/// let it be changed.
fn check_vlan_id(value: &Value) -> std::result::Result<(), String> {
    let out_of_range = || "ID is not in the valid range.".to_string();
    let id = match value {
        Value::Int(n) => *n,
        Value::Str(s) => s.trim().parse().map_err(|_| out_of_range())?,
        _ => return Err(out_of_range()),
    };
    if id == 1 {
        log::warn!("Cannot make changes to the default VLAN.");
        return Ok(());
    }
    if (2..=4093).contains(&id) && !RESERVED.contains(&id) {
        Ok(())
    } else {
        Err(out_of_range())
    }
}

/// `cisco_vlan`: one VLAN, titled by its numeric id
pub fn cisco_vlan() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_vlan")
        .doc("Manages a Cisco VLAN.")
        .key("vlan")
        .pattern(TitlePattern::new(r"(\d+)", &[("vlan", Transform::Integer)])?)
        .attribute(
            PropertyDescriptor::parameter("vlan")
                .doc("ID of the Virtual LAN.")
                .validate(check_vlan_id)
                .munge(munge::integer),
        )
        .attribute(text("vlan_name").doc("The name of the VLAN."))
        .attribute(number("mapped_vni").doc("The VNI id that is mapped to the VLAN."))
        .attribute(keywords("state", &["active", "suspend", "default"]))
        .attribute(flag("shutdown"))
        .ensurable()
        .build()
}
