//! Interface types: physical/logical interface settings and per-interface
//! OSPF

use crate::common::{
    area_id, bounded, check_area, flag, interface_name, keywords, number, pairs, switch, text,
};
use declarative::munge::{self, MungeResult};
use declarative::{
    rules, validate, Autorequire, Comparison, Draft, Error, PropertyDescriptor, ResourceDescriptor,
    Result, Rule, TitlePattern, Value, Violation,
};
use regex::Regex;
use std::net::Ipv4Addr;

const FLAGS: &[&str] = &[
    "bfd_echo",
    "shutdown",
    "switchport_autostate_exclude",
    "switchport_vtp",
    "negotiate_auto",
    "pim_bfd",
    "ipv4_pim_sparse_mode",
    "ipv4_proxy_arp",
    "ipv4_redirects",
    "ipv4_forwarding",
    "ipv6_redirects",
    "fabric_forwarding_anycast_gateway",
    "svi_autostate",
    "svi_management",
    "vlan_mapping_enable",
    "switchport_pvlan_host",
    "switchport_pvlan_promiscuous",
    "switchport_pvlan_trunk_promiscuous",
    "switchport_pvlan_trunk_secondary",
    "ipv4_dhcp_relay_info_trust",
    "ipv4_dhcp_relay_src_addr_hsrp",
    "ipv4_dhcp_relay_subnet_broadcast",
    "ipv4_dhcp_smart_relay",
    "hsrp_bfd",
];

const TEXTS: &[&str] = &[
    "description",
    "vrf",
    "ipv4_acl_in",
    "ipv4_acl_out",
    "ipv6_acl_in",
    "ipv6_acl_out",
    "storm_control_broadcast",
    "storm_control_multicast",
    "storm_control_unicast",
];

const NUMBERS: &[&str] = &[
    "encapsulation_dot1q",
    "mtu",
    "access_vlan",
    "switchport_trunk_native_vlan",
    "ipv4_arp_timeout",
    "stp_port_priority",
    "hsrp_delay_minimum",
    "hsrp_delay_reload",
    "hsrp_mac_refresh",
    "hsrp_version",
    "load_interval_counter_1_delay",
    "load_interval_counter_2_delay",
    "load_interval_counter_3_delay",
];

/// `[range, value]` pairs where a `default` value removes the entry
const STP_PAIRS: &[&str] = &[
    "stp_mst_cost",
    "stp_mst_port_priority",
    "stp_vlan_cost",
    "stp_vlan_port_priority",
];

fn check_ipv4(value: &Value) -> std::result::Result<(), String> {
    if value.is_default_literal() {
        return Ok(());
    }
    match value.as_str().map(str::parse::<Ipv4Addr>) {
        Some(Ok(_)) => Ok(()),
        _ => Err("must be either a valid IPv4 address string or 'default'".to_string()),
    }
}

/// `none` and `default` both clear the allowed list
fn pvlan_allowed_vlan(value: Value) -> MungeResult {
    if value.as_str().is_some_and(|s| s.trim() == "none") {
        return Ok(Value::Default);
    }
    munge::range_summary_or_default(value)
}

/// `[primary, secondaries]` or a bare range of secondaries
fn pvlan_entry(value: Value) -> MungeResult {
    match value {
        Value::List(items) => match items.as_slice() {
            [primary, secondary] => Ok(Value::List(vec![
                munge::string_or_default(primary.clone())?,
                munge::range_summary_or_default(secondary.clone())?,
            ])),
            _ => Err("expected [primary, secondaries]".to_string()),
        },
        other => munge::range_summary_or_default(other),
    }
}

/// Nested desired lists compare as they are; a flat desired list is
/// compared against the flattened live list.
fn pvlan_in_sync(live: &Value, desired: &Value) -> bool {
    let flat = desired
        .as_list()
        .and_then(<[Value]>::first)
        .is_some_and(|first| !first.is_list());
    if !flat {
        return Comparison::Unordered.matches(live, desired);
    }
    let live = match live {
        Value::List(items) => Value::List(
            items
                .iter()
                .flat_map(|item| match item {
                    Value::List(inner) => inner.clone(),
                    other => vec![other.clone()],
                })
                .collect(),
        ),
        other => other.clone(),
    };
    Comparison::Unordered.matches(&live, desired)
}

fn ipv4_address_mask(draft: &mut Draft) -> std::result::Result<(), Violation> {
    let address = draft.get("ipv4_address");
    let mask = draft.get("ipv4_netmask_length");
    let address_set = address.is_some_and(|a| !a.is_default());
    if address_set && mask.is_some_and(Value::is_default) {
        return Err(Violation::new(
            &["ipv4_address", "ipv4_netmask_length"],
            "The ipv4_netmask_length should have a valid value, when ipv4_address has a valid IPv4 address",
        ));
    }
    if address.is_some_and(Value::is_default) && mask.is_some_and(|m| !m.is_default()) {
        return Err(Violation::new(
            &["ipv4_address", "ipv4_netmask_length"],
            "The ipv4_address should have a valid value, when ipv4_netmask_length has a valid value",
        ));
    }
    Ok(())
}

fn purge_config(draft: &mut Draft) -> std::result::Result<(), Violation> {
    if !draft.is_true("purge_config") {
        return Ok(());
    }
    let others: Vec<&str> = draft
        .names()
        .filter(|n| !matches!(*n, "interface" | "purge_config"))
        .collect();
    if others.is_empty() {
        Ok(())
    } else {
        Err(Violation::new(&others, "All params MUST be nil if purge_config is true"))
    }
}

/// `cisco_interface`: one physical or logical interface
pub fn cisco_interface() -> Result<ResourceDescriptor> {
    let mut builder = ResourceDescriptor::builder("cisco_interface")
        .doc("Manages a Cisco Network Interface.")
        .key("interface")
        .attribute(
            PropertyDescriptor::parameter("interface")
                .doc("Name of the interface on the network element.")
                .munge(interface_name),
        );

    for name in FLAGS {
        builder = builder.attribute(flag(name));
    }
    for name in TEXTS {
        builder = builder.attribute(text(name));
    }
    for name in NUMBERS {
        builder = builder.attribute(number(name));
    }
    for name in STP_PAIRS {
        builder = builder.attribute(pairs(name).comparison(Comparison::UnorderedSkipDefaults));
    }

    builder = builder
        .attribute(switch("vpc_peer_link"))
        .attribute(
            PropertyDescriptor::property("speed")
                .literals(&["auto", "default"])
                .validator(validate::one_of(&["10", "100", "1000", "10000", "40000", "100000"]))
                .munge(munge::integer),
        )
        .attribute(keywords("duplex", &["auto", "full", "default"]))
        .attribute(keywords(
            "switchport_mode",
            &["disabled", "access", "tunnel", "fex_fabric", "trunk", "fabricpath", "default"],
        ))
        .attribute(
            PropertyDescriptor::property("switchport_trunk_allowed_vlan")
                .doc("Allowed VLANs, as a range list such as '2-5,7'.")
                .munge(munge::range_summary_or_default),
        )
        .attribute(bounded("vpc_id", 1, 4096))
        .attribute(text("ipv4_address").validate(check_ipv4))
        .attribute(text("ipv4_address_secondary").validate(check_ipv4))
        .attribute(bounded("ipv4_netmask_length", 0, 32))
        .attribute(bounded("ipv4_netmask_length_secondary", 0, 32))
        .attribute(pairs("vlan_mapping").doc("[[original_vlan, translated_vlan], ...]"))
        .attribute(keywords("stp_bpdufilter", &["enable", "disable", "default"]))
        .attribute(keywords("stp_bpduguard", &["enable", "disable", "default"]))
        .attribute(
            PropertyDescriptor::property("stp_cost")
                .doc("Port path cost: an integer, 'auto' or 'default'.")
                .literals(&["auto", "default"])
                .validator(validate::integer_in(1, 200_000_000))
                .munge(munge::integer),
        )
        .attribute(keywords("stp_guard", &["loop", "none", "root", "default"]))
        .attribute(keywords("stp_link_type", &["auto", "shared", "point-to-point", "default"]))
        .attribute(keywords(
            "stp_port_type",
            &["edge", "network", "normal", "edge trunk", "default"],
        ))
        .attribute(
            PropertyDescriptor::property("pvlan_mapping")
                .array()
                .munge(munge::range_summary_or_default),
        )
        .attribute(
            PropertyDescriptor::property("switchport_pvlan_host_association")
                .array()
                .validator(validate::matches(r"^\d+$")?)
                .munge(munge::string_or_default)
                .comparison(Comparison::Exact),
        )
        .attribute(
            PropertyDescriptor::property("switchport_pvlan_mapping")
                .array()
                .munge(munge::range_summary_or_default)
                .comparison(Comparison::Exact),
        )
        .attribute(
            PropertyDescriptor::property("switchport_pvlan_mapping_trunk")
                .array()
                .munge(pvlan_entry)
                .comparison(Comparison::custom(pvlan_in_sync)),
        )
        .attribute(
            PropertyDescriptor::property("switchport_pvlan_trunk_association")
                .array()
                .munge(pvlan_entry)
                .comparison(Comparison::custom(pvlan_in_sync)),
        )
        .attribute(PropertyDescriptor::property("switchport_pvlan_trunk_allowed_vlan").munge(pvlan_allowed_vlan))
        .attribute(
            PropertyDescriptor::property("switchport_pvlan_trunk_native_vlan")
                .validator(validate::matches(r"^\d+$")?)
                .munge(munge::string_or_default),
        )
        .attribute(
            PropertyDescriptor::property("switchport_private_vlan_association_trunk")
                .array()
                .munge(munge::string_or_default)
                .comparison(Comparison::Membership)
                .deprecated("use 'switchport_pvlan_trunk_association'"),
        )
        .attribute(
            PropertyDescriptor::property("private_vlan_mapping")
                .array()
                .munge(munge::compact_lowercase_or_default)
                .deprecated("use 'pvlan_mapping'"),
        );

    for name in ["ipv4_dhcp_relay_addr", "ipv6_dhcp_relay_addr"] {
        builder = builder.attribute(
            PropertyDescriptor::property(name)
                .array()
                .validator(validate::ip_address())
                .munge(munge::string_or_default),
        );
    }
    for name in ["ipv4_dhcp_relay_src_intf", "ipv6_dhcp_relay_src_intf"] {
        builder = builder.attribute(
            PropertyDescriptor::property(name).munge(munge::compact_lowercase_or_default),
        );
    }

    builder
        .attribute(keywords("hsrp_use_bia", &["use_bia", "use_bia_intf", "default"]))
        .attribute(
            PropertyDescriptor::property("purge_config")
                .doc("Reset the interface to its default configuration.")
                .literals(&["true"]),
        )
        .rule(Rule::new("ipv4_address_mask", ipv4_address_mask))
        .rule(Rule::new("purge_config", purge_config))
        .ensurable()
        .build()
}

/// Deprecated spellings of the message-digest encryption types
fn check_encryption_type(value: &Value) -> std::result::Result<(), String> {
    match value.literal_text().as_deref() {
        Some("clear") => log::warn!("keyword 'clear' is deprecated, please use 'cleartext'"),
        Some("encrypted") => log::warn!("keyword 'encrypted' is deprecated, please use 'cisco_type_7'"),
        _ => {}
    }
    validate::one_of(&["clear", "cleartext", "3des", "cisco_type_7", "encrypted", "default"])(value)
}

fn encryption_type(value: Value) -> MungeResult {
    match value.literal_text().as_deref() {
        Some("default" | "clear" | "cleartext") => Ok(Value::Keyword("cleartext".into())),
        Some("encrypted" | "cisco_type_7") => Ok(Value::Keyword("cisco_type_7".into())),
        Some("3des") => Ok(Value::Keyword("3des".into())),
        _ => Err(format!("'{value}' is not an encryption type")),
    }
}

const DIGEST_FIELDS: [&str; 3] = [
    "message_digest_algorithm_type",
    "message_digest_encryption_type",
    "message_digest_password",
];

/// `cisco_interface_ospf`: OSPF settings of one interface, titled
/// `"<interface> <ospf>"`
pub fn cisco_interface_ospf() -> Result<ResourceDescriptor> {
    let loopback = Regex::new(r"^lo\S+$").map_err(|e| Error::InvalidPattern {
        pattern: r"^lo\S+$".to_string(),
        reason: e.to_string(),
    })?;

    ResourceDescriptor::builder("cisco_interface_ospf")
        .doc("Manages configuration of an OSPF interface instance.")
        .key("interface")
        .key("ospf")
        .pattern(TitlePattern::fields(r"(\S+) (\S+)", &["interface", "ospf"])?)
        .attribute(PropertyDescriptor::parameter("interface").munge(interface_name))
        .attribute(PropertyDescriptor::parameter("ospf"))
        .attribute(PropertyDescriptor::property("cost").munge(munge::integer))
        .attribute(number("hello_interval").device_default(10))
        .attribute(number("dead_interval").device_default(40))
        .attribute(switch("passive_interface"))
        .attribute(switch("message_digest"))
        .attribute(PropertyDescriptor::property("message_digest_key_id").munge(munge::integer))
        .attribute(
            PropertyDescriptor::parameter("message_digest_algorithm_type")
                .validator(validate::one_of(&["md5", "default"]))
                .munge(|_| Ok(Value::Keyword("md5".into()))),
        )
        .attribute(
            PropertyDescriptor::parameter("message_digest_encryption_type")
                .validate(check_encryption_type)
                .munge(encryption_type),
        )
        .attribute(PropertyDescriptor::property("message_digest_password").validator(validate::string()))
        .attribute(
            PropertyDescriptor::property("area")
                .doc("Area as an IP address or integer. Mandatory when present.")
                .validate(check_area)
                .munge(area_id),
        )
        .rule(rules::required_when_present("area"))
        .rule(rules::forbidden_without("message_digest_key_id", &DIGEST_FIELDS))
        .rule(rules::required_with("message_digest_key_id", &DIGEST_FIELDS))
        .rule(Rule::new("passive_loopback", move |draft| {
            let on_loopback = draft
                .get("interface")
                .and_then(Value::as_str)
                .is_some_and(|name| loopback.is_match(name));
            if on_loopback && draft.is_true("passive_interface") {
                Err(Violation::new(
                    &["passive_interface"],
                    "passive_interface value cannot be set on loopback interfaces",
                ))
            } else {
                Ok(())
            }
        }))
        .autorequire(Autorequire::from_field("cisco_interface", "interface"))
        .autorequire(Autorequire::from_field("cisco_ospf", "ospf"))
        .ensurable()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Ensure, ResourceInstance, ResourceRequest, ValidationMode};

    fn build(
        d: &ResourceDescriptor,
        request: &ResourceRequest,
    ) -> declarative::Result<ResourceInstance> {
        d.instance(&request.title, &request.properties, request.ensure, ValidationMode::FailFast)
    }

    fn interface(title: &str) -> ResourceRequest {
        ResourceRequest::new("cisco_interface", title)
    }

    fn ospf(title: &str) -> ResourceRequest {
        ResourceRequest::new("cisco_interface_ospf", title)
    }

    #[test]
    fn test_interface_name_is_lowercased() {
        let d = cisco_interface().unwrap();
        let inst = build(&d, &interface("Ethernet1/1")).unwrap();
        assert_eq!(inst.identity(), "ethernet1/1");
    }

    #[test]
    fn test_allowed_vlan_summary() {
        let d = cisco_interface().unwrap();
        let request = interface("ethernet1/1").with("switchport_trunk_allowed_vlan", "2-5, 3, 7, 8, 9");
        let inst = build(&d, &request).unwrap();
        assert_eq!(inst.properties()["switchport_trunk_allowed_vlan"], Value::from("2-5,7-9"));
        let p = d.attribute("switchport_trunk_allowed_vlan").unwrap();
        assert!(p.in_sync(&Value::from("2,3,4,5,7,8,9"), &inst.properties()["switchport_trunk_allowed_vlan"]));
    }

    #[test]
    fn test_speed() {
        let d = cisco_interface().unwrap();
        let p = d.attribute("speed").unwrap();
        assert_eq!(p.process(Value::Int(1000)).unwrap(), Value::Int(1000));
        assert_eq!(p.process(Value::from("auto")).unwrap(), Value::Keyword("auto".into()));
        assert!(p.process(Value::Int(25)).is_err());
    }

    #[test]
    fn test_stp_cost_takes_integers_and_keywords() {
        let d = cisco_interface().unwrap();
        let p = d.attribute("stp_cost").unwrap();
        assert_eq!(p.process(Value::Int(2000)).unwrap(), Value::Int(2000));
        assert_eq!(p.process(Value::from("2000")).unwrap(), Value::Int(2000));
        assert_eq!(p.process(Value::from("auto")).unwrap(), Value::Keyword("auto".into()));
        assert_eq!(p.process(Value::from("default")).unwrap(), Value::Default);
        assert!(p.process(Value::Int(0)).is_err());
        assert!(p.process(Value::from("cheap")).is_err());
    }

    #[test]
    fn test_stp_pairs_skip_defaults() {
        let d = cisco_interface().unwrap();
        let p = d.attribute("stp_vlan_cost").unwrap();
        let desired = p
            .process(Value::List(vec![
                Value::list(["1-4,6,8-12", "1000"]),
                Value::list(["1000", "default"]),
            ]))
            .unwrap();
        let live = Value::List(vec![Value::list(["1-4,6,8-12", "1000"])]);
        assert!(p.in_sync(&live, &desired));
    }

    #[test]
    fn test_pvlan_trunk_mapping_flat_and_nested() {
        let d = cisco_interface().unwrap();
        let p = d.attribute("switchport_pvlan_mapping_trunk").unwrap();

        let flat = p.process(Value::list(["44", "3-4,6,5"])).unwrap();
        assert_eq!(flat, Value::list(["44", "3-6"]));
        let live = Value::List(vec![Value::list(["44", "3-6"])]);
        assert!(p.in_sync(&live, &flat));

        let nested = p
            .process(Value::List(vec![Value::list(vec![44, 5]), Value::list(["99", "199"])]))
            .unwrap();
        let live = Value::List(vec![Value::list(["99", "199"]), Value::list(["44", "5"])]);
        assert!(p.in_sync(&live, &nested));
    }

    #[test]
    fn test_deprecated_association_uses_membership() {
        let d = cisco_interface().unwrap();
        let p = d.attribute("switchport_private_vlan_association_trunk").unwrap();
        let desired = p.process(Value::list(["44", "244"])).unwrap();
        assert!(p.in_sync(&Value::list(["10 110", "44 244"]), &desired));
        assert!(!p.in_sync(&Value::list(["44 245"]), &desired));
    }

    #[test]
    fn test_ipv4_address_and_mask() {
        let d = cisco_interface().unwrap();
        let ok = interface("ethernet1/1")
            .with("ipv4_address", "10.1.1.1")
            .with("ipv4_netmask_length", 24);
        assert!(build(&d, &ok).is_ok());

        let err = build(
            &d,
            &interface("ethernet1/1")
                .with("ipv4_address", "10.1.1.1")
                .with("ipv4_netmask_length", "default"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CrossField { ref rule, .. } if rule == "ipv4_address_mask"));

        let err = build(
            &d,
            &interface("ethernet1/1")
                .with("ipv4_address", "default")
                .with("ipv4_netmask_length", 24),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CrossField { .. }));

        let bad = interface("ethernet1/1").with("ipv4_address", "2001:db8::1");
        assert_eq!(build(&d, &bad).unwrap_err().attributes(), vec!["ipv4_address"]);
    }

    #[test]
    fn test_purge_config_stands_alone() {
        let d = cisco_interface().unwrap();
        assert!(build(&d, &interface("ethernet8/2").with("purge_config", true)).is_ok());
        let err = build(
            &d,
            &interface("ethernet8/2")
                .with("purge_config", true)
                .with("description", "x"),
        )
        .unwrap_err();
        assert_eq!(err.attributes(), vec!["description"]);
        assert!(build(&d, &interface("ethernet8/2").with("purge_config", false)).is_err());
    }

    #[test]
    fn test_vpc_id_range() {
        let d = cisco_interface().unwrap();
        assert!(build(&d, &interface("port-channel10").with("vpc_id", 4096)).is_ok());
        assert!(build(&d, &interface("port-channel10").with("vpc_id", 4097)).is_err());
    }

    #[test]
    fn test_interface_ospf_requires_area() {
        let d = cisco_interface_ospf().unwrap();
        let err = build(&d, &ospf("Ethernet1/2 Sample")).unwrap_err();
        assert_eq!(err.attributes(), vec!["area"]);

        let inst = build(&d, &ospf("Ethernet1/2 Sample").with("area", 200)).unwrap();
        assert_eq!(inst.identity(), "ethernet1/2 Sample");
        assert_eq!(inst.properties()["area"], Value::from("0.0.0.200"));

        let absent = ospf("ethernet1/2 Sample").ensure(Ensure::Absent);
        assert!(build(&d, &absent).is_ok());
    }

    #[test]
    fn test_message_digest_fields_travel_together() {
        let d = cisco_interface_ospf().unwrap();
        let base = ospf("ethernet1/2 Sample").with("area", "0.0.0.1");

        let err = build(&d, &base.clone().with("message_digest_password", "x")).unwrap_err();
        assert!(matches!(err, Error::CrossField { ref rule, .. } if rule == "forbidden_without"));

        let err = build(&d, &base.clone().with("message_digest_key_id", 1)).unwrap_err();
        assert!(matches!(err, Error::CrossField { ref rule, .. } if rule == "required_with"));

        let complete = base
            .with("message_digest_key_id", "1")
            .with("message_digest_algorithm_type", "default")
            .with("message_digest_encryption_type", "clear")
            .with("message_digest_password", "046E1803362E595C260E0B240619050A2D");
        let inst = build(&d, &complete).unwrap();
        assert_eq!(inst.properties()["message_digest_key_id"], Value::Int(1));
        assert_eq!(
            inst.parameters()["message_digest_algorithm_type"],
            Value::Keyword("md5".into())
        );
        assert_eq!(
            inst.parameters()["message_digest_encryption_type"],
            Value::Keyword("cleartext".into())
        );
    }

    #[test]
    fn test_passive_loopback_rejected() {
        let d = cisco_interface_ospf().unwrap();
        let request = ospf("Loopback0 Sample")
            .with("area", 0)
            .with("passive_interface", true);
        let err = build(&d, &request).unwrap_err();
        assert_eq!(err.attributes(), vec!["passive_interface"]);

        let request = ospf("ethernet1/1 Sample")
            .with("area", 0)
            .with("passive_interface", true);
        assert!(build(&d, &request).is_ok());
    }

    #[test]
    fn test_hello_interval_device_default() {
        let d = cisco_interface_ospf().unwrap();
        let inst = build(
            &d,
            &ospf("ethernet1/1 Sample")
                .with("area", 0)
                .with("hello_interval", "default"),
        )
        .unwrap();
        let p = d.attribute("hello_interval").unwrap();
        assert!(p.in_sync(&Value::Int(10), &inst.properties()["hello_interval"]));
    }
}
