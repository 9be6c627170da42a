//! VXLAN overlay types: VTEP to VNI mappings, EVPN VNIs and dot1q
//! encapsulation profiles

use crate::common::{flag, interface_name, keywords, text};
use declarative::{
    munge, rules, validate, PropertyDescriptor, ResourceDescriptor, Result, Rule, TitlePattern,
    Value,
};

/// `ASN2:NN`, `ASN4:NN` or `IPV4:NN`
const EXTENDED_COMMUNITY: &str = r"^(?:\d+\.\d+\.\d+\.)?\d+:\d+$";

/// `cisco_vxlan_vtep_vni`: a VNI mapped onto an NVE interface, titled
/// `"<interface> <vni>"`
pub fn cisco_vxlan_vtep_vni() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_vxlan_vtep_vni")
        .doc("Manages a Cisco VTEP to VNI mapping.")
        .key("interface")
        .key("vni")
        .pattern(TitlePattern::fields(r"(\S+)\s+(\d+)", &["interface", "vni"])?)
        .attribute(
            PropertyDescriptor::parameter("interface")
                .doc("Name of the nve interface.")
                .munge(interface_name),
        )
        .attribute(PropertyDescriptor::parameter("vni").doc("ID of the Virtual Network Identifier."))
        .attribute(
            PropertyDescriptor::parameter("assoc_vrf")
                .doc("Associate a VRF with the VNI.")
                .literals(&["true", "false"])
                .default_value(false),
        )
        .attribute(keywords("ingress_replication", &["bgp", "static", "default"]))
        .attribute(text("multicast_group").doc("Multicast group (range) of the VNI."))
        .attribute(
            PropertyDescriptor::property("peer_list")
                .doc("Static peers for ingress replication.")
                .array()
                .validator(validate::ip_address())
                .munge(munge::string_or_default),
        )
        .attribute(flag("suppress_arp"))
        .rule(rules::mutually_exclusive("multicast_group", "ingress_replication"))
        .rule(Rule::new("static_peers", |draft| {
            let is_static = draft
                .get("ingress_replication")
                .and_then(Value::as_str)
                == Some("static");
            if !is_static {
                draft.set("peer_list", Value::Default);
            }
            Ok(())
        }))
        .rule(Rule::new("assoc_vrf", |draft| {
            if draft.is_true("assoc_vrf") {
                for name in ["ingress_replication", "multicast_group", "suppress_arp", "peer_list"] {
                    draft.set(name, Value::Default);
                }
            }
            Ok(())
        }))
        .ensurable()
        .build()
}

fn route_targets(name: &str) -> Result<PropertyDescriptor> {
    Ok(PropertyDescriptor::property(name)
        .doc("Extended communities as a list or space-separated string.")
        .array()
        .literals(&["auto", "default"])
        .validator(validate::each_word(EXTENDED_COMMUNITY, "community")?)
        .munge(munge::words_or_default))
}

/// `cisco_evpn_vni`: EVPN route distinguisher and targets of one VNI
pub fn cisco_evpn_vni() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_evpn_vni")
        .doc("Manages a Cisco EVPN VNI.")
        .key("vni")
        .attribute(PropertyDescriptor::parameter("vni").munge(munge::integer))
        .attribute(
            PropertyDescriptor::property("route_distinguisher")
                .literals(&["auto", "default"])
                .validator(validate::matches(EXTENDED_COMMUNITY)?)
                .munge(munge::string_or_default),
        )
        .attribute(route_targets("route_target_both")?)
        .attribute(route_targets("route_target_export")?)
        .attribute(route_targets("route_target_import")?)
        .ensurable()
        .build()
}

/// `cisco_encapsulation`: a global VNI encapsulation profile
pub fn cisco_encapsulation() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_encapsulation")
        .doc("Manages a global VNI encapsulation profile (dot1q).")
        .key("encap")
        .attribute(PropertyDescriptor::parameter("encap").doc("Profile name of the encapsulation."))
        .attribute(
            PropertyDescriptor::property("dot1q_map")
                .doc("[dot1q_vlans, vnis], e.g. ['100-110,150', '5000-5010,6000'].")
                .array()
                .validator(validate::matches(r"^[\d,\- ]+$")?)
                .munge(munge::range_summary_or_default),
        )
        .ensurable()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Error, ResourceInstance, ResourceRequest, ValidationMode};

    fn build(d: &ResourceDescriptor, request: &ResourceRequest) -> declarative::Result<ResourceInstance> {
        d.instance(&request.title, &request.properties, request.ensure, ValidationMode::FailFast)
    }

    fn vtep(title: &str) -> ResourceRequest {
        ResourceRequest::new("cisco_vxlan_vtep_vni", title)
    }

    #[test]
    fn test_vtep_vni_identity() {
        let d = cisco_vxlan_vtep_vni().unwrap();
        let inst = build(&d, &vtep("NVE1 10000")).unwrap();
        assert_eq!(inst.identity(), "nve1 10000");
        assert_eq!(inst.parameters()["assoc_vrf"], Value::Bool(false));
        assert!(matches!(build(&d, &vtep("nve1 blue")), Err(Error::NoMatch { .. })));
    }

    #[test]
    fn test_multicast_or_ingress_replication() {
        let d = cisco_vxlan_vtep_vni().unwrap();
        let request = vtep("nve1 10000")
            .with("multicast_group", "224.1.1.1")
            .with("ingress_replication", "bgp");
        let err = build(&d, &request).unwrap_err();
        assert_eq!(err.attributes(), vec!["multicast_group", "ingress_replication"]);
    }

    #[test]
    fn test_peer_list_needs_static_replication() {
        let d = cisco_vxlan_vtep_vni().unwrap();
        let request = vtep("nve1 10000")
            .with("ingress_replication", "static")
            .with("peer_list", vec!["1.1.1.1", "6.6.6.6", "3.3.3.3"]);
        let inst = build(&d, &request).unwrap();
        let peers = d.attribute("peer_list").unwrap();
        assert!(peers.in_sync(
            &Value::list(["1.1.1.1", "3.3.3.3", "6.6.6.6"]),
            &inst.properties()["peer_list"]
        ));

        let request = vtep("nve1 10000")
            .with("ingress_replication", "bgp")
            .with("peer_list", vec!["1.1.1.1"]);
        let inst = build(&d, &request).unwrap();
        assert_eq!(inst.properties()["peer_list"], Value::Default);

        let bad = vtep("nve1 10000")
            .with("ingress_replication", "static")
            .with("peer_list", vec!["1.1.1"]);
        assert_eq!(build(&d, &bad).unwrap_err().attributes(), vec!["peer_list"]);
    }

    #[test]
    fn test_assoc_vrf_resets_replication() {
        let d = cisco_vxlan_vtep_vni().unwrap();
        let request = vtep("nve1 10000")
            .with("assoc_vrf", true)
            .with("suppress_arp", true)
            .with("ingress_replication", "static");
        let inst = build(&d, &request).unwrap();
        for name in ["ingress_replication", "multicast_group", "suppress_arp", "peer_list"] {
            assert_eq!(inst.properties()[name], Value::Default, "{name}");
        }
    }

    #[test]
    fn test_evpn_route_targets() {
        let d = cisco_evpn_vni().unwrap();
        let request = ResourceRequest::new("cisco_evpn_vni", "4096")
            .with("route_distinguisher", "auto")
            .with("route_target_both", vec!["1.2.3.4:55", "2:2", "55:33", "auto"])
            .with("route_target_import", "2:2 3:3");
        let inst = build(&d, &request).unwrap();
        assert_eq!(inst.identity(), "4096");
        assert_eq!(inst.properties()["route_distinguisher"], Value::Keyword("auto".into()));
        assert_eq!(inst.properties()["route_target_import"], Value::list(["2:2", "3:3"]));

        let both = d.attribute("route_target_both").unwrap();
        let live = Value::List(vec![
            Value::Keyword("auto".into()),
            Value::from("55:33"),
            Value::from("2:2"),
            Value::from("1.2.3.4:55"),
        ]);
        assert!(both.in_sync(&live, &inst.properties()["route_target_both"]));

        let bad = ResourceRequest::new("cisco_evpn_vni", "4096").with("route_distinguisher", "55");
        assert_eq!(build(&d, &bad).unwrap_err().attributes(), vec!["route_distinguisher"]);
    }

    #[test]
    fn test_dot1q_map() {
        let d = cisco_encapsulation().unwrap();
        let request = ResourceRequest::new("cisco_encapsulation", "cisco")
            .with("dot1q_map", vec!["100-110, 150", "5100-5110,6000"]);
        let inst = build(&d, &request).unwrap();
        assert_eq!(
            inst.properties()["dot1q_map"],
            Value::list(["100-110,150", "5100-5110,6000"])
        );

        let reset = ResourceRequest::new("cisco_encapsulation", "cisco").with("dot1q_map", "default");
        assert_eq!(build(&d, &reset).unwrap().properties()["dot1q_map"], Value::Default);

        let bad = ResourceRequest::new("cisco_encapsulation", "cisco").with("dot1q_map", vec!["vlan10"]);
        assert!(build(&d, &bad).is_err());
    }
}
