//! BGP router and neighbor address-family types

use crate::common::{bounded, flag, keywords, number, text, vrf};
use declarative::{
    munge, validate, Comparison, PropertyDescriptor, ResourceDescriptor, Result, TitlePattern, Value,
};
use std::net::Ipv4Addr;

/// ASPLAIN (`65000`) or ASDOT (`1.5`) notation
const ASN: &str = r"(\d+|\d+\.\d+)";

fn asn_validator() -> Result<validate::ValidateFn> {
    validate::matches(&format!("^{ASN}$"))
}

/// A cluster id is either a dotted quad or a plain integer
fn check_cluster_id(value: &Value) -> std::result::Result<(), String> {
    if value.is_default_literal() {
        return Ok(());
    }
    let valid = match value {
        Value::Int(n) => *n >= 0,
        Value::Str(s) if s.contains('.') => s.parse::<Ipv4Addr>().is_ok(),
        Value::Str(s) => s.parse::<u32>().is_ok(),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err("Cluster-ID is not a valid IP address or Integer".to_string())
    }
}

/// `cisco_bgp`: a BGP router instance, one per `(asn, vrf)`.
///
/// Titles are `"<asn>"` or `"<asn> <vrf>"`; any other single word binds
/// only `name`, in which case `asn` must be supplied explicitly.
pub fn cisco_bgp() -> Result<ResourceDescriptor> {
    let mut builder = ResourceDescriptor::builder("cisco_bgp")
        .doc("Manages the BGP router configuration of one VRF.")
        .key("asn")
        .key("vrf")
        .pattern(TitlePattern::fields(ASN, &["asn"])?)
        .pattern(TitlePattern::fields(&format!(r"{ASN} (\S+)"), &["asn", "vrf"])?)
        .pattern(TitlePattern::fields(r"(\S+)", &["name"])?)
        .attribute(PropertyDescriptor::parameter("name"))
        .attribute(
            PropertyDescriptor::parameter("asn")
                .doc("BGP autonomous system number, in ASPLAIN or ASDOT notation.")
                .validator(asn_validator()?)
                .munge(munge::asplain),
        )
        .attribute(vrf())
        .attribute(
            text("router_id")
                .doc("Router Identifier (ID) of the BGP router instance.")
                .validator(validate::ip_address()),
        )
        .attribute(
            text("cluster_id")
                .doc("Route Reflector Cluster-ID.")
                .validate(check_cluster_id),
        )
        .attribute(
            text("confederation_id")
                .doc("Routing domain confederation AS.")
                .validator(asn_validator()?),
        )
        .attribute(
            text("confederation_peers")
                .doc("Space-separated AS confederation peers.")
                .validator(validate::each_word(&format!("^{ASN}$"), "confederation peer")?),
        );

    for name in [
        "shutdown",
        "suppress_fib_pending",
        "log_neighbor_changes",
        "bestpath_always_compare_med",
        "bestpath_aspath_multipath_relax",
        "bestpath_compare_routerid",
        "bestpath_cost_community_ignore",
        "bestpath_med_confed",
        "bestpath_med_non_deterministic",
        "timer_bestpath_limit_always",
        "graceful_restart",
        "graceful_restart_helper",
    ] {
        builder = builder.attribute(flag(name));
    }

    builder
        .attribute(number("timer_bestpath_limit").device_default(300))
        .attribute(number("graceful_restart_timers_restart").device_default(120))
        .attribute(number("graceful_restart_timers_stalepath_time").device_default(300))
        .attribute(bounded("timer_bgp_keepalive", 0, 3600).device_default(60))
        .attribute(bounded("timer_bgp_holdtime", 0, 3600).device_default(180))
        .ensurable()
        .build()
}

/// `cisco_bgp_neighbor_af`: address-family settings of one BGP neighbor.
///
/// The full title is `"<asn> <vrf> <neighbor> <afi> <safi>"`; shorter
/// titles bind a prefix of those fields and leave the rest to explicit
/// attributes.
pub fn cisco_bgp_neighbor_af() -> Result<ResourceDescriptor> {
    let mut builder = ResourceDescriptor::builder("cisco_bgp_neighbor_af")
        .doc("Manages the address-family configuration of a BGP neighbor.")
        .key("asn")
        .key("vrf")
        .key("neighbor")
        .key("afi")
        .key("safi")
        .pattern(TitlePattern::fields(ASN, &["asn"])?)
        .pattern(TitlePattern::fields(&format!(r"{ASN} (\S+)"), &["asn", "vrf"])?)
        .pattern(TitlePattern::fields(
            &format!(r"{ASN} (\S+) (\S+)"),
            &["asn", "vrf", "neighbor"],
        )?)
        .pattern(TitlePattern::fields(
            &format!(r"{ASN} (\S+) (\S+) (\S+)"),
            &["asn", "vrf", "neighbor", "afi"],
        )?)
        .pattern(TitlePattern::fields(
            &format!(r"{ASN} (\S+) (\S+) (\S+) (\S+)"),
            &["asn", "vrf", "neighbor", "afi", "safi"],
        )?)
        .pattern(TitlePattern::fields(r"(\S+)", &["name"])?)
        .attribute(PropertyDescriptor::parameter("name"))
        .attribute(
            PropertyDescriptor::parameter("asn")
                .doc("BGP autonomous system number, in ASPLAIN or ASDOT notation.")
                .validator(asn_validator()?)
                .munge(munge::string_or_default),
        )
        .attribute(vrf())
        .attribute(
            PropertyDescriptor::parameter("neighbor")
                .doc("Neighbor address, IPv4 or IPv6, mask optional.")
                .munge(munge::network_address),
        )
        .attribute(PropertyDescriptor::parameter("afi").literals(&["ipv4", "ipv6", "l2vpn"]))
        .attribute(
            PropertyDescriptor::parameter("safi").literals(&["unicast", "multicast", "evpn"]),
        );

    // [advertise-map, exist-map]: position matters
    for name in ["advertise_map_exist", "advertise_map_non_exist"] {
        builder = builder.attribute(
            PropertyDescriptor::property(name)
                .array()
                .munge(munge::string_or_default)
                .comparison(Comparison::Exact),
        );
    }

    for name in [
        "allowas_in",
        "as_override",
        "default_originate",
        "disable_peer_as_check",
        "max_prefix_warning",
        "next_hop_self",
        "next_hop_third_party",
        "route_reflector_client",
        "suppress_inactive",
    ] {
        builder = builder.attribute(flag(name));
    }

    for name in [
        "default_originate_route_map",
        "filter_list_in",
        "filter_list_out",
        "prefix_list_in",
        "prefix_list_out",
        "route_map_in",
        "route_map_out",
        "soo",
        "unsuppress_map",
    ] {
        builder = builder.attribute(text(name));
    }

    for name in ["allowas_in_max", "max_prefix_interval", "max_prefix_limit", "max_prefix_threshold"] {
        builder = builder.attribute(number(name));
    }

    builder
        .attribute(keywords("additional_paths_receive", &["enable", "disable", "inherit"]))
        .attribute(keywords("additional_paths_send", &["enable", "disable", "inherit"]))
        .attribute(keywords(
            "send_community",
            &["none", "both", "extended", "standard", "default"],
        ))
        .attribute(keywords("soft_reconfiguration_in", &["enable", "always", "inherit"]))
        .attribute(bounded("weight", 0, 65535))
        .ensurable()
        .build()
}
