//! Global spanning-tree type

use crate::common::{flag, keywords, number, text};
use declarative::{ResourceDescriptor, Result, TitlePattern};

/// `cisco_stp_global`: the device-wide spanning-tree settings.
///
/// There is exactly one instance, titled `default`, and it cannot be
/// removed.
pub fn cisco_stp_global() -> Result<ResourceDescriptor> {
    let mut builder = ResourceDescriptor::builder("cisco_stp_global")
        .doc("Manages spanning tree global parameters.")
        .pattern(TitlePattern::literal("default")?);

    for name in ["bpdufilter", "bpduguard", "bridge_assurance", "fcoe", "loopguard"] {
        builder = builder.attribute(flag(name));
    }
    for name in [
        "domain",
        "mst_forward_time",
        "mst_hello_time",
        "mst_max_age",
        "mst_max_hops",
        "mst_revision",
    ] {
        builder = builder.attribute(number(name));
    }

    builder
        .attribute(keywords("mode", &["mst", "rapid-pvst", "default"]))
        .attribute(text("mst_name"))
        .attribute(keywords("pathcost", &["long", "short", "default"]))
        .build()
}
