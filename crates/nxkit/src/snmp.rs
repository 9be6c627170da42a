//! SNMP groups and SNMPv3 users

use declarative::{
    munge, validate, Autorequire, Comparison, PropertyDescriptor, ResourceDescriptor, Result,
    TitlePattern,
};

/// `cisco_snmp_group`: a named SNMP group (role)
pub fn cisco_snmp_group() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_snmp_group")
        .doc("Manages an SNMP group.")
        .key("group")
        .attribute(PropertyDescriptor::parameter("group").validator(validate::string()))
        .ensurable()
        .build()
}

/// `cisco_snmp_user`: an SNMPv3 user, titled `"<user>"` for a local user or
/// `"<user> <engine_id>"` for a remote one.
///
/// Passwords are write-only on the device, so they never report drift.
pub fn cisco_snmp_user() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_snmp_user")
        .doc("Manages an SNMP user on a Cisco SNMP server.")
        .key("user")
        .key("engine_id")
        .pattern(TitlePattern::fields(r"(\S+)(?:\s+(\S+))?", &["user", "engine_id"])?)
        .attribute(
            PropertyDescriptor::parameter("user")
                .doc("Name of the SNMP user.")
                .validator(validate::matches(r"^\w+$")?),
        )
        .attribute(
            PropertyDescriptor::parameter("engine_id")
                .doc("Empty for a local user, otherwise 5 to 32 octets separated by colons.")
                .validator(validate::matches(r"^$|^[0-9]{1,3}(?::[0-9]{1,3}){4,31}$")?),
        )
        .attribute(
            PropertyDescriptor::property("groups")
                .doc("Groups the user belongs to.")
                .array()
                .munge(munge::string_or_default),
        )
        .attribute(PropertyDescriptor::property("auth_protocol").literals(&["md5", "sha", "none"]))
        .attribute(
            PropertyDescriptor::property("auth_password")
                .validator(validate::string())
                .comparison(Comparison::Ignore),
        )
        .attribute(PropertyDescriptor::property("priv_protocol").literals(&["aes128", "des", "none"]))
        .attribute(
            PropertyDescriptor::property("priv_password")
                .validator(validate::string())
                .comparison(Comparison::Ignore),
        )
        .attribute(
            PropertyDescriptor::parameter("localized_key")
                .doc("Passwords are given in localized key format rather than cleartext.")
                .literals(&["true", "false"])
                .default_value(false),
        )
        .autorequire(Autorequire::from_field("cisco_snmp_group", "groups"))
        .ensurable()
        .build()
}
