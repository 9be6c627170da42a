//! AAA types: login authentication, TACACS+ server groups and login
//! authorization services

use crate::common::{default_name, flag, keywords, number, text};
use declarative::{
    munge, rules, validate, Autorequire, PropertyDescriptor, ResourceDescriptor, Result,
};

/// Login authentication methods; the device accepts at most one
const AUTH_METHODS: [&str; 4] = ["ascii_authentication", "chap", "mschap", "mschapv2"];

/// `cisco_aaa_authentication_login`: global login authentication settings
pub fn cisco_aaa_authentication_login() -> Result<ResourceDescriptor> {
    let mut builder = ResourceDescriptor::builder("cisco_aaa_authentication_login")
        .doc("Manages AAA Authentication Login configuration.")
        .key("name")
        .attribute(default_name());

    for name in AUTH_METHODS.iter().copied().chain(["error_display"]) {
        builder = builder.attribute(flag(name));
    }

    builder
        .rule(rules::at_most_one_true(
            &AUTH_METHODS,
            "Only one authentication login method can be configured at a time",
        ))
        .build()
}

/// `cisco_aaa_group_tacacs`: a named group of TACACS+ servers
pub fn cisco_aaa_group_tacacs() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_aaa_group_tacacs")
        .doc("Manages an AAA TACACS+ server group.")
        .key("group")
        .attribute(
            PropertyDescriptor::parameter("group")
                .doc("Name of the aaa group TACACS instance.")
                .validator(validate::string()),
        )
        .attribute(number("deadtime").doc("Deadtime interval for this group, in minutes."))
        .attribute(
            PropertyDescriptor::property("server_hosts")
                .doc("TACACS+ server hosts associated with this group.")
                .array()
                .validator(validate::string())
                .munge(munge::string_or_default),
        )
        .attribute(
            text("source_interface")
                .doc("Source interface for TACACS+ servers in this group.")
                .munge(munge::lowercase_or_default),
        )
        .attribute(text("vrf_name").doc("VRF used to contact this group's servers."))
        .ensurable()
        .build()
}

/// `cisco_aaa_authorization_login_cfg_svc`: authorization for the
/// `console` or `default` login service
pub fn cisco_aaa_authorization_login_cfg_svc() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_aaa_authorization_login_cfg_svc")
        .doc("Manages configuration for Authorization Login Config Service.")
        .key("name")
        .attribute(
            PropertyDescriptor::parameter("name")
                .doc("Name of the config login service.")
                .validator(validate::one_of(&["console", "default"])),
        )
        .attribute(
            PropertyDescriptor::property("groups")
                .doc("TACACS+ groups, as a list or a space-separated string.")
                .array()
                .munge(munge::words_or_default),
        )
        .attribute(keywords("method", &["local", "unselected", "default"]))
        .autorequire(Autorequire::fixed("cisco_tacacs_server", "default"))
        .autorequire(Autorequire::from_field("cisco_aaa_group_tacacs", "groups"))
        .ensurable()
        .build()
}
