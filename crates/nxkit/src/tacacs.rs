//! Global TACACS+ server settings

use crate::common::{default_name, number, switch, text};
use declarative::{rules, PropertyDescriptor, ResourceDescriptor, Result};

/// `cisco_tacacs_server`: global TACACS+ settings, titled `default`
pub fn cisco_tacacs_server() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_tacacs_server")
        .doc("Manages the global TACACS+ server configuration.")
        .key("name")
        .attribute(default_name())
        .attribute(number("timeout").doc("Global timeout interval for TACACS+ servers, in seconds."))
        .attribute(switch("directed_request"))
        .attribute(number("deadtime").doc("Global deadtime interval for TACACS+ servers, in minutes."))
        .attribute(
            PropertyDescriptor::parameter("encryption_type")
                .doc("Global preshared key type for TACACS+ servers.")
                .literals(&["clear", "encrypted", "none", "default"]),
        )
        .attribute(text("encryption_password").doc("Global TACACS+ servers preshared key."))
        .attribute(text("source_interface"))
        .rule(rules::required_unless(
            "encryption_password",
            "encryption_type",
            &["none"],
        ))
        .ensurable()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Error, ResourceRequest, ValidationMode, Value};

    fn build(request: &ResourceRequest) -> declarative::Result<declarative::ResourceInstance> {
        cisco_tacacs_server()?.instance(
            &request.title,
            &request.properties,
            request.ensure,
            ValidationMode::FailFast,
        )
    }

    #[test]
    fn test_encryption_password_required() {
        let request = ResourceRequest::new("cisco_tacacs_server", "default").with("encryption_type", "clear");
        let err = build(&request).unwrap_err();
        assert!(matches!(err, Error::CrossField { .. }));
        assert!(err.attributes().contains(&"encryption_password"));

        let request = request.with("encryption_password", "s3cret");
        let inst = build(&request).unwrap();
        assert_eq!(inst.parameters()["encryption_type"], Value::Keyword("clear".into()));
        assert_eq!(inst.properties()["encryption_password"], Value::from("s3cret"));
    }

    #[test]
    fn test_no_encryption_needs_no_password() {
        let request = ResourceRequest::new("cisco_tacacs_server", "default")
            .with("encryption_type", "none")
            .with("timeout", "10")
            .with("directed_request", true);
        let inst = build(&request).unwrap();
        assert_eq!(inst.properties()["timeout"], Value::Int(10));
        assert!(build(&ResourceRequest::new("cisco_tacacs_server", "default")).is_ok());
    }

    #[test]
    fn test_directed_request_has_no_default() {
        let request = ResourceRequest::new("cisco_tacacs_server", "default").with("directed_request", "default");
        assert!(build(&request).is_err());
    }
}
