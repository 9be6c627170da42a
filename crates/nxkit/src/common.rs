//! Attribute shapes shared by the NX-OS resource types
//!
//! Most NX-OS attributes fall into a handful of shapes: a boolean that can
//! be reset to the device default, an integer or `default`, free text or
//! `default`, a fixed set of keywords. These helpers declare them once.

use declarative::munge::{self, MungeResult};
use declarative::{validate, PropertyDescriptor, Value};
use std::net::Ipv4Addr;

/// `true`, `false` or `default`
pub fn flag(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::property(name).literals(&["true", "false", "default"])
}

/// `true` or `false`, with no device default
pub fn switch(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::property(name).literals(&["true", "false"])
}

/// An integer or `default`
pub fn number(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::property(name).munge(munge::integer_or_default)
}

/// An integer in `low..=high`, or `default`
pub fn bounded(name: &str, low: i64, high: i64) -> PropertyDescriptor {
    number(name).validator(validate::integer_in(low, high))
}

/// Free text or `default`
pub fn text(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::property(name).munge(munge::string_or_default)
}

/// One of a fixed set of keywords
pub fn keywords(name: &str, allowed: &[&str]) -> PropertyDescriptor {
    PropertyDescriptor::property(name).literals(allowed)
}

/// A VRF name; the VRF called `default` is a real VRF, not the sentinel
pub fn vrf() -> PropertyDescriptor {
    PropertyDescriptor::parameter("vrf")
        .doc("VRF name. 'default' names the default VRF.")
        .validate(|value| match value.as_str() {
            Some(s) if !s.is_empty() && !s.contains(char::is_whitespace) => Ok(()),
            _ => Err("must be a single word".to_string()),
        })
        .default_value("default")
}

/// Name parameter of a singleton-style type whose only valid title is `default`
pub fn default_name() -> PropertyDescriptor {
    PropertyDescriptor::parameter("name")
        .doc("Only 'default' is accepted.")
        .validator(validate::one_of(&["default"]))
}

/// Interface names are case-insensitive on the device
pub fn interface_name(value: Value) -> MungeResult {
    match value {
        Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
        other => Err(format!("'{other}' is not an interface name")),
    }
}

/// A `[first, second]` pair, or `default`.
///
/// Pair elements are kept as text so that `[20, 21]` and `["20", "21"]`
/// compare equal.
pub fn pair_or_default(value: Value) -> MungeResult {
    if value.is_default_literal() {
        return Ok(Value::Default);
    }
    match value {
        Value::List(items) if items.len() == 2 => items
            .into_iter()
            .map(|item| {
                item.literal_text()
                    .map(Value::Str)
                    .ok_or_else(|| "pair elements must be single values".to_string())
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        other => Err(format!("'{other}' must be a pair such as [first, second]")),
    }
}

/// A list property whose elements are `[first, second]` pairs
pub fn pairs(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::property(name)
        .array()
        .munge(pair_or_default)
}

/// Accept an OSPF area as an integer or dotted quad
pub fn check_area(value: &Value) -> Result<(), String> {
    let valid = match value {
        Value::Int(n) => u32::try_from(*n).is_ok(),
        Value::Str(s) => s.parse::<u32>().is_ok() || s.parse::<Ipv4Addr>().is_ok(),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("area [{value}] must be a valid ip address or integer"))
    }
}

/// OSPF areas are shown by the device in dotted-quad form: `200` is `0.0.0.200`
pub fn area_id(value: Value) -> MungeResult {
    let text = match value {
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s,
        other => return Err(format!("'{other}' is not an area")),
    };
    if text.contains('.') {
        return Ok(Value::Str(text));
    }
    text.parse::<u32>()
        .map(|n| Value::Str(Ipv4Addr::from(n).to_string()))
        .map_err(|_| format!("'{text}' is not an area"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag() {
        let p = flag("shutdown");
        assert_eq!(p.process(Value::from("true")).unwrap(), Value::Bool(true));
        assert_eq!(p.process(Value::from("default")).unwrap(), Value::Default);
        assert!(p.process(Value::from("yes")).is_err());
        assert!(switch("passive").process(Value::from("default")).is_err());
    }

    #[test]
    fn test_bounded() {
        let p = bounded("vpc_id", 1, 4096);
        assert_eq!(p.process(Value::from("200")).unwrap(), Value::Int(200));
        assert_eq!(p.process(Value::from("default")).unwrap(), Value::Default);
        assert!(p.process(Value::Int(5000)).is_err());
    }

    #[test]
    fn test_vrf_keeps_default_as_name() {
        let p = vrf();
        assert_eq!(p.process(Value::from("default")).unwrap(), Value::from("default"));
        assert!(p.process(Value::from("two words")).is_err());
        assert_eq!(p.default(), Some(&Value::from("default")));
    }

    #[test]
    fn test_pair_or_default() {
        assert_eq!(
            pair_or_default(Value::list(vec![20, 21])).unwrap(),
            Value::list(["20", "21"])
        );
        assert_eq!(pair_or_default(Value::from("default")).unwrap(), Value::Default);
        assert!(pair_or_default(Value::from("20")).is_err());
        assert!(pair_or_default(Value::list(vec![1, 2, 3])).is_err());
    }

    #[test]
    fn test_pairs_property() {
        let p = pairs("vlan_mapping");
        let raw = Value::List(vec![Value::list(vec![20, 21]), Value::list(["30", "31"])]);
        let canonical = p.process(raw).unwrap();
        assert_eq!(
            canonical,
            Value::List(vec![Value::list(["20", "21"]), Value::list(["30", "31"])])
        );
        assert_eq!(p.process(Value::from("default")).unwrap(), Value::Default);
    }

    #[test]
    fn test_area_id() {
        assert_eq!(area_id(Value::Int(200)).unwrap(), Value::from("0.0.0.200"));
        assert_eq!(area_id(Value::from("10")).unwrap(), Value::from("0.0.0.10"));
        assert_eq!(area_id(Value::from("1.1.1.1")).unwrap(), Value::from("1.1.1.1"));
        assert!(check_area(&Value::from("backbone")).is_err());
        assert!(check_area(&Value::from("0.0.0.1")).is_ok());
    }

    #[test]
    fn test_interface_name() {
        assert_eq!(
            interface_name(Value::from("Ethernet1/1")).unwrap(),
            Value::from("ethernet1/1")
        );
    }
}
