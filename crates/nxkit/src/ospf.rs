//! OSPF router and area types

use crate::common::{area_id, check_area, flag, keywords, number, text, vrf};
use declarative::munge::MungeResult;
use declarative::{
    PropertyDescriptor, ResourceDescriptor, Result, Rule, TitlePattern, Value, Violation,
};

/// `cisco_ospf`: an OSPF router instance
pub fn cisco_ospf() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_ospf")
        .doc("Manages an OSPF router instance.")
        .key("name")
        .attribute(PropertyDescriptor::parameter("name").doc("Name of the OSPF router instance."))
        .ensurable()
        .build()
}

/// An area range entry `[prefix, not_advertise, cost]`, kept as text
fn range_entry(value: Value) -> MungeResult {
    if value.is_default_literal() {
        return Ok(Value::Default);
    }
    match value {
        Value::List(items) if !items.is_empty() => Ok(Value::List(
            items
                .iter()
                .map(|item| Value::Str(item.to_string()))
                .collect(),
        )),
        other => Err(format!("'{other}' must match format [[ip, not_advertise, cost], ...]")),
    }
}

/// `cisco_ospf_area`: one area of an OSPF router in one VRF.
///
/// Titled `"<ospf> <vrf> <area>"`; the area may be written as an integer
/// or a dotted quad and is canonicalized to the dotted quad.
pub fn cisco_ospf_area() -> Result<ResourceDescriptor> {
    ResourceDescriptor::builder("cisco_ospf_area")
        .doc("Manages an area for an OSPF router.")
        .key("ospf")
        .key("vrf")
        .key("area")
        .pattern(TitlePattern::fields(r"(\S+) (\S+) (\S+)", &["ospf", "vrf", "area"])?)
        .attribute(PropertyDescriptor::parameter("ospf"))
        .attribute(vrf())
        .attribute(
            PropertyDescriptor::parameter("area")
                .validate(check_area)
                .munge(area_id),
        )
        .attribute(keywords("authentication", &["clear_text", "md5", "default"]))
        .attribute(number("default_cost"))
        .attribute(text("filter_list_in"))
        .attribute(text("filter_list_out"))
        .attribute(
            PropertyDescriptor::property("range")
                .doc("Summary ranges as [[ip, not_advertise, cost], ...].")
                .array()
                .munge(range_entry),
        )
        .attribute(flag("stub"))
        .attribute(flag("stub_no_summary"))
        .rule(Rule::new("stub_no_summary", |draft| {
            if draft.is_true("stub_no_summary") && !draft.is_true("stub") {
                Err(Violation::new(
                    &["stub", "stub_no_summary"],
                    "stub MUST be true when stub_no_summary is true",
                ))
            } else {
                Ok(())
            }
        }))
        .ensurable()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Error, ResourceRequest, ValidationMode};

    fn build(request: &ResourceRequest) -> declarative::Result<declarative::ResourceInstance> {
        cisco_ospf_area()?.instance(
            &request.title,
            &request.properties,
            request.ensure,
            ValidationMode::FailFast,
        )
    }

    #[test]
    fn test_area_identity_is_dotted() {
        let a = build(&ResourceRequest::new("cisco_ospf_area", "green default 200")).unwrap();
        let b = build(&ResourceRequest::new("cisco_ospf_area", "green default 0.0.0.200")).unwrap();
        assert_eq!(a.identity(), "green default 0.0.0.200");
        assert_eq!(a.identity(), b.identity());
    }

    #[test]
    fn test_area_rejects_words() {
        let err = build(&ResourceRequest::new("cisco_ospf_area", "green default backbone")).unwrap_err();
        assert_eq!(err.attributes(), vec!["area"]);
        let err = build(&ResourceRequest::new("cisco_ospf_area", "green 10")).unwrap_err();
        assert!(matches!(err, Error::NoMatch { .. }));
    }

    #[test]
    fn test_stub_no_summary_needs_stub() {
        let request = ResourceRequest::new("cisco_ospf_area", "green default 1").with("stub_no_summary", true);
        let err = build(&request).unwrap_err();
        assert!(err.to_string().contains("stub MUST be true"));
        assert!(build(&request.with("stub", true)).is_ok());
    }

    #[test]
    fn test_range_entries() {
        let request = ResourceRequest::new("cisco_ospf_area", "green default 1").with(
            "range",
            Value::List(vec![
                Value::list(vec![Value::from("10.3.0.0/16"), Value::from("not_advertise"), Value::Int(23)]),
                Value::list(vec![Value::from("10.3.3.0/24"), Value::Int(450)]),
            ]),
        );
        let inst = build(&request).unwrap();
        let desired = &inst.properties()["range"];
        let live = Value::List(vec![
            Value::list(["10.3.3.0/24", "450"]),
            Value::list(["10.3.0.0/16", "not_advertise", "23"]),
        ]);
        let d = cisco_ospf_area().unwrap();
        assert!(d.attribute("range").unwrap().in_sync(&live, desired));
    }

    #[test]
    fn test_ospf_router() {
        let d = cisco_ospf().unwrap();
        let inst = d
            .instance("Sample", &ResourceRequest::new("cisco_ospf", "Sample").properties, None, ValidationMode::FailFast)
            .unwrap();
        assert_eq!(inst.identity(), "Sample");
    }
}
