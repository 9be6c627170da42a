//! Resource-level rules - checks that span several attributes
//!
//! Rules run after every attribute has been validated and munged. A rule
//! sees the whole set of values and may reject the combination or rewrite
//! values (forcing siblings to `false` or to the sentinel).

use crate::types::{Ensure, ResourceRef, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Canonical values of one resource while rules run
#[derive(Debug, Clone)]
pub struct Draft {
    resource: ResourceRef,
    ensure: Ensure,
    values: IndexMap<String, Value>,
}

impl Draft {
    /// Create a draft over munged values
    pub fn new(resource: ResourceRef, ensure: Ensure, values: IndexMap<String, Value>) -> Self {
        Self {
            resource,
            ensure,
            values,
        }
    }

    /// The resource under construction
    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Desired existence
    pub fn ensure(&self) -> Ensure {
        self.ensure
    }

    /// Value of an attribute, if set
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if an attribute is set
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Check if an attribute is set to `true`
    pub fn is_true(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_true)
    }

    /// Set or replace an attribute value
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Names of the attributes that are set
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of attributes set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the draft, returning its values
    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }
}

/// A rejected combination of values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Attributes involved
    pub properties: Vec<String>,
    /// Human-readable explanation
    pub message: String,
}

impl Violation {
    /// Create a violation
    pub fn new(properties: &[&str], message: impl Into<String>) -> Self {
        Self {
            properties: properties.iter().map(|p| (*p).to_string()).collect(),
            message: message.into(),
        }
    }
}

/// Shared rule function
pub type RuleFn = Arc<dyn Fn(&mut Draft) -> Result<(), Violation> + Send + Sync>;

/// A named resource-level rule
#[derive(Clone)]
pub struct Rule {
    name: String,
    check: RuleFn,
}

impl Rule {
    /// Create a rule from a closure
    pub fn new(
        name: &str,
        check: impl Fn(&mut Draft) -> Result<(), Violation> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            check: Arc::new(check),
        }
    }

    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the rule
    pub fn apply(&self, draft: &mut Draft) -> Result<(), Violation> {
        (self.check)(draft)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

/// At most one of `names` may be `true`.
///
/// When exactly one is `true`, the others are forced to `false`.
pub fn at_most_one_true(names: &[&str], message: &str) -> Rule {
    let names = owned(names);
    let message = message.to_string();
    Rule::new("at_most_one_true", move |draft| {
        let enabled: Vec<&str> = names
            .iter()
            .filter(|n| draft.is_true(n))
            .map(String::as_str)
            .collect();
        match enabled.len() {
            0 => Ok(()),
            1 => {
                let chosen = enabled[0].to_string();
                for name in names.iter().filter(|n| **n != chosen) {
                    draft.set(name, Value::Bool(false));
                }
                Ok(())
            }
            _ => Err(Violation::new(&enabled, message.clone())),
        }
    })
}

/// `a` and `b` cannot both be set
pub fn mutually_exclusive(a: &str, b: &str) -> Rule {
    let (a, b) = (a.to_string(), b.to_string());
    Rule::new("mutually_exclusive", move |draft| {
        if draft.is_set(&a) && draft.is_set(&b) {
            Err(Violation::new(
                &[a.as_str(), b.as_str()],
                format!("'{a}' and '{b}' cannot both be set"),
            ))
        } else {
            Ok(())
        }
    })
}

/// When `trigger` is set, every one of `required` must be set too
pub fn required_with(trigger: &str, required: &[&str]) -> Rule {
    let trigger = trigger.to_string();
    let required = owned(required);
    Rule::new("required_with", move |draft| {
        if !draft.is_set(&trigger) {
            return Ok(());
        }
        let missing: Vec<&str> = required
            .iter()
            .filter(|r| !draft.is_set(r))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Violation::new(
                &missing,
                format!("'{trigger}' also requires: {}", missing.join(", ")),
            ))
        }
    })
}

/// When `trigger` is not set, none of `dependents` may be set
pub fn forbidden_without(trigger: &str, dependents: &[&str]) -> Rule {
    let trigger = trigger.to_string();
    let dependents = owned(dependents);
    Rule::new("forbidden_without", move |draft| {
        if draft.is_set(&trigger) {
            return Ok(());
        }
        let present: Vec<&str> = dependents
            .iter()
            .filter(|d| draft.is_set(d))
            .map(String::as_str)
            .collect();
        if present.is_empty() {
            Ok(())
        } else {
            Err(Violation::new(
                &present,
                format!("{} cannot be set without '{trigger}'", present.join(", ")),
            ))
        }
    })
}

/// `name` must be set when the resource is present
pub fn required_when_present(name: &str) -> Rule {
    let name = name.to_string();
    Rule::new("required_when_present", move |draft| {
        if draft.ensure().is_present() && !draft.is_set(&name) {
            Err(Violation::new(
                &[name.as_str()],
                format!("'{name}' must be set when ensure is present"),
            ))
        } else {
            Ok(())
        }
    })
}

/// `name` must be set when `sibling` is set to anything but `exempt` values
pub fn required_unless(name: &str, sibling: &str, exempt: &[&str]) -> Rule {
    let name = name.to_string();
    let sibling = sibling.to_string();
    let exempt = owned(exempt);
    Rule::new("required_unless", move |draft| {
        let triggered = draft
            .get(&sibling)
            .and_then(Value::literal_text)
            .is_some_and(|text| !exempt.contains(&text));
        if triggered && !draft.is_set(&name) {
            Err(Violation::new(
                &[name.as_str(), sibling.as_str()],
                format!("'{name}' is required when '{sibling}' is set"),
            ))
        } else {
            Ok(())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(values: &[(&str, Value)]) -> Draft {
        Draft::new(
            ResourceRef::new("test", "t"),
            Ensure::Present,
            values
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    const METHODS: [&str; 4] = ["ascii_authentication", "chap", "mschap", "mschapv2"];

    #[test]
    fn test_at_most_one_true_forces_others_false() {
        let rule = at_most_one_true(&METHODS, "only one");
        let mut d = draft(&[("chap", Value::Bool(true))]);
        rule.apply(&mut d).unwrap();
        assert_eq!(d.get("chap"), Some(&Value::Bool(true)));
        assert_eq!(d.get("mschap"), Some(&Value::Bool(false)));
        assert_eq!(d.get("ascii_authentication"), Some(&Value::Bool(false)));
        assert_eq!(d.get("mschapv2"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_at_most_one_true_rejects_two() {
        let rule = at_most_one_true(&METHODS, "only one");
        let mut d = draft(&[("chap", Value::Bool(true)), ("mschap", Value::Bool(true))]);
        let err = rule.apply(&mut d).unwrap_err();
        assert_eq!(err.properties, vec!["chap", "mschap"]);
        assert_eq!(err.message, "only one");
    }

    #[test]
    fn test_at_most_one_true_leaves_none_alone() {
        let rule = at_most_one_true(&METHODS, "only one");
        let mut d = draft(&[("chap", Value::Bool(false))]);
        rule.apply(&mut d).unwrap();
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_mutually_exclusive() {
        let rule = mutually_exclusive("multicast_group", "ingress_replication");
        let mut ok = draft(&[("multicast_group", Value::from("239.1.1.1"))]);
        assert!(rule.apply(&mut ok).is_ok());
        let mut bad = draft(&[
            ("multicast_group", Value::from("239.1.1.1")),
            ("ingress_replication", Value::Keyword("bgp".into())),
        ]);
        assert!(rule.apply(&mut bad).is_err());
    }

    #[test]
    fn test_required_with_and_forbidden_without() {
        let requires = required_with("message_digest_key_id", &["password", "algorithm_type"]);
        let mut d = draft(&[("message_digest_key_id", Value::Int(1)), ("password", Value::from("x"))]);
        let err = requires.apply(&mut d).unwrap_err();
        assert_eq!(err.properties, vec!["algorithm_type"]);

        let forbids = forbidden_without("message_digest_key_id", &["password"]);
        let mut d = draft(&[("password", Value::from("x"))]);
        assert!(forbids.apply(&mut d).is_err());
        let mut d = draft(&[]);
        assert!(forbids.apply(&mut d).is_ok());
    }

    #[test]
    fn test_required_when_present() {
        let rule = required_when_present("area");
        let mut d = draft(&[]);
        assert!(rule.apply(&mut d).is_err());
        let mut absent = Draft::new(ResourceRef::new("test", "t"), Ensure::Absent, IndexMap::new());
        assert!(rule.apply(&mut absent).is_ok());
    }

    #[test]
    fn test_required_unless() {
        let rule = required_unless("encryption_password", "encryption_type", &["none"]);
        let mut d = draft(&[("encryption_type", Value::Keyword("clear".into()))]);
        assert!(rule.apply(&mut d).is_err());
        let mut d = draft(&[("encryption_type", Value::Keyword("none".into()))]);
        assert!(rule.apply(&mut d).is_ok());
        let mut d = draft(&[]);
        assert!(rule.apply(&mut d).is_ok());
    }
}
