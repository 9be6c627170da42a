//! Comparison strategies for idempotence checks
//!
//! Values handed to a comparison are already canonical: the desired value
//! went through validation and munging, the live value through
//! normalization.

use crate::types::Value;
use std::fmt;
use std::sync::Arc;

/// Custom comparison of a live value against a desired value.
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// How a live value is compared against a desired value
#[derive(Clone, Default)]
pub enum Comparison {
    /// Structural equality
    #[default]
    Exact,
    /// Multiset equality of list elements
    Unordered,
    /// Multiset equality after dropping desired pairs reset to default
    UnorderedSkipDefaults,
    /// The desired elements joined by a space appear in the live list
    Membership,
    /// Never reported out of sync
    Ignore,
    /// Caller-supplied comparison `(live, desired)`
    Custom(CompareFn),
}

impl Comparison {
    /// Build a custom comparison
    pub fn custom(f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Check whether `live` satisfies `desired`
    pub fn matches(&self, live: &Value, desired: &Value) -> bool {
        match self {
            Self::Exact => live == desired,
            Self::Unordered => unordered_eq(live, desired),
            Self::UnorderedSkipDefaults => match desired {
                Value::List(items) => {
                    let kept: Vec<Value> = items
                        .iter()
                        .filter(|item| !resets_to_default(item))
                        .cloned()
                        .collect();
                    unordered_eq(live, &Value::List(kept))
                }
                _ => live == desired,
            },
            Self::Membership => membership(live, desired),
            Self::Ignore => true,
            Self::Custom(f) => f(live, desired),
        }
    }

    /// Short name for listings
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Unordered => "unordered",
            Self::UnorderedSkipDefaults => "unordered-skip-defaults",
            Self::Membership => "membership",
            Self::Ignore => "ignore",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn unordered_eq(live: &Value, desired: &Value) -> bool {
    match (live, desired) {
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return false;
            }
            let mut a = a.clone();
            let mut b = b.clone();
            a.sort();
            b.sort();
            a == b
        }
        _ => live == desired,
    }
}

/// A pair whose second element resets to the device default
fn resets_to_default(item: &Value) -> bool {
    item.as_list()
        .and_then(|pair| pair.get(1))
        .is_some_and(Value::is_default_literal)
}

fn membership(live: &Value, desired: &Value) -> bool {
    match desired {
        Value::Default => live.is_default(),
        Value::List(items) => {
            let joined = items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            match live {
                Value::List(entries) => entries.iter().any(|entry| entry.to_string() == joined),
                other => other.to_string() == joined,
            }
        }
        other => live == other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(items: &[&str]) -> Value {
        Value::list(items.iter().copied())
    }

    #[test]
    fn test_exact() {
        assert!(Comparison::Exact.matches(&Value::Int(5), &Value::Int(5)));
        assert!(!Comparison::Exact.matches(&strs(&["a", "b"]), &strs(&["b", "a"])));
    }

    #[test]
    fn test_unordered_ignores_order() {
        let cmp = Comparison::Unordered;
        assert!(cmp.matches(&strs(&["200-300", "5100"]), &strs(&["5100", "200-300"])));
        assert!(!cmp.matches(&strs(&["200-300", "5100"]), &strs(&["5100", "200-301"])));
    }

    #[test]
    fn test_unordered_is_multiset() {
        let cmp = Comparison::Unordered;
        assert!(!cmp.matches(&strs(&["a", "a", "b"]), &strs(&["a", "b", "b"])));
        assert!(!cmp.matches(&strs(&["a"]), &strs(&["a", "a"])));
    }

    #[test]
    fn test_unordered_pairs() {
        let live = Value::List(vec![
            Value::list(vec![Value::Int(20), Value::Int(21)]),
            Value::list(vec![Value::Int(30), Value::Int(31)]),
        ]);
        let desired = Value::List(vec![
            Value::list(vec![Value::Int(30), Value::Int(31)]),
            Value::list(vec![Value::Int(20), Value::Int(21)]),
        ]);
        assert!(Comparison::Unordered.matches(&live, &desired));
    }

    #[test]
    fn test_skip_defaults() {
        let live = Value::List(vec![Value::list(vec![Value::from("2-4"), Value::Int(300)])]);
        let desired = Value::List(vec![
            Value::list(vec![Value::from("2-4"), Value::Int(300)]),
            Value::list(vec![Value::from("6"), Value::Default]),
        ]);
        assert!(Comparison::UnorderedSkipDefaults.matches(&live, &desired));
        assert!(!Comparison::Unordered.matches(&live, &desired));
    }

    #[test]
    fn test_membership() {
        let live = strs(&["10 100", "20 200"]);
        assert!(Comparison::Membership.matches(&live, &strs(&["20", "200"])));
        assert!(!Comparison::Membership.matches(&live, &strs(&["30", "300"])));
        assert!(Comparison::Membership.matches(&Value::Default, &Value::Default));
        assert!(!Comparison::Membership.matches(&live, &Value::Default));
    }

    #[test]
    fn test_ignore_and_custom() {
        assert!(Comparison::Ignore.matches(&Value::from("x"), &Value::from("y")));
        let cmp = Comparison::custom(|live, desired| live.to_string().len() == desired.to_string().len());
        assert!(cmp.matches(&Value::from("abc"), &Value::from("xyz")));
        assert_eq!(format!("{cmp:?}"), "custom");
    }
}
