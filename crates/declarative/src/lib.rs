//! # Declarative
//!
//! A framework for declarative resource types.
//!
//! This crate turns loosely-typed resource declarations (a type name, a
//! title and a bag of attribute values) into canonical, validated
//! instances, and decides whether live state already satisfies them.
//!
//! ## Core Concepts
//!
//! - **TitlePattern**: Anchored regexes that split a title such as
//!   `"2 red 1.1.1.1 ipv4 unicast"` into key fields
//! - **PropertyDescriptor**: One attribute - literals, validators, munge,
//!   default, comparison strategy
//! - **ResourceDescriptor**: A whole type - key fields, patterns,
//!   attributes, cross-field rules, autorequires
//! - **ResourceInstance**: A canonical declaration built from a request
//! - **Registry** / **Catalog**: The known types and the compiled set of
//!   instances
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     munge, validate, LiveState, PropertyDescriptor, Registry, ResourceDescriptor,
//!     ResourceRequest, TitlePattern, Transform, ValidationMode, in_sync,
//! };
//!
//! let vlan = ResourceDescriptor::builder("cisco_vlan")
//!     .key("vlan")
//!     .pattern(TitlePattern::new(r"(\d+)", &[("vlan", Transform::Integer)])?)
//!     .attribute(
//!         PropertyDescriptor::parameter("vlan")
//!             .validator(validate::integer_in(2, 4093))
//!             .munge(munge::integer),
//!     )
//!     .attribute(PropertyDescriptor::property("vlan_name").munge(munge::string_or_default))
//!     .attribute(PropertyDescriptor::property("state").literals(&["active", "suspend", "default"]))
//!     .ensurable()
//!     .build()?;
//!
//! let mut registry = Registry::new();
//! registry.register(vlan)?;
//!
//! let request = ResourceRequest::new("cisco_vlan", "100")
//!     .with("vlan_name", "red")
//!     .with("state", "active");
//! let instance = registry.build(&request, ValidationMode::FailFast)?;
//! assert_eq!(instance.identity(), "100");
//!
//! let live = LiveState::present().with("vlan_name", "red").with("state", "active");
//! let descriptor = registry.descriptor("cisco_vlan")?;
//! assert!(in_sync(descriptor, &live, &instance).is_in_sync());
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Extension Points
//!
//! - Custom validators, munges, comparisons and rules are plain closures
//! - [`ProgressCallback`]: Receives progress updates while compiling
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks or device transports.

pub mod catalog;
pub mod compile;
pub mod context;
pub mod diff;
pub mod error;
pub mod insync;
pub mod instance;
pub mod munge;
pub mod pattern;
pub mod property;
pub mod range;
pub mod registry;
pub mod resource;
pub mod rules;
pub mod types;
pub mod validate;

// Re-export main types at crate root
pub use catalog::{Catalog, Dependency};
pub use compile::{compile, compile_simple, CompileOutcome};
pub use context::{LogProgress, NoProgress, ProgressCallback};
pub use diff::{
    compute_diffs, group_by_type, in_sync, DiffSummary, LiveInventory, LiveState, PropertyChange,
    ResourceDiff, SyncReport,
};
pub use error::{Error, ErrorCategory, PropertyError, Result};
pub use insync::Comparison;
pub use instance::ResourceInstance;
pub use pattern::{TitleError, TitlePattern, TitlePatterns, Transform};
pub use property::{AttributeKind, Cardinality, PropertyDescriptor};
pub use registry::Registry;
pub use resource::{Autorequire, ResourceBuilder, ResourceDescriptor};
pub use rules::{Draft, Rule, Violation};
pub use types::{CompileOptions, Ensure, ResourceRef, ResourceRequest, ValidationMode, Value};
