#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Templated object embodiment.
//!
//! A template is a nested structure whose string leaves (and mapping keys) may hold
//! placeholders such as `${name}`. Embodying it against a [`Context`] gives a
//! structure of the same shape with every placeholder filled in:
//!
//! - a leaf that is exactly one placeholder takes the parameter's value, whatever
//!   its type, so `"${count}"` becomes `42`, not `"42"`;
//! - any other leaf with placeholders becomes a string, each placeholder replaced
//!   by the textual form of its value.
//!
//! ```
//! use embody::{Context, Template, embody, value};
//!
//! let template = Template::from(value!({ "count": "${n}", "msg": "x=${n}" }));
//! let out = embody(&template, &Context::new().with("n", 42)).unwrap();
//! assert_eq!(out, value!({ "count": 42, "msg": "x=42" }));
//! ```
//!
//! # Engines
//!
//! - [`Strategy::Recursive`] walks the template depth-first on every call. It
//!   suits one-off or irregular templates.
//! - [`Strategy::Compiled`] flattens the template into a [`CompiledPlan`] once and
//!   rebuilds results from it per call. It suits deep, wide or reused templates.
//! - [`Strategy::Auto`], the default, picks one of the two from [`TemplateStats`]
//!   and [`AutoThresholds`].
//!
//! Both engines give equal results, reject cycles with [`EmbodyError::Cycle`], and
//! name a template path in every error.
//!
//! # Views
//!
//! [`Embodier::view`] and the types in [`views`] give read-only access to results:
//! attribute-style ([`AttrView`]), lazy ([`LazyView`]), flat ([`FlatView`]), any
//! path notation ([`PathView`]) and hashable snapshots ([`FrozenView`]).

mod tracing_macros;

mod compiled;
pub use compiled::{CompiledPlan, EntryKind, PlanCache, PlanEntry, Shape};

mod config;
pub use config::{AutoThresholds, EmbodyConfig, Strategy};

mod context;
pub use context::{Binding, Context, Frame, Resolver};

mod cycle;
pub use cycle::CycleDetector;

mod embodier;
pub use embodier::{Embodier, embody, embody_with};

mod error;
pub use error::{EmbodyError, ParseConfigError, TemplateError};

mod keys;
pub use keys::KeyCollision;

mod recursive;

mod select;
pub use select::{TemplateStats, select};

mod substitute;

mod syntax;
pub use syntax::{LeafDescriptor, Placeholder, Placeholders, Segment, Syntax};

mod template;
pub use template::{Node, NodeId, Template, TemplateBuilder, TemplateId};

pub mod views;
pub use views::{Attr, AttrView, FlatView, FrozenView, LazyView, MappingView, PathView, View};

pub use embody_path::{
    InvalidPathError, Path, PathLike, PathSegment, depth, flatten, resolve, set, unflatten,
};
pub use embody_value::{VNumber, VObject, VOpaque, Value, value};
