//! `embody-value` provides the dynamic value tree that flows through the embody
//! template engine: template scalars, context parameters and embodied results
//! are all [`Value`]s.
//!
//! # Features
//!
//! - **Seven value kinds**: Null, Bool, Number, String, Array, Object, Opaque
//! - **Insertion-ordered objects**: [`VObject`] keeps keys in the order they were
//!   first inserted, so embodied mappings iterate in template order
//! - **Opaque passthrough**: any `Debug + Send + Sync` value can ride along inside a
//!   [`VOpaque`] and comes back out unchanged (and downcastable)
//! - **Two renderings**: [`Value::to_text`] for splicing into composed strings, and
//!   [`format_value`] for pretty, JSON-like diagnostics
//!
//! # Design
//!
//! `Value` is a closed enum: every consumer matches on it exhaustively instead of
//! probing types at runtime. Numbers keep their integer/float distinction, which is
//! what lets a placeholder like `${count}` resolve to `42` rather than `"42"`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod macros;

mod value;
pub use value::*;

mod number;
pub use number::*;

mod object;
pub use object::*;

mod opaque;
pub use opaque::*;

mod format;
pub use format::{escape_json_str, format_value};

#[cfg(feature = "serde")]
mod serde_impl;
