//! Leaf substitution shared by both engines.

use embody_path::Path;
use embody_value::Value;

use crate::{Context, EmbodyError, LeafDescriptor, Segment};

/// Embodies one leaf. `source` is the template scalar `descriptor` was built from.
///
/// An exact placeholder yields the parameter value untouched; a composed leaf yields
/// a string. When `strict` is off, unbound placeholders keep their raw text.
pub(crate) fn embody_leaf(
    source: &Value,
    descriptor: &LeafDescriptor,
    ctx: &Context,
    strict: bool,
    path: &Path,
) -> Result<Value, EmbodyError> {
    match descriptor {
        LeafDescriptor::Literal => Ok(source.clone()),
        LeafDescriptor::Exact { name, raw } => match ctx.get(name) {
            Some(value) => Ok(value),
            None if strict => Err(EmbodyError::missing(name, path)),
            None => Ok(Value::String(raw.clone())),
        },
        LeafDescriptor::Composed(segments) => {
            compose(segments, ctx, strict, path).map(Value::String)
        }
    }
}

/// Embodies a mapping key. Non-string parameter values become their textual form.
pub(crate) fn embody_key(
    key: &str,
    descriptor: &LeafDescriptor,
    ctx: &Context,
    strict: bool,
    path: &Path,
) -> Result<String, EmbodyError> {
    match descriptor {
        LeafDescriptor::Literal => Ok(key.to_owned()),
        LeafDescriptor::Exact { name, raw } => match ctx.get(name) {
            Some(value) => Ok(value.to_text().into_owned()),
            None if strict => Err(EmbodyError::missing(name, path)),
            None => Ok(raw.clone()),
        },
        LeafDescriptor::Composed(segments) => compose(segments, ctx, strict, path),
    }
}

fn compose(
    segments: &[Segment],
    ctx: &Context,
    strict: bool,
    path: &Path,
) -> Result<String, EmbodyError> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Param { name, raw } => match ctx.get(name) {
                Some(value) => out.push_str(&value.to_text()),
                None if strict => return Err(EmbodyError::missing(name, path)),
                None => out.push_str(raw),
            },
        }
    }
    Ok(out)
}
