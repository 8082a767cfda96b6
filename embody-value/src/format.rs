//! Text renderings for Values.
//!
//! Two flavours are provided: a compact single-line form (used by `Display` and by
//! placeholder splicing) and a pretty, indented form for diagnostics.

use core::fmt::{self, Write};

use crate::{VNumber, Value};

/// Format a Value as pretty, indented JSON-like text.
///
/// Opaque values render as `<opaque TYPE>`; everything else is valid JSON.
pub fn format_value(value: &Value) -> String {
    let mut ctx = FormatContext::new();
    // Writing into a String cannot fail.
    let _ = ctx.format(value);
    ctx.output
}

/// Writes `s` as a quoted JSON string literal.
pub fn escape_json_str<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c.is_control() => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

pub(crate) fn write_number<W: Write>(out: &mut W, n: &VNumber) -> fmt::Result {
    write!(out, "{n}")
}

/// Single-line rendering: `{"a":1,"b":[true,null]}`.
pub(crate) fn write_compact<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => escape_json_str(out, s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_compact(out, item)?;
            }
            out.write_char(']')
        }
        Value::Object(obj) => {
            out.write_char('{')?;
            for (i, (key, val)) in obj.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                escape_json_str(out, key)?;
                out.write_char(':')?;
                write_compact(out, val)?;
            }
            out.write_char('}')
        }
        Value::Opaque(o) => write!(out, "<opaque {}>", o.type_name()),
    }
}

struct FormatContext {
    output: String,
    indent: usize,
}

impl FormatContext {
    const fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn format(&mut self, value: &Value) -> fmt::Result {
        match value {
            Value::Array(items) if !items.is_empty() => {
                self.output.push_str("[\n");
                self.indent += 1;
                for (i, item) in items.iter().enumerate() {
                    self.write_indent();
                    self.format(item)?;
                    if i < items.len() - 1 {
                        self.output.push(',');
                    }
                    self.output.push('\n');
                }
                self.indent -= 1;
                self.write_indent();
                self.output.push(']');
            }
            Value::Object(obj) if !obj.is_empty() => {
                self.output.push_str("{\n");
                self.indent += 1;
                let len = obj.len();
                for (i, (key, val)) in obj.iter().enumerate() {
                    self.write_indent();
                    escape_json_str(&mut self.output, key)?;
                    self.output.push_str(": ");
                    self.format(val)?;
                    if i < len - 1 {
                        self.output.push(',');
                    }
                    self.output.push('\n');
                }
                self.indent -= 1;
                self.write_indent();
                self.output.push('}');
            }
            other => write_compact(&mut self.output, other)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VObject, VOpaque, value};

    #[test]
    fn test_format_primitives() {
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&Value::Bool(true)), "true");
        assert_eq!(format_value(&Value::from(42i64)), "42");
        assert_eq!(format_value(&Value::from(2.0f64)), "2.0");
        assert_eq!(format_value(&Value::from("hi \"there\"")), r#""hi \"there\"""#);
    }

    #[test]
    fn test_format_nested() {
        let v = value!({ "name": "Alice", "tags": ["a", "b"], "empty": {} });
        insta::assert_snapshot!(format_value(&v), @r#"
        {
          "name": "Alice",
          "tags": [
            "a",
            "b"
          ],
          "empty": {}
        }
        "#);
    }

    #[test]
    fn test_compact_matches_display() {
        let mut obj = VObject::new();
        obj.insert("x", 1);
        obj.insert("y", Value::Array(vec![Value::Null, Value::from(false)]));
        let v = Value::from(obj);
        assert_eq!(v.to_string(), r#"{"x":1,"y":[null,false]}"#);
    }

    #[test]
    fn test_opaque_placeholder() {
        #[derive(Debug)]
        struct Handle;
        let v = Value::Opaque(VOpaque::new(Handle));
        assert!(format_value(&v).starts_with("<opaque "));
        assert!(format_value(&v).ends_with("Handle>"));
    }
}
