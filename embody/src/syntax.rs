//! Placeholder grammar.
//!
//! A placeholder is a name between a pair of delimiters. Three delimiter families
//! exist; one is chosen per embodiment and applies to every leaf and key:
//!
//! | Family          | Form       |
//! |-----------------|------------|
//! | `dollar-brace`  | `${name}`  |
//! | `brace`         | `{name}`   |
//! | `double-bracket`| `[[name]]` |
//!
//! Names are ASCII identifiers: a letter or `_`, then letters, digits or `_`. Text
//! that opens a delimiter but does not continue with a valid name and the closing
//! delimiter is plain text.

use core::fmt;
use core::str::FromStr;

use embody_value::Value;

use crate::ParseConfigError;

/// A placeholder delimiter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Syntax {
    /// `${name}`
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "dollar_brace"))]
    DollarBrace,
    /// `{name}`
    Brace,
    /// `[[name]]`
    #[cfg_attr(feature = "serde", serde(alias = "double_bracket"))]
    DoubleBracket,
}

impl Syntax {
    /// Every family, in declaration order.
    pub const ALL: [Syntax; 3] = [Syntax::DollarBrace, Syntax::Brace, Syntax::DoubleBracket];

    /// Opening delimiter.
    pub const fn open(self) -> &'static str {
        match self {
            Syntax::DollarBrace => "${",
            Syntax::Brace => "{",
            Syntax::DoubleBracket => "[[",
        }
    }

    /// Closing delimiter.
    pub const fn close(self) -> &'static str {
        match self {
            Syntax::DollarBrace | Syntax::Brace => "}",
            Syntax::DoubleBracket => "]]",
        }
    }

    /// Kebab-case name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            Syntax::DollarBrace => "dollar-brace",
            Syntax::Brace => "brace",
            Syntax::DoubleBracket => "double-bracket",
        }
    }

    /// Scans `leaf` for placeholders, left to right.
    pub fn placeholders(self, leaf: &str) -> Placeholders<'_> {
        Placeholders {
            leaf,
            syntax: self,
            pos: 0,
        }
    }

    /// Returns `true` if `leaf` contains at least one placeholder.
    pub fn is_templated(self, leaf: &str) -> bool {
        self.placeholders(leaf).next().is_some()
    }

    /// Classifies a string leaf.
    pub fn describe_str(self, leaf: &str) -> LeafDescriptor {
        let mut spans = self.placeholders(leaf);
        let Some(first) = spans.next() else {
            return LeafDescriptor::Literal;
        };
        if first.start == 0 && first.end == leaf.len() {
            return LeafDescriptor::Exact {
                name: first.name.to_owned(),
                raw: leaf.to_owned(),
            };
        }

        let mut segments = Vec::new();
        let mut cursor = 0;
        for span in core::iter::once(first).chain(spans) {
            if span.start > cursor {
                segments.push(Segment::Text(leaf[cursor..span.start].to_owned()));
            }
            segments.push(Segment::Param {
                name: span.name.to_owned(),
                raw: span.raw.to_owned(),
            });
            cursor = span.end;
        }
        if cursor < leaf.len() {
            segments.push(Segment::Text(leaf[cursor..].to_owned()));
        }
        LeafDescriptor::Composed(segments)
    }

    /// Classifies any template scalar: only strings can hold placeholders.
    pub fn describe(self, leaf: &Value) -> LeafDescriptor {
        match leaf {
            Value::String(s) => self.describe_str(s),
            _ => LeafDescriptor::Literal,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Syntax {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('_', "-");
        Syntax::ALL
            .into_iter()
            .find(|syntax| syntax.name() == normalized)
            .ok_or_else(|| ParseConfigError {
                field: "syntax",
                value: s.to_owned(),
                expected: &["dollar-brace", "brace", "double-bracket"],
            })
    }
}

/// One placeholder found in a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// The parameter name.
    pub name: &'a str,
    /// The full delimited text, e.g. `${name}`.
    pub raw: &'a str,
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
    /// The family it was parsed with.
    pub syntax: Syntax,
}

/// Iterator over the placeholders of a leaf.
///
/// A clone continues from the same position. Scanning is deterministic, so calling
/// [`Syntax::placeholders`] again always yields the same spans.
#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    leaf: &'a str,
    syntax: Syntax,
    pos: usize,
}

fn name_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {
            1 + bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count()
        }
        _ => 0,
    }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Placeholder<'a>> {
        let open = self.syntax.open();
        let close = self.syntax.close();
        while self.pos < self.leaf.len() {
            let start = self.pos + self.leaf[self.pos..].find(open)?;
            let name_start = start + open.len();
            let len = name_len(&self.leaf[name_start..]);
            let name_end = name_start + len;
            if len > 0 && self.leaf[name_end..].starts_with(close) {
                let end = name_end + close.len();
                self.pos = end;
                return Some(Placeholder {
                    name: &self.leaf[name_start..name_end],
                    raw: &self.leaf[start..end],
                    start,
                    end,
                    syntax: self.syntax,
                });
            }
            // Delimiters are ASCII, so one byte later is a char boundary.
            self.pos = start + 1;
        }
        None
    }
}

/// How a leaf (or key) is embodied, decided once from its text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeafDescriptor {
    /// No placeholders: the leaf is copied as-is.
    Literal,
    /// The whole leaf is one placeholder: the parameter's value replaces it
    /// unchanged, whatever its type.
    Exact {
        /// The parameter name.
        name: String,
        /// The leaf text, kept for lenient mode.
        raw: String,
    },
    /// Text around or between placeholders: the result is a string.
    Composed(Vec<Segment>),
}

impl LeafDescriptor {
    /// Returns `true` unless this is [`LeafDescriptor::Literal`].
    pub fn is_templated(&self) -> bool {
        !matches!(self, LeafDescriptor::Literal)
    }

    /// Parameter names referenced, in order of appearance (with repeats).
    pub fn names(&self) -> Vec<&str> {
        match self {
            LeafDescriptor::Literal => Vec::new(),
            LeafDescriptor::Exact { name, .. } => vec![name.as_str()],
            LeafDescriptor::Composed(segments) => segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Param { name, .. } => Some(name.as_str()),
                    Segment::Text(_) => None,
                })
                .collect(),
        }
    }
}

/// A piece of a composed leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// A placeholder.
    Param {
        /// The parameter name.
        name: String,
        /// The delimited text, kept for lenient mode.
        raw: String,
    },
}
