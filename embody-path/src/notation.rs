//! External path notations and their conversion to canonical [`Path`]s.

use crate::{InvalidPathError, Path, PathSegment};

impl Path {
    /// Parses dot notation: `a.b.0`. The empty string is the root.
    ///
    /// Every segment becomes a key; keys that spell an index address sequence
    /// elements when resolved.
    pub fn parse_dot(s: &str) -> Path {
        if s.is_empty() {
            return Path::root();
        }
        s.split('.').map(PathSegment::from).collect()
    }

    /// Parses pointer notation: `/a/b/0`, with `~1` for `/` and `~0` for `~`.
    /// The empty string is the root.
    pub fn parse_pointer(s: &str) -> Result<Path, InvalidPathError> {
        if s.is_empty() {
            return Ok(Path::root());
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(InvalidPathError::Malformed {
                input: s.to_owned(),
                reason: "pointer must start with '/'",
            });
        };
        rest.split('/')
            .map(|raw| unescape_pointer_segment(raw, s).map(PathSegment::Key))
            .collect::<Result<Vec<_>, _>>()
            .map(Path::from)
    }

    /// Parses either notation: a leading `/` selects pointer notation,
    /// anything else is dot notation.
    pub fn parse(s: &str) -> Result<Path, InvalidPathError> {
        if s.starts_with('/') {
            Path::parse_pointer(s)
        } else {
            Ok(Path::parse_dot(s))
        }
    }

    /// Renders dot notation. Indices are written as plain numbers.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match segment {
                PathSegment::Key(k) => out.push_str(k),
                PathSegment::Index(idx) => out.push_str(&idx.to_string()),
            }
        }
        out
    }

    /// Renders pointer notation, escaping `~` and `/` inside keys.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in self {
            out.push('/');
            match segment {
                PathSegment::Key(k) => {
                    for c in k.chars() {
                        match c {
                            '~' => out.push_str("~0"),
                            '/' => out.push_str("~1"),
                            c => out.push(c),
                        }
                    }
                }
                PathSegment::Index(idx) => out.push_str(&idx.to_string()),
            }
        }
        out
    }
}

fn unescape_pointer_segment(raw: &str, input: &str) -> Result<String, InvalidPathError> {
    if !raw.contains('~') {
        return Ok(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(InvalidPathError::Malformed {
                    input: input.to_owned(),
                    reason: "'~' must be followed by '0' or '1'",
                });
            }
        }
    }
    Ok(out)
}

/// Anything that names a location in a value tree.
///
/// Strings dispatch on their first character: a leading `/` is pointer notation,
/// anything else is dot notation. Slices of strings and segments are explicit
/// segment sequences.
pub trait PathLike {
    /// Converts to canonical form.
    fn to_path(&self) -> Result<Path, InvalidPathError>;
}

impl PathLike for Path {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        Ok(self.clone())
    }
}

impl PathLike for str {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        Path::parse(self)
    }
}

impl PathLike for String {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        Path::parse(self)
    }
}

impl PathLike for [PathSegment] {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        Ok(Path::from(self.to_vec()))
    }
}

impl PathLike for Vec<PathSegment> {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        self.as_slice().to_path()
    }
}

impl PathLike for [&str] {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        Ok(self.iter().map(|k| PathSegment::from(*k)).collect())
    }
}

impl PathLike for Vec<&str> {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        self.as_slice().to_path()
    }
}

impl<const N: usize> PathLike for [&str; N] {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        self.as_slice().to_path()
    }
}

impl<const N: usize> PathLike for [PathSegment; N] {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        self.as_slice().to_path()
    }
}

impl<T: PathLike + ?Sized> PathLike for &T {
    fn to_path(&self) -> Result<Path, InvalidPathError> {
        (**self).to_path()
    }
}
