//! Error types.

use core::fmt;

use embody_path::{InvalidPathError, Path};

use crate::NodeId;

/// Error returned when embodying a template.
///
/// Every variant names a path in template coordinates (source keys and sequence
/// indices), so a failure deep inside a large template can be located without
/// re-walking it. The first failure aborts the embodiment; no partial result is
/// ever returned.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EmbodyError {
    /// A container was reached again while it was still being embodied.
    Cycle {
        /// Where the container was reached the second time.
        path: Path,
        /// Where the same container was first entered on the current branch.
        ancestor: Path,
    },

    /// A placeholder names a parameter no context frame binds.
    MissingParameter {
        /// The placeholder's name.
        name: String,
        /// Path of the leaf (or key) holding the placeholder.
        path: Path,
    },

    /// Two keys of one mapping resolved to the same key under the `error` policy.
    KeyCollision {
        /// The key both resolved to.
        key: String,
        /// Source path of the earlier key.
        first: Path,
        /// Source path of the later key.
        second: Path,
    },

    /// A caller-supplied path does not address anything.
    InvalidPath(InvalidPathError),
}

impl EmbodyError {
    /// The path this failure is about.
    ///
    /// Only a malformed caller-supplied path has none.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EmbodyError::Cycle { path, .. } | EmbodyError::MissingParameter { path, .. } => {
                Some(path)
            }
            EmbodyError::KeyCollision { second, .. } => Some(second),
            EmbodyError::InvalidPath(err) => err.at(),
        }
    }

    pub(crate) fn missing(name: &str, path: &Path) -> Self {
        EmbodyError::MissingParameter {
            name: name.to_owned(),
            path: path.clone(),
        }
    }
}

impl fmt::Display for EmbodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbodyError::Cycle { path, ancestor } => write!(
                f,
                "cycle at {path}: the same node is already being embodied at {ancestor}"
            ),
            EmbodyError::MissingParameter { name, path } => {
                write!(f, "missing parameter `{name}` at {path}")
            }
            EmbodyError::KeyCollision { key, first, second } => write!(
                f,
                "keys at {first} and {second} both resolve to {key:?}"
            ),
            EmbodyError::InvalidPath(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for EmbodyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            EmbodyError::InvalidPath(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidPathError> for EmbodyError {
    fn from(err: InvalidPathError) -> Self {
        EmbodyError::InvalidPath(err)
    }
}

/// Error returned by [`TemplateBuilder`](crate::TemplateBuilder) when nodes are wired
/// incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateError {
    /// The id does not belong to this builder.
    UnknownNode(NodeId),
    /// Elements can only be pushed onto sequence nodes.
    NotASequence(NodeId),
    /// Entries can only be inserted into mapping nodes.
    NotAMapping(NodeId),
    /// A mapping already has an entry with this key.
    DuplicateKey {
        /// The mapping node.
        node: NodeId,
        /// The repeated key.
        key: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnknownNode(id) => write!(f, "node {id} does not exist"),
            TemplateError::NotASequence(id) => write!(f, "node {id} is not a sequence"),
            TemplateError::NotAMapping(id) => write!(f, "node {id} is not a mapping"),
            TemplateError::DuplicateKey { node, key } => {
                write!(f, "mapping {node} already has key {key:?}")
            }
        }
    }
}

impl core::error::Error for TemplateError {}

/// Error returned when a configuration name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfigError {
    /// Which setting was being parsed.
    pub field: &'static str,
    /// The rejected text.
    pub value: String,
    /// The accepted names.
    pub expected: &'static [&'static str],
}

impl fmt::Display for ParseConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} {:?}: expected one of {}",
            self.field,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl core::error::Error for ParseConfigError {}
