//! Embodiment settings.
//!
//! Every setting has a default, so a configuration-loading layer only needs to
//! supply what it overrides. With the `serde` feature the whole struct
//! deserializes from kebab-case names:
//!
//! ```
//! # #[cfg(feature = "serde")] {
//! use embody::{EmbodyConfig, KeyCollision, Strategy};
//!
//! let config: EmbodyConfig =
//!     serde_json::from_str(r#"{"strategy": "compiled", "key-collision": "last-wins"}"#).unwrap();
//! assert_eq!(config.strategy, Strategy::Compiled);
//! assert_eq!(config.key_collision, KeyCollision::LastWins);
//! assert!(config.strict);
//! # }
//! ```

use core::fmt;
use core::str::FromStr;

use crate::{KeyCollision, ParseConfigError, Syntax};

/// Which engine embodies a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Strategy {
    /// Walk the template depth-first on every call.
    Recursive,
    /// Compile the template into a flat plan once, then rebuild from it.
    Compiled,
    /// Pick one of the above from the template's shape.
    #[default]
    Auto,
}

impl Strategy {
    /// Kebab-case name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Recursive => "recursive",
            Strategy::Compiled => "compiled",
            Strategy::Auto => "auto",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recursive" => Ok(Strategy::Recursive),
            "compiled" => Ok(Strategy::Compiled),
            "auto" => Ok(Strategy::Auto),
            _ => Err(ParseConfigError {
                field: "strategy",
                value: s.to_owned(),
                expected: &["recursive", "compiled", "auto"],
            }),
        }
    }
}

/// Limits past which [`Strategy::Auto`] picks the compiled engine.
///
/// Each comparison is strict: a template exactly at a limit stays recursive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct AutoThresholds {
    /// Nesting depth.
    #[cfg_attr(feature = "serde", serde(alias = "max_depth"))]
    pub max_depth: usize,
    /// Placeholders, counting keys and every span of composed leaves.
    #[cfg_attr(feature = "serde", serde(alias = "max_placeholders"))]
    pub max_placeholders: usize,
    /// Expected number of embodiments of the same template.
    pub reuse: usize,
}

impl Default for AutoThresholds {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_placeholders: 10,
            reuse: 1,
        }
    }
}

/// Settings for one [`Embodier`](crate::Embodier).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct EmbodyConfig {
    /// Engine choice.
    pub strategy: Strategy,
    /// Placeholder delimiters.
    pub syntax: Syntax,
    /// Policy for keys that embody to the same text.
    #[cfg_attr(feature = "serde", serde(alias = "key_collision"))]
    pub key_collision: KeyCollision,
    /// Return a view that embodies subtrees on read instead of a finished value.
    pub lazy: bool,
    /// Fail on unbound placeholders. When off, they are left as written.
    pub strict: bool,
    /// Call depth after which the recursive engine continues with an explicit stack.
    #[cfg_attr(feature = "serde", serde(alias = "max_recursion_depth"))]
    pub max_recursion_depth: usize,
    /// Limits used by [`Strategy::Auto`].
    pub auto: AutoThresholds,
    /// How many times the caller expects to embody this template.
    #[cfg_attr(feature = "serde", serde(alias = "expected_reuse"))]
    pub expected_reuse: Option<usize>,
}

impl Default for EmbodyConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            syntax: Syntax::DollarBrace,
            key_collision: KeyCollision::Error,
            lazy: false,
            strict: true,
            max_recursion_depth: 128,
            auto: AutoThresholds::default(),
            expected_reuse: None,
        }
    }
}

impl EmbodyConfig {
    /// Default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the placeholder delimiters.
    pub fn with_syntax(mut self, syntax: Syntax) -> Self {
        self.syntax = syntax;
        self
    }

    /// Sets the key collision policy.
    pub fn with_key_collision(mut self, policy: KeyCollision) -> Self {
        self.key_collision = policy;
        self
    }

    /// Makes [`Embodier::view`](crate::Embodier::view) lazy.
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Sets strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the call depth limit of the recursive engine.
    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Sets the auto selection limits.
    pub fn with_auto_thresholds(mut self, auto: AutoThresholds) -> Self {
        self.auto = auto;
        self
    }

    /// Tells auto selection how often the template will be embodied.
    pub fn with_expected_reuse(mut self, reuse: usize) -> Self {
        self.expected_reuse = Some(reuse);
        self
    }
}
