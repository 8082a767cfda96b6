//! Settling mapping keys that resolve to the same text.

use core::fmt;
use core::str::FromStr;
use std::collections::HashSet;

use embody_path::Path;
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::tracing_macros::debug;
use crate::{EmbodyError, ParseConfigError};

/// What to do when two keys of one mapping embody to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum KeyCollision {
    /// Fail with [`EmbodyError::KeyCollision`] naming both source keys.
    #[default]
    Error,
    /// Keep one entry, at the position of the first occurrence, holding the value of
    /// the last occurrence in source order.
    #[cfg_attr(feature = "serde", serde(alias = "last_wins"))]
    LastWins,
    /// Keep every entry. The first keeps its key; later ones get `_1`, `_2`, …
    /// appended, skipping names already in use.
    Namespace,
}

impl KeyCollision {
    const NAMES: &'static [&'static str] = &["error", "last-wins", "namespace"];

    /// Kebab-case name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            KeyCollision::Error => "error",
            KeyCollision::LastWins => "last-wins",
            KeyCollision::Namespace => "namespace",
        }
    }
}

impl fmt::Display for KeyCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyCollision {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "error" => Ok(KeyCollision::Error),
            "last-wins" => Ok(KeyCollision::LastWins),
            "namespace" => Ok(KeyCollision::Namespace),
            _ => Err(ParseConfigError {
                field: "key collision policy",
                value: s.to_owned(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// An embodied mapping entry, still carrying the source path of its key.
#[derive(Debug)]
pub(crate) struct Keyed<T> {
    pub(crate) key: String,
    pub(crate) source: Path,
    pub(crate) value: T,
}

/// Applies `policy` to embodied entries in source order.
pub(crate) fn settle<T>(
    entries: Vec<Keyed<T>>,
    policy: KeyCollision,
) -> Result<Vec<(String, T)>, EmbodyError> {
    match policy {
        KeyCollision::Error => {
            let mut seen: IndexMap<&str, &Path> = IndexMap::with_capacity(entries.len());
            for entry in &entries {
                if let Some(first) = seen.insert(&entry.key, &entry.source) {
                    return Err(EmbodyError::KeyCollision {
                        key: entry.key.clone(),
                        first: first.clone(),
                        second: entry.source.clone(),
                    });
                }
            }
            Ok(entries.into_iter().map(|e| (e.key, e.value)).collect())
        }
        KeyCollision::LastWins => {
            let total = entries.len();
            let mut out: IndexMap<String, T> = IndexMap::with_capacity(total);
            for entry in entries {
                match out.entry(entry.key) {
                    Entry::Occupied(mut slot) => {
                        debug!(key = %slot.key(), source = %entry.source, "later key wins");
                        slot.insert(entry.value);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(entry.value);
                    }
                }
            }
            Ok(out.into_iter().collect())
        }
        KeyCollision::Namespace => {
            let mut taken: HashSet<String> = entries.iter().map(|e| e.key.clone()).collect();
            let mut used: HashSet<String> = HashSet::with_capacity(entries.len());
            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                if used.insert(entry.key.clone()) {
                    out.push((entry.key, entry.value));
                    continue;
                }
                let renamed = (1..)
                    .map(|n| format!("{}_{n}", entry.key))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_default();
                debug!(
                    key = %entry.key,
                    renamed = %renamed,
                    source = %entry.source,
                    "namespacing key"
                );
                taken.insert(renamed.clone());
                used.insert(renamed.clone());
                out.push((renamed, entry.value));
            }
            Ok(out)
        }
    }
}
