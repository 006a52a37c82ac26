//! Named attribute values.
//!
//! `Attributes` is the map a character's stats live in: ability scores,
//! modifiers, AC, proficiency bonus, and any free-form slot a stat-change
//! writes to. The same type doubles as the constants map (`CLASS_LEVEL`,
//! `LEVEL`, ...) passed alongside it during evaluation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::fixed::Fixed;

/// Map from attribute name to fixed-point value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: FxHashMap<String, Fixed>,
}

/// Constants share the attribute representation; they are read-only by
/// convention and never targeted by stat-changes.
pub type Constants = Attributes;

impl Attributes {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Fixed) -> Self {
        self.set(name, value);
        self
    }

    /// Get a value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Fixed> {
        self.values.get(name).copied()
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: Fixed) -> Option<Fixed> {
        self.values.insert(name.into(), value)
    }

    /// Get a mutable slot, creating it at zero if absent.
    pub fn slot(&mut self, name: &str) -> &mut Fixed {
        self.values.entry(name.to_string()).or_default()
    }

    /// Remove a value.
    pub fn remove(&mut self, name: &str) -> Option<Fixed> {
        self.values.remove(name)
    }

    /// Check if a value exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Fixed)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by name, for stable presentation.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, Fixed)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Into<String>> FromIterator<(K, Fixed)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, Fixed)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Fixed)> for Attributes {
    fn extend<I: IntoIterator<Item = (K, Fixed)>>(&mut self, iter: I) {
        self.values
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}
