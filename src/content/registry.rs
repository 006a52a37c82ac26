//! In-memory content registry.
//!
//! Backed by persistent `im` maps, so cloning a registry to stage a reload
//! is cheap and the clone shares structure with the original.

use serde::{Deserialize, Serialize};

use crate::effects::EffectsLoader;
use crate::error::ContentError;

use super::feature::{Feature, RawFeature, Spell};
use super::library::{ContentGroup, ContentLibrary};

/// Registry of groups, features, and spells.
///
/// ## Example
///
/// ```
/// use tabletop_effects::content::{ContentLibrary, ContentRegistry, Spell};
///
/// let mut registry = ContentRegistry::new();
/// registry.register_group("skills", ["Stealth", "Arcana"]);
/// registry.register_spell(Spell::new("light", "Light", 0));
///
/// assert!(registry.get_group("skills").unwrap().contains("Arcana"));
/// assert!(registry.get_spell("light").unwrap().is_cantrip());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRegistry {
    groups: im::HashMap<String, ContentGroup>,
    features: im::HashMap<String, Feature>,
    spells: im::HashMap<String, Spell>,
}

impl ContentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group, replacing any group with the same name.
    pub fn register_group(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let name = name.into();
        let members: ContentGroup = members.into_iter().map(Into::into).collect();
        if self.groups.insert(name.clone(), members).is_some() {
            tracing::warn!("Group `{}` registered twice; keeping the later one", name);
        }
    }

    /// Add members to a group, creating it if needed.
    pub fn extend_group(
        &mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.groups
            .entry(name.into())
            .or_insert_with(ContentGroup::new)
            .extend(members.into_iter().map(Into::into));
    }

    /// Register a feature, replacing any feature with the same key.
    pub fn register_feature(&mut self, feature: Feature) {
        let key = feature.key.clone();
        if self.features.insert(key.clone(), feature).is_some() {
            tracing::warn!("Feature `{}` registered twice; keeping the later one", key);
        }
    }

    /// Register a spell, replacing any spell with the same key.
    pub fn register_spell(&mut self, spell: Spell) {
        let key = spell.key.clone();
        if self.spells.insert(key.clone(), spell).is_some() {
            tracing::warn!("Spell `{}` registered twice; keeping the later one", key);
        }
    }

    /// Load and register raw features, returning every bad entry.
    pub fn load_features<'a>(
        &mut self,
        loader: &EffectsLoader,
        raw: impl IntoIterator<Item = &'a RawFeature>,
    ) -> Vec<ContentError> {
        let mut errors = Vec::new();
        for raw in raw {
            let (feature, errs) = raw.load(loader);
            errors.extend(errs);
            self.register_feature(feature);
        }
        errors
    }

    /// Number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Number of spells.
    #[must_use]
    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    /// Iterate over all features.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.features.is_empty() && self.spells.is_empty()
    }
}

impl ContentLibrary for ContentRegistry {
    fn get_group(&self, name: &str) -> Option<&ContentGroup> {
        self.groups.get(name)
    }

    fn get_feature(&self, key: &str) -> Option<&Feature> {
        self.features.get(key)
    }

    fn get_spell(&self, key: &str) -> Option<&Spell> {
        self.spells.get(key)
    }
}
