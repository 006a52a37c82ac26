//! Features, choosables, and spells.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::{EffectsContainer, EffectsLoader, Grants, ProficiencyKind, RawEffects};
use crate::error::ContentError;

/// A picked option's effects, keyed by option name.
///
/// A choosable shares its `attribute_name` with the choice that offers it.
/// A pick with its own entry in `options` gets that container; otherwise,
/// if `grant_as` is set, the pick itself is granted as a proficiency of
/// that kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choosable {
    pub attribute_name: String,
    #[serde(default)]
    pub options: BTreeMap<String, EffectsContainer>,
    #[serde(default)]
    pub grant_as: Option<ProficiencyKind>,
}

impl Choosable {
    /// Create a choosable with no options.
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            options: BTreeMap::new(),
            grant_as: None,
        }
    }

    /// Add an option (builder pattern).
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>, effects: EffectsContainer) -> Self {
        self.options.insert(option.into(), effects);
        self
    }

    /// Grant picks without their own option as proficiencies (builder pattern).
    #[must_use]
    pub fn with_grant_as(mut self, kind: ProficiencyKind) -> Self {
        self.grant_as = Some(kind);
        self
    }

    /// The container a pick turns into, if any.
    pub fn materialize(&self, pick: &str) -> Option<EffectsContainer> {
        if let Some(effects) = self.options.get(pick) {
            return Some(effects.clone());
        }
        let kind = self.grant_as?;
        let mut grants = Grants::new();
        grants.proficiencies.grant(kind, pick).ok()?;
        Some(EffectsContainer::new().with_grants(grants))
    }
}

/// A named bundle of effects: a class feature, a species trait, a feat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<EffectsContainer>,
    #[serde(default)]
    pub choosables: Vec<Choosable>,
}

impl Feature {
    /// Create a feature with no effects.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            effects: Vec::new(),
            choosables: Vec::new(),
        }
    }

    /// Add an effects container (builder pattern).
    #[must_use]
    pub fn with_effects(mut self, effects: EffectsContainer) -> Self {
        self.effects.push(effects);
        self
    }

    /// Add a choosable (builder pattern).
    #[must_use]
    pub fn with_choosable(mut self, choosable: Choosable) -> Self {
        self.choosables.push(choosable);
        self
    }

    /// The choosable answering a choice.
    #[must_use]
    pub fn choosable(&self, attribute_name: &str) -> Option<&Choosable> {
        self.choosables
            .iter()
            .find(|c| c.attribute_name == attribute_name)
    }
}

/// A spell, as far as the engine cares.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spell {
    pub key: String,
    pub name: String,
    /// Spell level; 0 for cantrips.
    #[serde(default)]
    pub level: u8,
}

impl Spell {
    pub fn new(key: impl Into<String>, name: impl Into<String>, level: u8) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            level,
        }
    }

    /// Check if this is a cantrip.
    #[must_use]
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}

/// A choosable as written in content files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChoosable {
    pub attribute_name: String,
    pub options: BTreeMap<String, RawEffects>,
    pub grant_as: Option<ProficiencyKind>,
}

/// A feature as written in content files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeature {
    pub key: String,
    pub name: String,
    pub effects: Vec<RawEffects>,
    pub choosables: Vec<RawChoosable>,
}

impl RawFeature {
    /// Build the feature, keeping every entry that loads.
    ///
    /// Errors are attributed to the feature key, with the option name
    /// appended for entries inside a choosable option.
    pub fn load(&self, loader: &EffectsLoader) -> (Feature, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut feature = Feature::new(self.key.as_str(), self.name.as_str());

        for raw in &self.effects {
            let (effects, errs) = loader.load(&self.key, raw);
            feature.effects.push(effects);
            errors.extend(errs);
        }

        for raw in &self.choosables {
            let mut choosable = Choosable::new(raw.attribute_name.as_str());
            choosable.grant_as = raw.grant_as;
            for (option, raw_effects) in &raw.options {
                let source = format!("{}/{}", self.key, option);
                let (effects, errs) = loader.load(&source, raw_effects);
                choosable.options.insert(option.clone(), effects);
                errors.extend(errs);
            }
            feature.choosables.push(choosable);
        }

        (feature, errors)
    }
}
