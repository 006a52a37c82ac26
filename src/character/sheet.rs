//! Character decisions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choices::ChoiceSelections;
use crate::core::{Attributes, Constants, Fixed};
use crate::effects::EffectsContainer;

/// Everything a user decided about a character.
///
/// This is input only. The derived attribute map is rebuilt from it by
/// [`super::Assembler`] whenever it is needed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    /// Base attributes, e.g. raw ability scores.
    pub base: Attributes,
    /// Values that are not attributes but can be referenced, e.g. `CLASS_LEVEL`.
    pub constants: Constants,
    /// Feature keys, resolved through the content library.
    pub features: Vec<String>,
    /// Effects the character owns directly.
    pub decisions: Vec<EffectsContainer>,
    /// Picks for any choice with the given attribute name.
    pub selections: ChoiceSelections,
    /// Picks for one feature's choices, keyed by feature key. These take
    /// precedence over `selections`.
    pub feature_selections: BTreeMap<String, ChoiceSelections>,
}

impl Character {
    /// Create a character with nothing decided.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a base attribute (builder pattern).
    #[must_use]
    pub fn with_base(mut self, name: impl Into<String>, value: Fixed) -> Self {
        self.base.set(name, value);
        self
    }

    /// Set a constant (builder pattern).
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: Fixed) -> Self {
        self.constants.set(name, value);
        self
    }

    /// Add a feature by key (builder pattern).
    #[must_use]
    pub fn with_feature(mut self, key: impl Into<String>) -> Self {
        self.features.push(key.into());
        self
    }

    /// Add a decision (builder pattern).
    #[must_use]
    pub fn with_decision(mut self, effects: EffectsContainer) -> Self {
        self.decisions.push(effects);
        self
    }

    /// Record picks for a choice (builder pattern). Picks are validated
    /// during assembly.
    #[must_use]
    pub fn with_selection(
        mut self,
        attribute: impl Into<String>,
        picks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.selections.record(attribute, picks);
        self
    }

    /// Record picks for a choice offered by one feature (builder pattern).
    #[must_use]
    pub fn with_feature_selection(
        mut self,
        feature: impl Into<String>,
        attribute: impl Into<String>,
        picks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.feature_selections
            .entry(feature.into())
            .or_default()
            .record(attribute, picks);
        self
    }

    /// Picks answering a choice. `feature` is the key of the feature that
    /// offers it, or `None` for the character's own decisions.
    #[must_use]
    pub fn picks(&self, feature: Option<&str>, attribute: &str) -> Option<&[String]> {
        feature
            .and_then(|key| self.feature_selections.get(key))
            .and_then(|scoped| scoped.get(attribute))
            .or_else(|| self.selections.get(attribute))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let character = Character::new("Vex")
            .with_base("DEX", Fixed::from_int(16))
            .with_constant("CLASS_LEVEL", Fixed::from_int(3))
            .with_feature("sneak_attack")
            .with_selection("SKILLS", ["Stealth"]);

        assert_eq!(character.base.get("DEX"), Some(Fixed::from_int(16)));
        assert_eq!(character.constants.get("CLASS_LEVEL"), Some(Fixed::from_int(3)));
        assert_eq!(character.features, vec!["sneak_attack".to_string()]);
        assert!(character.selections.contains("SKILLS"));
    }

    #[test]
    fn test_feature_picks_take_precedence() {
        let character = Character::new("Vex")
            .with_selection("SKILLS", ["Stealth"])
            .with_feature_selection("acolyte", "SKILLS", ["Insight"]);

        let picks = |feature| character.picks(feature, "SKILLS").map(<[String]>::to_vec);
        assert_eq!(picks(Some("acolyte")), Some(vec!["Insight".to_string()]));
        assert_eq!(picks(Some("rogue")), Some(vec!["Stealth".to_string()]));
        assert_eq!(picks(None), Some(vec!["Stealth".to_string()]));
        assert!(character.picks(Some("acolyte"), "TOOLS").is_none());
    }

    #[test]
    fn test_json() {
        let character: Character = serde_json::from_str(
            r#"{
                "name": "Vex",
                "base": { "DEX": 1600 },
                "features": ["sneak_attack"],
                "selections": { "SKILLS": ["Stealth", "Arcana"] },
                "feature_selections": { "acolyte": { "SKILLS": ["Insight"] } }
            }"#,
        )
        .unwrap();

        assert_eq!(character.base.get("DEX"), Some(Fixed::from_int(16)));
        assert!(character.constants.is_empty());
        assert_eq!(character.selections.get("SKILLS").map(<[String]>::len), Some(2));
        assert_eq!(character.picks(Some("acolyte"), "SKILLS").map(<[String]>::len), Some(1));
    }
}
