//! Building effects containers from raw content.
//!
//! A content loader hands over the strings an author wrote. Loading is
//! best-effort: each bad entry becomes a [`ContentError`] naming its source
//! and is skipped, and the rest of the container still loads.
//!
//! Activation conditions are the exception. A container with a gate that
//! does not parse keeps none of its payload, so it can never apply where
//! its author did not intend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choices::{Choice, RawChoice};
use crate::core::RulesConfig;
use crate::error::{ContentError, ParseError};
use crate::rules::RuleParser;

use super::container::EffectsContainer;
use super::grants::{ActionKind, BonusSpell, DefenseKind, Grants, ProficiencyKind};

/// An effects entry as written in content files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEffects {
    /// Activation conditions: `IDENT CMP VALUE`.
    pub conditions: Vec<String>,
    /// Stat-changes: `IDENT TIMING OP VALUE`.
    pub stat_changes: Vec<String>,
    /// Simple effects: `IDENT OP VALUE`.
    pub effects: Vec<String>,
    pub choices: Vec<RawChoice>,
    /// Granted actions by kind, name to description.
    pub actions: BTreeMap<ActionKind, BTreeMap<String, String>>,
    pub proficiencies: BTreeMap<ProficiencyKind, Vec<String>>,
    pub defenses: BTreeMap<DefenseKind, Vec<String>>,
    pub bonus_spells: Vec<BonusSpell>,
}

/// Load errors across many sources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of containers produced.
    pub loaded: usize,
    /// Every skipped entry.
    pub errors: Vec<ContentError>,
}

impl LoadReport {
    /// Check if every entry loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors from one source.
    pub fn errors_for<'a>(&'a self, source_name: &'a str) -> impl Iterator<Item = &'a ContentError> {
        self.errors.iter().filter(move |e| e.source_name == source_name)
    }

    /// Add another report.
    pub fn absorb(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.errors.extend(other.errors);
    }
}

/// Turns raw content into effects containers.
#[derive(Clone, Debug, Default)]
pub struct EffectsLoader {
    parser: RuleParser,
}

impl EffectsLoader {
    /// Create a loader with the given configuration.
    pub fn new(config: RulesConfig) -> Self {
        Self {
            parser: RuleParser::new(config),
        }
    }

    /// The loader's configuration.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        self.parser.config()
    }

    /// Load one container, collecting every bad entry.
    pub fn load(&self, source: &str, raw: &RawEffects) -> (EffectsContainer, Vec<ContentError>) {
        let mut errors = Vec::new();
        let mut container = EffectsContainer::new();

        let mut skip = |entry: &str, error: ParseError| {
            tracing::warn!("{}: skipped `{}`: {}", source, entry, error);
            errors.push(ContentError::new(source, entry, error));
        };

        let mut gate_broken = false;
        for text in &raw.conditions {
            match self.parser.parse_condition(text) {
                Ok(condition) => container = container.with_condition(condition),
                Err(e) => {
                    gate_broken = true;
                    skip(text, e);
                }
            }
        }

        for text in &raw.stat_changes {
            match self.parser.parse_stat_change(text) {
                Ok(change) => container = container.with_stat_change(change),
                Err(e) => skip(text, e),
            }
        }

        for text in &raw.effects {
            match self.parser.parse_effect(text) {
                Ok(change) => container = container.with_stat_change(change),
                Err(e) => skip(text, e),
            }
        }

        for choice in &raw.choices {
            match Choice::from_raw(choice.clone(), self.config()) {
                Ok(choice) => container = container.with_choice(choice),
                Err(e) => skip(&choice.attribute_name, e),
            }
        }

        let mut grants = Grants::new();
        for (kind, actions) in &raw.actions {
            for (name, description) in actions {
                if let Err(e) = grants.actions.grant(*kind, name.as_str(), description.as_str()) {
                    skip(name, e);
                }
            }
        }
        for (kind, names) in &raw.proficiencies {
            for name in names {
                if let Err(e) = grants.proficiencies.grant(*kind, name.as_str()) {
                    skip(name, e);
                }
            }
        }
        for (kind, names) in &raw.defenses {
            for name in names {
                if let Err(e) = grants.defenses.grant(*kind, name.as_str()) {
                    skip(name, e);
                }
            }
        }
        for spell in &raw.bonus_spells {
            if let Err(e) = grants.bonus_spells.grant(spell.clone()) {
                skip(&spell.spell, e);
            }
        }

        if gate_broken {
            tracing::warn!("{}: dropped container with a malformed activation condition", source);
            return (EffectsContainer::new(), errors);
        }
        (container.with_grants(grants), errors)
    }

    /// Load many containers, one per source.
    pub fn load_all<'a>(
        &self,
        sources: impl IntoIterator<Item = (&'a str, &'a RawEffects)>,
    ) -> (Vec<EffectsContainer>, LoadReport) {
        let mut containers = Vec::new();
        let mut report = LoadReport::default();

        for (source, raw) in sources {
            let (container, errors) = self.load(source, raw);
            containers.push(container);
            report.errors.extend(errors);
        }
        report.loaded = containers.len();

        tracing::debug!(
            "Loaded {} effects containers, {} bad entries",
            report.loaded,
            report.errors.len()
        );
        (containers, report)
    }
}
