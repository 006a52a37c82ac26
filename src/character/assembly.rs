//! Whole-character assembly.
//!
//! Assembly is the one place all subsystems meet:
//!
//! 1. Feature keys are resolved through the content library.
//! 2. Feature effects and the character's own decisions are queued.
//! 3. Each queued container is checked for activation against the base
//!    attributes and constants. Inactive containers are dropped.
//! 4. Choices of active containers are validated against the recorded
//!    picks, preferring picks scoped to the owning feature. Valid picks
//!    that the owning feature's choosable knows about are materialized
//!    into new containers, owned by the same feature, and queued in turn.
//! 5. Stat-changes of all active containers are applied in timing order.
//! 6. Grants are merged and bonus spells resolved.
//!
//! Every problem is collected; nothing short-circuits the build.

use std::borrow::Cow;
use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::choices::{Choice, ChoiceResolver};
use crate::content::{ContentLibrary, Feature, Spell};
use crate::core::Attributes;
use crate::effects::{EffectsContainer, Grants, StatChangeEngine};
use crate::error::{BuildError, ErrorSeverity};

use super::sheet::Character;

/// A bonus spell found in the content library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSpell {
    pub spell: Spell,
    pub casting_attribute: Option<String>,
}

/// The result of assembling a character. Read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    attributes: Attributes,
    grants: Grants,
    bonus_spells: Vec<ResolvedSpell>,
    unresolved_choices: Vec<Choice>,
    errors: Vec<BuildError>,
    active_count: usize,
}

impl Assembly {
    /// Final attribute map.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Merged grants of every active container.
    #[must_use]
    pub fn grants(&self) -> &Grants {
        &self.grants
    }

    /// Bonus spells that resolved.
    #[must_use]
    pub fn bonus_spells(&self) -> &[ResolvedSpell] {
        &self.bonus_spells
    }

    /// Choices of active containers that have no picks yet.
    #[must_use]
    pub fn unresolved_choices(&self) -> &[Choice] {
        &self.unresolved_choices
    }

    /// Every problem found.
    #[must_use]
    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    /// Number of containers that were active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Check if the build had no errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if the build had no errors and every choice is made.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_clean() && self.unresolved_choices.is_empty()
    }

    /// Check if any error makes the attributes untrustworthy.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity() == ErrorSeverity::Fatal)
    }
}

/// Assembles characters.
pub struct Assembler;

impl Assembler {
    /// Build a character from scratch against a content library.
    pub fn assemble(character: &Character, content: &impl ContentLibrary) -> Assembly {
        let mut errors: Vec<BuildError> = Vec::new();

        let features: Vec<&Feature> = character
            .features
            .iter()
            .filter_map(|key| {
                let feature = content.get_feature(key);
                if feature.is_none() {
                    tracing::warn!("{}: unknown feature `{}`", character.name, key);
                    errors.push(BuildError::UnknownFeature(key.clone()));
                }
                feature
            })
            .collect();

        // Each container travels with the feature that owns it. Choices are
        // answered with that feature's picks and choosables.
        let mut pending: VecDeque<(Option<&Feature>, Cow<'_, EffectsContainer>)> = features
            .iter()
            .copied()
            .flat_map(|f| f.effects.iter().map(move |e| (Some(f), Cow::Borrowed(e))))
            .chain(character.decisions.iter().map(|e| (None, Cow::Borrowed(e))))
            .collect();

        let base = &character.base;
        let constants = &character.constants;
        let mut active = Vec::new();
        let mut unresolved = Vec::new();
        let mut materialized: FxHashSet<(Option<String>, String, String)> = FxHashSet::default();

        while let Some((owner, container)) = pending.pop_front() {
            match container.is_active(base, constants) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    tracing::warn!("{}: activation failed: {}", character.name, err);
                    errors.push(err.into());
                    continue;
                }
            }

            let owner_key = owner.map(|f| f.key.as_str());
            for choice in container.choices() {
                let Some(picks) = character.picks(owner_key, choice.attribute_name()) else {
                    unresolved.push(choice.clone());
                    continue;
                };
                if let Err(errs) = ChoiceResolver::validate_selection(choice, picks, content) {
                    errors.extend(errs.into_iter().map(BuildError::from));
                    continue;
                }

                let Some(choosable) = owner.and_then(|f| f.choosable(choice.attribute_name())) else {
                    continue;
                };
                for pick in picks {
                    let key = (
                        owner_key.map(str::to_string),
                        choice.attribute_name().to_string(),
                        pick.clone(),
                    );
                    if !materialized.insert(key) {
                        continue;
                    }
                    if let Some(effects) = choosable.materialize(pick) {
                        pending.push_back((owner, Cow::Owned(effects)));
                    }
                }
            }

            active.push(container);
        }

        let mut attributes = base.clone();
        let report = StatChangeEngine::apply_all(
            active.iter().flat_map(|c| c.stat_changes()),
            &mut attributes,
            constants,
        );
        errors.extend(report.errors.into_iter().map(BuildError::from));

        let mut grants = Grants::new();
        for container in &active {
            grants.merge(container.grants());
        }

        let mut bonus_spells = Vec::new();
        for bonus in grants.bonus_spells.iter() {
            match content.get_spell(&bonus.spell) {
                Some(spell) => bonus_spells.push(ResolvedSpell {
                    spell: spell.clone(),
                    casting_attribute: bonus.casting_attribute.clone(),
                }),
                None => errors.push(BuildError::UnknownSpell(bonus.spell.clone())),
            }
        }

        tracing::debug!(
            "{}: {} active containers, {} changes applied, {} unresolved choices, {} errors",
            character.name,
            active.len(),
            report.applied,
            unresolved.len(),
            errors.len()
        );

        Assembly {
            attributes,
            grants,
            bonus_spells,
            unresolved_choices: unresolved,
            errors,
            active_count: active.len(),
        }
    }
}
