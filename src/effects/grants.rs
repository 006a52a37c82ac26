//! Grant sub-holders.
//!
//! Grants are inert data carried by an effects container: actions a
//! character can take, proficiencies, defenses, and bonus spells. The
//! engine validates names and merges holders; it never interprets them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

fn checked_name(name: String, what: &'static str) -> Result<String, ParseError> {
    if name.trim().is_empty() {
        Err(ParseError::EmptyName(what))
    } else {
        Ok(name)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Kind of granted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Action,
    BonusAction,
    Reaction,
}

impl ActionKind {
    /// All kinds.
    pub const ALL: [ActionKind; 3] = [Self::Action, Self::BonusAction, Self::Reaction];

    /// Name used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::BonusAction => "bonus action",
            Self::Reaction => "reaction",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granted actions, bonus actions, and reactions: name to description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionGrants {
    entries: BTreeMap<ActionKind, BTreeMap<String, String>>,
}

impl ActionGrants {
    /// Create an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant an action. A later grant with the same name replaces the
    /// description.
    pub fn grant(
        &mut self,
        kind: ActionKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ParseError> {
        let name = checked_name(name.into(), kind.as_str())?;
        self.entries
            .entry(kind)
            .or_default()
            .insert(name, description.into());
        Ok(())
    }

    /// Actions of one kind, sorted by name.
    pub fn of(&self, kind: ActionKind) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Description of a granted action.
    #[must_use]
    pub fn description(&self, kind: ActionKind, name: &str) -> Option<&str> {
        self.entries.get(&kind)?.get(name).map(String::as_str)
    }

    /// Union with another holder; `other` wins on name clashes.
    pub fn merge(&mut self, other: &ActionGrants) {
        for (kind, actions) in &other.entries {
            let target = self.entries.entry(*kind).or_default();
            target.extend(actions.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    /// Check if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}

// ============================================================================
// Named sets (proficiencies, defenses)
// ============================================================================

/// Kind of proficiency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyKind {
    Armor,
    Weapon,
    Tool,
    Skill,
    SavingThrow,
    Language,
}

impl ProficiencyKind {
    /// Name used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Armor => "armor",
            Self::Weapon => "weapon",
            Self::Tool => "tool",
            Self::Skill => "skill",
            Self::SavingThrow => "saving throw",
            Self::Language => "language",
        }
    }
}

/// Kind of defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    Resistance,
    Immunity,
    ConditionImmunity,
}

impl DefenseKind {
    /// Name used in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resistance => "resistance",
            Self::Immunity => "immunity",
            Self::ConditionImmunity => "condition immunity",
        }
    }
}

/// A kind that labels a set of granted names.
pub trait GrantKind: Copy + Ord {
    /// Name used in error messages.
    fn label(self) -> &'static str;
}

impl GrantKind for ProficiencyKind {
    fn label(self) -> &'static str {
        self.as_str()
    }
}

impl GrantKind for DefenseKind {
    fn label(self) -> &'static str {
        self.as_str()
    }
}

/// Sets of granted names, one per kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: Deserialize<'de> + Ord"
))]
pub struct GrantSet<K: GrantKind> {
    entries: BTreeMap<K, BTreeSet<String>>,
}

/// Armor, weapon, tool, skill, saving throw, and language proficiencies.
pub type ProficiencyGrants = GrantSet<ProficiencyKind>;

/// Damage resistances and immunities, and condition immunities.
pub type DefenseGrants = GrantSet<DefenseKind>;

impl<K: GrantKind> Default for GrantSet<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: GrantKind> GrantSet<K> {
    /// Create an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a name.
    pub fn grant(&mut self, kind: K, name: impl Into<String>) -> Result<(), ParseError> {
        let name = checked_name(name.into(), kind.label())?;
        self.entries.entry(kind).or_default().insert(name);
        Ok(())
    }

    /// Check if a name is granted.
    #[must_use]
    pub fn contains(&self, kind: K, name: &str) -> bool {
        self.entries.get(&kind).is_some_and(|set| set.contains(name))
    }

    /// Names of one kind, sorted.
    pub fn of(&self, kind: K) -> impl Iterator<Item = &str> {
        self.entries
            .get(&kind)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Union with another holder.
    pub fn merge(&mut self, other: &GrantSet<K>) {
        for (kind, names) in &other.entries {
            self.entries
                .entry(*kind)
                .or_default()
                .extend(names.iter().cloned());
        }
    }

    /// Check if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeSet::is_empty)
    }
}

// ============================================================================
// Bonus spells
// ============================================================================

/// A spell granted outside the normal spell list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BonusSpell {
    /// Content key of the spell.
    pub spell: String,
    /// Attribute used for casting, if the grant fixes one.
    #[serde(default)]
    pub casting_attribute: Option<String>,
}

impl BonusSpell {
    /// Grant a spell with no fixed casting attribute.
    pub fn new(spell: impl Into<String>) -> Self {
        Self {
            spell: spell.into(),
            casting_attribute: None,
        }
    }

    /// Fix the casting attribute (builder pattern).
    #[must_use]
    pub fn with_casting_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.casting_attribute = Some(attribute.into());
        self
    }
}

/// Granted bonus spells, in grant order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BonusSpellGrants {
    spells: Vec<BonusSpell>,
}

impl BonusSpellGrants {
    /// Create an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a spell. Granting the same spell twice is a no-op.
    pub fn grant(&mut self, spell: BonusSpell) -> Result<(), ParseError> {
        checked_name(spell.spell.clone(), "spell")?;
        if let Some(attribute) = &spell.casting_attribute {
            checked_name(attribute.clone(), "casting attribute")?;
        }
        if !self.spells.contains(&spell) {
            self.spells.push(spell);
        }
        Ok(())
    }

    /// Iterate over granted spells.
    pub fn iter(&self) -> impl Iterator<Item = &BonusSpell> {
        self.spells.iter()
    }

    /// Union with another holder.
    pub fn merge(&mut self, other: &BonusSpellGrants) {
        for spell in &other.spells {
            if !self.spells.contains(spell) {
                self.spells.push(spell.clone());
            }
        }
    }

    /// Number of granted spells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    /// Check if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

// ============================================================================
// Grants
// ============================================================================

/// Everything an effects container grants besides stat-changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grants {
    pub actions: ActionGrants,
    pub proficiencies: ProficiencyGrants,
    pub defenses: DefenseGrants,
    pub bonus_spells: BonusSpellGrants,
}

impl Grants {
    /// Create an empty set of grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union with another set of grants.
    pub fn merge(&mut self, other: &Grants) {
        self.actions.merge(&other.actions);
        self.proficiencies.merge(&other.proficiencies);
        self.defenses.merge(&other.defenses);
        self.bonus_spells.merge(&other.bonus_spells);
    }

    /// Check if nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
            && self.proficiencies.is_empty()
            && self.defenses.is_empty()
            && self.bonus_spells.is_empty()
    }
}
