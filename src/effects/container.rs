//! Effects containers and activation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::choices::Choice;
use crate::core::{Attributes, Constants};
use crate::error::EvalError;
use crate::rules::{Condition, ConditionEvaluator, EvalContext, StatChange};

use super::grants::Grants;

/// Activation conditions. Most containers have none or one.
pub type Conditions = SmallVec<[Condition; 2]>;

/// The unit of effect a feature, a choosable option, or a character
/// decision owns.
///
/// A container is active when every activation condition holds; an empty
/// list means always active. Containers are built once at load time and
/// not mutated afterwards.
///
/// ## Example
///
/// ```
/// use tabletop_effects::core::{Attributes, Constants, Fixed};
/// use tabletop_effects::effects::EffectsContainer;
/// use tabletop_effects::rules::{parse_condition, parse_stat_change};
///
/// let container = EffectsContainer::new()
///     .with_condition(parse_condition("CLASS_LEVEL >= 5").unwrap())
///     .with_stat_change(parse_stat_change("ATTACKS NORMAL ADD 1").unwrap());
///
/// let attrs = Attributes::new();
/// let constants = Constants::new().with("CLASS_LEVEL", Fixed::from_int(5));
/// assert!(container.is_active(&attrs, &constants).unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsContainer {
    activation_conditions: Conditions,
    choices: Vec<Choice>,
    stat_changes: Vec<StatChange>,
    grants: Grants,
}

impl EffectsContainer {
    /// Create an empty, always-active container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an activation condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.activation_conditions.push(condition);
        self
    }

    /// Add a choice (builder pattern).
    #[must_use]
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Add a stat-change (builder pattern). Declaration order is kept.
    #[must_use]
    pub fn with_stat_change(mut self, change: StatChange) -> Self {
        self.stat_changes.push(change);
        self
    }

    /// Set the grants (builder pattern).
    #[must_use]
    pub fn with_grants(mut self, grants: Grants) -> Self {
        self.grants = grants;
        self
    }

    /// Conditions that must all hold.
    #[must_use]
    pub fn activation_conditions(&self) -> &[Condition] {
        &self.activation_conditions
    }

    /// Open choices.
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Stat-changes, in declaration order.
    #[must_use]
    pub fn stat_changes(&self) -> &[StatChange] {
        &self.stat_changes
    }

    /// Granted actions, proficiencies, defenses, and spells.
    #[must_use]
    pub fn grants(&self) -> &Grants {
        &self.grants
    }

    /// Check if the container has no conditions, and so is always active.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.activation_conditions.is_empty()
    }

    /// Check if the container has nothing in it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activation_conditions.is_empty()
            && self.choices.is_empty()
            && self.stat_changes.is_empty()
            && self.grants.is_empty()
    }

    /// Check if every activation condition holds.
    pub fn is_active(&self, attributes: &Attributes, constants: &Constants) -> Result<bool, EvalError> {
        ConditionEvaluator::evaluate_all(
            &self.activation_conditions,
            &EvalContext::new(attributes, constants),
        )
    }
}

/// Check if a container is active against a snapshot.
pub fn is_active(
    container: &EffectsContainer,
    attributes: &Attributes,
    constants: &Constants,
) -> Result<bool, EvalError> {
    container.is_active(attributes, constants)
}

/// Stat-changes of every active container, flattened.
///
/// Each container's own order is kept and containers follow one another
/// in input order. Once applied, timing is the only ordering key.
pub fn collect_active_stat_changes<'a>(
    containers: impl IntoIterator<Item = &'a EffectsContainer>,
    attributes: &Attributes,
    constants: &Constants,
) -> Result<Vec<StatChange>, EvalError> {
    let mut changes = Vec::new();
    for container in containers {
        if container.is_active(attributes, constants)? {
            changes.extend(container.stat_changes.iter().cloned());
        }
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fixed;
    use crate::rules::{parse_condition, parse_stat_change};

    fn gated(condition: &str, change: &str) -> EffectsContainer {
        EffectsContainer::new()
            .with_condition(parse_condition(condition).unwrap())
            .with_stat_change(parse_stat_change(change).unwrap())
    }

    #[test]
    fn test_empty_conditions_always_active() {
        let container = EffectsContainer::new();
        assert!(is_active(&container, &Attributes::new(), &Constants::new()).unwrap());

        let noisy = Attributes::new().with("ANYTHING", Fixed::from_int(-3));
        assert!(is_active(&container, &noisy, &Constants::new()).unwrap());
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let container = EffectsContainer::new()
            .with_condition(parse_condition("LEVEL >= 3").unwrap())
            .with_condition(parse_condition("RAGING == true").unwrap());

        let constants = Constants::new().with("LEVEL", Fixed::from_int(3));
        let calm = Attributes::new().with("RAGING", Fixed::ZERO);
        let raging = Attributes::new().with("RAGING", Fixed::ONE);

        assert!(!container.is_active(&calm, &constants).unwrap());
        assert!(container.is_active(&raging, &constants).unwrap());
    }

    #[test]
    fn test_missing_identifier_is_an_error() {
        let container = gated("LEVEL >= 5", "X NORMAL ADD 1");
        assert_eq!(
            container.is_active(&Attributes::new(), &Constants::new()),
            Err(EvalError::MissingIdentifier("LEVEL".into()))
        );
    }

    #[test]
    fn test_collect_filters_and_flattens() {
        let containers = [
            gated("LEVEL >= 5", "A NORMAL ADD 1"),
            gated("LEVEL >= 10", "B NORMAL ADD 1"),
            EffectsContainer::new()
                .with_stat_change(parse_stat_change("C LATE ADD 1").unwrap())
                .with_stat_change(parse_stat_change("D EARLY ADD 1").unwrap()),
        ];
        let constants = Constants::new().with("LEVEL", Fixed::from_int(5));

        let changes = collect_active_stat_changes(&containers, &Attributes::new(), &constants).unwrap();
        let names: Vec<_> = changes.iter().map(StatChange::attribute).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_serde_uses_rule_strings() {
        let json = r#"{
            "activation_conditions": ["CLASS_LEVEL >= 2"],
            "stat_changes": ["AC LATE MAX 13"],
            "choices": [{ "attribute_name": "SKILLS", "amount": 2 }]
        }"#;
        let container: EffectsContainer = serde_json::from_str(json).unwrap();
        assert_eq!(container.activation_conditions().len(), 1);
        assert_eq!(container.stat_changes()[0].to_string(), "AC LATE MAX 13");
        assert_eq!(container.choices()[0].amount(), 2);
        assert!(container.grants().is_empty());

        let back = serde_json::to_string(&container).unwrap();
        assert!(back.contains("\"AC LATE MAX 13\""));
    }
}
