//! Gating conditions.
//!
//! A condition compares a named attribute against an operand, e.g.
//! `CLASS_LEVEL >= 5`. Conditions decide whether an effects container is
//! active for a character.

use serde::{Deserialize, Serialize};

use crate::core::{Attributes, Constants, Fixed};
use crate::error::{EvalError, ParseError};

use super::operand::{EvalContext, Operand};

/// Comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparison {
    /// All comparators.
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Ne,
        Comparison::Lt,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Ge,
    ];

    /// Rule-string token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// Equality comparators are the only ones that make sense for booleans.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Comparison::Eq | Comparison::Ne)
    }

    /// Compare two values.
    #[must_use]
    pub fn apply(self, lhs: Fixed, rhs: Fixed) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Comparison {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseError::UnknownComparator(s.to_string()))
    }
}

/// `left comparator right`, immutable once built.
///
/// Serializes as its rule string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Condition {
    left: String,
    comparator: Comparison,
    right: Operand,
}

impl Condition {
    /// Create a condition from typed parts.
    pub fn new(left: impl Into<String>, comparator: Comparison, right: Operand) -> Self {
        Self {
            left: left.into(),
            comparator,
            right,
        }
    }

    /// Left-hand identifier.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Comparison operator.
    #[must_use]
    pub fn comparator(&self) -> Comparison {
        self.comparator
    }

    /// Right-hand operand.
    #[must_use]
    pub fn right(&self) -> &Operand {
        &self.right
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.comparator, self.right)
    }
}

impl TryFrom<String> for Condition {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        super::parser::parse_condition(&value)
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.to_string()
    }
}

/// Evaluator for conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a condition holds.
    ///
    /// Both sides are resolved through `ctx`; an identifier missing from the
    /// attributes and the constants is an error, not `false`.
    pub fn evaluate(condition: &Condition, ctx: &EvalContext<'_>) -> Result<bool, EvalError> {
        let lhs = ctx.lookup(&condition.left)?;
        let rhs = condition.right.resolve(ctx)?;
        Ok(condition.comparator.apply(lhs, rhs))
    }

    /// Check that every condition holds. Empty means true.
    ///
    /// Stops at the first error.
    pub fn evaluate_all<'c>(
        conditions: impl IntoIterator<Item = &'c Condition>,
        ctx: &EvalContext<'_>,
    ) -> Result<bool, EvalError> {
        for condition in conditions {
            if !Self::evaluate(condition, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Evaluate one condition against an attribute snapshot and constants.
pub fn evaluate(
    condition: &Condition,
    attributes: &Attributes,
    constants: &Constants,
) -> Result<bool, EvalError> {
    ConditionEvaluator::evaluate(condition, &EvalContext::new(attributes, constants))
}
