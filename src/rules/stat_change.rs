//! Stat-changes: timed operations on a single attribute.

use serde::{Deserialize, Serialize};

use crate::core::Fixed;
use crate::error::ParseError;

use super::operand::Operand;

/// Application phase of a stat-change.
///
/// Buckets apply in declaration order of this enum. Later buckets see the
/// results of earlier ones.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Timing {
    Earliest,
    Early,
    #[default]
    Normal,
    Late,
    Latest,
}

impl Timing {
    /// Number of buckets.
    pub const COUNT: usize = 5;

    /// All buckets, in application order.
    pub const ALL: [Timing; Self::COUNT] = [
        Timing::Earliest,
        Timing::Early,
        Timing::Normal,
        Timing::Late,
        Timing::Latest,
    ];

    /// Position in application order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rule-string token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Timing::Earliest => "EARLIEST",
            Timing::Early => "EARLY",
            Timing::Normal => "NORMAL",
            Timing::Late => "LATE",
            Timing::Latest => "LATEST",
        }
    }
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timing {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timing::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnknownTiming(s.to_string()))
    }
}

/// Arithmetic failure while applying an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticFault {
    DivisionByZero,
    Overflow,
}

/// What a stat-change does to its attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// `current + operand`
    Add,
    /// `current - operand`
    Sub,
    /// `current * operand`, rescaled
    Mult,
    /// `current / operand`, rescaled
    Div,
    /// `operand`
    Set,
    /// `max(current, operand)`
    Max,
    /// `min(current, operand)`
    Min,
}

impl Operation {
    /// All operations.
    pub const ALL: [Operation; 7] = [
        Operation::Add,
        Operation::Sub,
        Operation::Mult,
        Operation::Div,
        Operation::Set,
        Operation::Max,
        Operation::Min,
    ];

    /// Rule-string token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Mult => "MULT",
            Operation::Div => "DIV",
            Operation::Set => "SET",
            Operation::Max => "MAX",
            Operation::Min => "MIN",
        }
    }

    /// Compute the new attribute value.
    pub fn apply(self, current: Fixed, operand: Fixed) -> Result<Fixed, ArithmeticFault> {
        let result = match self {
            Operation::Add => current.checked_add(operand),
            Operation::Sub => current.checked_sub(operand),
            Operation::Mult => current.checked_mul(operand),
            Operation::Div => {
                if operand.is_zero() {
                    return Err(ArithmeticFault::DivisionByZero);
                }
                current.checked_div(operand)
            }
            Operation::Set => Some(operand),
            Operation::Max => Some(current.max(operand)),
            Operation::Min => Some(current.min(operand)),
        };
        result.ok_or(ArithmeticFault::Overflow)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseError::UnknownOperation(s.to_string()))
    }
}

/// A timed operation on one attribute, immutable once built.
///
/// Serializes as its rule string (`AC LATE MAX 13`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatChange {
    attribute: String,
    timing: Timing,
    operation: Operation,
    operand: Operand,
}

impl StatChange {
    /// Create a stat-change from typed parts.
    pub fn new(
        attribute: impl Into<String>,
        timing: Timing,
        operation: Operation,
        operand: Operand,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            timing,
            operation,
            operand,
        }
    }

    /// Target attribute.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Application bucket.
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Operation.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Operand.
    #[must_use]
    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl std::fmt::Display for StatChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.attribute, self.timing, self.operation, self.operand
        )
    }
}

impl TryFrom<String> for StatChange {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        super::parser::parse_stat_change(&value)
    }
}

impl From<StatChange> for String {
    fn from(value: StatChange) -> Self {
        value.to_string()
    }
}
