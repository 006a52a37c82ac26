//! Operands: literal values or references to named attributes.

use crate::core::{Attributes, Constants, Fixed};
use crate::error::EvalError;

/// A literal value written directly in a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `true` / `false`.
    Bool(bool),
    /// Signed decimal, already scaled.
    Number(Fixed),
}

impl Literal {
    /// Value as a fixed-point number. Booleans map to one and zero.
    #[must_use]
    pub fn value(self) -> Fixed {
        match self {
            Literal::Bool(b) => Fixed::from(b),
            Literal::Number(n) => n,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Right-hand side of a condition or stat-change.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A fixed value.
    Literal(Literal),
    /// The current value of another attribute or constant.
    Identifier(String),
}

impl Operand {
    /// Create a numeric literal operand.
    pub fn number(value: Fixed) -> Self {
        Self::Literal(Literal::Number(value))
    }

    /// Create a boolean literal operand.
    pub fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    /// Create an identifier operand.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// The referenced name, if this is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Operand::Identifier(name) => Some(name),
            Operand::Literal(_) => None,
        }
    }

    /// Check for a boolean literal.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Operand::Literal(Literal::Bool(_)))
    }

    /// Check for a literal zero.
    #[must_use]
    pub fn is_literal_zero(&self) -> bool {
        matches!(self, Operand::Literal(Literal::Number(n)) if n.is_zero())
    }

    /// Resolve to a number against the given context.
    pub fn resolve(&self, ctx: &EvalContext<'_>) -> Result<Fixed, EvalError> {
        match self {
            Operand::Literal(literal) => Ok(literal.value()),
            Operand::Identifier(name) => ctx.lookup(name),
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(literal) => write!(f, "{literal}"),
            Operand::Identifier(name) => f.write_str(name),
        }
    }
}

/// Read-only view used to resolve identifiers.
///
/// Lookups check the attribute snapshot first, then the constants.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    /// Current attribute values.
    pub attributes: &'a Attributes,
    /// Character-level constants (`LEVEL`, `CLASS_LEVEL`, ...).
    pub constants: &'a Constants,
}

impl<'a> EvalContext<'a> {
    /// Create a new context.
    pub fn new(attributes: &'a Attributes, constants: &'a Constants) -> Self {
        Self {
            attributes,
            constants,
        }
    }

    /// Look up a name in the attributes, then the constants.
    pub fn lookup(&self, name: &str) -> Result<Fixed, EvalError> {
        self.attributes
            .get(name)
            .or_else(|| self.constants.get(name))
            .ok_or_else(|| EvalError::MissingIdentifier(name.to_string()))
    }
}
