//! Error types for rule parsing, evaluation, choices, and assembly.
//!
//! Errors fall into three families with different propagation rules:
//!
//! - **Load-time** (`ParseError`, `ContentError`): content-authoring mistakes.
//!   Loaders keep going past a bad entry and report every problem at once.
//! - **Evaluation** (`EvalError`): found while building a character.
//!   Some are recoverable (the offending change is skipped), some are fatal
//!   to the evaluation that hit them.
//! - **Choice** (`ChoiceError`): a user's picks don't fit a choice. Each
//!   choice is validated independently.
//!
//! Functions that can hit several problems return collections of errors
//! instead of stopping at the first one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an error affects the evaluation that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// The offending item was skipped; everything else is still valid.
    ///
    /// Examples: division by a zero-valued identifier, arithmetic overflow.
    Recoverable,

    /// The evaluation cannot be trusted.
    ///
    /// Examples: a reference to an attribute that doesn't exist, which
    /// points at a content bug.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable name for this severity.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if evaluation can continue past this error.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Load-time errors
// ============================================================================

/// A rule string that doesn't fit the grammar or breaks a load-time rule.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The rule has the wrong number of space-separated tokens.
    #[error("expected {expected} tokens, found {found} in `{input}`")]
    WrongTokenCount {
        input: String,
        expected: &'static str,
        found: usize,
    },

    /// A token in identifier position is not `[A-Z][A-Z0-9_]*`.
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// Unknown comparison operator.
    #[error("unknown comparator `{0}`")]
    UnknownComparator(String),

    /// Unknown stat-change operation.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// Unknown timing bucket.
    #[error("unknown timing `{0}`")]
    UnknownTiming(String),

    /// The value token is not a bool, identifier, or signed decimal.
    #[error("invalid literal `{0}`")]
    InvalidLiteral(String),

    /// A decimal literal has more precision than the fixed-point scale.
    #[error("literal `{0}` has more than two fractional digits")]
    TooManyFractionDigits(String),

    /// `DIV` with a literal zero operand.
    #[error("division by literal zero in `{0}`")]
    DivisionByZeroLiteral(String),

    /// A boolean operand used where only numbers make sense.
    #[error("boolean operand not allowed in `{0}`")]
    BoolOperandNotAllowed(String),

    /// Choice amount is zero or above the configured maximum.
    #[error("choice `{attribute}` amount {amount} outside 1..={max}")]
    ChoiceAmountOutOfRange {
        attribute: String,
        amount: u32,
        max: u32,
    },

    /// A grant or choice entry with an empty name.
    #[error("empty {0} name")]
    EmptyName(&'static str),
}

/// A load-time error attributed to the content that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{source_name}: {entry}: {error}")]
pub struct ContentError {
    /// Content file or feature the entry belongs to.
    pub source_name: String,
    /// The offending entry, as written by the content author.
    pub entry: String,
    /// What was wrong with it.
    pub error: ParseError,
}

impl ContentError {
    /// Attribute a parse error to a content source.
    pub fn new(source_name: impl Into<String>, entry: impl Into<String>, error: ParseError) -> Self {
        Self {
            source_name: source_name.into(),
            entry: entry.into(),
            error,
        }
    }
}

// ============================================================================
// Evaluation errors
// ============================================================================

/// Failure while evaluating conditions or applying stat-changes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Identifier not present in the attributes or the constants.
    #[error("missing identifier `{0}`")]
    MissingIdentifier(String),

    /// `DIV` operand resolved to zero at evaluation time.
    #[error("division by zero while applying to `{attribute}`")]
    DivisionByZero { attribute: String },

    /// Result does not fit the fixed-point range.
    #[error("arithmetic overflow while applying to `{attribute}`")]
    Overflow { attribute: String },
}

impl EvalError {
    /// Severity of this error.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingIdentifier(_) => ErrorSeverity::Fatal,
            Self::DivisionByZero { .. } | Self::Overflow { .. } => ErrorSeverity::Recoverable,
        }
    }
}

// ============================================================================
// Choice errors
// ============================================================================

/// A selection that does not satisfy its choice.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChoiceError {
    /// Number of picks differs from the choice amount.
    #[error("choice `{attribute}` needs {expected} picks, got {found}")]
    WrongCardinality {
        attribute: String,
        expected: u32,
        found: usize,
    },

    /// A pick outside the legal option set.
    #[error("`{option}` is not an option for choice `{attribute}`")]
    UnknownOption { attribute: String, option: String },

    /// The same option picked more than once.
    #[error("`{option}` picked more than once for choice `{attribute}`")]
    DuplicatePick { attribute: String, option: String },

    /// A named content group that the library doesn't have.
    #[error("choice `{attribute}` references unknown group `{group}`")]
    UnknownGroup { attribute: String, group: String },
}

impl ChoiceError {
    /// The attribute name of the choice this error belongs to.
    pub fn attribute(&self) -> &str {
        match self {
            Self::WrongCardinality { attribute, .. }
            | Self::UnknownOption { attribute, .. }
            | Self::DuplicatePick { attribute, .. }
            | Self::UnknownGroup { attribute, .. } => attribute,
        }
    }
}

// ============================================================================
// Content library errors
// ============================================================================

/// A writer panicked while holding the shared content library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("content library lock poisoned")]
pub struct LockPoisoned;

// ============================================================================
// Assembly errors
// ============================================================================

/// Any problem found while assembling a character.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The character references a feature the library doesn't have.
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),

    /// A bonus-spell grant references a spell the library doesn't have.
    #[error("unknown spell `{0}`")]
    UnknownSpell(String),

    /// Evaluation failure.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Choice validation failure.
    #[error(transparent)]
    Choice(#[from] ChoiceError),
}

impl BuildError {
    /// Severity of this error.
    ///
    /// Missing content and invalid choices leave the rest of the build
    /// intact, so only evaluation errors can be fatal.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Eval(e) => e.severity(),
            Self::UnknownFeature(_) | Self::UnknownSpell(_) | Self::Choice(_) => {
                ErrorSeverity::Recoverable
            }
        }
    }
}
