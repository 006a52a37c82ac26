//! Rule-string grammar and load-time validation.
//!
//! Every rule string passes through here before the parser sees it:
//!
//! ```text
//! IDENT [TIMING] (COMPARATOR | OPERATION) (true | false | IDENT | signed-decimal)
//! ```
//!
//! The whole-string patterns accept or reject quickly. On rejection, a
//! token-by-token pass names the first offending token so content authors
//! get a useful message.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::core::Fixed;
use crate::error::ParseError;

use super::condition::Comparison;
use super::stat_change::{Operation, Timing};

const IDENT: &str = r"[A-Z][A-Z0-9_]*";
const VALUE: &str = r"(?:true|false|[A-Z][A-Z0-9_]*|-?[0-9]+(?:\.[0-9]+)?)";
const COMPARATOR: &str = r"(?:==|!=|<=|>=|<|>)";
const TIMING: &str = r"(?:EARLIEST|EARLY|NORMAL|LATE|LATEST)";
const OPERATION: &str = r"(?:ADD|SUB|MULT|DIV|SET|MAX|MIN)";

static IDENT_REGEX: OnceLock<Regex> = OnceLock::new();
static CONDITION_REGEX: OnceLock<Regex> = OnceLock::new();
static STAT_CHANGE_REGEX: OnceLock<Regex> = OnceLock::new();
static EFFECT_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: impl FnOnce() -> String) -> &'static Regex {
    cell.get_or_init(|| Regex::new(&pattern()).expect("rule grammar pattern is invalid"))
}

fn ident_regex() -> &'static Regex {
    compiled(&IDENT_REGEX, || format!("^{IDENT}$"))
}

fn condition_regex() -> &'static Regex {
    compiled(&CONDITION_REGEX, || format!("^{IDENT} {COMPARATOR} {VALUE}$"))
}

fn stat_change_regex() -> &'static Regex {
    compiled(&STAT_CHANGE_REGEX, || {
        format!("^{IDENT} {TIMING} {OPERATION} {VALUE}$")
    })
}

fn effect_regex() -> &'static Regex {
    compiled(&EFFECT_REGEX, || format!("^{IDENT} {OPERATION} {VALUE}$"))
}

/// The three rule shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleShape {
    /// `IDENT COMPARATOR VALUE`
    Condition,
    /// `IDENT TIMING OPERATION VALUE`
    StatChange,
    /// `IDENT OPERATION VALUE`
    SimpleEffect,
}

impl RuleShape {
    fn token_count(self) -> usize {
        match self {
            RuleShape::Condition | RuleShape::SimpleEffect => 3,
            RuleShape::StatChange => 4,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            RuleShape::Condition => condition_regex(),
            RuleShape::StatChange => stat_change_regex(),
            RuleShape::SimpleEffect => effect_regex(),
        }
    }
}

/// Check that `token` is a valid identifier.
pub fn validate_identifier(token: &str) -> Result<(), ParseError> {
    if ident_regex().is_match(token) {
        Ok(())
    } else {
        Err(ParseError::InvalidIdentifier(token.to_string()))
    }
}

/// Work out which shape a rule string has, validating it fully.
pub fn validate(input: &str) -> Result<RuleShape, ParseError> {
    let shape = detect_shape(input)?;
    validate_as(input, shape)?;
    Ok(shape)
}

/// Validate a rule string against one specific shape.
///
/// Checks the grammar, then the load-time rules: no division by a literal
/// zero, booleans only with `SET` or in equality conditions, at most two
/// fractional digits.
pub fn validate_as(input: &str, shape: RuleShape) -> Result<(), ParseError> {
    if !shape.regex().is_match(input) {
        return Err(diagnose(input, shape));
    }

    let tokens: Vec<&str> = input.split(' ').collect();
    let value = tokens[tokens.len() - 1];
    check_value(value)?;

    match shape {
        RuleShape::Condition => {
            let comparator: Comparison = tokens[1].parse()?;
            if is_bool_token(value) && !comparator.is_equality() {
                return Err(ParseError::BoolOperandNotAllowed(input.to_string()));
            }
        }
        RuleShape::StatChange | RuleShape::SimpleEffect => {
            let operation: Operation = tokens[tokens.len() - 2].parse()?;
            check_operation(input, operation, value)?;
        }
    }

    Ok(())
}

fn detect_shape(input: &str) -> Result<RuleShape, ParseError> {
    let tokens: Vec<&str> = input.split(' ').collect();
    match tokens.len() {
        4 => Ok(RuleShape::StatChange),
        3 if tokens[1].parse::<Comparison>().is_ok() => Ok(RuleShape::Condition),
        3 if tokens[1].parse::<Operation>().is_ok() => Ok(RuleShape::SimpleEffect),
        3 if tokens[1].starts_with(['=', '!', '<', '>']) => {
            Err(ParseError::UnknownComparator(tokens[1].to_string()))
        }
        3 => Err(ParseError::UnknownOperation(tokens[1].to_string())),
        found => Err(ParseError::WrongTokenCount {
            input: input.to_string(),
            expected: "3 or 4",
            found,
        }),
    }
}

fn is_bool_token(token: &str) -> bool {
    matches!(token, "true" | "false")
}

fn check_value(token: &str) -> Result<(), ParseError> {
    if is_bool_token(token) || ident_regex().is_match(token) {
        return Ok(());
    }
    token.parse::<Fixed>().map(|_| ())
}

fn check_operation(input: &str, operation: Operation, value: &str) -> Result<(), ParseError> {
    if is_bool_token(value) && operation != Operation::Set {
        return Err(ParseError::BoolOperandNotAllowed(input.to_string()));
    }
    if operation == Operation::Div && value.parse::<Fixed>().is_ok_and(Fixed::is_zero) {
        return Err(ParseError::DivisionByZeroLiteral(input.to_string()));
    }
    Ok(())
}

/// Find the first token that breaks `shape`.
fn diagnose(input: &str, shape: RuleShape) -> ParseError {
    let tokens: Vec<&str> = input.split(' ').collect();
    if tokens.len() != shape.token_count() {
        return ParseError::WrongTokenCount {
            input: input.to_string(),
            expected: if shape.token_count() == 3 { "3" } else { "4" },
            found: tokens.len(),
        };
    }

    let result = validate_identifier(tokens[0]).and_then(|()| match shape {
        RuleShape::Condition => tokens[1].parse::<Comparison>().map(|_| ()),
        RuleShape::SimpleEffect => tokens[1].parse::<Operation>().map(|_| ()),
        RuleShape::StatChange => tokens[1]
            .parse::<Timing>()
            .and_then(|_| tokens[2].parse::<Operation>())
            .map(|_| ()),
    });
    if let Err(err) = result {
        return err;
    }

    let value = tokens[tokens.len() - 1];
    match check_value(value) {
        Err(err @ ParseError::TooManyFractionDigits(_)) => err,
        Err(_) if value.starts_with(|c: char| c.is_ascii_uppercase()) => {
            ParseError::InvalidIdentifier(value.to_string())
        }
        Err(err) => err,
        Ok(()) => ParseError::InvalidLiteral(value.to_string()),
    }
}
