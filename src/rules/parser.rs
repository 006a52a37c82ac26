//! Rule-string parser.
//!
//! Turns validated rule strings into typed values. Parsing always runs the
//! grammar check first, so every entry point is total: malformed input
//! comes back as a `ParseError`, never a panic.

use crate::core::{Fixed, RulesConfig};
use crate::error::ParseError;

use super::condition::{Comparison, Condition};
use super::grammar::{self, RuleShape};
use super::operand::Operand;
use super::stat_change::{Operation, StatChange, Timing};

/// A parsed rule of any shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    Condition(Condition),
    StatChange(StatChange),
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Condition(c) => write!(f, "{c}"),
            Rule::StatChange(s) => write!(f, "{s}"),
        }
    }
}

/// Parser for rule strings.
///
/// ## Example
///
/// ```
/// use tabletop_effects::rules::{Operation, RuleParser, Timing};
///
/// let parser = RuleParser::default();
///
/// let change = parser.parse_stat_change("STR_MOD NORMAL ADD 2").unwrap();
/// assert_eq!(change.timing(), Timing::Normal);
/// assert_eq!(change.operation(), Operation::Add);
///
/// assert!(parser.parse_condition("CLASS_LEVEL >= 5").is_ok());
/// assert!(parser.parse_condition("class_level >= 5").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleParser {
    config: RulesConfig,
}

impl RuleParser {
    /// Create a parser with the given configuration.
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// The parser's configuration.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Parse `IDENT COMPARATOR VALUE`.
    pub fn parse_condition(&self, input: &str) -> Result<Condition, ParseError> {
        grammar::validate_as(input, RuleShape::Condition)?;
        let tokens = split(input);

        let comparator: Comparison = tokens[1].parse()?;
        let right = parse_operand(tokens[2])?;
        Ok(Condition::new(tokens[0], comparator, right))
    }

    /// Parse `IDENT TIMING OPERATION VALUE`.
    pub fn parse_stat_change(&self, input: &str) -> Result<StatChange, ParseError> {
        grammar::validate_as(input, RuleShape::StatChange)?;
        let tokens = split(input);

        let timing: Timing = tokens[1].parse()?;
        let operation: Operation = tokens[2].parse()?;
        let operand = parse_operand(tokens[3])?;
        Ok(StatChange::new(tokens[0], timing, operation, operand))
    }

    /// Parse `IDENT OPERATION VALUE` into a stat-change in the configured
    /// default bucket.
    pub fn parse_effect(&self, input: &str) -> Result<StatChange, ParseError> {
        grammar::validate_as(input, RuleShape::SimpleEffect)?;
        let tokens = split(input);

        let operation: Operation = tokens[1].parse()?;
        let operand = parse_operand(tokens[2])?;
        Ok(StatChange::new(
            tokens[0],
            self.config.simple_effect_timing,
            operation,
            operand,
        ))
    }

    /// Parse a rule of any shape.
    pub fn parse_rule(&self, input: &str) -> Result<Rule, ParseError> {
        match grammar::validate(input)? {
            RuleShape::Condition => self.parse_condition(input).map(Rule::Condition),
            RuleShape::StatChange => self.parse_stat_change(input).map(Rule::StatChange),
            RuleShape::SimpleEffect => self.parse_effect(input).map(Rule::StatChange),
        }
    }
}

fn split(input: &str) -> Vec<&str> {
    input.split(' ').collect()
}

/// Classify and parse a value token.
///
/// Uppercase-leading tokens are identifiers, `true`/`false` are booleans,
/// anything else is a decimal scaled by [`Fixed::SCALE`].
pub fn parse_operand(token: &str) -> Result<Operand, ParseError> {
    match token {
        "true" => Ok(Operand::boolean(true)),
        "false" => Ok(Operand::boolean(false)),
        t if t.starts_with(|c: char| c.is_ascii_uppercase()) => {
            grammar::validate_identifier(t)?;
            Ok(Operand::identifier(t))
        }
        t => t.parse::<Fixed>().map(Operand::number),
    }
}

/// Parse a condition with the default configuration.
pub fn parse_condition(input: &str) -> Result<Condition, ParseError> {
    RuleParser::default().parse_condition(input)
}

/// Parse a stat-change with the default configuration.
pub fn parse_stat_change(input: &str) -> Result<StatChange, ParseError> {
    RuleParser::default().parse_stat_change(input)
}

/// Parse a simple effect with the default configuration.
pub fn parse_effect(input: &str) -> Result<StatChange, ParseError> {
    RuleParser::default().parse_effect(input)
}

/// Parse a rule of any shape with the default configuration.
pub fn parse_rule(input: &str) -> Result<Rule, ParseError> {
    RuleParser::default().parse_rule(input)
}
