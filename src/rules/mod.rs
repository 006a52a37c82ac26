//! The rule mini-language.
//!
//! Content describes rules as short strings:
//!
//! - `CLASS_LEVEL >= 5`: a [`Condition`]
//! - `STR_MOD NORMAL ADD 2`: a [`StatChange`] with explicit [`Timing`]
//! - `AC SET 13`: a simple effect, a stat-change in the default bucket
//!
//! Strings are validated against a fixed grammar ([`grammar`]) and parsed
//! once at load time ([`RuleParser`]). Evaluation only ever sees the typed
//! values.
//!
//! ## Example
//!
//! ```
//! use tabletop_effects::core::{Attributes, Fixed};
//! use tabletop_effects::rules::{self, Rule};
//!
//! let Rule::Condition(gate) = rules::parse_rule("CLASS_LEVEL >= 5").unwrap() else {
//!     panic!("expected a condition");
//! };
//!
//! let attrs = Attributes::new();
//! let constants = Attributes::new().with("CLASS_LEVEL", Fixed::from_int(6));
//! assert_eq!(rules::evaluate(&gate, &attrs, &constants), Ok(true));
//! ```

mod condition;
pub mod grammar;
mod operand;
mod parser;
mod stat_change;

pub use condition::{evaluate, Comparison, Condition, ConditionEvaluator};
pub use grammar::RuleShape;
pub use operand::{EvalContext, Literal, Operand};
pub use parser::{
    parse_condition, parse_effect, parse_operand, parse_rule, parse_stat_change, Rule, RuleParser,
};
pub use stat_change::{ArithmeticFault, Operation, StatChange, Timing};
