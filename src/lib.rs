//! # tabletop-effects
//!
//! Effect evaluation and choice resolution for tabletop RPG content.
//!
//! Content authors write rules as short strings (`STR_MOD NORMAL ADD 2`,
//! `CLASS_LEVEL >= 5`). This crate validates and parses them once at load
//! time, decides which effects are active for a character, resolves the
//! character's open choices against a content library, and folds every
//! active stat-change into a final attribute map.
//!
//! ## Design Principles
//!
//! 1. **Parse Once**: Rule strings become typed values at load time.
//!    Evaluation only matches over already-typed data.
//!
//! 2. **Fixed-Point Values**: Every number is a [`Fixed`], an integer scaled
//!    by 100. No floating point anywhere.
//!
//! 3. **Deterministic Order**: Stat-changes apply by [`Timing`] bucket, then
//!    declaration order. Nothing else affects the order.
//!
//! 4. **Report Everything**: Loading, choice validation, and assembly
//!    collect every problem instead of stopping at the first.
//!
//! ## Modules
//!
//! - `core`: Fixed-point values, attribute maps, configuration
//! - `error`: Error types and severities
//! - `rules`: Rule grammar, parser, operands, conditions, stat-changes
//! - `effects`: Effects containers, the stat-change engine, grants, loading
//! - `choices`: Choices, the resolver, recorded picks
//! - `content`: Content library trait and in-memory registry
//! - `character`: Character decisions and whole-character assembly

pub mod character;
pub mod choices;
pub mod content;
pub mod core;
pub mod effects;
pub mod error;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{Attributes, Constants, Fixed, RulesConfig};

pub use crate::error::{
    BuildError, ChoiceError, ContentError, ErrorSeverity, EvalError, LockPoisoned, ParseError,
};

pub use crate::rules::{
    evaluate, parse_condition, parse_effect, parse_rule, parse_stat_change, Comparison, Condition,
    ConditionEvaluator, EvalContext, Literal, Operand, Operation, Rule, RuleParser, StatChange,
    Timing,
};

pub use crate::effects::{
    apply_all, collect_active_stat_changes, is_active, ApplyReport, EffectsContainer,
    EffectsLoader, Grants, LoadReport, RawEffects, StatChangeEngine,
};

pub use crate::choices::{Choice, ChoiceReport, ChoiceResolver, ChoiceSelections};

pub use crate::content::{ContentGroup, ContentLibrary, ContentRegistry, Feature, SharedContent, Spell};

pub use crate::character::{Assembler, Assembly, Character};
