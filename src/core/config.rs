//! Rules configuration.
//!
//! Content sets tune a couple of load-time knobs through `RulesConfig`.
//! Everything else about rule semantics is fixed by the engine.

use serde::{Deserialize, Serialize};

use crate::rules::Timing;

/// Load-time configuration for rule parsing.
///
/// ## Example
///
/// ```
/// use tabletop_effects::core::RulesConfig;
/// use tabletop_effects::rules::Timing;
///
/// let config = RulesConfig::new()
///     .with_simple_effect_timing(Timing::Late)
///     .with_max_choice_amount(4);
///
/// assert_eq!(config.simple_effect_timing, Timing::Late);
/// assert_eq!(config.max_choice_amount, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Timing bucket given to simple effects (`IDENT OP VALUE`), which
    /// carry no timing of their own.
    pub simple_effect_timing: Timing,

    /// Largest number of picks a single choice may ask for.
    pub max_choice_amount: u32,
}

impl RulesConfig {
    /// Default choice amount ceiling.
    pub const DEFAULT_MAX_CHOICE_AMOUNT: u32 = 20;

    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timing for simple effects.
    #[must_use]
    pub fn with_simple_effect_timing(mut self, timing: Timing) -> Self {
        self.simple_effect_timing = timing;
        self
    }

    /// Set the choice amount ceiling.
    #[must_use]
    pub fn with_max_choice_amount(mut self, max: u32) -> Self {
        self.max_choice_amount = max;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            simple_effect_timing: Timing::Normal,
            max_choice_amount: Self::DEFAULT_MAX_CHOICE_AMOUNT,
        }
    }
}
