//! Effects: what features and decisions do to a character.
//!
//! - `EffectsContainer`: gating conditions, choices, stat-changes, grants
//! - `StatChangeEngine`: folds stat-changes into an attribute map
//! - `Grants`: inert action/proficiency/defense/spell grants
//! - `EffectsLoader`: best-effort construction from raw content
//!
//! ## Evaluation
//!
//! Activation is decided per container, then the stat-changes of every
//! active container are flattened and applied in timing order:
//!
//! ```
//! use tabletop_effects::core::{Attributes, Constants, Fixed};
//! use tabletop_effects::effects::{collect_active_stat_changes, EffectsContainer, StatChangeEngine};
//! use tabletop_effects::rules::{parse_condition, parse_stat_change};
//!
//! let always = EffectsContainer::new()
//!     .with_stat_change(parse_stat_change("AC NORMAL ADD 2").unwrap());
//! let gated = EffectsContainer::new()
//!     .with_condition(parse_condition("LEVEL >= 5").unwrap())
//!     .with_stat_change(parse_stat_change("AC EARLY SET 12").unwrap());
//!
//! let mut attrs = Attributes::new();
//! let constants = Constants::new().with("LEVEL", Fixed::from_int(5));
//!
//! let changes = collect_active_stat_changes([&always, &gated], &attrs, &constants).unwrap();
//! let report = StatChangeEngine::apply_all(&changes, &mut attrs, &constants);
//!
//! assert!(report.is_clean());
//! assert_eq!(attrs.get("AC"), Some(Fixed::from_int(14)));
//! ```

mod container;
mod engine;
mod grants;
mod loader;

pub use container::{collect_active_stat_changes, is_active, Conditions, EffectsContainer};
pub use engine::{apply_all, ApplyReport, StatChangeEngine};
pub use grants::{
    ActionGrants, ActionKind, BonusSpell, BonusSpellGrants, DefenseGrants, DefenseKind, GrantKind,
    GrantSet, Grants, ProficiencyGrants, ProficiencyKind,
};
pub use loader::{EffectsLoader, LoadReport, RawEffects};
pub use crate::choices::RawChoice;
