//! Choices: open slots a user fills by picking options.
//!
//! - [`Choice`]: what may be picked and how many
//! - [`ChoiceResolver`]: expands options and validates picks
//! - [`ChoiceSelections`]: the picks recorded so far
//!
//! ## Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use tabletop_effects::choices::{Choice, ChoiceResolver, ChoiceSelections};
//! use tabletop_effects::content::ContentRegistry;
//!
//! let mut content = ContentRegistry::new();
//! content.register_group("skills", ["Stealth", "Arcana", "Persuasion"]);
//!
//! let choice = Choice::new("SKILL_PROFICIENCY", NonZeroU32::new(2).unwrap())
//!     .with_group("skills");
//!
//! let mut selections = ChoiceSelections::new();
//! let picks = vec!["Stealth".to_string(), "Persuasion".to_string()];
//! ChoiceResolver::select(&choice, picks, &content, &mut selections).unwrap();
//!
//! assert!(selections.contains("SKILL_PROFICIENCY"));
//! ```

mod choice;
mod resolver;
mod selections;

pub use choice::{Choice, RawChoice};
pub use resolver::{ChoiceReport, ChoiceResolver};
pub use selections::ChoiceSelections;
