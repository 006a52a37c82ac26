//! Characters and their assembly.
//!
//! - `Character`: the user's decisions (features, picks, base values)
//! - `Assembler`: turns decisions plus content into an `Assembly`
//!
//! Nothing is cached: every call to [`Assembler::assemble`] rebuilds the
//! attribute map from the base values.

mod assembly;
mod sheet;

pub use assembly::{Assembler, Assembly, ResolvedSpell};
pub use sheet::Character;
