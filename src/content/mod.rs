//! Game content the engine reads from.
//!
//! - `ContentLibrary`: the lookup trait the engine depends on
//! - `ContentRegistry`: in-memory implementation
//! - `Feature`, `Choosable`, `Spell`: the content types the engine needs
//! - `SharedContent`: a registry shared across threads, with a reload barrier

mod feature;
mod library;
mod registry;
mod shared;

pub use feature::{Choosable, Feature, RawChoosable, RawFeature, Spell};
pub use library::{ContentGroup, ContentLibrary};
pub use registry::ContentRegistry;
pub use shared::SharedContent;
