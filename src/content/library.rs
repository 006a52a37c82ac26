//! Content lookup.

use super::feature::{Feature, Spell};

/// Members of a named content group, e.g. every skill.
pub type ContentGroup = im::OrdSet<String>;

/// Read-only access to loaded game content.
///
/// The engine only ever reads through this trait; how content gets loaded
/// is up to the implementor.
pub trait ContentLibrary {
    /// Members of a named group.
    fn get_group(&self, name: &str) -> Option<&ContentGroup>;

    /// A feature by key.
    fn get_feature(&self, key: &str) -> Option<&Feature>;

    /// A spell by key.
    fn get_spell(&self, key: &str) -> Option<&Spell>;
}

impl<T: ContentLibrary + ?Sized> ContentLibrary for &T {
    fn get_group(&self, name: &str) -> Option<&ContentGroup> {
        (**self).get_group(name)
    }

    fn get_feature(&self, key: &str) -> Option<&Feature> {
        (**self).get_feature(key)
    }

    fn get_spell(&self, key: &str) -> Option<&Spell> {
        (**self).get_spell(key)
    }
}
