//! Recorded picks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Picks a user has made, keyed by choice attribute name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSelections {
    picks: BTreeMap<String, Vec<String>>,
}

impl ChoiceSelections {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record picks (builder pattern). Does not validate.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, picks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.record(attribute, picks);
        self
    }

    /// Record picks, replacing any earlier ones. Does not validate; see
    /// [`super::ChoiceResolver::select`] for the checked path.
    pub fn record(
        &mut self,
        attribute: impl Into<String>,
        picks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Option<Vec<String>> {
        self.picks
            .insert(attribute.into(), picks.into_iter().map(Into::into).collect())
    }

    /// Picks for a choice.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&[String]> {
        self.picks.get(attribute).map(Vec::as_slice)
    }

    /// Check if a choice has been made.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.picks.contains_key(attribute)
    }

    /// Forget the picks for a choice.
    pub fn clear(&mut self, attribute: &str) -> Option<Vec<String>> {
        self.picks.remove(attribute)
    }

    /// Iterate over recorded choices, sorted by attribute name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.picks.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of recorded choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_replaces() {
        let mut selections = ChoiceSelections::new();
        assert!(selections.record("SKILLS", ["Stealth"]).is_none());

        let previous = selections.record("SKILLS", ["Arcana", "History"]);
        assert_eq!(previous, Some(vec!["Stealth".to_string()]));
        assert_eq!(
            selections.get("SKILLS"),
            Some(&["Arcana".to_string(), "History".to_string()][..])
        );
    }

    #[test]
    fn test_clear() {
        let mut selections = ChoiceSelections::new().with("TOOLS", ["Lute"]);
        assert!(selections.contains("TOOLS"));
        selections.clear("TOOLS");
        assert!(selections.is_empty());
    }
}
