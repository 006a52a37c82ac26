//! Choice resolution and validation.
//!
//! The resolver expands a choice into its legal options by consulting the
//! content library, then checks a user's picks against them. What a pick
//! *means* (which proficiency or feature it grants) is up to the owner of
//! the choice; the resolver only deals in option names.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::content::ContentLibrary;
use crate::error::ChoiceError;

use super::choice::Choice;
use super::selections::ChoiceSelections;

/// Result of checking many choices against recorded selections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceReport {
    /// Problems with choices that have picks.
    pub errors: Vec<ChoiceError>,
    /// Choices with no picks recorded yet.
    pub unresolved: Vec<Choice>,
}

impl ChoiceReport {
    /// Check if every choice is made and valid.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.unresolved.is_empty()
    }
}

/// Resolver for choices.
pub struct ChoiceResolver;

impl ChoiceResolver {
    /// All legal options: explicit choices plus the members of every
    /// effective group, deduplicated.
    pub fn possible_values(
        choice: &Choice,
        content: &impl ContentLibrary,
    ) -> Result<BTreeSet<String>, ChoiceError> {
        let mut values: BTreeSet<String> = choice.explicit_choices().iter().cloned().collect();

        for group in choice.effective_groups() {
            let members = content
                .get_group(group)
                .ok_or_else(|| ChoiceError::UnknownGroup {
                    attribute: choice.attribute_name().to_string(),
                    group: group.to_string(),
                })?;
            values.extend(members.iter().cloned());
        }

        Ok(values)
    }

    /// Check picks against a choice, reporting every problem found.
    pub fn validate_selection(
        choice: &Choice,
        picks: &[String],
        content: &impl ContentLibrary,
    ) -> Result<(), Vec<ChoiceError>> {
        let attribute = choice.attribute_name();
        let mut errors = Vec::new();

        if picks.len() != choice.amount() as usize {
            errors.push(ChoiceError::WrongCardinality {
                attribute: attribute.to_string(),
                expected: choice.amount(),
                found: picks.len(),
            });
        }

        let mut seen = FxHashSet::default();
        let mut reported = FxHashSet::default();
        for pick in picks {
            if !seen.insert(pick.as_str()) && reported.insert(pick.as_str()) {
                errors.push(ChoiceError::DuplicatePick {
                    attribute: attribute.to_string(),
                    option: pick.clone(),
                });
            }
        }

        match Self::possible_values(choice, content) {
            Ok(options) => {
                let mut unknown = FxHashSet::default();
                for pick in picks {
                    if !options.contains(pick) && unknown.insert(pick.as_str()) {
                        errors.push(ChoiceError::UnknownOption {
                            attribute: attribute.to_string(),
                            option: pick.clone(),
                        });
                    }
                }
            }
            Err(err) => errors.push(err),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate picks and, if they pass, record them.
    pub fn select(
        choice: &Choice,
        picks: Vec<String>,
        content: &impl ContentLibrary,
        selections: &mut ChoiceSelections,
    ) -> Result<(), Vec<ChoiceError>> {
        Self::validate_selection(choice, &picks, content)?;
        tracing::debug!("Recorded {} pick(s) for {}", picks.len(), choice.attribute_name());
        selections.record(choice.attribute_name(), picks);
        Ok(())
    }

    /// Check every choice against the recorded selections.
    ///
    /// Each choice is validated independently; choices without picks are
    /// listed as unresolved rather than reported as errors.
    pub fn validate_all<'c>(
        choices: impl IntoIterator<Item = &'c Choice>,
        selections: &ChoiceSelections,
        content: &impl ContentLibrary,
    ) -> ChoiceReport {
        let mut report = ChoiceReport::default();

        for choice in choices {
            match selections.get(choice.attribute_name()) {
                Some(picks) => {
                    if let Err(errors) = Self::validate_selection(choice, picks, content) {
                        report.errors.extend(errors);
                    }
                }
                None => report.unresolved.push(choice.clone()),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::content::ContentRegistry;

    fn library() -> ContentRegistry {
        let mut content = ContentRegistry::new();
        content.register_group("skills", ["Stealth", "Arcana"]);
        content.register_group("SKILLS", ["Athletics", "Perception"]);
        content
    }

    fn amount(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn picks(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_possible_values_union() {
        let choice = Choice::new("SKILL_PICK", amount(2))
            .with_group("skills")
            .with_option("Custom");
        let values = ChoiceResolver::possible_values(&choice, &library()).unwrap();

        let expected: BTreeSet<String> = ["Stealth", "Arcana", "Custom"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_possible_values_deduplicates() {
        let choice = Choice::new("SKILL_PICK", amount(1))
            .with_group("skills")
            .with_option("Stealth");
        let values = ChoiceResolver::possible_values(&choice, &library()).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_implicit_group() {
        let choice = Choice::new("SKILLS", amount(1));
        let values = ChoiceResolver::possible_values(&choice, &library()).unwrap();
        assert!(values.contains("Athletics"));
        assert!(!values.contains("Stealth"));
    }

    #[test]
    fn test_unknown_group() {
        let choice = Choice::new("TOOLS", amount(1)).with_group("artisan_tools");
        assert_eq!(
            ChoiceResolver::possible_values(&choice, &library()),
            Err(ChoiceError::UnknownGroup {
                attribute: "TOOLS".into(),
                group: "artisan_tools".into()
            })
        );
    }

    #[test]
    fn test_validate_selection() {
        let content = library();
        let choice = Choice::new("SKILL_PICK", amount(2))
            .with_group("skills")
            .with_option("Custom");

        assert!(ChoiceResolver::validate_selection(&choice, &picks(&["Stealth", "Custom"]), &content).is_ok());

        let wrong_count =
            ChoiceResolver::validate_selection(&choice, &picks(&["Stealth"]), &content).unwrap_err();
        assert!(matches!(wrong_count[..], [ChoiceError::WrongCardinality { found: 1, .. }]));

        let unknown =
            ChoiceResolver::validate_selection(&choice, &picks(&["Nonexistent"]), &content).unwrap_err();
        assert_eq!(unknown.len(), 2);
        assert!(unknown
            .iter()
            .any(|e| matches!(e, ChoiceError::UnknownOption { option, .. } if option == "Nonexistent")));
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let choice = Choice::new("SKILL_PICK", amount(2)).with_group("skills");
        let errors = ChoiceResolver::validate_selection(
            &choice,
            &picks(&["Stealth", "Stealth"]),
            &library(),
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![ChoiceError::DuplicatePick {
                attribute: "SKILL_PICK".into(),
                option: "Stealth".into()
            }]
        );
    }

    #[test]
    fn test_select_records_only_valid_picks() {
        let content = library();
        let choice = Choice::new("SKILL_PICK", amount(1)).with_group("skills");
        let mut selections = ChoiceSelections::new();

        assert!(ChoiceResolver::select(&choice, picks(&["Juggling"]), &content, &mut selections).is_err());
        assert!(selections.is_empty());

        assert!(ChoiceResolver::select(&choice, picks(&["Arcana"]), &content, &mut selections).is_ok());
        assert_eq!(selections.get("SKILL_PICK"), Some(&picks(&["Arcana"])[..]));
    }

    #[test]
    fn test_validate_all() {
        let content = library();
        let made = Choice::new("SKILL_PICK", amount(1)).with_group("skills");
        let bad = Choice::new("SKILLS", amount(1));
        let open = Choice::new("LANGUAGES", amount(1)).with_option("Elvish");

        let selections = ChoiceSelections::new()
            .with("SKILL_PICK", ["Arcana"])
            .with("SKILLS", ["Arcana"]);

        let report = ChoiceResolver::validate_all([&made, &bad, &open], &selections, &content);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].attribute(), "SKILLS");
        assert_eq!(report.unresolved, vec![open.clone()]);
        assert!(!report.is_complete());
    }
}
