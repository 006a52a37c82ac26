//! Choice definitions.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::core::RulesConfig;
use crate::error::ParseError;

/// A choice as written in content files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawChoice {
    pub attribute_name: String,
    pub amount: u32,
    pub groups: Vec<String>,
    pub choices: Vec<String>,
}

/// An open slot: pick `amount` values from explicit options and/or named
/// content groups.
///
/// With no groups and no explicit options, `attribute_name` doubles as the
/// name of the group to pick from. Deserializing goes through
/// [`Choice::validated`] with the default limits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawChoice", into = "RawChoice")]
pub struct Choice {
    attribute_name: String,
    amount: NonZeroU32,
    group_names: Vec<String>,
    explicit_choices: Vec<String>,
}

impl Choice {
    /// Create a choice with no groups or explicit options.
    pub fn new(attribute_name: impl Into<String>, amount: NonZeroU32) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            amount,
            group_names: Vec::new(),
            explicit_choices: Vec::new(),
        }
    }

    /// Create a choice from loaded content, enforcing load-time limits.
    pub fn validated(
        attribute_name: impl Into<String>,
        amount: u32,
        group_names: Vec<String>,
        explicit_choices: Vec<String>,
        config: &RulesConfig,
    ) -> Result<Self, ParseError> {
        let attribute_name = attribute_name.into();
        if attribute_name.trim().is_empty() {
            return Err(ParseError::EmptyName("choice attribute"));
        }
        if group_names.iter().any(|g| g.trim().is_empty()) {
            return Err(ParseError::EmptyName("choice group"));
        }
        if explicit_choices.iter().any(|c| c.trim().is_empty()) {
            return Err(ParseError::EmptyName("choice option"));
        }

        let out_of_range = || ParseError::ChoiceAmountOutOfRange {
            attribute: attribute_name.clone(),
            amount,
            max: config.max_choice_amount,
        };
        if amount > config.max_choice_amount {
            return Err(out_of_range());
        }
        let amount = NonZeroU32::new(amount).ok_or_else(out_of_range)?;

        Ok(Self {
            attribute_name,
            amount,
            group_names,
            explicit_choices,
        })
    }

    /// Create a choice from its raw form, enforcing load-time limits.
    pub fn from_raw(raw: RawChoice, config: &RulesConfig) -> Result<Self, ParseError> {
        Self::validated(raw.attribute_name, raw.amount, raw.groups, raw.choices, config)
    }

    /// Add a named group (builder pattern).
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group_names.push(group.into());
        self
    }

    /// Add an explicit option (builder pattern).
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.explicit_choices.push(option.into());
        self
    }

    /// Name of the attribute the picks are recorded under.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// How many options must be picked.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount.get()
    }

    /// Named groups.
    #[must_use]
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// Explicit options.
    #[must_use]
    pub fn explicit_choices(&self) -> &[String] {
        &self.explicit_choices
    }

    /// Groups to draw options from, including the implicit default.
    pub fn effective_groups(&self) -> impl Iterator<Item = &str> {
        let implicit = (self.group_names.is_empty() && self.explicit_choices.is_empty())
            .then_some(self.attribute_name.as_str());
        self.group_names.iter().map(String::as_str).chain(implicit)
    }
}

impl TryFrom<RawChoice> for Choice {
    type Error = ParseError;

    fn try_from(raw: RawChoice) -> Result<Self, Self::Error> {
        Self::from_raw(raw, &RulesConfig::default())
    }
}

impl From<Choice> for RawChoice {
    fn from(choice: Choice) -> Self {
        Self {
            attribute_name: choice.attribute_name,
            amount: choice.amount.get(),
            groups: choice.group_names,
            choices: choice.explicit_choices,
        }
    }
}
