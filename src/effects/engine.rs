//! Stat-change application.
//!
//! The engine folds a list of stat-changes into an attribute map. Changes
//! are grouped into [`Timing`] buckets and applied bucket by bucket; inside
//! a bucket they keep their declaration order. Identifier operands read the
//! map as it stands at that moment, so a `LATE` change sees everything
//! `NORMAL` did.

use crate::core::{Attributes, Constants};
use crate::error::{ErrorSeverity, EvalError};
use crate::rules::{ArithmeticFault, EvalContext, StatChange, Timing};

/// Outcome of applying a batch of stat-changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Number of changes that mutated the map.
    pub applied: usize,
    /// Every change that was skipped, with the reason.
    pub errors: Vec<EvalError>,
}

impl ApplyReport {
    /// Check if every change applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if any error makes the result untrustworthy.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.severity() == ErrorSeverity::Fatal)
    }

    /// Number of skipped changes.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }
}

/// Applies stat-changes to attribute maps.
pub struct StatChangeEngine;

impl StatChangeEngine {
    /// Order changes for application: by timing bucket, stable within a
    /// bucket.
    pub fn order<'a>(changes: impl IntoIterator<Item = &'a StatChange>) -> Vec<&'a StatChange> {
        let mut buckets: [Vec<&'a StatChange>; Timing::COUNT] = Default::default();
        for change in changes {
            buckets[change.timing().index()].push(change);
        }
        buckets.into_iter().flatten().collect()
    }

    /// Apply every change in timing order.
    ///
    /// A change that fails is skipped and its error recorded; the rest still
    /// apply. The caller gets the fully mutated map and the full error list.
    pub fn apply_all<'a>(
        changes: impl IntoIterator<Item = &'a StatChange>,
        attributes: &mut Attributes,
        constants: &Constants,
    ) -> ApplyReport {
        let ordered = Self::order(changes);
        let mut report = ApplyReport::default();
        let mut bucket = None;

        for change in ordered {
            if bucket != Some(change.timing()) {
                bucket = Some(change.timing());
                tracing::debug!("Applying {} bucket", change.timing());
            }

            match Self::apply_one(change, attributes, constants) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    tracing::warn!("Skipped `{}`: {}", change, err);
                    report.errors.push(err);
                }
            }
        }

        report
    }

    /// Apply a single change.
    ///
    /// The target attribute is created at zero if absent. On error the map
    /// is left untouched.
    pub fn apply_one(
        change: &StatChange,
        attributes: &mut Attributes,
        constants: &Constants,
    ) -> Result<(), EvalError> {
        let operand = change
            .operand()
            .resolve(&EvalContext::new(attributes, constants))?;

        let current = attributes.get(change.attribute()).unwrap_or_default();
        let updated = change
            .operation()
            .apply(current, operand)
            .map_err(|fault| {
                let attribute = change.attribute().to_string();
                match fault {
                    ArithmeticFault::DivisionByZero => EvalError::DivisionByZero { attribute },
                    ArithmeticFault::Overflow => EvalError::Overflow { attribute },
                }
            })?;

        tracing::trace!("{}: {} -> {}", change, current, updated);
        *attributes.slot(change.attribute()) = updated;
        Ok(())
    }
}

/// Apply changes with no constants, returning only the errors.
pub fn apply_all(changes: &[StatChange], attributes: &mut Attributes) -> Vec<EvalError> {
    StatChangeEngine::apply_all(changes, attributes, &Constants::new()).errors
}
