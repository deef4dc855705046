use thiserror::Error;

use crate::fuzzy::{InputTerm, OutputTerm};
use crate::types::Category;

/// Configuration and catalog defects that abort a scoring pass.
///
/// A low score is never reported through this type; a part that simply does
/// not fit the budget still yields a [`crate::RankedResult`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("allocated budget for {category} must be positive and finite, got {amount}")]
    InvalidAllocation { category: Category, amount: f64 },

    #[error("allocation ratio for {category} must be in (0, 1], got {ratio}")]
    InvalidRatio { category: Category, ratio: f64 },

    #[error("allocation ratios sum to {0}, more than the whole budget")]
    OverAllocated(f64),

    #[error("part {name:?} has an invalid {field}: {reason}")]
    InvalidPart {
        name: String,
        field: &'static str,
        reason: String,
    },

    #[error("part {name:?} uses chipset {chipset:?} which has no tier entry")]
    UnknownChipset { name: String, chipset: String },

    #[error("rule base has no rule for budget={budget}, performance={performance}, resolution={resolution}")]
    IncompleteRuleBase {
        budget: InputTerm,
        performance: InputTerm,
        resolution: InputTerm,
    },

    #[error("rule base maps budget={budget}, performance={performance}, resolution={resolution} to both {first} and {second}")]
    ConflictingRules {
        budget: InputTerm,
        performance: InputTerm,
        resolution: InputTerm,
        first: OutputTerm,
        second: OutputTerm,
    },
}
