use super::variable::{InputTerm, OutputTerm};
use crate::error::ScoringError;

use InputTerm::{High as H, Low as L, Medium as M};
use OutputTerm::{Average, Excellent, High, Poor};

/// `budget ∧ performance ∧ resolution → outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    pub budget: InputTerm,
    pub performance: InputTerm,
    pub resolution: InputTerm,
    pub outcome: OutputTerm,
}

impl Rule {
    pub const fn new(
        budget: InputTerm,
        performance: InputTerm,
        resolution: InputTerm,
        outcome: OutputTerm,
    ) -> Self {
        Self {
            budget,
            performance,
            resolution,
            outcome,
        }
    }

    fn matches(&self, budget: InputTerm, performance: InputTerm, resolution: InputTerm) -> bool {
        self.budget == budget && self.performance == performance && self.resolution == resolution
    }
}

/// The hand-authored knowledge base, one entry per antecedent triple.
pub const RULES: [Rule; 27] = [
    // Low budget: weak parts are poor, strong parts are good value.
    Rule::new(L, L, L, Poor),
    Rule::new(L, L, M, Poor),
    Rule::new(L, L, H, Poor),
    Rule::new(L, M, L, Average),
    Rule::new(L, M, M, Average),
    Rule::new(L, M, H, High),
    Rule::new(L, H, L, High),
    Rule::new(L, H, M, High),
    Rule::new(L, H, H, High),
    // Medium budget: the balanced mid-range part is the sweet spot.
    Rule::new(M, L, L, Poor),
    Rule::new(M, L, M, Average),
    Rule::new(M, L, H, Average),
    Rule::new(M, M, L, High),
    Rule::new(M, M, M, Excellent),
    Rule::new(M, M, H, Excellent),
    Rule::new(M, H, L, High),
    Rule::new(M, H, M, Excellent),
    Rule::new(M, H, H, Excellent),
    // High budget: weak parts waste money, strong parts are what was paid for.
    Rule::new(H, L, L, Average),
    Rule::new(H, L, M, Average),
    Rule::new(H, L, H, Average),
    Rule::new(H, M, L, High),
    Rule::new(H, M, M, Excellent),
    Rule::new(H, M, H, Excellent),
    Rule::new(H, H, L, Excellent),
    Rule::new(H, H, M, Excellent),
    Rule::new(H, H, H, Excellent),
];

/// Consequent of the default table for one antecedent triple.
pub fn consequent(budget: InputTerm, performance: InputTerm, resolution: InputTerm) -> Option<OutputTerm> {
    lookup(&RULES, budget, performance, resolution)
}

pub(crate) fn lookup(
    rules: &[Rule],
    budget: InputTerm,
    performance: InputTerm,
    resolution: InputTerm,
) -> Option<OutputTerm> {
    rules
        .iter()
        .find(|rule| rule.matches(budget, performance, resolution))
        .map(|rule| rule.outcome)
}

/// Every antecedent triple must have exactly one consequent.
pub fn validate_rule_base(rules: &[Rule]) -> Result<(), ScoringError> {
    for budget in InputTerm::ALL {
        for performance in InputTerm::ALL {
            for resolution in InputTerm::ALL {
                let mut outcomes = rules
                    .iter()
                    .filter(|rule| rule.matches(budget, performance, resolution))
                    .map(|rule| rule.outcome);
                let Some(first) = outcomes.next() else {
                    return Err(ScoringError::IncompleteRuleBase {
                        budget,
                        performance,
                        resolution,
                    });
                };
                if let Some(second) = outcomes.find(|outcome| *outcome != first) {
                    return Err(ScoringError::ConflictingRules {
                        budget,
                        performance,
                        resolution,
                        first,
                        second,
                    });
                }
            }
        }
    }
    Ok(())
}
