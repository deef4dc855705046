pub mod engine;
pub mod membership;
pub mod rules;
pub mod variable;

pub use engine::{infer, FuzzyEngine, InferenceUnavailable, OutputStrengths, MIDPOINT};
pub use membership::MembershipFunction;
pub use rules::{consequent, validate_rule_base, Rule, RULES};
pub use variable::{
    InputTerm, InputVariable, OutputTerm, OutputVariable, TermDegrees, BUDGET, PERFORMANCE,
    RECOMMENDATION, RESOLUTION, UNIVERSE_MAX, UNIVERSE_MIN,
};
