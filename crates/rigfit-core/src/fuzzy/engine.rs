use std::sync::OnceLock;

use thiserror::Error;
use tracing::warn;

use super::rules::{validate_rule_base, Rule, RULES};
use super::variable::{
    InputVariable, OutputTerm, OutputVariable, BUDGET, PERFORMANCE, RECOMMENDATION, RESOLUTION,
    UNIVERSE_MAX, UNIVERSE_MIN,
};
use crate::error::ScoringError;

/// Crisp score reported when inference cannot produce a centroid.
pub const MIDPOINT: f64 = 50.0;

/// Number of unit steps the output universe is sampled at (0..=100).
const UNIVERSE_STEPS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InferenceUnavailable {
    #[error("{0} input is not a number")]
    NotANumber(&'static str),

    #[error("no rule fired; aggregate output set is empty")]
    EmptyAggregate,
}

/// Max firing strength per output term after rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutputStrengths {
    pub poor: f64,
    pub average: f64,
    pub high: f64,
    pub excellent: f64,
}

impl OutputStrengths {
    pub const fn get(&self, term: OutputTerm) -> f64 {
        match term {
            OutputTerm::Poor => self.poor,
            OutputTerm::Average => self.average,
            OutputTerm::High => self.high,
            OutputTerm::Excellent => self.excellent,
        }
    }

    fn raise(&mut self, term: OutputTerm, strength: f64) {
        let slot = match term {
            OutputTerm::Poor => &mut self.poor,
            OutputTerm::Average => &mut self.average,
            OutputTerm::High => &mut self.high,
            OutputTerm::Excellent => &mut self.excellent,
        };
        *slot = slot.max(strength);
    }

    /// Strongest term; ties resolve to the better term.
    pub fn dominant(&self) -> OutputTerm {
        OutputTerm::ALL
            .into_iter()
            .fold(OutputTerm::Poor, |best, term| {
                if self.get(term) >= self.get(best) {
                    term
                } else {
                    best
                }
            })
    }
}

/// Three-input Mamdani system: min for AND, max aggregation, centroid output.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyEngine {
    budget: InputVariable,
    performance: InputVariable,
    resolution: InputVariable,
    recommendation: OutputVariable,
    rules: Vec<Rule>,
}

impl Default for FuzzyEngine {
    fn default() -> Self {
        Self {
            budget: BUDGET,
            performance: PERFORMANCE,
            resolution: RESOLUTION,
            recommendation: RECOMMENDATION,
            rules: RULES.to_vec(),
        }
    }
}

impl FuzzyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the knowledge base. The table must stay exhaustive.
    pub fn with_rules(rules: Vec<Rule>) -> Result<Self, ScoringError> {
        validate_rule_base(&rules)?;
        Ok(Self {
            rules,
            ..Self::default()
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn firing_strengths(
        &self,
        budget: f64,
        performance: f64,
        resolution: f64,
    ) -> Result<OutputStrengths, InferenceUnavailable> {
        let budget = self.budget.fuzzify(crisp(self.budget.name, budget)?);
        let performance = self
            .performance
            .fuzzify(crisp(self.performance.name, performance)?);
        let resolution = self
            .resolution
            .fuzzify(crisp(self.resolution.name, resolution)?);

        let mut strengths = OutputStrengths::default();
        for rule in &self.rules {
            let strength = budget
                .get(rule.budget)
                .min(performance.get(rule.performance))
                .min(resolution.get(rule.resolution));
            strengths.raise(rule.outcome, strength);
        }
        Ok(strengths)
    }

    pub fn try_infer(
        &self,
        budget: f64,
        performance: f64,
        resolution: f64,
    ) -> Result<f64, InferenceUnavailable> {
        let strengths = self.firing_strengths(budget, performance, resolution)?;
        self.defuzzify(&strengths)
    }

    /// Recommendation score in `[0, 100]`; falls back to [`MIDPOINT`].
    pub fn infer(&self, budget: f64, performance: f64, resolution: f64) -> f64 {
        match self.try_infer(budget, performance, resolution) {
            Ok(score) => score,
            Err(err) => {
                warn!(budget, performance, resolution, error = %err, "fuzzy inference unavailable, using midpoint");
                MIDPOINT
            }
        }
    }

    /// Centroid of the clipped-and-unioned output set.
    pub fn defuzzify(&self, strengths: &OutputStrengths) -> Result<f64, InferenceUnavailable> {
        let mut moment = 0.0;
        let mut area = 0.0;
        for step in 0..=UNIVERSE_STEPS {
            let x = UNIVERSE_MIN
                + (UNIVERSE_MAX - UNIVERSE_MIN) * f64::from(step) / f64::from(UNIVERSE_STEPS);
            let degree = OutputTerm::ALL
                .into_iter()
                .map(|term| {
                    strengths
                        .get(term)
                        .min(self.recommendation.shape(term).degree(x))
                })
                .fold(0.0, f64::max);
            moment += x * degree;
            area += degree;
        }
        if area <= f64::EPSILON {
            return Err(InferenceUnavailable::EmptyAggregate);
        }
        Ok((moment / area).clamp(UNIVERSE_MIN, UNIVERSE_MAX))
    }
}

fn crisp(name: &'static str, value: f64) -> Result<f64, InferenceUnavailable> {
    if value.is_nan() {
        return Err(InferenceUnavailable::NotANumber(name));
    }
    Ok(value.clamp(UNIVERSE_MIN, UNIVERSE_MAX))
}

fn shared_engine() -> &'static FuzzyEngine {
    static ENGINE: OnceLock<FuzzyEngine> = OnceLock::new();
    ENGINE.get_or_init(FuzzyEngine::default)
}

/// Runs the default knowledge base.
pub fn infer(budget: f64, performance: f64, resolution: f64) -> f64 {
    shared_engine().infer(budget, performance, resolution)
}
