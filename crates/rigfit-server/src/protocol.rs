use std::collections::BTreeMap;

use rigfit_core::{BudgetRange, RankedResult, UserPreference};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /recommend`. Missing fields fall back to a mid-range build.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    #[serde(default = "default_budget")]
    pub budget: f64,
    #[serde(default = "default_performance", alias = "performance_priority")]
    pub performance: i64,
    #[serde(default = "default_resolution", alias = "aesthetics", alias = "resolution_level")]
    pub resolution: i64,
}

const fn default_budget() -> f64 {
    1500.0
}

const fn default_performance() -> i64 {
    7
}

const fn default_resolution() -> i64 {
    2
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            performance: default_performance(),
            resolution: default_resolution(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputRangeError {
    #[error("Budget out of range ({min}-{max}).")]
    Budget { value: f64, min: f64, max: f64 },

    #[error("Performance priority {0} out of range (1-10).")]
    PerformancePriority(i64),

    #[error("Resolution level {0} out of range (1-3).")]
    ResolutionLevel(i64),
}

impl RecommendRequest {
    pub fn validate(&self, range: &BudgetRange) -> Result<UserPreference, InputRangeError> {
        if !(self.budget.is_finite() && range.contains(self.budget)) {
            return Err(InputRangeError::Budget {
                value: self.budget,
                min: range.min,
                max: range.max,
            });
        }
        let performance = ordinal(self.performance, UserPreference::PERFORMANCE_SCALE)
            .ok_or(InputRangeError::PerformancePriority(self.performance))?;
        let resolution = ordinal(self.resolution, UserPreference::RESOLUTION_SCALE)
            .ok_or(InputRangeError::ResolutionLevel(self.resolution))?;
        Ok(UserPreference::new(self.budget, performance, resolution))
    }
}

fn ordinal(value: i64, max: u8) -> Option<u8> {
    u8::try_from(value)
        .ok()
        .filter(|v| (1..=max).contains(v))
}

/// The buyer's answers on the shared 0-100 scale.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceProfile {
    pub budget: f64,
    pub performance_priority: u8,
    pub resolution_level: u8,
    pub budget_score: f64,
    pub performance_score: f64,
    pub resolution_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartPick {
    pub name: String,
    pub score: String,
    pub price: f64,
    pub details: RankedResult,
}

impl From<RankedResult> for PartPick {
    fn from(result: RankedResult) -> Self {
        Self {
            name: result.name.clone(),
            score: format!("{:.2}%", result.final_score),
            price: result.price,
            details: result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub gpus: Vec<RankedResult>,
    pub cpus: Vec<RankedResult>,
    pub motherboards: Vec<RankedResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub preference: PreferenceProfile,
    pub allocations: BTreeMap<String, f64>,
    #[serde(rename = "GPU")]
    pub gpu: Option<PartPick>,
    #[serde(rename = "CPU")]
    pub cpu: Option<PartPick>,
    #[serde(rename = "Motherboard")]
    pub motherboard: Option<PartPick>,
    pub rankings: Rankings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> RecommendRequest {
        serde_json::from_str(raw).unwrap_or_else(|e| panic!("parse {raw}: {e}"))
    }

    #[test]
    fn empty_body_uses_defaults() {
        let req = request("{}");
        assert_eq!(req.budget, 1500.0);
        assert_eq!(req.performance, 7);
        assert_eq!(req.resolution, 2);
    }

    #[test]
    fn accepts_form_field_aliases() {
        let req = request(r#"{"budget": 2200, "performance": 9, "aesthetics": 3}"#);
        assert_eq!(req.resolution, 3);
        let pref = req.validate(&BudgetRange::default());
        assert_eq!(pref, Ok(UserPreference::new(2200.0, 9, 3)));
    }

    #[test]
    fn budget_bounds_are_inclusive() {
        let range = BudgetRange::default();
        for budget in [500.0, 3000.0] {
            let req = RecommendRequest {
                budget,
                ..RecommendRequest::default()
            };
            assert!(req.validate(&range).is_ok());
        }
        let low = RecommendRequest {
            budget: 499.99,
            ..RecommendRequest::default()
        };
        assert!(matches!(
            low.validate(&range),
            Err(InputRangeError::Budget { .. })
        ));
        let nan = RecommendRequest {
            budget: f64::NAN,
            ..RecommendRequest::default()
        };
        assert!(nan.validate(&range).is_err());
    }

    #[test]
    fn ordinal_ranges_are_enforced() {
        let range = BudgetRange::default();
        let bad_perf = RecommendRequest {
            performance: 11,
            ..RecommendRequest::default()
        };
        assert_eq!(
            bad_perf.validate(&range),
            Err(InputRangeError::PerformancePriority(11))
        );
        let bad_res = RecommendRequest {
            resolution: 0,
            ..RecommendRequest::default()
        };
        assert_eq!(
            bad_res.validate(&range),
            Err(InputRangeError::ResolutionLevel(0))
        );
        let negative = RecommendRequest {
            performance: -3,
            ..RecommendRequest::default()
        };
        assert!(negative.validate(&range).is_err());
    }

    #[test]
    fn error_message_matches_form_copy() {
        let err = InputRangeError::Budget {
            value: 100.0,
            min: 500.0,
            max: 3000.0,
        };
        assert_eq!(err.to_string(), "Budget out of range (500-3000).");
    }

    #[test]
    fn pick_formats_score_as_percentage() {
        let pick = PartPick::from(RankedResult {
            name: "x".to_string(),
            final_score: 71.234,
            raw_score: 67.84,
            price: 499.0,
            performance: 40.0,
            resolution: 50.0,
            standing: rigfit_core::BudgetStanding::UnderBudget,
        });
        assert_eq!(pick.score, "71.23%");
    }
}
