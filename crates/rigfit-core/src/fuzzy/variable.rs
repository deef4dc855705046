use std::fmt;

use serde::{Deserialize, Serialize};

use super::membership::MembershipFunction;

pub const UNIVERSE_MIN: f64 = 0.0;
pub const UNIVERSE_MAX: f64 = 100.0;

/// Terms shared by the three input variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTerm {
    Low,
    Medium,
    High,
}

impl InputTerm {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl fmt::Display for InputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Terms of the Recommendation output, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTerm {
    Poor,
    Average,
    High,
    Excellent,
}

impl OutputTerm {
    pub const ALL: [Self; 4] = [Self::Poor, Self::Average, Self::High, Self::Excellent];
}

impl fmt::Display for OutputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poor => "poor",
            Self::Average => "average",
            Self::High => "high",
            Self::Excellent => "excellent",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermDegrees {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl TermDegrees {
    pub const fn get(&self, term: InputTerm) -> f64 {
        match term {
            InputTerm::Low => self.low,
            InputTerm::Medium => self.medium,
            InputTerm::High => self.high,
        }
    }
}

/// An input axis partitioned into low/medium/high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputVariable {
    pub name: &'static str,
    pub low: MembershipFunction,
    pub medium: MembershipFunction,
    pub high: MembershipFunction,
}

impl InputVariable {
    pub const fn shape(&self, term: InputTerm) -> &MembershipFunction {
        match term {
            InputTerm::Low => &self.low,
            InputTerm::Medium => &self.medium,
            InputTerm::High => &self.high,
        }
    }

    /// Degrees for an already clamped crisp value.
    pub fn fuzzify(&self, x: f64) -> TermDegrees {
        TermDegrees {
            low: self.low.degree(x),
            medium: self.medium.degree(x),
            high: self.high.degree(x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputVariable {
    pub name: &'static str,
    pub poor: MembershipFunction,
    pub average: MembershipFunction,
    pub high: MembershipFunction,
    pub excellent: MembershipFunction,
}

impl OutputVariable {
    pub const fn shape(&self, term: OutputTerm) -> &MembershipFunction {
        match term {
            OutputTerm::Poor => &self.poor,
            OutputTerm::Average => &self.average,
            OutputTerm::High => &self.high,
            OutputTerm::Excellent => &self.excellent,
        }
    }
}

pub const BUDGET: InputVariable = InputVariable {
    name: "budget",
    low: MembershipFunction::trapezoid(0.0, 0.0, 25.0, 50.0),
    medium: MembershipFunction::triangle(25.0, 50.0, 75.0),
    high: MembershipFunction::trapezoid(50.0, 75.0, 100.0, 100.0),
};

pub const PERFORMANCE: InputVariable = InputVariable {
    name: "performance",
    low: MembershipFunction::trapezoid(0.0, 0.0, 20.0, 50.0),
    medium: MembershipFunction::triangle(20.0, 50.0, 80.0),
    high: MembershipFunction::trapezoid(50.0, 80.0, 100.0, 100.0),
};

pub const RESOLUTION: InputVariable = InputVariable {
    name: "resolution",
    low: MembershipFunction::trapezoid(0.0, 0.0, 30.0, 60.0),
    medium: MembershipFunction::triangle(30.0, 60.0, 90.0),
    high: MembershipFunction::trapezoid(60.0, 90.0, 100.0, 100.0),
};

pub const RECOMMENDATION: OutputVariable = OutputVariable {
    name: "recommendation",
    poor: MembershipFunction::trapezoid(0.0, 0.0, 10.0, 30.0),
    average: MembershipFunction::triangle(10.0, 40.0, 70.0),
    high: MembershipFunction::triangle(40.0, 75.0, 95.0),
    excellent: MembershipFunction::trapezoid(70.0, 95.0, 100.0, 100.0),
};
