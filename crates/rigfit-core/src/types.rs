use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gpu,
    Cpu,
    Motherboard,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Gpu, Self::Cpu, Self::Motherboard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gpu => "GPU",
            Self::Cpu => "CPU",
            Self::Motherboard => "Motherboard",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryGeneration {
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
}

impl fmt::Display for MemoryGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ddr4 => f.write_str("DDR4"),
            Self::Ddr5 => f.write_str("DDR5"),
        }
    }
}

/// Common view over catalog records of every class.
pub trait Part {
    fn name(&self) -> &str;

    fn price(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuPart {
    pub name: String,
    pub price: f64,
    pub cores: u32,
    pub memory_gb: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuPart {
    pub name: String,
    pub price: f64,
    pub single_thread: u32,
    pub multi_thread: u32,
    pub socket: String,
    pub memory: Vec<MemoryGeneration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotherboardPart {
    pub name: String,
    pub price: f64,
    pub chipset: String,
    pub socket: String,
    pub memory: MemoryGeneration,
}

impl MotherboardPart {
    /// Socket and memory checks against a chosen processor.
    pub fn supports(&self, cpu: &CpuPart) -> bool {
        self.socket == cpu.socket && cpu.memory.contains(&self.memory)
    }
}

macro_rules! impl_part {
    ($($ty:ty),+) => {
        $(impl Part for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn price(&self) -> f64 {
                self.price
            }
        })+
    };
}

impl_part!(GpuPart, CpuPart, MotherboardPart);

/// A buyer's request. Range checks happen in the request layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub total_budget: f64,
    pub performance_priority: u8,
    pub resolution_level: u8,
}

impl UserPreference {
    pub const PERFORMANCE_SCALE: u8 = 10;
    pub const RESOLUTION_SCALE: u8 = 3;

    pub const fn new(total_budget: f64, performance_priority: u8, resolution_level: u8) -> Self {
        Self {
            total_budget,
            performance_priority,
            resolution_level,
        }
    }
}

/// What a part offers, independent of its price. Both axes live in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityScore {
    pub performance: f64,
    pub resolution: f64,
}

impl CapabilityScore {
    pub fn new(performance: f64, resolution: f64) -> Self {
        Self {
            performance: clamp_score(performance),
            resolution: clamp_score(resolution),
        }
    }

    pub fn rounded(self) -> Self {
        Self {
            performance: round2(self.performance),
            resolution: round2(self.resolution),
        }
    }

    pub const fn as_pair(self) -> (f64, f64) {
        (self.performance, self.resolution)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStanding {
    OverBudget,
    UnderBudget,
    OnTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub name: String,
    pub final_score: f64,
    pub raw_score: f64,
    pub price: f64,
    pub performance: f64,
    pub resolution: f64,
    pub standing: BudgetStanding,
}

/// Clamps into the shared `[0, 100]` score universe. NaN collapses to 0.
pub(crate) fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
