use crate::error::ScoringError;
use crate::types::{Category, MemoryGeneration};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    pub const MIN_BUDGET: f64 = 500.0;
    pub const MAX_BUDGET: f64 = 3000.0;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, amount: f64) -> bool {
        (self.min..=self.max).contains(&amount)
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self::new(Self::MIN_BUDGET, Self::MAX_BUDGET)
    }
}

/// Share of the total budget assigned to each part category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationTable {
    pub gpu: f64,
    pub cpu: f64,
    pub motherboard: f64,
}

impl AllocationTable {
    pub const fn new(gpu: f64, cpu: f64, motherboard: f64) -> Self {
        Self {
            gpu,
            cpu,
            motherboard,
        }
    }

    pub const fn ratio(&self, category: Category) -> f64 {
        match category {
            Category::Gpu => self.gpu,
            Category::Cpu => self.cpu,
            Category::Motherboard => self.motherboard,
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for category in Category::ALL {
            let ratio = self.ratio(category);
            if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
                return Err(ScoringError::InvalidRatio { category, ratio });
            }
        }
        let total = self.gpu + self.cpu + self.motherboard;
        if total > 1.0 + 1e-9 {
            return Err(ScoringError::OverAllocated(total));
        }
        Ok(())
    }
}

impl Default for AllocationTable {
    fn default() -> Self {
        Self::new(0.45, 0.30, 0.25)
    }
}

/// A discrete resolution tier a GPU reaches once both gates are passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuResolutionTier {
    pub min_memory_gb: u32,
    pub cores_above: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpuScale {
    pub max_cores: f64,
    pub max_memory_gb: f64,
    pub core_weight: f64,
    pub memory_weight: f64,
    /// Checked in order, highest tier first.
    pub tiers: Vec<GpuResolutionTier>,
    pub base_resolution: f64,
}

impl Default for GpuScale {
    fn default() -> Self {
        Self {
            max_cores: 16_500.0,
            max_memory_gb: 24.0,
            core_weight: 0.7,
            memory_weight: 0.3,
            tiers: vec![
                GpuResolutionTier {
                    min_memory_gb: 16,
                    cores_above: 10_000,
                    score: 90.0,
                },
                GpuResolutionTier {
                    min_memory_gb: 8,
                    cores_above: 5_000,
                    score: 50.0,
                },
            ],
            base_resolution: 10.0,
        }
    }
}

/// Resolution tier keyed on a performance score strictly above `above`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceTier {
    pub above: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpuScale {
    pub max_single_thread: f64,
    pub max_multi_thread: f64,
    pub single_thread_weight: f64,
    pub multi_thread_weight: f64,
    pub tiers: Vec<PerformanceTier>,
    pub base_resolution: f64,
}

impl Default for CpuScale {
    fn default() -> Self {
        Self {
            max_single_thread: 5_000.0,
            max_multi_thread: 64_000.0,
            single_thread_weight: 0.6,
            multi_thread_weight: 0.4,
            tiers: vec![
                PerformanceTier {
                    above: 80.0,
                    score: 90.0,
                },
                PerformanceTier {
                    above: 50.0,
                    score: 50.0,
                },
            ],
            base_resolution: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChipsetTier {
    pub chipset: String,
    pub base_score: f64,
    pub high_end: bool,
}

impl ChipsetTier {
    pub fn new(chipset: impl Into<String>, base_score: f64, high_end: bool) -> Self {
        Self {
            chipset: chipset.into(),
            base_score,
            high_end,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotherboardScale {
    pub tiers: Vec<ChipsetTier>,
    pub newest_memory: MemoryGeneration,
    pub newest_memory_bonus: f64,
    pub newest_memory_score: f64,
    pub high_end_bonus: f64,
    pub resolution_floor: f64,
}

impl MotherboardScale {
    /// Case-insensitive chipset lookup.
    pub fn tier(&self, chipset: &str) -> Option<&ChipsetTier> {
        self.tiers
            .iter()
            .find(|tier| tier.chipset.eq_ignore_ascii_case(chipset.trim()))
    }
}

impl Default for MotherboardScale {
    fn default() -> Self {
        Self {
            tiers: vec![
                ChipsetTier::new("X670E", 100.0, true),
                ChipsetTier::new("X670", 90.0, true),
                ChipsetTier::new("Z790", 95.0, true),
                ChipsetTier::new("Z690", 85.0, true),
                ChipsetTier::new("X570", 80.0, true),
                ChipsetTier::new("B650E", 75.0, false),
                ChipsetTier::new("B650", 70.0, false),
                ChipsetTier::new("B760", 60.0, false),
                ChipsetTier::new("B550", 55.0, false),
                ChipsetTier::new("H770", 50.0, false),
                ChipsetTier::new("A620", 40.0, false),
                ChipsetTier::new("H610", 30.0, false),
            ],
            newest_memory: MemoryGeneration::Ddr5,
            newest_memory_bonus: 10.0,
            newest_memory_score: 50.0,
            high_end_bonus: 40.0,
            resolution_floor: 10.0,
        }
    }
}

/// Crisp price-versus-allocation adjustment applied after inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentPolicy {
    pub penalty_slope: f64,
    pub penalty_floor: f64,
    pub bonus_threshold: f64,
    pub bonus_factor: f64,
}

impl Default for AdjustmentPolicy {
    fn default() -> Self {
        Self {
            penalty_slope: 0.75,
            penalty_floor: 0.1,
            bonus_threshold: 0.95,
            bonus_factor: 1.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoringConfig {
    pub budget: BudgetRange,
    pub allocation: AllocationTable,
    pub gpu: GpuScale,
    pub cpu: CpuScale,
    pub motherboard: MotherboardScale,
    pub adjustment: AdjustmentPolicy,
}

impl ScoringConfig {
    pub fn with_allocation(mut self, allocation: AllocationTable) -> Self {
        self.allocation = allocation;
        self
    }
}
