pub mod advisor;
pub mod budget;
pub mod capability;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod ranker;
pub mod types;

pub use advisor::{recommend_build, BuildAdvisor, BuildRecommendation, CatalogView};
pub use budget::{map_ordinal_to_100, normalize_budget, MAX_BUDGET, MIN_BUDGET};
pub use capability::{
    fuzzify_cpu, fuzzify_gpu, fuzzify_motherboard, CpuFuzzifier, Fuzzifier, GpuFuzzifier,
    MotherboardFuzzifier,
};
pub use config::{
    AdjustmentPolicy, AllocationTable, BudgetRange, ChipsetTier, CpuScale, GpuResolutionTier,
    GpuScale, MotherboardScale, PerformanceTier, ScoringConfig,
};
pub use error::ScoringError;
pub use fuzzy::{infer, FuzzyEngine, InferenceUnavailable};
pub use ranker::{rank, Ranker};
pub use types::*;
