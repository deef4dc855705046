use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::capability::{CpuFuzzifier, Fuzzifier, GpuFuzzifier, MotherboardFuzzifier};
use crate::config::ScoringConfig;
use crate::error::ScoringError;
use crate::ranker::Ranker;
use crate::types::{Category, CpuPart, GpuPart, MotherboardPart, RankedResult, UserPreference};

/// Borrowed view over the three part tables.
#[derive(Debug, Clone, Copy)]
pub struct CatalogView<'a> {
    pub gpus: &'a [GpuPart],
    pub cpus: &'a [CpuPart],
    pub motherboards: &'a [MotherboardPart],
}

/// Rankings for every category plus the picks that make a buildable system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRecommendation {
    pub gpus: Vec<RankedResult>,
    pub cpus: Vec<RankedResult>,
    /// Only boards that fit the top CPU's socket and memory.
    pub motherboards: Vec<RankedResult>,
    pub gpu: Option<RankedResult>,
    pub cpu: Option<RankedResult>,
    pub motherboard: Option<RankedResult>,
}

/// Ranking plus the fuzzifiers configured from the same [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct BuildAdvisor {
    ranker: Ranker,
    gpu: GpuFuzzifier,
    cpu: CpuFuzzifier,
    motherboard: MotherboardFuzzifier,
}

impl BuildAdvisor {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        let gpu = GpuFuzzifier::new(config.gpu.clone());
        let cpu = CpuFuzzifier::new(config.cpu.clone());
        let motherboard = MotherboardFuzzifier::new(config.motherboard.clone());
        Ok(Self {
            ranker: Ranker::new(config)?,
            gpu,
            cpu,
            motherboard,
        })
    }

    pub const fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn rank_gpus(
        &self,
        preference: &UserPreference,
        gpus: &[GpuPart],
    ) -> Result<Vec<RankedResult>, ScoringError> {
        self.ranker.rank(preference, gpus, &self.gpu, Category::Gpu)
    }

    pub fn rank_cpus(
        &self,
        preference: &UserPreference,
        cpus: &[CpuPart],
    ) -> Result<Vec<RankedResult>, ScoringError> {
        self.ranker.rank(preference, cpus, &self.cpu, Category::Cpu)
    }

    pub fn rank_motherboards(
        &self,
        preference: &UserPreference,
        motherboards: &[MotherboardPart],
    ) -> Result<Vec<RankedResult>, ScoringError> {
        self.ranker
            .rank(preference, motherboards, &self.motherboard, Category::Motherboard)
    }

    /// Checks that every part in `catalog` can be scored under this advisor's
    /// tables, e.g. that each motherboard chipset has a tier entry.
    pub fn validate_catalog(&self, catalog: CatalogView<'_>) -> Result<(), ScoringError> {
        for gpu in catalog.gpus {
            self.gpu.fuzzify(gpu)?;
        }
        for cpu in catalog.cpus {
            self.cpu.fuzzify(cpu)?;
        }
        for board in catalog.motherboards {
            self.motherboard.fuzzify(board)?;
        }
        Ok(())
    }

    /// Ranks every category, then restricts boards to the winning CPU.
    ///
    /// Without a CPU pick every board is ranked. If no board is compatible the
    /// motherboard pick stays empty rather than suggesting a mismatched part.
    pub fn recommend(
        &self,
        preference: &UserPreference,
        catalog: CatalogView<'_>,
    ) -> Result<BuildRecommendation, ScoringError> {
        let gpus = self.rank_gpus(preference, catalog.gpus)?;
        let cpus = self.rank_cpus(preference, catalog.cpus)?;

        let chosen_cpu = cpus
            .first()
            .and_then(|top| catalog.cpus.iter().find(|cpu| cpu.name == top.name));
        let boards: Vec<MotherboardPart> = match chosen_cpu {
            Some(cpu) => catalog
                .motherboards
                .iter()
                .filter(|board| board.supports(cpu))
                .cloned()
                .collect(),
            None => catalog.motherboards.to_vec(),
        };
        let motherboards = self.rank_motherboards(preference, &boards)?;

        debug!(
            cpu = chosen_cpu.map(|cpu| cpu.name.as_str()),
            compatible_boards = boards.len(),
            "assembled build"
        );
        Ok(BuildRecommendation {
            gpu: gpus.first().cloned(),
            cpu: cpus.first().cloned(),
            motherboard: motherboards.first().cloned(),
            gpus,
            cpus,
            motherboards,
        })
    }
}

fn shared_advisor() -> &'static BuildAdvisor {
    static ADVISOR: OnceLock<BuildAdvisor> = OnceLock::new();
    ADVISOR.get_or_init(BuildAdvisor::default)
}

/// Recommends a compatible build with the default configuration.
pub fn recommend_build(
    preference: &UserPreference,
    catalog: CatalogView<'_>,
) -> Result<BuildRecommendation, ScoringError> {
    shared_advisor().recommend(preference, catalog)
}
