//! Per-class mapping from raw hardware figures to capability axes.
//!
//! Every fuzzifier answers with exactly `(performance, resolution)`. Price
//! never enters here; it only matters to the ranker's crisp adjustment.

use crate::config::{CpuScale, GpuScale, MotherboardScale};
use crate::error::ScoringError;
use crate::types::{CapabilityScore, CpuPart, GpuPart, MotherboardPart};

pub trait Fuzzifier<P: ?Sized> {
    fn fuzzify(&self, part: &P) -> Result<CapabilityScore, ScoringError>;
}

#[derive(Debug, Clone, Default)]
pub struct GpuFuzzifier {
    scale: GpuScale,
}

impl GpuFuzzifier {
    pub const fn new(scale: GpuScale) -> Self {
        Self { scale }
    }

    pub fn capability(&self, part: &GpuPart) -> CapabilityScore {
        let scale = &self.scale;
        let performance = 100.0
            * (scale.core_weight * share(f64::from(part.cores), scale.max_cores)
                + scale.memory_weight * share(f64::from(part.memory_gb), scale.max_memory_gb));
        let resolution = scale
            .tiers
            .iter()
            .find(|tier| part.memory_gb >= tier.min_memory_gb && part.cores > tier.cores_above)
            .map_or(scale.base_resolution, |tier| tier.score);
        CapabilityScore::new(performance, resolution)
    }
}

impl Fuzzifier<GpuPart> for GpuFuzzifier {
    fn fuzzify(&self, part: &GpuPart) -> Result<CapabilityScore, ScoringError> {
        Ok(self.capability(part))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CpuFuzzifier {
    scale: CpuScale,
}

impl CpuFuzzifier {
    pub const fn new(scale: CpuScale) -> Self {
        Self { scale }
    }

    /// Resolution follows raw power: a CPU matters at high resolutions only
    /// as far as it keeps the GPU fed.
    pub fn capability(&self, part: &CpuPart) -> CapabilityScore {
        let scale = &self.scale;
        let performance = CapabilityScore::new(
            100.0
                * (scale.single_thread_weight
                    * share(f64::from(part.single_thread), scale.max_single_thread)
                    + scale.multi_thread_weight
                        * share(f64::from(part.multi_thread), scale.max_multi_thread)),
            0.0,
        )
        .performance;
        let resolution = scale
            .tiers
            .iter()
            .find(|tier| performance > tier.above)
            .map_or(scale.base_resolution, |tier| tier.score);
        CapabilityScore::new(performance, resolution)
    }
}

impl Fuzzifier<CpuPart> for CpuFuzzifier {
    fn fuzzify(&self, part: &CpuPart) -> Result<CapabilityScore, ScoringError> {
        Ok(self.capability(part))
    }
}

/// Scores boards on chipset tier; the resolution axis carries future-proofing.
#[derive(Debug, Clone, Default)]
pub struct MotherboardFuzzifier {
    scale: MotherboardScale,
}

impl MotherboardFuzzifier {
    pub const fn new(scale: MotherboardScale) -> Self {
        Self { scale }
    }
}

impl Fuzzifier<MotherboardPart> for MotherboardFuzzifier {
    fn fuzzify(&self, part: &MotherboardPart) -> Result<CapabilityScore, ScoringError> {
        let scale = &self.scale;
        let tier = scale
            .tier(&part.chipset)
            .ok_or_else(|| ScoringError::UnknownChipset {
                name: part.name.clone(),
                chipset: part.chipset.clone(),
            })?;
        let newest = part.memory == scale.newest_memory;

        let mut performance = tier.base_score;
        let mut future_proofing = 0.0;
        if newest {
            performance += scale.newest_memory_bonus;
            future_proofing += scale.newest_memory_score;
        }
        if tier.high_end {
            future_proofing += scale.high_end_bonus;
        }
        Ok(CapabilityScore::new(
            performance,
            future_proofing.max(scale.resolution_floor),
        ))
    }
}

fn share(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

pub fn fuzzify_gpu(part: &GpuPart) -> (f64, f64) {
    GpuFuzzifier::default().capability(part).as_pair()
}

pub fn fuzzify_cpu(part: &CpuPart) -> (f64, f64) {
    CpuFuzzifier::default().capability(part).as_pair()
}

pub fn fuzzify_motherboard(part: &MotherboardPart) -> Result<(f64, f64), ScoringError> {
    MotherboardFuzzifier::default()
        .fuzzify(part)
        .map(CapabilityScore::as_pair)
}
