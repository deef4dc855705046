use std::sync::OnceLock;

use tracing::debug;

use crate::capability::Fuzzifier;
use crate::config::{AdjustmentPolicy, ScoringConfig};
use crate::error::ScoringError;
use crate::fuzzy::FuzzyEngine;
use crate::types::{
    clamp_score, BudgetStanding, CapabilityScore, Category, Part, RankedResult, UserPreference,
};

impl AdjustmentPolicy {
    /// Multiplier applied to parts priced above their allocation.
    pub fn penalty(&self, price: f64, allocated: f64) -> f64 {
        let exceed_ratio = (price - allocated) / allocated;
        (1.0 - self.penalty_slope * exceed_ratio).max(self.penalty_floor)
    }

    /// Crisp price-versus-allocation adjustment of a raw fuzzy score.
    ///
    /// `allocated` must be positive; [`Ranker`] checks that before calling.
    pub fn apply(&self, raw: f64, price: f64, allocated: f64) -> (f64, BudgetStanding) {
        if price > allocated {
            let adjusted = raw * self.penalty(price, allocated);
            (clamp_score(adjusted), BudgetStanding::OverBudget)
        } else if price <= allocated * self.bonus_threshold {
            (clamp_score(raw * self.bonus_factor), BudgetStanding::UnderBudget)
        } else {
            (clamp_score(raw), BudgetStanding::OnTarget)
        }
    }
}

/// Scores a catalog slice against one buyer and sorts it best first.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: ScoringConfig,
    engine: FuzzyEngine,
}

impl Ranker {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.allocation.validate()?;
        Ok(Self {
            config,
            engine: FuzzyEngine::default(),
        })
    }

    pub fn with_engine(mut self, engine: FuzzyEngine) -> Self {
        self.engine = engine;
        self
    }

    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub const fn engine(&self) -> &FuzzyEngine {
        &self.engine
    }

    pub fn allocated_budget(
        &self,
        total_budget: f64,
        category: Category,
    ) -> Result<f64, ScoringError> {
        let amount = total_budget * self.config.allocation.ratio(category);
        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(ScoringError::InvalidAllocation { category, amount })
        }
    }

    /// Ranks `catalog` for `category`.
    ///
    /// The fuzzy engine always sees the buyer's overall budget preference;
    /// the per-category allocation only drives the crisp adjustment. Ties keep
    /// catalog order. Any invalid part aborts the whole pass.
    pub fn rank<P, F>(
        &self,
        preference: &UserPreference,
        catalog: &[P],
        fuzzifier: &F,
        category: Category,
    ) -> Result<Vec<RankedResult>, ScoringError>
    where
        P: Part,
        F: Fuzzifier<P> + ?Sized,
    {
        let allocated = self.allocated_budget(preference.total_budget, category)?;
        let budget_score = self.config.budget.normalize(preference.total_budget);

        let mut ranked = Vec::with_capacity(catalog.len());
        for part in catalog {
            let price = checked_price(part)?;
            let capability = fuzzifier.fuzzify(part)?;
            let raw = self
                .engine
                .infer(budget_score, capability.performance, capability.resolution);
            let (final_score, standing) = self.config.adjustment.apply(raw, price, allocated);
            let CapabilityScore {
                performance,
                resolution,
            } = capability.rounded();
            ranked.push(RankedResult {
                name: part.name().to_string(),
                final_score,
                raw_score: raw,
                price,
                performance,
                resolution,
                standing,
            });
        }
        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        debug!(
            %category,
            allocated,
            budget_score,
            candidates = ranked.len(),
            top = ranked.first().map(|r| r.name.as_str()),
            "ranked catalog"
        );
        Ok(ranked)
    }
}

fn checked_price<P: Part>(part: &P) -> Result<f64, ScoringError> {
    let price = part.price();
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ScoringError::InvalidPart {
            name: part.name().to_string(),
            field: "price",
            reason: format!("expected a finite non-negative amount, got {price}"),
        })
    }
}

fn shared_ranker() -> &'static Ranker {
    static RANKER: OnceLock<Ranker> = OnceLock::new();
    RANKER.get_or_init(Ranker::default)
}

/// Ranks with the default configuration and knowledge base.
pub fn rank<P, F>(
    preference: &UserPreference,
    catalog: &[P],
    fuzzifier: &F,
    category: Category,
) -> Result<Vec<RankedResult>, ScoringError>
where
    P: Part,
    F: Fuzzifier<P> + ?Sized,
{
    shared_ranker().rank(preference, catalog, fuzzifier, category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::GpuFuzzifier;
    use crate::config::AllocationTable;
    use crate::types::GpuPart;

    /// Fixed capability for every part, so only price moves the score.
    struct Flat(CapabilityScore);

    impl Fuzzifier<GpuPart> for Flat {
        fn fuzzify(&self, _part: &GpuPart) -> Result<CapabilityScore, ScoringError> {
            Ok(self.0)
        }
    }

    fn gpu(name: &str, price: f64, cores: u32, memory_gb: u32) -> GpuPart {
        GpuPart {
            name: name.to_string(),
            price,
            cores,
            memory_gb,
            architecture: None,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn price_at_allocation_is_unchanged() {
        let policy = AdjustmentPolicy::default();
        let (score, standing) = policy.apply(60.0, 1000.0, 1000.0);
        assert!(close(score, 60.0));
        assert_eq!(standing, BudgetStanding::OnTarget);
    }

    #[test]
    fn penalty_grows_with_overshoot_down_to_floor() {
        let policy = AdjustmentPolicy::default();
        assert!(close(policy.penalty(1500.0, 1000.0), 0.625));
        assert!(close(policy.penalty(3000.0, 1000.0), 0.1));
        assert!(close(policy.penalty(50_000.0, 1000.0), 0.1));

        let (score, standing) = policy.apply(80.0, 1500.0, 1000.0);
        assert!(close(score, 50.0));
        assert_eq!(standing, BudgetStanding::OverBudget);

        let (floored, _) = policy.apply(80.0, 3000.0, 1000.0);
        assert!(close(floored, 8.0));
        assert!(floored > 0.0);
    }

    #[test]
    fn bonus_band_boundaries() {
        let policy = AdjustmentPolicy::default();
        let allocated = 1000.0;

        let (score, standing) = policy.apply(60.0, 0.95 * allocated, allocated);
        assert!(close(score, 63.0));
        assert_eq!(standing, BudgetStanding::UnderBudget);

        let (score, standing) = policy.apply(60.0, 0.96 * allocated, allocated);
        assert!(close(score, 60.0));
        assert_eq!(standing, BudgetStanding::OnTarget);

        let (capped, _) = policy.apply(98.0, 100.0, allocated);
        assert!(close(capped, 100.0));
    }

    #[test]
    fn allocation_follows_ratio_table() {
        let ranker = Ranker::default();
        assert_eq!(ranker.allocated_budget(3000.0, Category::Gpu), Ok(1350.0));
        assert!(close(
            ranker.allocated_budget(2000.0, Category::Cpu).unwrap_or_default(),
            600.0
        ));
        assert_eq!(
            ranker.allocated_budget(0.0, Category::Motherboard),
            Err(ScoringError::InvalidAllocation {
                category: Category::Motherboard,
                amount: 0.0
            })
        );
    }

    #[test]
    fn rejects_invalid_ratio_tables() {
        let config = ScoringConfig::default().with_allocation(AllocationTable::new(0.5, 0.5, 0.5));
        assert!(matches!(
            Ranker::new(config),
            Err(ScoringError::OverAllocated(_))
        ));
    }

    #[test]
    fn over_budget_part_ranks_below_comparable_cheaper_part() {
        let preference = UserPreference::new(3000.0, 10, 3);
        let catalog = vec![
            gpu("expensive", 1599.0, 10_000, 16),
            gpu("affordable", 799.0, 10_000, 16),
        ];
        let ranked = rank(&preference, &catalog, &GpuFuzzifier::default(), Category::Gpu)
            .unwrap_or_default();
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["affordable", "expensive"]);
        assert!(ranked.iter().all(|r| close(r.raw_score, ranked[0].raw_score)));
        assert_eq!(ranked[1].standing, BudgetStanding::OverBudget);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let preference = UserPreference::new(2000.0, 5, 2);
        let catalog = vec![
            gpu("first", 400.0, 1, 1),
            gpu("second", 400.0, 1, 1),
            gpu("third", 400.0, 1, 1),
        ];
        let flat = Flat(CapabilityScore::new(60.0, 50.0));
        let ranked = rank(&preference, &catalog, &flat, Category::Gpu).unwrap_or_default();
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn ranking_is_idempotent() {
        let preference = UserPreference::new(1500.0, 6, 2);
        let catalog = vec![
            gpu("a", 999.0, 10_240, 16),
            gpu("b", 599.0, 7_168, 12),
            gpu("c", 299.0, 3_072, 8),
            gpu("d", 649.0, 5_120, 16),
        ];
        let fuzzifier = GpuFuzzifier::default();
        let first = rank(&preference, &catalog, &fuzzifier, Category::Gpu);
        let second = rank(&preference, &catalog, &fuzzifier, Category::Gpu);
        assert_eq!(first, second);
        assert!(first.is_ok_and(|ranked| ranked.len() == 4));
    }

    #[test]
    fn invalid_price_aborts_the_pass() {
        let preference = UserPreference::new(1500.0, 6, 2);
        let catalog = vec![gpu("ok", 300.0, 3_000, 8), gpu("broken", f64::NAN, 3_000, 8)];
        let result = rank(&preference, &catalog, &GpuFuzzifier::default(), Category::Gpu);
        assert!(matches!(
            result,
            Err(ScoringError::InvalidPart { ref name, field: "price", .. }) if name == "broken"
        ));
    }

    #[test]
    fn scores_and_capabilities_are_bounded_and_rounded() {
        let preference = UserPreference::new(2500.0, 8, 3);
        let catalog = vec![
            gpu("a", 10.0, 16_384, 24),
            gpu("b", 9_999.0, 2_048, 8),
            gpu("c", 1_125.0, 8_704, 10),
        ];
        let ranked = rank(&preference, &catalog, &GpuFuzzifier::default(), Category::Gpu)
            .unwrap_or_default();
        assert_eq!(ranked.len(), 3);
        for result in &ranked {
            assert!((0.0..=100.0).contains(&result.final_score));
            assert!((0.0..=100.0).contains(&result.raw_score));
            assert!(close(result.performance, (result.performance * 100.0).round() / 100.0));
        }
        assert!(ranked.windows(2).all(|w| w[0].final_score >= w[1].final_score));
    }
}
