use crate::config::BudgetRange;

pub const MIN_BUDGET: f64 = BudgetRange::MIN_BUDGET;
pub const MAX_BUDGET: f64 = BudgetRange::MAX_BUDGET;

/// Maps a total budget onto the `[0, 100]` preference scale over `[500, 3000]`.
///
/// Values outside the domain are clamped; rejecting them is the caller's job.
pub fn normalize_budget(amount: f64) -> f64 {
    BudgetRange::default().normalize(amount)
}

impl BudgetRange {
    pub fn normalize(&self, amount: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 50.0;
        }
        if amount <= self.min {
            0.0
        } else if amount >= self.max {
            100.0
        } else {
            100.0 * (amount - self.min) / span
        }
    }
}

/// Maps an ordinal `1..=max_scale` answer onto `[0, 100]`.
pub fn map_ordinal_to_100(value: u8, max_scale: u8) -> f64 {
    if max_scale <= 1 {
        return 0.0;
    }
    let value = value.clamp(1, max_scale);
    100.0 * f64::from(value - 1) / f64::from(max_scale - 1)
}
