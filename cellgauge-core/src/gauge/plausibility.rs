//! Sample-gap plausibility check
//!
//! The estimator's own defence against discontinuous time. It looks only at
//! the difference between consecutive timestamps it was handed, so it works
//! the same whether those came from [`PersistentClock`](crate::clock::PersistentClock),
//! an RTC, or a test.

use crate::time::Seconds;

/// Classification of the gap between two samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeStep {
    /// Gap usable for integration, clamped into `[0, max_dt]`
    Plausible(Seconds),
    /// Negative, too long, or not a number
    Discontinuity,
}

/// Flags sample gaps that cannot come from an uninterrupted sampling loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaPlausibility {
    max_dt: Seconds,
}

impl DeltaPlausibility {
    /// Accept gaps up to `max_dt` seconds
    pub fn new(max_dt: Seconds) -> Self {
        Self { max_dt }
    }

    /// Upper bound on a plausible gap
    pub fn max_dt(&self) -> Seconds {
        self.max_dt
    }

    /// Classify the gap `dt` between consecutive samples
    ///
    /// Total over all inputs: a NaN gap or NaN bound is a discontinuity.
    pub fn classify(&self, dt: Seconds) -> TimeStep {
        // NaN on either side fails both comparisons
        if !(dt >= 0.0 && dt <= self.max_dt) || !dt.is_finite() {
            return TimeStep::Discontinuity;
        }
        TimeStep::Plausible(dt.min(self.max_dt).max(0.0))
    }
}
