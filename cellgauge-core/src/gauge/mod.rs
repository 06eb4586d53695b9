//! Battery State-of-Charge Estimator
//!
//! ## Algorithm
//!
//! Coulomb counting tracks charge in and out of the cell; the OCV curve
//! corrects the drift that integration accumulates.
//!
//! ```text
//! first sample      soc = OCV(V)                       (no prior reference)
//! gap implausible   soc = OCV(V)                       (full reseed)
//! otherwise
//!   dQ     = I · dt / 3600                             [mAh]
//!   soc_cc = soc − 100 · dQ / capacity                 [I > 0 discharges]
//!   V ≥ full − margin   → soc_cc = max(soc_cc, 99)
//!   V ≤ empty + margin  → soc_cc = min(soc_cc, 1)
//!   |I| ≤ rest          → soc = (1 − α) · soc_cc + α · OCV(V)
//!   else                → soc = soc_cc
//!   soc = clamp(soc, 0, 100)
//! ```
//!
//! ## Rest detection
//!
//! Under load the terminal voltage sags below OCV by `I × R_internal`;
//! blending it in would drag the estimate down whenever the device is busy.
//! At rest the voltage is a reliable charge indicator, and a small `α`
//! pulls the estimate over many samples rather than in one jump.
//!
//! ## Time discontinuities
//!
//! Gaps that are negative or longer than `max_plausible_dt` mean the time
//! source restarted or the loop stalled. The coulomb-counted trajectory is
//! discarded outright and the estimate reseeded from OCV: plausibility
//! over continuity. This check is independent of the clock's own restart
//! detection.

mod config;
mod plausibility;

pub use config::GaugeConfig;
pub use plausibility::{DeltaPlausibility, TimeStep};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::constants::battery::{
    ANCHOR_EMPTY_CEILING_PCT, ANCHOR_FULL_FLOOR_PCT, SOC_MAX_PCT, SOC_MIN_PCT,
};
use crate::constants::time::SECONDS_PER_HOUR;
use crate::errors::ConfigResult;
use crate::ocv::OcvCurve;
use crate::time::Seconds;

/// How an estimate was produced
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum EstimateSource {
    /// First sample, taken straight from the OCV curve
    Seeded,
    /// Time discontinuity, trajectory discarded and taken from the OCV curve
    Reseeded {
        /// Offending gap (seconds), NaN for a non-finite timestamp
        dt: Seconds,
    },
    /// Coulomb counting only, cell under load
    CoulombCounted,
    /// Coulomb counting blended with OCV, cell at rest
    Blended,
}

/// One estimator output, ready for the logger
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SocEstimate {
    /// State of charge (%), always within [0, 100]
    pub soc: f64,
    /// Timestamp the estimate was computed for
    pub timestamp: Seconds,
    /// How it was computed
    pub source: EstimateSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GaugeState {
    Uninitialized,
    Tracking { soc: f64, last_sample_time: Seconds },
}

/// Coulomb-counting SoC tracker with OCV correction
///
/// ## Example
///
/// ```rust
/// use cellgauge_core::{BatteryGauge, GaugeConfig};
///
/// let mut gauge = BatteryGauge::li_ion_1s(GaugeConfig::default()).unwrap();
///
/// // First sample seeds from the OCV curve
/// assert_eq!(gauge.update(4.00, 1000.0, 0.0), 100.0);
///
/// // One second at 1 A out of 15 Ah
/// let soc = gauge.update(3.70, 1000.0, 1.0);
/// assert!((soc - 99.998).abs() < 0.001);
/// ```
#[derive(Debug, Clone)]
pub struct BatteryGauge {
    config: GaugeConfig,
    curve: OcvCurve,
    plausibility: DeltaPlausibility,
    state: GaugeState,
    time_jumps: u32,
}

impl BatteryGauge {
    /// Create an uninitialized gauge
    pub fn new(config: GaugeConfig, curve: OcvCurve) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            plausibility: DeltaPlausibility::new(config.max_plausible_dt),
            config,
            curve,
            state: GaugeState::Uninitialized,
            time_jumps: 0,
        })
    }

    /// Gauge using the built-in Li-ion 1S curve
    pub fn li_ion_1s(config: GaugeConfig) -> ConfigResult<Self> {
        Self::new(config, OcvCurve::li_ion_1s())
    }

    /// Feed one sample and return the new SoC (%)
    ///
    /// `current_ma` is positive when discharging.
    pub fn update(&mut self, voltage: f64, current_ma: f64, timestamp: Seconds) -> f64 {
        self.update_detailed(voltage, current_ma, timestamp).soc
    }

    /// Feed one sample and report how the estimate was produced
    pub fn update_detailed(&mut self, voltage: f64, current_ma: f64, timestamp: Seconds) -> SocEstimate {
        let (soc, last_sample_time) = match self.state {
            GaugeState::Uninitialized => {
                return self.seed(voltage, timestamp, EstimateSource::Seeded);
            }
            GaugeState::Tracking { soc, last_sample_time } => (soc, last_sample_time),
        };

        if !timestamp.is_finite() {
            // Keep the last good sample time so the next finite one can resume
            log_warn!("Non-finite timestamp, reseeding from OCV");
            self.time_jumps = self.time_jumps.saturating_add(1);
            let soc = self.curve.soc_from_voltage(voltage);
            self.state = GaugeState::Tracking { soc, last_sample_time };
            return SocEstimate {
                soc,
                timestamp,
                source: EstimateSource::Reseeded { dt: f64::NAN },
            };
        }

        let raw_dt = timestamp - last_sample_time;
        let dt = match self.plausibility.classify(raw_dt) {
            TimeStep::Plausible(dt) => dt,
            TimeStep::Discontinuity => {
                self.time_jumps = self.time_jumps.saturating_add(1);
                log_warn!(
                    "Time jump of {:.2} s (limit {:.2} s): restart or long pause, reseeding from OCV",
                    raw_dt,
                    self.config.max_plausible_dt
                );
                return self.seed(voltage, timestamp, EstimateSource::Reseeded { dt: raw_dt });
            }
        };

        let soc_cc = self.anchor(self.coulomb_step(soc, current_ma, dt), voltage);

        let (soc_new, source) = if self.is_rested(voltage, current_ma) {
            let soc_ocv = self.curve.soc_from_voltage(voltage);
            let alpha = self.config.blend_alpha;
            ((1.0 - alpha) * soc_cc + alpha * soc_ocv, EstimateSource::Blended)
        } else {
            (soc_cc, EstimateSource::CoulombCounted)
        };

        let soc_new = if soc_new.is_finite() { soc_new } else { soc };
        let soc_new = soc_new.clamp(SOC_MIN_PCT, SOC_MAX_PCT);

        self.state = GaugeState::Tracking { soc: soc_new, last_sample_time: timestamp };
        SocEstimate { soc: soc_new, timestamp, source }
    }

    /// Current estimate, `None` before the first sample
    pub fn soc(&self) -> Option<f64> {
        match self.state {
            GaugeState::Uninitialized => None,
            GaugeState::Tracking { soc, .. } => Some(soc),
        }
    }

    /// Whether the first sample has been seen
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, GaugeState::Tracking { .. })
    }

    /// Timestamp of the last accepted sample
    pub fn last_sample_time(&self) -> Option<Seconds> {
        match self.state {
            GaugeState::Uninitialized => None,
            GaugeState::Tracking { last_sample_time, .. } => Some(last_sample_time),
        }
    }

    /// Time discontinuities seen so far
    pub fn time_jumps(&self) -> u32 {
        self.time_jumps
    }

    /// Configuration in use
    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// OCV curve in use
    pub fn curve(&self) -> &OcvCurve {
        &self.curve
    }

    fn seed(&mut self, voltage: f64, timestamp: Seconds, source: EstimateSource) -> SocEstimate {
        let soc = self.curve.soc_from_voltage(voltage);
        log_debug!("SoC seeded from OCV: {:.2} V -> {:.2} %", voltage, soc);

        // A first sample without a usable time leaves the gauge waiting
        if timestamp.is_finite() {
            self.state = GaugeState::Tracking { soc, last_sample_time: timestamp };
        }
        SocEstimate { soc, timestamp, source }
    }

    fn coulomb_step(&self, soc: f64, current_ma: f64, dt: Seconds) -> f64 {
        if !current_ma.is_finite() {
            log_warn!("Non-finite current, skipping charge integration");
            return soc;
        }
        let dq_mah = current_ma * dt / SECONDS_PER_HOUR;
        soc - 100.0 * dq_mah / self.config.capacity_mah
    }

    fn anchor(&self, soc_cc: f64, voltage: f64) -> f64 {
        let mut soc_cc = soc_cc;
        if voltage >= self.config.full_voltage - self.config.anchor_margin {
            soc_cc = soc_cc.max(ANCHOR_FULL_FLOOR_PCT);
        }
        if voltage <= self.config.empty_voltage + self.config.anchor_margin {
            soc_cc = soc_cc.min(ANCHOR_EMPTY_CEILING_PCT);
        }
        soc_cc
    }

    fn is_rested(&self, voltage: f64, current_ma: f64) -> bool {
        // NaN current compares false and counts as loaded
        voltage.is_finite() && libm::fabs(current_ma) <= self.config.rest_current_ma
    }
}
