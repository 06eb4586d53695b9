//! Shared fixtures for integration tests
//!
//! - Gauge and monitor constructors with the default 15 Ah pack
//! - A synthetic discharge profile that walks the OCV curve under load

#![allow(dead_code)]

use cellgauge_core::{
    storage::MemoryStore, time::MockTickSource, BatteryGauge, BatteryMonitor, CheckpointPolicy,
    GaugeConfig, OcvCurve, PersistentClock,
};

/// Gauge on the built-in curve with default parameters
pub fn default_gauge() -> BatteryGauge {
    BatteryGauge::li_ion_1s(GaugeConfig::default()).unwrap()
}

/// Monitor over a mock counter and an in-memory store
pub fn memory_monitor(
    ticks: &MockTickSource,
    store: MemoryStore,
    every_samples: u32,
) -> BatteryMonitor<&MockTickSource, MemoryStore> {
    let clock = PersistentClock::new(ticks, store);
    BatteryMonitor::new(clock, default_gauge(), CheckpointPolicy::every(every_samples))
}

/// One sensor sample
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub voltage: f64,
    pub current_ma: f64,
    pub timestamp: f64,
}

/// Constant-current discharge at 1 Hz
///
/// Terminal voltage follows the OCV curve for the charge actually removed,
/// minus a fixed IR sag, so the gauge sees a realistic trajectory.
pub struct DischargeProfile {
    curve: OcvCurve,
    capacity_mah: f64,
    current_ma: f64,
    sag_v: f64,
    start_soc: f64,
}

impl DischargeProfile {
    pub fn new(current_ma: f64) -> Self {
        Self {
            curve: OcvCurve::li_ion_1s(),
            capacity_mah: 15_000.0,
            current_ma,
            sag_v: 0.03,
            start_soc: 90.0,
        }
    }

    pub fn starting_at(mut self, soc: f64) -> Self {
        self.start_soc = soc;
        self
    }

    /// True SoC after `seconds` of discharge
    pub fn true_soc(&self, seconds: f64) -> f64 {
        let used = self.current_ma * seconds / 3600.0;
        (self.start_soc - 100.0 * used / self.capacity_mah).max(0.0)
    }

    /// Open-circuit voltage for a SoC, inverting the curve by bisection
    pub fn ocv_for(&self, soc: f64) -> f64 {
        let (mut lo, mut hi) = (self.curve.min_voltage(), self.curve.max_voltage());
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            if self.curve.soc_from_voltage(mid) < soc {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// First sample at rest, then `seconds` samples under load
    pub fn samples(&self, seconds: u32) -> Vec<Sample> {
        let mut out = Vec::with_capacity(seconds as usize + 1);
        out.push(Sample {
            voltage: self.ocv_for(self.start_soc),
            current_ma: 0.0,
            timestamp: 0.0,
        });
        for s in 1..=seconds {
            let t = f64::from(s);
            out.push(Sample {
                voltage: self.ocv_for(self.true_soc(t)) - self.sag_v,
                current_ma: self.current_ma,
                timestamp: t,
            });
        }
        out
    }
}
