//! One sample cycle: clock, estimator, checkpoint schedule
//!
//! [`BatteryMonitor`] performs the per-sample bookkeeping the sampling loop
//! would otherwise repeat: read the logical time, update the estimate, and
//! checkpoint the clock every N samples. Sleeping, sensor polling, log
//! writing and watchdog feeding stay with the caller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::PersistentClock;
use crate::constants::time::DEFAULT_CHECKPOINT_EVERY_SAMPLES;
use crate::gauge::{BatteryGauge, EstimateSource};
use crate::time::Seconds;
use crate::traits::{CheckpointStore, TickSource};

/// When to write a periodic clock checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CheckpointPolicy {
    /// Samples between checkpoints; 0 disables periodic checkpoints
    pub every_samples: u32,
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self {
            every_samples: DEFAULT_CHECKPOINT_EVERY_SAMPLES,
        }
    }
}

impl CheckpointPolicy {
    /// Checkpoint every `every_samples` samples
    pub fn every(every_samples: u32) -> Self {
        Self { every_samples }
    }

    /// Never checkpoint periodically (shutdown still does)
    pub fn disabled() -> Self {
        Self { every_samples: 0 }
    }

    /// Whether a checkpoint is due after `sample_count` samples
    pub fn is_due(&self, sample_count: u64) -> bool {
        self.every_samples != 0
            && sample_count != 0
            && sample_count % u64::from(self.every_samples) == 0
    }
}

/// One row for the data logger
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SocSample {
    /// Logical time of the sample (seconds)
    pub timestamp: Seconds,
    /// State of charge (%)
    pub soc: f64,
    /// How the estimate was produced
    pub source: EstimateSource,
}

/// Clock and estimator driven together, one sample at a time
#[derive(Debug)]
pub struct BatteryMonitor<T: TickSource, S: CheckpointStore> {
    clock: PersistentClock<T, S>,
    gauge: BatteryGauge,
    policy: CheckpointPolicy,
    sample_count: u64,
}

impl<T: TickSource, S: CheckpointStore> BatteryMonitor<T, S> {
    /// Combine a clock and gauge under a checkpoint policy
    pub fn new(clock: PersistentClock<T, S>, gauge: BatteryGauge, policy: CheckpointPolicy) -> Self {
        Self {
            clock,
            gauge,
            policy,
            sample_count: 0,
        }
    }

    /// Process one sensor sample
    ///
    /// `current_ma` is positive when discharging. A checkpoint failure is
    /// absorbed by the clock and never reaches the caller.
    pub fn sample(&mut self, voltage: f64, current_ma: f64) -> SocSample {
        let timestamp = self.clock.timestamp();
        let estimate = self.gauge.update_detailed(voltage, current_ma, timestamp);

        self.sample_count = self.sample_count.saturating_add(1);
        if self.policy.is_due(self.sample_count) {
            self.clock.save_checkpoint(timestamp);
        }

        SocSample {
            timestamp,
            soc: estimate.soc,
            source: estimate.source,
        }
    }

    /// Final checkpoint for an orderly stop; returns the time written
    pub fn shutdown(&mut self) -> Seconds {
        let timestamp = self.clock.checkpoint();
        log_info!(
            "Shutdown after {} samples, checkpoint at {:.2} s",
            self.sample_count,
            timestamp
        );
        timestamp
    }

    /// Samples processed so far
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Checkpoint schedule in use
    pub fn policy(&self) -> CheckpointPolicy {
        self.policy
    }

    /// The logical clock
    pub fn clock(&self) -> &PersistentClock<T, S> {
        &self.clock
    }

    /// Mutable access to the clock, e.g. to [`reset`](PersistentClock::reset) it
    pub fn clock_mut(&mut self) -> &mut PersistentClock<T, S> {
        &mut self.clock
    }

    /// The estimator
    pub fn gauge(&self) -> &BatteryGauge {
        &self.gauge
    }

    /// Release the clock and gauge
    pub fn into_parts(self) -> (PersistentClock<T, S>, BatteryGauge) {
        (self.clock, self.gauge)
    }
}
