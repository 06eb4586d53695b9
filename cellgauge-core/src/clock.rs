//! Persistent Logical Clock
//!
//! ## Problem
//!
//! The hardware tick counter restarts from zero whenever the device resets
//! (watchdog, brown-out, power cycle). Log timestamps taken straight from it
//! would jump back to zero after every reset and collide with earlier rows.
//!
//! ## Approach
//!
//! ```text
//! timestamp = offset + (current_tick - reference_tick) / tick_hz
//! ```
//!
//! - `offset` is loaded once from a durable checkpoint at construction
//!   (0 when missing or corrupt).
//! - The caller decides when to checkpoint; the clock never writes on its
//!   own, so flash wear stays under the caller's control.
//! - If the counter is seen going backwards while the process keeps running,
//!   the time elapsed up to the last observation is folded into `offset`.
//!   A reading close to zero is a restart (peripheral reset, counter wrap)
//!   and counting resumes from zero; a reading further up is a step back
//!   and counting resumes from that reading.
//!
//! The result is non-decreasing across checkpoints and restarts. Only an
//! explicit [`PersistentClock::reset`] takes it back to zero.
//!
//! ## Accuracy
//!
//! Time between the last checkpoint and a power loss is lost: after a
//! restart the clock resumes from the checkpoint, not from the instant the
//! power went out.

use crate::constants::time::{SECONDS_PER_HOUR, TICK_RESTART_WINDOW_S};
use crate::time::{ticks_to_seconds, Seconds};
use crate::traits::{CheckpointStore, TickSource};

/// Result of feeding a tick reading to a [`TickRestartDetector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickObservation {
    /// Counter moved forward (or stood still)
    Continuous,
    /// Counter went backwards to near zero: it restarted or wrapped
    Restarted {
        /// Last reading before the restart
        last_tick: u64,
    },
    /// Counter went backwards but stayed well above zero
    SteppedBack {
        /// Last reading before the step
        last_tick: u64,
    },
}

/// Detects a tick counter restarting underneath a running clock
///
/// Works only on raw tick readings; it knows nothing about seconds,
/// checkpoints, or the estimator's own time checks.
#[derive(Debug, Clone)]
pub struct TickRestartDetector {
    last_tick: u64,
    restart_window: u64,
}

impl TickRestartDetector {
    /// Start tracking from `tick`
    ///
    /// A backwards reading at or below `restart_window` ticks counts as a
    /// restart from zero.
    pub fn new(tick: u64, restart_window: u64) -> Self {
        Self { last_tick: tick, restart_window }
    }

    /// Record a reading and classify it
    pub fn observe(&mut self, tick: u64) -> TickObservation {
        let last_tick = self.last_tick;
        self.last_tick = tick;
        if tick >= last_tick {
            TickObservation::Continuous
        } else if tick <= self.restart_window {
            TickObservation::Restarted { last_tick }
        } else {
            TickObservation::SteppedBack { last_tick }
        }
    }

    /// Readings at or below this after going backwards are restarts
    pub fn restart_window(&self) -> u64 {
        self.restart_window
    }

    /// Most recent reading
    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    /// Forget history and continue from `tick`
    pub fn rebase(&mut self, tick: u64) {
        self.last_tick = tick;
    }
}

/// Elapsed-time clock that survives restarts
///
/// ## Example
///
/// ```rust
/// use cellgauge_core::PersistentClock;
/// use cellgauge_core::storage::MemoryStore;
/// use cellgauge_core::time::MockTickSource;
///
/// let ticks = MockTickSource::new(0);
/// let mut store = MemoryStore::new();
///
/// let mut clock = PersistentClock::new(&ticks, &mut store);
/// ticks.advance_ms(90_000);
/// clock.checkpoint();
/// drop(clock);
///
/// // Device resets: counter back to zero, clock resumes from the checkpoint
/// ticks.set(0);
/// let mut clock = PersistentClock::new(&ticks, &mut store);
/// assert_eq!(clock.timestamp(), 90.0);
/// ```
#[derive(Debug)]
pub struct PersistentClock<T: TickSource, S: CheckpointStore> {
    ticks: T,
    store: S,
    detector: TickRestartDetector,
    reference_tick: u64,
    offset: Seconds,
    last_checkpoint: Option<Seconds>,
    restarts_detected: u32,
    resumed: bool,
}

impl<T: TickSource, S: CheckpointStore> PersistentClock<T, S> {
    /// Create the clock, reading the checkpoint store once
    ///
    /// A missing, unreadable, or corrupt record starts the clock at zero.
    pub fn new(ticks: T, mut store: S) -> Self {
        let reference_tick = ticks.now_ticks();
        let restart_window = ticks.ticks_per_second().saturating_mul(TICK_RESTART_WINDOW_S);

        let offset = match store.load() {
            Ok(Some(seconds)) if seconds.is_finite() && seconds >= 0.0 => seconds,
            Ok(Some(seconds)) => {
                log_warn!("Ignoring out-of-range checkpoint {}, starting from 0", seconds);
                0.0
            }
            Ok(None) => 0.0,
            Err(err) => {
                log_warn!("Checkpoint unreadable ({}), starting from 0", err);
                0.0
            }
        };

        let resumed = offset > 0.0;
        if resumed {
            log_warn!(
                "System was reset, continuing from {:.2} s ({:.2} h)",
                offset,
                offset / SECONDS_PER_HOUR
            );
        }

        Self {
            ticks,
            store,
            detector: TickRestartDetector::new(reference_tick, restart_window),
            reference_tick,
            offset,
            last_checkpoint: None,
            restarts_detected: 0,
            resumed,
        }
    }

    /// Current logical time in seconds
    ///
    /// Never fails; always finite and non-negative.
    pub fn timestamp(&mut self) -> Seconds {
        let now = self.ticks.now_ticks();

        match self.detector.observe(now) {
            TickObservation::Continuous => {}
            TickObservation::Restarted { last_tick } => {
                let carried = self.elapsed(self.reference_tick, last_tick);
                self.offset += carried;
                // Ticks since the restart count from zero
                self.reference_tick = 0;
                self.restarts_detected = self.restarts_detected.saturating_add(1);
                log_warn!(
                    "Tick counter restarted ({} -> {}), carrying {:.2} s forward",
                    last_tick,
                    now,
                    carried
                );
            }
            TickObservation::SteppedBack { last_tick } => {
                let carried = self.elapsed(self.reference_tick, last_tick);
                self.offset += carried;
                // Nothing known about the gap; resume from this reading
                self.reference_tick = now;
                self.restarts_detected = self.restarts_detected.saturating_add(1);
                log_warn!(
                    "Tick counter stepped back ({} -> {}), carrying {:.2} s forward",
                    last_tick,
                    now,
                    carried
                );
            }
        }

        self.offset + self.elapsed(self.reference_tick, now)
    }

    /// Persist `seconds` as the resume point for the next start
    ///
    /// Best effort: a failed write is logged and dropped, and the running
    /// clock is unaffected.
    pub fn save_checkpoint(&mut self, seconds: Seconds) {
        match self.store.save(seconds) {
            Ok(()) => {
                self.last_checkpoint = Some(seconds);
                log_debug!("Checkpoint saved at {:.2} s", seconds);
            }
            Err(err) => {
                log_warn!("Checkpoint at {} s not saved: {}", seconds, err);
            }
        }
    }

    /// Checkpoint the current time and return it
    pub fn checkpoint(&mut self) -> Seconds {
        let now = self.timestamp();
        self.save_checkpoint(now);
        now
    }

    /// Start over from zero and drop the stored checkpoint
    ///
    /// For deliberately starting a new measurement run, not fault recovery.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.clear() {
            log_warn!("Checkpoint not cleared: {}", err);
        }

        let now = self.ticks.now_ticks();
        self.detector.rebase(now);
        self.reference_tick = now;
        self.offset = 0.0;
        self.last_checkpoint = None;
        self.resumed = false;
        log_info!("Logical clock reset to zero");
    }

    /// Seconds carried over from checkpoints and counter restarts
    pub fn offset(&self) -> Seconds {
        self.offset
    }

    /// Whether construction picked up a non-zero checkpoint
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Backwards counter readings (restarts and step-backs) since construction
    pub fn restarts_detected(&self) -> u32 {
        self.restarts_detected
    }

    /// Last value this clock successfully checkpointed
    pub fn last_checkpoint(&self) -> Option<Seconds> {
        self.last_checkpoint
    }

    /// Tick source
    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    /// Checkpoint store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the tick source and store
    pub fn into_parts(self) -> (T, S) {
        (self.ticks, self.store)
    }

    fn elapsed(&self, from: u64, to: u64) -> Seconds {
        ticks_to_seconds(to.saturating_sub(from), self.ticks.ticks_per_second())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::MockTickSource;

    #[test]
    fn starts_at_zero_without_checkpoint() {
        let ticks = MockTickSource::new(5_000);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

        assert_eq!(clock.timestamp(), 0.0);
        assert!(!clock.resumed());

        ticks.advance_ms(1_000);
        assert_eq!(clock.timestamp(), 1.0);
    }

    #[test]
    fn resumes_from_checkpoint() {
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::with_raw("3612.45"));

        assert!(clock.resumed());
        assert_eq!(clock.offset(), 3612.45);
        assert_eq!(clock.timestamp(), 3612.45);

        ticks.advance_ms(2_500);
        assert!((clock.timestamp() - 3614.95).abs() < 1e-9);
    }

    #[test]
    fn corrupt_checkpoint_means_zero() {
        for raw in ["", "garbage", "-12.00", "NaN", "inf"] {
            let ticks = MockTickSource::new(0);
            let mut clock = PersistentClock::new(&ticks, MemoryStore::with_raw(raw));
            assert_eq!(clock.timestamp(), 0.0, "record {:?}", raw);
            assert!(!clock.resumed());
        }
    }

    #[test]
    fn counter_restart_keeps_time_moving_forward() {
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

        ticks.advance_ms(10_000);
        assert_eq!(clock.timestamp(), 10.0);

        // Counter restarts and has counted 200 ms by the next read
        ticks.set(200);
        let after = clock.timestamp();
        assert!((after - 10.2).abs() < 1e-9);
        assert_eq!(clock.restarts_detected(), 1);

        ticks.advance_ms(800);
        assert!((clock.timestamp() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn detector_classifies_readings() {
        let mut detector = TickRestartDetector::new(100, 10);
        assert_eq!(detector.observe(100), TickObservation::Continuous);
        assert_eq!(detector.observe(150), TickObservation::Continuous);
        assert_eq!(detector.observe(3), TickObservation::Restarted { last_tick: 150 });
        assert_eq!(detector.last_tick(), 3);

        assert_eq!(detector.observe(500), TickObservation::Continuous);
        assert_eq!(detector.observe(480), TickObservation::SteppedBack { last_tick: 500 });
        assert_eq!(detector.observe(10), TickObservation::Restarted { last_tick: 480 });
    }

    #[test]
    fn backwards_step_far_from_zero_adds_no_time() {
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

        ticks.set(10_000_000);
        assert_eq!(clock.timestamp(), 10_000.0);

        // One second backwards, nowhere near a restart
        ticks.set(9_999_000);
        assert_eq!(clock.timestamp(), 10_000.0);
        assert_eq!(clock.restarts_detected(), 1);

        ticks.advance_ms(1_000);
        assert_eq!(clock.timestamp(), 10_001.0);
    }

    #[test]
    fn restart_window_scales_with_frequency() {
        let ticks = MockTickSource::with_frequency(0, 32_768);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

        ticks.set(32_768 * 100);
        assert_eq!(clock.timestamp(), 100.0);

        // Five seconds into a restarted counter: inside the window
        ticks.set(32_768 * 5);
        assert_eq!(clock.timestamp(), 105.0);

        // Back to 50 s worth of ticks: outside the window
        ticks.set(32_768 * 50);
        let before = clock.timestamp();
        ticks.set(32_768 * 40);
        assert_eq!(clock.timestamp(), before);
    }

    #[test]
    fn failed_checkpoint_is_swallowed() {
        let ticks = MockTickSource::new(0);
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut clock = PersistentClock::new(&ticks, store);

        ticks.advance_ms(4_000);
        assert_eq!(clock.checkpoint(), 4.0);
        assert_eq!(clock.last_checkpoint(), None);
        assert_eq!(clock.timestamp(), 4.0);
    }

    #[test]
    fn checkpoint_writes_current_time() {
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

        ticks.advance_ms(61_234);
        clock.checkpoint();

        assert_eq!(clock.last_checkpoint(), Some(61.234));
        assert_eq!(clock.store().raw(), Some("61.23"));
    }

    #[test]
    fn reset_clears_offset_and_store() {
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, MemoryStore::with_raw("500.00"));
        ticks.advance_ms(3_000);
        assert_eq!(clock.timestamp(), 503.0);

        clock.reset();
        assert_eq!(clock.timestamp(), 0.0);
        assert_eq!(clock.store().raw(), None);

        ticks.advance_ms(1_000);
        assert_eq!(clock.timestamp(), 1.0);
    }

    #[test]
    fn reset_survives_store_failure() {
        let ticks = MockTickSource::new(0);
        let mut store = MemoryStore::with_raw("500.00");
        store.set_fail_writes(true);
        let mut clock = PersistentClock::new(&ticks, store);
        ticks.advance_ms(2_000);
        assert_eq!(clock.timestamp(), 502.0);

        clock.reset();
        assert_eq!(clock.offset(), 0.0);
        assert_eq!(clock.timestamp(), 0.0);
        assert!(!clock.resumed());
        // Old record still on the store
        assert_eq!(clock.store().raw(), Some("500.00"));

        ticks.advance_ms(1_500);
        assert_eq!(clock.timestamp(), 1.5);
    }
}
