//! Time-Related Constants
//!
//! Conversion factors plus the defaults for time plausibility and
//! checkpoint cadence.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Seconds per hour, as used for mA·s → mAh.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ===== PLAUSIBILITY =====

/// Largest gap between samples the estimator integrates across (seconds).
///
/// The sampling loop runs at about 1 Hz; anything above 10 s is treated as a
/// restart or a long pause. A debugger breakpoint trips this too, so the
/// bound is a config field rather than hardcoded.
pub const DEFAULT_MAX_PLAUSIBLE_DT_S: f64 = 10.0;

/// A counter read back at or below this many seconds of ticks after going
/// backwards has restarted from zero.
///
/// Same bound as the sampling gap: the clock is read at least this often.
/// A backwards step landing higher up is a counter glitch, not a restart.
pub const TICK_RESTART_WINDOW_S: u64 = 10;

// ===== CHECKPOINTS =====

/// Samples between clock checkpoints.
///
/// At 1 Hz this loses at most ~100 s of logical time on a power cut, while
/// keeping flash writes to one every couple of minutes.
pub const DEFAULT_CHECKPOINT_EVERY_SAMPLES: u32 = 100;

/// Decimal places written to the checkpoint record.
pub const CHECKPOINT_DECIMALS: usize = 2;

/// Default checkpoint file name for the file-backed store.
pub const CHECKPOINT_FILE_NAME: &str = "last_timestamp.txt";
