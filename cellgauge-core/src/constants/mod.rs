//! Constants for cellgauge
//!
//! Default parameters and conversion factors live here instead of as magic
//! numbers in the estimator and clock.
//!
//! ## Organization
//!
//! - **Battery**: cell thresholds, capacity, blending and anchoring defaults
//! - **Time**: unit conversions, plausibility bound, checkpoint cadence
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include units in the name
//! 3. Note where a value came from when it was measured or looked up

/// Cell thresholds and estimator defaults for a 1S Li-ion pack.
pub mod battery;

/// Time unit conversions and clock-related defaults.
pub mod time;

pub use battery::{
    DEFAULT_CAPACITY_MAH, DEFAULT_FULL_VOLTAGE_V, DEFAULT_EMPTY_VOLTAGE_V,
    DEFAULT_REST_C_RATE, DEFAULT_BLEND_ALPHA, ANCHOR_MARGIN_V,
};

pub use time::{
    MS_PER_SECOND, SECONDS_PER_HOUR, DEFAULT_MAX_PLAUSIBLE_DT_S,
    DEFAULT_CHECKPOINT_EVERY_SAMPLES, TICK_RESTART_WINDOW_S,
};
