//! Battery Cell Parameters
//!
//! Defaults for a single Li-ion cell (1S) feeding a boost converter. All
//! voltages are cell terminal voltages in volts.

// ===== CELL =====

/// Nominal pack capacity (mAh).
///
/// Matches the 15 Ah pack the gauge was tuned on.
pub const DEFAULT_CAPACITY_MAH: f64 = 15_000.0;

/// Voltage treated as fully charged (V).
///
/// Resting voltage a few hours after a CC/CV charge terminates, which is
/// well below the 4.2 V charge limit.
pub const DEFAULT_FULL_VOLTAGE_V: f64 = 3.75;

/// Voltage treated as empty (V).
///
/// Typical protection-circuit cutoff for Li-ion cells.
pub const DEFAULT_EMPTY_VOLTAGE_V: f64 = 2.90;

// ===== ESTIMATOR =====

/// Rest-current threshold as a fraction of capacity (C-rate).
///
/// Below C/50 the terminal voltage is close enough to OCV to trust.
pub const DEFAULT_REST_C_RATE: f64 = 0.02;

/// Fraction of the OCV estimate mixed in per rested sample.
///
/// Small on purpose: OCV pulls slowly so a single noisy reading cannot
/// move the estimate.
pub const DEFAULT_BLEND_ALPHA: f64 = 0.05;

/// Window around the full/empty thresholds where the estimate is anchored (V).
pub const ANCHOR_MARGIN_V: f64 = 0.02;

/// SoC floor applied near the full threshold (%).
pub const ANCHOR_FULL_FLOOR_PCT: f64 = 99.0;

/// SoC ceiling applied near the empty threshold (%).
pub const ANCHOR_EMPTY_CEILING_PCT: f64 = 1.0;

/// SoC bounds (%).
pub const SOC_MIN_PCT: f64 = 0.0;
/// Upper SoC bound (%).
pub const SOC_MAX_PCT: f64 = 100.0;

// ===== SENSING =====

/// ADC reference voltage (V).
pub const ADC_VREF_V: f64 = 3.30;

/// Full-scale reading of a 16-bit ADC.
pub const ADC_FULL_SCALE: u16 = u16::MAX;

/// Battery divider resistors (Ω).
///
/// 470k/330k keeps a 4.2 V cell under the 3.3 V ADC reference.
pub const DIVIDER_R_TOP_OHMS: f64 = 470_000.0;
/// Lower divider resistor (Ω).
pub const DIVIDER_R_BOTTOM_OHMS: f64 = 330_000.0;

/// Divider calibration factor.
///
/// Source: bench comparison against a multimeter
pub const DIVIDER_CAL_FACTOR: f64 = 1.052;

/// Boost converter efficiency at typical load.
pub const BOOST_EFFICIENCY: f64 = 0.90;

/// Below this the battery is considered disconnected (V).
///
/// An unconnected divider input floats near zero; no real cell sits here.
pub const MIN_CONNECTED_BATTERY_V: f64 = 2.5;
