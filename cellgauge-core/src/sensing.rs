//! Sensor reading conversions
//!
//! The bus drivers hand over raw numbers; these helpers turn them into the
//! battery voltage and battery-side current the estimator expects.
//!
//! - [`VoltageDivider`]: cell voltage from a raw ADC count behind a
//!   resistor divider
//! - [`BoostConverter`]: battery current inferred from the load side of a
//!   boost stage, where the shunt sits

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::battery::{
    ADC_FULL_SCALE, ADC_VREF_V, BOOST_EFFICIENCY, DIVIDER_CAL_FACTOR, DIVIDER_R_BOTTOM_OHMS,
    DIVIDER_R_TOP_OHMS, MIN_CONNECTED_BATTERY_V,
};

/// Resistor divider between the cell and an ADC input
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoltageDivider {
    /// ADC reference voltage (V)
    pub vref: f64,
    /// Resistor from the cell to the tap (Ω)
    pub r_top: f64,
    /// Resistor from the tap to ground (Ω)
    pub r_bottom: f64,
    /// Multiplicative correction measured on the bench
    pub cal_factor: f64,
    /// Raw reading at `vref`
    pub full_scale: u16,
}

impl Default for VoltageDivider {
    fn default() -> Self {
        Self {
            vref: ADC_VREF_V,
            r_top: DIVIDER_R_TOP_OHMS,
            r_bottom: DIVIDER_R_BOTTOM_OHMS,
            cal_factor: DIVIDER_CAL_FACTOR,
            full_scale: ADC_FULL_SCALE,
        }
    }
}

impl VoltageDivider {
    /// Divider with custom resistors and the default ADC
    pub fn new(r_top: f64, r_bottom: f64) -> Self {
        Self {
            r_top,
            r_bottom,
            ..Self::default()
        }
    }

    /// Set the calibration factor
    pub fn with_cal_factor(mut self, cal_factor: f64) -> Self {
        self.cal_factor = cal_factor;
        self
    }

    /// Ratio of cell voltage to tap voltage
    pub fn gain(&self) -> f64 {
        (self.r_top + self.r_bottom) / self.r_bottom
    }

    /// Cell voltage (V) for a raw ADC reading
    pub fn battery_voltage(&self, raw: u16) -> f64 {
        if self.full_scale == 0 {
            return 0.0;
        }
        let tap = self.vref * f64::from(raw) / f64::from(self.full_scale);
        tap * self.gain() * self.cal_factor
    }
}

/// Boost converter between the cell and the measured load
///
/// Power in equals power out over efficiency, so the battery current follows
/// from the load-side voltage and current.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoostConverter {
    /// Conversion efficiency in (0, 1]
    pub efficiency: f64,
    /// Lowest battery voltage treated as a connected cell (V)
    pub min_battery_voltage: f64,
}

impl Default for BoostConverter {
    fn default() -> Self {
        Self {
            efficiency: BOOST_EFFICIENCY,
            min_battery_voltage: MIN_CONNECTED_BATTERY_V,
        }
    }
}

impl BoostConverter {
    /// Converter with the given efficiency
    pub fn new(efficiency: f64) -> Self {
        Self {
            efficiency,
            ..Self::default()
        }
    }

    /// Battery-side current (mA), positive when discharging
    ///
    /// Returns 0 when the battery voltage is below the connected threshold
    /// or not a number; dividing by a floating input would produce nonsense.
    pub fn battery_current_ma(&self, load_voltage: f64, load_current_ma: f64, battery_voltage: f64) -> f64 {
        if !battery_voltage.is_finite() || battery_voltage < self.min_battery_voltage {
            return 0.0;
        }
        let denominator = self.efficiency * battery_voltage;
        if denominator <= 0.0 {
            return 0.0;
        }
        load_voltage * load_current_ma / denominator
    }
}
