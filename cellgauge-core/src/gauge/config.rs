//! Estimator configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::battery::{
    ANCHOR_MARGIN_V, DEFAULT_BLEND_ALPHA, DEFAULT_CAPACITY_MAH, DEFAULT_EMPTY_VOLTAGE_V,
    DEFAULT_FULL_VOLTAGE_V, DEFAULT_REST_C_RATE,
};
use crate::constants::time::DEFAULT_MAX_PLAUSIBLE_DT_S;
use crate::errors::{ConfigError, ConfigResult};
use crate::time::Seconds;

/// Parameters fixed at estimator construction
///
/// Fields are public so a deployment can load them from a config file;
/// [`GaugeConfig::validate`] runs again when the gauge is built.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaugeConfig {
    /// Nominal capacity (mAh)
    pub capacity_mah: f64,

    /// Voltage at or near which the cell is full (V)
    pub full_voltage: f64,

    /// Voltage at or near which the cell is empty (V)
    pub empty_voltage: f64,

    /// Below this |current| the cell counts as rested (mA)
    pub rest_current_ma: f64,

    /// How strongly a rested OCV reading pulls the estimate, in [0, 1]
    pub blend_alpha: f64,

    /// Largest sample gap integrated across (seconds)
    ///
    /// Longer gaps, including a paused debugger, discard the coulomb-counted
    /// trajectory and reseed from OCV.
    pub max_plausible_dt: Seconds,

    /// Window around the full/empty thresholds that anchors the estimate (V)
    pub anchor_margin: f64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::for_capacity(DEFAULT_CAPACITY_MAH)
    }
}

impl GaugeConfig {
    /// Defaults for a pack of `capacity_mah`, rest threshold at C/50
    pub fn for_capacity(capacity_mah: f64) -> Self {
        Self {
            capacity_mah,
            full_voltage: DEFAULT_FULL_VOLTAGE_V,
            empty_voltage: DEFAULT_EMPTY_VOLTAGE_V,
            rest_current_ma: DEFAULT_REST_C_RATE * capacity_mah,
            blend_alpha: DEFAULT_BLEND_ALPHA,
            max_plausible_dt: DEFAULT_MAX_PLAUSIBLE_DT_S,
            anchor_margin: ANCHOR_MARGIN_V,
        }
    }

    /// Set capacity, leaving the rest threshold alone
    pub fn with_capacity(mut self, capacity_mah: f64) -> Self {
        self.capacity_mah = capacity_mah;
        self
    }

    /// Set full and empty thresholds
    pub fn with_thresholds(mut self, empty_voltage: f64, full_voltage: f64) -> Self {
        self.empty_voltage = empty_voltage;
        self.full_voltage = full_voltage;
        self
    }

    /// Set the rest threshold in mA
    pub fn with_rest_current(mut self, rest_current_ma: f64) -> Self {
        self.rest_current_ma = rest_current_ma;
        self
    }

    /// Set the rest threshold as a C-rate of the current capacity
    pub fn with_rest_c_rate(mut self, c_rate: f64) -> Self {
        self.rest_current_ma = c_rate * self.capacity_mah;
        self
    }

    /// Set the OCV blend factor
    pub fn with_blend_alpha(mut self, blend_alpha: f64) -> Self {
        self.blend_alpha = blend_alpha;
        self
    }

    /// Set the plausibility bound on sample gaps
    pub fn with_max_plausible_dt(mut self, max_plausible_dt: Seconds) -> Self {
        self.max_plausible_dt = max_plausible_dt;
        self
    }

    /// Set the anchoring window
    pub fn with_anchor_margin(mut self, anchor_margin: f64) -> Self {
        self.anchor_margin = anchor_margin;
        self
    }

    /// Check every parameter can produce a sane estimate
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.capacity_mah.is_finite() || self.capacity_mah <= 0.0 {
            return Err(ConfigError::InvalidCapacity { capacity_mah: self.capacity_mah });
        }

        if !self.empty_voltage.is_finite()
            || !self.full_voltage.is_finite()
            || self.full_voltage <= self.empty_voltage
        {
            return Err(ConfigError::InvalidThresholds {
                empty: self.empty_voltage,
                full: self.full_voltage,
            });
        }

        if !(0.0..=1.0).contains(&self.blend_alpha) {
            return Err(ConfigError::InvalidBlend { alpha: self.blend_alpha });
        }

        if !self.rest_current_ma.is_finite() || self.rest_current_ma < 0.0 {
            return Err(ConfigError::InvalidParameter { name: "rest_current_ma" });
        }

        if !self.max_plausible_dt.is_finite() || self.max_plausible_dt <= 0.0 {
            return Err(ConfigError::InvalidParameter { name: "max_plausible_dt" });
        }

        if !self.anchor_margin.is_finite() || self.anchor_margin < 0.0 {
            return Err(ConfigError::InvalidParameter { name: "anchor_margin" });
        }

        Ok(())
    }
}
