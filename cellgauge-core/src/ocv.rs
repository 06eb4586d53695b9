//! Open-Circuit-Voltage Lookup Curve
//!
//! ## Background
//!
//! A Li-ion cell at rest settles to an open-circuit voltage (OCV) that
//! depends almost only on how much charge is left. Under load the terminal
//! voltage sags by `I × R_internal`, so the curve is only trusted when the
//! current is small.
//!
//! ```text
//!  SoC %
//!  100 ┤                                   ╭──
//!   75 ┤                          ╭───────╯
//!   50 ┤              ╭──────────╯
//!   25 ┤        ╭────╯
//!    0 ┼───────╯
//!      2.9    3.1    3.3    3.5    3.7    3.9  V
//! ```
//!
//! ## Table Design
//!
//! The curve is data, not code: a short list of `(voltage, percent)`
//! breakpoints with linear interpolation in between. A different chemistry
//! or temperature is a different table, loaded through serde or built with
//! [`OcvCurve::new`].
//!
//! Tables hold at most [`MAX_BREAKPOINTS`] entries in a `heapless::Vec`, so
//! a curve lives on the stack and lookups never allocate.
//!
//! ### Clamping
//!
//! Voltages outside the table map to the boundary breakpoint's percent. The
//! lookup is total: it never fails, and NaN maps to the lowest percent.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Capacity of an OCV table
pub const MAX_BREAKPOINTS: usize = 32;

/// One point on the OCV curve
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Breakpoint {
    /// Open-circuit voltage (V)
    pub voltage: f64,
    /// State of charge at that voltage (%)
    pub percent: f64,
}

impl Breakpoint {
    /// Create a breakpoint
    pub const fn new(voltage: f64, percent: f64) -> Self {
        Self { voltage, percent }
    }
}

/// Approximate Li-ion 1S curve at 25°C, highest voltage first
///
/// Flat between 3.5 V and 3.7 V, steep near both ends.
pub const LI_ION_1S_25C: [Breakpoint; 16] = [
    Breakpoint::new(4.00, 100.0),
    Breakpoint::new(3.95, 95.0),
    Breakpoint::new(3.90, 90.0),
    Breakpoint::new(3.85, 85.0),
    Breakpoint::new(3.80, 80.0),
    Breakpoint::new(3.75, 75.0),
    Breakpoint::new(3.70, 70.0),
    Breakpoint::new(3.60, 65.0),
    Breakpoint::new(3.50, 60.0),
    Breakpoint::new(3.40, 50.0),
    Breakpoint::new(3.30, 40.0),
    Breakpoint::new(3.20, 30.0),
    Breakpoint::new(3.10, 20.0),
    Breakpoint::new(3.05, 10.0),
    Breakpoint::new(2.95, 5.0),
    Breakpoint::new(2.90, 0.0),
];

const _: () = assert!(LI_ION_1S_25C.len() <= MAX_BREAKPOINTS);

/// Voltage to SoC lookup table
///
/// Breakpoints are kept sorted by ascending voltage with strictly increasing
/// voltage and non-decreasing percent. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CurveTable"))]
pub struct OcvCurve {
    points: Vec<Breakpoint, MAX_BREAKPOINTS>,
}

impl OcvCurve {
    /// Build a curve from breakpoints in any order
    ///
    /// Rejects tables with fewer than two points, non-finite values, percent
    /// outside [0, 100], duplicate voltages, or percent falling as voltage
    /// rises.
    pub fn new(breakpoints: &[Breakpoint]) -> ConfigResult<Self> {
        if breakpoints.len() < 2 {
            return Err(ConfigError::TooFewPoints { count: breakpoints.len() });
        }

        if let Some(index) = breakpoints
            .iter()
            .position(|p| !p.voltage.is_finite() || !p.percent.is_finite())
        {
            return Err(ConfigError::NonFinitePoint { index });
        }

        if let Some(index) = breakpoints
            .iter()
            .position(|p| !(0.0..=100.0).contains(&p.percent))
        {
            return Err(ConfigError::PercentOutOfRange { index });
        }

        let mut points: Vec<Breakpoint, MAX_BREAKPOINTS> = Vec::from_slice(breakpoints)
            .map_err(|_| ConfigError::TooManyPoints { max: MAX_BREAKPOINTS })?;
        points.sort_unstable_by(|a, b| a.voltage.total_cmp(&b.voltage));

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].voltage <= pair[0].voltage {
                return Err(ConfigError::DuplicateVoltage { index: i + 1 });
            }
            if pair[1].percent < pair[0].percent {
                return Err(ConfigError::DecreasingPercent { index: i + 1 });
            }
        }

        Ok(Self { points })
    }

    /// Built-in Li-ion 1S table ([`LI_ION_1S_25C`])
    pub fn li_ion_1s() -> Self {
        let mut points = Vec::new();
        points.extend(LI_ION_1S_25C.iter().rev().copied());
        Self { points }
    }

    /// Interpolated SoC (%) for a voltage
    ///
    /// Clamps to the boundary percent at or beyond either end of the table.
    pub fn soc_from_voltage(&self, voltage: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        // `!(a > b)` also catches NaN
        if !(voltage > first.voltage) {
            return first.percent;
        }
        if voltage >= last.voltage {
            return last.percent;
        }

        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if voltage == hi.voltage {
                return hi.percent;
            }
            if voltage < hi.voltage {
                let frac = (voltage - lo.voltage) / (hi.voltage - lo.voltage);
                // Rounding must not overshoot the next segment
                return (lo.percent + frac * (hi.percent - lo.percent)).min(hi.percent);
            }
        }

        last.percent
    }

    /// Breakpoints in ascending voltage order
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Lowest voltage in the table
    pub fn min_voltage(&self) -> f64 {
        self.points[0].voltage
    }

    /// Highest voltage in the table
    pub fn max_voltage(&self) -> f64 {
        self.points[self.points.len() - 1].voltage
    }

    /// Percent at the lowest voltage
    pub fn min_percent(&self) -> f64 {
        self.points[0].percent
    }

    /// Percent at the highest voltage
    pub fn max_percent(&self) -> f64 {
        self.points[self.points.len() - 1].percent
    }
}

impl Default for OcvCurve {
    fn default() -> Self {
        Self::li_ion_1s()
    }
}

/// Unvalidated wire form of [`OcvCurve`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct CurveTable {
    points: Vec<Breakpoint, MAX_BREAKPOINTS>,
}

#[cfg(feature = "serde")]
impl TryFrom<CurveTable> for OcvCurve {
    type Error = ConfigError;

    fn try_from(table: CurveTable) -> Result<Self, Self::Error> {
        Self::new(&table.points)
    }
}
