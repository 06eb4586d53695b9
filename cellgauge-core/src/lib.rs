//! Battery state-of-charge estimation for single-cell embedded devices
//!
//! Tracks the charge left in a Li-ion cell by coulomb counting, pulls the
//! estimate towards the open-circuit-voltage curve whenever the cell is at
//! rest, and keeps a logical elapsed-time clock that keeps counting across
//! unplanned restarts.
//!
//! Key constraints:
//! - Runs unattended: every failure path degrades to a fallback value
//! - No heap allocation in the core
//! - `no_std` capable (disable the `std` feature)
//!
//! ```no_run
//! use cellgauge_core::{BatteryGauge, GaugeConfig, PersistentClock};
//! use cellgauge_core::storage::FileStore;
//! use cellgauge_core::time::SystemTicks;
//!
//! let mut clock = PersistentClock::new(SystemTicks::new(), FileStore::default());
//! let mut gauge = BatteryGauge::li_ion_1s(GaugeConfig::default()).unwrap();
//!
//! // One sample: voltage and current come from the sensor drivers
//! let now = clock.timestamp();
//! let soc = gauge.update(3.82, 250.0, now);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod clock;
pub mod constants;
pub mod errors;
pub mod gauge;
pub mod monitor;
pub mod ocv;
pub mod sensing;
pub mod storage;
pub mod time;
pub mod traits;

// Public API
pub use clock::PersistentClock;
pub use errors::{ConfigError, StorageError};
pub use gauge::{BatteryGauge, EstimateSource, GaugeConfig, SocEstimate};
pub use monitor::{BatteryMonitor, CheckpointPolicy, SocSample};
pub use ocv::{Breakpoint, OcvCurve};
pub use time::Seconds;
pub use traits::{CheckpointStore, TickSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
