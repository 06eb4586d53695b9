//! Error Types for Configuration and Checkpoint Storage
//!
//! ## Design Philosophy
//!
//! The gauge runs unattended, so almost nothing here ever reaches the caller:
//!
//! 1. **Configuration errors** are the only errors a caller sees. They are
//!    raised once, at construction, when an OCV table or gauge configuration
//!    cannot produce sensible estimates.
//!
//! 2. **Storage errors** are produced by checkpoint stores and always absorbed
//!    by [`PersistentClock`](crate::clock::PersistentClock). A missing or
//!    corrupt record becomes a zero offset; a failed write is logged and the
//!    next scheduled checkpoint is the retry.
//!
//! Both enums are small and `Copy`: no heap, only `&'static str` for messages.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use cellgauge_core::{ConfigError, GaugeConfig};
//!
//! let config = GaugeConfig::default().with_blend_alpha(1.5);
//! match config.validate() {
//!     Ok(()) => {}
//!     Err(ConfigError::InvalidBlend { alpha }) => {
//!         // Blend factor must stay within [0, 1]
//!         let _ = alpha;
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for checkpoint store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Rejected OCV table or gauge configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Curve needs at least two breakpoints to interpolate
    #[error("OCV curve needs at least 2 breakpoints, got {count}")]
    TooFewPoints {
        /// Number of breakpoints supplied
        count: usize,
    },

    /// Curve exceeds the fixed table capacity
    #[error("OCV curve holds at most {max} breakpoints")]
    TooManyPoints {
        /// Table capacity
        max: usize,
    },

    /// Breakpoint contains NaN or infinity
    #[error("OCV breakpoint {index} is not a finite number")]
    NonFinitePoint {
        /// Position in the supplied table
        index: usize,
    },

    /// Percent outside [0, 100]
    #[error("OCV breakpoint {index} percent outside [0, 100]")]
    PercentOutOfRange {
        /// Position in the supplied table
        index: usize,
    },

    /// Two breakpoints share a voltage
    #[error("OCV voltages must be strictly increasing (breakpoint {index})")]
    DuplicateVoltage {
        /// Position in the sorted table
        index: usize,
    },

    /// Percent drops as voltage rises
    #[error("OCV percent must not decrease with voltage (breakpoint {index})")]
    DecreasingPercent {
        /// Position in the sorted table
        index: usize,
    },

    /// Capacity must be a positive, finite number of mAh
    #[error("Invalid capacity: {capacity_mah} mAh")]
    InvalidCapacity {
        /// Rejected capacity
        capacity_mah: f64,
    },

    /// Full threshold must sit above the empty threshold
    #[error("Invalid voltage thresholds: empty {empty} V, full {full} V")]
    InvalidThresholds {
        /// Empty threshold
        empty: f64,
        /// Full threshold
        full: f64,
    },

    /// Blend factor outside [0, 1]
    #[error("Invalid blend factor {alpha}, expected [0, 1]")]
    InvalidBlend {
        /// Rejected blend factor
        alpha: f64,
    },

    /// Any other parameter that must be finite and non-negative
    #[error("Invalid parameter: {name}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
    },
}

/// Checkpoint store failure, never surfaced past the clock
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StorageError {
    /// Record exists but does not hold a usable number of seconds
    #[error("Checkpoint record is malformed")]
    Malformed,

    /// Store refused the operation
    #[error("Checkpoint store unavailable: {reason}")]
    Unavailable {
        /// Short description of the failure
        reason: &'static str,
    },

    /// Filesystem error
    #[cfg(feature = "std")]
    #[error("Checkpoint I/O error: {0:?}")]
    Io(std::io::ErrorKind),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.kind())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TooFewPoints { count } =>
                defmt::write!(fmt, "OCV curve has {} points, need 2", count),
            Self::TooManyPoints { max } =>
                defmt::write!(fmt, "OCV curve exceeds {} points", max),
            Self::NonFinitePoint { index } =>
                defmt::write!(fmt, "OCV point {} not finite", index),
            Self::PercentOutOfRange { index } =>
                defmt::write!(fmt, "OCV point {} percent out of range", index),
            Self::DuplicateVoltage { index } =>
                defmt::write!(fmt, "OCV point {} duplicates voltage", index),
            Self::DecreasingPercent { index } =>
                defmt::write!(fmt, "OCV point {} decreases percent", index),
            Self::InvalidCapacity { capacity_mah } =>
                defmt::write!(fmt, "Invalid capacity {} mAh", capacity_mah),
            Self::InvalidThresholds { empty, full } =>
                defmt::write!(fmt, "Invalid thresholds {}..{} V", empty, full),
            Self::InvalidBlend { alpha } =>
                defmt::write!(fmt, "Invalid blend {}", alpha),
            Self::InvalidParameter { name } =>
                defmt::write!(fmt, "Invalid parameter {}", name),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Malformed => defmt::write!(fmt, "Malformed checkpoint"),
            Self::Unavailable { reason } =>
                defmt::write!(fmt, "Store unavailable: {}", reason),
            #[cfg(feature = "std")]
            Self::Io(_) => defmt::write!(fmt, "Checkpoint I/O error"),
        }
    }
}
