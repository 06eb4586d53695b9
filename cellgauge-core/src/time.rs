//! Time management for edge devices
//!
//! Logical time is kept in floating-point seconds ([`Seconds`]). Hardware
//! time arrives as integer ticks through [`TickSource`]:
//! - System clock ticks (when `std` is available)
//! - Mock ticks (for deterministic tests)

use core::cell::Cell;

use crate::constants::time::MS_PER_SECOND;
use crate::traits::TickSource;

/// Logical time in seconds
pub type Seconds = f64;

/// Convert a tick span to seconds
///
/// A zero frequency yields zero rather than infinity.
pub fn ticks_to_seconds(ticks: u64, ticks_per_second: u64) -> Seconds {
    if ticks_per_second == 0 {
        return 0.0;
    }
    ticks as f64 / ticks_per_second as f64
}

/// Millisecond tick source backed by `std::time::Instant`
///
/// Starts at 0 on construction, like a hardware counter after boot.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTicks {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTicks {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TickSource for SystemTicks {
    fn now_ticks(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn ticks_per_second(&self) -> u64 {
        MS_PER_SECOND
    }
}

/// Controllable tick source for testing
///
/// Uses interior mutability so a test can keep advancing the counter while a
/// clock holds a shared reference to it.
#[derive(Debug, Clone)]
pub struct MockTickSource {
    ticks: Cell<u64>,
    ticks_per_second: u64,
}

impl MockTickSource {
    /// Millisecond counter starting at `ticks`
    pub fn new(ticks: u64) -> Self {
        Self::with_frequency(ticks, MS_PER_SECOND)
    }

    /// Counter with an explicit frequency
    pub fn with_frequency(ticks: u64, ticks_per_second: u64) -> Self {
        Self {
            ticks: Cell::new(ticks),
            ticks_per_second,
        }
    }

    /// Jump to an absolute counter value (a restart is `set(0)`)
    pub fn set(&self, ticks: u64) {
        self.ticks.set(ticks);
    }

    /// Advance by raw ticks
    pub fn advance(&self, ticks: u64) {
        self.ticks.set(self.ticks.get().saturating_add(ticks));
    }

    /// Advance by milliseconds, whatever the frequency
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms.saturating_mul(self.ticks_per_second) / MS_PER_SECOND);
    }
}

impl TickSource for MockTickSource {
    fn now_ticks(&self) -> u64 {
        self.ticks.get()
    }

    fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }
}
