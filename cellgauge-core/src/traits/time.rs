//! Tick Source Abstraction for Embedded Systems
//!
//! [`TickSource`] abstracts the free-running hardware counter the persistent
//! clock measures elapsed time with.
//!
//! ## Common Implementations
//!
//! - `SystemTicks`: `std::time::Instant` based, millisecond ticks
//! - `MockTickSource`: controllable counter for testing
//!
//! On a microcontroller, wrap the timer peripheral (RP2040 `TIMER`, SysTick
//! with an overflow counter, an RTOS tick count).

/// Free-running counter that restarts from zero on power loss or reset
///
/// ## Implementation Requirements
///
/// - `now_ticks()` must not decrease while the device keeps running. A lower
///   value than before is read by the clock as a counter restart.
/// - `ticks_per_second()` must be non-zero and constant.
///
/// ## Example Implementation
///
/// ```rust
/// use cellgauge_core::traits::TickSource;
///
/// struct Rp2040Timer {
///     // ... TIMER peripheral handle
/// }
///
/// impl TickSource for Rp2040Timer {
///     fn now_ticks(&self) -> u64 {
///         // Read TIMELR/TIMEHR
///         0 // placeholder
///     }
///
///     fn ticks_per_second(&self) -> u64 {
///         1_000_000 // 1 MHz timebase
///     }
/// }
/// ```
pub trait TickSource {
    /// Current counter value
    fn now_ticks(&self) -> u64;

    /// Counter frequency in Hz
    fn ticks_per_second(&self) -> u64;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ticks(&self) -> u64 {
        (**self).now_ticks()
    }

    fn ticks_per_second(&self) -> u64 {
        (**self).ticks_per_second()
    }
}
