//! Hardware and Storage Seams
//!
//! The core never touches a timer peripheral or a filesystem directly. Both
//! arrive through the traits in this module, which keeps the clock and the
//! estimator testable with synthetic time and in-memory storage.
//!
//! - [`time`] - monotonic tick counter abstraction
//! - [`storage`] - durable checkpoint record abstraction

pub mod storage;
pub mod time;

pub use storage::CheckpointStore;
pub use time::TickSource;
