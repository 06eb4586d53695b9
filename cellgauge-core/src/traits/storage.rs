//! Durable checkpoint record abstraction

use crate::errors::StorageResult;
use crate::time::Seconds;

/// Single named record holding one checkpoint value in seconds
///
/// Writing replaces the record wholesale. Implementations must not assume
/// a write is atomic with respect to power loss; a half-written record is
/// reported as [`StorageError::Malformed`](crate::errors::StorageError::Malformed)
/// on the next load.
pub trait CheckpointStore {
    /// Read the stored value
    ///
    /// `Ok(None)` when no record exists.
    fn load(&mut self) -> StorageResult<Option<Seconds>>;

    /// Replace the stored value
    fn save(&mut self, seconds: Seconds) -> StorageResult<()>;

    /// Remove the record
    ///
    /// Clearing an absent record succeeds.
    fn clear(&mut self) -> StorageResult<()>;
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for &mut S {
    fn load(&mut self) -> StorageResult<Option<Seconds>> {
        (**self).load()
    }

    fn save(&mut self, seconds: Seconds) -> StorageResult<()> {
        (**self).save(seconds)
    }

    fn clear(&mut self) -> StorageResult<()> {
        (**self).clear()
    }
}
