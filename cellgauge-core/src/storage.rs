//! Checkpoint record storage
//!
//! The record is a single decimal number of seconds with two decimal places,
//! e.g. `3612.45`. Surrounding whitespace is ignored on read.
//!
//! ## Stores
//!
//! 1. **MemoryStore**: RAM-backed record, no_std. Survives a soft reset when
//!    placed in a non-initialised RAM section; also the test double.
//! 2. **FileStore**: one file on a filesystem (`std` only), e.g. the
//!    MicroSD card or internal flash FS next to the data logs.
//!
//! ## Failure Model
//!
//! Writes are not atomic with respect to power loss. A torn write leaves a
//! truncated or empty record, which decodes as
//! [`StorageError::Malformed`] and is then treated as offset 0 by the clock.

use core::fmt::Write;

use heapless::String;

use crate::constants::time::CHECKPOINT_DECIMALS;
use crate::errors::{StorageError, StorageResult};
use crate::time::Seconds;
use crate::traits::CheckpointStore;

/// Longest record a store keeps
pub const MAX_RECORD_LEN: usize = 32;

/// Encoded checkpoint record
pub type Record = String<MAX_RECORD_LEN>;

/// Format seconds as a checkpoint record
///
/// Negative, non-finite, or absurdly large values are rejected as
/// malformed rather than written.
pub fn encode_checkpoint(seconds: Seconds) -> StorageResult<Record> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(StorageError::Malformed);
    }

    let mut record = Record::new();
    write!(record, "{:.*}", CHECKPOINT_DECIMALS, seconds).map_err(|_| StorageError::Malformed)?;
    Ok(record)
}

/// Parse a checkpoint record
pub fn decode_checkpoint(record: &str) -> StorageResult<Seconds> {
    let seconds: Seconds = record
        .trim()
        .parse()
        .map_err(|_| StorageError::Malformed)?;

    // "inf" and "NaN" parse fine as f64
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(StorageError::Malformed);
    }

    Ok(seconds)
}

/// RAM-backed checkpoint store
///
/// ## Example
///
/// ```rust
/// use cellgauge_core::storage::MemoryStore;
/// use cellgauge_core::traits::CheckpointStore;
///
/// let mut store = MemoryStore::new();
/// store.save(3612.449).unwrap();
/// assert_eq!(store.raw(), Some("3612.45"));
/// assert_eq!(store.load().unwrap(), Some(3612.45));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<Record>,
    fail_writes: bool,
    writes: u32,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with raw record text, valid or not
    ///
    /// Text longer than [`MAX_RECORD_LEN`] leaves an empty record, the same
    /// thing a torn write produces.
    pub fn with_raw(raw: &str) -> Self {
        let mut record = Record::new();
        let _ = record.push_str(raw);
        Self {
            record: Some(record),
            ..Self::default()
        }
    }

    /// Make every `save` and `clear` fail, like a full or missing card
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw record text, if any
    pub fn raw(&self) -> Option<&str> {
        self.record.as_deref()
    }

    /// Number of successful writes
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl CheckpointStore for MemoryStore {
    fn load(&mut self) -> StorageResult<Option<Seconds>> {
        self.record
            .as_deref()
            .map(decode_checkpoint)
            .transpose()
    }

    fn save(&mut self, seconds: Seconds) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable { reason: "writes disabled" });
        }
        self.record = Some(encode_checkpoint(seconds)?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable { reason: "writes disabled" });
        }
        self.record = None;
        Ok(())
    }
}

/// Checkpoint kept in a single file
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl FileStore {
    /// Store at `path`
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing this store
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(feature = "std")]
impl Default for FileStore {
    /// `last_timestamp.txt` in the working directory
    fn default() -> Self {
        Self::new(crate::constants::time::CHECKPOINT_FILE_NAME)
    }
}

#[cfg(feature = "std")]
impl CheckpointStore for FileStore {
    fn load(&mut self) -> StorageResult<Option<Seconds>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => decode_checkpoint(&contents).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            // Binary garbage from a torn write
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => Err(StorageError::Malformed),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, seconds: Seconds) -> StorageResult<()> {
        let record = encode_checkpoint(seconds)?;
        std::fs::write(&self.path, record.as_bytes())?;
        Ok(())
    }

    fn clear(&mut self) -> StorageResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
