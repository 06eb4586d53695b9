//! Clock checkpoints across simulated restarts

mod common;

use cellgauge_core::{storage::MemoryStore, time::MockTickSource, EstimateSource, PersistentClock};
use common::memory_monitor;

#[test]
fn fresh_clock_counts_from_zero() {
    let ticks = MockTickSource::new(42_000);
    let mut clock = PersistentClock::new(&ticks, MemoryStore::new());

    assert!(clock.timestamp().abs() < 1e-9);
    ticks.advance_ms(1_000);
    assert!((clock.timestamp() - 1.0).abs() < 1e-9);
}

#[test]
fn restart_resumes_from_memory_checkpoint() {
    let ticks = MockTickSource::new(0);
    let mut store = MemoryStore::new();

    {
        let mut clock = PersistentClock::new(&ticks, &mut store);
        ticks.advance_ms(3_612_450);
        assert_eq!(clock.checkpoint(), 3612.45);
    }

    // Power cycle: counter back at zero, some boot time passes
    ticks.set(0);
    let mut clock = PersistentClock::new(&ticks, &mut store);
    assert!(clock.resumed());
    ticks.advance_ms(1_500);
    assert!((clock.timestamp() - 3613.95).abs() < 1e-9);
}

#[test]
fn time_after_last_checkpoint_is_lost() {
    let ticks = MockTickSource::new(0);
    let mut store = MemoryStore::new();

    {
        let mut clock = PersistentClock::new(&ticks, &mut store);
        ticks.advance_ms(100_000);
        clock.checkpoint();
        ticks.advance_ms(40_000);
        assert_eq!(clock.timestamp(), 140.0);
    }

    ticks.set(0);
    let mut clock = PersistentClock::new(&ticks, &mut store);
    assert_eq!(clock.timestamp(), 100.0);
}

#[cfg(feature = "std")]
mod file_store {
    use super::*;
    use cellgauge_core::{storage::FileStore, CheckpointStore};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last_timestamp.txt");
        let ticks = MockTickSource::new(0);

        {
            let mut clock = PersistentClock::new(&ticks, FileStore::new(&path));
            ticks.advance_ms(754_321);
            clock.checkpoint();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "754.32");

        ticks.set(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(&path));
        assert_eq!(clock.timestamp(), 754.32);
    }

    #[test]
    fn missing_file_starts_at_zero() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("absent.txt"));
        assert_eq!(store.load().unwrap(), None);

        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, store);
        assert_eq!(clock.timestamp(), 0.0);
        assert!(!clock.resumed());
    }

    #[test]
    fn corrupt_file_starts_at_zero() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "12x4.5").unwrap();
        file.flush().unwrap();

        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(file.path()));
        assert_eq!(clock.timestamp(), 0.0);
    }

    #[test]
    fn binary_garbage_starts_at_zero() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x81]).unwrap();
        file.flush().unwrap();

        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(file.path()));
        assert_eq!(clock.timestamp(), 0.0);
    }

    #[test]
    fn trailing_newline_is_tolerated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  86400.50  ").unwrap();
        file.flush().unwrap();

        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(file.path()));
        assert_eq!(clock.timestamp(), 86400.5);
    }

    #[test]
    fn unwritable_location_is_swallowed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("last_timestamp.txt");
        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(path));

        ticks.advance_ms(5_000);
        assert_eq!(clock.checkpoint(), 5.0);
        assert_eq!(clock.last_checkpoint(), None);
        assert_eq!(clock.timestamp(), 5.0);
    }

    #[test]
    fn reset_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last_timestamp.txt");
        std::fs::write(&path, "300.00").unwrap();

        let ticks = MockTickSource::new(0);
        let mut clock = PersistentClock::new(&ticks, FileStore::new(&path));
        assert_eq!(clock.timestamp(), 300.0);

        clock.reset();
        assert!(!path.exists());
        assert_eq!(clock.timestamp(), 0.0);
    }
}

#[test]
fn monitor_survives_power_cycle() {
    let ticks = MockTickSource::new(0);

    let store = {
        let mut monitor = memory_monitor(&ticks, MemoryStore::new(), 10);
        for _ in 0..25 {
            monitor.sample(3.60, 1_200.0);
            ticks.advance_ms(1_000);
        }
        // Checkpoints at samples 10 and 20
        assert_eq!(monitor.clock().store().writes(), 2);
        assert_eq!(monitor.clock().last_checkpoint(), Some(19.0));

        let (clock, _gauge) = monitor.into_parts();
        let (_, store) = clock.into_parts();
        store
    };

    // Unplanned reset: the 5 s since the last checkpoint are gone
    ticks.set(0);
    let mut monitor = memory_monitor(&ticks, store, 10);
    assert!(monitor.clock().resumed());

    let sample = monitor.sample(3.58, 1_200.0);
    assert_eq!(sample.timestamp, 19.0);
    assert_eq!(sample.source, EstimateSource::Seeded);
}

#[test]
fn counter_restart_does_not_reseed_gauge() {
    // Absorbed by the clock: the gauge sees continuous time
    let ticks = MockTickSource::new(0);
    let mut monitor = memory_monitor(&ticks, MemoryStore::new(), 0);

    monitor.sample(3.60, 1_200.0);
    ticks.advance_ms(4_000);
    monitor.sample(3.60, 1_200.0);

    ticks.set(1_000);
    let sample = monitor.sample(3.60, 1_200.0);
    assert_eq!(sample.timestamp, 5.0);
    assert_eq!(sample.source, EstimateSource::CoulombCounted);
    assert_eq!(monitor.clock().restarts_detected(), 1);
    assert_eq!(monitor.gauge().time_jumps(), 0);
}
