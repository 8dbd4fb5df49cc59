use crate::{
    Anomaly, EPOCH, Error, FloeId, LocalRegistry, MonotonicClock, NullSink, ReportSink,
    SharedRegistry, TimeSource,
};
use core::cell::Cell;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::scope;

fn epoch_ms() -> u64 {
    EPOCH.as_millis() as u64
}

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// A clock whose reading is advanced (or rewound) by hand.
struct SteppedTime {
    millis: Cell<u64>,
}

impl SteppedTime {
    fn at(millis: u64) -> Self {
        Self {
            millis: Cell::new(millis),
        }
    }

    fn set(&self, millis: u64) {
        self.millis.set(millis);
    }
}

impl TimeSource for SteppedTime {
    fn current_millis(&self) -> u64 {
        self.millis.get()
    }
}

#[derive(Default)]
struct RecordingSink {
    anomalies: Mutex<Vec<Anomaly>>,
}

impl ReportSink for RecordingSink {
    fn report(&self, anomaly: Anomaly) {
        self.anomalies.lock().unwrap().push(anomaly);
    }
}

#[test]
fn shared_sequence_increments_within_same_tick() {
    let time = MockTime {
        millis: epoch_ms() + 42,
    };
    let registry = SharedRegistry::new(1, time, NullSink);

    let id1 = registry.next_id(1).unwrap();
    let id2 = registry.next_id(1).unwrap();
    let id3 = registry.next_id(1).unwrap();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn shared_rollover_resets_sequence() {
    let time = SteppedTime::at(epoch_ms() + 42);
    let registry = SharedRegistry::new(1, &time, NullSink);

    registry.next_id(1).unwrap();
    let same_tick = registry.next_id(1).unwrap();
    assert_eq!(same_tick.sequence(), 1);

    time.set(epoch_ms() + 43);
    let next_tick = registry.next_id(1).unwrap();
    assert_eq!(next_tick.timestamp(), 43);
    assert_eq!(next_tick.sequence(), 0);
}

#[test]
fn shared_kinds_use_independent_records() {
    let time = MockTime {
        millis: epoch_ms() + 42,
    };
    let registry = SharedRegistry::new(2, time, NullSink);

    registry.next_id(1).unwrap();
    let second_of_kind_1 = registry.next_id(1).unwrap();
    let first_of_kind_2 = registry.next_id(2).unwrap();

    assert_eq!(second_of_kind_1.sequence(), 1);
    assert_eq!(first_of_kind_2.sequence(), 0);
}

#[test]
fn shared_rejects_out_of_range_kinds_without_mutation() {
    let time = MockTime {
        millis: epoch_ms() + 42,
    };
    let registry = SharedRegistry::new(2, time, NullSink);
    assert_eq!(registry.kind_count(), 2);

    assert_eq!(
        registry.next_id(0),
        Err(Error::KindOutOfRange {
            kind: 0,
            kind_count: 2,
        })
    );
    assert_eq!(
        registry.next_id(3),
        Err(Error::KindOutOfRange {
            kind: 3,
            kind_count: 2,
        })
    );

    // Every slot still behaves as never-issued.
    for kind in 1..=2 {
        assert_eq!(registry.next_id(kind).unwrap().sequence(), 0);
    }
}

#[test]
fn shared_clock_regression_reports_and_leaves_slot_usable() {
    let sink = RecordingSink::default();
    let time = SteppedTime::at(epoch_ms() + 42);
    let registry = SharedRegistry::new(1, &time, &sink);

    registry.next_id(1).unwrap();

    time.set(epoch_ms() + 41);
    let id = registry.next_id(1).unwrap();
    assert_eq!(id, FloeId::SENTINEL);
    assert_eq!(sink.anomalies.lock().unwrap().len(), 1);

    // Once the clock catches back up the slot resumes from its old state.
    time.set(epoch_ms() + 42);
    let id = registry.next_id(1).unwrap();
    assert_eq!(id.sequence(), 1);
    assert_eq!(sink.anomalies.lock().unwrap().len(), 1);
}

#[test]
fn shared_threaded_ids_are_pairwise_distinct() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 512;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let registry = Arc::new(SharedRegistry::new(1, MonotonicClock::new(), NullSink));
    let seen = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let registry = Arc::clone(&registry);
            let seen = Arc::clone(&seen);

            s.spawn(move || {
                for _ in 0..IDS_PER_THREAD {
                    let id = registry.next_id(1).unwrap();
                    let pair = (id.timestamp(), id.sequence());
                    assert!(seen.lock().unwrap().insert(pair), "duplicate id: {id:?}");
                }
            });
        }
    });

    let final_count = seen.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn local_creates_records_lazily() {
    let time = MockTime {
        millis: epoch_ms() + 42,
    };
    let mut registry = LocalRegistry::new(time, NullSink);
    assert_eq!(registry.kind_count(), 0);

    registry.next_id(7);
    assert_eq!(registry.kind_count(), 1);
    registry.next_id(7);
    assert_eq!(registry.kind_count(), 1);

    registry.next_id(9000);
    assert_eq!(registry.kind_count(), 2);
}

#[test]
fn local_keys_use_independent_records() {
    let time = MockTime {
        millis: epoch_ms() + 42,
    };
    let mut registry = LocalRegistry::new(time, NullSink);

    registry.next_id(1);
    let second_of_key_1 = registry.next_id(1);
    let first_of_key_2 = registry.next_id(2);

    assert_eq!(second_of_key_1.sequence(), 1);
    assert_eq!(second_of_key_1.timestamp(), 42);
    assert_eq!(first_of_key_2.sequence(), 0);
}

#[test]
fn local_ids_are_distinct_across_ticks() {
    let time = SteppedTime::at(epoch_ms() + 1);
    let mut registry = LocalRegistry::new(&time, NullSink);

    let mut seen = HashSet::new();
    for tick in 1..=4u64 {
        time.set(epoch_ms() + tick);
        for _ in 0..100 {
            let id = registry.next_id(3);
            assert!(seen.insert(id), "duplicate id: {id:?}");
        }
    }
    assert_eq!(seen.len(), 400);
}
