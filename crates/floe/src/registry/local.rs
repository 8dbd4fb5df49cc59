use std::collections::HashMap;

use crate::{FloeId, Record, ReportSink, TimeSource};

const OP: &str = "next_local_id";

/// A lazily-populated table of generator records owned by a single execution
/// context, with no locking.
///
/// Records are created on first use per key and live as long as the
/// registry. Because generation takes `&mut self`, concurrent access is
/// unrepresentable rather than merely forbidden by convention; wrap the
/// registry in your own synchronization if you need to share it (or use
/// [`SharedRegistry`]).
///
/// Ids are unique only among callers going through the same registry value.
///
/// ## Features
/// - ❌ Not thread-safe (by construction)
/// - ✅ No lock overhead, open-ended key space
///
/// # Example
///
/// ```
/// use floe::{LocalRegistry, MonotonicClock, TracingSink};
///
/// let mut registry = LocalRegistry::new(MonotonicClock::new(), TracingSink);
///
/// let a = registry.next_id(7);
/// let b = registry.next_id(7);
/// assert_ne!(a, b);
/// ```
///
/// [`SharedRegistry`]: crate::SharedRegistry
pub struct LocalRegistry<T, S>
where
    T: TimeSource,
    S: ReportSink,
{
    records: HashMap<usize, Record>,
    time: T,
    sink: S,
}

impl<T, S> LocalRegistry<T, S>
where
    T: TimeSource,
    S: ReportSink,
{
    /// Creates an empty registry; records are allocated on first use per
    /// key.
    pub fn new(time: T, sink: S) -> Self {
        Self {
            records: HashMap::new(),
            time,
            sink,
        }
    }

    /// The number of keys a record has been created for so far.
    pub fn kind_count(&self) -> usize {
        self.records.len()
    }

    /// Issues the next id for `kind`, creating a fresh record on first use.
    ///
    /// Any `usize` key is valid. Uniqueness degrades only in the reported
    /// overflow conditions — see [`Record::generate`].
    pub fn next_id(&mut self, kind: usize) -> FloeId {
        let Self {
            records,
            time,
            sink,
        } = self;

        let now = time.current_millis();
        records.entry(kind).or_default().generate(now, sink, OP)
    }
}
