use parking_lot::Mutex;

use crate::{Error, FloeId, Record, ReportSink, Result, TimeSource};

/// Operation tag attached to anomaly reports from this registry.
const OP: &str = "next_shared_id";

/// A fixed set of generator records shared by every thread in the process,
/// one mutex-guarded slot per id kind.
///
/// The slot count is fixed at construction; callers address slots with a
/// 1-based kind in `1..=kind_count`. Contention is isolated per kind: callers
/// generating different kinds never touch the same lock.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Per-kind lock granularity
///
/// ## Recommended When
/// - Ids of a given kind must be unique across all threads of the process
///
/// ## See Also
/// - [`LocalRegistry`] for the unsynchronized, exclusively-owned variant
///
/// # Example
///
/// ```
/// use floe::{MonotonicClock, SharedRegistry, TracingSink};
///
/// let registry = SharedRegistry::new(4, MonotonicClock::new(), TracingSink);
///
/// let a = registry.next_id(1).unwrap();
/// let b = registry.next_id(1).unwrap();
/// assert_ne!(a, b);
/// ```
///
/// [`LocalRegistry`]: crate::LocalRegistry
pub struct SharedRegistry<T, S>
where
    T: TimeSource,
    S: ReportSink,
{
    #[cfg(feature = "cache-padded")]
    slots: Box<[crossbeam_utils::CachePadded<Mutex<Record>>]>,
    #[cfg(not(feature = "cache-padded"))]
    slots: Box<[Mutex<Record>]>,
    time: T,
    sink: S,
}

impl<T, S> SharedRegistry<T, S>
where
    T: TimeSource,
    S: ReportSink,
{
    /// Allocates `kind_count` zeroed records, each behind its own lock.
    ///
    /// This is the registry's one-time setup: the kind count cannot change
    /// afterwards, and no generation can race it because generation requires
    /// the returned value.
    ///
    /// # Panics
    ///
    /// Panics if `kind_count` is zero.
    pub fn new(kind_count: usize, time: T, sink: S) -> Self {
        assert!(kind_count > 0, "must have at least 1 kind");
        Self {
            slots: (0..kind_count).map(|_| Default::default()).collect(),
            time,
            sink,
        }
    }

    /// The number of configured kinds.
    pub fn kind_count(&self) -> usize {
        self.slots.len()
    }

    /// Issues the next id for `kind`, unique across every concurrent caller
    /// of this registry for the same kind.
    ///
    /// `kind` is 1-based; a value outside `1..=kind_count` returns
    /// [`Error::KindOutOfRange`] without touching any record. The slot's lock
    /// is held for the duration of the state update and released on every
    /// path, including the anomaly-reporting ones.
    ///
    /// Uniqueness degrades only in the reported overflow conditions — see
    /// [`Record::generate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindOutOfRange`] if `kind` is 0 or exceeds
    /// [`kind_count`].
    ///
    /// [`kind_count`]: Self::kind_count
    pub fn next_id(&self, kind: usize) -> Result<FloeId> {
        let slot = self
            .slots
            .get(kind.wrapping_sub(1))
            .ok_or(Error::KindOutOfRange {
                kind,
                kind_count: self.slots.len(),
            })?;

        let now = self.time.current_millis();
        let mut record = slot.lock();
        Ok(record.generate(now, &self.sink, OP))
    }
}
