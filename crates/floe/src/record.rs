use core::cmp::Ordering;

use crate::{Anomaly, EPOCH, FloeId, ReportSink};

const EPOCH_MS: u64 = EPOCH.as_millis() as u64;

/// Per-generator state: the last millisecond an id was issued for and the
/// count of ids issued within it.
///
/// A zeroed record means "never issued". `last_timestamp` is monotonically
/// non-decreasing under correct clock behavior; `sequence` resets whenever it
/// advances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    last_timestamp: u64,
    sequence: u32,
}

impl Record {
    /// Creates a fresh record that has never issued an id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a record from explicit state.
    ///
    /// Primarily useful in tests and for controlling the starting point of a
    /// generator manually; prefer [`Self::new`] otherwise.
    pub fn from_parts(last_timestamp: u64, sequence: u32) -> Self {
        Self {
            last_timestamp,
            sequence,
        }
    }

    /// The last absolute millisecond an id was issued for, or 0.
    pub fn last_timestamp(&self) -> u64 {
        self.last_timestamp
    }

    /// The number of ids issued within [`last_timestamp`]'s millisecond.
    ///
    /// [`last_timestamp`]: Self::last_timestamp
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Issues the next id for this record given the current absolute time in
    /// milliseconds.
    ///
    /// Exactly one of four transitions fires:
    ///
    /// - **first use**: the record is zeroed; it adopts `now_ms` and the id
    ///   carries sequence 0;
    /// - **same millisecond**: the sequence increments and is packed above
    ///   the timestamp;
    /// - **time advanced**: the sequence resets and the id carries
    ///   sequence 0;
    /// - **clock regression**: `now_ms` is behind the record; a
    ///   [`ClockRegression`] anomaly is reported and [`FloeId::SENTINEL`] is
    ///   returned with the record left untouched.
    ///
    /// This method never fails and never blocks. Out-of-range values are
    /// reported through `sink` and then packed anyway: an elapsed time wider
    /// than 41 bits spills into the sequence field, and a sequence past 4095
    /// spills into the reserved field. Callers accepting that contract get
    /// liveness; callers that cannot tolerate malformed ids must watch the
    /// sink.
    ///
    /// `now_ms` is expected to be at or past [`EPOCH`]; earlier values are a
    /// caller bug that trips a debug assertion, while release builds wrap and
    /// continue.
    ///
    /// `op` tags every report with the calling operation.
    ///
    /// # Example
    ///
    /// ```
    /// use floe::{NullSink, Record, EPOCH};
    ///
    /// let mut record = Record::new();
    /// let now_ms = EPOCH.as_millis() as u64 + 5000;
    ///
    /// let id = record.generate(now_ms, &NullSink, "doc");
    /// assert_eq!(id.to_raw(), 5000);
    /// assert_eq!(record.last_timestamp(), now_ms);
    /// assert_eq!(record.sequence(), 0);
    /// ```
    ///
    /// [`ClockRegression`]: crate::Anomaly::ClockRegression
    /// [`EPOCH`]: crate::EPOCH
    pub fn generate<S: ReportSink>(&mut self, now_ms: u64, sink: &S, op: &'static str) -> FloeId {
        debug_assert!(now_ms >= EPOCH_MS, "clock reads before the epoch");
        let elapsed = now_ms.wrapping_sub(EPOCH_MS);
        if elapsed > FloeId::max_timestamp() {
            sink.report(Anomaly::TimestampOverflow { op, elapsed });
        }

        if self.last_timestamp == 0 {
            self.last_timestamp = now_ms;
            self.sequence = 0;
            return FloeId::from_raw(elapsed);
        }

        match now_ms.cmp(&self.last_timestamp) {
            Ordering::Equal => {
                self.sequence += 1;
                if u64::from(self.sequence) > FloeId::max_sequence() {
                    sink.report(Anomaly::SequenceOverflow {
                        op,
                        sequence: self.sequence,
                    });
                }
                // Unmasked on purpose: an exhausted counter keeps issuing
                // distinct (if malformed) ids instead of failing the call.
                FloeId::from_raw((u64::from(self.sequence) << FloeId::SEQUENCE_SHIFT) | elapsed)
            }
            Ordering::Greater => {
                self.sequence = 0;
                self.last_timestamp = now_ms;
                FloeId::from_raw(elapsed)
            }
            Ordering::Less => self.cold_clock_behind(now_ms, sink, op),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind<S: ReportSink>(
        &self,
        now_ms: u64,
        sink: &S,
        op: &'static str,
    ) -> FloeId {
        sink.report(Anomaly::ClockRegression {
            op,
            now_ms,
            last_timestamp: self.last_timestamp,
        });
        FloeId::SENTINEL
    }
}
