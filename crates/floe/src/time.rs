use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Generation epoch: Thursday, January 7, 2021 12:16:31 UTC.
///
/// All timestamp fields count milliseconds from this origin. With 41 bits of
/// timestamp the layout lasts roughly 69 years from here.
pub const EPOCH: Duration = Duration::from_millis(1_610_021_791_000);

/// A trait for time sources that return the current absolute time in
/// milliseconds since [`UNIX_EPOCH`].
///
/// Successive calls must be non-decreasing under normal operation. The
/// abstraction allows plugging in the process clock, or a mocked source in
/// tests.
///
/// # Example
///
/// ```
/// use floe::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`UNIX_EPOCH`]: std::time::UNIX_EPOCH
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        T::current_millis(*self)
    }
}

/// A time source that anchors wall-clock time once at construction and
/// advances it with a monotonic timer.
///
/// Reading `SystemTime` on every call would expose generators to NTP steps
/// and daylight-savings adjustments; capturing it once and measuring elapsed
/// time with [`Instant`] keeps successive readings non-decreasing for the
/// life of the clock.
///
/// # Example
///
/// ```
/// use floe::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// let b = clock.current_millis();
/// assert!(b >= a);
/// ```
#[derive(Clone)]
pub struct MonotonicClock {
    /// Wall-clock milliseconds since the Unix epoch, captured at
    /// construction.
    base_millis: u64,
    start: Instant,
}

impl MonotonicClock {
    /// Constructs a clock anchored to the current wall-clock time.
    ///
    /// # Panics
    ///
    /// Panics if the system clock reads earlier than [`UNIX_EPOCH`].
    ///
    /// [`UNIX_EPOCH`]: std::time::UNIX_EPOCH
    pub fn new() -> Self {
        let base = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH");
        Self {
            base_millis: base.as_millis() as u64,
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.base_millis + self.start.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_decreases() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..1000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn monotonic_clock_is_past_the_epoch() {
        let clock = MonotonicClock::new();
        assert!(clock.current_millis() >= EPOCH.as_millis() as u64);
    }
}
