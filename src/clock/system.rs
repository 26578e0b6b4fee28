/*!
Reading the operating system's real-time clock.

An instant is read as a whole second "coarse offset" plus a nanosecond
adjustment relative to it. The coarse offset is process wide state shared by
every system clock. It only needs to be within `±2^32` seconds of the current
time, so in practice it is computed once and never touched again. If the
adjustment ever falls outside that window, the offset is recomputed from a
millisecond reading and the read is retried.

Racing threads may each recompute and store the offset. That's fine: any
recently computed offset is as good as any other, and a relaxed load always
sees some whole value that was stored.
*/

use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{Error, Timestamp};

/// The value of the coarse offset before anything has been computed.
///
/// This is far enough from any real time that the first read always falls
/// outside the adjustment window, which forces a recompute.
const UNSET: i64 = i64::MIN;

/// The number of seconds, in either direction, that an adjustment may span.
const WINDOW_SECONDS: i128 = 1 << 32;

/// How far behind the current time a freshly computed offset is placed.
const RECOMPUTE_LAG_SECONDS: i64 = 1024;

static COARSE_OFFSET: AtomicI64 = AtomicI64::new(UNSET);

/// A source of real time readings.
pub(crate) trait RealTime {
    /// Returns the number of milliseconds since the Unix epoch.
    fn epoch_millis(&self) -> i64;

    /// Returns the number of nanoseconds since `offset` seconds after the
    /// Unix epoch, or `None` if that is more than `2^32` seconds away.
    fn nano_adjustment(&self, offset: i64) -> Option<i64>;
}

/// Real time as reported by `std::time::SystemTime`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StdRealTime;

impl StdRealTime {
    /// Returns the signed number of nanoseconds since the Unix epoch.
    fn epoch_nanos() -> i128 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(dur) => dur.as_nanos() as i128,
            Err(err) => -(err.duration().as_nanos() as i128),
        }
    }
}

impl RealTime for StdRealTime {
    fn epoch_millis(&self) -> i64 {
        let millis = StdRealTime::epoch_nanos().div_euclid(1_000_000);
        i64::try_from(millis)
            .unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX })
    }

    fn nano_adjustment(&self, offset: i64) -> Option<i64> {
        adjustment_within_window(StdRealTime::epoch_nanos(), offset)
    }
}

/// Returns the current instant from the operating system's clock.
pub(crate) fn instant() -> Result<Timestamp, Error> {
    instant_with(&StdRealTime, &COARSE_OFFSET)
}

/// Returns the current number of milliseconds since the Unix epoch from the
/// operating system's clock.
pub(crate) fn millis() -> i64 {
    StdRealTime.epoch_millis()
}

fn instant_with(
    source: &impl RealTime,
    coarse: &AtomicI64,
) -> Result<Timestamp, Error> {
    // Read the shared offset exactly once, so that the adjustment and the
    // instant are computed against the same value.
    let mut offset = coarse.load(Ordering::Relaxed);
    let adjustment = match source.nano_adjustment(offset) {
        Some(adjustment) => adjustment,
        None => {
            offset = source.epoch_millis() / 1000 - RECOMPUTE_LAG_SECONDS;
            coarse.store(offset, Ordering::Relaxed);
            debug!(
                "recomputed coarse offset for system clock \
                 to {offset} seconds since the Unix epoch",
            );
            match source.nano_adjustment(offset) {
                Some(adjustment) => adjustment,
                None => panic!(
                    "system clock offset {offset} is not in range \
                     even after being recomputed",
                ),
            }
        }
    };
    Timestamp::new(offset, adjustment)
}

fn adjustment_within_window(now_nanos: i128, offset: i64) -> Option<i64> {
    let adjustment = now_nanos - i128::from(offset) * 1_000_000_000;
    if adjustment.abs() > WINDOW_SECONDS * 1_000_000_000 {
        return None;
    }
    // OK because `2^32 * 10^9 < 2^63`.
    Some(adjustment as i64)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// A real time source stuck at a fixed number of nanoseconds, which
    /// counts how often it is asked for a millisecond reading.
    struct Frozen {
        nanos: i128,
        millis_reads: Cell<usize>,
    }

    impl Frozen {
        fn new(nanos: i128) -> Frozen {
            Frozen { nanos, millis_reads: Cell::new(0) }
        }
    }

    impl RealTime for Frozen {
        fn epoch_millis(&self) -> i64 {
            self.millis_reads.set(self.millis_reads.get() + 1);
            i64::try_from(self.nanos.div_euclid(1_000_000)).unwrap()
        }

        fn nano_adjustment(&self, offset: i64) -> Option<i64> {
            adjustment_within_window(self.nanos, offset)
        }
    }

    /// A real time source whose window never contains the current time.
    struct Broken;

    impl RealTime for Broken {
        fn epoch_millis(&self) -> i64 {
            0
        }

        fn nano_adjustment(&self, _offset: i64) -> Option<i64> {
            None
        }
    }

    #[test]
    fn first_read_computes_offset() {
        let coarse = AtomicI64::new(UNSET);
        let source = Frozen::new(1_700_000_000_123_456_789);
        let ts = instant_with(&source, &coarse).unwrap();
        assert_eq!(ts.as_second(), 1_700_000_000);
        assert_eq!(ts.subsec_nanosecond(), 123_456_789);
        assert_eq!(coarse.load(Ordering::Relaxed), 1_700_000_000 - 1024);
        assert_eq!(source.millis_reads.get(), 1);

        // The second read reuses the stored offset.
        let again = instant_with(&source, &coarse).unwrap();
        assert_eq!(again, ts);
        assert_eq!(source.millis_reads.get(), 1);
    }

    #[test]
    fn stale_offset_is_recomputed() {
        let coarse = AtomicI64::new(0);
        let far = (1i128 << 33) * 1_000_000_000 + 5;
        let source = Frozen::new(far);
        let ts = instant_with(&source, &coarse).unwrap();
        assert_eq!(ts.as_second(), 1 << 33);
        assert_eq!(ts.subsec_nanosecond(), 5);
        assert_eq!(source.millis_reads.get(), 1);
        assert_eq!(coarse.load(Ordering::Relaxed), (1 << 33) - 1024);
    }

    #[test]
    fn before_unix_epoch() {
        let coarse = AtomicI64::new(UNSET);
        let source = Frozen::new(-1);
        let ts = instant_with(&source, &coarse).unwrap();
        assert_eq!(ts.as_second(), -1);
        assert_eq!(ts.subsec_nanosecond(), 999_999_999);
    }

    #[test]
    #[should_panic(expected = "even after being recomputed")]
    fn unrecoverable_offset_panics() {
        let coarse = AtomicI64::new(UNSET);
        let _ = instant_with(&Broken, &coarse);
    }

    #[test]
    fn window_edges() {
        let edge = WINDOW_SECONDS * 1_000_000_000;
        assert_eq!(adjustment_within_window(edge, 0), Some(edge as i64));
        assert_eq!(adjustment_within_window(-edge, 0), Some(-edge as i64));
        assert_eq!(adjustment_within_window(edge + 1, 0), None);
        assert_eq!(adjustment_within_window(0, UNSET), None);
    }

    #[test]
    fn real_clock_agrees_with_millis() {
        let before = millis();
        let now = instant().unwrap().as_millisecond().unwrap();
        let after = millis();
        assert!(before <= now && now <= after, "{before} <= {now} <= {after}");
    }
}
