use crate::{
    error::timestamp::Error as E,
    util::b::{self, Bounds},
    Error, SignedDuration,
};

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MILLI: i32 = 1_000_000;

/// An instant in time represented as the number of seconds and nanoseconds
/// since the Unix epoch, `1970-01-01T00:00:00Z`.
///
/// The nanosecond component is always non-negative and less than one second.
/// So an instant one nanosecond before the epoch is represented as `-1`
/// seconds and `999_999_999` nanoseconds.
///
/// The range of a `Timestamp` spans the years `-1_000_000_000` through
/// `1_000_000_000`, which is the range of instants supported by the clocks
/// and the wire format in this crate.
///
/// A `Timestamp` has no time zone. Pair it with a
/// [`ZoneId`](crate::tz::ZoneId) via its [`ZoneRules`](crate::tz::ZoneRules)
/// to find the offset in effect at that instant.
///
/// # Example
///
/// ```
/// use zoneclock::{SignedDuration, Timestamp};
///
/// let ts = Timestamp::from_millisecond(-1)?;
/// assert_eq!(ts.as_second(), -1);
/// assert_eq!(ts.subsec_nanosecond(), 999_000_000);
///
/// let ts = ts.checked_add(SignedDuration::from_millis(1))?;
/// assert_eq!(ts, Timestamp::UNIX_EPOCH);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Timestamp {
    second: i64,
    nanosecond: i32,
}

impl Timestamp {
    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    pub const UNIX_EPOCH: Timestamp = Timestamp { second: 0, nanosecond: 0 };

    /// The minimum supported instant, at the start of the year
    /// `-1_000_000_000`.
    pub const MIN: Timestamp =
        Timestamp { second: b::UnixSeconds::MIN, nanosecond: 0 };

    /// The maximum supported instant, at the last nanosecond of the year
    /// `1_000_000_000`.
    pub const MAX: Timestamp =
        Timestamp { second: b::UnixSeconds::MAX, nanosecond: 999_999_999 };

    /// Returns the current instant according to the system clock.
    ///
    /// This is equivalent to reading [`Clock::system_utc`](crate::clock::Clock::system_utc).
    ///
    /// # Panics
    ///
    /// This panics if the system clock reports an instant outside the range
    /// supported by `Timestamp`.
    pub fn now() -> Timestamp {
        crate::clock::system::instant()
            .expect("system time is in the range supported by Timestamp")
    }

    /// Creates a new timestamp from whole seconds and a nanosecond
    /// adjustment since the Unix epoch.
    ///
    /// The adjustment may be negative or exceed one second. It is balanced
    /// into the seconds so that the stored nanosecond is non-negative.
    ///
    /// # Errors
    ///
    /// When the resulting instant is outside the range of a `Timestamp`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::Timestamp;
    ///
    /// let ts = Timestamp::new(3, -1)?;
    /// assert_eq!((ts.as_second(), ts.subsec_nanosecond()), (2, 999_999_999));
    ///
    /// let ts = Timestamp::new(0, 4_000_000_001)?;
    /// assert_eq!((ts.as_second(), ts.subsec_nanosecond()), (4, 1));
    ///
    /// assert!(Timestamp::new(i64::MAX, 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(second: i64, nanosecond: i64) -> Result<Timestamp, Error> {
        let carry = nanosecond.div_euclid(NANOS_PER_SEC);
        // OK because `rem_euclid` is always in `0..NANOS_PER_SEC`.
        let nanosecond = nanosecond.rem_euclid(NANOS_PER_SEC) as i32;
        // Saturating is fine here: both saturation points are well outside
        // the bounds being checked.
        let second = b::UnixSeconds::check(second.saturating_add(carry))?;
        Ok(Timestamp { second, nanosecond })
    }

    /// Creates a new timestamp from whole seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// When the instant is outside the range of a `Timestamp`.
    pub fn from_second(second: i64) -> Result<Timestamp, Error> {
        Timestamp::new(second, 0)
    }

    /// Creates a new timestamp from whole milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// When the instant is outside the range of a `Timestamp`. (Every `i64`
    /// number of milliseconds is currently in range, but this may not
    /// always be so.)
    pub fn from_millisecond(millisecond: i64) -> Result<Timestamp, Error> {
        let second = millisecond.div_euclid(1_000);
        // OK because `rem_euclid` is always in `0..1_000`.
        let millis = millisecond.rem_euclid(1_000) as i32;
        let second = b::UnixSeconds::check(second)?;
        Ok(Timestamp { second, nanosecond: millis * NANOS_PER_MILLI })
    }

    /// Returns the number of whole seconds since the Unix epoch, rounded
    /// toward negative infinity.
    #[inline]
    pub fn as_second(self) -> i64 {
        self.second
    }

    /// Returns the nanoseconds past [`Timestamp::as_second`]. This is
    /// always in the range `0..=999_999_999`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Returns the number of whole milliseconds since the Unix epoch,
    /// rounded toward negative infinity.
    ///
    /// # Errors
    ///
    /// When the number of milliseconds overflows an `i64`. Instants more than
    /// roughly 292 million years from the epoch have no millisecond
    /// representation.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::Timestamp;
    ///
    /// let ts = Timestamp::new(-1, 1)?;
    /// assert_eq!(ts.as_millisecond()?, -1_000);
    /// assert!(Timestamp::MAX.as_millisecond().unwrap_err().is_overflow());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn as_millisecond(self) -> Result<i64, Error> {
        let subsec = i64::from(self.nanosecond / NANOS_PER_MILLI);
        // Borrow a second for negative instants so that the multiplication
        // can't overflow when the final result is in range.
        let (second, subsec) = if self.second < 0 && self.nanosecond > 0 {
            (self.second + 1, subsec - 1_000)
        } else {
            (self.second, subsec)
        };
        second
            .checked_mul(1_000)
            .and_then(|millis| millis.checked_add(subsec))
            .ok_or_else(|| Error::from(E::OverflowMilliseconds))
    }

    /// Adds the given duration to this timestamp.
    ///
    /// # Errors
    ///
    /// When the result is outside the range of a `Timestamp`.
    pub fn checked_add(
        self,
        duration: SignedDuration,
    ) -> Result<Timestamp, Error> {
        let nanosecond = i64::from(self.nanosecond)
            + i64::from(duration.subsec_nanos());
        self.second
            .checked_add(duration.as_secs())
            .and_then(|second| Timestamp::new(second, nanosecond).ok())
            .ok_or_else(|| Error::from(E::OverflowAddDuration))
    }

    /// Subtracts the given duration from this timestamp.
    ///
    /// # Errors
    ///
    /// When the result is outside the range of a `Timestamp`.
    pub fn checked_sub(
        self,
        duration: SignedDuration,
    ) -> Result<Timestamp, Error> {
        let duration = duration
            .checked_neg()
            .ok_or_else(|| Error::from(E::OverflowAddDuration))?;
        self.checked_add(duration)
    }
}

impl Default for Timestamp {
    fn default() -> Timestamp {
        Timestamp::UNIX_EPOCH
    }
}

impl core::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Timestamp")
            .field("second", &self.second)
            .field("nanosecond", &self.nanosecond)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(
        &self,
        se: S,
    ) -> Result<S::Ok, S::Error> {
        crate::fmt::serde::serialize_pair(
            se,
            self.as_second(),
            i64::from(self.subsec_nanosecond()),
        )
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Timestamp {
    fn deserialize<D: serde::Deserializer<'de>>(
        de: D,
    ) -> Result<Timestamp, D::Error> {
        de.deserialize_tuple(
            2,
            crate::fmt::serde::PairVisitor {
                expecting: "a pair of Unix seconds and nanoseconds",
                make: Timestamp::new,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_nanoseconds() {
        let ts = Timestamp::new(0, -1).unwrap();
        assert_eq!((ts.as_second(), ts.subsec_nanosecond()), (-1, 999_999_999));
        let ts = Timestamp::new(-5, -2_000_000_000).unwrap();
        assert_eq!((ts.as_second(), ts.subsec_nanosecond()), (-7, 0));
    }

    #[test]
    fn range() {
        assert!(Timestamp::new(b::UnixSeconds::MAX, 999_999_999).is_ok());
        let err = Timestamp::new(b::UnixSeconds::MAX, 1_000_000_000)
            .unwrap_err();
        assert!(err.is_range());
        insta::assert_snapshot!(
            err,
            @"parameter 'Unix timestamp seconds' is not in the required range of -31557014167219200..=31556889864403199",
        );
        assert!(Timestamp::from_second(b::UnixSeconds::MIN - 1).is_err());
    }

    #[test]
    fn milliseconds_floor() {
        let ts = Timestamp::from_millisecond(-1_001).unwrap();
        assert_eq!((ts.as_second(), ts.subsec_nanosecond()), (-2, 999_000_000));
        assert_eq!(ts.as_millisecond().unwrap(), -1_001);
        assert_eq!(
            Timestamp::from_millisecond(i64::MAX)
                .unwrap()
                .as_millisecond()
                .unwrap(),
            i64::MAX,
        );
        let err = Timestamp::MIN.as_millisecond().unwrap_err();
        assert!(err.is_overflow());
    }

    #[test]
    fn add_duration() {
        let ts = Timestamp::new(10, 900_000_000).unwrap();
        let got = ts.checked_add(SignedDuration::new(0, 200_000_000)).unwrap();
        assert_eq!((got.as_second(), got.subsec_nanosecond()), (11, 100_000_000));
        let got = ts.checked_sub(SignedDuration::new(11, 0)).unwrap();
        assert_eq!((got.as_second(), got.subsec_nanosecond()), (-1, 900_000_000));

        let err = Timestamp::MAX
            .checked_add(SignedDuration::new(0, 1))
            .unwrap_err();
        assert!(err.is_overflow());
        insta::assert_snapshot!(
            err,
            @"adding duration to timestamp overflowed the supported range of timestamps",
        );
        assert!(Timestamp::MIN.checked_sub(SignedDuration::MIN).is_err());
    }

    #[test]
    fn ordering() {
        let before = Timestamp::new(-1, 999_999_999).unwrap();
        assert!(before < Timestamp::UNIX_EPOCH);
        assert!(Timestamp::MIN < Timestamp::MAX);
    }

    #[test]
    fn milliseconds_near_limits() {
        for millis in [i64::MIN, i64::MIN + 1, i64::MIN + 999, i64::MAX] {
            let ts = Timestamp::from_millisecond(millis).unwrap();
            assert_eq!(ts.as_millisecond().unwrap(), millis, "{millis}");
        }
        let ts = Timestamp::from_millisecond(i64::MIN).unwrap();
        let err = ts
            .checked_sub(SignedDuration::new(0, 1))
            .unwrap()
            .as_millisecond()
            .unwrap_err();
        assert!(err.is_overflow());
    }

    quickcheck::quickcheck! {
        fn prop_millisecond_roundtrip(millis: i64) -> bool {
            let ts = Timestamp::from_millisecond(millis).unwrap();
            ts.as_millisecond().unwrap() == millis
        }
    }
}
