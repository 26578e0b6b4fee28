use crate::{error::timestamp::Error as E, Error};

const NANOS_PER_SEC: i32 = 1_000_000_000;
const NANOS_PER_MILLI: i32 = 1_000_000;
const MILLIS_PER_SEC: i64 = 1_000;

/// A signed duration of time represented as a 96-bit integer of nanoseconds.
///
/// Each duration is made up of a 64-bit integer of whole seconds and a
/// 32-bit integer of fractional nanoseconds less than 1 whole second. Both
/// components always have the same sign (or are zero). For example,
/// `-1.5s` is `-1` seconds and `-500_000_000` nanoseconds.
///
/// Durations are used to offset clocks, to configure the granularity of
/// ticking clocks and to move a [`Timestamp`](crate::Timestamp) around.
///
/// # Display
///
/// The `Display` and `Debug` impls write an ISO 8601 duration limited to
/// hours, minutes and (fractional) seconds. A negative duration has a
/// leading `-`.
///
/// ```
/// use zoneclock::SignedDuration;
///
/// assert_eq!(SignedDuration::from_millis(5_400_250).to_string(), "PT1H30M0.25S");
/// assert_eq!(SignedDuration::from_nanos(-3_000_001).to_string(), "-PT0.003000001S");
/// assert_eq!(SignedDuration::ZERO.to_string(), "PT0S");
/// ```
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SignedDuration {
    secs: i64,
    nanos: i32,
}

impl SignedDuration {
    /// A duration of zero time.
    pub const ZERO: SignedDuration = SignedDuration { secs: 0, nanos: 0 };

    /// The minimum possible duration.
    pub const MIN: SignedDuration =
        SignedDuration { secs: i64::MIN, nanos: -(NANOS_PER_SEC - 1) };

    /// The maximum possible duration.
    pub const MAX: SignedDuration =
        SignedDuration { secs: i64::MAX, nanos: NANOS_PER_SEC - 1 };

    /// Creates a new duration from the given number of whole seconds and
    /// additional nanoseconds.
    ///
    /// If the absolute value of the nanoseconds is greater than or equal to
    /// 1 second, then the excess balances into the number of whole seconds.
    /// If the signs of the two components disagree, they are rebalanced so
    /// that they agree.
    ///
    /// # Panics
    ///
    /// When balancing nanoseconds into seconds overflows an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::SignedDuration;
    ///
    /// let dur = SignedDuration::new(2, -500_000_000);
    /// assert_eq!(dur.as_secs(), 1);
    /// assert_eq!(dur.subsec_nanos(), 500_000_000);
    /// ```
    #[inline]
    pub const fn new(mut secs: i64, mut nanos: i32) -> SignedDuration {
        if !(-NANOS_PER_SEC < nanos && nanos < NANOS_PER_SEC) {
            let addsecs = (nanos / NANOS_PER_SEC) as i64;
            secs = match secs.checked_add(addsecs) {
                Some(secs) => secs,
                None => panic!(
                    "nanoseconds overflowed seconds in SignedDuration::new"
                ),
            };
            nanos = nanos % NANOS_PER_SEC;
        }
        if nanos != 0 && secs != 0 {
            if secs < 0 && nanos > 0 {
                secs += 1;
                nanos -= NANOS_PER_SEC;
            } else if secs > 0 && nanos < 0 {
                secs -= 1;
                nanos += NANOS_PER_SEC;
            }
        }
        SignedDuration { secs, nanos }
    }

    /// Creates a new duration from the given number of whole seconds.
    #[inline]
    pub const fn from_secs(secs: i64) -> SignedDuration {
        SignedDuration { secs, nanos: 0 }
    }

    /// Creates a new duration from the given number of whole milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> SignedDuration {
        // OK because the remainder has magnitude at most 999, and
        // `999 * 1_000_000` fits in an `i32`.
        let secs = millis / MILLIS_PER_SEC;
        let nanos = (millis % MILLIS_PER_SEC) as i32 * NANOS_PER_MILLI;
        SignedDuration { secs, nanos }
    }

    /// Creates a new duration from the given number of whole nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> SignedDuration {
        let secs = nanos / (NANOS_PER_SEC as i64);
        let nanos = (nanos % (NANOS_PER_SEC as i64)) as i32;
        SignedDuration { secs, nanos }
    }

    /// Returns the number of whole seconds in this duration.
    ///
    /// The value returned is negative when the duration is negative.
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.secs
    }

    /// Returns the fractional part of this duration in nanoseconds.
    ///
    /// The value returned is negative when the duration is negative. It is
    /// guaranteed that the range of the value returned is in the inclusive
    /// range `-999_999_999..=999_999_999`.
    #[inline]
    pub const fn subsec_nanos(&self) -> i32 {
        self.nanos
    }

    /// Returns the total number of whole milliseconds in this duration.
    ///
    /// Any fractional millisecond is truncated toward zero.
    ///
    /// # Errors
    ///
    /// When the total number of milliseconds overflows an `i64`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::SignedDuration;
    ///
    /// let dur = SignedDuration::new(-1, -1_999_999);
    /// assert_eq!(dur.as_millis()?, -1_001);
    /// assert!(SignedDuration::MAX.as_millis().is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn as_millis(&self) -> Result<i64, Error> {
        self.secs
            .checked_mul(MILLIS_PER_SEC)
            .and_then(|millis| {
                millis.checked_add(i64::from(self.nanos / NANOS_PER_MILLI))
            })
            .ok_or_else(|| Error::from(E::OverflowMilliseconds))
    }

    /// Returns the total number of nanoseconds in this duration.
    ///
    /// # Errors
    ///
    /// When the total number of nanoseconds overflows an `i64`. That is,
    /// for durations longer than about 292 years.
    pub fn as_nanos(&self) -> Result<i64, Error> {
        self.secs
            .checked_mul(i64::from(NANOS_PER_SEC))
            .and_then(|nanos| nanos.checked_add(i64::from(self.nanos)))
            .ok_or_else(|| Error::from(E::OverflowNanoseconds))
    }

    /// Returns true if this duration is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.secs < 0 || self.nanos < 0
    }

    /// Returns true if this duration is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.secs == 0 && self.nanos == 0
    }

    /// Returns the negation of this duration, or `None` if it would
    /// overflow. That only happens for [`SignedDuration::MIN`].
    #[inline]
    pub const fn checked_neg(self) -> Option<SignedDuration> {
        let Some(secs) = self.secs.checked_neg() else { return None };
        Some(SignedDuration { secs, nanos: -self.nanos })
    }

    /// Adds the given duration to this one, or returns `None` on overflow.
    #[inline]
    pub const fn checked_add(
        self,
        rhs: SignedDuration,
    ) -> Option<SignedDuration> {
        let Some(mut secs) = self.secs.checked_add(rhs.secs) else {
            return None;
        };
        // OK because `-999_999_999 <= nanos <= 999_999_999`, and so adding
        // them together will never overflow an i32.
        let mut nanos = self.nanos + rhs.nanos;
        if nanos != 0 && (nanos >= NANOS_PER_SEC || nanos <= -NANOS_PER_SEC)
        {
            let Some(s) = secs.checked_add((nanos / NANOS_PER_SEC) as i64)
            else {
                return None;
            };
            secs = s;
            nanos = nanos % NANOS_PER_SEC;
        }
        if nanos != 0 && secs != 0 {
            if secs < 0 && nanos > 0 {
                secs += 1;
                nanos -= NANOS_PER_SEC;
            } else if secs > 0 && nanos < 0 {
                secs -= 1;
                nanos += NANOS_PER_SEC;
            }
        }
        Some(SignedDuration { secs, nanos })
    }
}

impl core::ops::Neg for SignedDuration {
    type Output = SignedDuration;

    #[inline]
    fn neg(self) -> SignedDuration {
        self.checked_neg().expect("overflow when negating signed duration")
    }
}

impl core::fmt::Display for SignedDuration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        if self.is_negative() {
            f.write_str("-")?;
        }
        let secs = self.secs.unsigned_abs();
        let nanos = self.nanos.unsigned_abs();
        let (hours, minutes, seconds) =
            (secs / 3600, (secs % 3600) / 60, secs % 60);
        f.write_str("PT")?;
        if hours != 0 {
            write!(f, "{hours}H")?;
        }
        if minutes != 0 {
            write!(f, "{minutes}M")?;
        }
        if seconds != 0 || nanos != 0 {
            write!(f, "{seconds}")?;
            if nanos != 0 {
                let mut digits = 9;
                let mut frac = nanos;
                while frac % 10 == 0 {
                    frac /= 10;
                    digits -= 1;
                }
                write!(f, ".{frac:0digits$}")?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for SignedDuration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SignedDuration {
    fn serialize<S: serde::Serializer>(
        &self,
        se: S,
    ) -> Result<S::Ok, S::Error> {
        crate::fmt::serde::serialize_pair(
            se,
            self.as_secs(),
            i64::from(self.subsec_nanos()),
        )
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SignedDuration {
    fn deserialize<D: serde::Deserializer<'de>>(
        de: D,
    ) -> Result<SignedDuration, D::Error> {
        de.deserialize_tuple(
            2,
            crate::fmt::serde::PairVisitor {
                expecting: "a pair of whole seconds and nanoseconds",
                make: |secs, nanos| {
                    let nanos = i32::try_from(nanos)
                        .ok()
                        .filter(|n| n.unsigned_abs() < 1_000_000_000)
                        .ok_or_else(|| {
                            Error::from_args(format_args!(
                                "duration nanoseconds {nanos} must be \
                                 less than one second"
                            ))
                        })?;
                    Ok(SignedDuration::new(secs, nanos))
                },
            },
        )
    }
}
