use crate::{
    error::tz::offset::Error as E,
    tz::ZoneRules,
    util::{array_str::ArrayStr, b, cache},
    Error,
};

/// The maximum number of seconds, in either direction, that an offset may
/// be from UTC.
const MAX_SECONDS: i32 = 18 * 60 * 60;

/// A fixed amount of time, in whole seconds, that a local time is ahead of
/// (or behind) UTC.
///
/// Offsets are in the range `-18:00..=+18:00`. Every offset has a canonical
/// identifier derived from its total seconds: `Z` for UTC, otherwise `±HH:MM`
/// with a `:SS` suffix when the seconds component is non-zero. The
/// identifier is never copied from input text, so `+01`, `+0100` and
/// `+01:00` all parse to an offset whose identifier is `+01:00`.
///
/// # Memoization
///
/// Offsets that are a whole number of quarter hours are memoized in a
/// process wide cache, so repeatedly constructing common offsets is cheap.
/// This is never observable other than through performance: offsets are
/// `Copy` and always compare by value.
///
/// # Ordering
///
/// Offsets are ordered by *descending* total seconds. That is, offsets
/// further ahead of UTC sort first, which matches the order in which the
/// same local time occurs across the offsets.
///
/// ```
/// use zoneclock::tz::ZoneOffset;
///
/// let tokyo = ZoneOffset::from_hours(9)?;
/// let sydney = ZoneOffset::from_hours(10)?;
/// assert!(sydney < tokyo);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Parsing
///
/// [`ZoneOffset::parse`] accepts exactly `Z`, `±h`, `±hh`, `±hhmm`,
/// `±hh:mm`, `±hhmmss` and `±hh:mm:ss`:
///
/// ```
/// use zoneclock::tz::ZoneOffset;
///
/// assert_eq!(ZoneOffset::parse("Z")?, ZoneOffset::UTC);
/// assert_eq!(ZoneOffset::parse("-5")?.id(), "-05:00");
/// assert_eq!(ZoneOffset::parse("+0530")?.id(), "+05:30");
/// assert_eq!(ZoneOffset::parse("+01:00:30")?.seconds(), 3630);
///
/// assert!(ZoneOffset::parse("+1:00").is_err());
/// assert!(ZoneOffset::parse("05:00").is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy)]
pub struct ZoneOffset {
    seconds: i32,
    id: ArrayStr<9>,
}

impl ZoneOffset {
    /// The offset for UTC. Its identifier is `Z`.
    pub const UTC: ZoneOffset = ZoneOffset::constant(0);

    /// The minimum supported offset, `-18:00`.
    pub const MIN: ZoneOffset = ZoneOffset::constant(-MAX_SECONDS);

    /// The maximum supported offset, `+18:00`.
    pub const MAX: ZoneOffset = ZoneOffset::constant(MAX_SECONDS);

    /// Creates an offset from its total number of seconds.
    ///
    /// Every other constructor funnels through this one.
    ///
    /// # Errors
    ///
    /// When the seconds are outside `-64800..=64800`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneOffset;
    ///
    /// let offset = ZoneOffset::from_seconds(-(3 * 3600 + 30 * 60))?;
    /// assert_eq!(offset.id(), "-03:30");
    /// assert!(ZoneOffset::from_seconds(64_801).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_seconds(seconds: i32) -> Result<ZoneOffset, Error> {
        if !(-MAX_SECONDS <= seconds && seconds <= MAX_SECONDS) {
            return Err(Error::from(E::OutOfRange {
                seconds: i64::from(seconds),
            }));
        }
        Ok(ZoneOffset::from_seconds_unchecked(seconds))
    }

    /// Creates an offset from a number of whole hours.
    ///
    /// # Errors
    ///
    /// When the hours are outside `-18..=18`.
    pub fn from_hours(hours: i8) -> Result<ZoneOffset, Error> {
        ZoneOffset::from_hms(hours, 0, 0)
    }

    /// Creates an offset from hours and minutes.
    ///
    /// # Errors
    ///
    /// Under the same conditions as [`ZoneOffset::from_hms`].
    pub fn from_hours_minutes(
        hours: i8,
        minutes: i8,
    ) -> Result<ZoneOffset, Error> {
        ZoneOffset::from_hms(hours, minutes, 0)
    }

    /// Creates an offset from hours, minutes and seconds.
    ///
    /// The components are added together, so for a negative offset, all
    /// non-zero components must be negative.
    ///
    /// # Errors
    ///
    /// When the components don't share a sign, when hours are outside
    /// `-18..=18`, when minutes or seconds are outside `-59..=59` or when the
    /// total is beyond `±18:00`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneOffset;
    ///
    /// assert_eq!(ZoneOffset::from_hms(-1, -30, 0)?.id(), "-01:30");
    /// assert!(ZoneOffset::from_hms(-1, 30, 0).is_err());
    /// assert!(ZoneOffset::from_hms(18, 0, 1).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_hms(
        hours: i8,
        minutes: i8,
        seconds: i8,
    ) -> Result<ZoneOffset, Error> {
        let hours = b::OffsetHours::check(hours)?;
        let mixed = if hours > 0 {
            minutes < 0 || seconds < 0
        } else if hours < 0 {
            minutes > 0 || seconds > 0
        } else {
            (minutes > 0 && seconds < 0) || (minutes < 0 && seconds > 0)
        };
        if mixed {
            return Err(Error::from(E::SignMismatch { hours, minutes, seconds }));
        }
        let minutes = b::OffsetMinutes::check(minutes)?;
        let seconds = b::OffsetSeconds::check(seconds)?;
        let total = i32::from(hours) * 3600
            + i32::from(minutes) * 60
            + i32::from(seconds);
        ZoneOffset::from_seconds(total)
    }

    /// Parses an offset identifier.
    ///
    /// See the [type level documentation](ZoneOffset#parsing) for the
    /// accepted formats.
    ///
    /// # Errors
    ///
    /// When the text isn't in one of the accepted formats, or when the
    /// offset it describes is out of range.
    pub fn parse(text: &str) -> Result<ZoneOffset, Error> {
        if text == "Z" {
            return Ok(ZoneOffset::UTC);
        }
        if let Some(offset) = cache::offset_by_id(text) {
            return Ok(offset);
        }
        let bytes = text.as_bytes();
        let (hours, minutes, seconds) = match bytes.len() {
            2 => {
                let padded = [bytes[0], b'0', bytes[1]];
                (digits(text, &padded, 1, false)?, 0, 0)
            }
            3 => (digits(text, bytes, 1, false)?, 0, 0),
            5 => (
                digits(text, bytes, 1, false)?,
                digits(text, bytes, 3, false)?,
                0,
            ),
            6 => (
                digits(text, bytes, 1, false)?,
                digits(text, bytes, 4, true)?,
                0,
            ),
            7 => (
                digits(text, bytes, 1, false)?,
                digits(text, bytes, 3, false)?,
                digits(text, bytes, 5, false)?,
            ),
            9 => (
                digits(text, bytes, 1, false)?,
                digits(text, bytes, 4, true)?,
                digits(text, bytes, 7, true)?,
            ),
            _ => return Err(Error::from(E::invalid_length(text))),
        };
        match bytes[0] {
            b'+' => ZoneOffset::from_hms(hours, minutes, seconds),
            b'-' => ZoneOffset::from_hms(-hours, -minutes, -seconds),
            _ => Err(Error::from(E::missing_sign(text))),
        }
    }

    /// Returns the total number of seconds in this offset.
    #[inline]
    pub fn seconds(self) -> i32 {
        self.seconds
    }

    /// Returns the canonical identifier of this offset.
    #[inline]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the rules for this offset, which always report this offset.
    pub fn rules(self) -> ZoneRules {
        ZoneRules::fixed(self)
    }

    /// Returns the offset with the opposite sign.
    ///
    /// This never fails since the range of offsets is symmetric.
    pub fn negate(self) -> ZoneOffset {
        ZoneOffset::from_seconds_unchecked(-self.seconds)
    }

    /// Returns true if this is the offset for UTC.
    #[inline]
    pub fn is_utc(self) -> bool {
        self.seconds == 0
    }

    /// Builds an offset for seconds already known to be in range, going
    /// through the memoization cache when possible.
    fn from_seconds_unchecked(seconds: i32) -> ZoneOffset {
        if seconds % cache::QUARTER_HOUR == 0 {
            cache::offset_by_seconds(seconds, || ZoneOffset::constant(seconds))
        } else {
            ZoneOffset::constant(seconds)
        }
    }

    /// Builds an offset without consulting any cache.
    ///
    /// # Panics
    ///
    /// When `seconds` is out of range. In a const context, this results in a
    /// compile error.
    const fn constant(seconds: i32) -> ZoneOffset {
        assert!(-MAX_SECONDS <= seconds && seconds <= MAX_SECONDS);
        ZoneOffset { seconds, id: canonical_id(seconds) }
    }
}

impl Eq for ZoneOffset {}

impl PartialEq for ZoneOffset {
    #[inline]
    fn eq(&self, rhs: &ZoneOffset) -> bool {
        self.seconds == rhs.seconds
    }
}

impl core::hash::Hash for ZoneOffset {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.seconds.hash(state);
    }
}

impl Ord for ZoneOffset {
    #[inline]
    fn cmp(&self, rhs: &ZoneOffset) -> core::cmp::Ordering {
        rhs.seconds.cmp(&self.seconds)
    }
}

impl PartialOrd for ZoneOffset {
    #[inline]
    fn partial_cmp(&self, rhs: &ZoneOffset) -> Option<core::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

impl Default for ZoneOffset {
    fn default() -> ZoneOffset {
        ZoneOffset::UTC
    }
}

impl core::fmt::Debug for ZoneOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "ZoneOffset({})", self.id)
    }
}

impl core::fmt::Display for ZoneOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

impl core::str::FromStr for ZoneOffset {
    type Err = Error;

    fn from_str(text: &str) -> Result<ZoneOffset, Error> {
        ZoneOffset::parse(text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ZoneOffset {
    fn serialize<S: serde::Serializer>(
        &self,
        se: S,
    ) -> Result<S::Ok, S::Error> {
        se.serialize_str(self.id())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ZoneOffset {
    fn deserialize<D: serde::Deserializer<'de>>(
        de: D,
    ) -> Result<ZoneOffset, D::Error> {
        de.deserialize_str(crate::fmt::serde::StrVisitor {
            expecting: "a time zone offset identifier like `+05:30` or `Z`",
            parse: ZoneOffset::parse,
        })
    }
}

/// Extracts exactly two ASCII digits at `pos`.
///
/// When `after_colon` is set, the byte just before `pos` must be a `:`.
/// `text` is only used for error messages.
fn digits(
    text: &str,
    bytes: &[u8],
    pos: usize,
    after_colon: bool,
) -> Result<i8, Error> {
    if after_colon && bytes[pos - 1] != b':' {
        return Err(Error::from(E::missing_colon(text)));
    }
    let (d1, d2) = (bytes[pos], bytes[pos + 1]);
    if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
        return Err(Error::from(E::non_numeric(text)));
    }
    // OK because two decimal digits are at most 99.
    Ok(((d1 - b'0') * 10 + (d2 - b'0')) as i8)
}

/// Synthesizes the canonical identifier for an offset.
const fn canonical_id(seconds: i32) -> ArrayStr<9> {
    if seconds == 0 {
        return ArrayStr::empty().push_ascii(b'Z');
    }
    let abs = seconds.unsigned_abs();
    let (hours, minutes, secs) = (abs / 3600, (abs / 60) % 60, abs % 60);
    let sign = if seconds < 0 { b'-' } else { b'+' };
    let id = ArrayStr::empty()
        .push_ascii(sign)
        .push_ascii(ascii_digit(hours / 10))
        .push_ascii(ascii_digit(hours % 10))
        .push_ascii(b':')
        .push_ascii(ascii_digit(minutes / 10))
        .push_ascii(ascii_digit(minutes % 10));
    if secs == 0 {
        return id;
    }
    id.push_ascii(b':')
        .push_ascii(ascii_digit(secs / 10))
        .push_ascii(ascii_digit(secs % 10))
}

const fn ascii_digit(n: u32) -> u8 {
    b'0' + (n as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ids() {
        assert_eq!(ZoneOffset::UTC.id(), "Z");
        assert_eq!(ZoneOffset::MIN.id(), "-18:00");
        assert_eq!(ZoneOffset::MAX.id(), "+18:00");
        assert_eq!(ZoneOffset::from_seconds(1).unwrap().id(), "+00:00:01");
        assert_eq!(ZoneOffset::from_seconds(-59).unwrap().id(), "-00:00:59");
        assert_eq!(
            ZoneOffset::from_seconds(-(9 * 3600 + 59 * 60 + 7)).unwrap().id(),
            "-09:59:07",
        );
    }

    #[test]
    fn parse_accepted_forms() {
        let cases = [
            ("Z", 0),
            ("+0", 0),
            ("-0", 0),
            ("+5", 5 * 3600),
            ("-9", -9 * 3600),
            ("+05", 5 * 3600),
            ("-12", -12 * 3600),
            ("+0530", 5 * 3600 + 30 * 60),
            ("+05:30", 5 * 3600 + 30 * 60),
            ("-023015", -(2 * 3600 + 30 * 60 + 15)),
            ("-02:30:15", -(2 * 3600 + 30 * 60 + 15)),
            ("+18:00:00", 18 * 3600),
            ("-18", -18 * 3600),
        ];
        for (text, seconds) in cases {
            let offset = ZoneOffset::parse(text).unwrap();
            assert_eq!(offset.seconds(), seconds, "parsing {text:?}");
        }
        // Zero is always `Z`, regardless of the sign given.
        assert_eq!(ZoneOffset::parse("-00:00").unwrap().id(), "Z");
    }

    #[test]
    fn parse_invalid_format() {
        insta::assert_snapshot!(
            ZoneOffset::parse("").unwrap_err(),
            @"invalid time zone offset ``: expected one of `Z`, `±h`, `±hh`, `±hhmm`, `±hh:mm`, `±hhmmss` or `±hh:mm:ss`",
        );
        insta::assert_snapshot!(
            ZoneOffset::parse("+1:00").unwrap_err(),
            @"invalid time zone offset `+1:00`: expected exactly two ASCII digits for each component",
        );
        insta::assert_snapshot!(
            ZoneOffset::parse("+01-00").unwrap_err(),
            @"invalid time zone offset `+01-00`: expected `:` separator between components",
        );
        insta::assert_snapshot!(
            ZoneOffset::parse("*01:00").unwrap_err(),
            @"invalid time zone offset `*01:00`: expected `+` or `-` as the first character",
        );
        for text in [
            "z", "+", "1", "01", "+1a", "+0100:", "+01:00:0", "+01:0000",
            "+01:00:00:00", "+aa:bb", "05:00",
        ] {
            let err = ZoneOffset::parse(text).unwrap_err();
            assert!(err.is_invalid_format(), "parsing {text:?}: {err}");
        }
    }

    #[test]
    fn parse_invalid_range() {
        insta::assert_snapshot!(
            ZoneOffset::parse("+19").unwrap_err(),
            @"parameter 'time zone offset hours' is not in the required range of -18..=18",
        );
        insta::assert_snapshot!(
            ZoneOffset::parse("+18:00:01").unwrap_err(),
            @"time zone offset total seconds 64801 is not in the valid range of -64800..=64800 (-18:00 to +18:00)",
        );
        insta::assert_snapshot!(
            ZoneOffset::parse("+01:60").unwrap_err(),
            @"parameter 'time zone offset minutes' is not in the required range of -59..=59",
        );
        for text in ["-18:30", "+99", "+00:00:60", "-1801"] {
            let err = ZoneOffset::parse(text).unwrap_err();
            assert!(err.is_range(), "parsing {text:?}: {err}");
        }
    }

    #[test]
    fn hms_sign_mismatch() {
        let err = ZoneOffset::from_hms(0, 30, -1).unwrap_err();
        assert!(err.is_range());
        insta::assert_snapshot!(
            err,
            @"time zone offset components (hours=0, minutes=30, seconds=-1) must not have mixed signs",
        );
        assert!(ZoneOffset::from_hms(1, -30, 0).is_err());
        assert!(ZoneOffset::from_hms(0, -30, -1).is_ok());
        assert_eq!(ZoneOffset::from_hours_minutes(0, -30).unwrap().id(), "-00:30");
    }

    #[test]
    fn seconds_range() {
        assert_eq!(
            ZoneOffset::from_seconds(-64_800).unwrap(),
            ZoneOffset::MIN
        );
        assert!(ZoneOffset::from_seconds(-64_801).unwrap_err().is_range());
        assert!(ZoneOffset::from_seconds(i32::MAX).unwrap_err().is_range());
    }

    #[test]
    fn ordering_is_descending() {
        let ten = ZoneOffset::from_seconds(36_000).unwrap();
        let nine = ZoneOffset::from_seconds(32_400).unwrap();
        assert_eq!(ten.cmp(&nine), core::cmp::Ordering::Less);
        let mut offsets = vec![ZoneOffset::MIN, ZoneOffset::UTC, ZoneOffset::MAX];
        offsets.sort();
        assert_eq!(offsets, vec![ZoneOffset::MAX, ZoneOffset::UTC, ZoneOffset::MIN]);
    }

    #[test]
    fn negate() {
        assert_eq!(ZoneOffset::MAX.negate(), ZoneOffset::MIN);
        assert_eq!(ZoneOffset::UTC.negate(), ZoneOffset::UTC);
        let odd = ZoneOffset::from_seconds(3601).unwrap();
        assert_eq!(odd.negate().id(), "-01:00:01");
    }

    #[test]
    fn concurrent_construction_agrees() {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..100)
                        .map(|_| ZoneOffset::from_seconds(3600).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let expected = ZoneOffset::from_hours(1).unwrap();
        for handle in handles {
            for offset in handle.join().unwrap() {
                assert_eq!(offset, expected);
                assert_eq!(offset.id(), "+01:00");
            }
        }
    }

    quickcheck::quickcheck! {
        fn prop_seconds_roundtrip(seconds: i32) -> bool {
            match ZoneOffset::from_seconds(seconds) {
                Ok(offset) => offset.seconds() == seconds,
                Err(err) => err.is_range() && seconds.unsigned_abs() > 64_800,
            }
        }

        fn prop_id_roundtrip(seconds: i32) -> quickcheck::TestResult {
            let Ok(offset) = ZoneOffset::from_seconds(seconds % 64_801) else {
                return quickcheck::TestResult::discard();
            };
            let reparsed = ZoneOffset::parse(offset.id()).unwrap();
            quickcheck::TestResult::from_bool(
                reparsed == offset && reparsed.id() == offset.id(),
            )
        }
    }
}
