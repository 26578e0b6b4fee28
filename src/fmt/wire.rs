/*!
A tagged binary wire format for durations, instants, offsets and regions.

Every record is a single type tag byte (see [`WireTag`]) followed by the
value's own encoding. All integers are big-endian.

| Tag | Value            | Encoding                                          |
| --- | ---------------- | ------------------------------------------------- |
| `1` | [`SignedDuration`] | `i64` seconds, then `i32` nanoseconds           |
| `2` | [`Timestamp`]    | `i64` seconds, then `i32` nanoseconds             |
| `7` | [`ZoneRegion`]   | `u16` length, then that many bytes of UTF-8       |
| `8` | [`ZoneOffset`]   | `i8` quarter hours, or `127` then `i32` seconds   |

The remaining tags in `1..=14` are reserved for calendar types that this
crate doesn't define. Encoding or decoding them fails, but with different
errors: see [`Error::is_unknown_encode_type`] and
[`Error::is_unknown_decode_type`].

Regions are decoded leniently. That is, a region whose rules aren't known
to [`tz::db()`](crate::tz::db) still decodes successfully, and its rules are
looked up when they are first needed.

# Example

```
use zoneclock::{fmt::wire::{self, WireValue}, tz::ZoneOffset};

let offset = ZoneOffset::parse("+05:30")?;
let mut buf = vec![];
WireValue::Offset(offset).write(&mut buf)?;
assert_eq!(buf, [8, 22]);

let value = wire::decode(&mut &buf[..])?;
assert_eq!(value, WireValue::Offset(offset));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use std::io;

use crate::{
    error::{wire::Error as E, ErrorContext},
    tz::{ZoneId, ZoneOffset, ZoneRegion},
    Error, SignedDuration, Timestamp,
};

/// The marker byte for an offset that isn't a whole number of quarter hours.
const OFFSET_IN_SECONDS: i8 = 127;

/// The seconds in one quarter hour, the unit of the compact offset encoding.
const QUARTER_HOUR: i32 = 900;

/// The type tags of the wire format.
///
/// Only [`WireTag::Duration`], [`WireTag::Instant`], [`WireTag::Region`] and
/// [`WireTag::Offset`] have values in this crate. The others are reserved.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
#[non_exhaustive]
pub enum WireTag {
    /// A [`SignedDuration`].
    Duration = 1,
    /// A [`Timestamp`].
    Instant = 2,
    /// Reserved for a calendar date.
    LocalDate = 3,
    /// Reserved for a wall clock time.
    LocalTime = 4,
    /// Reserved for a calendar date and wall clock time.
    LocalDateTime = 5,
    /// Reserved for a datetime in a time zone.
    ZonedDateTime = 6,
    /// A [`ZoneRegion`].
    Region = 7,
    /// A [`ZoneOffset`].
    Offset = 8,
    /// Reserved for a wall clock time with an offset.
    OffsetTime = 9,
    /// Reserved for a datetime with an offset.
    OffsetDateTime = 10,
    /// Reserved for a year.
    Year = 11,
    /// Reserved for a year and month.
    YearMonth = 12,
    /// Reserved for a month and day.
    MonthDay = 13,
    /// Reserved for a calendar period.
    Period = 14,
}

impl WireTag {
    /// Returns the tag for the given byte, if one exists.
    pub fn new(byte: u8) -> Option<WireTag> {
        use self::WireTag::*;

        Some(match byte {
            1 => Duration,
            2 => Instant,
            3 => LocalDate,
            4 => LocalTime,
            5 => LocalDateTime,
            6 => ZonedDateTime,
            7 => Region,
            8 => Offset,
            9 => OffsetTime,
            10 => OffsetDateTime,
            11 => Year,
            12 => YearMonth,
            13 => MonthDay,
            14 => Period,
            _ => return None,
        })
    }

    /// Returns the byte for this tag.
    #[inline]
    pub fn get(self) -> u8 {
        self as u8
    }

    /// Returns true if values with this tag can be encoded and decoded by
    /// this crate.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            WireTag::Duration
                | WireTag::Instant
                | WireTag::Region
                | WireTag::Offset
        )
    }
}

/// A value that can be written to or read from the wire format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WireValue {
    /// A duration, with tag `1`.
    Duration(SignedDuration),
    /// An instant, with tag `2`.
    Instant(Timestamp),
    /// A region, with tag `7`.
    Region(ZoneRegion),
    /// An offset, with tag `8`.
    Offset(ZoneOffset),
}

impl WireValue {
    /// Returns the tag that this value is written with.
    pub fn tag(&self) -> WireTag {
        match *self {
            WireValue::Duration(_) => WireTag::Duration,
            WireValue::Instant(_) => WireTag::Instant,
            WireValue::Region(_) => WireTag::Region,
            WireValue::Offset(_) => WireTag::Offset,
        }
    }

    /// Writes this value, preceded by its own tag, to the given sink.
    ///
    /// # Errors
    ///
    /// When writing to the sink fails, or when this is a region whose
    /// identifier is too long to encode.
    pub fn write<W: io::Write>(&self, sink: W) -> Result<(), Error> {
        encode(self.tag().get(), self, sink)
    }

    fn name(&self) -> &'static str {
        match *self {
            WireValue::Duration(_) => "duration",
            WireValue::Instant(_) => "instant",
            WireValue::Region(_) => "region",
            WireValue::Offset(_) => "offset",
        }
    }
}

impl From<SignedDuration> for WireValue {
    fn from(duration: SignedDuration) -> WireValue {
        WireValue::Duration(duration)
    }
}

impl From<Timestamp> for WireValue {
    fn from(timestamp: Timestamp) -> WireValue {
        WireValue::Instant(timestamp)
    }
}

impl From<ZoneRegion> for WireValue {
    fn from(region: ZoneRegion) -> WireValue {
        WireValue::Region(region)
    }
}

impl From<ZoneOffset> for WireValue {
    fn from(offset: ZoneOffset) -> WireValue {
        WireValue::Offset(offset)
    }
}

impl From<ZoneId> for WireValue {
    fn from(zone: ZoneId) -> WireValue {
        match zone {
            ZoneId::Offset(offset) => WireValue::Offset(offset),
            ZoneId::Region(region) => WireValue::Region(region),
        }
    }
}

/// Writes the given tag byte followed by the given value to a sink.
///
/// Nothing is written unless the tag and value are valid.
///
/// # Errors
///
/// When `tag` isn't the tag of `value` (which includes the case where
/// `tag` is reserved or not a tag at all), when writing to the sink fails,
/// or when a region identifier is too long to encode.
///
/// # Example
///
/// ```
/// use zoneclock::{fmt::wire::{self, WireValue}, SignedDuration};
///
/// let value = WireValue::Duration(SignedDuration::new(-1, -500));
/// let mut buf = vec![];
/// wire::encode(1, &value, &mut buf)?;
/// assert_eq!(buf, [
///     1,
///     255, 255, 255, 255, 255, 255, 255, 255,
///     255, 255, 254, 12,
/// ]);
///
/// let err = wire::encode(3, &value, &mut vec![]).unwrap_err();
/// assert!(err.is_unknown_encode_type());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode<W: io::Write>(
    tag: u8,
    value: &WireValue,
    mut sink: W,
) -> Result<(), Error> {
    if WireTag::new(tag) != Some(value.tag()) {
        return Err(Error::from(E::UnknownEncodeType {
            tag,
            value: value.name(),
        }));
    }
    let mut buf = vec![tag];
    match *value {
        WireValue::Duration(duration) => {
            buf.extend_from_slice(&duration.as_secs().to_be_bytes());
            buf.extend_from_slice(&duration.subsec_nanos().to_be_bytes());
        }
        WireValue::Instant(timestamp) => {
            buf.extend_from_slice(&timestamp.as_second().to_be_bytes());
            buf.extend_from_slice(&timestamp.subsec_nanosecond().to_be_bytes());
        }
        WireValue::Region(ref region) => {
            let id = region.id().as_bytes();
            let len = u16::try_from(id.len())
                .map_err(|_| Error::from(E::RegionIdTooLong { len: id.len() }))
                .context(E::Encode { what: "region" })?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(id);
        }
        WireValue::Offset(offset) => {
            let seconds = offset.seconds();
            if seconds % QUARTER_HOUR == 0 {
                // OK because offsets are at most 18 hours, which is 72
                // quarter hours.
                buf.push((seconds / QUARTER_HOUR) as i8 as u8);
            } else {
                buf.push(OFFSET_IN_SECONDS as u8);
                buf.extend_from_slice(&seconds.to_be_bytes());
            }
        }
    }
    sink.write_all(&buf)
        .map_err(Error::io)
        .context(E::Encode { what: value.name() })
}

/// Reads one tagged value from a source.
///
/// # Errors
///
/// When the tag isn't one that this crate can decode, when reading from the
/// source fails (including when it ends early), or when the value read is
/// invalid. A region identifier that is valid but unknown is not an error.
///
/// # Example
///
/// ```
/// use zoneclock::fmt::wire::{self, WireValue};
///
/// let bytes = [7, 0, 12, b'E', b'u', b'r', b'o', b'p', b'e', b'/', b'P', b'a', b'r', b'i', b's'];
/// let WireValue::Region(region) = wire::decode(&mut &bytes[..])? else {
///     unreachable!()
/// };
/// assert_eq!(region.id(), "Europe/Paris");
///
/// let err = wire::decode(&mut &[3u8][..]).unwrap_err();
/// assert!(err.is_unknown_decode_type());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode<R: io::Read>(mut source: R) -> Result<WireValue, Error> {
    let [tag] = read_array::<1, _>(&mut source).context(E::Decode { what: "tag" })?;
    match WireTag::new(tag) {
        Some(WireTag::Duration) => read_duration(&mut source)
            .map(WireValue::Duration)
            .context(E::Decode { what: "duration" }),
        Some(WireTag::Instant) => read_instant(&mut source)
            .map(WireValue::Instant)
            .context(E::Decode { what: "instant" }),
        Some(WireTag::Region) => read_region(&mut source)
            .map(WireValue::Region)
            .context(E::Decode { what: "region" }),
        Some(WireTag::Offset) => read_offset(&mut source)
            .map(WireValue::Offset)
            .context(E::Decode { what: "offset" }),
        _ => Err(Error::from(E::UnknownDecodeType { tag })),
    }
}

fn read_duration<R: io::Read>(source: &mut R) -> Result<SignedDuration, Error> {
    let seconds = i64::from_be_bytes(read_array(source)?);
    let nanoseconds = i32::from_be_bytes(read_array(source)?);
    // Balancing nanoseconds that are out of range or have the opposite sign
    // can carry into the seconds, so go through the checked addition.
    SignedDuration::from_secs(seconds)
        .checked_add(SignedDuration::new(0, nanoseconds))
        .ok_or_else(|| {
            Error::from(E::DurationOutOfRange { seconds, nanoseconds })
        })
}

fn read_instant<R: io::Read>(source: &mut R) -> Result<Timestamp, Error> {
    let second = i64::from_be_bytes(read_array(source)?);
    let nanosecond = i32::from_be_bytes(read_array(source)?);
    Timestamp::new(second, i64::from(nanosecond))
}

fn read_region<R: io::Read>(source: &mut R) -> Result<ZoneRegion, Error> {
    let len = u16::from_be_bytes(read_array(source)?);
    let mut id = vec![0; usize::from(len)];
    source.read_exact(&mut id).map_err(Error::io)?;
    let id = String::from_utf8(id).map_err(|_| Error::from(E::InvalidUtf8))?;
    match ZoneId::parse_lenient(&id)? {
        ZoneId::Region(region) => Ok(region),
        ZoneId::Offset(_) => Err(Error::from(E::UnexpectedOffset)),
    }
}

fn read_offset<R: io::Read>(source: &mut R) -> Result<ZoneOffset, Error> {
    let [byte] = read_array::<1, _>(source)?;
    let quarters = byte as i8;
    if quarters == OFFSET_IN_SECONDS {
        let seconds = i32::from_be_bytes(read_array(source)?);
        return ZoneOffset::from_seconds(seconds);
    }
    ZoneOffset::from_seconds(i32::from(quarters) * QUARTER_HOUR)
}

fn read_array<const N: usize, R: io::Read>(
    source: &mut R,
) -> Result<[u8; N], Error> {
    let mut buf = [0; N];
    source.read_exact(&mut buf).map_err(Error::io)?;
    Ok(buf)
}
