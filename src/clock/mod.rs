/*!
Clocks: sources of the current instant that are bound to a time zone.

A [`Clock`] answers two questions: "what is the current instant?" and "which
zone should that instant be interpreted in?" The system clock reads the
operating system's real-time clock, while the other kinds of clocks either
return a fixed instant, wrap another clock to shift or truncate its readings,
or delegate to an arbitrary [`InstantSource`].

Every clock is immutable and cheap to clone. Composition never mutates the
clock being composed: [`Clock::offset`], [`Clock::tick`] and
[`Clock::with_zone`] all return new clocks.

# Example

This shows how to build a clock that is a fixed instant shifted by one hour
and truncated to whole minutes, which is the kind of clock that is useful in
tests:

```
use zoneclock::{clock::Clock, tz::ZoneId, SignedDuration, Timestamp};

let zone = ZoneId::parse("+09:00")?;
let fixed = Clock::fixed(Timestamp::new(1_700_000_000, 123_456_789)?, zone);
let shifted = Clock::offset(fixed, SignedDuration::from_secs(3600));
let ticking = Clock::tick(shifted, SignedDuration::from_secs(60))?;

let ts = ticking.instant()?;
assert_eq!(ts.as_second(), 1_700_003_580);
assert_eq!(ts.subsec_nanosecond(), 0);
assert_eq!(ticking.zone().id(), "+09:00");

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use std::sync::Arc;

use crate::{
    error::clock::Error as E,
    tz::{ZoneId, ZoneOffset},
    Error, SignedDuration, Timestamp,
};

pub(crate) mod system;

const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A source of the current instant, with no notion of a time zone.
///
/// This is the capability that underlies every [`Clock`]. Implement it to
/// plug a custom time source (for example, a simulated clock in tests) into
/// [`Clock::from_source`].
///
/// # Example
///
/// ```
/// use std::sync::{atomic::{AtomicI64, Ordering}, Arc};
///
/// use zoneclock::{clock::{Clock, InstantSource}, tz::ZoneId, Error, Timestamp};
///
/// /// A source that advances by one second each time it is read.
/// #[derive(Debug, Default)]
/// struct Stepping(AtomicI64);
///
/// impl InstantSource for Stepping {
///     fn instant(&self) -> Result<Timestamp, Error> {
///         Timestamp::from_second(self.0.fetch_add(1, Ordering::Relaxed))
///     }
/// }
///
/// let clock = Clock::from_source(Arc::new(Stepping::default()), ZoneId::parse("Z")?);
/// assert_eq!(clock.instant()?.as_second(), 0);
/// assert_eq!(clock.millis()?, 1_000);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait InstantSource: core::fmt::Debug + Send + Sync {
    /// Returns the current instant.
    fn instant(&self) -> Result<Timestamp, Error>;

    /// Returns the current number of milliseconds since the Unix epoch.
    ///
    /// The default implementation derives this from
    /// [`InstantSource::instant`]. Implementations that can read
    /// milliseconds more cheaply should override it.
    fn millis(&self) -> Result<i64, Error> {
        self.instant()?.as_millisecond()
    }
}

/// A source of the current instant bound to a time zone.
///
/// See the [module documentation](self) for an overview.
///
/// # Equality
///
/// Clocks compare structurally: two system clocks are equal when their zones
/// are, two fixed clocks when their instants and zones are, and so on for
/// the wrapping clocks. Clocks built from an [`InstantSource`] are equal only
/// when they share the very same source.
#[derive(Clone)]
pub struct Clock {
    kind: Arc<ClockKind>,
}

#[derive(Debug)]
enum ClockKind {
    System { zone: ZoneId },
    Fixed { instant: Timestamp, zone: ZoneId },
    Offset { base: Clock, duration: SignedDuration },
    Tick { base: Clock, tick_nanos: i64 },
    Source { source: Arc<dyn InstantSource>, zone: ZoneId },
}

impl Clock {
    /// Returns a clock that reads the operating system's real-time clock,
    /// bound to the given zone.
    pub fn system(zone: ZoneId) -> Clock {
        Clock::from_kind(ClockKind::System { zone })
    }

    /// Returns a system clock bound to UTC.
    pub fn system_utc() -> Clock {
        Clock::system(ZoneId::Offset(ZoneOffset::UTC))
    }

    /// Returns a system clock bound to the system's default zone.
    ///
    /// See [`ZoneId::system_default`] for how the default is determined.
    pub fn system_default_zone() -> Clock {
        Clock::system(ZoneId::system_default())
    }

    /// Returns a clock that always reports the given instant.
    pub fn fixed(instant: Timestamp, zone: ZoneId) -> Clock {
        Clock::from_kind(ClockKind::Fixed { instant, zone })
    }

    /// Returns a clock that adds the given duration to every reading of
    /// `base`.
    ///
    /// If the duration is zero, then `base` itself is returned.
    ///
    /// Reading the clock fails if the addition overflows.
    pub fn offset(base: Clock, duration: SignedDuration) -> Clock {
        if duration.is_zero() {
            return base;
        }
        Clock::from_kind(ClockKind::Offset { base, duration })
    }

    /// Returns a clock that truncates every reading of `base` down to a
    /// multiple of the given duration.
    ///
    /// Truncation is toward negative infinity. A tick of zero or one
    /// nanosecond returns `base` itself.
    ///
    /// # Errors
    ///
    /// When the duration is negative, when it doesn't fit in a 64-bit
    /// number of nanoseconds, or when it is neither a whole number of
    /// milliseconds nor an exact divisor of one second.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::{clock::Clock, SignedDuration};
    ///
    /// let base = Clock::system_utc();
    /// assert!(Clock::tick(base.clone(), SignedDuration::from_millis(1_500)).is_ok());
    /// assert!(Clock::tick(base.clone(), SignedDuration::from_nanos(250)).is_ok());
    /// assert!(Clock::tick(base.clone(), SignedDuration::from_nanos(3_000_001)).is_err());
    /// assert!(Clock::tick(base.clone(), SignedDuration::from_secs(-1)).is_err());
    /// assert_eq!(Clock::tick(base.clone(), SignedDuration::from_nanos(1))?, base);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn tick(base: Clock, duration: SignedDuration) -> Result<Clock, Error> {
        if duration.is_negative() {
            return Err(Error::from(E::NegativeTick));
        }
        let tick_nanos =
            duration.as_nanos().map_err(|_| Error::from(E::TickOverflow))?;
        if tick_nanos % NANOS_PER_MILLI != 0
            && NANOS_PER_SEC % tick_nanos != 0
        {
            return Err(Error::from(E::InvalidTick { duration }));
        }
        if tick_nanos <= 1 {
            return Ok(base);
        }
        Ok(Clock::from_kind(ClockKind::Tick { base, tick_nanos }))
    }

    /// Returns a system clock, bound to the given zone, that ticks in whole
    /// milliseconds.
    pub fn tick_millis(zone: ZoneId) -> Clock {
        Clock::ticking_system(zone, NANOS_PER_MILLI)
    }

    /// Returns a system clock, bound to the given zone, that ticks in whole
    /// seconds.
    pub fn tick_seconds(zone: ZoneId) -> Clock {
        Clock::ticking_system(zone, NANOS_PER_SEC)
    }

    /// Returns a system clock, bound to the given zone, that ticks in whole
    /// minutes.
    pub fn tick_minutes(zone: ZoneId) -> Clock {
        Clock::ticking_system(zone, 60 * NANOS_PER_SEC)
    }

    /// Returns a clock that reads the given source, bound to the given zone.
    pub fn from_source(source: Arc<dyn InstantSource>, zone: ZoneId) -> Clock {
        Clock::from_kind(ClockKind::Source { source, zone })
    }

    /// Returns the zone this clock is bound to.
    pub fn zone(&self) -> &ZoneId {
        match *self.kind {
            ClockKind::System { ref zone }
            | ClockKind::Fixed { ref zone, .. }
            | ClockKind::Source { ref zone, .. } => zone,
            ClockKind::Offset { ref base, .. }
            | ClockKind::Tick { ref base, .. } => base.zone(),
        }
    }

    /// Returns a copy of this clock bound to the given zone.
    ///
    /// Wrapping clocks rebind the clock they wrap. If the zone is equal to
    /// the current one, then this returns a clone of `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::{clock::Clock, tz::ZoneId, SignedDuration};
    ///
    /// let utc = Clock::tick_seconds(ZoneId::parse("Z")?);
    /// let east = utc.with_zone(ZoneId::parse("+03:00")?);
    /// assert_eq!(east.zone().id(), "+03:00");
    /// assert_eq!(east, Clock::tick(Clock::system(ZoneId::parse("+03")?), SignedDuration::from_secs(1))?);
    /// assert_eq!(utc.zone().id(), "Z");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_zone(&self, zone: ZoneId) -> Clock {
        if *self.zone() == zone {
            return self.clone();
        }
        let kind = match *self.kind {
            ClockKind::System { .. } => ClockKind::System { zone },
            ClockKind::Fixed { instant, .. } => {
                ClockKind::Fixed { instant, zone }
            }
            ClockKind::Offset { ref base, duration } => {
                ClockKind::Offset { base: base.with_zone(zone), duration }
            }
            ClockKind::Tick { ref base, tick_nanos } => {
                ClockKind::Tick { base: base.with_zone(zone), tick_nanos }
            }
            ClockKind::Source { ref source, .. } => {
                ClockKind::Source { source: Arc::clone(source), zone }
            }
        };
        Clock::from_kind(kind)
    }

    /// Returns the current instant according to this clock.
    ///
    /// # Errors
    ///
    /// When an offset clock overflows the range of a [`Timestamp`], or when
    /// a custom [`InstantSource`] fails.
    ///
    /// # Panics
    ///
    /// When the operating system's clock reports an instant outside the
    /// range of a [`Timestamp`].
    pub fn instant(&self) -> Result<Timestamp, Error> {
        match *self.kind {
            ClockKind::System { .. } => system::instant(),
            ClockKind::Fixed { instant, .. } => Ok(instant),
            ClockKind::Offset { ref base, duration } => base
                .instant()?
                .checked_add(duration)
                .map_err(|_| Error::from(E::OffsetOverflow)),
            ClockKind::Tick { ref base, tick_nanos } => {
                if tick_nanos % NANOS_PER_MILLI == 0 {
                    let millis = base.millis()?;
                    let millis =
                        truncate(millis, tick_nanos / NANOS_PER_MILLI)?;
                    return Timestamp::from_millisecond(millis);
                }
                // Otherwise the tick divides one second evenly, so the
                // truncated instant is always within the same second.
                let instant = base.instant()?;
                let nanos = i64::from(instant.subsec_nanosecond());
                Timestamp::new(
                    instant.as_second(),
                    nanos - nanos.rem_euclid(tick_nanos),
                )
            }
            ClockKind::Source { ref source, .. } => source.instant(),
        }
    }

    /// Returns the current number of milliseconds since the Unix epoch
    /// according to this clock.
    ///
    /// A ticking clock whose tick is less than one millisecond returns the
    /// milliseconds of the clock it wraps unchanged.
    ///
    /// # Errors
    ///
    /// When the reading doesn't fit in an `i64` number of milliseconds, or
    /// when a custom [`InstantSource`] fails.
    pub fn millis(&self) -> Result<i64, Error> {
        match *self.kind {
            ClockKind::System { .. } => Ok(system::millis()),
            ClockKind::Fixed { instant, .. } => instant.as_millisecond(),
            ClockKind::Offset { ref base, duration } => {
                let base = base.millis()?;
                duration
                    .as_millis()
                    .ok()
                    .and_then(|millis| base.checked_add(millis))
                    .ok_or_else(|| Error::from(E::OffsetOverflow))
            }
            ClockKind::Tick { ref base, tick_nanos } => {
                let millis = base.millis()?;
                match tick_nanos / NANOS_PER_MILLI {
                    0 => Ok(millis),
                    tick_millis => truncate(millis, tick_millis),
                }
            }
            ClockKind::Source { ref source, .. } => source.millis(),
        }
    }

    fn ticking_system(zone: ZoneId, tick_nanos: i64) -> Clock {
        let base = Clock::system(zone);
        Clock::from_kind(ClockKind::Tick { base, tick_nanos })
    }

    fn from_kind(kind: ClockKind) -> Clock {
        Clock { kind: Arc::new(kind) }
    }
}

impl InstantSource for Clock {
    fn instant(&self) -> Result<Timestamp, Error> {
        Clock::instant(self)
    }

    fn millis(&self) -> Result<i64, Error> {
        Clock::millis(self)
    }
}

impl Eq for Clock {}

impl PartialEq for Clock {
    fn eq(&self, rhs: &Clock) -> bool {
        use self::ClockKind::*;

        if Arc::ptr_eq(&self.kind, &rhs.kind) {
            return true;
        }
        match (&*self.kind, &*rhs.kind) {
            (System { zone: z1 }, System { zone: z2 }) => z1 == z2,
            (
                Fixed { instant: i1, zone: z1 },
                Fixed { instant: i2, zone: z2 },
            ) => i1 == i2 && z1 == z2,
            (
                Offset { base: b1, duration: d1 },
                Offset { base: b2, duration: d2 },
            ) => d1 == d2 && b1 == b2,
            (
                Tick { base: b1, tick_nanos: t1 },
                Tick { base: b2, tick_nanos: t2 },
            ) => t1 == t2 && b1 == b2,
            (
                Source { source: s1, zone: z1 },
                Source { source: s2, zone: z2 },
            ) => {
                let (p1, p2) = (Arc::as_ptr(s1), Arc::as_ptr(s2));
                p1 as *const () == p2 as *const () && z1 == z2
            }
            _ => false,
        }
    }
}

impl core::fmt::Debug for Clock {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.kind, f)
    }
}

/// Truncates the given milliseconds down to a multiple of `tick_millis`.
fn truncate(millis: i64, tick_millis: i64) -> Result<i64, Error> {
    millis
        .checked_sub(millis.rem_euclid(tick_millis))
        .ok_or_else(|| Error::from(E::TruncateOverflow { millis }))
}
