use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use zoneclock::{
    clock::{Clock, InstantSource},
    tz::ZoneId,
    Error, SignedDuration, Timestamp,
};

use crate::{setup, Result, PARIS_DST_START_2024};

/// A source that reports a settable number of milliseconds.
#[derive(Debug, Default)]
struct Manual {
    millis: AtomicI64,
}

impl Manual {
    fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl InstantSource for Manual {
    fn instant(&self) -> std::result::Result<Timestamp, Error> {
        Timestamp::from_millisecond(self.millis.load(Ordering::SeqCst))
    }
}

/// A source that always fails.
#[derive(Debug)]
struct Unreachable;

impl InstantSource for Unreachable {
    fn instant(&self) -> std::result::Result<Timestamp, Error> {
        Err(Error::from_args(format_args!("time server unreachable")))
    }
}

#[test]
fn composed_clock_tracks_source() -> Result {
    setup();

    let manual = Arc::new(Manual::default());
    let paris = ZoneId::parse("Europe/Paris")?;
    let base = Clock::from_source(manual.clone(), paris.clone());
    let clock = Clock::tick(
        Clock::offset(base, SignedDuration::from_millis(-250)),
        SignedDuration::from_secs(1),
    )?;
    assert_eq!(clock.zone(), &paris);

    manual.set(PARIS_DST_START_2024 * 1_000 + 1_249);
    assert_eq!(clock.instant()?.as_second(), PARIS_DST_START_2024);
    assert_eq!(clock.millis()?, PARIS_DST_START_2024 * 1_000);
    let offset = clock.zone().rules()?.offset_at(clock.instant()?);
    assert_eq!(offset.id(), "+02:00");

    manual.set(PARIS_DST_START_2024 * 1_000 + 249);
    assert_eq!(clock.instant()?.as_second(), PARIS_DST_START_2024 - 1);
    let offset = clock.zone().rules()?.offset_at(clock.instant()?);
    assert_eq!(offset.id(), "+01:00");
    Ok(())
}

#[test]
fn source_errors_propagate() {
    let clock = Clock::offset(
        Clock::from_source(Arc::new(Unreachable), ZoneId::parse("Z").unwrap()),
        SignedDuration::from_secs(1),
    );
    insta::assert_snapshot!(
        clock.instant().unwrap_err(),
        @"time server unreachable",
    );
    insta::assert_snapshot!(
        clock.millis().unwrap_err(),
        @"time server unreachable",
    );
}

#[test]
fn system_clock_moves_forward() -> Result {
    let clock = Clock::system_utc();
    let first = clock.instant()?;
    let second = clock.instant()?;
    let millis = clock.millis()?;
    assert!(first.as_second() > 1_704_067_200);
    // The system clock isn't monotonic, so allow a generous step back.
    assert!(second.as_second() >= first.as_second() - 60);
    assert!((millis / 1_000 - second.as_second()).abs() <= 60);
    Ok(())
}

#[test]
fn system_clocks_in_other_zones() -> Result {
    setup();

    let kolkata = ZoneId::parse("Asia/Kolkata")?;
    let clock = Clock::tick_seconds(ZoneId::parse("Z")?).with_zone(kolkata);
    assert_eq!(clock, Clock::tick_seconds(ZoneId::parse("Asia/Kolkata")?));
    assert_eq!(clock.instant()?.subsec_nanosecond(), 0);

    let offset = clock.zone().rules()?.offset_at(clock.instant()?);
    assert_eq!(offset.seconds(), 19_800);
    Ok(())
}

#[test]
fn clocks_are_shareable_across_threads() -> Result {
    let clock = Clock::fixed(
        Timestamp::from_second(86_400)?,
        ZoneId::parse("-05:00")?,
    );
    let clock = Clock::offset(clock, SignedDuration::from_secs(-86_400));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let clock = clock.clone();
            std::thread::spawn(move || clock.millis().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0);
    }
    Ok(())
}
