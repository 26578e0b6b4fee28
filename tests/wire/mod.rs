use zoneclock::{
    fmt::wire::{self, WireTag, WireValue},
    tz::{ZoneId, ZoneOffset, ZoneRegion},
    SignedDuration, Timestamp,
};

use crate::{setup, Result};

fn roundtrip(value: &WireValue) -> std::result::Result<WireValue, zoneclock::Error> {
    let mut buf = vec![];
    value.write(&mut buf)?;
    assert_eq!(buf[0], value.tag().get());
    wire::decode(&mut &buf[..])
}

#[test]
fn paris_round_trips_through_region_tag() -> Result {
    setup();

    let zone = ZoneId::parse("Europe/Paris")?;
    let mut buf = vec![];
    wire::encode(7, &WireValue::from(zone.clone()), &mut buf)?;
    insta::assert_snapshot!(
        format!("{buf:?}"),
        @"[7, 0, 12, 69, 117, 114, 111, 112, 101, 47, 80, 97, 114, 105, 115]",
    );

    let WireValue::Region(region) = wire::decode(&mut &buf[..])? else {
        panic!("expected a region")
    };
    assert_eq!(region.id(), "Europe/Paris");
    assert_eq!(ZoneId::from(region.clone()), zone);
    // The rules are available since Paris is registered.
    assert!(!region.rules()?.is_fixed_offset());
    Ok(())
}

#[test]
fn unknown_regions_decode_leniently() -> Result {
    setup();

    let region = ZoneRegion::parse_lenient("Antarctica/Troll")?;
    let WireValue::Region(decoded) = roundtrip(&WireValue::Region(region))?
    else {
        panic!("expected a region")
    };
    assert_eq!(decoded.id(), "Antarctica/Troll");
    assert!(decoded.rules().unwrap_err().is_unknown_region());
    Ok(())
}

#[test]
fn mixed_stream() -> Result {
    setup();

    let values = vec![
        WireValue::from(SignedDuration::new(-3_600, -1)),
        WireValue::from(Timestamp::new(1_700_000_000, 5)?),
        WireValue::from(ZoneOffset::parse("+05:30")?),
        WireValue::from(ZoneOffset::parse("-00:00:01")?),
        WireValue::from(ZoneId::parse("Asia/Kolkata")?),
        WireValue::from(ZoneId::parse("GMT-03:00")?),
    ];
    let mut buf = vec![];
    for value in values.iter() {
        value.write(&mut buf)?;
    }

    let mut source = &buf[..];
    let mut decoded = vec![];
    while !source.is_empty() {
        decoded.push(wire::decode(&mut source)?);
    }
    assert_eq!(decoded, values);
    Ok(())
}

#[test]
fn reserved_tags_are_rejected_both_ways() {
    let value = WireValue::from(Timestamp::UNIX_EPOCH);
    for byte in 3..=14 {
        let Some(tag) = WireTag::new(byte) else { unreachable!() };
        if tag.is_supported() {
            continue;
        }
        let err = wire::encode(byte, &value, &mut vec![]).unwrap_err();
        assert!(err.is_unknown_encode_type(), "{byte}: {err}");
        let err = wire::decode(&mut &[byte][..]).unwrap_err();
        assert!(err.is_unknown_decode_type(), "{byte}: {err}");
        assert_ne!(
            wire::encode(byte, &value, &mut vec![]).unwrap_err().to_string(),
            err.to_string(),
        );
    }
}

#[test]
fn truncated_records_are_io_errors() {
    let mut buf = vec![];
    WireValue::from(ZoneOffset::parse("+00:00:30").unwrap())
        .write(&mut buf)
        .unwrap();
    assert_eq!(buf, [8, 127, 0, 0, 0, 30]);
    for len in 0..buf.len() {
        let err = wire::decode(&mut &buf[..len]).unwrap_err();
        assert!(err.is_io(), "prefix of length {len}: {err}");
    }
    assert_eq!(
        roundtrip(&WireValue::from(ZoneOffset::parse("+00:00:30").unwrap()))
            .unwrap(),
        WireValue::Offset(ZoneOffset::from_seconds(30).unwrap()),
    );
}
