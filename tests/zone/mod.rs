use std::collections::HashSet;

use zoneclock::{
    tz::{self, ZoneId, ZoneOffset, ZoneRegion},
    Timestamp,
};

use crate::{setup, Result, PARIS_DST_END_2024, PARIS_DST_START_2024};

#[test]
fn paris_rules_through_identity() -> Result {
    setup();

    let zone = ZoneId::parse("Europe/Paris")?;
    assert_eq!(zone.id(), "Europe/Paris");
    let rules = zone.rules()?;
    assert!(!rules.is_fixed_offset());

    let at = |second| Timestamp::from_second(second).unwrap();
    assert_eq!(rules.offset_at(at(PARIS_DST_START_2024 - 1)).id(), "+01:00");
    assert_eq!(rules.offset_at(at(PARIS_DST_START_2024)).id(), "+02:00");
    assert_eq!(rules.offset_at(at(PARIS_DST_END_2024 - 1)).id(), "+02:00");
    assert_eq!(rules.offset_at(at(PARIS_DST_END_2024)).id(), "+01:00");
    Ok(())
}

#[test]
fn strict_and_lenient_regions() -> Result {
    setup();

    let err = ZoneId::parse("Europe/Atlantis").unwrap_err();
    assert!(err.is_unknown_region());
    insta::assert_snapshot!(
        err,
        @"unknown time zone region `Europe/Atlantis`: no registered rules provider has rules for it",
    );

    let zone = ZoneId::parse_lenient("Europe/Atlantis")?;
    assert_eq!(zone.id(), "Europe/Atlantis");
    assert!(zone.rules().unwrap_err().is_unknown_region());

    // Lenient parsing still picks up rules that are available.
    let zone = ZoneId::parse_lenient("Asia/Kolkata")?;
    assert_eq!(zone.rules()?.offset_at(Timestamp::UNIX_EPOCH).id(), "+05:30");

    assert!(tz::db().contains("America/Sao_Paulo"));
    assert!(ZoneId::available_region_ids().contains("Europe/Paris"));
    Ok(())
}

#[test]
fn identity_is_not_rules() -> Result {
    setup();

    // Same rules, different identities.
    let kolkata = ZoneId::parse("Asia/Kolkata")?;
    let offset = ZoneId::parse("+05:30")?;
    assert_ne!(kolkata, offset);
    assert_eq!(
        kolkata.rules()?.offset_at(Timestamp::UNIX_EPOCH),
        offset.rules()?.offset_at(Timestamp::UNIX_EPOCH),
    );

    // Regions with fixed rules normalize to an offset, others don't.
    let gmt = ZoneId::parse("GMT+05:30")?;
    assert_ne!(gmt, offset);
    assert_eq!(gmt.normalized(), offset);
    assert_eq!(kolkata.normalized(), offset);
    let paris = ZoneId::parse("Europe/Paris")?;
    assert_eq!(paris.normalized(), paris);
    Ok(())
}

#[test]
fn equal_identities_hash_equal() -> Result {
    setup();

    let mut set = HashSet::new();
    for text in [
        "+01:00",
        "+01",
        "+0100",
        "+01:00:00",
        "Z",
        "+00:00",
        "-00",
        "Europe/Paris",
        "UTC",
        "UTC+01:00",
        "UTC+1",
    ] {
        set.insert(ZoneId::parse(text)?);
    }
    let mut ids: Vec<&str> = set.iter().map(|zone| zone.id()).collect();
    ids.sort();
    assert_eq!(ids, ["+01:00", "Europe/Paris", "UTC", "UTC+01:00", "Z"]);
    Ok(())
}

#[test]
fn regions_compare_by_identifier() -> Result {
    setup();

    let lenient = ZoneRegion::parse_lenient("Europe/Paris")?;
    let strict = ZoneRegion::parse("Europe/Paris")?;
    assert_eq!(lenient, strict);

    let mut regions = vec![
        ZoneRegion::parse("Europe/Paris")?,
        ZoneRegion::parse("America/Sao_Paulo")?,
        ZoneRegion::parse("Asia/Kolkata")?,
    ];
    regions.sort();
    let ids: Vec<&str> = regions.iter().map(|r| r.id()).collect();
    assert_eq!(ids, ["America/Sao_Paulo", "Asia/Kolkata", "Europe/Paris"]);
    Ok(())
}

#[test]
fn aliases() -> Result {
    setup();

    let zone = ZoneId::parse_with_aliases("ECT", ZoneId::SHORT_IDS)?;
    assert_eq!(zone.id(), "Europe/Paris");
    let custom = [("Paris", "Europe/Paris"), ("IST", "+05:30")];
    assert_eq!(ZoneId::parse_with_aliases("IST", &custom)?.id(), "+05:30");
    assert!(ZoneId::parse("ECT").unwrap_err().is_unknown_region());
    Ok(())
}

#[test]
fn concurrent_parsing_agrees() {
    setup();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| {
                (-72..=72)
                    .map(|quarters: i32| {
                        let offset =
                            ZoneOffset::from_seconds(quarters * 900).unwrap();
                        let parsed = ZoneOffset::parse(offset.id()).unwrap();
                        assert_eq!(offset.id(), parsed.id());
                        parsed
                    })
                    .collect::<Vec<ZoneOffset>>()
            })
        })
        .collect();
    let first = ZoneOffset::from_hours(-18).unwrap();
    for handle in handles {
        let offsets = handle.join().unwrap();
        assert_eq!(offsets.len(), 145);
        assert_eq!(offsets[0], first);
        for pair in offsets.windows(2) {
            assert_eq!(pair[1].seconds() - pair[0].seconds(), 900);
        }
    }
}

#[cfg(feature = "serde")]
#[test]
fn serde_uses_identifiers() -> Result {
    setup();

    #[derive(Debug, serde::Deserialize, serde::Serialize)]
    struct Meeting {
        zone: ZoneId,
        offset: ZoneOffset,
    }

    let meeting = Meeting {
        zone: ZoneId::parse("Europe/Paris")?,
        offset: ZoneOffset::parse("-0330")?,
    };
    let json = serde_json::to_string(&meeting).unwrap();
    assert_eq!(json, r#"{"zone":"Europe/Paris","offset":"-03:30"}"#);

    let got: Meeting = serde_json::from_str(
        r#"{"zone":"Pacific/Unknown","offset":"+05"}"#,
    )
    .unwrap();
    assert_eq!(got.zone.id(), "Pacific/Unknown");
    assert_eq!(got.offset.seconds(), 18_000);

    let err = serde_json::from_str::<Meeting>(
        r#"{"zone":"Europe/Paris","offset":"+5:00"}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("`+5:00`"), "{err}");
    Ok(())
}
