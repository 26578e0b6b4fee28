/*!
Process wide memoization of offsets that are a whole number of quarter hours.

Nearly every offset used in practice is a multiple of 15 minutes, so these are
worth sharing. There are exactly 145 such offsets in `-18:00..=+18:00`, which
means both tables can be fixed size arrays of write-once slots. Reads never
lock. Two threads racing to fill the same slot may both build a value, but
only one of them is ever published, and both get the published one back.

Entries are never evicted or replaced.
*/

use std::sync::OnceLock;

use crate::tz::ZoneOffset;

/// The granularity, in seconds, of offsets stored in these caches.
pub(crate) const QUARTER_HOUR: i32 = 15 * 60;

/// The number of quarter hours from `-18:00` to `+18:00`, inclusive.
const QUARTERS: usize = 145;

/// The number of slots in the by-identifier table.
///
/// This must be a power of two and strictly bigger than `QUARTERS` so that a
/// probe always terminates at an empty slot or a match.
const ID_SLOTS: usize = 256;

const EMPTY: OnceLock<ZoneOffset> = OnceLock::new();

static BY_SECONDS: [OnceLock<ZoneOffset>; QUARTERS] = [EMPTY; QUARTERS];
static BY_ID: [OnceLock<ZoneOffset>; ID_SLOTS] = [EMPTY; ID_SLOTS];

/// Returns the shared offset for the given total seconds, building it with
/// `make` if this is the first request for it.
///
/// Callers must only use this for multiples of `QUARTER_HOUR` within the
/// valid offset range. The offset is also published to the by-identifier
/// table.
pub(crate) fn offset_by_seconds(
    seconds: i32,
    make: impl FnOnce() -> ZoneOffset,
) -> ZoneOffset {
    debug_assert_eq!(seconds % QUARTER_HOUR, 0);
    // OK because the caller guarantees `-64800 <= seconds <= 64800`, which
    // puts the index in `0..=144`.
    let index = (seconds / QUARTER_HOUR + 72) as usize;
    let slot = &BY_SECONDS[index];
    if let Some(&offset) = slot.get() {
        return offset;
    }
    let offset = *slot.get_or_init(|| {
        let offset = make();
        trace!("caching time zone offset {offset} by total seconds");
        offset
    });
    insert_by_id(offset);
    offset
}

/// Looks for a previously cached offset whose canonical identifier is
/// exactly `id`.
pub(crate) fn offset_by_id(id: &str) -> Option<ZoneOffset> {
    let start = hash(id);
    for i in 0..ID_SLOTS {
        let slot = &BY_ID[(start + i) & (ID_SLOTS - 1)];
        match slot.get() {
            None => return None,
            Some(offset) if offset.id() == id => return Some(*offset),
            Some(_) => {}
        }
    }
    None
}

/// Publishes the given offset under its canonical identifier, unless an
/// entry for that identifier already exists.
fn insert_by_id(offset: ZoneOffset) {
    let id = offset.id();
    let start = hash(id);
    for i in 0..ID_SLOTS {
        let slot = &BY_ID[(start + i) & (ID_SLOTS - 1)];
        let mut inserted = false;
        let winner = slot.get_or_init(|| {
            inserted = true;
            offset
        });
        if winner.id() == id {
            if inserted {
                trace!("caching time zone offset {offset} by identifier");
            }
            return;
        }
    }
}

/// FNV-1a over the bytes of an identifier, reduced to a table index.
fn hash(id: &str) -> usize {
    let mut h: u32 = 0x811c9dc5;
    for &byte in id.as_bytes() {
        h ^= u32::from(byte);
        h = h.wrapping_mul(0x01000193);
    }
    (h as usize) & (ID_SLOTS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_seconds_then_by_id() {
        let offset = ZoneOffset::from_seconds(5 * 3600 + 45 * 60).unwrap();
        assert_eq!(offset.id(), "+05:45");
        assert_eq!(offset_by_id("+05:45"), Some(offset));
        assert_eq!(offset_by_id("+0545"), None);
    }

    #[test]
    fn every_quarter_hour_fits() {
        for quarters in -72..=72 {
            let seconds = quarters * QUARTER_HOUR;
            let offset = ZoneOffset::from_seconds(seconds).unwrap();
            assert_eq!(offset.seconds(), seconds);
            assert_eq!(offset_by_id(offset.id()), Some(offset));
        }
    }

    #[test]
    fn unaligned_offsets_are_not_cached() {
        let offset = ZoneOffset::from_seconds(3601).unwrap();
        assert_eq!(offset.id(), "+01:00:01");
        assert_eq!(offset_by_id("+01:00:01"), None);
    }
}
