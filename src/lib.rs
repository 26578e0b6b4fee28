/*!
Zoneclock provides time zone identities and composable clocks.

The identity of a time zone is distinct from its rules. A [`tz::ZoneId`] is
either a fixed [`tz::ZoneOffset`] from UTC (like `+05:30`) or a named
[`tz::ZoneRegion`] (like `Europe/Paris`) whose offsets are determined by
[`tz::ZoneRules`]. Identities are parsed from untrusted text with exact
format validation, are cheap to clone, and compare and hash by identifier.
Common offsets are memoized process wide so that parsing or constructing
them repeatedly doesn't allocate.

A [`clock::Clock`] is a source of the current instant bound to a zone. The
system clock can be composed into fixed, offset and ticking clocks, which
is particularly useful for tests.

Finally, [`fmt::wire`] provides a compact tagged binary encoding of the
values in this crate for persistence.

# Example

```
use zoneclock::{clock::Clock, tz::{ZoneId, ZoneOffset}, SignedDuration, Timestamp};

let zone = ZoneId::parse("-03:30")?;
assert_eq!(zone, ZoneId::Offset(ZoneOffset::from_hours_minutes(-3, -30)?));

let start = Timestamp::from_second(1_700_000_000)?;
let clock = Clock::offset(Clock::fixed(start, zone), SignedDuration::from_secs(90));
assert_eq!(clock.millis()?, 1_700_000_090_000);
assert_eq!(clock.zone().id(), "-03:30");

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages
about rare events, like the system clock recomputing its coarse offset or a
region being built without rules. This is useful for debugging but has
no other effect.
* **serde** - When enabled, `Serialize` and `Deserialize` impls are
provided for [`tz::ZoneOffset`], [`tz::ZoneId`], [`Timestamp`] and
[`SignedDuration`].
*/

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
// No clue why this thing is still unstable because it's pretty amazing. This
// adds Cargo feature annotations to items in the rustdoc output.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

pub use crate::{
    duration::SignedDuration, error::Error, timestamp::Timestamp,
};

#[macro_use]
mod logging;

pub mod civil;
pub mod clock;
mod duration;
mod error;
pub mod fmt;
mod timestamp;
pub mod tz;
mod util;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
        assert_send_sync::<clock::Clock>();
        assert_send_sync::<tz::ZoneId>();
        assert_send_sync::<tz::RulesDatabase>();
        assert_send_sync::<fmt::wire::WireValue>();
    }

    #[test]
    fn now_is_after_2024() {
        assert!(Timestamp::now().as_second() > 1_704_067_200);
    }
}
