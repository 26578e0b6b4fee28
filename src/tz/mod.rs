/*!
Time zone identities: fixed offsets, named regions and the rules behind them.

The central type of this module is [`ZoneId`], which is either a
[`ZoneOffset`] or a [`ZoneRegion`]. Identities are parsed from text once and
then cheaply cloned, compared and hashed. Common offsets are memoized.

The rules for a region come from [`ZoneRulesProvider`] implementations
registered in a [`RulesDatabase`]. This crate ships no time zone data of its
own, so the process wide database returned by [`db()`] starts out empty.
Strict parsing fails for regions unknown to it, while lenient parsing
succeeds and defers the lookup until the rules are actually needed.

# Example

```
use zoneclock::{tz::{self, MemoryProvider, ZoneId, ZoneOffset, ZoneRules}, Timestamp};

let rules = ZoneRules::from_transitions(
    ZoneOffset::from_hours(-5)?,
    vec![(Timestamp::from_second(1_710_054_000)?, ZoneOffset::from_hours(-4)?)],
)?;
tz::db().register(MemoryProvider::new().with("America/New_York", rules))?;

let zone = ZoneId::parse("America/New_York")?;
let offset = zone.rules()?.offset_at(Timestamp::from_second(1_720_000_000)?);
assert_eq!(offset.id(), "-04:00");

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    db::{db, MemoryProvider, RulesDatabase, ZoneRulesProvider},
    offset::ZoneOffset,
    region::ZoneRegion,
    rules::ZoneRules,
    zone_id::ZoneId,
};

mod db;
mod offset;
mod region;
mod rules;
mod zone_id;
