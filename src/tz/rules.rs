use std::sync::Arc;

use crate::{error::tz::zone::Error as E, tz::ZoneOffset, Error, Timestamp};

/// The rules that determine which offset is in effect at any instant for a
/// particular zone.
///
/// Rules are either a single fixed offset, or an initial offset followed by
/// a list of transitions to new offsets, in strictly ascending order by
/// instant. Rules are immutable and cheap to clone.
///
/// Computing rules from real time zone data (for example, by parsing TZif
/// files) is out of scope for this crate. Providers build rules from whatever
/// source they like with [`ZoneRules::from_transitions`], and register them
/// with [`tz::db()`](crate::tz::db).
///
/// # Example
///
/// ```
/// use zoneclock::{tz::{ZoneOffset, ZoneRules}, Timestamp};
///
/// let cet = ZoneOffset::from_hours(1)?;
/// let cest = ZoneOffset::from_hours(2)?;
/// let rules = ZoneRules::from_transitions(cet, vec![
///     (Timestamp::from_second(1_711_846_800)?, cest),
///     (Timestamp::from_second(1_729_990_800)?, cet),
/// ])?;
/// assert!(!rules.is_fixed_offset());
/// assert_eq!(rules.offset_at(Timestamp::from_second(1_720_000_000)?), cest);
/// assert_eq!(rules.offset_at(Timestamp::UNIX_EPOCH), cet);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct ZoneRules {
    kind: Arc<ZoneRulesKind>,
}

#[derive(Debug, Eq, PartialEq)]
enum ZoneRulesKind {
    Fixed(ZoneOffset),
    Transitions {
        initial: ZoneOffset,
        transitions: Vec<(Timestamp, ZoneOffset)>,
    },
}

impl ZoneRules {
    /// Returns rules that always report the given offset.
    pub fn fixed(offset: ZoneOffset) -> ZoneRules {
        ZoneRules { kind: Arc::new(ZoneRulesKind::Fixed(offset)) }
    }

    /// Returns rules that report `initial` before the first transition, and
    /// the offset of the latest transition at or before an instant
    /// otherwise.
    ///
    /// If there are no transitions, then this is equivalent to
    /// [`ZoneRules::fixed`].
    ///
    /// # Errors
    ///
    /// When the transitions aren't in strictly ascending order.
    pub fn from_transitions(
        initial: ZoneOffset,
        transitions: Vec<(Timestamp, ZoneOffset)>,
    ) -> Result<ZoneRules, Error> {
        if transitions.is_empty() {
            return Ok(ZoneRules::fixed(initial));
        }
        for (i, pair) in transitions.windows(2).enumerate() {
            if pair[0].0 >= pair[1].0 {
                return Err(Error::from(E::UnsortedTransitions {
                    index: i + 1,
                }));
            }
        }
        let kind = ZoneRulesKind::Transitions { initial, transitions };
        Ok(ZoneRules { kind: Arc::new(kind) })
    }

    /// Returns true when these rules report the same offset at every
    /// instant.
    pub fn is_fixed_offset(&self) -> bool {
        matches!(*self.kind, ZoneRulesKind::Fixed(_))
    }

    /// Returns the offset in effect at the given instant.
    pub fn offset_at(&self, timestamp: Timestamp) -> ZoneOffset {
        match *self.kind {
            ZoneRulesKind::Fixed(offset) => offset,
            ZoneRulesKind::Transitions { initial, ref transitions } => {
                // The number of transitions at or before `timestamp`.
                let count =
                    transitions.partition_point(|&(at, _)| at <= timestamp);
                match count.checked_sub(1) {
                    None => initial,
                    Some(i) => transitions[i].1,
                }
            }
        }
    }

    /// Returns the transitions in these rules, in ascending order.
    ///
    /// This is empty for fixed offset rules.
    pub fn transitions(&self) -> &[(Timestamp, ZoneOffset)] {
        match *self.kind {
            ZoneRulesKind::Fixed(_) => &[],
            ZoneRulesKind::Transitions { ref transitions, .. } => transitions,
        }
    }
}

impl core::fmt::Debug for ZoneRules {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self.kind {
            ZoneRulesKind::Fixed(offset) => {
                f.debug_tuple("Fixed").field(&offset).finish()
            }
            ZoneRulesKind::Transitions { initial, ref transitions } => f
                .debug_struct("Transitions")
                .field("initial", &initial)
                .field("len", &transitions.len())
                .finish(),
        }
    }
}
