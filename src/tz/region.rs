use std::sync::Arc;

use crate::{
    error::tz::zone::Error as E,
    tz::{RulesDatabase, ZoneRules},
    Error,
};

/// A geographical region where the same time zone rules apply, identified by
/// a name like `Europe/Paris`.
///
/// A region's identity is its identifier alone. Two regions with the same
/// identifier are equal, hash the same and are interchangeable, regardless
/// of whether they hold a copy of their rules.
///
/// A region built by a strict parse always carries its rules. A region built
/// by a lenient parse (for example, when decoding the wire format) carries
/// its rules only if they were available at the time. Otherwise, it keeps a
/// handle to the database it was parsed against (usually the global
/// [`tz::db()`](crate::tz::db)) and [`ZoneRegion::rules`] looks them up there
/// on every call, reporting an error if they are still missing.
///
/// The identifiers `UTC`, `GMT` and `UT`, optionally followed by an offset,
/// are also regions. They always carry fixed offset rules.
#[derive(Clone)]
pub struct ZoneRegion {
    id: Arc<str>,
    rules: RegionRules,
}

#[derive(Clone)]
enum RegionRules {
    Resolved(ZoneRules),
    Deferred(RulesDatabase),
}

impl ZoneRegion {
    /// Parses a region identifier, requiring that rules for it be available
    /// from the global database.
    ///
    /// Unlike [`ZoneId::parse`](crate::tz::ZoneId::parse), this never
    /// returns an offset and doesn't treat `UTC`, `GMT` or `UT` prefixes
    /// specially.
    ///
    /// # Errors
    ///
    /// When the identifier is malformed, or when no rules are known for it.
    pub fn parse(id: &str) -> Result<ZoneRegion, Error> {
        ZoneRegion::parse_with(crate::tz::db(), id, true)
    }

    /// Parses a region identifier without requiring rules to be available.
    ///
    /// # Errors
    ///
    /// When the identifier is malformed.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneRegion;
    ///
    /// let region = ZoneRegion::parse_lenient("Pacific/Nowhere")?;
    /// assert_eq!(region.id(), "Pacific/Nowhere");
    /// assert!(region.rules().unwrap_err().is_unknown_region());
    ///
    /// assert!(ZoneRegion::parse_lenient("9/Nine").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_lenient(id: &str) -> Result<ZoneRegion, Error> {
        ZoneRegion::parse_with(crate::tz::db(), id, false)
    }

    pub(crate) fn parse_with(
        db: &RulesDatabase,
        id: &str,
        check_available: bool,
    ) -> Result<ZoneRegion, Error> {
        check_name(id)?;
        let rules = match db.get(id) {
            Ok(rules) => RegionRules::Resolved(rules),
            Err(err) if check_available => return Err(err),
            Err(_) => {
                debug!(
                    "building region {id} without rules, \
                     since no registered provider has them yet",
                );
                RegionRules::Deferred(db.clone())
            }
        };
        Ok(ZoneRegion { id: Arc::from(id), rules })
    }

    /// Builds a region with the given rules, without validating the
    /// identifier. This is used for `UTC`, `GMT` and `UT` prefixed regions.
    pub(crate) fn with_rules(id: &str, rules: ZoneRules) -> ZoneRegion {
        ZoneRegion { id: Arc::from(id), rules: RegionRules::Resolved(rules) }
    }

    /// Returns this region's identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns this region's rules.
    ///
    /// If this region was built without rules, then they are looked up in
    /// the database it was parsed against. The result of that lookup is
    /// never cached, so providers registered later are picked up by later
    /// calls.
    ///
    /// # Errors
    ///
    /// When this region has no rules and its database doesn't have them
    /// either.
    pub fn rules(&self) -> Result<ZoneRules, Error> {
        match self.rules {
            RegionRules::Resolved(ref rules) => Ok(rules.clone()),
            RegionRules::Deferred(ref db) => db.get(&self.id),
        }
    }
}

impl Eq for ZoneRegion {}

impl PartialEq for ZoneRegion {
    fn eq(&self, rhs: &ZoneRegion) -> bool {
        self.id == rhs.id
    }
}

impl core::hash::Hash for ZoneRegion {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for ZoneRegion {
    fn cmp(&self, rhs: &ZoneRegion) -> core::cmp::Ordering {
        self.id.cmp(&rhs.id)
    }
}

impl PartialOrd for ZoneRegion {
    fn partial_cmp(&self, rhs: &ZoneRegion) -> Option<core::cmp::Ordering> {
        Some(self.cmp(rhs))
    }
}

impl core::fmt::Debug for ZoneRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("ZoneRegion").field(&&*self.id).finish()
    }
}

impl core::fmt::Display for ZoneRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

/// Checks that a region identifier matches `[A-Za-z][A-Za-z0-9~/._+-]+`.
fn check_name(id: &str) -> Result<(), Error> {
    let bytes = id.as_bytes();
    let valid = bytes.len() >= 2
        && bytes.iter().enumerate().all(|(i, &byte)| {
            byte.is_ascii_alphabetic()
                || (i > 0
                    && (byte.is_ascii_digit()
                        || matches!(byte, b'~' | b'/' | b'.' | b'_' | b'+' | b'-')))
        });
    if !valid {
        return Err(Error::from(E::invalid_region_id(id)));
    }
    Ok(())
}
