use crate::{
    error::{tz::zone::Error as E, ErrorContext},
    tz::{RulesDatabase, ZoneOffset, ZoneRegion, ZoneRules},
    Error, Timestamp,
};

/// A time zone identity: either a fixed offset from UTC, or a region whose
/// offset is determined by rules.
///
/// A `ZoneId` is distinct from the rules it refers to. Identities are
/// compared by their identifiers, so `Europe/Paris` equals `Europe/Paris`
/// regardless of the rules in effect, and the offset `+01:00` never equals a
/// region like `UTC+01:00` even though both describe the same offset at all
/// times. Use [`ZoneId::normalized`] to collapse fixed offset regions into
/// offsets.
///
/// # Parsing
///
/// [`ZoneId::parse`] dispatches on the shape of its input:
///
/// * `Z`, or anything starting with `+` or `-`, is parsed as a
/// [`ZoneOffset`].
/// * `UTC`, `GMT` or `UT`, optionally followed by an offset, is a region
/// with fixed rules whose identifier is the prefix followed by the canonical
/// offset identifier (or just the prefix for a zero offset).
/// * Anything else must be a valid region identifier known to the global
/// [`tz::db()`](crate::tz::db).
///
/// ```
/// use zoneclock::tz::{ZoneId, ZoneOffset};
///
/// let zone = ZoneId::parse("+0530")?;
/// assert_eq!(zone, ZoneId::Offset(ZoneOffset::from_hours_minutes(5, 30)?));
///
/// let zone = ZoneId::parse("GMT+1")?;
/// assert_eq!(zone.id(), "GMT+01:00");
/// assert!(matches!(zone, ZoneId::Region(_)));
/// assert_eq!(zone.normalized().id(), "+01:00");
///
/// assert_eq!(ZoneId::parse("UT-00:00")?.id(), "UT");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub enum ZoneId {
    /// A fixed offset from UTC.
    Offset(ZoneOffset),
    /// A named region.
    Region(ZoneRegion),
}

impl ZoneId {
    /// The standard table of three letter zone abbreviations, sorted by
    /// abbreviation.
    ///
    /// Abbreviations like these are ambiguous and deprecated, so they are
    /// never accepted by [`ZoneId::parse`]. This table exists to be used with
    /// [`ZoneId::parse_with_aliases`] when consuming data that uses them.
    pub const SHORT_IDS: &'static [(&'static str, &'static str)] = &[
        ("ACT", "Australia/Darwin"),
        ("AET", "Australia/Sydney"),
        ("AGT", "America/Argentina/Buenos_Aires"),
        ("ART", "Africa/Cairo"),
        ("AST", "America/Anchorage"),
        ("BET", "America/Sao_Paulo"),
        ("BST", "Asia/Dhaka"),
        ("CAT", "Africa/Harare"),
        ("CNT", "America/St_Johns"),
        ("CST", "America/Chicago"),
        ("CTT", "Asia/Shanghai"),
        ("EAT", "Africa/Addis_Ababa"),
        ("ECT", "Europe/Paris"),
        ("EST", "-05:00"),
        ("HST", "-10:00"),
        ("IET", "America/Indiana/Indianapolis"),
        ("IST", "Asia/Kolkata"),
        ("JST", "Asia/Tokyo"),
        ("MIT", "Pacific/Apia"),
        ("MST", "-07:00"),
        ("NET", "Asia/Yerevan"),
        ("NST", "Pacific/Auckland"),
        ("PLT", "Asia/Karachi"),
        ("PNT", "America/Phoenix"),
        ("PRT", "America/Puerto_Rico"),
        ("PST", "America/Los_Angeles"),
        ("SST", "Pacific/Guadalcanal"),
        ("VST", "Asia/Ho_Chi_Minh"),
    ];

    /// Parses a zone identifier, requiring that region identifiers be known
    /// to the global rules database.
    ///
    /// # Errors
    ///
    /// When the identifier is malformed, when an offset is out of range or
    /// when a region is unknown.
    pub fn parse(text: &str) -> Result<ZoneId, Error> {
        ZoneId::parse_with(crate::tz::db(), text, true)
    }

    /// Parses a zone identifier, permitting region identifiers that aren't
    /// (yet) known to the global rules database.
    ///
    /// Asking a region built this way for its rules looks them up again.
    ///
    /// # Errors
    ///
    /// When the identifier is malformed or when an offset is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneId;
    ///
    /// assert!(ZoneId::parse("utc").unwrap_err().is_unknown_region());
    /// let zone = ZoneId::parse_lenient("utc")?;
    /// assert_eq!(zone.id(), "utc");
    /// assert!(zone.rules().unwrap_err().is_unknown_region());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_lenient(text: &str) -> Result<ZoneId, Error> {
        ZoneId::parse_with(crate::tz::db(), text, false)
    }

    /// Parses a zone identifier after replacing it with its alias, if the
    /// given table has one.
    ///
    /// The alias table is a list of `(alias, identifier)` pairs. The
    /// identifier found (or the text given, when there is no alias) is
    /// parsed strictly.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::ZoneId;
    ///
    /// let zone = ZoneId::parse_with_aliases("EST", ZoneId::SHORT_IDS)?;
    /// assert_eq!(zone.id(), "-05:00");
    /// assert!(ZoneId::parse("EST").is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse_with_aliases(
        text: &str,
        aliases: &[(&str, &str)],
    ) -> Result<ZoneId, Error> {
        ZoneId::parse(resolve_alias(text, aliases))
    }

    pub(crate) fn parse_with(
        db: &RulesDatabase,
        text: &str,
        check_available: bool,
    ) -> Result<ZoneId, Error> {
        let bytes = text.as_bytes();
        if bytes.len() <= 1 || bytes[0] == b'+' || bytes[0] == b'-' {
            return ZoneOffset::parse(text).map(ZoneId::Offset);
        }
        if text.starts_with("UTC") || text.starts_with("GMT") {
            return ZoneId::parse_prefixed(db, text, 3, check_available);
        }
        if text.starts_with("UT") {
            return ZoneId::parse_prefixed(db, text, 2, check_available);
        }
        ZoneRegion::parse_with(db, text, check_available).map(ZoneId::Region)
    }

    /// Parses an identifier that starts with one of the ASCII prefixes
    /// `UTC`, `GMT` or `UT`, whose length is `prefix_len`.
    fn parse_prefixed(
        db: &RulesDatabase,
        text: &str,
        prefix_len: usize,
        check_available: bool,
    ) -> Result<ZoneId, Error> {
        // OK because the prefix is ASCII, so `prefix_len` is on a char
        // boundary.
        let (prefix, rest) = text.split_at(prefix_len);
        match rest.as_bytes().first() {
            None => ZoneId::prefixed(prefix, ZoneOffset::UTC),
            Some(b'+') | Some(b'-') => {
                let offset = ZoneOffset::parse(rest)
                    .with_context(|| E::invalid_prefixed_offset(text))?;
                ZoneId::prefixed(prefix, offset)
            }
            Some(_) => ZoneRegion::parse_with(db, text, check_available)
                .map(ZoneId::Region),
        }
    }

    /// Binds an offset to one of the prefixes `UTC`, `GMT` or `UT`.
    ///
    /// The identifier of the region returned is the prefix followed by the
    /// canonical offset identifier, or just the prefix when the offset is
    /// zero. The region's rules are always fixed to the offset given. An
    /// empty prefix returns the offset itself.
    ///
    /// # Errors
    ///
    /// When the prefix is anything other than `UTC`, `GMT`, `UT` or empty.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneclock::tz::{ZoneId, ZoneOffset};
    ///
    /// let offset = ZoneOffset::from_hours(-3)?;
    /// assert_eq!(ZoneId::prefixed("UTC", offset)?.id(), "UTC-03:00");
    /// assert_eq!(ZoneId::prefixed("GMT", ZoneOffset::UTC)?.id(), "GMT");
    /// assert_eq!(ZoneId::prefixed("", offset)?, ZoneId::Offset(offset));
    /// assert!(ZoneId::prefixed("CET", offset).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn prefixed(prefix: &str, offset: ZoneOffset) -> Result<ZoneId, Error> {
        if prefix.is_empty() {
            return Ok(ZoneId::Offset(offset));
        }
        if !matches!(prefix, "UTC" | "GMT" | "UT") {
            return Err(Error::from(E::invalid_prefix(prefix)));
        }
        let rules = offset.rules();
        if offset.is_utc() {
            return Ok(ZoneId::Region(ZoneRegion::with_rules(prefix, rules)));
        }
        let id = format!("{prefix}{offset}");
        Ok(ZoneId::Region(ZoneRegion::with_rules(&id, rules)))
    }

    /// Returns the system's default zone.
    ///
    /// This reads the `TZ` environment variable (ignoring a leading `:`),
    /// resolves it through [`ZoneId::SHORT_IDS`] and parses it leniently.
    /// If the variable is unset or invalid, then a warning is logged and UTC
    /// is returned.
    pub fn system_default() -> ZoneId {
        match ZoneId::try_system_default() {
            Ok(zone) => zone,
            Err(_err) => {
                warn!(
                    "failed to determine system default zone, \
                     falling back to UTC: {_err}",
                );
                ZoneId::Offset(ZoneOffset::UTC)
            }
        }
    }

    /// Returns the system's default zone, or an error if it can't be
    /// determined.
    ///
    /// See [`ZoneId::system_default`] for how it is determined.
    ///
    /// # Errors
    ///
    /// When `TZ` is unset, isn't valid Unicode or isn't a valid zone
    /// identifier.
    pub fn try_system_default() -> Result<ZoneId, Error> {
        let tz = std::env::var("TZ").map_err(|err| {
            Error::from_args(format_args!(
                "failed to read `TZ` environment variable: {err}"
            ))
        })?;
        let text = tz.strip_prefix(':').unwrap_or(&tz);
        let text = resolve_alias(text, ZoneId::SHORT_IDS);
        ZoneId::parse_lenient(text).with_context(|| {
            Error::from_args(format_args!(
                "`TZ` environment variable value `{}` is not a \
                 valid zone identifier",
                tz.escape_debug(),
            ))
        })
    }

    /// Returns the sorted set of every region identifier known to the
    /// global rules database.
    pub fn available_region_ids() -> std::collections::BTreeSet<String> {
        crate::tz::db().region_ids()
    }

    /// Returns the identifier for this zone.
    pub fn id(&self) -> &str {
        match *self {
            ZoneId::Offset(ref offset) => offset.id(),
            ZoneId::Region(ref region) => region.id(),
        }
    }

    /// Returns the rules for this zone.
    ///
    /// # Errors
    ///
    /// When this is a region that was parsed leniently and whose rules are
    /// still unknown to the database it was parsed against.
    pub fn rules(&self) -> Result<ZoneRules, Error> {
        match *self {
            ZoneId::Offset(offset) => Ok(offset.rules()),
            ZoneId::Region(ref region) => region.rules(),
        }
    }

    /// Returns an equivalent offset if this zone's rules are a fixed offset,
    /// and this zone otherwise.
    ///
    /// A region whose rules are unavailable is returned as is.
    pub fn normalized(&self) -> ZoneId {
        match self.rules() {
            Ok(rules) if rules.is_fixed_offset() => {
                ZoneId::Offset(rules.offset_at(Timestamp::UNIX_EPOCH))
            }
            _ => self.clone(),
        }
    }
}

impl Eq for ZoneId {}

impl PartialEq for ZoneId {
    fn eq(&self, rhs: &ZoneId) -> bool {
        match (self, rhs) {
            (ZoneId::Offset(lhs), ZoneId::Offset(rhs)) => lhs == rhs,
            _ => self.id() == rhs.id(),
        }
    }
}

impl core::hash::Hash for ZoneId {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<ZoneOffset> for ZoneId {
    fn from(offset: ZoneOffset) -> ZoneId {
        ZoneId::Offset(offset)
    }
}

impl From<ZoneRegion> for ZoneId {
    fn from(region: ZoneRegion) -> ZoneId {
        ZoneId::Region(region)
    }
}

impl core::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

impl core::str::FromStr for ZoneId {
    type Err = Error;

    fn from_str(text: &str) -> Result<ZoneId, Error> {
        ZoneId::parse(text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ZoneId {
    fn serialize<S: serde::Serializer>(
        &self,
        se: S,
    ) -> Result<S::Ok, S::Error> {
        se.serialize_str(self.id())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ZoneId {
    fn deserialize<D: serde::Deserializer<'de>>(
        de: D,
    ) -> Result<ZoneId, D::Error> {
        de.deserialize_str(crate::fmt::serde::StrVisitor {
            expecting: "a zone identifier like `Europe/Paris` or `+05:30`",
            parse: ZoneId::parse_lenient,
        })
    }
}

fn resolve_alias<'a>(text: &'a str, aliases: &[(&'a str, &'a str)]) -> &'a str {
    aliases
        .iter()
        .find(|&&(alias, _)| alias == text)
        .map_or(text, |&(_, id)| id)
}
