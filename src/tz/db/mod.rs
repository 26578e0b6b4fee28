use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, OnceLock, RwLock},
};

use crate::{
    error::tz::zone::Error as E,
    tz::{ZoneId, ZoneRules},
    Error,
};

/// Returns the process wide rules database.
///
/// The database starts out empty. Applications register providers with
/// [`RulesDatabase::register`] early on, and every strict parse of a region
/// identifier (such as [`ZoneId::parse`]) consults it.
///
/// # Example
///
/// ```
/// use zoneclock::tz::{self, MemoryProvider, ZoneId, ZoneOffset, ZoneRules};
///
/// let rules = ZoneRules::fixed(ZoneOffset::from_hours(4)?);
/// tz::db().register(MemoryProvider::new().with("Indian/Mauritius", rules))?;
///
/// let zone = ZoneId::parse("Indian/Mauritius")?;
/// assert!(zone.rules()?.is_fixed_offset());
/// assert!(tz::db().region_ids().contains("Indian/Mauritius"));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn db() -> &'static RulesDatabase {
    static DB: OnceLock<RulesDatabase> = OnceLock::new();
    DB.get_or_init(RulesDatabase::new)
}

/// A source of zone rules keyed by region identifier.
///
/// Implementations must be cheap to query, since a lenient region re-queries
/// the database it was parsed against every time its rules are requested.
pub trait ZoneRulesProvider: core::fmt::Debug + Send + Sync {
    /// Returns every region identifier this provider has rules for.
    fn region_ids(&self) -> Vec<String>;

    /// Returns the rules for the given region identifier, if this provider
    /// has them.
    fn rules(&self, id: &str) -> Option<ZoneRules>;
}

/// A provider that serves rules from an in-memory map.
///
/// # Example
///
/// ```
/// use zoneclock::tz::{MemoryProvider, ZoneOffset, ZoneRules, ZoneRulesProvider};
///
/// let provider = MemoryProvider::new()
///     .with("Asia/Tokyo", ZoneRules::fixed(ZoneOffset::from_hours(9)?))
///     .with("Asia/Kolkata", ZoneRules::fixed(ZoneOffset::from_hours_minutes(5, 30)?));
/// assert_eq!(provider.region_ids(), vec!["Asia/Kolkata", "Asia/Tokyo"]);
/// assert!(provider.rules("Asia/Seoul").is_none());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    rules: BTreeMap<String, ZoneRules>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> MemoryProvider {
        MemoryProvider::default()
    }

    /// Adds the given rules under the given region identifier, replacing any
    /// rules previously added under it.
    pub fn with(mut self, id: &str, rules: ZoneRules) -> MemoryProvider {
        self.rules.insert(id.to_string(), rules);
        self
    }
}

impl ZoneRulesProvider for MemoryProvider {
    fn region_ids(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    fn rules(&self, id: &str) -> Option<ZoneRules> {
        self.rules.get(id).cloned()
    }
}

/// An ordered collection of rules providers.
///
/// Every region identifier is served by at most one provider. Lookups are
/// guarded by a reader-writer lock that is only held for the duration of a
/// single lookup or registration.
///
/// Most applications only ever need the process wide database returned by
/// [`db()`]. A separate database is useful for tests and for applications
/// that need isolated sets of rules.
///
/// Cloning a database is cheap, and clones share the same providers. A
/// provider registered through one clone is visible through all of them.
#[derive(Clone, Debug, Default)]
pub struct RulesDatabase {
    inner: Arc<RulesDatabaseInner>,
}

#[derive(Debug, Default)]
struct RulesDatabaseInner {
    providers: RwLock<Vec<Arc<dyn ZoneRulesProvider>>>,
}

impl RulesDatabase {
    /// Creates a new database with no providers.
    pub fn new() -> RulesDatabase {
        RulesDatabase::default()
    }

    /// Adds a provider to this database.
    ///
    /// # Errors
    ///
    /// When any region identifier served by the given provider is already
    /// served by a provider in this database. In that case, the database is
    /// left unchanged.
    pub fn register<P: ZoneRulesProvider + 'static>(
        &self,
        provider: P,
    ) -> Result<(), Error> {
        let ids = provider.region_ids();
        let mut providers = self.inner.providers.write().unwrap();
        for id in ids.iter() {
            if providers.iter().any(|p| p.rules(id).is_some()) {
                return Err(Error::from(E::duplicate_region(id)));
            }
        }
        debug!(
            "registering zone rules provider with {len} region(s): {provider:?}",
            len = ids.len(),
        );
        providers.push(Arc::new(provider));
        Ok(())
    }

    /// Returns the rules for the given region identifier.
    ///
    /// # Errors
    ///
    /// When no registered provider has rules for the identifier.
    pub fn get(&self, id: &str) -> Result<ZoneRules, Error> {
        let providers = self.inner.providers.read().unwrap();
        providers
            .iter()
            .find_map(|p| p.rules(id))
            .ok_or_else(|| Error::from(E::unknown_region(id)))
    }

    /// Returns true when some registered provider has rules for the given
    /// region identifier.
    pub fn contains(&self, id: &str) -> bool {
        let providers = self.inner.providers.read().unwrap();
        providers.iter().any(|p| p.rules(id).is_some())
    }

    /// Returns the sorted set of every region identifier in this database.
    pub fn region_ids(&self) -> BTreeSet<String> {
        let providers = self.inner.providers.read().unwrap();
        providers.iter().flat_map(|p| p.region_ids()).collect()
    }

    /// Parses a zone identifier, requiring that a region identifier be
    /// known to this database.
    ///
    /// This is like [`ZoneId::parse`], except it uses this database instead
    /// of the global one.
    pub fn parse_zone_id(&self, text: &str) -> Result<ZoneId, Error> {
        ZoneId::parse_with(self, text, true)
    }

    /// Parses a zone identifier, permitting region identifiers unknown to
    /// this database.
    ///
    /// This is like [`ZoneId::parse_lenient`], except it uses this database
    /// instead of the global one.
    pub fn parse_zone_id_lenient(&self, text: &str) -> Result<ZoneId, Error> {
        ZoneId::parse_with(self, text, false)
    }
}
