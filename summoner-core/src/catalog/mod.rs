//! Champion reference data
//!
//! [`ChampionCatalog`] resolves user-typed names to [`ReferenceRecord`]s
//! through a [`ReferenceSource`], caching results per data version.

pub mod cache;
pub mod normalize;
pub mod record;
pub mod source;

pub use cache::{CacheLookup, RecordCache};
pub use normalize::{canonical_id, is_known_alias, normalize_key};
pub use record::{
    Ability, AbilityKey, AbilitySlot, BaseStats, ChampionRatings, Passive, ReferenceRecord,
    strip_markup,
};
pub use source::{DataDragonSource, ReferenceSource, parse_champion_document};

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::DataDragonConfig;
use crate::error::{Result, SummonerError};
use crate::retry::{RetryConfig, with_retry};

/// Cached access to champion records.
///
/// Shared between sessions; each distinct name reaches the source at most
/// once per data version.
pub struct ChampionCatalog {
    source: Arc<dyn ReferenceSource>,
    cache: RwLock<RecordCache>,
    retry: RetryConfig,
}

impl ChampionCatalog {
    pub fn new(source: Arc<dyn ReferenceSource>, capacity: usize, retry: RetryConfig) -> Self {
        let version = source.data_version().to_string();
        Self {
            source,
            cache: RwLock::new(RecordCache::new(version, capacity)),
            retry,
        }
    }

    /// Catalog backed by Data Dragon.
    pub fn from_config(config: &DataDragonConfig, retry: RetryConfig) -> Result<Self> {
        let source = DataDragonSource::from_config(config)?;
        Ok(Self::new(Arc::new(source), config.cache_capacity, retry))
    }

    /// Data version of the underlying source
    pub fn data_version(&self) -> &str {
        self.source.data_version()
    }

    /// Resolve a name to its record.
    ///
    /// # Errors
    ///
    /// [`SummonerError::NotFound`] for unknown names; upstream, timeout and
    /// payload errors once retries are exhausted.
    pub async fn fetch(&self, name: &str) -> Result<Arc<ReferenceRecord>> {
        let id = canonical_id(name);
        if id.is_empty() {
            return Err(SummonerError::NotFound(name.to_string()));
        }
        // "lee sin", "LeeSin" and "leesin" share one entry
        let key = id.to_lowercase();
        let version = self.source.data_version();

        match self.cache.read().await.lookup(version, &key) {
            CacheLookup::Hit(record) => {
                tracing::debug!(champion = %key, "cache hit");
                return Ok(record);
            }
            CacheLookup::KnownMissing => return Err(SummonerError::NotFound(key)),
            CacheLookup::Unknown => {}
        }

        let fetched = with_retry(&self.retry, "data dragon", || self.source.fetch_champion(&id)).await;

        match fetched {
            Ok(record) => {
                let record = Arc::new(record);
                self.cache
                    .write()
                    .await
                    .insert(version, key, Arc::clone(&record));
                Ok(record)
            }
            Err(SummonerError::NotFound(_)) => {
                self.cache.write().await.insert_missing(version, key.clone());
                Err(SummonerError::NotFound(key))
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`fetch`](Self::fetch), with failures logged and dropped.
    ///
    /// Used during subject detection, where most tokens are not champions.
    pub async fn lookup(&self, name: &str) -> Option<Arc<ReferenceRecord>> {
        match self.fetch(name).await {
            Ok(record) => Some(record),
            Err(SummonerError::NotFound(_)) => None,
            Err(e) => {
                tracing::warn!(name, error = %e, "champion lookup failed");
                None
            }
        }
    }

    /// Number of records currently cached
    pub async fn cached(&self) -> usize {
        self.cache.read().await.len()
    }
}
