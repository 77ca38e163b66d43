//! Version-keyed record cache
//!
//! Holds records for one data version at a time. Switching versions drops
//! everything; past `capacity` the oldest insertion is evicted.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use super::record::ReferenceRecord;

#[derive(Debug)]
pub struct RecordCache {
    version: String,
    capacity: usize,
    entries: HashMap<String, Arc<ReferenceRecord>>,
    order: VecDeque<String>,
    misses: HashSet<String>,
    miss_order: VecDeque<String>,
}

/// What the cache knows about a key.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Arc<ReferenceRecord>),
    /// Previously answered NotFound for this version
    KnownMissing,
    Unknown,
}

impl RecordCache {
    pub fn new(version: impl Into<String>, capacity: usize) -> Self {
        Self {
            version: version.into(),
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            misses: HashSet::new(),
            miss_order: VecDeque::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, version: &str, key: &str) -> CacheLookup {
        if version != self.version {
            return CacheLookup::Unknown;
        }
        if let Some(record) = self.entries.get(key) {
            return CacheLookup::Hit(Arc::clone(record));
        }
        if self.misses.contains(key) {
            return CacheLookup::KnownMissing;
        }
        CacheLookup::Unknown
    }

    pub fn insert(&mut self, version: &str, key: impl Into<String>, record: Arc<ReferenceRecord>) {
        self.switch_version(version);
        let key = key.into();

        if self.entries.insert(key.clone(), record).is_none() {
            self.order.push_back(key.clone());
        }
        if self.misses.remove(&key) {
            self.miss_order.retain(|k| k != &key);
        }

        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn insert_missing(&mut self, version: &str, key: impl Into<String>) {
        self.switch_version(version);
        let key = key.into();

        if self.entries.contains_key(&key) || !self.misses.insert(key.clone()) {
            return;
        }
        self.miss_order.push_back(key);

        while self.misses.len() > self.capacity {
            match self.miss_order.pop_front() {
                Some(oldest) => {
                    self.misses.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn switch_version(&mut self, version: &str) {
        if version != self.version {
            tracing::info!(from = %self.version, to = version, "data version changed, dropping cache");
            self.version = version.to_string();
            self.entries.clear();
            self.order.clear();
            self.misses.clear();
            self.miss_order.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::fixtures;

    #[test]
    fn test_hit_after_insert() {
        let mut cache = RecordCache::new("13.24.1", 4);
        let record = Arc::new(fixtures::ahri());
        cache.insert("13.24.1", "ahri", Arc::clone(&record));

        match cache.lookup("13.24.1", "ahri") {
            CacheLookup::Hit(found) => assert!(Arc::ptr_eq(&found, &record)),
            other => panic!("expected hit, got {:?}", other),
        }
        assert_eq!(cache.lookup("13.24.1", "garen"), CacheLookup::Unknown);
    }

    #[test]
    fn test_version_change_invalidates() {
        let mut cache = RecordCache::new("13.24.1", 4);
        cache.insert("13.24.1", "ahri", Arc::new(fixtures::ahri()));
        assert_eq!(cache.lookup("14.1.1", "ahri"), CacheLookup::Unknown);

        cache.insert("14.1.1", "garen", Arc::new(fixtures::garen()));
        assert_eq!(cache.version(), "14.1.1");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("14.1.1", "ahri"), CacheLookup::Unknown);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut cache = RecordCache::new("v", 2);
        cache.insert("v", "ahri", Arc::new(fixtures::ahri()));
        cache.insert("v", "garen", Arc::new(fixtures::garen()));
        cache.insert("v", "caitlyn", Arc::new(fixtures::caitlyn()));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup("v", "ahri"), CacheLookup::Unknown);
        assert!(matches!(cache.lookup("v", "caitlyn"), CacheLookup::Hit(_)));
    }

    #[test]
    fn test_negative_entries() {
        let mut cache = RecordCache::new("v", 2);
        cache.insert_missing("v", "quelles");
        assert_eq!(cache.lookup("v", "quelles"), CacheLookup::KnownMissing);

        cache.insert("v", "quelles", Arc::new(fixtures::ahri()));
        assert!(matches!(cache.lookup("v", "quelles"), CacheLookup::Hit(_)));
    }
}
