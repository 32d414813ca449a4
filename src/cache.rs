//! Recommendation result cache
//!
//! Datasets never change after load, so a materialized result stays valid
//! for the life of the process. The cache only saves the scoring pass for
//! repeated queries.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::catalog::normalize;
use crate::engine::{RecommendRequest, Strategy};
use crate::materialize::Recommendation;

/// Default number of cached results
pub const CACHE_CAPACITY: usize = 256;

/// Normalized request identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    artist: String,
    strategy: Strategy,
    k: usize,
    /// Content weight bits; only set for hybrid requests
    weight_bits: Option<u64>,
}

impl CacheKey {
    /// `None` when the request carries an invalid weighting; such requests
    /// are never cached.
    pub fn from_request(request: &RecommendRequest) -> Option<Self> {
        let weight_bits = match request.strategy {
            Strategy::Hybrid => Some(request.weighting.content_weight().ok()?.content().to_bits()),
            Strategy::Content | Strategy::Collaborative => None,
        };
        Some(Self {
            name: normalize(&request.name),
            artist: normalize(&request.artist),
            strategy: request.strategy,
            k: request.k,
            weight_bits,
        })
    }
}

/// Thread-safe LRU cache of materialized recommendations
pub struct RecommendationCache {
    results: Mutex<LruCache<CacheKey, Vec<Recommendation>>>,
}

impl RecommendationCache {
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            results: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<Recommendation>> {
        self.results.lock().ok()?.get(key).cloned()
    }

    pub fn put(&self, key: CacheKey, results: Vec<Recommendation>) {
        if let Ok(mut cache) = self.results.lock() {
            cache.put(key, results);
        }
    }

    pub fn len(&self) -> usize {
        self.results.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new()
    }
}
