//! Read-through cache in front of a [`SchemaStore`].
//!
//! Entries expire a fixed interval after their last access (sliding TTL) and
//! the least recently used entry is dropped once the cache is full. A lookup
//! that finds nothing is cached as an absent entry, so repeated probes for an
//! unknown endpoint do not reach the store. Failed lookups are never cached.
//!
//! Concurrent misses on one key are coalesced: the first caller loads from
//! the store while the others block on the same flight and receive its
//! result. [`SchemaCache::evict`] drops the entry and detaches any flight in
//! progress, so a load that started before an ingestion can never populate
//! the cache after it.
//!
//! Lock order is always `inflight` before `entries`.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shadowscan_core::config::CacheConfig;
use shadowscan_core::{LearnedModel, SchemaKey};

use crate::error::StorageError;
use crate::store::SchemaStore;

/// `None` is a cached "no model for this key".
pub type CachedModel = Option<Arc<LearnedModel>>;

type LoadResult = Result<CachedModel, StorageError>;

// ── Clock ─────────────────────────────────────────────────────

/// Time source for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().expect("clock lock poisoned") += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().expect("clock lock poisoned")
    }
}

// ── Stats ─────────────────────────────────────────────────────

/// Point-in-time counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Store lookups actually performed.
    pub loads: u64,
    pub load_failures: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
    pub expirations: u64,
    /// Explicit evictions after ingestion.
    pub invalidations: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
    invalidations: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

// ── Flights ───────────────────────────────────────────────────

/// One store lookup shared by every caller that missed on the same key.
struct Flight {
    result: Mutex<Option<LoadResult>>,
    done: Condvar,
    superseded: AtomicBool,
}

impl Flight {
    fn new() -> Self {
        Self {
            result: Mutex::new(None),
            done: Condvar::new(),
            superseded: AtomicBool::new(false),
        }
    }

    fn complete(&self, result: LoadResult) {
        *self.result.lock().expect("flight lock poisoned") = Some(result);
        self.done.notify_all();
    }

    fn wait(&self) -> LoadResult {
        let guard = self.result.lock().expect("flight lock poisoned");
        let guard = self
            .done
            .wait_while(guard, |result| result.is_none())
            .expect("flight lock poisoned");
        match guard.as_ref() {
            Some(result) => result.clone(),
            None => unreachable!("wait_while returned before completion"),
        }
    }
}

/// Completes the flight with an error if the leader unwinds mid-load, so
/// waiters are never left blocked.
struct LeaderGuard<'a> {
    cache: &'a SchemaCache,
    key: &'a SchemaKey,
    flight: Arc<Flight>,
    finished: bool,
}

impl LeaderGuard<'_> {
    fn finish(mut self, result: LoadResult) -> LoadResult {
        self.finished = true;
        self.cache.finish_flight(self.key, &self.flight, result.clone());
        result
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let abandoned = Err(StorageError::LoadAbandoned(self.key.to_string()));
            self.cache.finish_flight(self.key, &self.flight, abandoned);
        }
    }
}

// ── Cache ─────────────────────────────────────────────────────

struct CacheEntry {
    value: CachedModel,
    last_access: Instant,
}

pub struct SchemaCache {
    store: Arc<dyn SchemaStore>,
    entries: Mutex<LruCache<SchemaKey, CacheEntry>>,
    inflight: Mutex<HashMap<SchemaKey, Arc<Flight>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    counters: Counters,
}

impl SchemaCache {
    pub fn new(store: Arc<dyn SchemaStore>, config: &CacheConfig) -> Self {
        Self::with_clock(store, config.max_entries, config.ttl(), Arc::new(SystemClock))
    }

    /// A zero capacity is treated as one.
    pub fn with_clock(
        store: Arc<dyn SchemaStore>,
        max_entries: usize,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            entries: Mutex::new(LruCache::new(capacity)),
            inflight: Mutex::new(HashMap::new()),
            ttl,
            clock,
            counters: Counters::default(),
        }
    }

    /// Return the model for `key`, loading it from the store on a miss.
    pub fn get(&self, key: &SchemaKey) -> Result<CachedModel, StorageError> {
        if let Some(value) = self.lookup(key) {
            bump(&self.counters.hits);
            return Ok(value);
        }

        let (flight, leader) = {
            let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
            // A leader fills the cache before it leaves the map, so look again
            // now that no flight can finish underneath us.
            if let Some(value) = self.lookup(key) {
                bump(&self.counters.hits);
                return Ok(value);
            }
            bump(&self.counters.misses);
            match inflight.get(key) {
                Some(flight) => (Arc::clone(flight), false),
                None => {
                    let flight = Arc::new(Flight::new());
                    inflight.insert(key.clone(), Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if !leader {
            debug!(key = %key, "joining in-flight schema load");
            return flight.wait();
        }

        let guard = LeaderGuard {
            cache: self,
            key,
            flight,
            finished: false,
        };
        bump(&self.counters.loads);
        let result = self.store.find_by_key(key);
        guard.finish(result)
    }

    /// Drop any cached value for `key` and detach an in-progress load so
    /// its result is not cached. The next `get` starts a fresh lookup, which
    /// can overlap the detached one still running.
    pub fn evict(&self, key: &SchemaKey) {
        let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
        if let Some(flight) = inflight.remove(key) {
            flight.superseded.store(true, Ordering::Release);
        }
        self.entries
            .lock()
            .expect("schema cache lock poisoned")
            .pop(key);
        bump(&self.counters.invalidations);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("schema cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let c = &self.counters;
        CacheStats {
            entries: self.len(),
            hits: c.hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            loads: c.loads.load(Ordering::Relaxed),
            load_failures: c.load_failures.load(Ordering::Relaxed),
            evictions: c.evictions.load(Ordering::Relaxed),
            expirations: c.expirations.load(Ordering::Relaxed),
            invalidations: c.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Fresh cached value, refreshing its access time. Expired entries are
    /// removed on sight.
    fn lookup(&self, key: &SchemaKey) -> Option<CachedModel> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("schema cache lock poisoned");
        let expired = match entries.get_mut(key) {
            Some(entry) if self.is_fresh(entry, now) => {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
            bump(&self.counters.expirations);
        }
        None
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_access) < self.ttl
    }

    /// Publish a leader's result. Caller must not hold `inflight`.
    fn finish_flight(&self, key: &SchemaKey, flight: &Arc<Flight>, result: LoadResult) {
        {
            let mut inflight = self.inflight.lock().expect("inflight lock poisoned");
            match &result {
                Ok(value) if !flight.superseded.load(Ordering::Acquire) => {
                    self.insert(key.clone(), value.clone());
                }
                Ok(_) => debug!(key = %key, "discarding load superseded by ingestion"),
                Err(e) => {
                    bump(&self.counters.load_failures);
                    warn!(key = %key, error = %e, "schema load failed");
                }
            }
            if inflight
                .get(key)
                .is_some_and(|current| Arc::ptr_eq(current, flight))
            {
                inflight.remove(key);
            }
        }
        flight.complete(result);
    }

    fn insert(&self, key: SchemaKey, value: CachedModel) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("schema cache lock poisoned");

        // The LRU tail has the oldest access time, so expired entries collect there.
        while entries
            .peek_lru()
            .is_some_and(|(_, entry)| !self.is_fresh(entry, now))
        {
            entries.pop_lru();
            bump(&self.counters.expirations);
        }

        let entry = CacheEntry {
            value,
            last_access: now,
        };
        if let Some((displaced, _)) = entries.push(key.clone(), entry) {
            if displaced != key {
                bump(&self.counters.evictions);
                debug!(key = %displaced, "schema cache full, evicted least recently used");
            }
        }
    }
}
