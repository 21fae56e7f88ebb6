//! Bounded cache engine.
//!
//! [`Cache`] composes an [`IndexStore`] with an [`EvictionPolicy`] and owns
//! the capacity rule: an absent key admitted into a full cache evicts exactly
//! one occupant first, so `len() <= capacity()` holds after every call.
//!
//! ## Insert Flow
//!
//! ```text
//!   insert_with(key, value, mode):
//!
//!     key present? ──yes──► mode allows update? ──no──► return false
//!          │                        │
//!          no                      yes ──► overwrite in place, return true
//!          │
//!          ▼
//!     mode allows insert? ──no──► return false
//!          │
//!         yes
//!          ▼
//!     len == capacity? ──yes──► policy.select_victim() → swap_remove_at(pos)
//!          │                                   │
//!          ◄───────────────────────────────────┘
//!          ▼
//!     store.put_with_meta(key, value, meta), return true
//! ```
//!
//! ## Batch Operations
//!
//! `insert_range`, `erase_range`, `find_range` and `find_range_fill` process
//! their input strictly in order, answer each position against the state
//! left by the previous one, and keep evicting as needed mid-batch.
//!
//! ## Capacity
//!
//! Capacity is fixed at construction and must be positive. [`Cache::new`]
//! panics on 0; [`Cache::try_new`] returns a [`ConfigError`].

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, FindMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::EvictionPolicy;
use crate::policy::random::RandomReplacement;
use crate::store::IndexStore;
use crate::traits::{Admission, BatchCache, CoreCache, ReadOnlyCache};

/// Fixed-capacity key-value cache with a pluggable eviction policy.
///
/// # Type Parameters
///
/// - `K`: Key type, must be `Clone + Eq + Hash`
/// - `V`: Value type
/// - `P`: Eviction policy, random replacement by default
///
/// # Example
///
/// ```
/// use rrcache::cache::Cache;
/// use rrcache::traits::Admission;
///
/// let mut cache: Cache<u64, String> = Cache::new(4);
///
/// assert!(cache.insert_with(1, "test".to_string(), Admission::InsertOnly));
/// assert!(!cache.insert_with(1, "test2".to_string(), Admission::InsertOnly));
/// assert_eq!(cache.find(&1), Some(&"test".to_string()));
///
/// assert!(!cache.insert_with(2, "nope".to_string(), Admission::UpdateOnly));
/// assert_eq!(cache.find(&2), None);
/// ```
pub struct Cache<K, V, P = RandomReplacement>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    store: IndexStore<K, V, P::Metadata>,
    policy: P,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V, P> Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    /// Creates a cache with a default-constructed policy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self
    where
        P: Default,
    {
        Self::with_policy(capacity, P::default())
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError>
    where
        P: Default,
    {
        Self::try_with_policy(capacity, P::default())
    }

    /// Creates a cache driven by `policy`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_policy(capacity: usize, policy: P) -> Self {
        match Self::try_with_policy(capacity, policy) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible form of [`with_policy`](Self::with_policy).
    pub fn try_with_policy(capacity: usize, policy: P) -> Result<Self, ConfigError> {
        Self::build(capacity, policy, true)
    }

    pub(crate) fn build(capacity: usize, policy: P, prealloc: bool) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        let store = if prealloc {
            IndexStore::with_capacity(capacity)
        } else {
            IndexStore::new()
        };
        debug!(capacity, prealloc, seeded = policy.is_seeded(), "cache created");
        Ok(Self {
            store,
            policy,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    // ------------------------------------------------------------------
    // Single-key operations
    // ------------------------------------------------------------------

    /// Inserts or updates `key`. Always returns `true`.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_with(key, value, Admission::InsertOrUpdate)
    }

    /// Applies `mode` to `key`. Returns `true` if the cache was mutated.
    ///
    /// When an absent key is admitted into a full cache, exactly one occupant
    /// chosen by the policy is evicted first.
    pub fn insert_with(&mut self, key: K, value: V, mode: Admission) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some((slot, meta)) = self.store.entry_mut(&key) {
            if !mode.allows_update() {
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_rejected();
                return false;
            }
            *slot = value;
            self.policy.on_update(meta);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return true;
        }

        if !mode.allows_insert() {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_rejected();
            return false;
        }

        if self.store.len() >= self.capacity {
            self.evict_one();
        }

        let mut meta = P::Metadata::default();
        self.policy.on_admit(&mut meta);
        self.store.put_with_meta(key, value, meta);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        debug_assert!(self.store.len() <= self.capacity);
        true
    }

    /// Removes the occupant the policy picks.
    fn evict_one(&mut self) {
        let occupants = self.store.len();
        debug_assert_eq!(occupants, self.capacity);
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let pos = self.policy.select_victim(&self.store);
        assert!(
            pos < occupants,
            "eviction policy chose position {} outside {} occupants",
            pos,
            occupants
        );
        if self.store.swap_remove_at(pos).is_some() {
            trace!(position = pos, occupants, "evicted victim");
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }

    /// Looks up `key` without touching eviction state.
    #[inline]
    pub fn find(&self, key: &K) -> Option<&V> {
        let found = self.store.get(key);
        #[cfg(feature = "metrics")]
        if found.is_some() {
            self.metrics.record_find_hit();
        } else {
            self.metrics.record_find_miss();
        }
        found
    }

    /// Mutable lookup. Like [`find`](Self::find), leaves policy state alone.
    #[inline]
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        self.store.get_mut(key)
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    /// Removes `key`. Returns `true` if it was resident. Never evicts.
    #[inline]
    pub fn erase(&mut self, key: &K) -> bool {
        self.erase_entry(key).is_some()
    }

    /// Removes `key`, handing back its value.
    pub fn erase_entry(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_erase_call();
        let removed = self.store.remove(key);
        #[cfg(feature = "metrics")]
        if removed.is_some() {
            self.metrics.record_erase_removed();
        }
        removed
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        self.store.clear();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of resident entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Alias of [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resident keys in dense order. Order changes on every removal.
    #[inline]
    pub fn keys(&self) -> &[K] {
        self.store.keys()
    }

    /// Iterates resident `(key, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.store.iter()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    // ------------------------------------------------------------------
    // Batch operations
    // ------------------------------------------------------------------

    /// Inserts or updates every pair in order. Returns the mutation count.
    ///
    /// Duplicate keys count once per position: the repeat is an update.
    pub fn insert_range<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert_range_with(pairs, Admission::InsertOrUpdate)
    }

    /// Applies `mode` to every pair in order. Returns the mutation count.
    ///
    /// # Example
    ///
    /// ```
    /// use rrcache::policy::random::RrCache;
    /// use rrcache::traits::Admission;
    ///
    /// let mut cache = RrCache::with_seed(4, 1);
    /// cache.insert_range([(1, "test1"), (2, "test2"), (3, "test3")]);
    ///
    /// let batch = [(1, "test1"), (2, "test2"), (3, "test3"), (4, "test4"), (5, "test5")];
    /// assert_eq!(cache.insert_range_with(batch, Admission::InsertOnly), 2);
    /// assert_eq!(cache.len(), 4);
    /// ```
    pub fn insert_range_with<I>(&mut self, pairs: I, mode: Admission) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut mutated = 0;
        for (key, value) in pairs {
            if self.insert_with(key, value, mode) {
                mutated += 1;
            }
        }
        mutated
    }

    /// Erases every key in order. Returns the number actually removed.
    ///
    /// # Example
    ///
    /// ```
    /// use rrcache::policy::random::RrCache;
    ///
    /// let mut cache = RrCache::with_seed(4, 1);
    /// cache.insert_range([(1, "test1"), (2, "test2"), (3, "test3")]);
    ///
    /// assert_eq!(cache.erase_range(&[1, 3, 4, 5]), 2);
    /// assert_eq!(cache.keys(), &[2]);
    /// ```
    pub fn erase_range<'a, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut removed = 0;
        for key in keys {
            if self.erase(key) {
                removed += 1;
            }
        }
        removed
    }

    /// Looks up every key, one `(key, value)` result per input position.
    ///
    /// # Example
    ///
    /// ```
    /// use rrcache::policy::random::RrCache;
    ///
    /// let mut cache = RrCache::with_seed(4, 1);
    /// cache.insert_range([(1, "test1"), (2, "test2"), (3, "test3")]);
    ///
    /// let found = cache.find_range(&[1, 3, 4, 5]);
    /// assert_eq!(found, vec![(1, Some("test1")), (3, Some("test3")), (4, None), (5, None)]);
    /// ```
    pub fn find_range<'a, I>(&self, keys: I) -> Vec<(K, Option<V>)>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
        V: Clone,
    {
        let keys = keys.into_iter();
        let mut out = Vec::with_capacity(keys.size_hint().0);
        for key in keys {
            out.push((key.clone(), self.find(key).cloned()));
        }
        out
    }

    /// Fills each slot in place with the value found for its key.
    ///
    /// Any previous slot content is overwritten; misses become `None`.
    /// Answers are identical to [`find_range`](Self::find_range) over the same
    /// keys.
    pub fn find_range_fill(&self, items: &mut [(K, Option<V>)])
    where
        V: Clone,
    {
        for (key, slot) in items.iter_mut() {
            *slot = self.find(key).cloned();
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Verifies the capacity bound and the index store's bookkeeping.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Debug,
    {
        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.store.len(),
                self.capacity
            )));
        }
        self.store.check_invariants()
    }
}

impl<K, V, P> Debug for Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("len", &self.store.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<K, V, P> ReadOnlyCache<K, V> for Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    #[inline]
    fn find(&self, key: &K) -> Option<&V> {
        Cache::find(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        Cache::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V, P> CoreCache<K, V> for Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    #[inline]
    fn insert_with(&mut self, key: K, value: V, mode: Admission) -> bool {
        Cache::insert_with(self, key, value, mode)
    }

    #[inline]
    fn erase(&mut self, key: &K) -> bool {
        Cache::erase(self, key)
    }

    fn clear(&mut self) {
        Cache::clear(self);
    }
}

impl<K, V, P> BatchCache<K, V> for Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    fn find_range<'a, I>(&self, keys: I) -> Vec<(K, Option<V>)>
    where
        I: IntoIterator<Item = &'a K>,
        K: Clone + 'a,
        V: Clone,
    {
        Cache::find_range(self, keys)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    /// Returns a snapshot of cache metrics.
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot::capture(&self.metrics, self.store.len(), self.capacity)
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsSnapshotProvider<CacheMetricsSnapshot> for Cache<K, V, P>
where
    K: Clone + Eq + Hash,
    P: EvictionPolicy<K, V>,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic policy: always vacates dense position 0.
    #[derive(Debug, Default)]
    struct EvictFront {
        calls: usize,
    }

    impl<K: Clone + Eq + Hash, V> EvictionPolicy<K, V> for EvictFront {
        type Metadata = ();

        fn select_victim(&mut self, _store: &IndexStore<K, V>) -> usize {
            self.calls += 1;
            0
        }
    }

    /// Counts admissions and updates through metadata hooks.
    #[derive(Debug, Default)]
    struct Stamping {
        admitted: u32,
        updated: u32,
    }

    impl<K: Clone + Eq + Hash, V> EvictionPolicy<K, V> for Stamping {
        type Metadata = u32;

        fn select_victim(&mut self, _store: &IndexStore<K, V, u32>) -> usize {
            0
        }

        fn on_admit(&mut self, meta: &mut u32) {
            self.admitted += 1;
            *meta = self.admitted;
        }

        fn on_update(&mut self, _meta: &mut u32) {
            self.updated += 1;
        }
    }

    /// Broken policy used to prove the engine refuses bad victims.
    #[derive(Debug, Default)]
    struct OutOfRange;

    impl<K: Clone + Eq + Hash, V> EvictionPolicy<K, V> for OutOfRange {
        type Metadata = ();

        fn select_victim(&mut self, store: &IndexStore<K, V>) -> usize {
            store.len()
        }
    }

    fn seeded(capacity: usize) -> Cache<u64, String> {
        Cache::with_policy(capacity, RandomReplacement::with_seed(0xC0FFEE))
    }

    fn test_pairs(keys: &[u64]) -> Vec<(u64, String)> {
        keys.iter().map(|k| (*k, format!("test{}", k))).collect()
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: Cache<u64, String> = Cache::new(4);
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
            assert_eq!(cache.size(), 0);
            assert_eq!(cache.capacity(), 4);
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = Cache::<u64, String>::try_new(0).unwrap_err();
            assert_eq!(err.message(), "capacity must be > 0");
        }

        #[test]
        #[should_panic(expected = "capacity must be > 0")]
        fn new_panics_on_zero_capacity() {
            let _cache: Cache<u64, String> = Cache::new(0);
        }

        #[test]
        fn debug_output_hides_entries() {
            let mut cache = seeded(2);
            cache.insert(1, "secret".to_string());
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("capacity: 2"));
            assert!(!dbg.contains("secret"));
        }
    }

    // ==============================================
    // Admission Modes
    // ==============================================

    mod admission {
        use super::*;

        #[test]
        fn find_missing_key() {
            let cache = seeded(4);
            assert_eq!(cache.find(&100), None);
        }

        #[test]
        fn insert_only() {
            let mut cache = seeded(4);
            assert!(cache.insert_with(1, "test".to_string(), Admission::InsertOnly));
            assert_eq!(cache.find(&1), Some(&"test".to_string()));

            assert!(!cache.insert_with(1, "test2".to_string(), Admission::InsertOnly));
            assert_eq!(cache.find(&1), Some(&"test".to_string()));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn update_only() {
            let mut cache = seeded(4);
            assert!(!cache.insert_with(1, "test".to_string(), Admission::UpdateOnly));
            assert_eq!(cache.find(&1), None);
            assert!(cache.is_empty());

            cache.insert(1, "test".to_string());
            assert!(cache.insert_with(1, "test2".to_string(), Admission::UpdateOnly));
            assert_eq!(cache.find(&1), Some(&"test2".to_string()));
        }

        #[test]
        fn insert_or_update() {
            let mut cache = seeded(4);
            assert!(cache.insert(1, "test".to_string()));
            assert_eq!(cache.find(&1), Some(&"test".to_string()));

            assert!(cache.insert(1, "test2".to_string()));
            assert_eq!(cache.find(&1), Some(&"test2".to_string()));
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn update_on_full_cache_never_evicts() {
            let mut cache: Cache<u64, String, EvictFront> = Cache::new(2);
            cache.insert(1, "a".to_string());
            cache.insert(2, "b".to_string());

            assert!(cache.insert(2, "B".to_string()));
            assert!(cache.insert_with(1, "A".to_string(), Admission::UpdateOnly));

            assert_eq!(cache.policy().calls, 0);
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn rejected_insert_on_full_cache_never_evicts() {
            let mut cache: Cache<u64, String, EvictFront> = Cache::new(1);
            cache.insert(1, "a".to_string());
            assert!(!cache.insert_with(2, "b".to_string(), Admission::UpdateOnly));
            assert_eq!(cache.policy().calls, 0);
            assert!(cache.contains(&1));
        }
    }

    // ==============================================
    // Eviction
    // ==============================================

    mod eviction {
        use super::*;

        #[test]
        fn admission_into_full_cache_evicts_exactly_one() {
            let mut cache: Cache<u64, String, EvictFront> = Cache::new(3);
            for k in 1..=3 {
                cache.insert(k, k.to_string());
            }

            cache.insert(4, "4".to_string());

            assert_eq!(cache.len(), 3);
            assert_eq!(cache.policy().calls, 1);
            assert!(!cache.contains(&1));
            assert!(cache.contains(&4));
            // Swap-remove moved the last key into position 0.
            assert_eq!(cache.keys(), &[3, 2, 4]);
        }

        #[test]
        fn size_and_capacity_track_inserts() {
            let mut cache = seeded(4);
            assert_eq!(cache.capacity(), 4);
            for k in 1..=6u64 {
                assert!(cache.insert(k, format!("test{}", k)));
                assert_eq!(cache.size(), k.min(4) as usize);
            }
            assert_eq!(cache.capacity(), 4);
        }

        #[test]
        fn single_slot_cache_keeps_newest() {
            let mut cache = seeded(1);
            cache.insert(1, "a".to_string());
            cache.insert(2, "b".to_string());
            assert_eq!(cache.keys(), &[2]);
        }

        #[test]
        #[should_panic(expected = "outside 2 occupants")]
        fn out_of_range_victim_is_fatal() {
            let mut cache: Cache<u64, u64, OutOfRange> = Cache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);
        }

        #[test]
        fn metadata_hooks_fire_once_per_event() {
            let mut cache: Cache<u64, u64, Stamping> = Cache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(1, 10);
            cache.insert(3, 3);

            assert_eq!(cache.policy().admitted, 3);
            assert_eq!(cache.policy().updated, 1);
            assert_eq!(cache.store.meta(&3), Some(&3));
        }
    }

    // ==============================================
    // Erase / Clear
    // ==============================================

    mod erase {
        use super::*;

        #[test]
        fn erase_present_and_absent() {
            let mut cache = seeded(4);
            assert!(cache.insert_with(1, "test".to_string(), Admission::InsertOnly));
            assert_eq!(cache.len(), 1);

            assert!(cache.erase(&1));
            assert_eq!(cache.find(&1), None);
            assert_eq!(cache.len(), 0);
            assert!(cache.is_empty());

            assert!(!cache.erase(&200));
        }

        #[test]
        fn erase_entry_returns_value() {
            let mut cache = seeded(4);
            cache.insert(7, "seven".to_string());
            assert_eq!(cache.erase_entry(&7), Some("seven".to_string()));
            assert_eq!(cache.erase_entry(&7), None);
        }

        #[test]
        fn empty_tracks_size() {
            let mut cache = seeded(4);
            assert!(cache.is_empty());
            assert!(cache.insert_with(1, "test".to_string(), Admission::InsertOnly));
            assert!(!cache.is_empty());
            assert!(cache.erase(&1));
            assert!(cache.is_empty());
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut cache = seeded(3);
            cache.insert_range(test_pairs(&[1, 2, 3]));
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 3);
            assert!(cache.insert(9, "x".to_string()));
        }

        #[test]
        fn find_mut_edits_in_place() {
            let mut cache = seeded(2);
            cache.insert(1, "a".to_string());
            cache.find_mut(&1).unwrap().push('b');
            assert_eq!(cache.find(&1), Some(&"ab".to_string()));
            assert_eq!(cache.find_mut(&2), None);
        }
    }

    // ==============================================
    // Batch Operations
    // ==============================================

    mod batch {
        use super::*;

        fn count_present(cache: &Cache<u64, String>, keys: &[u64]) -> usize {
            keys.iter().filter(|k| cache.find(k).is_some()).count()
        }

        #[test]
        fn insert_range_insert_only() {
            let mut cache = seeded(4);
            assert_eq!(
                cache.insert_range_with(test_pairs(&[1, 2, 3]), Admission::InsertOnly),
                3
            );
            assert_eq!(cache.size(), 3);
            for k in 1..=3 {
                assert_eq!(cache.find(&k), Some(&format!("test{}", k)));
            }

            assert_eq!(
                cache.insert_range_with(test_pairs(&[1, 2, 3, 4, 5]), Admission::InsertOnly),
                2
            );
            assert_eq!(cache.size(), 4);
            assert_eq!(count_present(&cache, &[1, 2, 3, 4, 5]), 4);
        }

        #[test]
        fn insert_range_update_only() {
            let mut cache = seeded(4);
            assert_eq!(
                cache.insert_range_with(test_pairs(&[1, 2, 3]), Admission::UpdateOnly),
                0
            );
            assert_eq!(cache.size(), 0);
            assert_eq!(count_present(&cache, &[1, 2, 3]), 0);
        }

        #[test]
        fn insert_range_insert_or_update() {
            let mut cache = seeded(4);
            assert_eq!(cache.insert_range(test_pairs(&[1, 2, 3])), 3);
            assert_eq!(cache.size(), 3);

            assert_eq!(cache.insert_range(test_pairs(&[2, 1, 3, 4, 5])), 5);
            assert_eq!(cache.size(), 4);
            assert_eq!(count_present(&cache, &[1, 2, 3, 4, 5]), 4);
        }

        #[test]
        fn insert_range_duplicate_keys_count_every_application() {
            let mut cache = seeded(4);
            assert_eq!(cache.insert_range(test_pairs(&[9, 9, 9])), 3);
            assert_eq!(cache.len(), 1);

            assert_eq!(
                cache.insert_range_with(test_pairs(&[8, 8]), Admission::InsertOnly),
                1
            );
        }

        #[test]
        fn insert_range_follows_input_order_across_evictions() {
            let mut cache: Cache<u64, String, EvictFront> = Cache::new(2);
            cache.insert_range(test_pairs(&[1, 2, 3, 4]));
            // [1,2] → evict pos 0 → [2,3] → evict pos 0 → [3,4]
            assert_eq!(cache.keys(), &[3, 4]);
            assert_eq!(cache.policy().calls, 2);
        }

        #[test]
        fn erase_range_counts_removed() {
            let mut cache = seeded(4);
            assert_eq!(cache.insert_range(test_pairs(&[1, 2, 3])), 3);

            assert_eq!(cache.erase_range(&[1, 3, 4, 5]), 2);

            assert_eq!(cache.size(), 1);
            assert_eq!(cache.find(&1), None);
            assert_eq!(cache.find(&2), Some(&"test2".to_string()));
            assert_eq!(cache.find(&3), None);
        }

        #[test]
        fn erase_range_duplicates_remove_once() {
            let mut cache = seeded(4);
            cache.insert_range(test_pairs(&[1, 2]));
            assert_eq!(cache.erase_range(&[1, 1, 1]), 1);
            assert_eq!(cache.keys(), &[2]);
        }

        #[test]
        fn find_range_positional() {
            let mut cache = seeded(4);
            cache.insert_range(test_pairs(&[1, 2, 3]));

            let items = cache.find_range(&[1, 2, 3]);
            assert_eq!(
                items,
                vec![
                    (1, Some("test1".to_string())),
                    (2, Some("test2".to_string())),
                    (3, Some("test3".to_string())),
                ]
            );

            let items = cache.find_range(&[1, 3, 4, 5]);
            assert_eq!(
                items,
                vec![
                    (1, Some("test1".to_string())),
                    (3, Some("test3".to_string())),
                    (4, None),
                    (5, None),
                ]
            );
        }

        #[test]
        fn find_range_answers_duplicates_per_position() {
            let mut cache = seeded(4);
            cache.insert(1, "one".to_string());
            let items = cache.find_range(&[1, 2, 1]);
            assert_eq!(items.len(), 3);
            assert_eq!(items[0], items[2]);
            assert_eq!(items[1], (2, None));
        }

        #[test]
        fn find_range_fill_in_place() {
            let mut cache = seeded(4);
            cache.insert_range(test_pairs(&[1, 2, 3]));

            let mut items: Vec<(u64, Option<String>)> = vec![(1, None), (2, None), (3, None)];
            cache.find_range_fill(&mut items);
            assert_eq!(items[0], (1, Some("test1".to_string())));
            assert_eq!(items[1], (2, Some("test2".to_string())));
            assert_eq!(items[2], (3, Some("test3".to_string())));

            let mut items: Vec<(u64, Option<String>)> =
                vec![(1, None), (3, None), (4, Some("stale".to_string())), (5, None)];
            cache.find_range_fill(&mut items);
            assert_eq!(items[0], (1, Some("test1".to_string())));
            assert_eq!(items[1], (3, Some("test3".to_string())));
            assert_eq!(items[2], (4, None));
            assert_eq!(items[3], (5, None));
        }

        #[test]
        fn batch_trait_uses_engine_semantics() {
            fn via_trait<C: BatchCache<u64, String>>(cache: &mut C) -> (usize, usize) {
                let inserted = cache.insert_range(test_pairs(&[1, 2, 3, 4, 5]));
                let erased = cache.erase_range(&[1, 2, 3, 4, 5]);
                (inserted, erased)
            }

            let mut cache = seeded(3);
            assert_eq!(via_trait(&mut cache), (5, 3));
            assert!(cache.is_empty());
        }
    }

    // ==============================================
    // Invariants
    // ==============================================

    mod invariants {
        use super::*;

        #[test]
        fn check_invariants_after_churn() {
            let mut cache = seeded(10);
            for i in 0..200u64 {
                cache.insert(i % 37, i.to_string());
                if i % 5 == 0 {
                    cache.erase(&(i % 11));
                }
                cache.check_invariants().unwrap();
            }
            assert!(cache.len() <= 10);
        }

        #[test]
        fn iter_matches_keys() {
            let mut cache = seeded(5);
            cache.insert_range(test_pairs(&[1, 2, 3, 4, 5, 6, 7]));
            let iter_keys: Vec<u64> = cache.iter().map(|(k, _)| *k).collect();
            assert_eq!(iter_keys.as_slice(), cache.keys());
            for (k, v) in cache.iter() {
                assert_eq!(v, &format!("test{}", k));
            }
        }
    }

    // ==============================================
    // Metrics
    // ==============================================

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counters_follow_operations() {
            let mut cache = seeded(2);
            cache.insert(1, "a".to_string());
            cache.insert(2, "b".to_string());
            cache.insert(2, "B".to_string());
            cache.insert_with(2, "x".to_string(), Admission::InsertOnly);
            cache.insert(3, "c".to_string());
            cache.find(&3);
            cache.find(&99);
            cache.erase(&3);
            cache.erase(&3);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_calls, 5);
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.insert_rejected, 1);
            assert_eq!(snap.evict_calls, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.find_calls, 2);
            assert_eq!(snap.find_hits, 1);
            assert_eq!(snap.find_misses, 1);
            assert_eq!(snap.erase_calls, 2);
            assert_eq!(snap.erase_removed, 1);
            assert_eq!(snap.cache_len, 1);
            assert_eq!(snap.capacity, 2);
            assert!((snap.hit_rate() - 0.5).abs() < f64::EPSILON);
        }

        #[test]
        fn reset_metrics_keeps_entries() {
            let mut cache = seeded(2);
            cache.insert(1, "a".to_string());
            cache.reset_metrics();
            let snap = cache.snapshot();
            assert_eq!(snap.insert_calls, 0);
            assert_eq!(snap.cache_len, 1);
        }
    }
}
