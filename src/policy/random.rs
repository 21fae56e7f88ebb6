//! Random cache replacement policy.
//!
//! Victims are selected uniformly at random among resident keys when an
//! absent key must be admitted into a full cache. No access pattern is
//! tracked, so lookups never change any entry's eviction odds.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                       RrCache<K, V> = Cache<K, V, RandomReplacement>         │
//! │                                                                             │
//! │   ┌───────────────────────────────┐     ┌───────────────────────────────┐   │
//! │   │  IndexStore<K, V, ()>         │     │  RandomReplacement            │   │
//! │   │    map:  K → (pos, V)         │◄────│    rng: SmallRng              │   │
//! │   │    keys: [k0, k1, k2, k3]     │     │    (owned per cache)          │   │
//! │   └───────────────────────────────┘     └───────────────────────────────┘   │
//! │                                                                             │
//! │   Random Eviction (O(1))                                                    │
//! │                                                                             │
//! │     1. i = rng.random_range(0..len)                                         │
//! │     2. victim = keys[i]                                                     │
//! │     3. keys.swap_remove(i), repoint the key moved into slot i               │
//! │     4. map.remove(victim)                                                   │
//! │                                                                             │
//! │   Example: evict random from [A, B, C, D]                                   │
//! │     - rng picks index 1 (B)                                                 │
//! │     - swap-remove: [A, D, C]                                                │
//! │     - D's recorded position becomes 1                                       │
//! │     - B removed from map                                                    │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time   | Notes                                      |
//! |-------------|--------|--------------------------------------------|
//! | `find`      | O(1)   | Hash lookup, no bookkeeping                |
//! | `insert`    | O(1)*  | *Amortized, may trigger one random eviction|
//! | `erase`     | O(1)   | Swap-remove, never evicts                  |
//! | `len`       | O(1)   |                                            |
//!
//! ## Randomness
//!
//! Each cache owns its generator. Two caches never share a stream, so their
//! eviction sequences are independent, and a cache built with
//! [`RrCache::with_seed`] replays the same evictions for the same operations.
//!
//! ## Example Usage
//!
//! ```
//! use rrcache::policy::random::RrCache;
//!
//! let mut cache = RrCache::with_seed(2, 7);
//! cache.insert(1, "Hello");
//! cache.insert(2, "World");
//!
//! // Replaces "Hello" or "World"; which one is up to the generator.
//! cache.insert(3, "Hola");
//!
//! assert_eq!(cache.find(&3), Some(&"Hola"));
//! let survivors = [1, 2].iter().filter(|k| cache.contains(k)).count();
//! assert_eq!(survivors, 1);
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. Wrap in external synchronization for shared access.

use std::hash::Hash;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::cache::Cache;
use crate::error::ConfigError;
use crate::policy::EvictionPolicy;
use crate::store::IndexStore;

/// Uniform random victim selection.
///
/// # Example
///
/// ```
/// use rrcache::policy::EvictionPolicy;
/// use rrcache::policy::random::RandomReplacement;
/// use rrcache::store::IndexStore;
///
/// let mut store: IndexStore<u32, u32> = IndexStore::new();
/// store.put(10, 0);
/// store.put(20, 0);
///
/// let mut policy = RandomReplacement::with_seed(3);
/// let pos = EvictionPolicy::<u32, u32>::select_victim(&mut policy, &store);
/// assert!(pos < 2);
/// ```
///
/// Deliberately not `Clone`: a copied generator replays the original's
/// victims, so each cache must own a distinct stream.
///
/// ```compile_fail
/// use rrcache::policy::random::RandomReplacement;
///
/// let policy = RandomReplacement::with_seed(1);
/// let _copy = policy.clone();
/// ```
pub struct RandomReplacement {
    rng: SmallRng,
    seeded: bool,
}

impl RandomReplacement {
    /// Seeds the generator from the operating system.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            seeded: false,
        }
    }

    /// Deterministic generator; the same seed replays the same victims.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seeded: true,
        }
    }

    /// `true` if built from an explicit seed.
    #[inline]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

impl Default for RandomReplacement {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomReplacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomReplacement")
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

impl<K, V> EvictionPolicy<K, V> for RandomReplacement
where
    K: Clone + Eq + Hash,
{
    type Metadata = ();

    #[inline]
    fn select_victim(&mut self, store: &IndexStore<K, V>) -> usize {
        match store.sample_position(&mut self.rng) {
            Some(pos) => pos,
            None => panic!("select_victim called on an empty occupant set"),
        }
    }

    #[inline]
    fn is_seeded(&self) -> bool {
        self.seeded
    }
}

/// Random-replacement cache.
pub type RrCache<K, V> = Cache<K, V, RandomReplacement>;

impl<K, V> Cache<K, V, RandomReplacement>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache whose evictions replay deterministically for `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use rrcache::policy::random::RrCache;
    ///
    /// let mut a = RrCache::with_seed(4, 99);
    /// let mut b = RrCache::with_seed(4, 99);
    /// for i in 0..32 {
    ///     a.insert(i, i);
    ///     b.insert(i, i);
    /// }
    /// assert_eq!(a.keys(), b.keys());
    /// ```
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_policy(capacity, RandomReplacement::with_seed(seed))
    }

    /// Fallible form of [`with_seed`](Self::with_seed).
    pub fn try_with_seed(capacity: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::try_with_policy(capacity, RandomReplacement::with_seed(seed))
    }
}
