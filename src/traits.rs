//! # Cache Trait Hierarchy
//!
//! Defines the uniform operation contract shared by every cache engine,
//! independent of which eviction policy picks victims.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │          ReadOnlyCache<K, V>            │
//!   │                                         │
//!   │  contains(&, &K) → bool                 │
//!   │  find(&, &K) → Option<&V>               │
//!   │  len / is_empty / capacity              │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert_with(K, V, Admission) → bool    │
//!   │  insert(K, V) → bool                    │
//!   │  erase(&K) → bool                       │
//!   │  clear()                                │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           BatchCache<K, V>              │
//!   │                                         │
//!   │  insert_range / insert_range_with       │
//!   │  erase_range → usize                    │
//!   │  find_range → Vec<(K, Option<V>)>       │
//!   │  find_range_fill(&mut [(K, Option<V>)]) │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Admission Modes
//!
//! | Mode             | Key absent        | Key present           |
//! |------------------|-------------------|-----------------------|
//! | `InsertOnly`     | admit → `true`    | no-op → `false`       |
//! | `UpdateOnly`     | no-op → `false`   | overwrite → `true`    |
//! | `InsertOrUpdate` | admit → `true`    | overwrite → `true`    |
//!
//! ## Batch Semantics
//!
//! Batch operations walk their input in caller order and answer each position
//! against the cache state as of that point. Duplicate keys are answered
//! independently: a second `erase` of the same key finds nothing, a second
//! `InsertOrUpdate` of the same key is an update and counts.
//!
//! The default batch implementations loop over the single-key operations, so
//! any engine that implements [`CoreCache`] gets correct batch behaviour for
//! free.
//!
//! ## Thread Safety
//!
//! None of these traits imply synchronization. Engines are single-threaded;
//! wrap them in a lock for shared access.

/// Whether an insert may create new entries, update existing ones, or both.
///
/// # Example
///
/// ```
/// use rrcache::traits::Admission;
///
/// assert_eq!(Admission::default(), Admission::InsertOrUpdate);
/// assert!(Admission::InsertOnly.allows_insert());
/// assert!(!Admission::InsertOnly.allows_update());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Admission {
    /// Only admit absent keys; present keys are left untouched.
    InsertOnly,
    /// Only overwrite present keys; absent keys are not admitted.
    UpdateOnly,
    /// Admit absent keys and overwrite present ones.
    #[default]
    InsertOrUpdate,
}

impl Admission {
    /// `true` if this mode may admit an absent key.
    #[inline]
    pub const fn allows_insert(self) -> bool {
        matches!(self, Admission::InsertOnly | Admission::InsertOrUpdate)
    }

    /// `true` if this mode may overwrite a present key.
    #[inline]
    pub const fn allows_update(self) -> bool {
        matches!(self, Admission::UpdateOnly | Admission::InsertOrUpdate)
    }
}

/// Side-effect free cache queries.
pub trait ReadOnlyCache<K, V> {
    /// Checks if a key is resident.
    fn contains(&self, key: &K) -> bool;

    /// Looks up a value without touching any eviction state.
    fn find(&self, key: &K) -> Option<&V>;

    /// Current number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries. Fixed for the cache's lifetime.
    fn capacity(&self) -> usize;
}

/// Single-key mutations every cache supports.
///
/// # Example
///
/// ```
/// use rrcache::policy::random::RrCache;
/// use rrcache::traits::{Admission, CoreCache, ReadOnlyCache};
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert_with(*key, value.clone(), Admission::InsertOnly);
///     }
/// }
///
/// let mut cache = RrCache::with_seed(8, 1);
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Applies `mode` to `key`. Returns `true` if the cache was mutated.
    ///
    /// Admitting an absent key into a full cache evicts exactly one occupant
    /// first.
    fn insert_with(&mut self, key: K, value: V, mode: Admission) -> bool;

    /// Inserts or updates `key`. Always returns `true`.
    fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_with(key, value, Admission::InsertOrUpdate)
    }

    /// Removes `key`. Returns `true` if it was resident. Never evicts.
    fn erase(&mut self, key: &K) -> bool;

    /// Drops every entry. Capacity is unchanged.
    fn clear(&mut self);
}

/// Ordered batch forms of the single-key operations.
pub trait BatchCache<K, V>: CoreCache<K, V> {
    /// Inserts or updates every pair in order. Returns the mutation count.
    fn insert_range<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.insert_range_with(pairs, Admission::InsertOrUpdate)
    }

    /// Applies `mode` to every pair in order. Returns the mutation count.
    fn insert_range_with<I>(&mut self, pairs: I, mode: Admission) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| self.insert_with(key, value, mode))
            .filter(|mutated| *mutated)
            .count()
    }

    /// Erases every key in order. Returns the number actually removed.
    fn erase_range<'a, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().filter(|key| self.erase(key)).count()
    }

    /// Looks up every key, one result per input position.
    fn find_range<'a, I>(&self, keys: I) -> Vec<(K, Option<V>)>
    where
        I: IntoIterator<Item = &'a K>,
        K: Clone + 'a,
        V: Clone,
    {
        keys.into_iter()
            .map(|key| (key.clone(), self.find(key).cloned()))
            .collect()
    }

    /// Fills each slot with the value found for its key, or `None`.
    fn find_range_fill(&self, items: &mut [(K, Option<V>)])
    where
        V: Clone,
    {
        for (key, slot) in items.iter_mut() {
            *slot = self.find(key).cloned();
        }
    }
}
