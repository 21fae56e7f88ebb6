//! Dense index store backing every cache engine.
//!
//! Pairs a hash index with a dense, position-addressable vector of resident
//! keys so that lookups, updates, removals and uniform sampling are all O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                      IndexStore<K, V, M> Layout                             │
//! │                                                                             │
//! │   map: FxHashMap<K, Slot<V, M>>            keys: Vec<K>                     │
//! │        key → (pos, value, meta)                 dense occupant set          │
//! │                                                                             │
//! │   ┌──────────┬─────────────────┐            ┌─────┬─────┬─────┬─────┐       │
//! │   │   Key    │ (pos, val, M)   │            │  0  │  1  │  2  │  3  │       │
//! │   ├──────────┼─────────────────┤            ├─────┼─────┼─────┼─────┤       │
//! │   │    A     │ (0, va, ·)      │───────────►│  A  │  B  │  C  │  D  │       │
//! │   │    B     │ (1, vb, ·)      │            └─────┴─────┴─────┴─────┘       │
//! │   │    C     │ (2, vc, ·)      │                                            │
//! │   │    D     │ (3, vd, ·)      │                                            │
//! │   └──────────┴─────────────────┘                                            │
//! │                                                                             │
//! │   Swap-remove of B (pos 1):                                                 │
//! │     keys.swap_remove(1)              → [A, D, C]                            │
//! │     map[D].pos = 1                                                          │
//! │     map.remove(B)                                                           │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation         | Time   | Notes                                   |
//! |-------------------|--------|-----------------------------------------|
//! | `contains`/`get`  | O(1)   | Hash lookup                             |
//! | `put`             | O(1)*  | *Amortized; never changes len on update |
//! | `remove`          | O(1)   | Swap-remove in the dense vector         |
//! | `swap_remove_at`  | O(1)   | Remove by dense position                |
//! | `sample_uniform`  | O(1)   | Random index into the dense vector      |
//! | `check_invariants`| O(n)   | Full cross-check of map and vector      |
//!
//! The store has no notion of capacity. Bounding is the engine's job.

use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::InvariantError;

struct Slot<V, M> {
    /// Position of the owning key in `keys`.
    pos: usize,
    value: V,
    meta: M,
}

/// Hash index plus dense occupant vector.
///
/// `M` is per-entry policy metadata; random replacement uses `()`.
///
/// # Example
///
/// ```
/// use rrcache::store::IndexStore;
///
/// let mut store: IndexStore<&str, i32> = IndexStore::with_capacity(4);
/// assert_eq!(store.put("a", 1), None);
/// assert_eq!(store.put("a", 2), Some(1));
/// assert_eq!(store.occupant_count(), 1);
///
/// assert_eq!(store.remove(&"a"), Some(2));
/// assert!(store.is_empty());
/// ```
pub struct IndexStore<K, V, M = ()> {
    map: FxHashMap<K, Slot<V, M>>,
    keys: Vec<K>,
}

impl<K, V, M> IndexStore<K, V, M>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty store without preallocating.
    pub fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Creates an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            keys: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|slot| &slot.value)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.map.get_mut(key).map(|slot| &mut slot.value)
    }

    /// Returns the policy metadata stored for `key`.
    #[inline]
    pub fn meta(&self, key: &K) -> Option<&M> {
        self.map.get(key).map(|slot| &slot.meta)
    }

    /// Returns the value and metadata of `key` for in-place mutation.
    #[inline]
    pub fn entry_mut(&mut self, key: &K) -> Option<(&mut V, &mut M)> {
        self.map
            .get_mut(key)
            .map(|slot| (&mut slot.value, &mut slot.meta))
    }

    /// Inserts `key` if absent, otherwise overwrites its value in place.
    ///
    /// Existing metadata is kept on overwrite; new entries start from
    /// `M::default()`. Returns the previous value, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        M: Default,
    {
        if let Some(slot) = self.map.get_mut(&key) {
            return Some(std::mem::replace(&mut slot.value, value));
        }
        self.put_with_meta(key, value, M::default())
    }

    /// Inserts or overwrites `key`, replacing both value and metadata.
    pub fn put_with_meta(&mut self, key: K, value: V, meta: M) -> Option<V> {
        match self.map.entry(key) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                slot.meta = meta;
                Some(std::mem::replace(&mut slot.value, value))
            },
            Entry::Vacant(vacant) => {
                let pos = self.keys.len();
                self.keys.push(vacant.key().clone());
                vacant.insert(Slot { pos, value, meta });
                None
            },
        }
    }

    /// Removes `key`, returning its value if it was resident.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.map.remove(key)?;
        self.detach(slot.pos);
        Some(slot.value)
    }

    /// Removes the occupant at dense position `pos`.
    ///
    /// Returns `None` when `pos` is out of range.
    pub fn swap_remove_at(&mut self, pos: usize) -> Option<(K, V)> {
        if pos >= self.keys.len() {
            return None;
        }
        let key = self.keys.swap_remove(pos);
        self.repoint(pos);
        let slot = self.map.remove(&key)?;
        Some((key, slot.value))
    }

    /// Drops `keys[pos]` and repairs the position of the key moved into it.
    fn detach(&mut self, pos: usize) {
        self.keys.swap_remove(pos);
        self.repoint(pos);
    }

    #[inline]
    fn repoint(&mut self, pos: usize) {
        if let Some(moved) = self.keys.get(pos)
            && let Some(slot) = self.map.get_mut(moved)
        {
            slot.pos = pos;
        }
    }

    /// Number of resident keys.
    #[inline]
    pub fn occupant_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The dense occupant set, in current position order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub fn key_at(&self, pos: usize) -> Option<&K> {
        self.keys.get(pos)
    }

    #[inline]
    pub fn position_of(&self, key: &K) -> Option<usize> {
        self.map.get(key).map(|slot| slot.pos)
    }

    /// Draws a dense position uniformly from `[0, len)`.
    ///
    /// Returns `None` when the store is empty.
    #[inline]
    pub fn sample_position<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.keys.is_empty() {
            return None;
        }
        Some(rng.random_range(0..self.keys.len()))
    }

    /// Draws a resident key uniformly at random.
    #[inline]
    pub fn sample_uniform<R: Rng>(&self, rng: &mut R) -> Option<&K> {
        self.sample_position(rng).map(|pos| &self.keys[pos])
    }

    /// Iterates `(key, value)` pairs in dense position order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.keys
            .iter()
            .filter_map(|key| self.map.get(key).map(|slot| (key, &slot.value)))
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.keys.clear();
    }

    /// Cross-checks the hash index against the dense occupant vector.
    ///
    /// Verifies equal sizes, that every recorded position points back at its
    /// key, and that no key is listed twice.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Debug,
    {
        if self.map.len() != self.keys.len() {
            return Err(InvariantError::new(format!(
                "Map size {} != dense key count {}",
                self.map.len(),
                self.keys.len()
            )));
        }

        for (key, slot) in &self.map {
            match self.keys.get(slot.pos) {
                Some(at) if at == key => {},
                Some(at) => {
                    return Err(InvariantError::new(format!(
                        "Key {:?} records position {} but keys[{}] is {:?}",
                        key, slot.pos, slot.pos, at
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "Key {:?} records position {} beyond {} occupants",
                        key,
                        slot.pos,
                        self.keys.len()
                    )));
                },
            }
        }

        // Catches keys present in the vector but indexed elsewhere.
        for (pos, key) in self.keys.iter().enumerate() {
            match self.map.get(key) {
                Some(slot) if slot.pos == pos => {},
                _ => {
                    return Err(InvariantError::new(format!(
                        "keys[{}] = {:?} is not indexed at that position",
                        pos, key
                    )));
                },
            }
        }

        Ok(())
    }
}

impl<K, V, M> Default for IndexStore<K, V, M>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, M> Debug for IndexStore<K, V, M>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("len", &self.keys.len())
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
