//! Eviction policies.
//!
//! A policy is consulted by the engine only when an absent key must be
//! admitted into a full cache. It sees the whole [`IndexStore`] and names one
//! dense position to vacate. Per-entry bookkeeping lives in
//! [`EvictionPolicy::Metadata`], stored beside each value in the index.
//!
//! | Policy               | Metadata | Victim                         |
//! |----------------------|----------|--------------------------------|
//! | [`RandomReplacement`] | `()`     | Uniform over resident keys     |

pub mod random;

pub use random::{RandomReplacement, RrCache};

use crate::store::IndexStore;

/// Victim selection strategy for a bounded cache.
///
/// # Contract
///
/// - [`select_victim`](Self::select_victim) is only called when the store is
///   full (`len == capacity`, `capacity > 0`).
/// - It must return a position in `0..store.len()`; the engine treats any
///   other answer as a broken invariant and panics.
/// - It must not assume anything about position order beyond "dense": the
///   store swap-removes, so positions get reshuffled on every removal.
///
/// # Example
///
/// ```
/// use rrcache::cache::Cache;
/// use rrcache::policy::EvictionPolicy;
/// use rrcache::store::IndexStore;
///
/// /// Always evicts whatever currently sits at position 0.
/// #[derive(Default)]
/// struct EvictFront;
///
/// impl<K, V> EvictionPolicy<K, V> for EvictFront {
///     type Metadata = ();
///
///     fn select_victim(&mut self, _store: &IndexStore<K, V>) -> usize {
///         0
///     }
/// }
///
/// let mut cache: Cache<u32, &str, EvictFront> = Cache::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.insert(3, "c");
/// assert!(!cache.contains(&1));
/// ```
pub trait EvictionPolicy<K, V> {
    /// Per-entry state kept alongside every value.
    type Metadata: Default;

    /// Picks the dense position of the occupant to evict.
    fn select_victim(&mut self, store: &IndexStore<K, V, Self::Metadata>) -> usize;

    /// Called once for a newly admitted entry, before it is stored.
    #[inline]
    fn on_admit(&mut self, _meta: &mut Self::Metadata) {}

    /// Called when a resident entry's value is overwritten.
    #[inline]
    fn on_update(&mut self, _meta: &mut Self::Metadata) {}

    /// `true` if victim choice replays deterministically from a caller seed.
    #[inline]
    fn is_seeded(&self) -> bool {
        false
    }
}
