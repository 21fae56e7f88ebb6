//! rrcache: a bounded in-process key-value cache with random replacement.
//!
//! The engine ([`cache::Cache`]) enforces a fixed capacity and delegates
//! victim choice to an [`policy::EvictionPolicy`]. The default policy,
//! [`policy::RandomReplacement`], picks a uniformly random resident key and
//! tracks no access history, so lookups never affect eviction.
//!
//! ```
//! use rrcache::prelude::*;
//!
//! let mut cache = RrCache::with_seed(2, 1);
//! cache.insert(1, "Hello");
//! cache.insert(2, "World");
//! cache.insert(3, "Hola");
//!
//! assert_eq!(cache.len(), 2);
//! assert_eq!(cache.find(&3), Some(&"Hola"));
//! ```

pub mod builder;
pub mod cache;
pub mod error;
pub mod policy;
pub mod store;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
