pub use crate::builder::{CacheBuilder, CacheConfig};
pub use crate::cache::Cache;
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::EvictionPolicy;
pub use crate::policy::random::{RandomReplacement, RrCache};
pub use crate::store::IndexStore;
pub use crate::traits::{Admission, BatchCache, CoreCache, ReadOnlyCache};
