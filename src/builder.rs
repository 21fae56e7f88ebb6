//! Configuration-driven construction of random-replacement caches.
//!
//! [`CacheConfig`] is plain data that can be filled from any configuration
//! source; [`CacheBuilder`] turns it into an [`RrCache`].
//!
//! ## Example
//!
//! ```rust
//! use rrcache::builder::CacheBuilder;
//!
//! let mut cache = CacheBuilder::new(100).seed(42).build::<u64, String>();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.find(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::cache::Cache;
use crate::error::ConfigError;
use crate::policy::random::{RandomReplacement, RrCache};

/// Settings for a random-replacement cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of resident entries. Must be positive.
    pub capacity: usize,
    /// Generator seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Reserve index storage for `capacity` entries up front.
    pub prealloc_memory: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            seed: None,
            prealloc_memory: true,
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    config: CacheConfig,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    /// Start from a complete configuration.
    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Fix the generator seed so evictions replay deterministically.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc_memory = prealloc;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Build the cache, rejecting invalid settings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rrcache::builder::{CacheBuilder, CacheConfig};
    ///
    /// let config = CacheConfig { capacity: 0, ..CacheConfig::default() };
    /// let err = CacheBuilder::from_config(config).try_build::<u64, u64>().unwrap_err();
    /// assert_eq!(err.message(), "capacity must be > 0");
    /// ```
    pub fn try_build<K, V>(self) -> Result<RrCache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
    {
        let CacheConfig {
            capacity,
            seed,
            prealloc_memory,
        } = self.config;
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        let policy = match seed {
            Some(seed) => RandomReplacement::with_seed(seed),
            None => RandomReplacement::new(),
        };
        Cache::build(capacity, policy, prealloc_memory)
    }

    /// Build the cache.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is 0.
    pub fn build<K, V>(self) -> RrCache<K, V>
    where
        K: Clone + Eq + Hash,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }
}

impl From<CacheConfig> for CacheBuilder {
    fn from(config: CacheConfig) -> Self {
        Self::from_config(config)
    }
}
