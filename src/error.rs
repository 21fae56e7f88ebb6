//! Errors surfaced by cache construction and self-checks.
//!
//! Both types carry a plain message. Construction failures are a
//! [`ConfigError`]; a failed `check_invariants` is an [`InvariantError`].

use std::fmt;

macro_rules! message_error {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub fn new(msg: impl Into<String>) -> Self {
                Self(msg.into())
            }

            #[inline]
            pub fn message(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::error::Error for $name {}
    };
}

message_error! {
    /// Bookkeeping mismatch reported by
    /// [`IndexStore::check_invariants`](crate::store::IndexStore::check_invariants)
    /// or [`Cache::check_invariants`](crate::cache::Cache::check_invariants).
    InvariantError
}

message_error! {
    /// Rejected cache settings.
    ///
    /// ```
    /// use rrcache::policy::random::RrCache;
    ///
    /// let err = RrCache::<u64, u64>::try_new(0).unwrap_err();
    /// assert_eq!(err.message(), "capacity must be > 0");
    /// ```
    ConfigError
}

impl ConfigError {
    pub(crate) fn zero_capacity() -> Self {
        Self::new("capacity must be > 0")
    }
}
