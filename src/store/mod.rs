//! Storage backends for cache engines.
//!
//! Stores focus on key/value ownership and lookup semantics, while policies
//! decide which occupant leaves. This keeps policy logic independent of how
//! entries are held.

pub mod index;

pub use index::IndexStore;
