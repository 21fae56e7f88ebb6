use std::cell::Cell;

/// A counter that can be bumped through `&self`.
///
/// Lets read-only cache calls such as `find` record metrics. The `Cell`
/// keeps the owning cache `!Sync`, matching its single-threaded contract.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
