//! # Slot storage growth policy.
//!
//! [`GrowthPolicy`] decides the next capacity of an event's slot storage once
//! every reserved slot is occupied:
//!
//! ```text
//! next(cap) = max(floor, cap * 2)
//!
//! floor = 4:   0 → 4 → 8 → 16 → 32 → ...
//! ```
//!
//! Doubling keeps `subscribe` amortized O(1). The floor avoids a string of
//! tiny reallocations for events that only ever see a handful of handlers.

/// Capacity growth for slot storage: start at `floor`, double thereafter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity of the first allocation. Clamped to a minimum of 1.
    pub floor: usize,
}

impl GrowthPolicy {
    /// Creates a policy with the given first-allocation capacity.
    pub fn new(floor: usize) -> Self {
        Self { floor }
    }

    /// Computes the capacity that follows `current`.
    ///
    /// Saturates instead of overflowing; an allocation that large aborts
    /// the process long before the arithmetic matters.
    pub fn next(&self, current: usize) -> usize {
        current.saturating_mul(2).max(self.floor.max(1))
    }
}

impl Default for GrowthPolicy {
    /// Returns a policy with `floor = 4`.
    fn default() -> Self {
        Self { floor: 4 }
    }
}
