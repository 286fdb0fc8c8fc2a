//! # Per-event configuration.
//!
//! Provides [`EventConfig`], the knobs an [`Event`](crate::Event) is built with.
//!
//! Config is used in one way: `Event::with_config(config)`. `Event::new()`
//! and `Event::default()` use [`EventConfig::default`].
//!
//! ## Sentinel values
//! - `initial_capacity = 0` → treated as 1 (see [`EventConfig::initial_capacity_clamped`])

use crate::policies::{FailurePolicy, GrowthPolicy};

/// Configuration for a single event channel.
///
/// ## Field semantics
/// - `failure`: What `invoke` does when a handler panics
/// - `initial_capacity`: Slots reserved by the first `subscribe`; storage doubles from there
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventConfig {
    /// Panic handling during fan-out.
    ///
    /// - `Isolate` = every handler runs, failures are returned as `InvokeError`
    /// - `FailFast` = the first panic unwinds out of `invoke`
    pub failure: FailurePolicy,

    /// Number of slots allocated on the first `subscribe`.
    ///
    /// Growth afterwards is `max(initial_capacity, capacity * 2)`.
    pub initial_capacity: usize,
}

impl EventConfig {
    /// Returns the initial capacity clamped to a minimum of 1.
    #[inline]
    pub fn initial_capacity_clamped(&self) -> usize {
        self.initial_capacity.max(1)
    }

    /// Returns the growth policy derived from `initial_capacity`.
    #[inline]
    pub fn growth(&self) -> GrowthPolicy {
        GrowthPolicy::new(self.initial_capacity_clamped())
    }

    /// Returns a copy with a different failure policy.
    #[must_use]
    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    /// Returns a copy with a different initial capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for EventConfig {
    /// Default configuration:
    ///
    /// - `failure = FailurePolicy::Isolate` (one bad observer does not starve the rest)
    /// - `initial_capacity = 4`
    fn default() -> Self {
        Self {
            failure: FailurePolicy::default(),
            initial_capacity: 4,
        }
    }
}
