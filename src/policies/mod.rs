//! Failure and growth policies.
//!
//! This module groups the knobs that control **what happens when a handler
//! panics** and **how slot storage grows**.
//!
//! ## Contents
//! - [`FailurePolicy`] isolate-and-report vs. fail-fast on handler panics
//! - [`GrowthPolicy`]  capacity floor, then doubling
//!
//! ## Quick wiring
//! ```text
//! EventConfig { failure: FailurePolicy, initial_capacity: usize }
//!      └─► channel::event::Event uses:
//!           - failure to decide catch_unwind vs. plain calls during invoke
//!           - GrowthPolicy::new(initial_capacity) when slots are full
//! ```
//!
//! ## Defaults
//! - `FailurePolicy::Isolate`.
//! - `GrowthPolicy::default()` → floor=4, then ×2.

mod failure;
mod growth;

pub use failure::FailurePolicy;
pub use growth::GrowthPolicy;
