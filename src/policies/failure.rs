//! # Failure policies for event fan-out.
//!
//! [`FailurePolicy`] determines what happens when a handler panics while an
//! [`Event`](crate::Event) is being invoked.
//!
//! - [`FailurePolicy::Isolate`] every handler runs; panics are collected and reported (default).
//! - [`FailurePolicy::FailFast`] the first panic propagates; later handlers are skipped.
//!
//! ## Choosing the right policy
//!
//! **Independent observers** (logging, metrics, UI refresh):
//! ```text
//! FailurePolicy::Isolate   → handler #2 panics → #3..#n still run
//!                          → invoke() returns Err(HandlersPanicked { .. })
//! ```
//!
//! **Observers that form one logical transaction**:
//! ```text
//! FailurePolicy::FailFast  → handler #2 panics → panic unwinds out of invoke()
//!                          → #3..#n are not called for this invocation
//! ```

/// Policy controlling how [`Event::invoke`](crate::Event::invoke) treats a panicking handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Catch each handler's panic, keep fanning out, report all failures afterwards (default).
    #[default]
    Isolate,
    /// Let the first panic unwind out of `invoke`; remaining handlers are not called.
    FailFast,
}

impl FailurePolicy {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailurePolicy::Isolate => "isolate",
            FailurePolicy::FailFast => "fail_fast",
        }
    }
}
