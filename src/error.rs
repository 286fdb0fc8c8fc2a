//! Error types reported by event channels.
//!
//! This module defines [`InvokeError`], returned by
//! [`Event::invoke`](crate::Event::invoke) when handlers panic under
//! [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate), and
//! [`HandlerFailure`], one entry per panicking handler.
//!
//! Like the rest of the crate's errors, [`InvokeError`] provides helper methods
//! (`as_label`, `as_message`) for logging/metrics.
//!
//! Slot storage growth failure is not represented here: running out of memory
//! while subscribing aborts the process, exactly as any other `Vec` growth does.

use thiserror::Error;

/// One handler that panicked during an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Zero-based position of the handler in the fan-out order.
    pub position: usize,
    /// Panic payload rendered as text (`&str`/`String` payloads), or a placeholder.
    pub message: String,
}

/// # Errors produced by [`Event::invoke`](crate::Event::invoke).
///
/// Only produced under [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate):
/// every handler has already been called by the time this is returned.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvokeError {
    /// One or more handlers panicked; the remaining handlers still ran.
    #[error("{} of {total} handlers panicked", .failures.len())]
    HandlersPanicked {
        /// Failures in fan-out order.
        failures: Vec<HandlerFailure>,
        /// Number of handlers the invocation fanned out to.
        total: usize,
    },
}

impl InvokeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventslot::InvokeError;
    ///
    /// let err = InvokeError::HandlersPanicked { failures: vec![], total: 3 };
    /// assert_eq!(err.as_label(), "event_handlers_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::HandlersPanicked { .. } => "event_handlers_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InvokeError::HandlersPanicked { failures, total } => {
                let detail: Vec<String> = failures
                    .iter()
                    .map(|f| format!("#{}: {}", f.position, f.message))
                    .collect();
                format!(
                    "{} of {total} handlers panicked: [{}]",
                    failures.len(),
                    detail.join("; ")
                )
            }
        }
    }

    /// Returns the individual handler failures.
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            InvokeError::HandlersPanicked { failures, .. } => failures,
        }
    }
}
