use super::Lifeline;

/// An observer that owns a [`Lifeline`].
///
/// Implement this to subscribe with [`Handler::tracked`](crate::Handler::tracked);
/// the handler is then removed from every event it is registered with as soon
/// as the observer is dropped.
///
/// ```rust
/// use eventslot::{Lifeline, Tracked};
///
/// struct Panel {
///     lifeline: Lifeline,
/// }
///
/// impl Tracked for Panel {
///     fn lifeline(&self) -> &Lifeline {
///         &self.lifeline
///     }
/// }
/// ```
pub trait Tracked {
    /// Returns the lifeline dropped together with `self`.
    fn lifeline(&self) -> &Lifeline;
}
