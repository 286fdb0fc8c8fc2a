//! Auto-unhook support (feature `auto-unhook`).
//!
//! An observer owning a [`Lifeline`] (and implementing [`Tracked`]) can be
//! subscribed with [`Handler::tracked`](crate::Handler::tracked). Every event
//! it is registered with attaches a hook to the lifeline; dropping the
//! observer fires those hooks, and each one removes its slot under the
//! event's lock.
//!
//! ```text
//! Event::subscribe(tracked) ──► lifeline.attach(hook)   (slot remembers HookId)
//! Event::unsubscribe / clear / drop ──► lifeline.detach(HookId)
//! drop(observer) ──► drop(Lifeline) ──► hook(id) ──► Event: remove slot with HookId
//! ```

mod notifier;
mod tracked;

pub(crate) use notifier::LifelineRef;
pub use notifier::{HookId, Lifeline};
pub use tracked::Tracked;
