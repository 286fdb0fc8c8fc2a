//! Event channel: the multicast primitive, its storage and its configuration.
//!
//! The public API from this module is [`Event`] and [`EventConfig`].
//!
//! Internal modules:
//! - [`event`]: the multicast channel (lock, fan-out, subscribe/unsubscribe);
//! - [`slots`]: ordered slot storage with doubling growth and swap-with-last removal;
//! - [`config`]: per-event settings.

mod config;
mod event;
mod slots;

pub use config::EventConfig;
pub use event::Event;
