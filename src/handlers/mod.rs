//! Handler values registered with events.
//!
//! ## Contents
//! - [`Handler`] callable plus identity (function, closure, bound method, tracked method)
//! - [`HandlerKey`], [`Entry`] the identity compared by `Event::unsubscribe`

mod handler;

pub use handler::{Entry, Handler, HandlerKey};
