//! # eventslot
//!
//! **eventslot** is a multicast event primitive for Rust (observer / signal-slot).
//!
//! A *subject* exposes one [`Event<A>`] field per thing that can happen to it.
//! *Observers* register [`Handler<A>`]s on those fields; when the subject calls
//! [`Event::invoke`], every registered handler runs, synchronously and in
//! registration order, on the calling thread. The subject needs no knowledge
//! of who is listening.
//!
//! ## Architecture
//! ```text
//!   Subject                                   Observers
//! ┌──────────────────────────┐
//! │ x_changed: Event<XArgs>  │◄── subscribe(Handler::bound(&obs, Obs::on_x))
//! │ y_changed: Event<i32>    │◄── subscribe(Handler::func(log_y))
//! │                          │◄── unsubscribe(&handler)
//! │ set_x(7) ─► invoke(&args)│
//! └────────────┬─────────────┘
//!              ▼
//!   ┌────────────────────────────────────────────┐
//!   │ Event (one lock, held for the fan-out)     │
//!   │ slots: [h1, h2, ..., hn]                   │
//!   └───┬───────────┬───────────────────┬────────┘
//!       ▼           ▼                   ▼
//!     h1(&args)   h2(&args)   ...     hn(&args)
//! ```
//!
//! ### Auto-unhook (feature `auto-unhook`)
//! ```text
//! Handler::tracked(&obs, Obs::on_x) ──► subscribe ──► obs.lifeline().attach(hook)
//! drop(obs) ──► Lifeline::drop ──► hook ──► slot removed under the event's lock
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                 |
//! |-------------------|--------------------------------------------------------------|------------------------------------|
//! | **Events**        | Ordered synchronous fan-out, subscribe/unsubscribe, `+=`/`-=`| [`Event`]                          |
//! | **Handlers**      | Functions, closures, methods bound to a receiver             | [`Handler`], [`HandlerKey`]        |
//! | **Policies**      | Panic handling during fan-out, slot growth                   | [`FailurePolicy`], [`GrowthPolicy`]|
//! | **Errors**        | Aggregated handler panics                                    | [`InvokeError`], [`HandlerFailure`]|
//! | **Configuration** | Per-event settings                                           | [`EventConfig`]                    |
//! | **Auto-unhook**   | Drop-driven removal of observers' handlers                   | [`Lifeline`], [`Tracked`]          |
//!
//! ## Optional features
//! - `auto-unhook` _(default)_: exports [`Lifeline`], [`Tracked`] and
//!   [`Handler::tracked`]. Without it, callers must unsubscribe before dropping
//!   an observer; handlers bound to a dropped receiver are skipped, never called.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use eventslot::{Event, Handler};
//!
//! #[derive(Default)]
//! struct Thermostat {
//!     pub changed: Event<i32>,
//!     celsius: i32,
//! }
//!
//! impl Thermostat {
//!     fn set(&mut self, celsius: i32) {
//!         self.celsius = celsius;
//!         self.changed.invoke(&celsius).expect("no handler panics");
//!     }
//! }
//!
//! struct Display {
//!     shown: AtomicI32,
//! }
//!
//! impl Display {
//!     fn on_changed(&self, celsius: &i32) {
//!         self.shown.store(*celsius, Ordering::SeqCst);
//!     }
//! }
//!
//! let display = Arc::new(Display { shown: AtomicI32::new(0) });
//! let mut thermostat = Thermostat::default();
//!
//! thermostat.changed += Handler::bound(&display, Display::on_changed);
//! thermostat.set(21);
//! assert_eq!(display.shown.load(Ordering::SeqCst), 21);
//!
//! thermostat.changed -= Handler::bound(&display, Display::on_changed);
//! thermostat.set(30);
//! assert_eq!(display.shown.load(Ordering::SeqCst), 21);
//! ```
mod channel;
mod error;
mod handlers;
mod policies;

// ---- Public re-exports ----

pub use channel::{Event, EventConfig};
pub use error::{HandlerFailure, InvokeError};
pub use handlers::{Entry, Handler, HandlerKey};
pub use policies::{FailurePolicy, GrowthPolicy};

// Optional: drop-driven removal of handlers bound to tracked observers.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "auto-unhook")]
mod lifeline;
#[cfg(feature = "auto-unhook")]
pub use lifeline::{HookId, Lifeline, Tracked};
