//! # Event: ordered, synchronous multicast to registered handlers.
//!
//! [`Event<A>`] holds zero or more [`Handler<A>`]s and calls all of them, in
//! registration order, every time [`Event::invoke`] runs.
//!
//! ## Architecture
//! ```text
//! subscribe(h) ──┐
//! unsubscribe(h) ┼──► ReentrantMutex ──► RefCell<Slots> ──► [h1, h2, ..., hn]
//! invoke(&args) ─┘         │
//!                          └─ held for the whole fan-out:
//!                               snapshot [h1..hn] → release RefCell borrow
//!                               → h1(&args) → h2(&args) → ... → hn(&args)
//! ```
//!
//! ## Rules
//! - **Coarse lock**: one lock per event covers each operation entirely, including
//!   the fan-out. A slow handler delays every other thread touching the *same* event.
//! - **Re-entrancy**: the lock is reentrant; a handler may subscribe, unsubscribe or
//!   invoke on the event that is calling it. Changes apply to the next invocation.
//! - **Order**: handlers run in slot order. Slots are appended on subscribe and
//!   removed swap-with-last on unsubscribe, so after a removal the survivors all
//!   still run exactly once but their relative order may change.
//! - **Snapshot cost**: every `invoke` clones the live handlers into a fresh `Vec`
//!   (one `Arc` bump each) before the fan-out, whether or not a handler re-enters.
//! - **Lazy lock**: an event that is never touched never allocates its lock.
//! - **No cross-event ordering**: two events fired from two threads interleave freely.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use eventslot::{Event, Handler};
//!
//! let total = Arc::new(AtomicI32::new(0));
//! let event: Event<i32> = Event::new();
//!
//! let sink = Arc::clone(&total);
//! let add = Handler::closure(move |v: &i32| {
//!     sink.fetch_add(*v, Ordering::SeqCst);
//! });
//! event.subscribe(add.clone());
//!
//! event.invoke(&5).unwrap();
//! event.unsubscribe(&add);
//! event.invoke(&5).unwrap();
//!
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use parking_lot::ReentrantMutex;
use tracing::{trace, warn};

use crate::channel::config::EventConfig;
use crate::channel::slots::{Slot, Slots};
use crate::error::{HandlerFailure, InvokeError};
use crate::handlers::Handler;
use crate::policies::FailurePolicy;

#[cfg(feature = "auto-unhook")]
use crate::channel::slots::Hook;
#[cfg(feature = "auto-unhook")]
use crate::lifeline::HookId;

/// State shared between the event and the lifeline hooks it attached.
struct Shared<A> {
    slots: ReentrantMutex<RefCell<Slots<A>>>,
}

impl<A> Shared<A> {
    /// Lifeline callback: the observer behind hook `id` is being dropped.
    #[cfg(feature = "auto-unhook")]
    fn unhook(&self, id: HookId) {
        let guard = self.slots.lock();
        let removed = guard.borrow_mut().remove_hooked(id);
        if let Some(slot) = removed {
            trace!(key = ?slot.handler.key(), "observer dropped, handler unhooked");
        }
        drop(guard);
    }
}

/// Multicast event with a fixed argument type `A`.
///
/// Expose one `Event` field per event a subject raises; observers subscribe to
/// the field directly. Multi-argument signatures use a tuple or a struct for `A`.
pub struct Event<A> {
    config: EventConfig,
    shared: OnceLock<Arc<Shared<A>>>,
}

impl<A> Event<A> {
    /// Creates an empty event with [`EventConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EventConfig::default())
    }

    /// Creates an empty event with the given configuration.
    #[must_use]
    pub fn with_config(config: EventConfig) -> Self {
        Self {
            config,
            shared: OnceLock::new(),
        }
    }

    /// Returns the configuration this event was built with.
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    fn shared(&self) -> &Arc<Shared<A>> {
        self.shared.get_or_init(|| {
            Arc::new(Shared {
                slots: ReentrantMutex::new(RefCell::new(Slots::new(self.config.growth()))),
            })
        })
    }

    /// Registers a handler at the end of the fan-out order.
    ///
    /// Duplicates are allowed: a handler subscribed twice runs twice per invocation.
    ///
    /// A [tracked](Handler::tracked) handler whose observer is already gone is
    /// not registered.
    pub fn subscribe(&self, handler: Handler<A>)
    where
        A: 'static,
    {
        let shared = self.shared();
        let guard = shared.slots.lock();

        #[cfg(feature = "auto-unhook")]
        let hook = match handler.lifeline() {
            Some(lifeline) => {
                let weak = Arc::downgrade(shared);
                let attached = lifeline.attach(Box::new(move |id: HookId| {
                    if let Some(shared) = weak.upgrade() {
                        shared.unhook(id);
                    }
                }));
                match attached {
                    Some(id) => Some(Hook {
                        lifeline: lifeline.clone(),
                        id,
                    }),
                    None => {
                        trace!(
                            key = ?handler.key(),
                            "observer already dropped, handler not registered"
                        );
                        return;
                    }
                }
            }
            None => None,
        };

        let key = handler.key();
        guard.borrow_mut().push(Slot {
            handler,
            #[cfg(feature = "auto-unhook")]
            hook,
        });
        trace!(?key, "handler subscribed");
    }

    /// Removes one registration of `handler` (compared by [`Handler::key`]).
    ///
    /// The last slot moves into the freed position. Returns `false`, and changes
    /// nothing, if the handler is not registered.
    pub fn unsubscribe(&self, handler: &Handler<A>) -> bool {
        let Some(shared) = self.shared.get() else {
            return false;
        };
        let guard = shared.slots.lock();
        let removed = guard.borrow_mut().remove(handler.key());
        match removed {
            Some(slot) => {
                detach_hooks(std::slice::from_ref(&slot));
                trace!(key = ?handler.key(), "handler unsubscribed");
                drop(slot);
                true
            }
            None => {
                trace!(key = ?handler.key(), "unsubscribe ignored, handler not registered");
                false
            }
        }
    }

    /// Removes every handler.
    pub fn clear(&self) {
        let Some(shared) = self.shared.get() else {
            return;
        };
        let guard = shared.slots.lock();
        let drained = guard.borrow_mut().drain();
        detach_hooks(&drained);
        trace!(removed = drained.len(), "event cleared");
        drop(drained);
    }

    /// Calls every registered handler with `args`, in slot order.
    ///
    /// The event's lock is held until the last handler returns.
    ///
    /// ### Failure handling
    /// - [`FailurePolicy::Isolate`]: a panicking handler is logged and skipped over;
    ///   all handlers run, then `Err(InvokeError::HandlersPanicked)` lists the failures.
    /// - [`FailurePolicy::FailFast`]: the first panic unwinds out of this call
    ///   (the lock is released on the way out); later handlers do not run.
    ///
    /// Bound handlers whose receiver has been dropped are skipped silently.
    pub fn invoke(&self, args: &A) -> Result<(), InvokeError> {
        let Some(shared) = self.shared.get() else {
            return Ok(());
        };
        let guard = shared.slots.lock();
        let handlers = guard.borrow().snapshot();
        let total = handlers.len();

        let result = match self.config.failure {
            FailurePolicy::FailFast => {
                for handler in &handlers {
                    if !handler.dispatch(args) {
                        trace!(key = ?handler.key(), "receiver dropped, handler skipped");
                    }
                }
                Ok(())
            }
            FailurePolicy::Isolate => {
                let mut failures = Vec::new();
                for (position, handler) in handlers.iter().enumerate() {
                    match panic::catch_unwind(AssertUnwindSafe(|| handler.dispatch(args))) {
                        Ok(true) => {}
                        Ok(false) => {
                            trace!(key = ?handler.key(), "receiver dropped, handler skipped");
                        }
                        Err(payload) => {
                            let message = panic_message(payload.as_ref());
                            warn!(position, key = ?handler.key(), %message, "event handler panicked");
                            failures.push(HandlerFailure { position, message });
                        }
                    }
                }
                if failures.is_empty() {
                    Ok(())
                } else {
                    Err(InvokeError::HandlersPanicked { failures, total })
                }
            }
        };

        drop(handlers);
        drop(guard);
        result
    }

    /// Returns `true` if at least one slot holds `handler`.
    #[must_use]
    pub fn contains(&self, handler: &Handler<A>) -> bool {
        match self.shared.get() {
            Some(shared) => {
                let guard = shared.slots.lock();
                let found = guard.borrow().contains(handler.key());
                found
            }
            None => false,
        }
    }

    /// Number of registered handlers (duplicates counted once per registration).
    #[must_use]
    pub fn len(&self) -> usize {
        match self.shared.get() {
            Some(shared) => {
                let guard = shared.slots.lock();
                let len = guard.borrow().len();
                len
            }
            None => 0,
        }
    }

    /// True if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserved slot count (`0` until the first subscribe, then `4, 8, 16, ...` by default).
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self.shared.get() {
            Some(shared) => {
                let guard = shared.slots.lock();
                let capacity = guard.borrow().capacity();
                capacity
            }
            None => 0,
        }
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Drop for Event<A> {
    /// Detaches every lifeline hook, then releases the slots.
    fn drop(&mut self) {
        if let Some(shared) = self.shared.get() {
            let guard = shared.slots.lock();
            let drained = guard.borrow_mut().drain();
            detach_hooks(&drained);
            drop(drained);
        }
    }
}

impl<A: 'static> AddAssign<Handler<A>> for Event<A> {
    /// `event += handler` is [`Event::subscribe`].
    fn add_assign(&mut self, handler: Handler<A>) {
        self.subscribe(handler);
    }
}

impl<A> SubAssign<Handler<A>> for Event<A> {
    /// `event -= handler` is [`Event::unsubscribe`].
    fn sub_assign(&mut self, handler: Handler<A>) {
        self.unsubscribe(&handler);
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("failure", &self.config.failure)
            .finish()
    }
}

fn detach_hooks<A>(slots: &[Slot<A>]) {
    #[cfg(feature = "auto-unhook")]
    for hook in slots.iter().filter_map(|s| s.hook.as_ref()) {
        hook.detach();
    }
    #[cfg(not(feature = "auto-unhook"))]
    let _ = slots;
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, name: &'static str) -> Handler<i32> {
        let log = Arc::clone(log);
        Handler::closure(move |v: &i32| log.lock().push(format!("{name}:{v}")))
    }

    fn panicking(msg: &'static str) -> Handler<i32> {
        Handler::closure(move |_: &i32| panic!("{}", msg))
    }

    #[test]
    fn test_untouched_event_allocates_nothing() {
        let event: Event<i32> = Event::new();
        assert!(event.invoke(&1).is_ok());
        assert!(!event.unsubscribe(&Handler::closure(|_: &i32| {})));
        assert!(event.shared.get().is_none());
        assert_eq!(event.capacity(), 0);
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let log = Log::default();
        let event = Event::new();
        for name in ["a", "b", "c"] {
            event.subscribe(recorder(&log, name));
        }

        event.invoke(&7).unwrap();
        assert_eq!(*log.lock(), vec!["a:7", "b:7", "c:7"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let log = Log::default();
        let event = Event::new();
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");
        event.subscribe(a.clone());
        event.subscribe(b.clone());

        assert!(event.unsubscribe(&a));
        event.invoke(&1).unwrap();
        assert_eq!(*log.lock(), vec!["b:1"]);
        assert!(!event.contains(&a));
        assert!(event.contains(&b));
    }

    #[test]
    fn test_duplicate_removed_once() {
        let log = Log::default();
        let event = Event::new();
        let a = recorder(&log, "a");
        event.subscribe(a.clone());
        event.subscribe(a.clone());

        event.invoke(&1).unwrap();
        assert!(event.unsubscribe(&a));
        event.invoke(&2).unwrap();
        assert_eq!(*log.lock(), vec!["a:1", "a:1", "a:2"]);
        assert_eq!(event.len(), 1);
    }

    #[test]
    fn test_operator_sugar() {
        let log = Log::default();
        let mut event = Event::new();
        let a = recorder(&log, "a");

        event += a.clone();
        event.invoke(&3).unwrap();
        event -= a;
        event.invoke(&4).unwrap();
        assert_eq!(*log.lock(), vec!["a:3"]);
    }

    #[test]
    fn test_isolate_runs_everyone_and_reports() {
        let log = Log::default();
        let event = Event::new();
        event.subscribe(recorder(&log, "a"));
        event.subscribe(panicking("first"));
        event.subscribe(recorder(&log, "b"));
        event.subscribe(panicking("second"));

        let err = event.invoke(&9).unwrap_err();
        assert_eq!(*log.lock(), vec!["a:9", "b:9"]);
        assert_eq!(
            err,
            InvokeError::HandlersPanicked {
                failures: vec![
                    HandlerFailure {
                        position: 1,
                        message: "first".into()
                    },
                    HandlerFailure {
                        position: 3,
                        message: "second".into()
                    },
                ],
                total: 4,
            }
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_panic() {
        let log = Log::default();
        let event =
            Event::with_config(EventConfig::default().with_failure(FailurePolicy::FailFast));
        event.subscribe(recorder(&log, "a"));
        event.subscribe(panicking("stop"));
        event.subscribe(recorder(&log, "b"));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| event.invoke(&1)));
        assert!(outcome.is_err());
        assert_eq!(*log.lock(), vec!["a:1"]);

        // Lock was released by the unwind; the event stays usable.
        assert_eq!(event.len(), 3);
    }

    #[test]
    fn test_handler_may_reenter_its_event() {
        let log = Log::default();
        let event = Arc::new(Event::new());
        let late = recorder(&log, "late");

        let weak = Arc::downgrade(&event);
        let late_clone = late.clone();
        let adder = Handler::closure(move |_: &i32| {
            if let Some(event) = weak.upgrade() {
                if !event.contains(&late_clone) {
                    event.subscribe(late_clone.clone());
                }
            }
        });
        event.subscribe(adder);

        event.invoke(&1).unwrap();
        assert!(log.lock().is_empty(), "added handler must wait for the next invoke");
        event.invoke(&2).unwrap();
        assert_eq!(*log.lock(), vec!["late:2"]);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_fan_out() {
        let log = Log::default();
        let event = Arc::new(Event::new());
        let b = recorder(&log, "b");

        let weak = Arc::downgrade(&event);
        let a_log = Arc::clone(&log);
        let victim = b.clone();
        let a = Handler::closure(move |v: &i32| {
            a_log.lock().push(format!("a:{v}"));
            if let Some(event) = weak.upgrade() {
                event.unsubscribe(&victim);
            }
        });
        event.subscribe(a);
        event.subscribe(b.clone());

        event.invoke(&1).unwrap();
        // Removed mid fan-out: still called in this round, gone from the next.
        assert_eq!(*log.lock(), vec!["a:1", "b:1"]);
        assert_eq!(event.len(), 1);
        assert!(!event.contains(&b));

        event.invoke(&2).unwrap();
        assert_eq!(*log.lock(), vec!["a:1", "b:1", "a:2"]);
    }

    #[test]
    fn test_handler_may_invoke_its_event() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let log = Log::default();
        let event = Arc::new(Event::new());
        let depth = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&event);
        let a_log = Arc::clone(&log);
        let a_depth = Arc::clone(&depth);
        event.subscribe(Handler::closure(move |v: &i32| {
            a_log.lock().push(format!("a:{v}"));
            if a_depth.fetch_add(1, Ordering::SeqCst) == 0 {
                if let Some(event) = weak.upgrade() {
                    event.invoke(&(v + 10)).unwrap();
                }
            }
        }));
        event.subscribe(recorder(&log, "b"));

        event.invoke(&1).unwrap();
        assert_eq!(*log.lock(), vec!["a:1", "a:11", "b:11", "b:1"]);
        assert_eq!(depth.load(Ordering::SeqCst), 2);
        assert_eq!(event.len(), 2);
    }

    #[test]
    fn test_growth_past_initial_capacity() {
        let log = Log::default();
        let event = Event::new();
        for name in ["1", "2", "3", "4"] {
            event.subscribe(recorder(&log, name));
        }
        assert_eq!(event.capacity(), 4);
        event.subscribe(recorder(&log, "5"));
        assert_eq!(event.capacity(), 8);

        event.invoke(&0).unwrap();
        assert_eq!(log.lock().len(), 5);
    }

    #[test]
    fn test_clear_removes_all() {
        let log = Log::default();
        let event = Event::new();
        event.subscribe(recorder(&log, "a"));
        event.subscribe(recorder(&log, "b"));

        event.clear();
        event.invoke(&1).unwrap();
        assert!(event.is_empty());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "<non-string panic payload>");
    }
}
