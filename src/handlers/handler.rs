//! # Handler values and their identity.
//!
//! A [`Handler<A>`] pairs a callable with a [`HandlerKey`]. Events store
//! handlers by value and remove them by key equality, so the key decides what
//! "the same handler" means:
//!
//! | Constructor            | Entry point               | Receiver              |
//! |------------------------|---------------------------|-----------------------|
//! | [`Handler::func`]      | function pointer address  | none                  |
//! | [`Handler::bound`]     | method pointer address    | `Arc` pointer address |
//! | [`Handler::tracked`]   | method pointer address    | `Arc` pointer address |
//! | [`Handler::closure`]   | fresh process-unique token| none                  |
//!
//! Closures have no identity of their own: keep a clone of the handler you
//! subscribed to unsubscribe it later.
//!
//! ## Ownership
//! Bound and tracked handlers hold a [`Weak`] to their receiver; an event never
//! keeps an observer alive. Once the receiver is gone the handler is skipped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[cfg(feature = "auto-unhook")]
use crate::lifeline::{LifelineRef, Tracked};

/// Token source for closure handlers.
static CLOSURE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Callable entry point of a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entry {
    /// Address of a function or method pointer.
    Address(usize),
    /// Process-unique token of a closure handler.
    Token(u64),
}

/// Identity of a handler: entry point plus optional bound receiver.
///
/// Two handlers are equal when both parts are equal: the same function bound
/// to the same receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    entry: Entry,
    receiver: Option<usize>,
}

impl HandlerKey {
    /// Entry point part of the identity.
    pub fn entry(&self) -> Entry {
        self.entry
    }

    /// Receiver address, for bound handlers.
    pub fn receiver(&self) -> Option<usize> {
        self.receiver
    }
}

/// Type-erased call target.
trait Call<A>: Send + Sync {
    /// Calls the target. Returns `false` if the receiver is gone and nothing ran.
    fn call(&self, args: &A) -> bool;

    fn is_alive(&self) -> bool {
        true
    }
}

struct FnCall<A>(fn(&A));

impl<A> Call<A> for FnCall<A> {
    fn call(&self, args: &A) -> bool {
        (self.0)(args);
        true
    }
}

struct ClosureCall<F>(F);

impl<A, F> Call<A> for ClosureCall<F>
where
    F: Fn(&A) + Send + Sync,
{
    fn call(&self, args: &A) -> bool {
        (self.0)(args);
        true
    }
}

struct BoundCall<T, A> {
    receiver: Weak<T>,
    method: fn(&T, &A),
}

impl<T, A> Call<A> for BoundCall<T, A>
where
    T: Send + Sync,
{
    fn call(&self, args: &A) -> bool {
        match self.receiver.upgrade() {
            Some(receiver) => {
                (self.method)(&receiver, args);
                true
            }
            None => false,
        }
    }

    fn is_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }
}

/// A callable that can be registered with an [`Event<A>`](crate::Event).
///
/// Cloning is cheap (one `Arc` bump) and preserves identity.
pub struct Handler<A> {
    key: HandlerKey,
    call: Arc<dyn Call<A>>,
    #[cfg(feature = "auto-unhook")]
    lifeline: Option<LifelineRef>,
}

impl<A: 'static> Handler<A> {
    /// Wraps a plain function. Identity is the function's address.
    ///
    /// ```rust
    /// use eventslot::Handler;
    ///
    /// fn on_tick(_: &u64) {}
    ///
    /// assert_eq!(Handler::func(on_tick), Handler::func(on_tick));
    /// ```
    pub fn func(f: fn(&A)) -> Self {
        Self {
            key: HandlerKey {
                entry: Entry::Address(f as usize),
                receiver: None,
            },
            call: Arc::new(FnCall(f)),
            #[cfg(feature = "auto-unhook")]
            lifeline: None,
        }
    }

    /// Wraps a closure under a fresh identity.
    ///
    /// Every call produces a distinct handler; clones of the result compare equal.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        Self {
            key: HandlerKey {
                entry: Entry::Token(CLOSURE_SEQ.fetch_add(1, Ordering::Relaxed)),
                receiver: None,
            },
            call: Arc::new(ClosureCall(f)),
            #[cfg(feature = "auto-unhook")]
            lifeline: None,
        }
    }

    /// Binds a method to a receiver without keeping the receiver alive.
    ///
    /// Identity is `(method, receiver)`. Without auto-unhook the slot stays
    /// registered after the receiver is dropped (it is skipped during fan-out)
    /// until someone unsubscribes it.
    pub fn bound<T>(receiver: &Arc<T>, method: fn(&T, &A)) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            key: Self::bound_key(receiver, method),
            call: Arc::new(BoundCall {
                receiver: Arc::downgrade(receiver),
                method,
            }),
            #[cfg(feature = "auto-unhook")]
            lifeline: None,
        }
    }

    /// Binds a method to a [`Tracked`] observer.
    ///
    /// Same identity as [`Handler::bound`] for the same pair; additionally the
    /// event removes this handler when the observer's lifeline is dropped.
    #[cfg(feature = "auto-unhook")]
    pub fn tracked<T>(observer: &Arc<T>, method: fn(&T, &A)) -> Self
    where
        T: Tracked + Send + Sync + 'static,
    {
        let mut handler = Self::bound(observer, method);
        handler.lifeline = Some(observer.lifeline().downgrade());
        handler
    }

    fn bound_key<T>(receiver: &Arc<T>, method: fn(&T, &A)) -> HandlerKey {
        HandlerKey {
            entry: Entry::Address(method as usize),
            receiver: Some(Arc::as_ptr(receiver) as *const () as usize),
        }
    }
}

impl<A> Handler<A> {
    /// Identity used for removal.
    pub fn key(&self) -> HandlerKey {
        self.key
    }

    /// `false` once a bound receiver has been dropped; always `true` otherwise.
    pub fn is_alive(&self) -> bool {
        self.call.is_alive()
    }

    /// Calls the handler. Returns `false` if the receiver is gone.
    pub(crate) fn dispatch(&self, args: &A) -> bool {
        self.call.call(args)
    }

    #[cfg(feature = "auto-unhook")]
    pub(crate) fn lifeline(&self) -> Option<&LifelineRef> {
        self.lifeline.as_ref()
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            call: Arc::clone(&self.call),
            #[cfg(feature = "auto-unhook")]
            lifeline: self.lifeline.clone(),
        }
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<A> Eq for Handler<A> {}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("key", &self.key)
            .field("alive", &self.is_alive())
            .finish()
    }
}
