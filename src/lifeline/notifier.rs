//! # Lifeline: synchronous "object destroyed" notification.
//!
//! A [`Lifeline`] is embedded in an observer. Callbacks attached to it run,
//! synchronously and on the dropping thread, when the lifeline is dropped,
//! which happens as part of dropping the observer that owns it.
//!
//! ## Rules
//! - Hooks attached through a handler after the lifeline started dropping are refused.
//! - Callbacks run **outside** the lifeline's lock, so they may take other locks freely.
//! - `detach` of an unknown or already-fired hook is a no-op returning `false`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Identifies one attached callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    /// Raw numeric value (unique per process).
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Global hook counter; ids never repeat across lifelines.
static HOOK_SEQ: AtomicU64 = AtomicU64::new(1);

type Callback = Box<dyn FnOnce(HookId) + Send>;

#[derive(Default)]
struct Hooks {
    closed: bool,
    entries: Vec<(HookId, Callback)>,
}

#[derive(Default)]
pub(crate) struct LifelineShared {
    hooks: Mutex<Hooks>,
}

impl Hooks {
    fn push(&mut self, callback: Callback) -> HookId {
        let id = HookId(HOOK_SEQ.fetch_add(1, Ordering::Relaxed));
        self.entries.push((id, callback));
        id
    }
}

impl LifelineShared {
    fn try_attach(&self, callback: Callback) -> Option<HookId> {
        let mut hooks = self.hooks.lock();
        if hooks.closed {
            return None;
        }
        Some(hooks.push(callback))
    }

    fn detach(&self, id: HookId) -> bool {
        let mut hooks = self.hooks.lock();
        match hooks.entries.iter().position(|(h, _)| *h == id) {
            Some(pos) => {
                drop(hooks.entries.swap_remove(pos));
                true
            }
            None => false,
        }
    }
}

/// Drop-time notifier for an observer object.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use eventslot::Lifeline;
///
/// let fired = Arc::new(AtomicBool::new(false));
/// let lifeline = Lifeline::new();
/// let flag = Arc::clone(&fired);
/// lifeline.attach(move |_id| flag.store(true, Ordering::SeqCst));
///
/// drop(lifeline);
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct Lifeline {
    shared: Arc<LifelineShared>,
}

impl Lifeline {
    /// Creates a lifeline with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a callback fired once when this lifeline is dropped.
    pub fn attach<F>(&self, callback: F) -> HookId
    where
        F: FnOnce(HookId) + Send + 'static,
    {
        // Only `Drop` closes the hook list, so no closed check here.
        self.shared.hooks.lock().push(Box::new(callback))
    }

    /// Detaches a callback. Returns `false` if it was not attached.
    pub fn detach(&self, id: HookId) -> bool {
        self.shared.detach(id)
    }

    /// Number of attached callbacks.
    pub fn hooks(&self) -> usize {
        self.shared.hooks.lock().entries.len()
    }

    pub(crate) fn downgrade(&self) -> LifelineRef {
        LifelineRef(Arc::downgrade(&self.shared))
    }
}

impl Drop for Lifeline {
    fn drop(&mut self) {
        let fired = {
            let mut hooks = self.shared.hooks.lock();
            hooks.closed = true;
            std::mem::take(&mut hooks.entries)
        };
        if !fired.is_empty() {
            tracing::trace!(hooks = fired.len(), "lifeline dropped, firing hooks");
        }
        for (id, callback) in fired {
            callback(id);
        }
    }
}

impl fmt::Debug for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifeline")
            .field("hooks", &self.hooks())
            .finish()
    }
}

/// Non-owning reference to a lifeline, carried by tracked handlers.
#[derive(Clone)]
pub(crate) struct LifelineRef(Weak<LifelineShared>);

impl LifelineRef {
    /// Attaches a callback unless the lifeline is gone or already firing.
    pub(crate) fn attach(&self, callback: Callback) -> Option<HookId> {
        self.0.upgrade()?.try_attach(callback)
    }

    pub(crate) fn detach(&self, id: HookId) -> bool {
        match self.0.upgrade() {
            Some(shared) => shared.detach(id),
            None => false,
        }
    }
}
