//! # Slot storage for one event.
//!
//! Dense, `Vec`-backed list of registered handlers with an explicit growth
//! policy and swap-with-last removal.
//!
//! ## Rules
//! - Live slots are `entries[..len]`; nothing past `len` is ever invoked.
//! - Capacity follows [`GrowthPolicy`] exactly (`0 → 4 → 8 → 16 ...` by default).
//! - `remove` takes out **one** slot and moves the last slot into its place.
//!   Survivors stay registered but their relative order may change.

use crate::handlers::{Handler, HandlerKey};
use crate::policies::GrowthPolicy;

#[cfg(feature = "auto-unhook")]
use crate::lifeline::{HookId, LifelineRef};

/// Lifeline hook attached on behalf of a tracked slot.
#[cfg(feature = "auto-unhook")]
pub(crate) struct Hook {
    pub(crate) lifeline: LifelineRef,
    pub(crate) id: HookId,
}

#[cfg(feature = "auto-unhook")]
impl Hook {
    pub(crate) fn detach(&self) -> bool {
        self.lifeline.detach(self.id)
    }
}

/// One registered handler.
pub(crate) struct Slot<A> {
    pub(crate) handler: Handler<A>,
    #[cfg(feature = "auto-unhook")]
    pub(crate) hook: Option<Hook>,
}

/// Ordered handler storage.
pub(crate) struct Slots<A> {
    entries: Vec<Slot<A>>,
    /// Logical capacity; mirrors the growth policy regardless of allocator rounding.
    capacity: usize,
    growth: GrowthPolicy,
}

impl<A> Slots<A> {
    pub(crate) fn new(growth: GrowthPolicy) -> Self {
        Self {
            entries: Vec::new(),
            capacity: 0,
            growth,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a slot, growing storage first if every slot is taken.
    pub(crate) fn push(&mut self, slot: Slot<A>) {
        if self.entries.len() == self.capacity {
            let next = self.growth.next(self.capacity);
            self.entries.reserve_exact(next - self.entries.len());
            tracing::debug!(from = self.capacity, to = next, "event slot storage grown");
            self.capacity = next;
        }
        self.entries.push(slot);
    }

    /// Removes the first slot whose handler has `key` (swap-with-last).
    pub(crate) fn remove(&mut self, key: HandlerKey) -> Option<Slot<A>> {
        let pos = self.entries.iter().position(|s| s.handler.key() == key)?;
        Some(self.entries.swap_remove(pos))
    }

    /// Removes the slot that owns lifeline hook `id` (swap-with-last).
    #[cfg(feature = "auto-unhook")]
    pub(crate) fn remove_hooked(&mut self, id: HookId) -> Option<Slot<A>> {
        let pos = self
            .entries
            .iter()
            .position(|s| s.hook.as_ref().is_some_and(|h| h.id == id))?;
        Some(self.entries.swap_remove(pos))
    }

    pub(crate) fn contains(&self, key: HandlerKey) -> bool {
        self.entries.iter().any(|s| s.handler.key() == key)
    }

    /// Removes every slot. Capacity is kept.
    pub(crate) fn drain(&mut self) -> Vec<Slot<A>> {
        self.entries.drain(..).collect()
    }

    /// Clones the live handlers in fan-out order.
    pub(crate) fn snapshot(&self) -> Vec<Handler<A>> {
        self.entries.iter().map(|s| s.handler.clone()).collect()
    }
}
