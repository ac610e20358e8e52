// Copyright 2025 the Scribe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry implementation: subscription slots, RAII guards, emitter handles.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::channel::{Channel, channel_matches};

type Handler<E> = Rc<dyn Fn(&E)>;

struct Entry<E> {
    generation: u32,
    channel: Option<Channel>,
    handler: Handler<E>,
}

/// Subscription slot storage. Slots are reused through a free list with
/// bumped generations so a guard can remove exactly the entry it created,
/// never a later occupant of the same slot.
struct Slots<E> {
    slots: Vec<Option<Entry<E>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<E> Slots<E> {
    const fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    fn insert(&mut self, channel: Option<Channel>, handler: Handler<E>) -> (u32, u32) {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Entry {
                generation,
                channel,
                handler,
            });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "subscription keys use 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Entry {
                generation,
                channel,
                handler,
            }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "subscription keys use 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        }
    }

    fn remove(&mut self, idx: u32, generation: u32) {
        let idx = idx as usize;
        if let Some(slot) = self.slots.get_mut(idx)
            && slot.as_ref().is_some_and(|e| e.generation == generation)
        {
            *slot = None;
            self.free_list.push(idx);
        }
    }

    fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// Errors from using a registry handle outside a live provider scope.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The owning registry has been dropped; the handle no longer reaches a
    /// live listener set.
    #[error("listener registry is gone: handle used outside a live provider scope")]
    Closed,
}

/// The live listener set for one subtree.
///
/// The top-level provider of a subtree owns the registry; nested listener
/// declarations register into it rather than creating their own. Each call
/// to [`Registry::subscribe`] yields an independent entry, so registering
/// the same handler twice delivers twice until one guard is dropped.
///
/// Cloning a `Registry` clones the owning handle; the listener set lives
/// until the last owner is dropped. For non-owning access from descendants,
/// use [`Registry::emitter`].
pub struct Registry<E> {
    inner: Rc<RefCell<Slots<E>>>,
}

impl<E> core::fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("listeners", &self.inner.borrow().live())
            .finish_non_exhaustive()
    }
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Registry<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> Registry<E> {
    /// Create a new registry with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slots::new())),
        }
    }

    /// Register `handler` for deliveries matching `channel`.
    ///
    /// The returned guard removes exactly this entry when dropped; there is
    /// no other way to deregister, which keeps disposal tied to host
    /// lifetime. Duplicate registrations are distinct entries and are not
    /// deduplicated.
    #[must_use = "dropping the subscription immediately deregisters the handler"]
    pub fn subscribe(
        &self,
        channel: Option<Channel>,
        handler: impl Fn(&E) + 'static,
    ) -> Subscription<E> {
        let (idx, generation) = self
            .inner
            .borrow_mut()
            .insert(channel, Rc::new(handler));
        Subscription {
            slots: Rc::downgrade(&self.inner),
            idx,
            generation,
        }
    }

    /// Deliver `event` to every registered listener whose channel filter
    /// matches `channel`, and return how many were invoked.
    ///
    /// The matching handlers are snapshotted before the first one runs;
    /// listeners registered or removed by a handler take effect from the
    /// next delivery, never the in-flight one. Reentrant `emit` from a
    /// handler is allowed.
    pub fn emit(&self, event: &E, channel: Option<&Channel>) -> usize {
        let matched: Vec<Handler<E>> = self
            .inner
            .borrow()
            .slots
            .iter()
            .flatten()
            .filter(|entry| channel_matches(entry.channel.as_ref(), channel))
            .map(|entry| Rc::clone(&entry.handler))
            .collect();
        for handler in &matched {
            handler(event);
        }
        matched.len()
    }

    /// Number of currently registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().live()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A non-owning handle for descendants of the providing subtree.
    pub fn emitter(&self) -> Emitter<E> {
        Emitter {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// RAII guard for one registry entry.
///
/// Dropping the guard removes exactly the entry it was created for. The
/// removal is idempotent and generation-checked, so it can never unregister
/// a later entry that happens to reuse the same slot.
pub struct Subscription<E> {
    slots: Weak<RefCell<Slots<E>>>,
    idx: u32,
    generation: u32,
}

impl<E> core::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("idx", &self.idx)
            .field("generation", &self.generation)
            .field("live", &(self.slots.strong_count() > 0))
            .finish()
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            slots.borrow_mut().remove(self.idx, self.generation);
        }
    }
}

/// A non-owning handle to a subtree's registry.
///
/// Descendants hold an `Emitter` instead of the registry itself, so the
/// listener set's lifetime stays with its providing subtree. Once the
/// registry is gone, every operation fails loudly with
/// [`RegistryError::Closed`] rather than silently dropping events.
pub struct Emitter<E> {
    inner: Weak<RefCell<Slots<E>>>,
}

impl<E> core::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("live", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E> Emitter<E> {
    fn registry(&self) -> Result<Registry<E>, RegistryError> {
        self.inner
            .upgrade()
            .map(|inner| Registry { inner })
            .ok_or(RegistryError::Closed)
    }

    /// Deliver through the owning registry. See [`Registry::emit`].
    pub fn emit(&self, event: &E, channel: Option<&Channel>) -> Result<usize, RegistryError> {
        Ok(self.registry()?.emit(event, channel))
    }

    /// Register through the owning registry. See [`Registry::subscribe`].
    pub fn subscribe(
        &self,
        channel: Option<Channel>,
        handler: impl Fn(&E) + 'static,
    ) -> Result<Subscription<E>, RegistryError> {
        Ok(self.registry()?.subscribe(channel, handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::{Cell, RefCell as CoreRefCell};

    fn counter() -> (Rc<Cell<usize>>, impl Fn(&u32) + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move |_: &u32| handle.set(handle.get() + 1))
    }

    #[test]
    fn fan_out_invokes_every_listener_once() {
        let registry: Registry<u32> = Registry::new();
        let (a, on_a) = counter();
        let (b, on_b) = counter();
        let (c, on_c) = counter();
        let subs = vec![
            registry.subscribe(Some(Channel::CatchAll), on_a),
            registry.subscribe(Some(Channel::CatchAll), on_b),
            registry.subscribe(Some(Channel::CatchAll), on_c),
        ];

        assert_eq!(registry.emit(&1, None), 3);
        assert_eq!((a.get(), b.get(), c.get()), (1, 1, 1));
        drop(subs);
    }

    #[test]
    fn channel_filters_apply_per_entry() {
        let registry: Registry<u32> = Registry::new();
        let (wild, on_wild) = counter();
        let (named, on_named) = counter();
        let (bare, on_bare) = counter();
        let _s1 = registry.subscribe(Some(Channel::CatchAll), on_wild);
        let _s2 = registry.subscribe(Some(Channel::named("a")), on_named);
        let _s3 = registry.subscribe(None, on_bare);

        registry.emit(&1, Some(&Channel::named("a")));
        registry.emit(&1, Some(&Channel::named("b")));
        registry.emit(&1, None);

        assert_eq!(wild.get(), 3, "catch-all sees every delivery");
        assert_eq!(named.get(), 1, "named sees only its exact channel");
        assert_eq!(bare.get(), 1, "unchanneled sees only unchanneled");
    }

    #[test]
    fn duplicate_registrations_deliver_independently() {
        let registry: Registry<u32> = Registry::new();
        let count = Rc::new(Cell::new(0));
        let handler = {
            let count = Rc::clone(&count);
            move |_: &u32| count.set(count.get() + 1)
        };
        let first = registry.subscribe(None, handler.clone());
        let second = registry.subscribe(None, handler);

        assert_eq!(registry.emit(&1, None), 2);
        drop(first);
        assert_eq!(registry.emit(&1, None), 1);
        assert_eq!(count.get(), 3);
        drop(second);
        assert_eq!(registry.emit(&1, None), 0);
    }

    #[test]
    fn dropping_a_guard_removes_exactly_its_entry() {
        let registry: Registry<u32> = Registry::new();
        let (a, on_a) = counter();
        let sub_a = registry.subscribe(None, on_a);
        drop(sub_a);

        // The freed slot is reused; the new entry must survive on its own.
        let (b, on_b) = counter();
        let _sub_b = registry.subscribe(None, on_b);
        assert_eq!(registry.len(), 1);
        registry.emit(&1, None);
        assert_eq!((a.get(), b.get()), (0, 1));
    }

    #[test]
    fn registration_during_emit_joins_the_next_pass() {
        let registry: Registry<u32> = Registry::new();
        let late: Rc<CoreRefCell<Vec<Subscription<u32>>>> = Rc::new(CoreRefCell::new(Vec::new()));
        let (late_count, on_late) = counter();
        let on_late = Rc::new(CoreRefCell::new(Some(on_late)));

        let _s = {
            let registry = registry.clone();
            let late = Rc::clone(&late);
            let on_late = Rc::clone(&on_late);
            registry.clone().subscribe(None, move |_| {
                if let Some(handler) = on_late.borrow_mut().take() {
                    late.borrow_mut().push(registry.subscribe(None, handler));
                }
            })
        };

        assert_eq!(registry.emit(&1, None), 1, "new listener misses the in-flight pass");
        assert_eq!(late_count.get(), 0);
        assert_eq!(registry.emit(&1, None), 2);
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn removal_during_emit_still_delivers_the_snapshot() {
        let registry: Registry<u32> = Registry::new();
        let (b_count, on_b) = counter();
        let sub_b = registry.subscribe(None, on_b);
        let held = Rc::new(CoreRefCell::new(Some(sub_b)));

        // First listener drops the second's guard mid-pass.
        let _sub_a = {
            let held = Rc::clone(&held);
            registry.subscribe(None, move |_: &u32| {
                held.borrow_mut().take();
            })
        };

        // Snapshot-then-iterate: b was registered when the pass started.
        // Slot ordering makes b run first here regardless; the assertion
        // that matters is the count on the *next* pass.
        registry.emit(&1, None);
        assert_eq!(registry.emit(&1, None), 1, "b is gone for later passes");
        assert_eq!(b_count.get(), 1);
    }

    #[test]
    fn emitter_reaches_a_live_registry() {
        let registry: Registry<u32> = Registry::new();
        let emitter = registry.emitter();
        let (count, on_event) = counter();
        let _sub = emitter
            .subscribe(Some(Channel::CatchAll), on_event)
            .expect("registry is alive");
        assert_eq!(emitter.emit(&1, None), Ok(1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn emitter_fails_loudly_once_the_registry_is_gone() {
        let registry: Registry<u32> = Registry::new();
        let emitter = registry.emitter();
        drop(registry);

        assert_eq!(emitter.emit(&1, None), Err(RegistryError::Closed));
        assert_eq!(
            emitter.subscribe(None, |_| {}).expect_err("must not silently no-op"),
            RegistryError::Closed
        );
    }

    #[test]
    fn subscription_outliving_the_registry_drops_cleanly() {
        let registry: Registry<u32> = Registry::new();
        let sub = registry.subscribe(None, |_| {});
        drop(registry);
        drop(sub);
    }
}
