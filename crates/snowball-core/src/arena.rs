//! Fixed-capacity entity pools.
//!
//! A [`Pool`] is a slot array whose length is decided once, at construction,
//! and never changes. Each slot holds either a complete entity or nothing.
//!
//! # Architecture
//!
//! Slots are `Option<T>`, so an inactive slot cannot carry stale field values
//! and an active one always carries a full entity. Allocation takes the first
//! empty slot in index order and iteration walks slots in index order, which
//! keeps every sweep over a pool deterministic.
//!
//! Running out of slots is not an error. [`Pool::allocate`] returns `None`
//! and callers skip the spawn for that tick.
//!
//! # Example
//!
//! ```
//! use snowball_core::arena::Pool;
//!
//! let mut pool: Pool<&str> = Pool::with_capacity(2);
//! let a = pool.allocate("a").unwrap();
//! let _b = pool.allocate("b").unwrap();
//! assert!(pool.allocate("c").is_none());
//!
//! assert_eq!(pool.free(a), Some("a"));
//! assert_eq!(pool.free(a), None);
//! assert_eq!(pool.allocate("d"), Some(a));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Slot Identifier
// =============================================================================

/// Index of a slot within one pool.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(usize);

impl SlotId {
    /// Creates a `SlotId` from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotId({})", self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Pool
// =============================================================================

/// Fixed-capacity slot array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    active: usize,
}

impl<T> Pool<T> {
    /// Creates a pool with `capacity` empty slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            active: 0,
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Returns `true` if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Returns `true` if every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Places `value` in the first empty slot.
    ///
    /// Returns `None`, dropping `value`, when the pool is full.
    pub fn allocate(&mut self, value: T) -> Option<SlotId> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(value);
        self.active += 1;
        Some(SlotId(index))
    }

    /// Empties a slot and returns what it held.
    ///
    /// Freeing an empty or out-of-range slot does nothing.
    pub fn free(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take();
        if value.is_some() {
            self.active -= 1;
        }
        value
    }

    /// Empties every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.active = 0;
    }

    /// Returns `true` if `id` holds an entity.
    #[must_use]
    pub fn is_active(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// The entity in slot `id`, if any.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable access to the entity in slot `id`, if any.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Every slot index, occupied or not.
    ///
    /// The iterator does not borrow the pool, so sweeps can free slots or
    /// touch other pools while walking it.
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> {
        let capacity = self.slots.len();
        (0..capacity).map(SlotId)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|value| (SlotId(i), value)))
    }

    /// Occupied slots in index order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|value| (SlotId(i), value)))
    }

    /// Occupied slot indices in index order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<SlotId> {
        self.iter().map(|(id, _)| id).collect()
    }
}
