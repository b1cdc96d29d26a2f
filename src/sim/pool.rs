//! Fixed-capacity object pools
//!
//! Projectiles and explosion effects are never allocated mid-game: each
//! class draws from a pre-sized arena of slots. Acquiring returns an
//! explicit handle or `None` when every slot is in flight - exhaustion is
//! an accepted capacity limit, not a fault.

use serde::{Deserialize, Serialize};

/// Index into a [`Pool`]. Only valid for the pool that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handle(pub usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    active: bool,
    item: T,
}

/// A fixed-capacity arena of reusable slots with an active/inactive flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Pool<T> {
    /// Create a pool of `capacity` slots, each initialized by `init`
    pub fn new(capacity: usize, mut init: impl FnMut() -> T) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| Slot {
                    active: false,
                    item: init(),
                })
                .collect(),
        }
    }

    /// Claim the first inactive slot (linear scan). `None` when exhausted.
    pub fn acquire(&mut self) -> Option<Handle> {
        let idx = self.slots.iter().position(|s| !s.active)?;
        self.slots[idx].active = true;
        Some(Handle(idx))
    }

    /// Return a slot to the pool. Releasing an inactive slot is a no-op.
    pub fn release(&mut self, handle: Handle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.active = false;
        }
    }

    /// Whether the slot behind `handle` is currently active
    pub fn is_active(&self, handle: Handle) -> bool {
        self.slots.get(handle.0).is_some_and(|s| s.active)
    }

    /// Access an active slot's item
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.0)?;
        slot.active.then_some(&slot.item)
    }

    /// Mutable access to an active slot's item
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.0)?;
        slot.active.then_some(&mut slot.item)
    }

    /// Iterate over active slots in handle order
    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (Handle(i), &s.item))
    }

    /// Iterate mutably over active slots in handle order
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (Handle(i), &mut s.item))
    }

    /// Number of slots currently in flight
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool: Pool<u32> = Pool::new(5, || 0);
        let handles: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();
        // Five unique slots, then nothing
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(h.0, i);
        }
        assert!(pool.acquire().is_none());
        assert_eq!(pool.active_count(), 5);
    }

    #[test]
    fn test_release_makes_slot_reusable() {
        let mut pool: Pool<u32> = Pool::new(2, || 0);
        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());

        pool.release(a);
        let c = pool.acquire().unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_get_respects_active_flag() {
        let mut pool: Pool<u32> = Pool::new(1, || 7);
        let h = pool.acquire().unwrap();
        assert_eq!(pool.get(h), Some(&7));
        pool.release(h);
        assert_eq!(pool.get(h), None);
        assert!(!pool.is_active(h));
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool: Pool<u32> = Pool::new(1, || 0);
        let h = pool.acquire().unwrap();
        pool.release(h);
        pool.release(h);
        assert_eq!(pool.active_count(), 0);
        assert!(pool.acquire().is_some());
    }

    #[test]
    fn test_no_two_handles_share_a_slot() {
        let mut pool: Pool<u32> = Pool::new(4, || 0);
        let mut seen = Vec::new();
        while let Some(h) = pool.acquire() {
            assert!(!seen.contains(&h.0));
            seen.push(h.0);
        }
        assert_eq!(seen.len(), 4);
    }
}
