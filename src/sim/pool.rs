//! Fixed-capacity entity pool
//!
//! All slots are allocated up front and recycled for the lifetime of a run.
//! Handles are slot indices, not identities: once released a handle stops
//! resolving until the same slot is acquired again.

/// Index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Entities stored in a [`Pool`] reset their transient fields on release
pub trait Poolable: Default {
    fn clear(&mut self);
}

/// Slot arena with an active bitset and a free list
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    active: Vec<bool>,
    /// Inactive slot indices; popped from the back, lowest index last pushed
    free: Vec<usize>,
}

impl<T: Poolable> Pool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Self {
            slots,
            active: vec![false; capacity],
            free: (0..capacity).rev().collect(),
        }
    }

    /// Claim an inactive slot, or `None` when every slot is in use
    pub fn acquire(&mut self) -> Option<Handle> {
        let index = self.free.pop()?;
        self.active[index] = true;
        Some(Handle(index))
    }

    /// Return a slot to the pool. Releasing an inactive slot does nothing.
    pub fn release(&mut self, handle: Handle) -> bool {
        match self.active.get_mut(handle.0) {
            Some(active) if *active => {
                *active = false;
                self.slots[handle.0].clear();
                self.free.push(handle.0);
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self, handle: Handle) -> bool {
        self.active.get(handle.0).copied().unwrap_or(false)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        if self.is_active(handle) {
            self.slots.get(handle.0)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if self.is_active(handle) {
            self.slots.get_mut(handle.0)
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Every handle in slot order, detached from the pool borrow.
    ///
    /// Callers resolve each handle with `get`/`get_mut` while mutating the
    /// pool; slots released along the way fail to resolve and are skipped.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + use<T> {
        (0..self.slots.len()).map(Handle)
    }

    /// Active slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(i, _)| self.active[*i])
            .map(|(i, slot)| (Handle(i), slot))
    }

    /// Active slots in slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        let active = &self.active;
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| active[*i])
            .map(|(i, slot)| (Handle(i), slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    struct Dummy {
        value: u32,
    }

    impl Poolable for Dummy {
        fn clear(&mut self) {
            self.value = 0;
        }
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool: Pool<Dummy> = Pool::with_capacity(2);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        assert_ne!(a, b);
        assert!(pool.is_exhausted());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_release_clears_and_invalidates() {
        let mut pool: Pool<Dummy> = Pool::with_capacity(1);
        let h = pool.acquire().unwrap();
        pool.get_mut(h).unwrap().value = 7;

        assert!(pool.release(h));
        assert!(pool.get(h).is_none());
        assert!(!pool.release(h), "double release is a no-op");

        let again = pool.acquire().unwrap();
        assert_eq!(again, h);
        assert_eq!(pool.get(again).unwrap().value, 0);
    }

    #[test]
    fn test_release_during_iteration_skips_slot() {
        let mut pool: Pool<Dummy> = Pool::with_capacity(3);
        let handles: Vec<_> = (0..3).map(|_| pool.acquire().unwrap()).collect();

        let mut visited = Vec::new();
        for h in pool.handles() {
            if pool.get(h).is_none() {
                continue;
            }
            visited.push(h);
            // Visiting the first slot releases the last one
            if h == handles[0] {
                pool.release(handles[2]);
            }
        }
        assert_eq!(visited, vec![handles[0], handles[1]]);
    }

    #[test]
    fn test_zero_capacity_never_spawns() {
        let mut pool: Pool<Dummy> = Pool::with_capacity(0);
        assert!(pool.acquire().is_none());
        assert_eq!(pool.handles().count(), 0);
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            capacity in 0usize..16,
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..200),
        ) {
            let mut pool: Pool<Dummy> = Pool::with_capacity(capacity);
            let mut held: Vec<Handle> = Vec::new();

            for (acquire, pick) in ops {
                if acquire {
                    if let Some(h) = pool.acquire() {
                        prop_assert!(!held.contains(&h));
                        held.push(h);
                    } else {
                        prop_assert_eq!(held.len(), capacity);
                    }
                } else if !held.is_empty() {
                    let h = held.swap_remove(pick % held.len());
                    prop_assert!(pool.release(h));
                }
                prop_assert!(pool.active_count() <= capacity);
                prop_assert_eq!(pool.active_count(), held.len());
            }
        }
    }
}
