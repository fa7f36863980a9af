use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// State that must be wiped before an instance is handed out again.
pub trait Recycle {
    fn recycle(&mut self);
}

/// Fixed-capacity pool of reusable instances.
///
/// Checking out from an empty pool allocates a transient instance, and releasing into a
/// full pool drops it, so capacity bounds retained memory rather than concurrency.
pub struct Pool<T> {
    slots: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T: Recycle + Default> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn acquire(&self) -> Pooled<'_, T> {
        let taken = self.slots.lock().pop();
        let mut item = match taken {
            Some(item) => item,
            None => {
                tracing::trace!("pool empty, allocating transient instance");
                T::default()
            }
        };
        item.recycle();
        Pooled { item, pool: self }
    }

    /// Instances currently parked in the pool.
    pub fn idle(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, mut item: T) {
        item.recycle();
        let mut slots = self.slots.lock();
        if slots.len() < self.capacity {
            slots.push(item);
        } else {
            tracing::trace!("pool full, dropping instance");
        }
    }
}

/// Scoped checkout. The instance goes back to its pool when the guard drops, on every
/// path including early error returns.
pub struct Pooled<'p, T: Recycle + Default> {
    item: T,
    pool: &'p Pool<T>,
}

impl<T: Recycle + Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Recycle + Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Recycle + Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        // Default instances are empty, so the swap does not allocate.
        let item = std::mem::take(&mut self.item);
        self.pool.release(item);
    }
}
