use parking_lot::RwLock;
use std::sync::Arc;

/// Single-slot, overwrite-on-write hand-off between a producer and the loop.
///
/// Each publish swaps in a new `Arc`, so a reader holds either the old value
/// or the new one, never a mix of both.
#[derive(Debug)]
pub struct SnapshotSlot<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SnapshotSlot<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    pub fn publish(&self, value: T) {
        let value = Arc::new(value);
        *self.current.write() = value;
    }

    pub fn latest(&self) -> Arc<T> {
        self.current.read().clone()
    }
}

impl<T: Default> Default for SnapshotSlot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
