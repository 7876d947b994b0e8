//! Shared, lock-guarded ownership of plain data.

use std::{
    rc::Rc,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A single-threaded, reference-counted value with interior mutability.
///
/// `StResource` uses `Rc<RwLock<T>>` internally. It holds plain data such as
/// buffer bookkeeping, where [`StSystem`](super::StSystem) holds boxed systems.
///
/// # Examples
/// ```
/// use touch_sandbox::core::StResource;
///
/// let resource = StResource::new(vec![1, 2, 3]);
/// let clone = resource.clone();
/// clone.get_mut().push(4);
/// assert_eq!(resource.get().len(), 4);
/// ```
pub struct StResource<T> {
    /// The shared value
    pub resource: Rc<RwLock<T>>,
}

impl<T> StResource<T> {
    /// Wraps `resource` in a new shared container.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RwLock::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    ///
    /// A poisoned lock still yields the value.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
