//! Shared, mutable ownership of a boxed system.

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, shared container for a boxed system.
///
/// `StSystem` uses `Rc<RefCell<Box<T>>>` internally. Cloning it is cheap and
/// every clone refers to the same system, so one `Device` or one
/// `BufferState` can be handed to several renderers.
///
/// # Type Parameters
/// - `T`: The type of the contained system, may be unsized
///
/// # Examples
/// ```rust
/// use touch_sandbox::core::StSystem;
///
/// let system = StSystem::new(Box::new(42u32));
/// assert_eq!(**system.get(), 42);
///
/// *system.get_mut() = Box::new(100u32);
/// assert_eq!(**system.get(), 100);
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T: ?Sized> {
    /// The shared system
    pub system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Creates a new `StSystem` containing the given boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }

    /// Number of handles sharing the system.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.system)
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_system() {
        let system = StSystem::new(Box::new(vec![1u32]));
        let clone = system.clone();
        clone.get_mut().push(2);

        assert_eq!(system.get().len(), 2);
        assert_eq!(system.handle_count(), 2);
        drop(clone);
        assert_eq!(system.handle_count(), 1);
    }
}
