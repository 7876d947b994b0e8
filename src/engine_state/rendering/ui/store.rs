//! Bounded, stack-ordered storage for UI elements.
//!
//! Insertion order is both the draw order (index 0 at the bottom) and the
//! order in which the UI manager visits elements. Identity is stack based: the
//! next id handed out is always the current element count, so a push followed
//! by a pop returns the id generator to where it was.

use log::debug;

use crate::error::{EngineError, EngineResult};

use super::primitives::UiElement;

/// Maximum number of elements the store can hold
pub const ELEMENT_STORE_CAPACITY: usize = 64;

/// Owner of every live UI element and of the current selection.
pub struct ElementStore {
    /// Live elements in insertion order
    elements: Vec<UiElement>,
    /// Fixed capacity of `elements`
    capacity: usize,
    /// Id of the element holding the selection, if any
    selected_id: Option<u32>,
    /// Length of the protected prefix that pop may never remove
    reserved: usize,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    /// Creates an empty store with [`ELEMENT_STORE_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(ELEMENT_STORE_CAPACITY)
    }

    /// Creates an empty store with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            capacity,
            selected_id: None,
            reserved: 0,
        }
    }

    /// Appends an element on top of the stack.
    ///
    /// # Arguments
    /// * `element` - The element to append
    ///
    /// # Returns
    /// `Err(CapacityExceeded)` when the store is full; the store is left unchanged.
    pub fn push(&mut self, element: UiElement) -> EngineResult<()> {
        if self.elements.len() >= self.capacity {
            return Err(EngineError::CapacityExceeded {
                container: "element store",
                capacity: self.capacity,
            });
        }

        debug!("Element {} pushed at index {}", element.id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    /// Removes and returns the top element.
    ///
    /// Fails with `Underflow` on an empty store and with `ProtectedElement` when
    /// only the reserved prefix is left. A selection pointing at the removed
    /// element is cleared.
    pub fn pop(&mut self) -> EngineResult<UiElement> {
        if self.elements.is_empty() {
            return Err(EngineError::Underflow);
        }
        if self.elements.len() <= self.reserved {
            return Err(EngineError::ProtectedElement {
                count: self.elements.len(),
                reserved: self.reserved,
            });
        }

        let element = self.elements.pop().ok_or(EngineError::Underflow)?;
        if self.selected_id == Some(element.id) {
            debug!("Selection cleared with popped element {}", element.id);
            self.selected_id = None;
        }
        Ok(element)
    }

    /// Iterates over the elements in update order.
    pub fn iter(&self) -> std::slice::Iter<'_, UiElement> {
        self.elements.iter()
    }

    /// Elements bottom first, the order they are drawn in.
    pub fn draw_order(&self) -> &[UiElement] {
        &self.elements
    }

    /// Looks up an element by id.
    pub fn get(&self, id: u32) -> Option<&UiElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Id of the selected element, if any.
    pub fn selected_id(&self) -> Option<u32> {
        self.selected_id
    }

    /// Sets, or clears, the selected element.
    pub fn set_selected_id(&mut self, selected_id: Option<u32>) {
        self.selected_id = selected_id;
    }

    /// Number of elements in the store.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store holds no element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of built-in elements protected from `pop`.
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// Protects the first `reserved` elements from pop.
    pub fn set_reserved(&mut self, reserved: usize) {
        self.reserved = reserved;
    }

    /// Id the next pushed element receives.
    pub fn next_id(&self) -> u32 {
        self.elements.len() as u32
    }

    /// Removes every element and the selection. The reserved prefix is kept.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::ui::primitives::{Rect, UiFlags};

    fn element(id: u32) -> UiElement {
        UiElement::new(
            id,
            Rect::from_coords(0.0, 0.0, 10.0, 10.0),
            [1.0, 0.0, 0.0, 1.0],
            UiFlags::SELECTABLE,
        )
    }

    #[test]
    fn test_pop_returns_elements_in_reverse_push_order() {
        let mut store = ElementStore::new();
        for id in 0..4 {
            store.push(element(id)).unwrap();
        }

        let popped: Vec<u32> = (0..4).map(|_| store.pop().unwrap().id).collect();
        assert_eq!(popped, vec![3, 2, 1, 0]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_push_when_full_leaves_store_unchanged() {
        let mut store = ElementStore::with_capacity(2);
        store.push(element(0)).unwrap();
        store.push(element(1)).unwrap();

        let result = store.push(element(2));
        assert_eq!(
            result,
            Err(EngineError::CapacityExceeded {
                container: "element store",
                capacity: 2
            })
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn test_pop_on_empty_store_underflows() {
        let mut store = ElementStore::new();
        assert_eq!(store.pop(), Err(EngineError::Underflow));
    }

    #[test]
    fn test_reserved_prefix_is_protected() {
        let mut store = ElementStore::new();
        for id in 0..3 {
            store.push(element(id)).unwrap();
        }
        store.set_reserved(3);

        assert_eq!(
            store.pop(),
            Err(EngineError::ProtectedElement {
                count: 3,
                reserved: 3
            })
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_pop_clears_stale_selection() {
        let mut store = ElementStore::new();
        store.push(element(0)).unwrap();
        store.push(element(1)).unwrap();
        store.set_selected_id(Some(1));

        store.pop().unwrap();
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_pop_keeps_unrelated_selection() {
        let mut store = ElementStore::new();
        store.push(element(0)).unwrap();
        store.push(element(1)).unwrap();
        store.set_selected_id(Some(0));

        store.pop().unwrap();
        assert_eq!(store.selected_id(), Some(0));
    }

    #[test]
    fn test_next_id_follows_count() {
        let mut store = ElementStore::new();
        assert_eq!(store.next_id(), 0);
        store.push(element(0)).unwrap();
        store.push(element(1)).unwrap();
        assert_eq!(store.next_id(), 2);
        store.pop().unwrap();
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.get(0).map(|e| e.id), Some(0));
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut store = ElementStore::new();
        for id in 0..3 {
            store.push(element(id)).unwrap();
        }
        let first: Vec<u32> = store.iter().map(|e| e.id).collect();
        let second: Vec<u32> = store.iter().map(|e| e.id).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(first, second);
    }
}
