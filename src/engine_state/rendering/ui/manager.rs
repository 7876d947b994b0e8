//! Immediate-mode UI state machine.
//!
//! Once per frame [`UiManager::update`] walks the [`ElementStore`] front to
//! back, derives a [`UiSignal`] for every element from the frame's input and
//! applies the push/pop requested by the two built-in buttons. Structural
//! changes are deferred until the walk is over, so the store is never mutated
//! while it is being iterated.

use cgmath::Vector2;
use log::{debug, warn};

use crate::application_state::input_state::FrameInput;
use crate::engine_state::rendering::draw_bucket::DrawBucket;
use crate::error::{EngineError, EngineResult};

use super::primitives::{
    point_in_rect, QuadInstance, Rect, UiElement, UiFlags, BACKGROUND_PANEL_ID, POP_BUTTON_ID,
    PUSH_BUTTON_ID, RESERVED_ELEMENT_COUNT,
};
use super::store::ElementStore;

/// Color of the push button
pub const PUSH_BUTTON_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
/// Color of the pop button, the background panel and spawned elements
pub const ELEMENT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
/// Amount the selected element is lightened by when drawn
const HIGHLIGHT_AMOUNT: f32 = 0.35;

/// Height of a spawned element in pixels
const SPAWN_HEIGHT: f32 = 100.0;
/// Horizontal shift applied each time the spawn column wraps
const SPAWN_COLUMN_SHIFT: f32 = 4.0;

/// Per-element result of one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiSignal {
    /// Id of the element
    pub id: u32,
    /// The touch point lies inside the element
    pub is_touched: bool,
    /// The element holds, or may claim, the selection
    pub is_selected: bool,
    /// A press began on this element this frame
    pub just_pressed: bool,
}

/// Everything one update did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiFrameReport {
    /// One signal per element, in iteration order
    pub signals: Vec<UiSignal>,
    /// Id of the element spawned this frame
    pub pushed: Option<u32>,
    /// Id of the element removed this frame
    pub popped: Option<u32>,
    /// Structural changes that were requested but refused
    pub rejected: Vec<EngineError>,
}

impl UiFrameReport {
    /// Signal of the element with the given id, if it was visited.
    pub fn signal(&self, id: u32) -> Option<&UiSignal> {
        self.signals.iter().find(|signal| signal.id == id)
    }
}

/// Drives the UI elements held by an [`ElementStore`].
pub struct UiManager;

impl UiManager {
    /// Recreates the built-in elements for the given resolution.
    ///
    /// The store is cleared, the push button, the pop button and the background
    /// panel are pushed, and those three are marked as reserved.
    ///
    /// # Arguments
    /// * `store` - The store to rebuild
    /// * `resolution` - Window size in pixels
    pub fn bootstrap(store: &mut ElementStore, resolution: Vector2<f32>) -> EngineResult<()> {
        let (w, h) = (resolution.x, resolution.y);
        store.set_reserved(0);
        store.clear();

        store.push(UiElement::new(
            PUSH_BUTTON_ID,
            Rect::from_coords(40.0, h - 980.0, 240.0, h - 780.0),
            PUSH_BUTTON_COLOR,
            UiFlags::SELECTABLE,
        ))?;
        store.push(UiElement::new(
            POP_BUTTON_ID,
            Rect::from_coords(240.0, h - 980.0, 440.0, h - 780.0),
            ELEMENT_COLOR,
            UiFlags::SELECTABLE,
        ))?;
        store.push(UiElement::new(
            BACKGROUND_PANEL_ID,
            Rect::from_coords(40.0, 40.0, w - 40.0, h - 1000.0),
            ELEMENT_COLOR,
            UiFlags::empty(),
        ))?;
        store.set_reserved(RESERVED_ELEMENT_COUNT);

        debug!("UI bootstrapped for {}x{}", w, h);
        Ok(())
    }

    /// Bounds of a newly spawned element.
    ///
    /// Elements stack downwards 100 pixels at a time and wrap to the top once
    /// they pass the bottom of the screen, shifted right by 4 pixels per wrap.
    pub fn spawn_rect(id: u32, resolution: Vector2<f32>) -> Rect {
        let (w, h) = (resolution.x, resolution.y);
        let n = id.saturating_sub(RESERVED_ELEMENT_COUNT as u32) as f32;
        let offset_y = ((n * SPAWN_HEIGHT) % h).trunc();
        let offset_x = (n * SPAWN_HEIGHT / w).floor() * SPAWN_COLUMN_SHIFT;

        Rect::from_coords(
            offset_x,
            offset_y,
            w * 0.5 + offset_x,
            SPAWN_HEIGHT + offset_y,
        )
    }

    /// Runs one frame of the UI.
    ///
    /// Elements earlier in the store win the selection when several are
    /// touched. A press that touches nothing clears the selection. Push and
    /// pop requests are applied after the walk, push first; refused requests
    /// are logged and reported, never retried.
    pub fn update(
        store: &mut ElementStore,
        input: &FrameInput,
        resolution: Vector2<f32>,
    ) -> UiFrameReport {
        let mut report = UiFrameReport {
            signals: Vec::with_capacity(store.len()),
            ..Default::default()
        };

        let mut touched_count = 0;
        let mut pending_push: Option<UiElement> = None;
        let mut pending_pop = false;
        let id_generator = store.next_id();
        let count = store.len();
        let mut selected = store.selected_id();

        for element in store.iter() {
            let is_touched = point_in_rect(input.touch, &element.rect);
            let is_selected =
                element.is_selectable() && (selected == Some(element.id) || selected.is_none());
            if is_selected && is_touched {
                selected = Some(element.id);
            }
            let just_pressed = input.just_pressed && is_touched && is_selected;

            if just_pressed {
                match element.id {
                    PUSH_BUTTON_ID => {
                        pending_push = Some(UiElement::new(
                            id_generator,
                            Self::spawn_rect(id_generator, resolution),
                            ELEMENT_COLOR,
                            UiFlags::SELECTABLE,
                        ));
                    }
                    POP_BUTTON_ID => {
                        if count > store.reserved() {
                            pending_pop = true;
                        } else {
                            report.rejected.push(EngineError::ProtectedElement {
                                count,
                                reserved: store.reserved(),
                            });
                        }
                    }
                    _ => {}
                }
            }

            if is_touched {
                touched_count += 1;
            }

            report.signals.push(UiSignal {
                id: element.id,
                is_touched,
                is_selected,
                just_pressed,
            });
        }

        if touched_count == 0 && input.just_pressed {
            selected = None;
        }
        store.set_selected_id(selected);

        if let Some(element) = pending_push {
            let id = element.id;
            match store.push(element) {
                Ok(()) => {
                    debug!("Spawned element {}", id);
                    report.pushed = Some(id);
                }
                Err(err) => report.rejected.push(err),
            }
        }

        if pending_pop {
            match store.pop() {
                Ok(element) => {
                    debug!("Removed element {}", element.id);
                    report.popped = Some(element.id);
                }
                Err(err) => report.rejected.push(err),
            }
        }

        for err in &report.rejected {
            warn!("UI request rejected: {}", err);
        }

        report
    }

    /// Fills the UI bucket with one quad per element, bottom first.
    ///
    /// The selected element is drawn lightened. Quads over capacity are
    /// dropped; the first such error is returned once the bucket is frozen.
    pub fn fill_bucket(
        store: &ElementStore,
        bucket: &mut DrawBucket<QuadInstance>,
    ) -> EngineResult<()> {
        bucket.begin(None);

        let mut first_error = None;
        for element in store.draw_order() {
            let mut instance = element.to_instance();
            if store.selected_id() == Some(element.id) {
                instance.color = highlight(instance.color);
            }
            if let Err(err) = bucket.push_instance(instance) {
                first_error.get_or_insert(err);
            }
        }

        bucket.end()?;
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn highlight(color: [f32; 4]) -> [f32; 4] {
    let lighten = |c: f32| (c + (1.0 - c) * HIGHLIGHT_AMOUNT).min(1.0);
    [lighten(color[0]), lighten(color[1]), lighten(color[2]), color[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::draw_bucket::BucketState;
    use approx::assert_relative_eq;
    use cgmath::Point2;

    fn resolution() -> Vector2<f32> {
        Vector2::new(1080.0, 2000.0)
    }

    // Inside the push button, the pop button and nothing at all.
    const PUSH_POINT: (f32, f32) = (100.0, 1100.0);
    const POP_POINT: (f32, f32) = (300.0, 1100.0);
    const EMPTY_POINT: (f32, f32) = (900.0, 1500.0);

    fn bootstrapped() -> ElementStore {
        let mut store = ElementStore::new();
        UiManager::bootstrap(&mut store, resolution()).unwrap();
        store
    }

    fn tap(store: &mut ElementStore, point: (f32, f32)) -> UiFrameReport {
        UiManager::update(store, &FrameInput::tap(point.0, point.1), resolution())
    }

    #[test]
    fn test_bootstrap_layout() {
        let store = bootstrapped();
        assert_eq!(store.len(), 3);
        assert_eq!(store.reserved(), 3);
        assert_eq!(store.next_id(), 3);
        assert_eq!(store.selected_id(), None);

        let push = store.get(PUSH_BUTTON_ID).unwrap();
        assert_eq!(push.rect, Rect::from_coords(40.0, 1020.0, 240.0, 1220.0));
        assert_eq!(push.color, PUSH_BUTTON_COLOR);

        let pop = store.get(POP_BUTTON_ID).unwrap();
        assert_eq!(pop.rect, Rect::from_coords(240.0, 1020.0, 440.0, 1220.0));

        let background = store.get(BACKGROUND_PANEL_ID).unwrap();
        assert_eq!(background.rect, Rect::from_coords(40.0, 40.0, 1040.0, 1000.0));
        assert!(!background.is_selectable());
    }

    #[test]
    fn test_spawn_layout_values() {
        let first = UiManager::spawn_rect(3, resolution());
        assert_eq!(first, Rect::from_coords(0.0, 0.0, 540.0, 100.0));

        let second = UiManager::spawn_rect(4, resolution());
        assert_eq!(second, Rect::from_coords(0.0, 100.0, 540.0, 200.0));

        // 20 elements fill one 2000 pixel column, the 21st wraps to the top.
        let wrapped = UiManager::spawn_rect(23, resolution());
        assert_relative_eq!(wrapped.min.x, 4.0);
        assert_relative_eq!(wrapped.min.y, 0.0);
        assert_relative_eq!(wrapped.max.x, 544.0);
        assert_relative_eq!(wrapped.max.y, 100.0);
    }

    #[test]
    fn test_push_button_spawns_next_id() {
        let mut store = bootstrapped();
        let report = tap(&mut store, PUSH_POINT);

        assert_eq!(report.pushed, Some(3));
        assert_eq!(report.popped, None);
        assert_eq!(store.len(), 4);
        assert_eq!(store.selected_id(), Some(PUSH_BUTTON_ID));
        assert_eq!(
            store.get(3).unwrap().rect,
            Rect::from_coords(0.0, 0.0, 540.0, 100.0)
        );

        let signal = report.signal(PUSH_BUTTON_ID).unwrap();
        assert!(signal.is_touched && signal.is_selected && signal.just_pressed);
    }

    #[test]
    fn test_held_press_does_not_repeat() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);

        let held = FrameInput {
            just_pressed: false,
            ..FrameInput::tap(PUSH_POINT.0, PUSH_POINT.1)
        };
        let report = UiManager::update(&mut store, &held, resolution());
        assert_eq!(report.pushed, None);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);
        assert_eq!(store.selected_id(), Some(PUSH_BUTTON_ID));

        tap(&mut store, EMPTY_POINT);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_hover_without_press_keeps_selection() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);

        let (x, y) = EMPTY_POINT;
        UiManager::update(&mut store, &FrameInput::hover(x, y), resolution());
        assert_eq!(store.selected_id(), Some(PUSH_BUTTON_ID));
    }

    #[test]
    fn test_selection_blocks_other_buttons() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);

        let report = tap(&mut store, POP_POINT);
        let pop = report.signal(POP_BUTTON_ID).unwrap();
        assert!(pop.is_touched);
        assert!(!pop.is_selected);
        assert!(!pop.just_pressed);
        assert_eq!(report.popped, None);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_background_is_touched_but_never_selected() {
        let mut store = bootstrapped();
        let report = tap(&mut store, (500.0, 500.0));

        let background = report.signal(BACKGROUND_PANEL_ID).unwrap();
        assert!(background.is_touched);
        assert!(!background.is_selected);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_spawned_element_above_background_is_claimed() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);
        tap(&mut store, EMPTY_POINT);

        // (100, 50) lies in both element 3 and the background.
        let report = tap(&mut store, (100.0, 50.0));
        assert_eq!(store.selected_id(), Some(3));
        assert!(report.signal(BACKGROUND_PANEL_ID).unwrap().is_touched);
    }

    #[test]
    fn test_first_overlapping_selectable_wins() {
        let mut store = bootstrapped();
        for expected in 3..=23 {
            assert_eq!(tap(&mut store, PUSH_POINT).pushed, Some(expected));
        }
        tap(&mut store, EMPTY_POINT);

        // Element 23 wrapped to the top of the second column and overlaps 3.
        let point = (10.0, 50.0);
        let inside = Point2::new(point.0, point.1);
        assert!(UiManager::spawn_rect(3, resolution()).contains(inside));
        assert!(UiManager::spawn_rect(23, resolution()).contains(inside));

        let report = tap(&mut store, point);
        assert_eq!(store.selected_id(), Some(3));

        let first = report.signal(3).unwrap();
        assert!(first.is_touched && first.is_selected && first.just_pressed);
        let later = report.signal(23).unwrap();
        assert!(later.is_touched);
        assert!(!later.is_selected);
        assert!(!later.just_pressed);
    }

    #[test]
    fn test_push_pop_scenario() {
        let mut store = bootstrapped();

        assert_eq!(tap(&mut store, PUSH_POINT).pushed, Some(3));
        assert_eq!(tap(&mut store, PUSH_POINT).pushed, Some(4));
        assert_eq!(store.len(), 5);

        tap(&mut store, EMPTY_POINT);
        assert_eq!(store.selected_id(), None);

        assert_eq!(tap(&mut store, POP_POINT).popped, Some(4));
        assert_eq!(tap(&mut store, POP_POINT).popped, Some(3));
        assert_eq!(store.len(), 3);
        assert_eq!(store.next_id(), 3);

        let rejected = tap(&mut store, POP_POINT);
        assert_eq!(rejected.popped, None);
        assert_eq!(
            rejected.rejected,
            vec![EngineError::ProtectedElement {
                count: 3,
                reserved: 3
            }]
        );
        assert_eq!(store.len(), 3);
        assert_eq!(store.next_id(), 3);
    }

    #[test]
    fn test_push_into_full_store_is_reported() {
        let mut store = ElementStore::with_capacity(3);
        UiManager::bootstrap(&mut store, resolution()).unwrap();

        let report = tap(&mut store, PUSH_POINT);
        assert_eq!(report.pushed, None);
        assert!(matches!(
            report.rejected.as_slice(),
            [EngineError::CapacityExceeded { capacity: 3, .. }]
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_fill_bucket_draws_in_store_order() {
        let mut store = bootstrapped();
        tap(&mut store, PUSH_POINT);

        let mut bucket = DrawBucket::new("ui", 16);
        UiManager::fill_bucket(&store, &mut bucket).unwrap();
        assert_eq!(bucket.state(), BucketState::Frozen);

        let frozen = bucket.frozen().unwrap();
        assert_eq!(frozen.instance_count(), 4);
        assert_eq!(frozen.instances[3].min, [0.0, 0.0]);
        assert_eq!(frozen.instances[3].max, [540.0, 100.0]);
        assert!(frozen.transform.is_none());

        // The push button holds the selection and is drawn lightened.
        assert_ne!(frozen.instances[0].color, PUSH_BUTTON_COLOR);
        assert_eq!(frozen.instances[1].color, ELEMENT_COLOR);
    }

    #[test]
    fn test_fill_bucket_reports_overflow_after_freezing() {
        let store = bootstrapped();
        let mut bucket = DrawBucket::new("ui", 2);

        let result = UiManager::fill_bucket(&store, &mut bucket);
        assert!(matches!(
            result,
            Err(EngineError::CapacityExceeded { capacity: 2, .. })
        ));
        assert_eq!(bucket.state(), BucketState::Frozen);
        assert_eq!(bucket.dropped(), 1);
        assert_eq!(bucket.frozen().unwrap().instance_count(), 2);
    }
}
