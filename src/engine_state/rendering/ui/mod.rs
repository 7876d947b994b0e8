//! Immediate-mode UI of the sandbox.
//!
//! This module contains the flat list of on-screen elements, the per-frame
//! state machine that drives them and the renderer that draws them on top of
//! the 3D scene.

mod manager;
mod primitives;
mod renderer;
mod store;

pub use manager::{UiFrameReport, UiManager, UiSignal, ELEMENT_COLOR, PUSH_BUTTON_COLOR};
pub use primitives::{
    point_in_rect, QuadInstance, QuadVertex, Rect, UiElement, UiFlags, BACKGROUND_PANEL_ID,
    POP_BUTTON_ID, PUSH_BUTTON_ID, RESERVED_ELEMENT_COUNT, UNIT_QUAD,
};
pub use renderer::{buffer_names, UiRenderer};
pub use store::{ElementStore, ELEMENT_STORE_CAPACITY};
