//! # Input State
//!
//! This module defines the input state types used by the input manager:
//! press transitions, the decoded touch actions and the per-frame snapshot
//! handed to the engine.

use cgmath::Point2;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Represents the state of the pointer between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Pointer is not pressed
    #[default]
    NotPressed,
    /// Pointer was just pressed this frame
    Pressed,
    /// Pointer has been held down for multiple frames
    Held,
    /// Pointer was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the pointer is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the pointer was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the pointer was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Updates the input state based on the previous and current raw states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Kind of a touch sample.
///
/// Discriminants are the Android motion-event action codes, so raw codes can
/// be decoded with [`TouchAction::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum TouchAction {
    /// First pointer went down
    Down = 0,
    /// Last pointer went up
    Up = 1,
    /// A pointer moved
    Move = 2,
    /// An additional pointer went down
    PointerDown = 5,
}

impl TouchAction {
    /// Decodes a raw action code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        FromPrimitive::from_u32(code)
    }
}

/// Input snapshot consumed by one frame of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Last known pointer position in window pixels, origin top-left
    pub touch: Point2<f32>,
    /// Whether the pointer is currently down
    pub is_pressed: bool,
    /// Whether a press began since the previous frame
    pub just_pressed: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            touch: Point2::new(0.0, 0.0),
            is_pressed: false,
            just_pressed: false,
        }
    }
}

impl FrameInput {
    /// Snapshot of a pointer that is down and was pressed this frame.
    pub fn tap(x: f32, y: f32) -> Self {
        Self {
            touch: Point2::new(x, y),
            is_pressed: true,
            just_pressed: true,
        }
    }

    /// Snapshot of an idle pointer resting at `(x, y)`.
    pub fn hover(x: f32, y: f32) -> Self {
        Self {
            touch: Point2::new(x, y),
            is_pressed: false,
            just_pressed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(RawInputState::from_raw_states(false, true).is_just_pressed());
        assert!(RawInputState::from_raw_states(true, true).is_active());
        assert!(!RawInputState::from_raw_states(true, true).is_just_pressed());
        assert!(RawInputState::from_raw_states(true, false).is_just_released());
        assert_eq!(
            RawInputState::from_raw_states(false, false),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn test_android_action_codes() {
        assert_eq!(TouchAction::from_code(0), Some(TouchAction::Down));
        assert_eq!(TouchAction::from_code(1), Some(TouchAction::Up));
        assert_eq!(TouchAction::from_code(2), Some(TouchAction::Move));
        assert_eq!(TouchAction::from_code(5), Some(TouchAction::PointerDown));
        assert_eq!(TouchAction::from_code(3), None);
    }
}
