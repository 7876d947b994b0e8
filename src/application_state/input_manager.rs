//! # Input Manager
//!
//! This module turns platform events into the per-frame [`FrameInput`]:
//! - touch samples (`Down`, `Up`, `Move`, `PointerDown`)
//! - mouse cursor and left button, mapped onto the same samples
//! - press edge detection across frames

use cgmath::Point2;
use log::trace;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

use super::input_state::{FrameInput, RawInputState, TouchAction};

/// Tracks the pointer between frames.
///
/// Samples arrive between frames through [`InputManager::intake_touch`] or
/// [`InputManager::intake_input`]; the frame loop collects them once per frame
/// with [`InputManager::get_and_reset_frame_input`].
#[derive(Debug)]
pub struct InputManager {
    /// Last known pointer position
    touch_position: Point2<f32>,
    /// Pointer state at the previous snapshot
    pressed_old: bool,
    /// Current pointer state
    pressed_new: bool,
    /// A `Down` arrived since the previous snapshot
    press_latched: bool,
    /// Fingers currently on the screen
    active_touches: u32,
    /// Left mouse button is emulating a touch
    mouse_down: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates an input manager with the pointer released at the origin.
    pub fn new() -> Self {
        Self {
            touch_position: Point2::new(0.0, 0.0),
            pressed_old: false,
            pressed_new: false,
            press_latched: false,
            active_touches: 0,
            mouse_down: false,
        }
    }

    /// Records one touch sample.
    ///
    /// Every sample updates the position. `Down` presses the pointer and latches
    /// a press edge unless it was already down; `Up` releases it. `Move` and
    /// `PointerDown` only move it.
    ///
    /// # Arguments
    /// * `action` - Kind of the sample
    /// * `x` - Horizontal position in window pixels
    /// * `y` - Vertical position in window pixels
    pub fn intake_touch(&mut self, action: TouchAction, x: f32, y: f32) {
        trace!("Touch {:?} at ({}, {})", action, x, y);
        self.touch_position = Point2::new(x, y);

        match action {
            TouchAction::Down => {
                if !self.pressed_new {
                    self.press_latched = true;
                }
                self.pressed_new = true;
            }
            TouchAction::Up => {
                self.pressed_new = false;
            }
            TouchAction::Move | TouchAction::PointerDown => {}
        }
    }

    /// Processes a window event and updates internal input state.
    ///
    /// Handles touch events, cursor motion and the left mouse button.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Touch(Touch {
                phase, location, ..
            }) => {
                let (x, y) = (location.x as f32, location.y as f32);
                let action = match phase {
                    TouchPhase::Started => {
                        self.active_touches += 1;
                        if self.active_touches == 1 {
                            TouchAction::Down
                        } else {
                            TouchAction::PointerDown
                        }
                    }
                    TouchPhase::Moved => TouchAction::Move,
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.active_touches = self.active_touches.saturating_sub(1);
                        if self.active_touches == 0 {
                            TouchAction::Up
                        } else {
                            TouchAction::Move
                        }
                    }
                };
                self.intake_touch(action, x, y);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.intake_touch(TouchAction::Move, position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let (x, y) = (self.touch_position.x, self.touch_position.y);
                match state {
                    ElementState::Pressed if !self.mouse_down => {
                        self.mouse_down = true;
                        self.intake_touch(TouchAction::Down, x, y);
                    }
                    ElementState::Released if self.mouse_down => {
                        self.mouse_down = false;
                        self.intake_touch(TouchAction::Up, x, y);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Returns the input snapshot for this frame and prepares the next one.
    ///
    /// `just_pressed` is set on the first snapshot after a `Down`, including a
    /// tap that was already released again before the snapshot was taken.
    pub fn get_and_reset_frame_input(&mut self) -> FrameInput {
        let transition = RawInputState::from_raw_states(self.pressed_old, self.pressed_new);
        if transition.is_just_released() {
            trace!("Pointer released at {:?}", self.touch_position);
        }
        let frame_input = FrameInput {
            touch: self.touch_position,
            is_pressed: transition.is_active(),
            just_pressed: self.press_latched || transition.is_just_pressed(),
        };

        self.pressed_old = self.pressed_new;
        self.press_latched = false;
        frame_input
    }

    /// Releases the pointer and forgets pending edges.
    ///
    /// Called when the window loses focus to prevent a stuck press.
    pub fn reset_inputs(&mut self) {
        self.pressed_old = false;
        self.pressed_new = false;
        self.press_latched = false;
        self.active_touches = 0;
        self.mouse_down = false;
    }

    /// Last known pointer position.
    pub fn touch_position(&self) -> Point2<f32> {
        self.touch_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_reported_once() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Down, 10.0, 20.0);

        let first = input.get_and_reset_frame_input();
        assert!(first.just_pressed);
        assert!(first.is_pressed);
        assert_eq!(first.touch, Point2::new(10.0, 20.0));

        let held = input.get_and_reset_frame_input();
        assert!(!held.just_pressed);
        assert!(held.is_pressed);
    }

    #[test]
    fn test_tap_within_one_frame_is_seen() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Down, 5.0, 5.0);
        input.intake_touch(TouchAction::Up, 6.0, 6.0);

        let frame = input.get_and_reset_frame_input();
        assert!(frame.just_pressed);
        assert!(!frame.is_pressed);
        assert_eq!(frame.touch, Point2::new(6.0, 6.0));

        assert!(!input.get_and_reset_frame_input().just_pressed);
    }

    #[test]
    fn test_release_across_frames_ends_the_press() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Down, 7.0, 8.0);
        assert!(input.get_and_reset_frame_input().is_pressed);
        assert!(input.get_and_reset_frame_input().is_pressed);

        input.intake_touch(TouchAction::Up, 9.0, 10.0);
        let released = input.get_and_reset_frame_input();
        assert!(!released.is_pressed);
        assert!(!released.just_pressed);
        assert_eq!(released.touch, Point2::new(9.0, 10.0));

        let idle = input.get_and_reset_frame_input();
        assert!(!idle.is_pressed);
        assert!(!idle.just_pressed);
    }

    #[test]
    fn test_move_and_pointer_down_only_move() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Move, 1.0, 2.0);
        input.intake_touch(TouchAction::PointerDown, 3.0, 4.0);

        let frame = input.get_and_reset_frame_input();
        assert!(!frame.just_pressed);
        assert!(!frame.is_pressed);
        assert_eq!(frame.touch, Point2::new(3.0, 4.0));
    }

    #[test]
    fn test_repeated_down_does_not_retrigger() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Down, 0.0, 0.0);
        input.get_and_reset_frame_input();
        input.intake_touch(TouchAction::Down, 0.0, 0.0);
        assert!(!input.get_and_reset_frame_input().just_pressed);
    }

    #[test]
    fn test_reset_releases_pointer() {
        let mut input = InputManager::new();
        input.intake_touch(TouchAction::Down, 0.0, 0.0);
        input.reset_inputs();

        let frame = input.get_and_reset_frame_input();
        assert!(!frame.is_pressed);
        assert!(!frame.just_pressed);
    }
}
