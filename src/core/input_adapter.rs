use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Page scroll per wheel notch, in pixels
pub const LINE_HEIGHT: f32 = 40.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Wheel movement since last reset, pixels, positive scrolls the page down
    wheel_delta: f32,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_position: None,
            mouse_delta: (0.0, 0.0),
            wheel_delta: 0.0,
        }
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_button(button, event.state);
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.set_button(Button::Control, Self::element_state(state.control_key()));
                self.set_button(Button::Shift, Self::element_state(state.shift_key()));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    self.set_button(btn, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x as f32, position.y as f32);
                if let Some(old_pos) = self.mouse_position {
                    self.mouse_delta.0 += new_pos.0 - old_pos.0;
                    self.mouse_delta.1 += new_pos.1 - old_pos.1;
                }
                self.mouse_position = Some(new_pos);
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
            }
            WindowEvent::Focused(false) => {
                self.pressed_keys.clear();
            }
            _ => {}
        }
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    fn element_state(pressed: bool) -> ElementState {
        if pressed {
            ElementState::Pressed
        } else {
            ElementState::Released
        }
    }

    /// Take the accumulated mouse delta and reset it
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Take the accumulated wheel delta and reset it
    pub fn take_wheel_delta(&mut self) -> f32 {
        std::mem::take(&mut self.wheel_delta)
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Button::Control),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit events carry device ids that cannot be built outside winit,
    // so these tests drive the internal state directly.

    #[test]
    fn test_new_controller_empty() {
        let mut controller = WinitController::new();
        assert!(!controller.is_down(Button::MouseLeft));
        assert_eq!(controller.mouse_position(), None);
        assert_eq!(controller.take_mouse_delta(), (0.0, 0.0));
        assert_eq!(controller.take_wheel_delta(), 0.0);
    }

    #[test]
    fn test_button_press_release() {
        let mut controller = WinitController::new();
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        controller.set_button(Button::MouseLeft, ElementState::Pressed);
        assert!(controller.is_down(Button::MouseLeft));

        controller.set_button(Button::MouseLeft, ElementState::Released);
        assert!(!controller.is_down(Button::MouseLeft));
    }

    #[test]
    fn test_deltas_reset_on_take() {
        let mut controller = WinitController::new();
        controller.mouse_delta = (10.0, 5.0);
        controller.wheel_delta = 120.0;
        controller.mouse_position = Some((100.0, 200.0));

        assert_eq!(controller.take_mouse_delta(), (10.0, 5.0));
        assert_eq!(controller.take_mouse_delta(), (0.0, 0.0));
        assert_eq!(controller.take_wheel_delta(), 120.0);
        assert_eq!(controller.take_wheel_delta(), 0.0);
        // Position should remain
        assert_eq!(controller.mouse_position(), Some((100.0, 200.0)));
    }

    #[test]
    fn test_focus_loss_releases_buttons() {
        let mut controller = WinitController::new();
        controller.set_button(Button::Control, ElementState::Pressed);
        controller.process_event(&WindowEvent::Focused(false));
        assert!(!controller.is_down(Button::Control));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(WinitController::keycode_to_button(KeyCode::ControlRight), Some(Button::Control));
        assert_eq!(WinitController::keycode_to_button(KeyCode::ShiftLeft), Some(Button::Shift));
        assert_eq!(WinitController::keycode_to_button(KeyCode::Escape), None);
        assert_eq!(WinitController::keycode_to_button(KeyCode::KeyW), None);
        assert_eq!(WinitController::mouse_button_to_button(MouseButton::Left), Some(Button::MouseLeft));
        assert_eq!(WinitController::mouse_button_to_button(MouseButton::Right), None);
    }
}
