//! Pointer and keyboard input for the scene.

pub mod rotation;

pub use rotation::*;

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
///
/// The pointer position is stored in whatever space the caller feeds in; the app maps
/// window coordinates onto the virtual canvas before calling [`InputState::process_pointer`].
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,

    /// Pointer position.
    pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process a pointer position update.
    pub fn process_pointer(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Latest pointer position.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_is_reported_once_per_hold() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_quit_pressed());
        input.begin_frame();
        // Key repeat while held does not count as a new press.
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(!input.is_quit_pressed());
        input.process_keyboard(KeyCode::Escape, ElementState::Released);
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_quit_pressed());
    }

    #[test]
    fn other_keys_do_not_quit() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(!input.is_quit_pressed());
    }

    #[test]
    fn mouse_press_and_release_last_one_frame() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_pressed(MouseButton::Left));
        assert!(!input.is_mouse_released(MouseButton::Left));
        input.begin_frame();
        assert!(!input.is_mouse_pressed(MouseButton::Left));

        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(input.is_mouse_released(MouseButton::Left));
        assert!(!input.is_mouse_pressed(MouseButton::Right));
        input.begin_frame();
        assert!(!input.is_mouse_released(MouseButton::Left));
    }

    #[test]
    fn pointer_keeps_last_position() {
        let mut input = InputState::new();
        assert_eq!(input.pointer(), Vec2::ZERO);
        input.process_pointer(Vec2::new(12.0, 30.0));
        input.begin_frame();
        assert_eq!(input.pointer(), Vec2::new(12.0, 30.0));
    }
}
