//! Window event handling for SceneState.

use glam::Vec2;
use input::MouseButton;
use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

impl crate::state::SceneState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.presenter.resize(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                if self.input.is_quit_pressed() {
                    log::info!("Escape pressed, exiting");
                    self.running = false;
                    return true;
                }
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                let window_pos = Vec2::new(position.x as f32, position.y as f32);
                let pointer = self.presenter.letterbox().to_canvas(window_pos);
                self.input.process_pointer(pointer);
                self.volume.handle_mouse_motion(pointer);
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                if button != MouseButton::Left {
                    return false;
                }
                let now = self.now_ms();
                let pointer = self.input.pointer();
                if state.is_pressed() {
                    // The widget gets first refusal so slider drags never spin the tree.
                    if self.input.is_mouse_pressed(MouseButton::Left)
                        && !self.volume.handle_mouse_down(pointer)
                    {
                        self.scene.pointer_down(pointer.x, now);
                    }
                } else if self.input.is_mouse_released(MouseButton::Left) {
                    self.volume.handle_mouse_up();
                    self.scene.pointer_up(now);
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                !self.running
            }
            _ => false,
        }
    }
}
