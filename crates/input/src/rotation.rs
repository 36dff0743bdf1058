//! Drag-to-spin scene rotation with inertia and idle auto-rotation.

use serde::{Deserialize, Serialize};

/// Tuning for the rotation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of velocity per pixel of horizontal drag.
    pub sensitivity: f32,
    /// Per-frame velocity decay while the user interacted recently.
    pub friction: f32,
    /// Idle time after which auto-rotation resumes.
    pub idle_timeout_ms: u64,
    /// Blend factor toward the auto-rotation speed per frame.
    pub resume_smoothness: f32,
    /// Steady auto-rotation speed in radians per frame.
    pub auto_speed: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            friction: 0.95,
            idle_timeout_ms: 2000,
            resume_smoothness: 0.02,
            auto_speed: 0.003,
        }
    }
}

/// Turns pointer drags and idle time into a single scene rotation angle.
///
/// The angle accumulates without wraparound; consumers feed it straight into `sin_cos`.
#[derive(Debug, Clone)]
pub struct RotationController {
    config: InteractionConfig,
    angle: f32,
    velocity: f32,
    dragging: bool,
    last_x: f32,
    last_interaction_ms: u64,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl RotationController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            angle: 0.0,
            velocity: 0.0,
            dragging: false,
            last_x: 0.0,
            last_interaction_ms: 0,
        }
    }

    /// Begin a drag at pointer `x`. Any inertia is cancelled.
    pub fn drag_start(&mut self, x: f32, now_ms: u64) {
        self.dragging = true;
        self.velocity = 0.0;
        self.last_x = x;
        self.last_interaction_ms = now_ms;
    }

    /// Track the pointer while dragging; ignored otherwise.
    pub fn drag_move(&mut self, x: f32, now_ms: u64) {
        if !self.dragging {
            return;
        }
        self.velocity = (x - self.last_x) * self.config.sensitivity;
        self.last_x = x;
        self.last_interaction_ms = now_ms;
    }

    /// Release the drag. The current velocity carries on as inertia.
    pub fn drag_end(&mut self, now_ms: u64) {
        self.dragging = false;
        self.last_interaction_ms = now_ms;
        log::trace!("Drag released with velocity {:.4}", self.velocity);
    }

    /// Advance one frame with the current pointer x in canvas space.
    pub fn update(&mut self, now_ms: u64, pointer_x: f32) {
        if self.dragging {
            self.drag_move(pointer_x, now_ms);
        } else {
            let idle = now_ms.saturating_sub(self.last_interaction_ms);
            if idle > self.config.idle_timeout_ms {
                let s = self.config.resume_smoothness;
                self.velocity = self.velocity * (1.0 - s) + self.config.auto_speed * s;
            } else {
                self.velocity *= self.config.friction;
            }
        }
        self.angle += self.velocity;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }
}
