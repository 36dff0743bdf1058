//! The renderable particle and its creation-time attributes.

use glam::Vec3;

use crate::color::Rgb;

/// How strongly a particle's apparent size oscillates over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlickerClass {
    /// Snow-like particles: near-imperceptible shimmer.
    Subtle,
    /// Colored foliage, ornaments and ground: a noticeable twinkle.
    Twinkle,
}

/// What a particle represents in the scene. Assigned once at generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Colored tree body from the inner/mid/outer palettes.
    Foliage,
    /// White snow resting on the tree or heart.
    Snow,
    /// Gold or light-gold accent.
    Gold,
    /// Heart ornament body.
    Ornament,
    /// Rippled ground disc.
    Ground,
    /// Falling snowflake.
    Flake,
}

/// A single point in the scene.
///
/// `origin` is fixed at creation. Rotation always recomputes `position` from it so repeated
/// rotation never accumulates floating-point drift.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current world-space position, rewritten every frame.
    pub position: Vec3,
    origin: Vec3,
    pub color: Rgb,
    /// Nominal render radius before perspective and flicker.
    pub base_size: f32,
    /// Angular speed of the size oscillation (radians per second).
    pub flicker_speed: f32,
    /// Phase offset of the size oscillation (radians).
    pub flicker_phase: f32,
    /// Units per frame; zero for static particles.
    pub fall_speed: f32,
    pub flicker: FlickerClass,
    pub kind: ParticleKind,
}

impl Particle {
    /// Create a static particle at `position`. The origin is captured from it.
    pub fn new(
        position: Vec3,
        color: Rgb,
        base_size: f32,
        flicker: FlickerClass,
        kind: ParticleKind,
    ) -> Self {
        Self {
            position,
            origin: position,
            color,
            base_size: base_size.max(0.0),
            flicker_speed: 0.0,
            flicker_phase: 0.0,
            fall_speed: 0.0,
            flicker,
            kind,
        }
    }

    /// Set the flicker oscillation parameters.
    pub fn with_flicker(mut self, speed: f32, phase: f32) -> Self {
        self.flicker_speed = speed;
        self.flicker_phase = phase;
        self
    }

    /// Mark the particle as falling with the given per-frame speed.
    pub fn with_fall_speed(mut self, fall_speed: f32) -> Self {
        self.fall_speed = fall_speed.max(0.0);
        self
    }

    /// Creation-time position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Whether this particle drifts vertically instead of following the scene rotation.
    pub fn is_falling(&self) -> bool {
        self.fall_speed > 0.0
    }

    /// Rotate around the world Y axis by `angle`, recomputed from the origin.
    pub fn rotate_y(&mut self, angle: f32) {
        let (sin_a, cos_a) = angle.sin_cos();
        self.position.x = self.origin.x * cos_a - self.origin.z * sin_a;
        self.position.z = self.origin.x * sin_a + self.origin.z * cos_a;
    }

    /// Sinusoidal size multiplier at time `t` seconds for the given amplitude.
    pub fn flicker_factor(&self, t: f32, base: f32, amplitude: f32) -> f32 {
        base + amplitude * (t * self.flicker_speed + self.flicker_phase).sin()
    }
}
