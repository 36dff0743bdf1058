//! Painter's-algorithm particle pass: sort, project, fog, flicker, draw.

use engine_core::{FlickerClass, Particle, ParticleField, Rgb};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::projection::{CameraConfig, Projection};

/// Look of the particle pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Clear color, also the fog target.
    pub background: Rgb,
    /// Mean of the flicker size multiplier.
    pub flicker_base: f32,
    pub subtle_amplitude: f32,
    pub twinkle_amplitude: f32,
    /// Sizes at or below this draw as a single pixel.
    pub pixel_threshold: f32,
    /// Single pixels at or below this size are only drawn with `faint_keep_chance`.
    pub faint_threshold: f32,
    pub faint_keep_chance: f32,
    /// Discs with a larger radius get a glow halo.
    pub glow_min_radius: i32,
    /// Glow is suppressed at or beyond this fog amount.
    pub glow_max_fog: f32,
    pub glow_scale: f32,
    /// Glow opacity at zero fog, out of 255.
    pub glow_alpha: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Rgb::new(25, 28, 35),
            flicker_base: 0.8,
            subtle_amplitude: 0.05,
            twinkle_amplitude: 0.4,
            pixel_threshold: 1.2,
            faint_threshold: 0.5,
            faint_keep_chance: 0.6,
            glow_min_radius: 3,
            glow_max_fog: 0.5,
            glow_scale: 1.4,
            glow_alpha: 30.0,
        }
    }
}

/// What happened to one particle this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Behind the near clip.
    Culled,
    /// Faint single pixel dropped by the sparkle coin flip.
    Dropped,
    /// Single pixel that fell off the canvas.
    OffCanvas,
    Pixel,
    Disc { glow: bool },
}

/// Per-frame counters, logged at trace level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub culled: usize,
    pub dropped: usize,
    pub pixels: usize,
    pub discs: usize,
    pub glows: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: DrawOutcome) {
        match outcome {
            DrawOutcome::Culled => self.culled += 1,
            DrawOutcome::Dropped | DrawOutcome::OffCanvas => self.dropped += 1,
            DrawOutcome::Pixel => self.pixels += 1,
            DrawOutcome::Disc { glow } => {
                self.discs += 1;
                if glow {
                    self.glows += 1;
                }
            }
        }
    }
}

/// Draws a [`ParticleField`] onto a [`Canvas`].
///
/// Owns its own random source for the faint-pixel sparkle so it never disturbs the
/// generators' seeded stream.
pub struct ParticleRenderer {
    projection: Projection,
    config: RenderConfig,
    sparkle: StdRng,
}

impl ParticleRenderer {
    pub fn new(
        camera: CameraConfig,
        config: RenderConfig,
        canvas_width: u32,
        canvas_height: u32,
        seed: u64,
    ) -> Self {
        Self {
            projection: Projection::new(camera, canvas_width, canvas_height),
            config,
            sparkle: StdRng::seed_from_u64(seed),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Clear the canvas and draw every particle, farthest first, at time `t` seconds.
    pub fn render_frame(&mut self, canvas: &mut Canvas, field: &ParticleField, t: f32) -> FrameStats {
        canvas.clear(self.config.background);
        let mut stats = FrameStats::default();
        for particle in field.depth_sorted() {
            stats.record(self.draw_particle(canvas, particle, t));
        }
        log::trace!("Frame drawn: {:?}", stats);
        stats
    }

    /// Animated size multiplier for a flicker class at time `t`.
    fn flicker(&self, particle: &Particle, t: f32) -> f32 {
        let amplitude = match particle.flicker {
            FlickerClass::Subtle => self.config.subtle_amplitude,
            FlickerClass::Twinkle => self.config.twinkle_amplitude,
        };
        particle.flicker_factor(t, self.config.flicker_base, amplitude)
    }

    /// Project and draw a single particle at its current position.
    pub fn draw_particle(&mut self, canvas: &mut Canvas, particle: &Particle, t: f32) -> DrawOutcome {
        let Some(projected) = self.projection.project(particle.position) else {
            return DrawOutcome::Culled;
        };
        let cfg = &self.config;
        let color = Projection::fogged(particle.color, cfg.background, projected.fog);
        let size = particle.base_size * projected.scale * self.flicker(particle, t);

        if size <= cfg.pixel_threshold {
            let keep = size > cfg.faint_threshold || self.sparkle.gen::<f32>() < cfg.faint_keep_chance;
            if !keep {
                return DrawOutcome::Dropped;
            }
            return if canvas.set_pixel(projected.x, projected.y, color) {
                DrawOutcome::Pixel
            } else {
                DrawOutcome::OffCanvas
            };
        }

        let radius = size.floor() as i32;
        canvas.fill_circle(projected.x, projected.y, radius, color);

        let glow = radius > cfg.glow_min_radius
            && !particle.is_falling()
            && projected.fog < cfg.glow_max_fog;
        if glow {
            let glow_radius = (radius as f32 * cfg.glow_scale).floor() as i32;
            let alpha = (cfg.glow_alpha * (1.0 - projected.fog)).floor() / 255.0;
            canvas.add_circle(projected.x, projected.y, glow_radius, color, alpha);
        }
        DrawOutcome::Disc { glow }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::ParticleKind;
    use glam::Vec3;

    const BG: Rgb = Rgb::new(25, 28, 35);

    fn renderer() -> ParticleRenderer {
        ParticleRenderer::new(CameraConfig::default(), RenderConfig::default(), 1920, 1080, 7)
    }

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(1920, 1080);
        canvas.clear(BG);
        canvas
    }

    fn particle(position: Vec3, size: f32) -> Particle {
        Particle::new(position, Rgb::WHITE, size, FlickerClass::Subtle, ParticleKind::Snow)
    }

    fn untouched(canvas: &Canvas) -> bool {
        canvas.as_bytes().chunks(4).all(|px| px[..3] == [25, 28, 35])
    }

    #[test]
    fn particle_behind_camera_draws_nothing() {
        let mut r = renderer();
        let mut c = canvas();
        let p = particle(Vec3::new(0.0, 0.0, -640.0), 3.0);
        assert_eq!(r.draw_particle(&mut c, &p, 0.0), DrawOutcome::Culled);
        assert!(untouched(&c));
    }

    #[test]
    fn small_particle_is_a_single_pixel() {
        let mut r = renderer();
        let mut c = canvas();
        // scale 500/650 at z = 0; flicker 0.8 at t = 0 with zero phase.
        let p = particle(Vec3::ZERO, 1.5);
        assert_eq!(r.draw_particle(&mut c, &p, 0.0), DrawOutcome::Pixel);
        assert_eq!(c.pixel(1152, 640), Some(Rgb::WHITE));
        assert_eq!(c.pixel(1153, 640), Some(BG));
    }

    #[test]
    fn large_particle_is_a_disc_with_glow() {
        let mut r = renderer();
        let mut c = canvas();
        // scale 1 at z = -150; size 6 * 0.8 = 4.8 gives radius 4.
        let p = Particle::new(
            Vec3::new(0.0, 0.0, -150.0),
            Rgb::new(200, 110, 155),
            6.0,
            FlickerClass::Subtle,
            ParticleKind::Foliage,
        );
        assert_eq!(r.draw_particle(&mut c, &p, 0.0), DrawOutcome::Disc { glow: true });
        // The halo is added over the disc as well.
        let core = c.pixel(1152 + 4, 640).unwrap();
        assert!(core.r > 200 && core.g > 110);
        // Glow radius floor(4 * 1.4) = 5 brightens the ring outside the disc.
        let halo = c.pixel(1152 + 5, 640).unwrap();
        assert!(halo.r > BG.r);
        assert_eq!(c.pixel(1152 + 7, 640), Some(BG));
    }

    #[test]
    fn falling_particles_never_glow() {
        let mut r = renderer();
        let mut c = canvas();
        let p = particle(Vec3::new(0.0, 0.0, -150.0), 6.0).with_fall_speed(1.0);
        assert_eq!(r.draw_particle(&mut c, &p, 0.0), DrawOutcome::Disc { glow: false });
    }

    #[test]
    fn fogged_particle_fades_to_background() {
        let mut r = renderer();
        let mut c = canvas();
        let p = particle(Vec3::new(0.0, 0.0, 900.0), 3.0);
        r.draw_particle(&mut c, &p, 0.0);
        let proj = r.projection().project(p.position).unwrap();
        assert_eq!(c.pixel(proj.x, proj.y), Some(BG));
    }

    #[test]
    fn off_canvas_pixel_is_discarded() {
        let mut r = renderer();
        let mut c = canvas();
        let p = particle(Vec3::new(5000.0, 0.0, 0.0), 1.0);
        assert_eq!(r.draw_particle(&mut c, &p, 0.0), DrawOutcome::OffCanvas);
        assert!(untouched(&c));
    }

    #[test]
    fn nearer_particle_paints_over_farther() {
        let mut r = renderer();
        let mut c = canvas();
        let far = Particle::new(Vec3::new(0.0, 0.0, -100.0), Rgb::GOLD, 8.0, FlickerClass::Subtle, ParticleKind::Gold);
        let near = Particle::new(Vec3::new(0.0, 0.0, -150.0), Rgb::WHITE, 4.0, FlickerClass::Subtle, ParticleKind::Snow);
        let field = ParticleField::new(vec![near, far], Vec::new());
        let stats = r.render_frame(&mut c, &field, 0.0);
        assert_eq!(stats.discs, 2);
        assert_eq!(c.pixel(1152, 640), Some(Rgb::WHITE));
    }

    #[test]
    fn faint_pixels_sparkle() {
        let mut r = renderer();
        let mut c = canvas();
        let p = particle(Vec3::ZERO, 0.3);
        let kept = (0..1000)
            .filter(|_| r.draw_particle(&mut c, &p, 0.0) == DrawOutcome::Pixel)
            .count();
        assert!(kept > 450 && kept < 750, "kept {}", kept);
    }
}
