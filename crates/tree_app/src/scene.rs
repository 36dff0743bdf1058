//! The animated scene: generated particles plus the per-frame update and render.

use engine_core::ParticleField;
use input::RotationController;
use procgen::{generate_ground, generate_heart, generate_snow, generate_tree, SnowSimulator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{Canvas, FrameStats, ParticleRenderer};

use crate::config::AppConfig;

pub struct Scene {
    field: ParticleField,
    controller: RotationController,
    snow: SnowSimulator,
    renderer: ParticleRenderer,
    /// Drives snow respawn positions after generation.
    rng: StdRng,
}

impl Scene {
    /// Generate every particle from `seed`. Tree, heart, ground and snow draw from one
    /// stream in that order, so a seed always reproduces the same scene.
    pub fn new(config: &AppConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let counts = &config.counts;

        let mut rotating = generate_tree(counts.tree, &config.tree, &mut rng);
        rotating.extend(generate_heart(counts.heart, &config.heart, &mut rng));
        rotating.extend(generate_ground(counts.ground, &config.ground, &mut rng));
        let falling = generate_snow(counts.snow, &config.snow, &mut rng);

        let field = ParticleField::new(rotating, falling);
        log::info!(
            "Generated {} particles ({} rotating, {} falling) from seed {}",
            field.len(),
            field.rotating.len(),
            field.falling.len(),
            seed
        );

        Self {
            field,
            controller: RotationController::new(config.interaction.clone()),
            snow: SnowSimulator::new(config.snow.clone()),
            renderer: ParticleRenderer::new(
                config.camera.clone(),
                config.render.clone(),
                config.canvas_width,
                config.canvas_height,
                seed.wrapping_add(1),
            ),
            rng,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn controller(&self) -> &RotationController {
        &self.controller
    }

    /// Start a rotation drag at canvas x.
    pub fn pointer_down(&mut self, x: f32, now_ms: u64) {
        self.controller.drag_start(x, now_ms);
    }

    /// Any release counts as interaction and holds off auto-rotation, even one that ends a
    /// volume slider drag.
    pub fn pointer_up(&mut self, now_ms: u64) {
        self.controller.drag_end(now_ms);
    }

    /// Advance one frame and draw it onto `canvas`.
    pub fn frame(&mut self, canvas: &mut Canvas, now_ms: u64, pointer_x: f32) -> FrameStats {
        self.controller.update(now_ms, pointer_x);
        self.field.rotate(self.controller.angle());
        self.snow.step(&mut self.field.falling, &mut self.rng);
        self.renderer.render_frame(canvas, &self.field, now_ms as f32 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParticleCounts;

    fn small_config() -> AppConfig {
        AppConfig {
            counts: ParticleCounts {
                tree: 100,
                heart: 50,
                ground: 80,
                snow: 20,
            },
            canvas_width: 320,
            canvas_height: 180,
            ..AppConfig::default()
        }
    }

    #[test]
    fn scene_holds_every_generated_particle() {
        let scene = Scene::new(&small_config(), 3);
        assert_eq!(scene.field().rotating.len(), 140 + 50 + 80);
        assert_eq!(scene.field().falling.len(), 20);
    }

    #[test]
    fn same_seed_same_scene() {
        let config = small_config();
        let a = Scene::new(&config, 11);
        let b = Scene::new(&config, 11);
        let pa: Vec<_> = a.field().iter().map(|p| (p.position, p.color)).collect();
        let pb: Vec<_> = b.field().iter().map(|p| (p.position, p.color)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn idle_scene_drifts_into_auto_rotation() {
        let mut scene = Scene::new(&small_config(), 5);
        let mut canvas = Canvas::new(320, 180);
        let mut now = 0;
        for _ in 0..400 {
            now += 16;
            scene.frame(&mut canvas, now, 0.0);
        }
        assert!(scene.controller().velocity() > 0.0);
        assert!(scene.controller().angle() > 0.0);
    }

    #[test]
    fn drag_turns_the_scene() {
        let mut scene = Scene::new(&small_config(), 5);
        let mut canvas = Canvas::new(320, 180);
        scene.pointer_down(100.0, 0);
        scene.frame(&mut canvas, 16, 140.0);
        assert!((scene.controller().angle() - 0.2).abs() < 1e-6);
        scene.pointer_up(32);
        assert!(!scene.controller().is_dragging());
    }

    #[test]
    fn release_without_drag_delays_auto_rotation() {
        let mut scene = Scene::new(&small_config(), 5);
        let mut canvas = Canvas::new(320, 180);
        scene.pointer_up(5000);
        scene.frame(&mut canvas, 5001, 0.0);
        assert_eq!(scene.controller().velocity(), 0.0);
        scene.frame(&mut canvas, 7000, 0.0);
        assert_eq!(scene.controller().velocity(), 0.0);
        scene.frame(&mut canvas, 7001, 0.0);
        assert!(scene.controller().velocity() > 0.0);
    }

    #[test]
    fn frame_draws_something() {
        let mut scene = Scene::new(&small_config(), 9);
        let mut canvas = Canvas::new(320, 180);
        let stats = scene.frame(&mut canvas, 16, 0.0);
        assert!(stats.pixels + stats.discs > 0);
    }
}
