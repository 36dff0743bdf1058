//! Falling snow: initial placement and the per-frame fall with wraparound.

use engine_core::{FlickerClass, Particle, ParticleKind, Rgb};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::{spawn, uniform_in};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub spawn_x: (f32, f32),
    pub spawn_y: (f32, f32),
    pub spawn_z: (f32, f32),
    pub size: (f32, f32),
    /// World units per frame.
    pub fall_speed: (f32, f32),
    /// A flake below this y is recycled.
    pub floor_y: f32,
    /// Height a recycled flake restarts from.
    pub reset_y: f32,
    /// Horizontal range for recycled flakes, applied to both x and z.
    pub respawn_xz: (f32, f32),
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            spawn_x: (-500.0, 1200.0),
            spawn_y: (-500.0, 500.0),
            spawn_z: (-500.0, 1200.0),
            size: (0.8, 1.8),
            fall_speed: (0.2, 1.8),
            floor_y: 250.0,
            reset_y: -500.0,
            respawn_xz: (-500.0, 500.0),
        }
    }
}

/// Generate `count` falling flakes scattered through the volume.
pub fn generate_snow<R: Rng + ?Sized>(
    count: usize,
    config: &SnowConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let x = uniform_in(rng, config.spawn_x);
        let y = uniform_in(rng, config.spawn_y);
        let z = uniform_in(rng, config.spawn_z);
        let size = uniform_in(rng, config.size);
        // Falling flakes twinkle like foliage rather than shimmer like resting snow.
        let flake = spawn(
            rng,
            Vec3::new(x, y, z),
            Rgb::WHITE,
            size,
            FlickerClass::Twinkle,
            ParticleKind::Flake,
        );
        particles.push(flake.with_fall_speed(uniform_in(rng, config.fall_speed)));
    }
    log::debug!("Generated snow: {} flakes", particles.len());
    particles
}

/// Advances falling particles and recycles those that pass the floor.
#[derive(Debug, Clone, Default)]
pub struct SnowSimulator {
    pub config: SnowConfig,
}

impl SnowSimulator {
    pub fn new(config: SnowConfig) -> Self {
        Self { config }
    }

    /// One frame of fall. Flakes below `floor_y` restart at `reset_y` with a fresh
    /// horizontal position; size, speed and flicker are kept.
    pub fn step<R: Rng + ?Sized>(&self, flakes: &mut [Particle], rng: &mut R) {
        for flake in flakes.iter_mut() {
            flake.position.y += flake.fall_speed;
            if flake.position.y > self.config.floor_y {
                flake.position.y = self.config.reset_y;
                flake.position.x = uniform_in(rng, self.config.respawn_xz);
                flake.position.z = uniform_in(rng, self.config.respawn_xz);
            }
        }
    }
}
