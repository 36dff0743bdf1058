//! Puffy heart ornament that sits above the tree apex.

use std::f32::consts::{FRAC_PI_2, TAU};

use engine_core::{FlickerClass, Particle, ParticleKind, Rgb};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::{chance, spawn, uniform, uniform_in};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Multiplier on the parametric curve.
    pub scale: f32,
    /// World y of the curve origin (negative is up).
    pub y_offset: f32,
    /// Exponent on the radial fill; below 1 pushes particles toward the outline.
    pub fill_exponent: f32,
    /// Thickness at the centre, thinning toward the rim.
    pub max_thickness: f32,
    pub thickness_exponent: f32,
    pub thickness_jitter: (f32, f32),
    /// Fill fraction beyond which the outline is softened.
    pub rim_start: f32,
    pub rim_jitter: f32,
    pub gold_chance: f32,
    pub gold_size: (f32, f32),
    /// Cumulative threshold for light gold (after gold).
    pub light_gold_chance: f32,
    pub light_gold_size: (f32, f32),
    /// Fill fraction below which the core is near-white.
    pub core_limit: f32,
    pub core_color: Rgb,
    pub core_size: (f32, f32),
    pub body_color: Rgb,
    pub body_size: (f32, f32),
    pub highlight_chance: f32,
    pub highlight_size: (f32, f32),
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            scale: 3.0,
            y_offset: -465.0,
            fill_exponent: 0.2,
            max_thickness: 16.0,
            thickness_exponent: 0.7,
            thickness_jitter: (0.9, 1.1),
            rim_start: 0.85,
            rim_jitter: 0.5,
            gold_chance: 0.02,
            gold_size: (2.5, 3.8),
            light_gold_chance: 0.03,
            light_gold_size: (1.8, 2.5),
            core_limit: 0.35,
            core_color: Rgb::new(255, 230, 230),
            core_size: (1.0, 1.6),
            body_color: Rgb::new(255, 80, 110),
            body_size: (1.0, 1.6),
            highlight_chance: 0.25,
            highlight_size: (0.6, 1.2),
        }
    }
}

/// Point on the classic heart curve for parameter `t`, y pointing up.
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x, y)
}

/// Generate `count` heart particles. Never fails; `count == 0` yields an empty vector.
pub fn generate_heart<R: Rng + ?Sized>(
    count: usize,
    config: &HeartConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let particles: Vec<Particle> = (0..count).map(|_| heart_particle(config, rng)).collect();
    log::debug!("Generated heart: {} particles", particles.len());
    particles
}

fn heart_particle<R: Rng + ?Sized>(config: &HeartConfig, rng: &mut R) -> Particle {
    let t = uniform(rng, 0.0, TAU);
    let (x0, y0) = heart_curve(t);
    let fill = rng.gen::<f32>().powf(config.fill_exponent);

    let scale = config.scale * fill;
    let mut x = x0 * scale;
    let mut y = -y0 * scale + config.y_offset;

    let thickness = config.max_thickness * (fill * FRAC_PI_2).cos().max(0.0).powf(config.thickness_exponent);
    let side = if chance(rng, 0.5) { -1.0 } else { 1.0 };
    let z = thickness * side * uniform_in(rng, config.thickness_jitter);

    if fill > config.rim_start {
        let offset = uniform(rng, -config.rim_jitter, config.rim_jitter);
        x += offset * t.cos();
        y += offset * t.sin();
    }

    let position = Vec3::new(x, y, z);
    let sparkle = rng.gen::<f32>();

    if sparkle < config.gold_chance {
        let size = uniform_in(rng, config.gold_size);
        spawn(rng, position, Rgb::GOLD, size, FlickerClass::Twinkle, ParticleKind::Gold)
    } else if sparkle < config.light_gold_chance {
        let size = uniform_in(rng, config.light_gold_size);
        spawn(rng, position, Rgb::LIGHT_GOLD, size, FlickerClass::Twinkle, ParticleKind::Gold)
    } else if fill < config.core_limit {
        let size = uniform_in(rng, config.core_size);
        spawn(rng, position, config.core_color, size, FlickerClass::Subtle, ParticleKind::Ornament)
    } else if chance(rng, config.highlight_chance) {
        let size = uniform_in(rng, config.highlight_size);
        spawn(rng, position, Rgb::WHITE, size, FlickerClass::Subtle, ParticleKind::Snow)
    } else {
        let size = uniform_in(rng, config.body_size);
        spawn(rng, position, config.body_color, size, FlickerClass::Twinkle, ParticleKind::Ornament)
    }
}
