//! Rippled ground disc under the tree.

use std::f32::consts::TAU;

use engine_core::{FlickerClass, Particle, ParticleKind, Rgb};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::{spawn, uniform, uniform_in};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Plane height (positive is down).
    pub y: f32,
    pub max_radius: f32,
    /// Exponent on the radial sample; below 1 densifies the rim.
    pub radial_exponent: f32,
    pub base_color: Rgb,
    /// Distance per radian of the brightness ripple.
    pub ripple_wavelength: f32,
    pub ripple_phase: f32,
    pub ripple_amplitude: f32,
    /// Extra blue added on top of the ripple offset.
    pub blue_bias: i32,
    /// Fraction of the radius beyond which particles grow larger to fill gaps.
    pub rim_fraction: f32,
    pub rim_size: (f32, f32),
    pub size: (f32, f32),
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            y: 240.0,
            max_radius: 1400.0,
            radial_exponent: 0.6,
            base_color: Rgb::new(225, 225, 230),
            ripple_wavelength: 60.0,
            ripple_phase: 2.0,
            ripple_amplitude: 12.0,
            blue_bias: 5,
            rim_fraction: 0.8,
            rim_size: (1.0, 2.0),
            size: (0.5, 1.5),
        }
    }
}

impl GroundConfig {
    /// Brightness offset of the concentric ripple at `dist` from the centre.
    pub fn ripple_offset(&self, dist: f32) -> i32 {
        let wave = (dist / self.ripple_wavelength - self.ripple_phase).sin();
        (wave * self.ripple_amplitude).round() as i32
    }

    /// Ground colour at `dist`, channel-clamped.
    pub fn color_at(&self, dist: f32) -> Rgb {
        let offset = self.ripple_offset(dist);
        self.base_color.offset(offset, offset, offset + self.blue_bias)
    }
}

/// Generate `count` ground particles on a horizontal disc.
pub fn generate_ground<R: Rng + ?Sized>(
    count: usize,
    config: &GroundConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = uniform(rng, 0.0, TAU);
        let dist = rng.gen::<f32>().powf(config.radial_exponent) * config.max_radius;
        let position = Vec3::new(dist * angle.cos(), config.y, dist * angle.sin());

        let size = if dist > config.max_radius * config.rim_fraction {
            uniform_in(rng, config.rim_size)
        } else {
            uniform_in(rng, config.size)
        };
        particles.push(spawn(
            rng,
            position,
            config.color_at(dist),
            size,
            FlickerClass::Twinkle,
            ParticleKind::Ground,
        ));
    }
    log::debug!("Generated ground: {} particles", particles.len());
    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ground_is_flat_and_bounded() {
        let config = GroundConfig::default();
        let mut rng = StdRng::seed_from_u64(21);
        let particles = generate_ground(3000, &config, &mut rng);
        assert_eq!(particles.len(), 3000);
        for p in &particles {
            assert_eq!(p.position.y, 240.0);
            let r = (p.position.x.powi(2) + p.position.z.powi(2)).sqrt();
            assert!(r <= 1400.0 + 1e-2);
        }
    }

    #[test]
    fn same_seed_same_ground() {
        let config = GroundConfig::default();
        let a = generate_ground(500, &config, &mut StdRng::seed_from_u64(9));
        let b = generate_ground(500, &config, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn ripple_amplitude_is_bounded() {
        let config = GroundConfig::default();
        for i in 0..2000 {
            let offset = config.ripple_offset(i as f32 * 0.7);
            assert!((-12..=12).contains(&offset));
        }
    }

    #[test]
    fn ripple_color_clamps_channels() {
        let config = GroundConfig {
            base_color: Rgb::new(250, 5, 250),
            ..GroundConfig::default()
        };
        // sin(dist / 60 - 2) = 1 at dist = 60 * (2 + PI / 2).
        let peak = 60.0 * (2.0 + std::f32::consts::FRAC_PI_2);
        assert_eq!(config.ripple_offset(peak), 12);
        assert_eq!(config.color_at(peak), Rgb::new(255, 17, 255));

        let trough = 60.0 * (2.0 - std::f32::consts::FRAC_PI_2);
        assert_eq!(config.ripple_offset(trough), -12);
        assert_eq!(config.color_at(trough), Rgb::new(238, 0, 243));
    }

    #[test]
    fn rim_particles_are_larger() {
        let config = GroundConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        for p in generate_ground(2000, &config, &mut rng) {
            let r = (p.position.x.powi(2) + p.position.z.powi(2)).sqrt();
            if r > 1400.0 * 0.8 + 1.0 {
                assert!(p.base_size >= 1.0);
            }
        }
    }
}
