//! Random sampling helpers shared by the generators.
//!
//! Every helper takes the caller's random source so generation stays reproducible under a
//! fixed seed; nothing here touches thread-local or global RNG state.

use engine_core::{FlickerClass, Particle, ParticleKind, Rgb};
use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;

/// Range of the per-particle flicker angular speed (radians per second).
pub const FLICKER_SPEED_RANGE: (f32, f32) = (2.0, 5.0);

/// Uniform sample in `[lo, hi)`. Degenerate or inverted ranges never panic.
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

/// Uniform sample from a `(lo, hi)` pair.
#[inline]
pub fn uniform_in<R: Rng + ?Sized>(rng: &mut R, range: (f32, f32)) -> f32 {
    uniform(rng, range.0, range.1)
}

/// True with probability `p`.
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.gen::<f32>() < p
}

/// Pick one palette entry; an empty palette yields `fallback`.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, palette: &[Rgb], fallback: Rgb) -> Rgb {
    palette.choose(rng).copied().unwrap_or(fallback)
}

/// Build a particle with freshly sampled flicker speed and phase.
pub fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    position: Vec3,
    color: Rgb,
    size: f32,
    flicker: FlickerClass,
    kind: ParticleKind,
) -> Particle {
    let speed = uniform_in(rng, FLICKER_SPEED_RANGE);
    let phase = uniform(rng, 0.0, std::f32::consts::TAU);
    Particle::new(position, color, size, flicker, kind).with_flicker(speed, phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -4.0, 4.0);
            assert!((-4.0..4.0).contains(&v));
        }
    }

    #[test]
    fn degenerate_range_returns_lower_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
    }

    #[test]
    fn empty_palette_uses_fallback() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick(&mut rng, &[], Rgb::GOLD), Rgb::GOLD);
    }

    #[test]
    fn spawn_assigns_bounded_flicker() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let p = spawn(
                &mut rng,
                Vec3::ZERO,
                Rgb::WHITE,
                1.0,
                FlickerClass::Twinkle,
                ParticleKind::Foliage,
            );
            assert!((2.0..5.0).contains(&p.flicker_speed));
            assert!((0.0..std::f32::consts::TAU).contains(&p.flicker_phase));
        }
    }
}
