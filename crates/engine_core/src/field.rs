//! The full particle population for one scene.

use std::cmp::Ordering;

use crate::particle::Particle;

/// Every particle in the scene, split by how it moves.
///
/// The rotating subset (tree, heart, ground) shares one rotation angle; the falling subset
/// (snow) ignores rotation and only drifts vertically.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    pub rotating: Vec<Particle>,
    pub falling: Vec<Particle>,
}

impl ParticleField {
    pub fn new(rotating: Vec<Particle>, falling: Vec<Particle>) -> Self {
        Self { rotating, falling }
    }

    /// Total particle count.
    pub fn len(&self) -> usize {
        self.rotating.len() + self.falling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotating.is_empty() && self.falling.is_empty()
    }

    /// Rotate the rotating subset to `angle`, always from each particle's origin.
    pub fn rotate(&mut self, angle: f32) {
        for p in &mut self.rotating {
            p.rotate_y(angle);
        }
    }

    /// Iterate over all particles in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.rotating.iter().chain(self.falling.iter())
    }

    /// All particles ordered farthest first (z descending), for painter's-algorithm drawing.
    ///
    /// Must be called every frame: z changes continuously with rotation and fall.
    pub fn depth_sorted(&self) -> Vec<&Particle> {
        let mut sorted: Vec<&Particle> = self.iter().collect();
        sort_far_to_near(&mut sorted);
        sorted
    }
}

/// Sort particle references by current z, descending. Ties keep no particular order.
pub fn sort_far_to_near(particles: &mut [&Particle]) {
    particles.sort_unstable_by(|a, b| {
        b.position
            .z
            .partial_cmp(&a.position.z)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlickerClass, ParticleKind, Rgb};
    use glam::Vec3;

    fn at(x: f32, z: f32) -> Particle {
        Particle::new(
            Vec3::new(x, 0.0, z),
            Rgb::WHITE,
            1.0,
            FlickerClass::Twinkle,
            ParticleKind::Foliage,
        )
    }

    #[test]
    fn depth_sorted_is_far_to_near() {
        let field = ParticleField::new(
            vec![at(0.0, -10.0), at(0.0, 300.0), at(0.0, 5.0)],
            vec![at(0.0, 120.0).with_fall_speed(1.0)],
        );
        let zs: Vec<f32> = field.depth_sorted().iter().map(|p| p.position.z).collect();
        assert_eq!(zs, vec![300.0, 120.0, 5.0, -10.0]);
    }

    #[test]
    fn rotate_only_touches_rotating_subset() {
        let mut field = ParticleField::new(
            vec![at(100.0, 0.0)],
            vec![at(100.0, 0.0).with_fall_speed(1.0)],
        );
        field.rotate(std::f32::consts::FRAC_PI_2);
        assert!((field.rotating[0].position.z - 100.0).abs() < 1e-3);
        assert_eq!(field.falling[0].position.z, 0.0);
        assert_eq!(field.len(), 2);
    }
}
