//! Layered particle tree: a spiralling, branch-accented cone with a snow crust.
//!
//! Particles are stacked from the base (`h = 0`) to the apex (`h = 1`). Each height band
//! bulges and pinches with a layering wave, and the radial scatter exponent decides how
//! densely the interior fills compared to the surface. Colour is zoned from a dark core to
//! a snowy, gold-speckled exterior. A second pass lays extra white particles on the outer
//! envelope to read as accumulated snow.

use std::f32::consts::{PI, TAU};

use engine_core::{FlickerClass, Particle, ParticleKind, Rgb};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::{chance, pick, spawn, uniform, uniform_in};

/// Shape, colour and size configuration for the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Total height in world units.
    pub height: f32,
    /// Fraction of the height placed below y = 0.
    pub base_offset: f32,
    /// Cone radius at the base.
    pub max_base_radius: f32,
    /// Number of bulge/pinch bands along the height.
    pub layers: u32,
    /// Exponent on the index fraction; below 1 packs more particles near the base.
    pub height_exponent: f32,
    /// Half-range of the vertical jitter.
    pub height_jitter: f32,
    /// Exponent on the radial scatter; below 1 biases particles toward the surface.
    pub scatter_exponent: f32,
    /// Regular turbulence multiplier range.
    pub turbulence: (f32, f32),
    /// Probability of replacing the turbulence with the spike value.
    pub spike_chance: f32,
    /// Outlier turbulence multiplier.
    pub spike_turbulence: f32,
    /// Height fraction below which the narrow apex cone applies.
    pub apex_fraction: f32,
    /// Apex cone radius at `h = 0`.
    pub apex_radius: f32,
    /// Half-turns of helical twist from base to apex.
    pub spiral_twist: f32,
    pub branches: BranchConfig,
    pub zones: ZoneConfig,
    pub sizes: TreeSizes,
    pub palette: TreePalette,
    pub crust: CrustConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 700.0,
            base_offset: 0.58,
            max_base_radius: 260.0,
            layers: 9,
            height_exponent: 0.75,
            height_jitter: 4.0,
            scatter_exponent: 0.15,
            turbulence: (0.9, 1.35),
            spike_chance: 0.08,
            spike_turbulence: 1.6,
            apex_fraction: 0.06,
            apex_radius: 8.0,
            spiral_twist: 12.0,
            branches: BranchConfig::default(),
            zones: ZoneConfig::default(),
            sizes: TreeSizes::default(),
            palette: TreePalette::default(),
            crust: CrustConfig::default(),
        }
    }
}

/// Radial extensions near evenly spaced branch directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Number of angular sectors per turn.
    pub count: u32,
    /// Angular distance (radians) from a sector centre that still counts as a branch.
    pub tolerance: f32,
    /// Maximum outward extension at full strength.
    pub reach: f32,
    /// Extension shrink toward the apex: `1 - h * taper`.
    pub taper: f32,
    /// Probability that a branch particle also gets vertical jitter.
    pub lift_chance: f32,
    /// Half-range of that vertical jitter at full strength.
    pub lift: f32,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            count: 8,
            tolerance: 0.4,
            reach: 25.0,
            taper: 0.3,
            lift_chance: 0.3,
            lift: 8.0,
        }
    }
}

/// Colour zoning thresholds (on the radial scatter) and speckle probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub inner_limit: f32,
    pub innermost_limit: f32,
    pub innermost_darken: f32,
    pub inner_dim_limit: f32,
    pub inner_dim: f32,
    pub mid_limit: f32,
    pub outer_glow_limit: f32,
    pub outer_brighten: f32,
    pub inner_gold_chance: f32,
    pub inner_snow_chance: f32,
    pub mid_gold_chance: f32,
    /// Share of mid-zone gold speckles that use full gold instead of light gold.
    pub mid_bright_gold_share: f32,
    pub mid_snow_chance: f32,
    pub outer_snow_chance: f32,
    pub outer_gold_chance: f32,
    /// Share of spiked particles recoloured as snow; the rest become gold.
    pub spike_snow_share: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            inner_limit: 0.45,
            innermost_limit: 0.25,
            innermost_darken: 0.75,
            inner_dim_limit: 0.35,
            inner_dim: 0.85,
            mid_limit: 0.72,
            outer_glow_limit: 0.88,
            outer_brighten: 1.12,
            inner_gold_chance: 0.015,
            inner_snow_chance: 0.03,
            mid_gold_chance: 0.03,
            mid_bright_gold_share: 0.6,
            mid_snow_chance: 0.06,
            outer_snow_chance: 0.58,
            outer_gold_chance: 0.04,
            spike_snow_share: 0.88,
        }
    }
}

/// Base size ranges per particle class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSizes {
    pub apex_snow: (f32, f32),
    pub inner_snow: (f32, f32),
    pub mid_snow: (f32, f32),
    pub outer_snow: (f32, f32),
    pub spike_snow: (f32, f32),
    pub gold_large_chance: f32,
    pub gold_large: (f32, f32),
    pub gold: (f32, f32),
    /// Luminance above which a coloured particle may become large.
    pub bright_threshold: f32,
    pub bright_large_chance: f32,
    pub bright_large: (f32, f32),
    pub bright: (f32, f32),
    pub medium_threshold: f32,
    pub medium: (f32, f32),
    pub dark: (f32, f32),
}

impl Default for TreeSizes {
    fn default() -> Self {
        Self {
            apex_snow: (0.5, 1.2),
            inner_snow: (0.5, 1.0),
            mid_snow: (0.5, 1.2),
            outer_snow: (0.4, 1.0),
            spike_snow: (0.5, 1.1),
            gold_large_chance: 0.3,
            gold_large: (2.8, 4.2),
            gold: (1.8, 3.0),
            bright_threshold: 180.0,
            bright_large_chance: 0.2,
            bright_large: (2.5, 4.0),
            bright: (1.2, 2.5),
            medium_threshold: 120.0,
            medium: (0.8, 2.2),
            dark: (0.6, 1.8),
        }
    }
}

/// Interior-to-exterior colour palettes (deep plum → rose → soft pink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreePalette {
    pub inner: Vec<Rgb>,
    pub mid: Vec<Rgb>,
    pub outer: Vec<Rgb>,
}

impl Default for TreePalette {
    fn default() -> Self {
        Self {
            inner: vec![
                Rgb::new(115, 50, 95),
                Rgb::new(125, 45, 105),
                Rgb::new(135, 60, 100),
                Rgb::new(105, 40, 85),
                Rgb::new(120, 48, 92),
                Rgb::new(130, 55, 105),
                Rgb::new(95, 45, 110),
                Rgb::new(105, 50, 120),
                Rgb::new(85, 40, 100),
                Rgb::new(100, 45, 105),
                Rgb::new(110, 55, 115),
            ],
            mid: vec![
                Rgb::new(160, 75, 125),
                Rgb::new(170, 85, 135),
                Rgb::new(155, 70, 120),
                Rgb::new(180, 80, 140),
                Rgb::new(190, 95, 145),
                Rgb::new(140, 70, 135),
                Rgb::new(150, 75, 145),
                Rgb::new(135, 65, 140),
                Rgb::new(145, 70, 150),
                Rgb::new(155, 80, 155),
            ],
            outer: vec![
                Rgb::new(200, 110, 155),
                Rgb::new(210, 120, 165),
                Rgb::new(220, 130, 170),
                Rgb::new(235, 150, 180),
                Rgb::new(245, 170, 195),
            ],
        }
    }
}

/// Extra white layer on the outer envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrustConfig {
    /// Crust particles per body particle (floored).
    pub fraction: f32,
    /// Exponent on a uniform height sample; below 1 favours the upper tree.
    pub height_exponent: f32,
    pub height_jitter: f32,
    /// Radial position as a multiple of the local layer radius.
    pub shell: (f32, f32),
    /// Apex radius range; the upper bound shrinks with height.
    pub apex_radius: (f32, f32),
    pub branch_reach: f32,
    pub lift_chance: f32,
    pub lift: f32,
    pub size: (f32, f32),
}

impl Default for CrustConfig {
    fn default() -> Self {
        Self {
            fraction: 0.4,
            height_exponent: 0.25,
            height_jitter: 6.0,
            shell: (0.95, 1.15),
            apex_radius: (7.0, 12.0),
            branch_reach: 30.0,
            lift_chance: 0.4,
            lift: 10.0,
            size: (0.8, 2.0),
        }
    }
}

/// How a zoned particle should be sized and classed.
#[derive(Debug, Clone, Copy)]
enum Accent {
    Plain,
    Snow((f32, f32)),
    Gold,
}

impl TreeConfig {
    /// Number of crust particles added for `count` body particles.
    pub fn crust_count(&self, count: usize) -> usize {
        (count as f64 * self.crust.fraction.max(0.0) as f64).floor() as usize
    }

    /// Y coordinate of the tree at height fraction `h`, before jitter.
    fn height_at(&self, h: f32) -> f32 {
        -self.height * self.base_offset + h * self.height
    }

    /// Envelope radius of the band at height fraction `h`.
    pub fn layer_radius(&self, h: f32) -> f32 {
        let cone = self.max_base_radius * h;
        let wave = (h * PI * self.layers as f32).sin().abs();
        cone * (0.35 + 0.65 * wave)
    }

    /// Angle with helical twist applied.
    fn sweep_angle<R: Rng + ?Sized>(&self, h: f32, rng: &mut R) -> f32 {
        uniform(rng, 0.0, TAU) + h * PI * self.spiral_twist
    }

    /// Radial and vertical push for particles lying near a branch direction.
    fn branch_push<R: Rng + ?Sized>(
        &self,
        theta: f32,
        h: f32,
        reach: f32,
        lift_chance: f32,
        lift: f32,
        rng: &mut R,
    ) -> (f32, f32) {
        let b = &self.branches;
        if b.count == 0 || b.tolerance <= 0.0 {
            return (0.0, 0.0);
        }
        let sector = TAU / b.count as f32;
        let proximity = (theta.rem_euclid(sector) - PI / b.count as f32).abs();
        if proximity >= b.tolerance {
            return (0.0, 0.0);
        }
        let strength = 1.0 - proximity / b.tolerance;
        let dr = strength * uniform(rng, 0.0, reach) * (1.0 - h * b.taper);
        let dy = if chance(rng, lift_chance) {
            uniform(rng, -lift, lift) * strength
        } else {
            0.0
        };
        (dr, dy)
    }

    fn zone_color<R: Rng + ?Sized>(&self, r_scatter: f32, rng: &mut R) -> (Rgb, Accent) {
        let z = &self.zones;
        let s = &self.sizes;
        if r_scatter < z.inner_limit {
            let mut color = pick(rng, &self.palette.inner, Rgb::BLACK);
            if r_scatter < z.innermost_limit {
                color = color.scaled(z.innermost_darken);
            } else if r_scatter < z.inner_dim_limit {
                color = color.scaled(z.inner_dim);
            }
            if chance(rng, z.inner_gold_chance) {
                (Rgb::LIGHT_GOLD, Accent::Gold)
            } else if chance(rng, z.inner_snow_chance) {
                (Rgb::WHITE, Accent::Snow(s.inner_snow))
            } else {
                (color, Accent::Plain)
            }
        } else if r_scatter < z.mid_limit {
            let color = pick(rng, &self.palette.mid, Rgb::BLACK);
            if chance(rng, z.mid_gold_chance) {
                let gold = if chance(rng, z.mid_bright_gold_share) {
                    Rgb::GOLD
                } else {
                    Rgb::LIGHT_GOLD
                };
                (gold, Accent::Gold)
            } else if chance(rng, z.mid_snow_chance) {
                (Rgb::WHITE, Accent::Snow(s.mid_snow))
            } else {
                (color, Accent::Plain)
            }
        } else if chance(rng, z.outer_snow_chance) {
            (Rgb::WHITE, Accent::Snow(s.outer_snow))
        } else if chance(rng, z.outer_gold_chance) {
            (Rgb::GOLD, Accent::Gold)
        } else {
            let mut color = pick(rng, &self.palette.outer, Rgb::WHITE);
            if r_scatter > z.outer_glow_limit {
                color = color.scaled(z.outer_brighten);
            }
            (color, Accent::Plain)
        }
    }

    fn gold_size<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let s = &self.sizes;
        if chance(rng, s.gold_large_chance) {
            uniform_in(rng, s.gold_large)
        } else {
            uniform_in(rng, s.gold)
        }
    }

    /// Brighter colours get a chance at a larger size class.
    fn luminance_size<R: Rng + ?Sized>(&self, color: Rgb, rng: &mut R) -> f32 {
        let s = &self.sizes;
        let luma = color.luminance();
        if luma > s.bright_threshold {
            if chance(rng, s.bright_large_chance) {
                uniform_in(rng, s.bright_large)
            } else {
                uniform_in(rng, s.bright)
            }
        } else if luma > s.medium_threshold {
            uniform_in(rng, s.medium)
        } else {
            uniform_in(rng, s.dark)
        }
    }
}

/// Generate `count` tree body particles followed by the snow crust.
///
/// Returns `count + config.crust_count(count)` particles. Deterministic for a seeded `rng`.
pub fn generate_tree<R: Rng + ?Sized>(
    count: usize,
    config: &TreeConfig,
    rng: &mut R,
) -> Vec<Particle> {
    let crust_count = config.crust_count(count);
    let mut particles = Vec::with_capacity(count + crust_count);

    for i in 0..count {
        particles.push(body_particle(i, count, config, rng));
    }
    for _ in 0..crust_count {
        particles.push(crust_particle(config, rng));
    }

    log::debug!(
        "Generated tree: {} body + {} crust particles",
        count,
        crust_count
    );
    particles
}

fn body_particle<R: Rng + ?Sized>(
    index: usize,
    count: usize,
    config: &TreeConfig,
    rng: &mut R,
) -> Particle {
    let h = (index as f32 / count as f32).powf(config.height_exponent);
    let mut y = config.height_at(h) + uniform(rng, -config.height_jitter, config.height_jitter);

    let layer_r = config.layer_radius(h);
    let r_scatter = rng.gen::<f32>().powf(config.scatter_exponent);
    let mut turbulence = uniform_in(rng, config.turbulence);
    let spiked = chance(rng, config.spike_chance);
    if spiked {
        turbulence = config.spike_turbulence;
    }
    let mut r = layer_r * r_scatter * turbulence;

    let apex = h < config.apex_fraction;
    if apex {
        r = uniform(rng, 0.0, config.apex_radius * (1.0 - h));
    }

    let theta = config.sweep_angle(h, rng);
    let b = &config.branches;
    let (dr, dy) = config.branch_push(theta, h, b.reach, b.lift_chance, b.lift, rng);
    r += dr;
    y += dy;

    let position = Vec3::new(r * theta.cos(), y, r * theta.sin());

    let (color, accent) = if apex {
        (Rgb::WHITE, Accent::Snow(config.sizes.apex_snow))
    } else if spiked {
        // Sparse long-reaching outliers read as snow-tipped or gilded branch ends.
        if chance(rng, config.zones.spike_snow_share) {
            (Rgb::WHITE, Accent::Snow(config.sizes.spike_snow))
        } else {
            (Rgb::GOLD, Accent::Gold)
        }
    } else {
        config.zone_color(r_scatter, rng)
    };

    match accent {
        Accent::Snow(range) => {
            let size = uniform_in(rng, range);
            spawn(rng, position, color, size, FlickerClass::Subtle, ParticleKind::Snow)
        }
        Accent::Gold => {
            let size = config.gold_size(rng);
            spawn(rng, position, color, size, FlickerClass::Twinkle, ParticleKind::Gold)
        }
        Accent::Plain => {
            let size = config.luminance_size(color, rng);
            spawn(rng, position, color, size, FlickerClass::Twinkle, ParticleKind::Foliage)
        }
    }
}

fn crust_particle<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Particle {
    let crust = &config.crust;
    let h = rng.gen::<f32>().powf(crust.height_exponent);
    let mut y = config.height_at(h) + uniform(rng, -crust.height_jitter, crust.height_jitter);

    let mut r = config.layer_radius(h) * uniform_in(rng, crust.shell);
    if h < config.apex_fraction {
        r = uniform(rng, crust.apex_radius.0, crust.apex_radius.1 * (1.0 - h));
    }

    let theta = config.sweep_angle(h, rng);
    let (dr, dy) = config.branch_push(theta, h, crust.branch_reach, crust.lift_chance, crust.lift, rng);
    r += dr;
    y += dy;

    let position = Vec3::new(r * theta.cos(), y, r * theta.sin());
    let size = uniform_in(rng, crust.size);
    spawn(rng, position, Rgb::WHITE, size, FlickerClass::Subtle, ParticleKind::Snow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::ParticleField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tree(count: usize, seed: u64) -> Vec<Particle> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_tree(count, &TreeConfig::default(), &mut rng)
    }

    #[test]
    fn tree_count_includes_crust() {
        assert_eq!(tree(100, 1).len(), 140);
        assert_eq!(tree(7, 1).len(), 9);
        assert_eq!(tree(1, 1).len(), 1);
        assert!(tree(0, 1).is_empty());
    }

    #[test]
    fn tree_deterministic_same_seed() {
        assert_eq!(tree(500, 4242), tree(500, 4242));
    }

    #[test]
    fn tree_different_seed_differs() {
        assert_ne!(tree(200, 1), tree(200, 2));
    }

    #[test]
    fn apex_is_white_snow() {
        let particles = tree(1000, 9);
        // (i / 1000)^0.75 < 0.06 holds for i < 23.
        for p in &particles[..20] {
            assert_eq!(p.color, Rgb::WHITE);
            assert_eq!(p.kind, ParticleKind::Snow);
            assert_eq!(p.flicker, FlickerClass::Subtle);
            let r = (p.position.x.powi(2) + p.position.z.powi(2)).sqrt();
            assert!(r <= 8.0 + 25.0 + 1e-3, "apex radius {}", r);
        }
    }

    #[test]
    fn crust_is_white_and_subtle() {
        let particles = tree(300, 5);
        for p in &particles[300..] {
            assert_eq!(p.color, Rgb::WHITE);
            assert_eq!(p.flicker, FlickerClass::Subtle);
            assert!((0.8..2.0).contains(&p.base_size));
        }
    }

    #[test]
    fn body_stays_inside_envelope() {
        let config = TreeConfig::default();
        let max_r = config.max_base_radius * config.spike_turbulence + config.branches.reach;
        let bottom = -config.height * config.base_offset
            - config.height_jitter
            - config.branches.lift;
        let top = bottom + config.height + 2.0 * (config.height_jitter + config.branches.lift);
        for p in &tree(2000, 77)[..2000] {
            let r = (p.position.x.powi(2) + p.position.z.powi(2)).sqrt();
            assert!(r <= max_r + 1e-2, "radius {} beyond {}", r, max_r);
            assert!(p.position.y >= bottom - 1e-2 && p.position.y <= top + 1e-2);
            assert_eq!(p.fall_speed, 0.0);
        }
    }

    #[test]
    fn gold_particles_are_large() {
        let particles = tree(5000, 3);
        let golds: Vec<_> = particles.iter().filter(|p| p.kind == ParticleKind::Gold).collect();
        assert!(!golds.is_empty());
        for p in golds {
            assert!(p.base_size >= 1.8 && p.base_size < 4.2);
        }
    }

    #[test]
    fn depth_sort_puts_farthest_first() {
        let mut field = ParticleField::new(tree(100, 2024), Vec::new());
        field.rotate(0.7);
        let sorted = field.depth_sorted();
        let first = sorted[0].position.z;
        assert!(sorted.iter().all(|p| first >= p.position.z));
    }

    #[test]
    fn layer_radius_pinches_between_bands() {
        let config = TreeConfig::default();
        // sin(h * PI * 9) vanishes at h = 1/9: profile collapses to 0.35 of the cone.
        let h = 1.0 / 9.0;
        let expected = config.max_base_radius * h * 0.35;
        assert!((config.layer_radius(h) - expected).abs() < 1e-2);
        assert_eq!(config.layer_radius(0.0), 0.0);
    }
}
