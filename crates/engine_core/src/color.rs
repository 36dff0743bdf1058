//! Fixed-layout RGB color with clamped arithmetic.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple. Every arithmetic combination clamps into `[0, 255]`.
///
/// Serialized as a plain `(r, g, b)` triple so palettes read naturally in `config.ron`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GOLD: Rgb = Rgb::new(255, 215, 0);
    pub const LIGHT_GOLD: Rgb = Rgb::new(255, 230, 100);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, truncating toward zero.
    pub fn scaled(self, factor: f32) -> Self {
        let ch = |c: u8| clamp_channel(c as f32 * factor);
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Add a signed offset per channel.
    pub fn offset(self, dr: i32, dg: i32, db: i32) -> Self {
        let ch = |c: u8, d: i32| (c as i32 + d).clamp(0, 255) as u8;
        Self::new(ch(self.r, dr), ch(self.g, dg), ch(self.b, db))
    }

    /// Linear blend toward `other`; `t = 0` keeps `self`, `t = 1` yields `other`.
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| clamp_channel(a as f32 * (1.0 - t) + b as f32 * t);
        Self::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }

    /// Additive blend of `other` weighted by `alpha` in `[0, 1]`, saturating at white.
    pub fn add_weighted(self, other: Rgb, alpha: f32) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| clamp_channel(a as f32 + b as f32 * alpha);
        Self::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }

    /// Perceived brightness (Rec. 601 luma), 0..255.
    pub fn luminance(self) -> f32 {
        self.r as f32 * 0.299 + self.g as f32 * 0.587 + self.b as f32 * 0.114
    }

    /// Multiply channel-wise by another color, as a tint.
    pub fn modulate(self, tint: Rgb) -> Self {
        let ch = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Self::new(ch(self.r, tint.r), ch(self.g, tint.g), ch(self.b, tint.b))
    }

    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

#[inline]
fn clamp_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}
