//! Pinhole projection of world positions onto the virtual canvas, with depth fog.

use engine_core::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera and fog parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Focal length in canvas pixels.
    pub fov: f32,
    /// Distance from the eye to the world origin along +z.
    pub view_distance: f32,
    /// Points whose depth `view_distance + z` is at or below this are culled.
    pub near_clip: f32,
    /// z at which fog starts.
    pub fog_start: f32,
    /// z at which fog is total.
    pub fog_end: f32,
    /// Horizontal screen anchor as a fraction of canvas width.
    pub center_x_ratio: f32,
    /// Extra downward shift of the vertical anchor below the canvas centre.
    pub vertical_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 500.0,
            view_distance: 650.0,
            near_clip: 20.0,
            fog_start: 50.0,
            fog_end: 700.0,
            center_x_ratio: 0.6,
            vertical_offset: 100.0,
        }
    }
}

/// A point mapped to canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: i32,
    pub y: i32,
    /// Perspective scale applied to sizes.
    pub scale: f32,
    /// Fog amount in `[0, 1]`.
    pub fog: f32,
}

/// Projection bound to one canvas size.
#[derive(Debug, Clone)]
pub struct Projection {
    camera: CameraConfig,
    anchor_x: f32,
    anchor_y: f32,
}

impl Projection {
    pub fn new(camera: CameraConfig, canvas_width: u32, canvas_height: u32) -> Self {
        let anchor_x = (canvas_width as f32 * camera.center_x_ratio).floor();
        let anchor_y = (canvas_height / 2) as f32 + camera.vertical_offset;
        Self {
            camera,
            anchor_x,
            anchor_y,
        }
    }

    pub fn camera(&self) -> &CameraConfig {
        &self.camera
    }

    /// Perspective scale at depth `z`, or `None` when the point is at or behind the near clip.
    pub fn scale(&self, z: f32) -> Option<f32> {
        let depth = self.camera.view_distance + z;
        if depth <= self.camera.near_clip {
            None
        } else {
            Some(self.camera.fov / depth)
        }
    }

    /// Fog amount at depth `z`, clamped to `[0, 1]`.
    pub fn fog_factor(&self, z: f32) -> f32 {
        let span = self.camera.fog_end - self.camera.fog_start;
        if span <= 0.0 {
            return if z >= self.camera.fog_end { 1.0 } else { 0.0 };
        }
        ((z - self.camera.fog_start) / span).clamp(0.0, 1.0)
    }

    /// Blend `color` toward `background` by `fog`.
    pub fn fogged(color: Rgb, background: Rgb, fog: f32) -> Rgb {
        color.lerp(background, fog)
    }

    /// Project a world position. `None` when culled.
    pub fn project(&self, position: Vec3) -> Option<Projected> {
        let scale = self.scale(position.z)?;
        Some(Projected {
            x: (position.x * scale + self.anchor_x).floor() as i32,
            y: (position.y * scale + self.anchor_y).floor() as i32,
            scale,
            fog: self.fog_factor(position.z),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection::new(CameraConfig::default(), 1920, 1080)
    }

    #[test]
    fn origin_maps_to_anchor() {
        let p = projection().project(Vec3::ZERO).unwrap();
        assert_eq!((p.x, p.y), (1152, 640));
        assert!((p.scale - 500.0 / 650.0).abs() < 1e-6);
        assert_eq!(p.fog, 0.0);
    }

    #[test]
    fn perspective_shrinks_with_depth() {
        let proj = projection();
        let near = proj.project(Vec3::new(100.0, 0.0, -150.0)).unwrap();
        let far = proj.project(Vec3::new(100.0, 0.0, 350.0)).unwrap();
        assert_eq!(near.x, 1152 + 100);
        assert_eq!(far.x, 1152 + 50);
        assert!(near.scale > far.scale);
    }

    #[test]
    fn near_clip_culls() {
        let proj = projection();
        assert!(proj.project(Vec3::new(0.0, 0.0, -630.0)).is_none());
        assert!(proj.project(Vec3::new(0.0, 0.0, -640.0)).is_none());
        assert!(proj.project(Vec3::new(0.0, 0.0, -900.0)).is_none());
        assert!(proj.project(Vec3::new(0.0, 0.0, -629.0)).is_some());
    }

    #[test]
    fn close_point_is_magnified_not_culled() {
        let proj = projection();
        assert_eq!(proj.scale(-600.0), Some(10.0));
        assert_eq!(proj.scale(-640.0), None);
        let p = proj.project(Vec3::new(1.0, 0.0, -600.0)).unwrap();
        assert_eq!(p.x, 1152 + 10);
    }

    #[test]
    fn fog_is_clamped() {
        let proj = projection();
        assert_eq!(proj.fog_factor(-300.0), 0.0);
        assert_eq!(proj.fog_factor(50.0), 0.0);
        assert!((proj.fog_factor(375.0) - 0.5).abs() < 1e-6);
        assert_eq!(proj.fog_factor(700.0), 1.0);
        assert_eq!(proj.fog_factor(5000.0), 1.0);
    }

    #[test]
    fn full_fog_reaches_background() {
        let bg = Rgb::new(25, 28, 35);
        assert_eq!(Projection::fogged(Rgb::WHITE, bg, 1.0), bg);
        assert_eq!(Projection::fogged(Rgb::WHITE, bg, 0.0), Rgb::WHITE);
    }

    #[test]
    fn negative_coordinates_floor() {
        let proj = Projection::new(CameraConfig::default(), 10, 10);
        // anchor_x = 6; x * scale = -6.5 gives -0.5, which floors to -1 instead of truncating to 0.
        let scale = 500.0 / 650.0;
        let p = proj.project(Vec3::new(-6.5 / scale, 0.0, 0.0)).unwrap();
        assert_eq!(p.x, -1);
    }
}
