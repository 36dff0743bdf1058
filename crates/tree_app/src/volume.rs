//! On-canvas volume slider with a mute button.
//!
//! The widget owns the volume state only. The frame loop drains [`VolumeControl::take_volume_change`]
//! and forwards the effective volume to the music player.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::path::Path;

use engine_core::{Rgb, Vec2};
use image::imageops::FilterType;
use renderer::Canvas;

const COLOR_ACTIVE: Rgb = Rgb::new(235, 235, 235);
const COLOR_INACTIVE: Rgb = Rgb::new(110, 115, 125);
const COLOR_BG: Rgb = Rgb::new(15, 18, 25);
const COLOR_BORDER: Rgb = Rgb::new(205, 205, 205);
const MUTED_KNOB: Rgb = Rgb::new(180, 180, 180);

/// Volumes at or below this count as silence.
const SILENCE: f32 = 0.001;

/// Which speaker glyph to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconState {
    Muted,
    Low,
    Medium,
    High,
}

impl IconState {
    pub const ALL: [IconState; 4] = [IconState::Muted, IconState::Low, IconState::Medium, IconState::High];

    fn file_name(self) -> &'static str {
        match self {
            IconState::Muted => "volume-x.png",
            IconState::Low => "volume.png",
            IconState::Medium => "volume-1.png",
            IconState::High => "volume-2.png",
        }
    }

    /// Number of sound waves drawn by the fallback glyph.
    fn waves(self) -> u32 {
        match self {
            IconState::Muted => 0,
            IconState::Low => 1,
            IconState::Medium => 2,
            IconState::High => 3,
        }
    }
}

/// Square RGBA icon.
#[derive(Debug, Clone)]
pub struct Icon {
    pub size: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Icon {
    /// Load a PNG and resample it to `size`×`size`.
    pub fn load(path: &Path, size: u32) -> Result<Self, image::ImageError> {
        let img = image::open(path)?
            .resize_exact(size, size, FilterType::Triangle)
            .into_rgba8();
        Ok(Self {
            size,
            pixels: img.pixels().map(|p| p.0).collect(),
        })
    }
}

/// Icons for each state; any that failed to load are drawn as vectors instead.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<IconState, Icon>,
}

impl IconSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(dir: &Path, size: u32) -> Self {
        let mut icons = HashMap::new();
        for state in IconState::ALL {
            let path = dir.join(state.file_name());
            match Icon::load(&path, size) {
                Ok(icon) => {
                    icons.insert(state, icon);
                }
                Err(e) => log::warn!("Could not load icon {}: {}", path.display(), e),
            }
        }
        log::debug!("Loaded {} of {} volume icons", icons.len(), IconState::ALL.len());
        Self { icons }
    }

    /// Icon for `state`, falling back to the low-volume one.
    pub fn get(&self, state: IconState) -> Option<&Icon> {
        self.icons.get(&state).or_else(|| self.icons.get(&IconState::Low))
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Horizontal volume slider anchored at its top-left corner, with a mute icon to its left.
#[derive(Debug, Clone)]
pub struct VolumeControl {
    x: i32,
    y: i32,
    width: i32,
    height: i32,

    volume: f32,
    muted: bool,
    pre_mute_volume: f32,

    slider_y: i32,
    slider_height: i32,
    knob_radius: i32,
    track_left_padding: i32,
    track_width: i32,

    dragging: bool,
    hovering: bool,

    icon_size: i32,
    icon_x: i32,
    icon_y: i32,
    icons: IconSet,

    changed: Option<f32>,
}

impl VolumeControl {
    pub const DEFAULT_WIDTH: i32 = 150;
    pub const DEFAULT_HEIGHT: i32 = 40;
    pub const ICON_SIZE: u32 = 20;

    pub fn new(x: i32, y: i32, width: i32, height: i32, volume: f32, icons: IconSet) -> Self {
        let track_left_padding = 10;
        let track_right_padding = 18;
        let icon_size = Self::ICON_SIZE as i32;
        let volume = volume.clamp(0.0, 1.0);
        Self {
            x,
            y,
            width,
            height,
            volume,
            muted: false,
            pre_mute_volume: volume,
            slider_y: y + height / 2,
            slider_height: 4,
            knob_radius: 8,
            track_left_padding,
            track_width: (width - track_left_padding - track_right_padding).max(10),
            dragging: false,
            hovering: false,
            icon_size,
            icon_x: x - icon_size - 10,
            icon_y: y + (height - icon_size) / 2,
            icons,
            changed: None,
        }
    }

    /// Default-sized widget in the top-right corner of a canvas `canvas_width` wide.
    pub fn top_right(canvas_width: u32, volume: f32, icons: IconSet) -> Self {
        Self::new(
            canvas_width as i32 - 180,
            20,
            Self::DEFAULT_WIDTH,
            Self::DEFAULT_HEIGHT,
            volume,
            icons,
        )
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Volume to play at: zero while muted.
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// The effective volume if it changed since the last call.
    pub fn take_volume_change(&mut self) -> Option<f32> {
        self.changed.take()
    }

    pub fn icon_state(&self) -> IconState {
        if self.muted {
            IconState::Muted
        } else if self.volume < 0.35 {
            IconState::Low
        } else if self.volume < 0.75 {
            IconState::Medium
        } else {
            IconState::High
        }
    }

    fn track_start(&self) -> i32 {
        self.x + self.track_left_padding
    }

    fn knob_x(&self) -> i32 {
        (self.track_start() as f32 + self.volume * self.track_width as f32) as i32
    }

    fn on_knob(&self, px: i32, py: i32) -> bool {
        let dx = (px - self.knob_x()) as f32;
        let dy = (py - self.slider_y) as f32;
        (dx * dx + dy * dy).sqrt() <= (self.knob_radius + 5) as f32
    }

    fn on_icon(&self, px: i32, py: i32) -> bool {
        (self.icon_x..=self.icon_x + self.icon_size).contains(&px)
            && (self.icon_y..=self.icon_y + self.icon_size).contains(&py)
    }

    fn on_track(&self, px: i32, py: i32) -> bool {
        let start = self.track_start();
        (start..=start + self.track_width).contains(&px) && (py - self.slider_y).abs() <= 10
    }

    /// Handle a press at canvas position `pos`. Returns whether the widget consumed it.
    pub fn handle_mouse_down(&mut self, pos: Vec2) -> bool {
        let (px, py) = (pos.x as i32, pos.y as i32);
        if self.on_icon(px, py) {
            self.toggle_mute();
            return true;
        }
        if self.on_knob(px, py) || self.on_track(px, py) {
            self.dragging = true;
            self.set_from_pointer(px);
            return true;
        }
        false
    }

    pub fn handle_mouse_up(&mut self) {
        self.dragging = false;
    }

    pub fn handle_mouse_motion(&mut self, pos: Vec2) {
        let (px, py) = (pos.x as i32, pos.y as i32);
        self.hovering = self.on_knob(px, py) || self.on_icon(px, py);
        if self.dragging {
            self.set_from_pointer(px);
        }
    }

    fn set_from_pointer(&mut self, px: i32) {
        let start = self.track_start();
        let clamped = px.clamp(start, start + self.track_width);
        let volume = ((clamped - start) as f32 / self.track_width as f32).clamp(0.0, 1.0);
        let previous = self.volume;
        if volume <= SILENCE {
            self.volume = 0.0;
            if previous > 0.0 {
                self.pre_mute_volume = previous;
            }
            self.muted = true;
        } else {
            self.volume = volume;
            self.muted = false;
            self.pre_mute_volume = volume;
        }
        self.changed = Some(self.effective_volume());
    }

    /// Mute, or unmute back to the remembered volume (half volume if that was silence).
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.volume = if self.pre_mute_volume > 0.0 {
                self.pre_mute_volume
            } else {
                0.5
            };
        } else {
            self.muted = true;
            self.pre_mute_volume = self.volume;
        }
        log::debug!("Volume {} at {:.2}", if self.muted { "muted" } else { "unmuted" }, self.volume);
        self.changed = Some(self.effective_volume());
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let container_x = self.icon_x - 15;
        let container_w = self.width + self.icon_size + 30;
        canvas.blend_rect(container_x, self.y, container_w, self.height, COLOR_BG, alpha(100));
        outline(canvas, container_x, self.y, container_w, self.height, COLOR_BORDER, alpha(110));

        self.draw_icon(canvas);
        self.draw_track(canvas);
        self.draw_knob(canvas);
    }

    fn draw_track(&self, canvas: &mut Canvas) {
        let start = self.track_start();
        let top = self.slider_y - self.slider_height / 2;
        canvas.blend_rect(start, top, self.track_width, self.slider_height, Rgb::WHITE, alpha(25));
        outline(canvas, start, top, self.track_width, self.slider_height, COLOR_BORDER, alpha(120));
        if !self.muted && self.volume > 0.0 {
            let filled = ((self.track_width as f32 * self.volume) as i32).max(2);
            canvas.blend_rect(start, top, filled, self.slider_height, Rgb::WHITE, alpha(70));
        }
    }

    fn draw_knob(&self, canvas: &mut Canvas) {
        let (cx, cy, r) = (self.knob_x(), self.slider_y, self.knob_radius);
        let active = self.hovering || self.dragging;
        let glow = if active || !self.muted { 70 } else { 35 };
        canvas.blend_circle(cx, cy, r + 4, Rgb::WHITE, alpha(glow));

        let (fill, fill_alpha) = if self.muted { (MUTED_KNOB, 40) } else { (Rgb::WHITE, 85) };
        canvas.blend_circle(cx, cy, r, fill, alpha(fill_alpha));

        let (border, border_alpha) = if self.muted {
            (COLOR_INACTIVE, 120)
        } else if active {
            (Rgb::WHITE, 140)
        } else {
            (COLOR_BORDER, 140)
        };
        canvas.blend_arc(cx, cy, r as f32 - 1.0, 2.0, -PI, PI, border, alpha(border_alpha));
    }

    fn draw_icon(&self, canvas: &mut Canvas) {
        let tint = if self.muted { COLOR_INACTIVE } else { COLOR_ACTIVE };
        let mut opacity = if self.muted { 110 } else { 200 };
        if self.hovering || self.dragging {
            opacity = (opacity + 40).min(255);
        }
        let state = self.icon_state();
        match self.icons.get(state) {
            Some(icon) => {
                canvas.blend_image(self.icon_x, self.icon_y, icon.size, &icon.pixels, Some(tint), alpha(opacity))
            }
            None => draw_speaker(canvas, self.icon_x, self.icon_y, self.icon_size, state, tint, alpha(opacity)),
        }
    }
}

fn alpha(a: u32) -> f32 {
    a as f32 / 255.0
}

/// One-pixel rectangle border.
fn outline(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: Rgb, a: f32) {
    canvas.blend_rect(x, y, w, 1, color, a);
    canvas.blend_rect(x, y + h - 1, w, 1, color, a);
    canvas.blend_rect(x, y + 1, 1, h - 2, color, a);
    canvas.blend_rect(x + w - 1, y + 1, 1, h - 2, color, a);
}

/// Vector speaker glyph in a `size`×`size` box, used when no icon image is available.
fn draw_speaker(canvas: &mut Canvas, x: i32, y: i32, size: i32, state: IconState, color: Rgb, a: f32) {
    let s = size as f32;
    let (fx, fy) = (x as f32, y as f32);
    let mid = fy + s * 0.5;

    // Magnet and cone.
    canvas.blend_rect(x + size / 10, y + size * 7 / 20, size / 5, size * 3 / 10, color, a);
    let cone_back = fx + s * 0.3;
    let cone_front = fx + s * 0.5;
    for i in 0..=(s * 0.3) as i32 {
        let t = i as f32 / (s * 0.3);
        let half = s * (0.15 + 0.2 * t);
        let cx = cone_back + (cone_front - cone_back) * t;
        canvas.blend_line((cx, mid - half), (cx, mid + half), 1, color, a);
    }

    if state == IconState::Muted {
        let (l, r) = (fx + s * 0.62, fx + s * 0.92);
        canvas.blend_line((l, mid - s * 0.15), (r, mid + s * 0.15), 2, color, a);
        canvas.blend_line((l, mid + s * 0.15), (r, mid - s * 0.15), 2, color, a);
        return;
    }
    let hub_x = (fx + s * 0.5) as i32;
    for wave in 0..state.waves() {
        let radius = s * (0.2 + 0.15 * wave as f32);
        canvas.blend_arc(hub_x, mid as i32, radius, 1.5, -PI / 4.0, PI / 4.0, color, a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Track runs x = 1750..=1872 at slider y = 40 on a 1920 canvas.
    fn widget() -> VolumeControl {
        VolumeControl::top_right(1920, 0.5, IconSet::empty())
    }

    fn at(x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32, y as f32)
    }

    #[test]
    fn geometry_matches_layout() {
        let v = widget();
        assert_eq!(v.track_width, 122);
        assert_eq!(v.slider_y, 40);
        assert_eq!((v.icon_x, v.icon_y), (1710, 30));
        assert_eq!(v.knob_x(), 1750 + 61);
    }

    #[test]
    fn press_on_track_starts_drag_and_sets_volume() {
        let mut v = widget();
        assert!(v.handle_mouse_down(at(1750 + 122, 45)));
        assert!(v.is_dragging());
        assert_eq!(v.volume(), 1.0);
        assert_eq!(v.take_volume_change(), Some(1.0));
        assert_eq!(v.take_volume_change(), None);

        v.handle_mouse_motion(at(2500, 0));
        assert_eq!(v.volume(), 1.0);
        v.handle_mouse_motion(at(1750 + 61, 0));
        assert!((v.volume() - 0.5).abs() < 1e-6);
        v.handle_mouse_up();
        v.handle_mouse_motion(at(1750, 40));
        assert!((v.volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn press_elsewhere_is_not_consumed() {
        let mut v = widget();
        assert!(!v.handle_mouse_down(at(900, 500)));
        assert!(!v.handle_mouse_down(at(1760, 40 + 11)));
        assert!(!v.is_dragging());
        assert_eq!(v.take_volume_change(), None);
    }

    #[test]
    fn dragging_to_zero_mutes_and_remembers() {
        let mut v = widget();
        v.handle_mouse_down(at(1811, 40));
        v.handle_mouse_motion(at(1600, 40));
        assert!(v.is_muted());
        assert_eq!(v.volume(), 0.0);
        assert_eq!(v.effective_volume(), 0.0);
        assert_eq!(v.icon_state(), IconState::Muted);

        v.handle_mouse_up();
        v.toggle_mute();
        assert!(!v.is_muted());
        assert!((v.volume() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn icon_toggles_mute() {
        let mut v = widget();
        assert!(v.handle_mouse_down(at(1715, 35)));
        assert!(v.is_muted());
        assert_eq!(v.take_volume_change(), Some(0.0));
        assert!(v.handle_mouse_down(at(1715, 35)));
        assert!(!v.is_muted());
        assert_eq!(v.take_volume_change(), Some(0.5));
    }

    #[test]
    fn unmute_from_silence_uses_half_volume() {
        let mut v = VolumeControl::top_right(1920, 0.0, IconSet::empty());
        v.toggle_mute();
        v.toggle_mute();
        assert_eq!(v.volume(), 0.5);
    }

    #[test]
    fn icon_state_thresholds() {
        let mut v = VolumeControl::top_right(1920, 0.2, IconSet::empty());
        assert_eq!(v.icon_state(), IconState::Low);
        v = VolumeControl::top_right(1920, 0.35, IconSet::empty());
        assert_eq!(v.icon_state(), IconState::Medium);
        v = VolumeControl::top_right(1920, 0.75, IconSet::empty());
        assert_eq!(v.icon_state(), IconState::High);
    }

    #[test]
    fn missing_icons_fall_back_to_vectors() {
        let icons = IconSet::load(Path::new("no/such/icon/dir"), VolumeControl::ICON_SIZE);
        assert!(icons.is_empty());
        let v = VolumeControl::top_right(1920, 0.9, icons);
        let mut canvas = Canvas::new(1920, 1080);
        canvas.clear(Rgb::BLACK);
        v.draw(&mut canvas);
        let lit = (v.icon_x..v.icon_x + v.icon_size)
            .flat_map(|x| (v.icon_y..v.icon_y + v.icon_size).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y).is_some_and(|c| c.r > 100))
            .count();
        assert!(lit > 20, "lit {}", lit);
    }
}
