//! CPU-side RGBA render target with clipped drawing primitives.
//!
//! Every primitive silently discards pixels outside the canvas. Coordinates are signed so
//! projected particles far off-screen never need pre-clipping by the caller.

use engine_core::Rgb;

/// Fixed-size RGBA8 pixel buffer, row-major, top-left origin.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the whole canvas with `color`.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.to_rgba(255));
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Color at `(x, y)`, or `None` off-canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| {
            let [r, g, b, _] = self.pixels[i];
            Rgb::new(r, g, b)
        })
    }

    /// Overwrite one pixel. Returns whether it landed on the canvas.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color.to_rgba(255);
                true
            }
            None => false,
        }
    }

    /// Source-over blend of one pixel with opacity `alpha` in `[0, 1]`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if let Some(dst) = self.pixel(x, y) {
            self.set_pixel(x, y, dst.lerp(color, alpha));
        }
    }

    /// Additive blend of one pixel, `color` weighted by `alpha`.
    pub fn add_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if let Some(dst) = self.pixel(x, y) {
            self.set_pixel(x, y, dst.add_weighted(color, alpha));
        }
    }

    /// Visit every on-canvas pixel of the disc `dx² + dy² ≤ r²`.
    fn for_disc(&mut self, cx: i32, cy: i32, radius: i32, mut f: impl FnMut(&mut Self, i32, i32)) {
        if radius < 0 {
            return;
        }
        let r2 = radius * radius;
        let y0 = (cy - radius).max(0);
        let y1 = (cy + radius).min(self.height as i32 - 1);
        for y in y0..=y1 {
            let dy = y - cy;
            let span = r2 - dy * dy;
            if span < 0 {
                continue;
            }
            let half = (span as f32).sqrt() as i32;
            let x0 = (cx - half).max(0);
            let x1 = (cx + half).min(self.width as i32 - 1);
            for x in x0..=x1 {
                f(self, x, y);
            }
        }
    }

    /// Solid disc of integer `radius` centred on `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb) {
        self.for_disc(cx, cy, radius, |c, x, y| {
            c.set_pixel(x, y, color);
        });
    }

    /// Additive disc, used for glow halos.
    pub fn add_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb, alpha: f32) {
        self.for_disc(cx, cy, radius, |c, x, y| c.add_pixel(x, y, color, alpha));
    }

    /// Translucent disc.
    pub fn blend_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb, alpha: f32) {
        self.for_disc(cx, cy, radius, |c, x, y| c.blend_pixel(x, y, color, alpha));
    }

    /// Translucent axis-aligned rectangle.
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        self.blend_rect(x, y, w, h, color, 1.0);
    }

    /// Thick line segment, drawn as a run of discs.
    pub fn blend_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        thickness: i32,
        color: Rgb,
        alpha: f32,
    ) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        let radius = (thickness / 2).max(0);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (from.0 + dx * t).round() as i32;
            let y = (from.1 + dy * t).round() as i32;
            if radius == 0 {
                self.blend_pixel(x, y, color, alpha);
            } else {
                self.blend_circle(x, y, radius, color, alpha);
            }
        }
    }

    /// Ring segment between `start` and `end` radians (screen angles, y down).
    #[allow(clippy::too_many_arguments)]
    pub fn blend_arc(
        &mut self,
        cx: i32,
        cy: i32,
        radius: f32,
        thickness: f32,
        start: f32,
        end: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let outer = radius + thickness * 0.5;
        let inner = (radius - thickness * 0.5).max(0.0);
        let reach = outer.ceil() as i32;
        for y in cy - reach..=cy + reach {
            for x in cx - reach..=cx + reach {
                let (fx, fy) = ((x - cx) as f32, (y - cy) as f32);
                let d = (fx * fx + fy * fy).sqrt();
                if d < inner || d > outer {
                    continue;
                }
                let angle = fy.atan2(fx);
                if angle >= start && angle <= end {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    /// Composite an RGBA image at `(x, y)` using its per-pixel alpha scaled by `opacity`,
    /// optionally tinted.
    pub fn blend_image(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        pixels: &[[u8; 4]],
        tint: Option<Rgb>,
        opacity: f32,
    ) {
        if width == 0 {
            return;
        }
        for (i, px) in pixels.iter().enumerate() {
            let [r, g, b, a] = *px;
            if a == 0 {
                continue;
            }
            let mut color = Rgb::new(r, g, b);
            if let Some(tint) = tint {
                color = color.modulate(tint);
            }
            let ix = x + (i as u32 % width) as i32;
            let iy = y + (i as u32 / width) as i32;
            self.blend_pixel(ix, iy, color, a as f32 / 255.0 * opacity);
        }
    }

    /// Raw RGBA8 bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_reports_bounds() {
        let mut canvas = Canvas::new(4, 3);
        assert!(canvas.set_pixel(3, 2, Rgb::WHITE));
        assert!(!canvas.set_pixel(4, 0, Rgb::WHITE));
        assert!(!canvas.set_pixel(-1, 1, Rgb::WHITE));
        assert_eq!(canvas.pixel(3, 2), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(0, 3), None);
    }

    #[test]
    fn circle_is_clipped_not_wrapped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.clear(Rgb::BLACK);
        canvas.fill_circle(0, 0, 3, Rgb::WHITE);
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(3, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(3, 3), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(9, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(9, 9), Some(Rgb::BLACK));
    }

    #[test]
    fn far_off_canvas_circle_is_ignored() {
        let mut canvas = Canvas::new(8, 8);
        canvas.clear(Rgb::BLACK);
        canvas.fill_circle(-500, 40_000, 12, Rgb::WHITE);
        assert!(canvas.as_bytes().chunks(4).all(|px| px[..3] == [0, 0, 0]));
    }

    #[test]
    fn additive_circle_brightens() {
        let mut canvas = Canvas::new(8, 8);
        canvas.clear(Rgb::new(100, 100, 100));
        canvas.add_circle(4, 4, 2, Rgb::new(255, 0, 0), 0.2);
        assert_eq!(canvas.pixel(4, 4), Some(Rgb::new(151, 100, 100)));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn image_alpha_is_respected() {
        let mut canvas = Canvas::new(2, 1);
        canvas.clear(Rgb::BLACK);
        canvas.blend_image(0, 0, 2, &[[255, 255, 255, 255], [255, 255, 255, 0]], None, 1.0);
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(1, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn bytes_are_rgba() {
        let mut canvas = Canvas::new(2, 2);
        canvas.clear(Rgb::new(25, 28, 35));
        assert_eq!(canvas.as_bytes().len(), 16);
        assert_eq!(&canvas.as_bytes()[..4], &[25, 28, 35, 255]);
    }
}
