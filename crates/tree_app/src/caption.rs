//! Static multi-line greeting drawn over the scene.

use engine_core::Rgb;
use renderer::{draw_text, line_height, text_width, Canvas};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One line of text with its own pixel size and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionLine {
    pub text: String,
    pub size: u32,
    #[serde(default = "default_line_color")]
    pub color: Rgb,
}

fn default_line_color() -> Rgb {
    Rgb::WHITE
}

impl CaptionLine {
    pub fn new(text: &str, size: u32, color: Rgb) -> Self {
        Self {
            text: text.to_string(),
            size,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub lines: Vec<CaptionLine>,
    /// Anchor x as a fraction of canvas width; its meaning follows `align`.
    pub x_ratio: f32,
    /// Vertical centre of the block; `None` centres it on the canvas.
    pub y: Option<i32>,
    pub line_spacing: i32,
    pub shadow_offset: (i32, i32),
    pub align: Align,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        let white = Rgb::WHITE;
        Self {
            lines: vec![
                CaptionLine::new("*Merry Christmas*", 70, Rgb::new(255, 250, 220)),
                CaptionLine::new("To Beloved Feifei: ", 46, Rgb::new(255, 200, 220)),
                CaptionLine::new("The grass is bearing its seeds,", 32, white),
                CaptionLine::new("The wind is swaying its leaves.", 32, white),
                CaptionLine::new("We stand here, without a word,", 32, white),
                CaptionLine::new("And it has already melt your heart.", 32, white),
            ],
            x_ratio: 0.15,
            y: None,
            line_spacing: 15,
            shadow_offset: (2, 2),
            align: Align::Left,
        }
    }
}

/// Caption laid out once for a canvas size.
#[derive(Debug, Clone)]
pub struct Caption {
    config: CaptionConfig,
    anchor_x: i32,
    top: i32,
}

impl Caption {
    pub fn new(config: CaptionConfig, canvas_width: u32, canvas_height: u32) -> Self {
        let anchor_x = (canvas_width as f32 * config.x_ratio) as i32;
        let centre_y = config.y.unwrap_or((canvas_height / 2) as i32);
        let top = centre_y - Self::block_height(&config) / 2;
        Self {
            config,
            anchor_x,
            top,
        }
    }

    /// Height of all lines plus the gaps between them.
    fn block_height(config: &CaptionConfig) -> i32 {
        let lines: i32 = config.lines.iter().map(|l| line_height(l.size)).sum();
        let gaps = config.line_spacing * (config.lines.len() as i32 - 1).max(0);
        lines + gaps
    }

    pub fn height(&self) -> i32 {
        Self::block_height(&self.config)
    }

    /// Left edge of a line of the given width.
    fn line_x(&self, width: i32) -> i32 {
        match self.config.align {
            Align::Left => self.anchor_x,
            Align::Center => self.anchor_x - width / 2,
            Align::Right => self.anchor_x - width,
        }
    }

    /// Draw every line, shadow first.
    pub fn draw(&self, canvas: &mut Canvas) {
        let (sx, sy) = self.config.shadow_offset;
        let mut y = self.top;
        for line in &self.config.lines {
            let x = self.line_x(text_width(&line.text, line.size));
            draw_text(canvas, x + sx, y + sy, &line.text, line.size, Rgb::BLACK);
            draw_text(canvas, x, y, &line.text, line.size, line.color);
            y += line_height(line.size) + self.config.line_spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(align: Align) -> CaptionConfig {
        CaptionConfig {
            lines: vec![CaptionLine::new("|", 8, Rgb::WHITE)],
            x_ratio: 0.5,
            y: Some(10),
            line_spacing: 0,
            shadow_offset: (1, 1),
            align,
        }
    }

    #[test]
    fn default_block_is_centred() {
        let caption = Caption::new(CaptionConfig::default(), 1920, 1080);
        // 70 + 46 + 4 * 32 + 5 * 15
        assert_eq!(caption.height(), 319);
        assert_eq!(caption.top, 540 - 159);
        assert_eq!(caption.anchor_x, 288);
    }

    #[test]
    fn shadow_sits_under_text() {
        let mut canvas = Canvas::new(40, 30);
        canvas.clear(Rgb::new(25, 28, 35));
        let caption = Caption::new(single(Align::Left), 40, 30);
        caption.draw(&mut canvas);
        // top = 10 - 4 = 6; '|' fills column 2 of the glyph.
        assert_eq!(canvas.pixel(22, 6), Some(Rgb::WHITE));
        assert_eq!(canvas.pixel(23, 7 + 6), Some(Rgb::BLACK));
    }

    #[test]
    fn alignment_moves_the_line() {
        let left = Caption::new(single(Align::Left), 40, 30);
        let centre = Caption::new(single(Align::Center), 40, 30);
        let right = Caption::new(single(Align::Right), 40, 30);
        assert_eq!(left.line_x(6), 20);
        assert_eq!(centre.line_x(6), 17);
        assert_eq!(right.line_x(6), 14);
    }

    #[test]
    fn empty_caption_draws_nothing() {
        let config = CaptionConfig {
            lines: Vec::new(),
            ..CaptionConfig::default()
        };
        let caption = Caption::new(config, 100, 100);
        assert_eq!(caption.height(), 0);
        let mut canvas = Canvas::new(100, 100);
        canvas.clear(Rgb::BLACK);
        caption.draw(&mut canvas);
        assert!(canvas.as_bytes().chunks(4).all(|px| px[..3] == [0, 0, 0]));
    }
}
