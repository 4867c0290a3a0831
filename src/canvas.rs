//! Drawing surface abstraction.
//!
//! The renderer in [`crate::systems::render`] draws through the [`Canvas`]
//! trait so any host surface (a window texture, an egui image, a file) can
//! receive it. [`RasterCanvas`] is the in-process implementation backed by an
//! [`RgbaImage`]; the CLI and the tests draw into it.
//!
//! Coordinates are sheet pixels with the origin at the top-left corner.
//! Everything drawn outside the surface is clipped.
//!
//! `RasterCanvas::fill_text` only knows the digits 0-9, which is all the frame
//! labels need; other characters draw nothing but keep their slot. Hosts that
//! need general text implement [`Canvas::fill_text`] with their own renderer.

use image::{Pixel, Rgba, RgbaImage};

use crate::grid::{FrameRect, GridLine};

pub type Color = Rgba<u8>;

pub trait Canvas {
    fn size(&self) -> (u32, u32);

    /// Change the surface size. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Fill the surface with transparent black.
    fn clear(&mut self);

    /// Copy `src` out of `image` to `(dest_x, dest_y)`, replacing what is there.
    fn blit(&mut self, image: &RgbaImage, src: FrameRect, dest_x: u32, dest_y: u32);

    /// One-pixel line, alpha-blended.
    fn stroke_line(&mut self, line: &GridLine, color: Color);

    /// Alpha-blended rectangle.
    fn fill_rect(&mut self, rect: FrameRect, color: Color);

    /// Text centered on `(cx, cy)`. The renderer only passes frame numbers.
    fn fill_text(&mut self, text: &str, cx: f32, cy: f32, color: Color);
}

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

/// 3x5 bitmaps for the digits 0-9, one row per byte, most significant of the
/// low three bits on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Pixel width of `text` in the built-in font.
pub fn text_width(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    (n * GLYPH_ADVANCE).saturating_sub(1)
}

/// Software canvas over an RGBA buffer.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl Default for RasterCanvas {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn blend_at(&mut self, x: i64, y: i64, color: Color) {
        let (w, h) = self.image.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        self.image.get_pixel_mut(x as u32, y as u32).blend(&color);
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn blit(&mut self, image: &RgbaImage, src: FrameRect, dest_x: u32, dest_y: u32) {
        let tile = image::imageops::crop_imm(image, src.x, src.y, src.width, src.height).to_image();
        image::imageops::replace(&mut self.image, &tile, dest_x as i64, dest_y as i64);
    }

    fn stroke_line(&mut self, line: &GridLine, color: Color) {
        let dx = line.x1 - line.x0;
        let dy = line.y1 - line.y0;
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let steps = dx.abs().max(dy.abs()).ceil() as i64;
        if steps == 0 {
            self.blend_at(line.x0.floor() as i64, line.y0.floor() as i64, color);
            return;
        }
        // Endpoints are exclusive on the far side, like a half-open cell edge.
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            let x = (line.x0 + dx * t).floor() as i64;
            let y = (line.y0 + dy * t).floor() as i64;
            self.blend_at(x, y, color);
        }
    }

    fn fill_rect(&mut self, rect: FrameRect, color: Color) {
        let (w, h) = self.image.dimensions();
        let x_end = rect.x.saturating_add(rect.width).min(w);
        let y_end = rect.y.saturating_add(rect.height).min(h);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.image.get_pixel_mut(x, y).blend(&color);
            }
        }
    }

    fn fill_text(&mut self, text: &str, cx: f32, cy: f32, color: Color) {
        let left = (cx - text_width(text) as f32 / 2.0).round() as i64;
        let top = (cy - GLYPH_HEIGHT as f32 / 2.0).round() as i64;
        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = ch.to_digit(10).map(|d| &DIGITS[d as usize]) else {
                continue;
            };
            let gx = left + (i as u32 * GLYPH_ADVANCE) as i64;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> col) != 0 {
                        self.blend_at(gx + col as i64, top + row as i64, color);
                    }
                }
            }
        }
    }
}
