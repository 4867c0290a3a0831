//! Spritesheet grid geometry.
//!
//! Pure functions that turn an image size plus a [`SpriteConfig`] into a
//! row-major grid of frame indices, and convert between frame indices and
//! pixel rectangles. Nothing here allocates state or fails: degenerate
//! geometry (zero-sized frames, no image, offsets past the image edge)
//! yields a layout with no frames.
//!
//! Frames are numbered left to right, top to bottom:
//!
//! ```text
//!  offset_x
//!  |<->|
//!      +----+ +----+ +----+   - offset_y
//!      | 0  | | 1  | | 2  |
//!      +----+ +----+ +----+
//!      +----+ +----+ +----+   <- spacing gap between rows
//!      | 3  | | 4  | | 5  |
//!      +----+ +----+ +----+
//! ```
//!
//! # Related
//!
//! - [`crate::resources::spriteconfig::SpriteConfig`] – the grid parameters
//! - [`crate::resources::spritesheet::SpriteSheet`] – gates these queries on a loaded image

use serde::{Deserialize, Serialize};

pub use crate::resources::spriteconfig::SpriteConfig;

/// Columns, rows and frame count derived from an image and a [`SpriteConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub total_frames: usize,
}

impl GridLayout {
    /// The layout of an unloaded sheet or a degenerate configuration.
    pub const EMPTY: GridLayout = GridLayout {
        columns: 0,
        rows: 0,
        total_frames: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.total_frames == 0
    }

    /// Whether `index` addresses a populated cell.
    pub fn contains(&self, index: usize) -> bool {
        index < self.total_frames
    }
}

/// A frame's sub-rectangle in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    /// Center point, used as the anchor for frame labels and hit-test sample points.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Half-open containment: the right and bottom edges belong to the gutter
    /// (or the next cell), not to this frame.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let left = self.x as f32;
        let top = self.y as f32;
        x >= left && y >= top && x < left + self.width as f32 && y < top + self.height as f32
    }
}

/// One overlay line segment in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Horizontal and vertical distance between the origins of adjacent cells.
/// `None` when either step is zero, or when a frame dimension is zero.
fn cell_step(config: &SpriteConfig) -> Option<(u64, u64)> {
    if config.frame_width == 0 || config.frame_height == 0 {
        return None;
    }
    let step_x = config.frame_width as u64 + config.spacing as u64;
    let step_y = config.frame_height as u64 + config.spacing as u64;
    if step_x == 0 || step_y == 0 {
        return None;
    }
    Some((step_x, step_y))
}

/// Compute how many whole cells fit in the image.
///
/// `columns = floor((image_width - offset_x) / (frame_width + spacing))` and
/// likewise for rows, each on its own; a negative numerator yields zero. A
/// zero frame size yields [`GridLayout::EMPTY`]. When only one dimension fits
/// nothing, the other is still reported and `total_frames` is zero.
pub fn compute_grid(image_width: u32, image_height: u32, config: &SpriteConfig) -> GridLayout {
    let Some((step_x, step_y)) = cell_step(config) else {
        return GridLayout::EMPTY;
    };
    let usable_w = (image_width as u64).saturating_sub(config.offset_x as u64);
    let usable_h = (image_height as u64).saturating_sub(config.offset_y as u64);
    let columns = (usable_w / step_x) as usize;
    let rows = (usable_h / step_y) as usize;
    GridLayout {
        columns,
        rows,
        total_frames: columns * rows,
    }
}

/// Pixel rectangle of frame `index` in a grid `columns` wide.
///
/// Indices past the populated grid extrapolate downwards; callers must not
/// draw those. Returns `None` when `columns` is zero.
pub fn frame_rect(index: usize, columns: usize, config: &SpriteConfig) -> Option<FrameRect> {
    if columns == 0 {
        return None;
    }
    let row = (index / columns) as u64;
    let col = (index % columns) as u64;
    let step_x = config.frame_width as u64 + config.spacing as u64;
    let step_y = config.frame_height as u64 + config.spacing as u64;
    let x = config.offset_x as u64 + col * step_x;
    let y = config.offset_y as u64 + row * step_y;
    Some(FrameRect {
        x: u32::try_from(x).ok()?,
        y: u32::try_from(y).ok()?,
        width: config.frame_width,
        height: config.frame_height,
    })
}

/// Map a point in image pixels to the frame under it.
///
/// Returns `None` left of / above the offset, inside spacing gutters, past the
/// last populated column or row, or when the grid is empty.
pub fn hit_test(
    x: f32,
    y: f32,
    image_width: u32,
    image_height: u32,
    config: &SpriteConfig,
) -> Option<usize> {
    let layout = compute_grid(image_width, image_height, config);
    if layout.is_empty() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let (step_x, step_y) = cell_step(config)?;
    let local_x = x - config.offset_x as f32;
    let local_y = y - config.offset_y as f32;
    if local_x < 0.0 || local_y < 0.0 {
        return None;
    }
    let col = (local_x / step_x as f32).floor() as usize;
    let row = (local_y / step_y as f32).floor() as usize;
    if col >= layout.columns || row >= layout.rows {
        return None;
    }
    let index = row * layout.columns + col;
    if !layout.contains(index) {
        return None;
    }
    let rect = frame_rect(index, layout.columns, config)?;
    rect.contains_point(x, y).then_some(index)
}

/// Convert a pointer position on a scaled display surface into image pixels.
///
/// The host may show the sheet larger or smaller than its natural size; grid
/// math always works in image pixels. A zero-sized display maps to the origin.
pub fn display_to_image(
    pointer: (f32, f32),
    display_size: (f32, f32),
    image_size: (u32, u32),
) -> (f32, f32) {
    let (dw, dh) = display_size;
    if dw <= 0.0 || dh <= 0.0 {
        return (0.0, 0.0);
    }
    let scale_x = image_size.0 as f32 / dw;
    let scale_y = image_size.1 as f32 / dh;
    (pointer.0 * scale_x, pointer.1 * scale_y)
}

/// Overlay lines bounding every populated cell: `columns + 1` verticals and
/// `rows + 1` horizontals, each spanning the full grid extent.
pub fn grid_lines(layout: &GridLayout, config: &SpriteConfig) -> Vec<GridLine> {
    if layout.is_empty() {
        return Vec::new();
    }
    let step_x = config.frame_width as f32 + config.spacing as f32;
    let step_y = config.frame_height as f32 + config.spacing as f32;
    let left = config.offset_x as f32;
    let top = config.offset_y as f32;
    let right = left + layout.columns as f32 * step_x;
    let bottom = top + layout.rows as f32 * step_y;

    let mut lines = Vec::with_capacity(layout.columns + layout.rows + 2);
    for col in 0..=layout.columns {
        let x = left + col as f32 * step_x;
        lines.push(GridLine {
            x0: x,
            y0: top,
            x1: x,
            y1: bottom,
        });
    }
    for row in 0..=layout.rows {
        let y = top + row as f32 * step_y;
        lines.push(GridLine {
            x0: left,
            y0: y,
            x1: right,
            y1: y,
        });
    }
    lines
}
