//! Loaded spritesheet resource.
//!
//! Holds the decoded sheet once the I/O worker delivers it. Until then the
//! sheet is "not ready" and every geometry query answers with the empty grid,
//! so nothing downstream ever measures an image that is still decoding.

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use image::RgbaImage;

use crate::grid::{self, FrameRect, GridLayout, SpriteConfig};

/// A decoded sheet and the name it was loaded under (file path or label).
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub label: String,
    pub image: Arc<RgbaImage>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SpriteSheet {
    loaded: Option<LoadedSheet>,
}

impl SpriteSheet {
    pub fn new(label: impl Into<String>, image: Arc<RgbaImage>) -> Self {
        Self {
            loaded: Some(LoadedSheet {
                label: label.into(),
                image,
            }),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn set(&mut self, label: impl Into<String>, image: Arc<RgbaImage>) {
        self.loaded = Some(LoadedSheet {
            label: label.into(),
            image,
        });
    }

    pub fn clear(&mut self) {
        self.loaded = None;
    }

    pub fn loaded(&self) -> Option<&LoadedSheet> {
        self.loaded.as_ref()
    }

    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.loaded.as_ref().map(|l| &l.image)
    }

    pub fn label(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.label.as_str())
    }

    /// Pixel size of the sheet, `(0, 0)` while nothing is loaded.
    pub fn size(&self) -> (u32, u32) {
        self.image().map_or((0, 0), |img| img.dimensions())
    }

    pub fn layout(&self, config: &SpriteConfig) -> GridLayout {
        let (w, h) = self.size();
        grid::compute_grid(w, h, config)
    }

    /// Rectangle of a populated frame; `None` for unloaded sheets and indices
    /// past the grid.
    pub fn frame_rect(&self, index: usize, config: &SpriteConfig) -> Option<FrameRect> {
        let layout = self.layout(config);
        if !layout.contains(index) {
            return None;
        }
        grid::frame_rect(index, layout.columns, config)
    }

    pub fn hit_test(&self, x: f32, y: f32, config: &SpriteConfig) -> Option<usize> {
        let (w, h) = self.size();
        grid::hit_test(x, y, w, h, config)
    }

    /// Copy of one frame's pixels.
    pub fn crop_frame(&self, index: usize, config: &SpriteConfig) -> Option<RgbaImage> {
        let rect = self.frame_rect(index, config)?;
        let image = self.image()?;
        let view = image::imageops::crop_imm(&**image, rect.x, rect.y, rect.width, rect.height);
        Some(view.to_image())
    }
}
