//! Sprite grid configuration resource.
//!
//! [`SpriteConfig`] describes how frames are laid out on the sheet. It is
//! replaced wholesale on every edit; change detection on the resource drives
//! [`crate::systems::spritesheet::announce_grid_layout`].

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_WIDTH: u32 = 32;
pub const DEFAULT_FRAME_HEIGHT: u32 = 32;

/// Frame size, gap and margin of a uniform spritesheet grid, in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Gap between adjacent frames, horizontally and vertically.
    pub spacing: u32,
    /// Margin before the first column.
    pub offset_x: u32,
    /// Margin before the first row.
    pub offset_y: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            spacing: 0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

/// Individually editable fields of a [`SpriteConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    FrameWidth,
    FrameHeight,
    Spacing,
    OffsetX,
    OffsetY,
}

impl SpriteConfig {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            ..Self::default()
        }
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_offset(mut self, offset_x: u32, offset_y: u32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Return a copy with `field` set from raw user input. Negative values
    /// clamp to zero; values past `u32::MAX` saturate.
    pub fn set_field(&self, field: ConfigField, value: i64) -> Self {
        let value = value.clamp(0, u32::MAX as i64) as u32;
        let mut next = *self;
        match field {
            ConfigField::FrameWidth => next.frame_width = value,
            ConfigField::FrameHeight => next.frame_height = value,
            ConfigField::Spacing => next.spacing = value,
            ConfigField::OffsetX => next.offset_x = value,
            ConfigField::OffsetY => next.offset_y = value,
        }
        next
    }

    /// True when no frame can ever fit, whatever the image size.
    pub fn is_degenerate(&self) -> bool {
        self.frame_width == 0 || self.frame_height == 0
    }
}
