//! Grid layout bookkeeping.
//!
//! Watches the sprite configuration and the loaded sheet. Whenever either
//! changes the new layout is logged and a hover index that no longer names a
//! populated frame is dropped.
use bevy_ecs::prelude::*;
use log::info;

use crate::resources::hover::HoveredFrame;
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::spritesheet::SpriteSheet;

pub fn announce_grid_layout(
    config: Res<SpriteConfig>,
    sheet: Res<SpriteSheet>,
    mut hovered: ResMut<HoveredFrame>,
) {
    if !config.is_changed() && !sheet.is_changed() {
        return;
    }
    let layout = sheet.layout(&config);
    if sheet.is_ready() {
        info!(
            "Grid: {} columns x {} rows = {} frames",
            layout.columns, layout.rows, layout.total_frames
        );
    }
    if hovered.0.is_some_and(|i| !layout.contains(i)) {
        hovered.0 = None;
    }
}
