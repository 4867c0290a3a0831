//! Sheet preview and player rendering.
//!
//! Both passes read session resources and draw onto a [`Canvas`]. Nothing is
//! drawn for an unloaded sheet beyond resizing/clearing, and no highlight is
//! ever drawn for an index past the populated grid.
//!
//! Preview draw order, bottom to top:
//! 1. the sheet image at 1:1
//! 2. grid lines around every populated cell
//! 3. frame numbers at each cell's center
//! 4. the selected animation's range
//! 5. the hovered frame
use bevy_ecs::prelude::*;
use image::Rgba;

use crate::canvas::{Canvas, Color};
use crate::grid::{self, FrameRect};
use crate::resources::animationstore::AnimationRegistry;
use crate::resources::hover::HoveredFrame;
use crate::resources::playback::PlaybackScheduler;
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::spritesheet::SpriteSheet;

pub const GRID_COLOR: Color = Rgba([64, 191, 191, 128]);
pub const LABEL_COLOR: Color = Rgba([230, 235, 240, 255]);
pub const SELECTED_COLOR: Color = Rgba([0, 179, 119, 102]);
pub const HOVER_COLOR: Color = Rgba([0, 255, 255, 179]);

/// Draw the sheet with its grid overlay and highlights.
///
/// The canvas is resized to the sheet. With no sheet loaded it is resized to
/// nothing.
pub fn render_sheet_preview(
    canvas: &mut dyn Canvas,
    sheet: &SpriteSheet,
    config: &SpriteConfig,
    registry: &AnimationRegistry,
    hovered: Option<usize>,
) {
    let Some(image) = sheet.image() else {
        canvas.resize(0, 0);
        return;
    };
    let (w, h) = image.dimensions();
    if canvas.size() != (w, h) {
        canvas.resize(w, h);
    } else {
        canvas.clear();
    }
    canvas.blit(
        image,
        FrameRect {
            x: 0,
            y: 0,
            width: w,
            height: h,
        },
        0,
        0,
    );

    let layout = sheet.layout(config);
    if layout.is_empty() {
        return;
    }
    for line in grid::grid_lines(&layout, config) {
        canvas.stroke_line(&line, GRID_COLOR);
    }
    for index in 0..layout.total_frames {
        if let Some(rect) = grid::frame_rect(index, layout.columns, config) {
            let (cx, cy) = rect.center();
            canvas.fill_text(&index.to_string(), cx, cy, LABEL_COLOR);
        }
    }

    if let Some(animation) = registry.selected_animation() {
        let last = animation.frame_end.min(layout.total_frames.saturating_sub(1));
        for index in animation.frame_start..=last {
            if let Some(rect) = sheet.frame_rect(index, config) {
                canvas.fill_rect(rect, SELECTED_COLOR);
            }
        }
    }
    if let Some(rect) = hovered.and_then(|i| sheet.frame_rect(i, config)) {
        canvas.fill_rect(rect, HOVER_COLOR);
    }
}

/// Draw the scheduler's current frame, sizing the canvas to exactly one cell.
///
/// Returns the frame drawn, or `None` (leaving the canvas empty) when there
/// is no sheet, no selection, or the frame lies outside the grid.
pub fn render_player_frame(
    canvas: &mut dyn Canvas,
    sheet: &SpriteSheet,
    config: &SpriteConfig,
    scheduler: &PlaybackScheduler,
) -> Option<usize> {
    let (Some(image), Some(rect)) = (sheet.image(), scheduler.current_rect(sheet, config)) else {
        canvas.resize(0, 0);
        return None;
    };
    if canvas.size() != (rect.width, rect.height) {
        canvas.resize(rect.width, rect.height);
    } else {
        canvas.clear();
    }
    canvas.blit(image, rect, 0, 0);
    scheduler.current_frame()
}

/// Exclusive-world wrapper of [`render_sheet_preview`] for hosts that hold a
/// `World` rather than individual resources.
pub fn render_preview_pass(world: &World, canvas: &mut dyn Canvas) {
    let hovered = world.get_resource::<HoveredFrame>().and_then(|h| h.0);
    render_sheet_preview(
        canvas,
        world.resource::<SpriteSheet>(),
        world.resource::<SpriteConfig>(),
        world.resource::<AnimationRegistry>(),
        hovered,
    );
}

/// Exclusive-world wrapper of [`render_player_frame`].
pub fn render_player_pass(world: &World, canvas: &mut dyn Canvas) -> Option<usize> {
    render_player_frame(
        canvas,
        world.resource::<SpriteSheet>(),
        world.resource::<SpriteConfig>(),
        world.resource::<PlaybackScheduler>(),
    )
}
