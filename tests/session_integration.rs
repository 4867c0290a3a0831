//! Session integration tests.
//!
//! These drive a full [`Session`]: world, observers, schedule and the real
//! I/O thread. Images are encoded in memory and sent through
//! `load_image_bytes`, so nothing here depends on files in the repository.
//!
//! # Test Categories
//!
//! 1. **Sheet loading** - async decode, rejection of non-images
//! 2. **Registry through the session** - validation, removal, form submit
//! 3. **Playback through the schedule** - wrap, catch-up, restarts
//! 4. **Hover** - pointer events and grid shrink
//! 5. **Export** - JSON document, file write via the I/O thread
//! 6. **Rendering** - preview and player canvases

use std::io::Cursor;
use std::time::Duration;

use image::{ImageOutputFormat, Rgba, RgbaImage};

use sprite_animator::canvas::{Canvas, RasterCanvas};
use sprite_animator::resources::animationstore::{RegistryError, ValidationError};
use sprite_animator::resources::editorconfig::EditorConfig;
use sprite_animator::resources::notices::NoticeLevel;
use sprite_animator::resources::playback::PlaybackMode;
use sprite_animator::resources::spriteconfig::{ConfigField, SpriteConfig};
use sprite_animator::session::Session;

const TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Helpers
// =============================================================================

/// PNG of `cols` x `rows` solid 16x16 cells, each a different shade of red.
fn sheet_png(cols: u32, rows: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(cols * 16, rows * 16, |x, y| {
        let index = (y / 16) * cols + x / 16;
        Rgba([(index * 10) as u8, 0, 0, 255])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png).unwrap();
    out.into_inner()
}

fn session_16px() -> Session {
    let mut config = EditorConfig::new();
    config.sprite = SpriteConfig::new(16, 16);
    Session::new(config).unwrap()
}

/// Session with a loaded `cols` x `rows` sheet of 16px frames.
fn loaded_session(cols: u32, rows: u32) -> Session {
    let mut session = session_16px();
    let seen = session.notices().len();
    session.load_image_bytes("sheet.png", sheet_png(cols, rows));
    let notice = session.wait_for_notice(seen, TIMEOUT).unwrap();
    assert_eq!(notice.level, NoticeLevel::Success, "{}", notice.text);
    session
}

fn frame_interval(session: &Session) -> f64 {
    session.playback().frame_interval_ms()
}

// =============================================================================
// 1. Sheet loading
// =============================================================================

#[test]
fn sheet_is_not_ready_until_the_io_thread_answers() {
    let mut session = session_16px();
    assert!(!session.sheet().is_ready());
    assert!(session.layout().is_empty());

    let seen = session.notices().len();
    session.load_image_bytes("sheet.png", sheet_png(4, 2));
    let notice = session.wait_for_notice(seen, TIMEOUT).unwrap();

    assert_eq!(notice.text, "Spritesheet uploaded successfully!");
    assert_eq!(session.sheet().label(), Some("sheet.png"));
    let layout = session.layout();
    assert_eq!((layout.columns, layout.rows, layout.total_frames), (4, 2, 8));
}

#[test]
fn non_image_upload_is_rejected_and_state_kept() {
    let mut session = loaded_session(2, 1);
    let seen = session.notices().len();
    session.load_image_bytes("notes.txt", b"definitely not pixels".to_vec());
    let notice = session.wait_for_notice(seen, TIMEOUT).unwrap();

    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.text, "Please upload a valid image file");
    assert_eq!(session.sheet().label(), Some("sheet.png"));
    assert_eq!(session.layout().total_frames, 2);
}

#[test]
fn loading_from_missing_file_reports_error() {
    let mut session = session_16px();
    let path = std::env::temp_dir().join("sprite-animator-does-not-exist.png");
    let err = session.load_image_blocking(path, TIMEOUT).unwrap_err();
    assert!(err.to_string().contains("Failed to load spritesheet"));
    assert!(!session.sheet().is_ready());
}

#[test]
fn loading_from_file_matches_bytes() {
    let path = std::env::temp_dir().join(format!("sprite-animator-load-{}.png", std::process::id()));
    std::fs::write(&path, sheet_png(3, 3)).unwrap();
    let mut session = session_16px();
    let layout = session.load_image_blocking(&path, TIMEOUT).unwrap();
    assert_eq!(layout.total_frames, 9);
    std::fs::remove_file(&path).ok();
}

#[test]
fn blocking_load_waits_out_earlier_commands() {
    let path = std::env::temp_dir().join(format!("sprite-animator-queued-{}.png", std::process::id()));
    std::fs::write(&path, sheet_png(5, 2)).unwrap();
    let mut session = session_16px();
    session.load_image_bytes("junk", b"not an image".to_vec());
    assert_eq!(session.pending_io(), 1);

    let layout = session.load_image_blocking(&path, TIMEOUT).unwrap();
    assert_eq!((layout.columns, layout.rows, layout.total_frames), (5, 2, 10));
    assert_eq!(session.pending_io(), 0);
    let levels: Vec<_> = session.notices().iter().map(|n| n.level).collect();
    assert_eq!(levels, [NoticeLevel::Error, NoticeLevel::Success]);
    std::fs::remove_file(&path).ok();
}

// =============================================================================
// 2. Registry through the session
// =============================================================================

#[test]
fn adding_before_any_sheet_has_no_valid_range() {
    let mut session = session_16px();
    let err = session.add_animation("idle", 0, 0).unwrap_err();
    assert_eq!(
        err,
        RegistryError::Validation(ValidationError::RangeOutOfBounds { total_frames: 0 })
    );
}

#[test]
fn removing_selected_animation_clears_selection_and_playback() {
    let mut session = loaded_session(4, 1);
    let walk = session.add_animation("walk", 0, 3).unwrap();
    session.select(Some(walk.id));
    session.toggle_playback();
    assert!(session.playback().is_playing());

    assert!(session.remove_animation(walk.id));
    assert_eq!(session.registry().selected(), None);
    assert_eq!(session.playback().current_frame(), None);
    assert_eq!(session.playback().mode(), PlaybackMode::Stopped);
    assert!(!session.wants_refresh());
    assert!(!session.remove_animation(walk.id));
}

#[test]
fn removing_other_animation_keeps_selection() {
    let mut session = loaded_session(4, 1);
    let a = session.add_animation("a", 0, 1).unwrap();
    let b = session.add_animation("b", 2, 3).unwrap();
    session.select(Some(a.id));
    session.remove_animation(b.id);
    assert_eq!(session.registry().selected(), Some(a.id));
    assert_eq!(session.playback().current_frame(), Some(0));
}

#[test]
fn form_submit_adds_then_edits() {
    let mut session = loaded_session(4, 2);
    {
        let mut form = session.form_mut();
        form.name = "  run ".to_string();
        form.frame_start = 4;
        form.frame_end = 7;
    }
    session.submit_form();
    let run = session.registry().find_by_name("run").cloned().unwrap();
    assert_eq!((run.frame_start, run.frame_end), (4, 7));
    assert_eq!(session.form().name, "");

    session.edit_animation(run.id);
    assert_eq!(session.form().editing(), Some(run.id));
    session.form_mut().frame_end = 9;
    session.submit_form();
    // Rejected: 9 is past the last frame. The form keeps the input.
    assert_eq!(session.form().editing(), Some(run.id));
    assert_eq!(session.registry().get(run.id).unwrap().frame_end, 7);

    session.form_mut().frame_end = 6;
    session.submit_form();
    assert_eq!(session.form().editing(), None);
    assert_eq!(session.registry().get(run.id).unwrap().frame_end, 6);

    let texts: Vec<_> = session.drain_notices().into_iter().map(|n| n.text).collect();
    assert!(texts.contains(&"Animation added successfully!".to_string()));
    assert!(texts.contains(&"Animation updated successfully!".to_string()));
    assert!(texts.contains(&"Frame range must be between 0 and 7".to_string()));
}

#[test]
fn deleting_the_edited_animation_cancels_the_edit() {
    let mut session = loaded_session(2, 1);
    let a = session.add_animation("a", 0, 1).unwrap();
    session.edit_animation(a.id);
    session.remove_animation(a.id);
    assert_eq!(session.form().editing(), None);
}

// =============================================================================
// 3. Playback through the schedule
// =============================================================================

#[test]
fn four_intervals_at_12_fps_wrap_to_start() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("loop", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.set_fps(12);
    session.toggle_playback();

    let step = frame_interval(&session);
    let mut seen = Vec::new();
    for _ in 0..4 {
        session.update(step);
        seen.push(session.playback().current_frame().unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3, 0]);
}

#[test]
fn late_refresh_catches_up() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("loop", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.toggle_playback();

    let step = frame_interval(&session);
    session.update(step * 2.5);
    assert_eq!(session.playback().current_frame(), Some(2));
    // The half interval carried over completes on the next half step.
    session.update(step * 0.5);
    assert_eq!(session.playback().current_frame(), Some(3));
}

#[test]
fn paused_playback_does_not_advance() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("loop", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.toggle_playback();
    session.update(frame_interval(&session));
    session.toggle_playback();
    session.update(10_000.0);
    assert_eq!(session.playback().current_frame(), Some(1));
    assert!(!session.wants_refresh());
}

#[test]
fn seek_clamps_and_stops() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("loop", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.toggle_playback();
    session.seek(999);
    assert_eq!(session.playback().current_frame(), Some(3));
    assert!(!session.playback().is_playing());
    session.seek(-5);
    assert_eq!(session.playback().current_frame(), Some(0));
}

#[test]
fn editing_selected_animation_restarts_preview() {
    let mut session = loaded_session(8, 1);
    let anim = session.add_animation("a", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.toggle_playback();
    session.update(frame_interval(&session) * 2.0);
    assert_eq!(session.playback().current_frame(), Some(2));

    session.update_animation(anim.id, "a", 5, 7).unwrap();
    assert_eq!(session.playback().current_frame(), Some(5));
    assert!(!session.playback().is_playing());
}

#[test]
fn new_sheet_resets_playback_to_selection_start() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("a", 1, 3).unwrap();
    session.select(Some(anim.id));
    session.seek(3);

    let seen = session.notices().len();
    session.load_image_bytes("other.png", sheet_png(4, 1));
    session.wait_for_notice(seen, TIMEOUT).unwrap();
    assert_eq!(session.playback().current_frame(), Some(1));
}

// =============================================================================
// 4. Hover
// =============================================================================

#[test]
fn pointer_events_track_hovered_frame() {
    let mut session = loaded_session(4, 2);
    session.pointer_moved(40.0, 20.0);
    assert_eq!(session.hovered_frame(), Some(6));
    session.pointer_moved(500.0, 500.0);
    assert_eq!(session.hovered_frame(), None);
    session.pointer_moved(0.0, 0.0);
    session.pointer_left();
    assert_eq!(session.hovered_frame(), None);
}

#[test]
fn growing_frames_drops_stale_hover() {
    let mut session = loaded_session(4, 2);
    session.pointer_moved(56.0, 24.0);
    assert_eq!(session.hovered_frame(), Some(7));

    session.edit_config_field(ConfigField::FrameWidth, 32);
    session.edit_config_field(ConfigField::FrameHeight, 32);
    session.update(0.0);
    assert_eq!(session.layout().total_frames, 2);
    assert_eq!(session.hovered_frame(), None);
}

// =============================================================================
// 5. Export
// =============================================================================

#[test]
fn export_document_matches_registry_order() {
    let mut session = loaded_session(4, 3);
    session.add_animation("walk", 2, 5).unwrap();
    session.add_animation("idle", 0, 1).unwrap();
    let json = session.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            { "name": "walk", "frameStart": 2, "frameEnd": 5 },
            { "name": "idle", "frameStart": 0, "frameEnd": 1 }
        ])
    );
}

#[test]
fn saving_export_writes_through_io_thread() {
    let dir = std::env::temp_dir().join(format!("sprite-animator-export-{}", std::process::id()));
    let path = dir.join("animations.json");
    let mut session = loaded_session(4, 1);
    session.add_animation("walk", 0, 3).unwrap();

    session.save_export_blocking(Some(path.clone()), TIMEOUT).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        session.export_json().unwrap()
    );
    assert_eq!(
        session.notices().last().map(|n| n.text.as_str()),
        Some("JSON file downloaded!")
    );
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_registry_is_not_exported() {
    let mut session = loaded_session(2, 1);
    assert!(session.save_export_blocking(None, TIMEOUT).is_err());
}

// =============================================================================
// 6. Rendering
// =============================================================================

#[test]
fn player_canvas_follows_playback() {
    let mut session = loaded_session(4, 1);
    let anim = session.add_animation("a", 0, 3).unwrap();
    session.select(Some(anim.id));
    session.toggle_playback();

    let mut canvas = RasterCanvas::default();
    assert_eq!(session.render_player(&mut canvas), Some(0));
    assert_eq!(canvas.size(), (16, 16));
    session.update(frame_interval(&session));
    assert_eq!(session.render_player(&mut canvas), Some(1));
    assert_eq!(*canvas.image().get_pixel(8, 8), Rgba([10, 0, 0, 255]));
}

#[test]
fn preview_canvas_covers_sheet() {
    let session = loaded_session(3, 2);
    let mut canvas = RasterCanvas::default();
    session.render_preview(&mut canvas);
    assert_eq!(canvas.size(), (48, 32));
}
