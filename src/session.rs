//! Editor session: the ECS world, its observers and the per-pass schedule.
//!
//! A [`Session`] owns everything one editing session needs. Hosts feed it
//! user actions through the methods below (each one triggers the matching
//! event) and call [`Session::update`] once per refresh with the elapsed
//! milliseconds. Image decoding, clipboard and file writes run on the I/O
//! thread; their outcomes show up as [`Notice`]s after a later `update`.
//!
//! ```no_run
//! use sprite_animator::resources::editorconfig::EditorConfig;
//! use sprite_animator::session::Session;
//!
//! let mut session = Session::new(EditorConfig::new()).unwrap();
//! session.load_image("hero.png");
//! loop {
//!     session.update(16.0);
//!     for notice in session.drain_notices() {
//!         println!("{}", notice.text);
//!     }
//!     # break;
//! }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, info};
use thiserror::Error;

use crate::canvas::Canvas;
use crate::events::animation::{
    CancelEditEvent, EditAnimationEvent, RemoveAnimationEvent, SubmitAnimationFormEvent,
    cancel_edit_observer, edit_animation_observer, remove_animation_observer,
    submit_animation_form_observer,
};
use crate::events::export::{
    CopyExportEvent, SaveExportEvent, copy_export_observer, save_export_observer,
};
use crate::events::io::IoCmd;
use crate::events::playback::{
    ResetPlaybackEvent, SeekPlaybackEvent, SetFpsEvent, TogglePlaybackEvent,
    reset_playback_observer, seek_playback_observer, set_fps_observer, toggle_playback_observer,
};
use crate::events::selection::{SelectAnimationEvent, select_animation_observer};
use crate::events::sheet::{
    EditConfigFieldEvent, PointerLeftEvent, PointerMovedEvent, SetSpriteConfigEvent,
    edit_config_field_observer, pointer_left_observer, pointer_moved_observer,
    set_sprite_config_observer,
};
use crate::grid::GridLayout;
use crate::resources::animationform::AnimationForm;
use crate::resources::animationstore::{Animation, AnimationId, AnimationRegistry, RegistryError};
use crate::resources::editorconfig::{ConfigError, EditorConfig};
use crate::resources::hover::HoveredFrame;
use crate::resources::io::{IoBridge, setup_io, shutdown_io};
use crate::resources::notices::{Notice, NoticeBoard, NoticeLevel};
use crate::resources::playback::{FrameTicker, PlaybackScheduler};
use crate::resources::spriteconfig::{ConfigField, SpriteConfig};
use crate::resources::spritesheet::SpriteSheet;
use crate::resources::worldtime::WorldTime;
use crate::systems::export::export_json;
use crate::systems::io::{apply_io_messages, poll_io_messages, update_io_messages};
use crate::systems::playback::playback_tick;
use crate::systems::render::{render_player_pass, render_preview_pass};
use crate::systems::spritesheet::announce_grid_layout;
use crate::systems::time::update_world_time;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Failed to build session schedule: {0}")]
    Schedule(String),
    #[error("{0}")]
    Io(String),
    #[error("Timed out after {0:?} waiting for the I/O thread")]
    Timeout(Duration),
    #[error("Failed to serialize animations: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    File(#[from] std::io::Error),
}

pub struct Session {
    world: World,
    update: Schedule,
}

impl Session {
    /// Build the world from `config` and start the I/O thread.
    pub fn new(config: EditorConfig) -> Result<Self, SessionError> {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(config.sprite);
        world.insert_resource(SpriteSheet::default());
        world.insert_resource(AnimationRegistry::new());
        world.insert_resource(AnimationForm::default());
        world.insert_resource(PlaybackScheduler::new(config.fps as i64));
        world.insert_resource(FrameTicker::default());
        world.insert_resource(HoveredFrame::default());
        world.insert_resource(NoticeBoard::default());
        world.insert_resource(config);

        setup_io(&mut world); // IoBridge and Messages<IoMessage>

        world.spawn(Observer::new(select_animation_observer));
        world.spawn(Observer::new(toggle_playback_observer));
        world.spawn(Observer::new(reset_playback_observer));
        world.spawn(Observer::new(seek_playback_observer));
        world.spawn(Observer::new(set_fps_observer));
        world.spawn(Observer::new(submit_animation_form_observer));
        world.spawn(Observer::new(edit_animation_observer));
        world.spawn(Observer::new(cancel_edit_observer));
        world.spawn(Observer::new(remove_animation_observer));
        world.spawn(Observer::new(set_sprite_config_observer));
        world.spawn(Observer::new(edit_config_field_observer));
        world.spawn(Observer::new(pointer_moved_observer));
        world.spawn(Observer::new(pointer_left_observer));
        world.spawn(Observer::new(copy_export_observer));
        world.spawn(Observer::new(save_export_observer));
        world.flush();

        let mut update = Schedule::default();
        update.add_systems(
            (
                // I/O replies first so a freshly loaded sheet is visible to
                // everything after it in the same pass.
                poll_io_messages,
                update_io_messages,
                apply_io_messages,
                announce_grid_layout,
                playback_tick,
            )
                .chain(),
        );
        update
            .initialize(&mut world)
            .map_err(|e| SessionError::Schedule(ToString::to_string(&e)))?;

        debug!("Session ready");
        Ok(Self { world, update })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for hosts that trigger their own events.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Run one pass: advance the clock by `dt_ms`, then the schedule.
    pub fn update(&mut self, dt_ms: f64) {
        update_world_time(&mut self.world, dt_ms);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Whether playback wants another refresh soon.
    pub fn wants_refresh(&self) -> bool {
        self.world.resource::<FrameTicker>().has_live()
    }

    pub fn now_ms(&self) -> f64 {
        self.world.resource::<WorldTime>().now_ms()
    }

    // --- sheet and grid ---

    /// Queue an image file for decoding. The sheet changes on a later update.
    pub fn load_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!("Loading spritesheet {}", path.display());
        self.world.resource::<IoBridge>().send(IoCmd::LoadImage { path });
    }

    /// Queue in-memory image bytes for decoding.
    pub fn load_image_bytes(&mut self, label: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.world.resource::<IoBridge>().send(IoCmd::DecodeImage {
            label: label.into(),
            bytes: bytes.into(),
        });
    }

    pub fn sheet(&self) -> &SpriteSheet {
        self.world.resource::<SpriteSheet>()
    }

    pub fn sprite_config(&self) -> SpriteConfig {
        *self.world.resource::<SpriteConfig>()
    }

    pub fn set_sprite_config(&mut self, config: SpriteConfig) {
        self.world.trigger(SetSpriteConfigEvent { config });
    }

    pub fn edit_config_field(&mut self, field: ConfigField, value: i64) {
        self.world.trigger(EditConfigFieldEvent { field, value });
    }

    /// Layout of the loaded sheet under the current configuration.
    pub fn layout(&self) -> GridLayout {
        self.sheet().layout(self.world.resource::<SpriteConfig>())
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.world.trigger(PointerMovedEvent { x, y });
    }

    pub fn pointer_left(&mut self) {
        self.world.trigger(PointerLeftEvent {});
    }

    pub fn hovered_frame(&self) -> Option<usize> {
        self.world.resource::<HoveredFrame>().0
    }

    // --- animations ---

    pub fn registry(&self) -> &AnimationRegistry {
        self.world.resource::<AnimationRegistry>()
    }

    /// Add an animation against the current grid.
    pub fn add_animation(
        &mut self,
        name: &str,
        frame_start: i64,
        frame_end: i64,
    ) -> Result<Animation, RegistryError> {
        let total = self.layout().total_frames;
        let added = self
            .world
            .resource_mut::<AnimationRegistry>()
            .add(name, frame_start, frame_end, total)?;
        info!("Added animation {} ({})", added.name, added.id);
        Ok(added)
    }

    /// Replace an animation's fields. When it is the one being previewed,
    /// playback restarts from its new first frame.
    pub fn update_animation(
        &mut self,
        id: AnimationId,
        name: &str,
        frame_start: i64,
        frame_end: i64,
    ) -> Result<Animation, RegistryError> {
        let total = self.layout().total_frames;
        let updated = self
            .world
            .resource_mut::<AnimationRegistry>()
            .update(id, name, frame_start, frame_end, total)?;
        if self.registry().selected() == Some(id) {
            self.world
                .resource_scope(|world, mut playback: Mut<PlaybackScheduler>| {
                    let mut ticker = world.resource_mut::<FrameTicker>();
                    playback.select_animation(Some(&updated), &mut *ticker);
                });
        }
        Ok(updated)
    }

    /// Delete an animation. Returns `false` for an unknown id.
    pub fn remove_animation(&mut self, id: AnimationId) -> bool {
        if self.registry().get(id).is_none() {
            return false;
        }
        self.world.trigger(RemoveAnimationEvent { id });
        true
    }

    pub fn select(&mut self, id: Option<AnimationId>) {
        self.world.trigger(SelectAnimationEvent { id });
    }

    pub fn form(&self) -> &AnimationForm {
        self.world.resource::<AnimationForm>()
    }

    pub fn form_mut(&mut self) -> Mut<'_, AnimationForm> {
        self.world.resource_mut::<AnimationForm>()
    }

    pub fn submit_form(&mut self) {
        self.world.trigger(SubmitAnimationFormEvent {});
    }

    pub fn edit_animation(&mut self, id: AnimationId) {
        self.world.trigger(EditAnimationEvent { id });
    }

    pub fn cancel_edit(&mut self) {
        self.world.trigger(CancelEditEvent {});
    }

    // --- playback ---

    pub fn playback(&self) -> &PlaybackScheduler {
        self.world.resource::<PlaybackScheduler>()
    }

    pub fn toggle_playback(&mut self) {
        self.world.trigger(TogglePlaybackEvent {});
    }

    pub fn reset_playback(&mut self) {
        self.world.trigger(ResetPlaybackEvent {});
    }

    pub fn seek(&mut self, frame: i64) {
        self.world.trigger(SeekPlaybackEvent { frame });
    }

    pub fn set_fps(&mut self, fps: i64) {
        self.world.trigger(SetFpsEvent { fps });
    }

    // --- export ---

    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(export_json(self.registry())?)
    }

    pub fn copy_export(&mut self) {
        self.world.trigger(CopyExportEvent {});
    }

    /// Write the export to `path`, or to the configured export path.
    pub fn save_export(&mut self, path: Option<PathBuf>) {
        self.world.trigger(SaveExportEvent { path });
    }

    // --- rendering ---

    pub fn render_preview(&self, canvas: &mut dyn Canvas) {
        render_preview_pass(&self.world, canvas);
    }

    pub fn render_player(&self, canvas: &mut dyn Canvas) -> Option<usize> {
        render_player_pass(&self.world, canvas)
    }

    // --- notices ---

    pub fn notices(&self) -> &[Notice] {
        self.world.resource::<NoticeBoard>().pending()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.world.resource_mut::<NoticeBoard>().drain()
    }

    /// Number of I/O commands whose reply has not been applied yet.
    pub fn pending_io(&self) -> usize {
        self.world.resource::<IoBridge>().in_flight()
    }

    /// Pump updates (with zero elapsed time) until every I/O command already
    /// sent has been answered and applied.
    pub fn settle_io(&mut self, timeout: Duration) -> Result<(), SessionError> {
        let start = Instant::now();
        loop {
            self.update(0.0);
            if self.pending_io() == 0 {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(SessionError::Timeout(timeout));
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Pump updates (with zero elapsed time) until a notice newer than the
    /// first `seen` pending ones arrives, and return it.
    ///
    /// Every I/O command ends in exactly one notice, but replies to commands
    /// sent earlier land first. The blocking helpers below call
    /// [`Session::settle_io`] before taking `seen`, so the notice they get
    /// belongs to their own command.
    pub fn wait_for_notice(
        &mut self,
        seen: usize,
        timeout: Duration,
    ) -> Result<Notice, SessionError> {
        let start = Instant::now();
        loop {
            self.update(0.0);
            if let Some(notice) = self.notices().get(seen) {
                return Ok(notice.clone());
            }
            if start.elapsed() >= timeout {
                return Err(SessionError::Timeout(timeout));
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Load an image and wait for the result.
    pub fn load_image_blocking(
        &mut self,
        path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<GridLayout, SessionError> {
        self.settle_io(timeout)?;
        let seen = self.notices().len();
        self.load_image(path);
        let notice = self.wait_for_notice(seen, timeout)?;
        match notice.level {
            NoticeLevel::Success => Ok(self.layout()),
            NoticeLevel::Error => Err(SessionError::Io(notice.text)),
        }
    }

    /// Write the export through the I/O thread and wait for the result.
    pub fn save_export_blocking(
        &mut self,
        path: Option<PathBuf>,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        if self.registry().is_empty() {
            return Err(SessionError::Io("No animations to export".to_string()));
        }
        self.settle_io(timeout)?;
        let seen = self.notices().len();
        self.save_export(path);
        self.expect_success(seen, timeout)
    }

    /// Copy the export to the clipboard and wait for the result.
    pub fn copy_export_blocking(&mut self, timeout: Duration) -> Result<(), SessionError> {
        if self.registry().is_empty() {
            return Err(SessionError::Io("No animations to export".to_string()));
        }
        self.settle_io(timeout)?;
        let seen = self.notices().len();
        self.copy_export();
        self.expect_success(seen, timeout)
    }

    fn expect_success(&mut self, seen: usize, timeout: Duration) -> Result<(), SessionError> {
        let notice = self.wait_for_notice(seen, timeout)?;
        match notice.level {
            NoticeLevel::Success => Ok(()),
            NoticeLevel::Error => Err(SessionError::Io(notice.text)),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        shutdown_io(&mut self.world);
    }
}
