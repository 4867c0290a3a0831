//! Playback control events.
//!
//! Each event maps to one [`PlaybackScheduler`] command. The observers resolve
//! the registry's selected animation and hand it, together with the session
//! clock and the [`FrameTicker`], to the scheduler. Commands issued with no
//! animation selected are ignored by the scheduler.
//!
//! # Related
//!
//! - [`crate::resources::playback`] – the state machine itself
//! - [`crate::systems::playback::playback_tick`] – advances while playing

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::animationstore::AnimationRegistry;
use crate::resources::playback::{FrameTicker, PlaybackScheduler};
use crate::resources::worldtime::WorldTime;

/// Play if stopped, pause if playing.
#[derive(Event, Debug, Clone, Copy)]
pub struct TogglePlaybackEvent {}

/// Back to the first frame, stopped.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetPlaybackEvent {}

/// Scrub to a frame (clamped into the range); stops playback.
#[derive(Event, Debug, Clone, Copy)]
pub struct SeekPlaybackEvent {
    pub frame: i64,
}

/// Change the preview rate (clamped to 1..=60).
#[derive(Event, Debug, Clone, Copy)]
pub struct SetFpsEvent {
    pub fps: i64,
}

pub fn toggle_playback_observer(
    _trigger: On<TogglePlaybackEvent>,
    registry: Res<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
    time: Res<WorldTime>,
) {
    debug!("TogglePlaybackEvent triggered");
    playback.toggle(registry.selected_animation(), time.now_ms(), &mut *ticker);
}

pub fn reset_playback_observer(
    _trigger: On<ResetPlaybackEvent>,
    registry: Res<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
) {
    debug!("ResetPlaybackEvent triggered");
    playback.reset(registry.selected_animation(), &mut *ticker);
}

pub fn seek_playback_observer(
    trigger: On<SeekPlaybackEvent>,
    registry: Res<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
) {
    let frame = trigger.event().frame;
    debug!("SeekPlaybackEvent triggered: {}", frame);
    playback.seek(frame, registry.selected_animation(), &mut *ticker);
}

pub fn set_fps_observer(trigger: On<SetFpsEvent>, mut playback: ResMut<PlaybackScheduler>) {
    playback.set_fps(trigger.event().fps);
    debug!("Playback rate set to {} fps", playback.fps());
}
