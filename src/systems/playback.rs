//! Playback tick system.
//!
//! Runs every pass. The scheduler itself decides whether anything is due, so
//! this is a no-op while stopped or between frame boundaries.
use bevy_ecs::prelude::*;

use crate::resources::animationstore::AnimationRegistry;
use crate::resources::playback::{FrameTicker, PlaybackScheduler};
use crate::resources::worldtime::WorldTime;

pub fn playback_tick(
    time: Res<WorldTime>,
    registry: Res<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
) {
    if !playback.is_playing() {
        return;
    }
    playback.on_tick(time.now_ms(), registry.selected_animation(), &mut *ticker);
}
