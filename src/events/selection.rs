//! Animation selection event and observer.
//!
//! Emitting a [`SelectAnimationEvent`] moves the registry's selection pointer
//! and re-parks the [`PlaybackScheduler`] on the new animation's first frame,
//! stopped. Selecting an id the registry does not know is allowed; playback
//! then treats it as "no animation".

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::animationstore::{AnimationId, AnimationRegistry};
use crate::resources::playback::{FrameTicker, PlaybackScheduler};

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectAnimationEvent {
    pub id: Option<AnimationId>,
}

/// Observer applying a selection change.
pub fn select_animation_observer(
    trigger: On<SelectAnimationEvent>,
    mut registry: ResMut<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
) {
    let id = trigger.event().id;
    debug!("SelectAnimationEvent triggered: {:?}", id);
    registry.select(id);
    playback.select_animation(registry.selected_animation(), &mut *ticker);
}
