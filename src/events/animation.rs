//! Animation list events: submit the form, start/cancel an edit, delete.
//!
//! The observers here keep the registry, the form, the playback scheduler and
//! the notice board consistent with each other:
//!
//! - deleting the selected animation clears the selection and parks playback
//! - deleting the animation being edited cancels the edit
//! - editing the selected animation restarts its preview from the new start
//! - every outcome, success or rejection, posts a [`NoticeBoard`] entry

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::animationform::{AnimationForm, Submitted};
use crate::resources::animationstore::{AnimationId, AnimationRegistry};
use crate::resources::notices::NoticeBoard;
use crate::resources::playback::{FrameTicker, PlaybackScheduler};
use crate::resources::spriteconfig::SpriteConfig;
use crate::resources::spritesheet::SpriteSheet;

/// Add or update from the current [`AnimationForm`] contents.
#[derive(Event, Debug, Clone, Copy)]
pub struct SubmitAnimationFormEvent {}

/// Load an existing animation into the form.
#[derive(Event, Debug, Clone, Copy)]
pub struct EditAnimationEvent {
    pub id: AnimationId,
}

/// Leave edit mode and clear the form.
#[derive(Event, Debug, Clone, Copy)]
pub struct CancelEditEvent {}

#[derive(Event, Debug, Clone, Copy)]
pub struct RemoveAnimationEvent {
    pub id: AnimationId,
}

pub fn submit_animation_form_observer(
    _trigger: On<SubmitAnimationFormEvent>,
    mut form: ResMut<AnimationForm>,
    mut registry: ResMut<AnimationRegistry>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
    mut notices: ResMut<NoticeBoard>,
    sheet: Res<SpriteSheet>,
    config: Res<SpriteConfig>,
) {
    let total_frames = sheet.layout(&config).total_frames;
    match form.submit(&mut registry, total_frames) {
        Ok(submitted) => {
            notices.success(submitted.message());
            if let Submitted::Updated(animation) = &submitted {
                if registry.selected() == Some(animation.id) {
                    playback.select_animation(Some(animation), &mut *ticker);
                }
            }
        }
        Err(e) => notices.error(e.to_string()),
    }
}

pub fn edit_animation_observer(
    trigger: On<EditAnimationEvent>,
    mut form: ResMut<AnimationForm>,
    registry: Res<AnimationRegistry>,
) {
    let id = trigger.event().id;
    match registry.get(id) {
        Some(animation) => form.begin_edit(animation),
        None => debug!("EditAnimationEvent for unknown {}", id),
    }
}

pub fn cancel_edit_observer(_trigger: On<CancelEditEvent>, mut form: ResMut<AnimationForm>) {
    form.cancel_edit();
}

pub fn remove_animation_observer(
    trigger: On<RemoveAnimationEvent>,
    mut registry: ResMut<AnimationRegistry>,
    mut form: ResMut<AnimationForm>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
    mut notices: ResMut<NoticeBoard>,
) {
    let id = trigger.event().id;
    let Some(removed) = registry.remove(id) else {
        debug!("RemoveAnimationEvent for unknown {}", id);
        return;
    };
    form.forget(id);
    if removed.was_selected {
        playback.select_animation(None, &mut *ticker);
    }
    notices.success("Animation deleted successfully!");
}
