//! Sheet-level input events: grid configuration edits and pointer movement
//! over the preview.
//!
//! Pointer coordinates are in image pixels. Hosts that show the sheet scaled
//! convert first with [`crate::grid::display_to_image`].

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::hover::HoveredFrame;
use crate::resources::spriteconfig::{ConfigField, SpriteConfig};
use crate::resources::spritesheet::SpriteSheet;

/// Replace the whole grid configuration.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetSpriteConfigEvent {
    pub config: SpriteConfig,
}

/// Edit one configuration field from raw (possibly negative) input.
#[derive(Event, Debug, Clone, Copy)]
pub struct EditConfigFieldEvent {
    pub field: ConfigField,
    pub value: i64,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PointerMovedEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct PointerLeftEvent {}

pub fn set_sprite_config_observer(
    trigger: On<SetSpriteConfigEvent>,
    mut config: ResMut<SpriteConfig>,
) {
    let next = trigger.event().config;
    if *config != next {
        *config = next;
    }
}

pub fn edit_config_field_observer(
    trigger: On<EditConfigFieldEvent>,
    mut config: ResMut<SpriteConfig>,
) {
    let event = trigger.event();
    let next = config.set_field(event.field, event.value);
    debug!("Config field {:?} set to {}", event.field, event.value);
    if *config != next {
        *config = next;
    }
}

pub fn pointer_moved_observer(
    trigger: On<PointerMovedEvent>,
    sheet: Res<SpriteSheet>,
    config: Res<SpriteConfig>,
    mut hovered: ResMut<HoveredFrame>,
) {
    let event = trigger.event();
    let frame = sheet.hit_test(event.x, event.y, &config);
    if hovered.0 != frame {
        hovered.0 = frame;
    }
}

pub fn pointer_left_observer(_trigger: On<PointerLeftEvent>, mut hovered: ResMut<HoveredFrame>) {
    if hovered.0.is_some() {
        hovered.0 = None;
    }
}
