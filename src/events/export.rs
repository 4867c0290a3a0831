//! Export actions: copy the JSON to the clipboard or write it to a file.
//!
//! Both hand the serialized document to the I/O thread and return at once;
//! the outcome arrives later as an [`IoMessage`](crate::events::io::IoMessage)
//! and becomes a notice. With no animations defined there is nothing to export
//! and the actions do nothing.

use std::path::PathBuf;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::events::io::IoCmd;
use crate::resources::animationstore::AnimationRegistry;
use crate::resources::editorconfig::EditorConfig;
use crate::resources::io::IoBridge;
use crate::resources::notices::NoticeBoard;
use crate::systems::export::{export_json, export_summary};

#[derive(Event, Debug, Clone, Copy)]
pub struct CopyExportEvent {}

/// Write the export to `path`, or to the configured export path when `None`.
#[derive(Event, Debug, Clone)]
pub struct SaveExportEvent {
    pub path: Option<PathBuf>,
}

fn serialize(registry: &AnimationRegistry, notices: &mut NoticeBoard) -> Option<String> {
    if registry.is_empty() {
        debug!("Nothing to export");
        return None;
    }
    match export_json(registry) {
        Ok(json) => {
            info!("Exporting {}", export_summary(registry, &json));
            Some(json)
        }
        Err(e) => {
            notices.error(format!("Failed to serialize animations: {}", e));
            None
        }
    }
}

pub fn copy_export_observer(
    _trigger: On<CopyExportEvent>,
    registry: Res<AnimationRegistry>,
    bridge: Res<IoBridge>,
    mut notices: ResMut<NoticeBoard>,
) {
    if let Some(text) = serialize(&registry, &mut notices) {
        bridge.send(IoCmd::CopyText { text });
    }
}

pub fn save_export_observer(
    trigger: On<SaveExportEvent>,
    registry: Res<AnimationRegistry>,
    config: Res<EditorConfig>,
    bridge: Res<IoBridge>,
    mut notices: ResMut<NoticeBoard>,
) {
    let path = trigger
        .event()
        .path
        .clone()
        .unwrap_or_else(|| config.export_path.clone());
    if let Some(contents) = serialize(&registry, &mut notices) {
        bridge.send(IoCmd::WriteFile { path, contents });
    }
}
