//! Animation registry resource.
//!
//! The [`AnimationRegistry`] owns every named frame range defined over the
//! current sheet, in insertion order, together with the selection pointer.
//! Ranges are validated against the sheet's frame count when they are added
//! or edited; they are not re-validated when the grid later shrinks.
//!
//! # Related
//!
//! - [`crate::resources::animationform::AnimationForm`] – add/edit form state
//! - [`crate::resources::playback::PlaybackScheduler`] – plays the selected range
//! - [`crate::systems::export`] – serializes [`ExportDocument`]

use std::fmt;

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session-unique animation identifier. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim-{}", self.0)
    }
}

/// A named, inclusive range of frame indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub id: AnimationId,
    pub name: String,
    pub frame_start: usize,
    pub frame_end: usize,
}

impl Animation {
    /// Last frame of the range. The fields are public, so a hand-built
    /// inverted range is read as the single frame `frame_start`.
    pub fn last_frame(&self) -> usize {
        self.frame_end.max(self.frame_start)
    }

    /// Number of frames in the range (both ends inclusive).
    pub fn frame_count(&self) -> usize {
        self.last_frame() - self.frame_start + 1
    }

    pub fn contains(&self, frame: usize) -> bool {
        (self.frame_start..=self.last_frame()).contains(&frame)
    }
}

/// Reasons an add or edit is rejected. The attempted change is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Animation name is required")]
    EmptyName,
    #[error("{}", range_message(.total_frames))]
    RangeOutOfBounds { total_frames: usize },
    #[error("Frame start must be less than or equal to frame end")]
    InvertedRange { frame_start: i64, frame_end: i64 },
}

fn range_message(total_frames: &usize) -> String {
    match *total_frames {
        0 => "No frames available: load a spritesheet with a valid frame size".to_string(),
        n => format!("Frame range must be between 0 and {}", n - 1),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no animation with id {0}")]
    UnknownAnimation(AnimationId),
}

/// Outcome of [`AnimationRegistry::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub animation: Animation,
    /// The removed animation was selected; the selection is now empty and any
    /// external pointer to it must be cleared too.
    pub was_selected: bool,
}

/// One element of the exported JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub name: String,
    pub frame_start: usize,
    pub frame_end: usize,
}

/// The interchange document: registry order, ids omitted.
pub type ExportDocument = Vec<ExportEntry>;

/// Check a candidate range. Returns the trimmed name and the unsigned bounds.
fn validate(
    name: &str,
    frame_start: i64,
    frame_end: i64,
    total_frames: usize,
) -> Result<(String, usize, usize), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let last = total_frames as i64 - 1;
    if frame_start < 0 || frame_end > last {
        return Err(ValidationError::RangeOutOfBounds { total_frames });
    }
    if frame_start > frame_end {
        return Err(ValidationError::InvertedRange {
            frame_start,
            frame_end,
        });
    }
    Ok((name.to_string(), frame_start as usize, frame_end as usize))
}

/// Ordered store of animations plus the selection pointer.
#[derive(Resource, Debug, Default)]
pub struct AnimationRegistry {
    animations: Vec<Animation>,
    positions: FxHashMap<AnimationId, usize>,
    selected: Option<AnimationId>,
    next_id: u64,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a new animation with a fresh id.
    pub fn add(
        &mut self,
        name: &str,
        frame_start: i64,
        frame_end: i64,
        total_frames: usize,
    ) -> Result<Animation, ValidationError> {
        let (name, frame_start, frame_end) = validate(name, frame_start, frame_end, total_frames)?;
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        let animation = Animation {
            id,
            name,
            frame_start,
            frame_end,
        };
        self.positions.insert(id, self.animations.len());
        self.animations.push(animation.clone());
        debug!(
            "Added animation {} '{}' [{}..={}]",
            id, animation.name, frame_start, frame_end
        );
        Ok(animation)
    }

    /// Validate and replace the animation `id` in place.
    pub fn update(
        &mut self,
        id: AnimationId,
        name: &str,
        frame_start: i64,
        frame_end: i64,
        total_frames: usize,
    ) -> Result<Animation, RegistryError> {
        let position = *self
            .positions
            .get(&id)
            .ok_or(RegistryError::UnknownAnimation(id))?;
        let (name, frame_start, frame_end) = validate(name, frame_start, frame_end, total_frames)?;
        let slot = &mut self.animations[position];
        slot.name = name;
        slot.frame_start = frame_start;
        slot.frame_end = frame_end;
        debug!(
            "Updated animation {} '{}' [{}..={}]",
            id, slot.name, frame_start, frame_end
        );
        Ok(slot.clone())
    }

    /// Remove the animation `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: AnimationId) -> Option<Removed> {
        let position = self.positions.remove(&id)?;
        let animation = self.animations.remove(position);
        for later in &self.animations[position..] {
            if let Some(p) = self.positions.get_mut(&later.id) {
                *p -= 1;
            }
        }
        let was_selected = self.selected == Some(id);
        if was_selected {
            self.selected = None;
        }
        debug!("Removed animation {} '{}'", id, animation.name);
        Some(Removed {
            animation,
            was_selected,
        })
    }

    /// Point the selection at `id` (or clear it). The id is not checked.
    pub fn select(&mut self, id: Option<AnimationId>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<AnimationId> {
        self.selected
    }

    /// The selected animation, if the pointer resolves to one.
    pub fn selected_animation(&self) -> Option<&Animation> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.positions.get(&id).map(|&p| &self.animations[p])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Project the registry into the exported form.
    pub fn to_export_document(&self) -> ExportDocument {
        self.animations
            .iter()
            .map(|a| ExportEntry {
                name: a.name.clone(),
                frame_start: a.frame_start,
                frame_end: a.frame_end,
            })
            .collect()
    }
}
