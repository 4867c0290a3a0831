//! Add/edit form state for animations.
//!
//! The form mirrors what a panel shows: a name, a start frame, an end frame
//! and whether it is currently editing an existing entry. Submitting routes
//! to [`AnimationRegistry::add`] or [`AnimationRegistry::update`]. A rejected
//! submission leaves the form as typed so it can be corrected.

use bevy_ecs::prelude::Resource;

use crate::resources::animationstore::{Animation, AnimationId, AnimationRegistry, RegistryError};

/// What a successful [`AnimationForm::submit`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Added(Animation),
    Updated(Animation),
}

impl Submitted {
    pub fn animation(&self) -> &Animation {
        match self {
            Submitted::Added(a) | Submitted::Updated(a) => a,
        }
    }

    /// Confirmation text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Submitted::Added(_) => "Animation added successfully!",
            Submitted::Updated(_) => "Animation updated successfully!",
        }
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationForm {
    pub name: String,
    pub frame_start: i64,
    pub frame_end: i64,
    editing: Option<AnimationId>,
}

impl AnimationForm {
    pub fn editing(&self) -> Option<AnimationId> {
        self.editing
    }

    /// Load an existing animation into the form for editing.
    pub fn begin_edit(&mut self, animation: &Animation) {
        self.name = animation.name.clone();
        self.frame_start = animation.frame_start as i64;
        self.frame_end = animation.frame_end as i64;
        self.editing = Some(animation.id);
    }

    pub fn cancel_edit(&mut self) {
        *self = Self::default();
    }

    /// Forget the edit target if it was removed from the registry.
    pub fn forget(&mut self, id: AnimationId) {
        if self.editing == Some(id) {
            self.cancel_edit();
        }
    }

    pub fn submit(
        &mut self,
        registry: &mut AnimationRegistry,
        total_frames: usize,
    ) -> Result<Submitted, RegistryError> {
        let submitted = match self.editing {
            Some(id) => Submitted::Updated(registry.update(
                id,
                &self.name,
                self.frame_start,
                self.frame_end,
                total_frames,
            )?),
            None => Submitted::Added(registry.add(
                &self.name,
                self.frame_start,
                self.frame_end,
                total_frames,
            )?),
        };
        *self = Self::default();
        Ok(submitted)
    }
}
