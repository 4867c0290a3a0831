//! Frame under the pointer in the sheet preview.

use bevy_ecs::prelude::Resource;

/// `Some(index)` while the pointer is over a populated frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoveredFrame(pub Option<usize>);
