//! Sprite animator library.
//!
//! Grid geometry, the animation registry, the playback scheduler and JSON
//! export for a sprite-sheet animation editor, exposed as ECS resources,
//! events and systems for the CLI, hosts and integration tests.

pub mod canvas;
pub mod events;
pub mod grid;
pub mod resources;
pub mod session;
pub mod systems;
