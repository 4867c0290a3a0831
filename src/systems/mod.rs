//! Editor systems.
//!
//! Functions run by the session schedule once per pass, plus the pure
//! helpers behind rendering and export.
//!
//! Submodules overview
//! - [`export`] – serialize the registry to the export JSON document
//! - [`io`] – the I/O thread and the systems that drain its replies
//! - [`playback`] – advance the previewed animation against the session clock
//! - [`render`] – draw the sheet preview and the player frame onto a canvas
//! - [`spritesheet`] – react to grid or sheet changes
//! - [`time`] – advance the session clock

pub mod export;
pub mod io;
pub mod playback;
pub mod render;
pub mod spritesheet;
pub mod time;
