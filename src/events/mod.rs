//! Event types and observers used by the editor session.
//!
//! User actions enter the session as events; the observers here apply them to
//! the resources and keep those resources consistent with each other.
//!
//! Submodules:
//! - [`animation`] – submit the form, start/cancel an edit, delete an animation
//! - [`export`] – copy or save the JSON export through the I/O thread
//! - [`io`] – commands and messages for the background I/O thread
//! - [`playback`] – play/pause, reset, seek and rate changes
//! - [`selection`] – choose which animation the player previews
//! - [`sheet`] – grid configuration edits and pointer hover
pub mod animation;
pub mod export;
pub mod io;
pub mod playback;
pub mod selection;
pub mod sheet;
