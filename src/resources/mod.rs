//! ECS resources held by the editor session.
//!
//! This module groups the long-lived state injected into the ECS world and
//! accessed by systems and observers. Each submodule documents the semantics
//! and intended usage of its resource(s).
//!
//! Overview
//! - `animationform` – the add/edit form and its submit logic
//! - `animationstore` – the ordered animation registry and the selection
//! - `editorconfig` – INI-backed session defaults
//! - `hover` – frame currently under the pointer
//! - `io` – bridge and channels for the background I/O thread
//! - `notices` – user-facing success/error notifications
//! - `playback` – the preview scheduler and the frame ticker
//! - `spriteconfig` – grid parameters
//! - `spritesheet` – the decoded sheet, once loaded
//! - `worldtime` – session clock
pub mod animationform;
pub mod animationstore;
pub mod editorconfig;
pub mod hover;
pub mod io;
pub mod notices;
pub mod playback;
pub mod spriteconfig;
pub mod spritesheet;
pub mod worldtime;
