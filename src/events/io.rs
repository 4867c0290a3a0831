//! Commands for, and replies from, the background I/O thread.
//!
//! Decoding an uploaded sheet, writing the clipboard and writing the export
//! file all happen off the main thread. Each command gets exactly one reply.

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::message::Message;
use image::RgbaImage;

/// Commands sent *to* the I/O thread.
#[derive(Debug, Clone)]
pub enum IoCmd {
    /// Read and decode an image file.
    LoadImage { path: PathBuf },
    /// Decode an image already in memory (drag-drop, paste, tests).
    DecodeImage { label: String, bytes: Arc<[u8]> },
    /// Put text on the system clipboard.
    CopyText { text: String },
    /// Write a file, replacing any previous content.
    WriteFile { path: PathBuf, contents: String },
    Shutdown,
}

/// Replies sent *back* from the I/O thread.
#[derive(Message, Debug, Clone)]
pub enum IoMessage {
    ImageLoaded { label: String, image: Arc<RgbaImage> },
    ImageFailed { label: String, error: String },
    TextCopied,
    CopyFailed { error: String },
    FileWritten { path: PathBuf },
    WriteFailed { path: PathBuf, error: String },
}
