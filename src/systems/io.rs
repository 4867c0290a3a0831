//! Background I/O thread and the systems that bridge it with the ECS world.
//!
//! - [`io_thread`] runs on its own OS thread, decodes images, writes the
//!   clipboard and writes files in response to [`IoCmd`]s, answering each with
//!   one [`IoMessage`].
//! - [`poll_io_messages`] non-blockingly drains replies into
//!   `Messages<IoMessage>` each frame.
//! - [`update_io_messages`] advances the message queue.
//! - [`apply_io_messages`] folds replies into session state and notices.
//!
//! Nothing on the main thread ever waits for the worker. A failed command
//! only produces an error notice; the sheet, config and registry are left as
//! they were.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;
use log::{debug, info, warn};

use crate::events::io::{IoCmd, IoMessage};
use crate::resources::animationstore::AnimationRegistry;
use crate::resources::hover::HoveredFrame;
use crate::resources::io::IoBridge;
use crate::resources::notices::NoticeBoard;
use crate::resources::playback::{FrameTicker, PlaybackScheduler};
use crate::resources::spritesheet::SpriteSheet;

pub const NOT_AN_IMAGE: &str = "Please upload a valid image file";

/// Decode an image file, guessing the format from its content.
pub fn decode_file(path: &Path) -> Result<RgbaImage, String> {
    let reader = image::io::Reader::open(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    if reader.format().is_none() {
        return Err(NOT_AN_IMAGE.to_string());
    }
    reader
        .decode()
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Decode an in-memory image, guessing the format from its content.
pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, String> {
    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    if reader.format().is_none() {
        return Err(NOT_AN_IMAGE.to_string());
    }
    reader
        .decode()
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Entry point of the I/O thread.
///
/// Blocks on the command channel and handles one command at a time until it
/// receives [`IoCmd::Shutdown`] or the sender side is dropped. The system
/// clipboard handle is opened on first use and kept for the life of the
/// thread, since some platforms drop clipboard contents with the handle.
pub fn io_thread(rx_cmd: Receiver<IoCmd>, tx_msg: Sender<IoMessage>) {
    debug!("[io] thread starting (id={:?})", std::thread::current().id());
    let mut clipboard: Option<arboard::Clipboard> = None;

    while let Ok(cmd) = rx_cmd.recv() {
        let reply = match cmd {
            IoCmd::LoadImage { path } => {
                let label = path.display().to_string();
                match decode_file(&path) {
                    Ok(image) => IoMessage::ImageLoaded {
                        label,
                        image: Arc::new(image),
                    },
                    Err(error) => IoMessage::ImageFailed { label, error },
                }
            }
            IoCmd::DecodeImage { label, bytes } => match decode_bytes(&bytes) {
                Ok(image) => IoMessage::ImageLoaded {
                    label,
                    image: Arc::new(image),
                },
                Err(error) => IoMessage::ImageFailed { label, error },
            },
            IoCmd::CopyText { text } => {
                if clipboard.is_none() {
                    clipboard = arboard::Clipboard::new()
                        .map_err(|e| warn!("[io] clipboard unavailable: {}", e))
                        .ok();
                }
                match clipboard.as_mut() {
                    Some(cb) => match cb.set_text(text) {
                        Ok(()) => IoMessage::TextCopied,
                        Err(e) => IoMessage::CopyFailed {
                            error: e.to_string(),
                        },
                    },
                    None => IoMessage::CopyFailed {
                        error: "clipboard unavailable".to_string(),
                    },
                }
            }
            IoCmd::WriteFile { path, contents } => {
                match write_file(&path, &contents) {
                    Ok(()) => IoMessage::FileWritten { path },
                    Err(e) => IoMessage::WriteFailed {
                        path,
                        error: e.to_string(),
                    },
                }
            }
            IoCmd::Shutdown => break,
        };
        if tx_msg.send(reply).is_err() {
            break;
        }
    }
    debug!("[io] thread exiting");
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

/// Drain pending replies from the I/O thread into the ECS message queue.
pub fn poll_io_messages(bridge: Res<IoBridge>, mut writer: MessageWriter<IoMessage>) {
    let replies: Vec<IoMessage> = bridge.rx_msg.try_iter().collect();
    if replies.is_empty() {
        return;
    }
    bridge.mark_received(replies.len());
    writer.write_batch(replies);
}

/// Advance the ECS message queue for [`IoMessage`]. Run after
/// [`poll_io_messages`].
pub fn update_io_messages(mut messages: ResMut<Messages<IoMessage>>) {
    messages.update();
}

/// Apply I/O replies to the session.
///
/// A loaded image replaces the sheet, clears the hover and parks playback on
/// the selected animation's first frame. Every reply posts a notice.
pub fn apply_io_messages(
    mut reader: MessageReader<IoMessage>,
    mut sheet: ResMut<SpriteSheet>,
    mut hovered: ResMut<HoveredFrame>,
    mut playback: ResMut<PlaybackScheduler>,
    mut ticker: ResMut<FrameTicker>,
    registry: Res<AnimationRegistry>,
    mut notices: ResMut<NoticeBoard>,
) {
    for message in reader.read() {
        match message {
            IoMessage::ImageLoaded { label, image } => {
                info!(
                    "Loaded spritesheet {} ({}x{})",
                    label,
                    image.width(),
                    image.height()
                );
                sheet.set(label.clone(), Arc::clone(image));
                hovered.0 = None;
                playback.select_animation(registry.selected_animation(), &mut *ticker);
                notices.success("Spritesheet uploaded successfully!");
            }
            IoMessage::ImageFailed { label, error } => {
                warn!("Failed to load spritesheet {}: {}", label, error);
                if error == NOT_AN_IMAGE {
                    notices.error(NOT_AN_IMAGE);
                } else {
                    notices.error(format!("Failed to load spritesheet: {}", error));
                }
            }
            IoMessage::TextCopied => notices.success("JSON copied to clipboard!"),
            IoMessage::CopyFailed { error } => {
                warn!("Clipboard write failed: {}", error);
                notices.error("Failed to copy JSON");
            }
            IoMessage::FileWritten { path } => {
                info!("Wrote {}", path.display());
                notices.success("JSON file downloaded!");
            }
            IoMessage::WriteFailed { path, error } => {
                notices.error(format!("Failed to write {}: {}", path.display(), error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_bytes() {
        let img = decode_bytes(&png_bytes(12, 7)).unwrap();
        assert_eq!(img.dimensions(), (12, 7));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert_eq!(
            decode_bytes(b"hello, this is not a picture").unwrap_err(),
            NOT_AN_IMAGE
        );
    }

    #[test]
    fn thread_answers_every_command() {
        let (tx_cmd, rx_cmd) = crossbeam_channel::unbounded();
        let (tx_msg, rx_msg) = crossbeam_channel::unbounded();
        let handle = std::thread::spawn(move || io_thread(rx_cmd, tx_msg));

        tx_cmd
            .send(IoCmd::DecodeImage {
                label: "mem".to_string(),
                bytes: Arc::from(png_bytes(4, 4)),
            })
            .unwrap();
        tx_cmd
            .send(IoCmd::DecodeImage {
                label: "junk".to_string(),
                bytes: Arc::from(&b"junk"[..]),
            })
            .unwrap();
        tx_cmd.send(IoCmd::Shutdown).unwrap();
        handle.join().unwrap();

        let replies: Vec<_> = rx_msg.try_iter().collect();
        assert_eq!(replies.len(), 2);
        assert!(matches!(&replies[0], IoMessage::ImageLoaded { label, .. } if label == "mem"));
        assert!(matches!(&replies[1], IoMessage::ImageFailed { label, .. } if label == "junk"));
    }

    #[test]
    fn write_file_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("sprite-animator-io-{}", std::process::id()));
        let path = dir.join("nested").join("out.json");
        write_file(&path, "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        std::fs::remove_dir_all(&dir).ok();
    }
}
