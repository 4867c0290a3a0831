//! Editor configuration resource.
//!
//! Session defaults loaded from an INI file: the initial sprite grid, the
//! preview rate and where exported JSON is written. Every key is optional;
//! missing keys keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [frame]
//! width = 32
//! height = 32
//! spacing = 0
//! offset_x = 0
//! offset_y = 0
//!
//! [playback]
//! fps = 12
//!
//! [export]
//! path = animations.json
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use thiserror::Error;

use crate::resources::playback::DEFAULT_FPS;
use crate::resources::spriteconfig::SpriteConfig;

const DEFAULT_EXPORT_PATH: &str = "animations.json";
const DEFAULT_CONFIG_PATH: &str = "./sprite-animator.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config file {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("Failed to save config file {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Grid used until the user edits it.
    pub sprite: SpriteConfig,
    /// Initial preview rate, clamped by the scheduler.
    pub fps: u32,
    /// Destination of the "download" action.
    pub export_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self {
            sprite: SpriteConfig::default(),
            fps: DEFAULT_FPS,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file. Missing keys retain their current value.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;

        let read_u32 = |section: &str, key: &str| -> Option<u32> {
            ini.getuint(section, key)
                .ok()
                .flatten()
                .map(|v| v.min(u32::MAX as u64) as u32)
        };

        if let Some(v) = read_u32("frame", "width") {
            self.sprite.frame_width = v;
        }
        if let Some(v) = read_u32("frame", "height") {
            self.sprite.frame_height = v;
        }
        if let Some(v) = read_u32("frame", "spacing") {
            self.sprite.spacing = v;
        }
        if let Some(v) = read_u32("frame", "offset_x") {
            self.sprite.offset_x = v;
        }
        if let Some(v) = read_u32("frame", "offset_y") {
            self.sprite.offset_y = v;
        }
        if let Some(v) = read_u32("playback", "fps") {
            self.fps = v;
        }
        if let Some(path) = ini.get("export", "path") {
            self.export_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: frame {}x{} spacing={} offset=({}, {}), fps={}, export={:?}",
            self.sprite.frame_width,
            self.sprite.frame_height,
            self.sprite.spacing,
            self.sprite.offset_x,
            self.sprite.offset_y,
            self.fps,
            self.export_path
        );
        Ok(())
    }

    /// Write every key to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.set("frame", "width", Some(self.sprite.frame_width.to_string()));
        ini.set("frame", "height", Some(self.sprite.frame_height.to_string()));
        ini.set("frame", "spacing", Some(self.sprite.spacing.to_string()));
        ini.set("frame", "offset_x", Some(self.sprite.offset_x.to_string()));
        ini.set("frame", "offset_y", Some(self.sprite.offset_y.to_string()));
        ini.set("playback", "fps", Some(self.fps.to_string()));
        ini.set(
            "export",
            "path",
            Some(self.export_path.to_string_lossy().into_owned()),
        );
        ini.write(&self.config_path).map_err(|source| ConfigError::Save {
            path: self.config_path.clone(),
            source,
        })?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sprite-animator-{}-{}.ini",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut config = EditorConfig::with_path(temp_path("missing"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.sprite, SpriteConfig::default());
        assert_eq!(config.fps, DEFAULT_FPS);
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let path = temp_path("partial");
        std::fs::write(&path, "[frame]\nwidth = 24\noffset_y = 3\n\n[playback]\nfps = 30\n").unwrap();
        let mut config = EditorConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.sprite.frame_width, 24);
        assert_eq!(config.sprite.frame_height, 32);
        assert_eq!(config.sprite.offset_y, 3);
        assert_eq!(config.fps, 30);
        assert_eq!(config.export_path, PathBuf::from(DEFAULT_EXPORT_PATH));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn save_then_load_restores_values() {
        let path = temp_path("roundtrip");
        let mut config = EditorConfig::with_path(&path);
        config.sprite = SpriteConfig::new(48, 16).with_spacing(2).with_offset(1, 5);
        config.fps = 8;
        config.export_path = PathBuf::from("out/anims.json");
        config.save_to_file().unwrap();

        let mut loaded = EditorConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_file(&path).ok();
    }
}
