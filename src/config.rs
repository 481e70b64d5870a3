use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::effects::UnmutePolicy;
use crate::error::ConfigError;

/// Engine tuning, loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,

    /// Frames rendered per lock of the graph
    pub block_frames: usize,

    /// Master level at startup and after unmute (0.0-1.0)
    pub default_volume: f32,

    /// Gain of the background-music bus, under the master level
    pub music_volume: f32,

    /// Melody passes kept scheduled ahead of the clock
    pub lookahead_loops: u32,

    /// What unmuting restores
    pub unmute: UnmutePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_frames: 512,
            default_volume: 0.3,
            music_volume: 0.05,
            lookahead_loops: 11, // the immediate loop plus ten ahead
            unmute: UnmutePolicy::RestoreDefault,
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;
        tracing::info!("Loaded audio config from: {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No audio config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// Platform config location, e.g. `~/.config/PixelPet/audio.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("PixelPet"))
            .unwrap_or_else(|| PathBuf::from("config"))
            .join("audio.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }
        if self.block_frames == 0 {
            return Err(ConfigError::Invalid("block_frames must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(ConfigError::Invalid(format!(
                "default_volume {} outside 0.0-1.0",
                self.default_volume
            )));
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(ConfigError::Invalid(format!(
                "music_volume {} outside 0.0-1.0",
                self.music_volume
            )));
        }
        if self.lookahead_loops == 0 {
            return Err(ConfigError::Invalid("lookahead_loops must be at least 1".into()));
        }
        Ok(())
    }
}
