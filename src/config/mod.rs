use crate::global;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recorder: RecorderConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// File name of the recording inside the private data directory.
    pub file_name: String,
    /// Rate the recording is written at. 8000 Hz is narrowband speech.
    pub sample_rate: u32,
    /// Capture device name. Uses the host's default input when unset.
    pub input_device: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub volume: f32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            file_name: "sensor_temp.wav".to_string(),
            sample_rate: 8000,
            input_device: None,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        config
            .validate()
            .with_context(|| format!("Invalid config file {:?}", config_path))?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recorder.sample_rate == 0 {
            bail!("recorder.sample_rate must be greater than zero");
        }
        if self.recorder.file_name.trim().is_empty() {
            bail!("recorder.file_name must not be empty");
        }
        if self.playback.volume.is_nan() || self.playback.volume < 0.0 {
            bail!("playback.volume must be zero or more");
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
