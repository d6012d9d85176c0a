use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::line_wrapper::DEFAULT_MAX_CHARS_PER_LINE;
use crate::styles::SubtitleStyle;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Root directory holding one sub-directory per session
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,

    /// Subtitle synthesis settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Encoder settings
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for subtitle synthesis
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleConfig {
    /// Character budget of one display line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Style used when a render request does not name one
    #[serde(default)]
    pub default_style: SubtitleStyle,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            default_style: SubtitleStyle::default(),
        }
    }
}

/// Configuration for the ffmpeg encoder
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EncoderConfig {
    /// ffmpeg executable name or path
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Video codec used when burning in subtitles
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// Audio codec used when burning in subtitles
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Encode timeout in seconds
    #[serde(default = "default_encode_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            timeout_secs: default_encode_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_sessions_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("clipsub").join("sessions"))
        .unwrap_or_else(|| PathBuf::from("sessions"))
}

fn default_max_chars_per_line() -> usize {
    DEFAULT_MAX_CHARS_PER_LINE
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_encode_timeout_secs() -> u64 {
    600 // 10 minutes, clips are short but burn-in re-encodes every frame
}

impl Config {
    /// Load configuration from `path`, creating it with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        FileManager::atomic_write(path, &config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.subtitles.max_chars_per_line == 0 {
            return Err(anyhow!("subtitles.max_chars_per_line must be greater than 0"));
        }

        if self.encoder.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("encoder.ffmpeg_path must not be empty"));
        }

        if self.encoder.timeout_secs == 0 {
            return Err(anyhow!("encoder.timeout_secs must be greater than 0"));
        }

        if self.sessions_dir.as_os_str().is_empty() {
            return Err(anyhow!("sessions_dir must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            sessions_dir: default_sessions_dir(),
            subtitles: SubtitleConfig::default(),
            encoder: EncoderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
