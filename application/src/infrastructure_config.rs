use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

use crate::error::{AppError, AppResult};
use domain::playback::{MAX_FPS, MIN_FPS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub encode: EncodeConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub frameskip: u32,
    pub max_frames: usize,
    pub palette_path: Option<PathBuf>,
    pub workers: usize,
    pub source: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "ffmpeg")]
    Ffmpeg,
    #[serde(rename = "image")]
    Image,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub fps: u32,
    pub decode_mode: DecodeMode,
    pub eager_limit_bytes: u64,
    pub start_paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    #[serde(rename = "eager")]
    Eager,
    #[serde(rename = "lazy")]
    Lazy,
    #[serde(rename = "auto")]
    Auto,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(8);

        Self {
            width: 64,
            height: 48,
            frameskip: 0,
            max_frames: 0,
            palette_path: None,
            workers,
            source: SourceKind::Auto,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            decode_mode: DecodeMode::Auto,
            eager_limit_bytes: 512 * 1024 * 1024,
            start_paused: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.encode.width == 0 || self.encode.height == 0 {
            return Err(AppError::ConfigError {
                message: "Width and height must be positive integers".to_string(),
            });
        }

        if self.encode.workers == 0 {
            return Err(AppError::ConfigError {
                message: "workers must be greater than 0".to_string(),
            });
        }

        if let Some(path) = &self.encode.palette_path {
            if path.as_os_str().is_empty() {
                return Err(AppError::ConfigError {
                    message: "palette_path cannot be empty".to_string(),
                });
            }
        }

        if !(MIN_FPS..=MAX_FPS).contains(&self.playback.fps) {
            return Err(AppError::ConfigError {
                message: format!("fps must be between {MIN_FPS} and {MAX_FPS}"),
            });
        }

        if self.playback.eager_limit_bytes == 0 {
            return Err(AppError::ConfigError {
                message: "eager_limit_bytes must be greater than 0".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "logging level cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
