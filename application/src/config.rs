use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::infrastructure_config::{DecodeMode, EncodeConfig, PlaybackConfig};
use domain::grid::Dimensions;
use domain::selection::FrameSelector;

#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub target: Dimensions,
    pub selector: FrameSelector,
    pub palette_path: Option<PathBuf>,
    pub workers: usize,
}

impl EncodeSettings {
    pub fn from_config(config: &EncodeConfig) -> AppResult<Self> {
        let target =
            Dimensions::new(config.width, config.height).map_err(|e| AppError::ConfigError {
                message: e.to_string(),
            })?;

        Ok(Self {
            target,
            selector: FrameSelector::new(config.frameskip).with_max_frames(config.max_frames),
            palette_path: config.palette_path.clone(),
            workers: config.workers.max(1),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlaybackSettings {
    pub fps: u32,
    pub decode_mode: DecodeMode,
    pub eager_limit_bytes: u64,
    pub start_paused: bool,
}

impl From<&PlaybackConfig> for PlaybackSettings {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            fps: config.fps,
            decode_mode: config.decode_mode,
            eager_limit_bytes: config.eager_limit_bytes,
            start_paused: config.start_paused,
        }
    }
}
