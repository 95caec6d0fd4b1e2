use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

use framepack_application::error::{AppError, AppResult};
use framepack_application::infrastructure_config::{Config, DecodeMode, LogFormat, SourceKind};

use crate::args::{Cli, Command, EncodeArgs, PlayArgs};

const TOML_FILE: &str = "framepack.toml";
const JSON_FILE: &str = "framepack.json";
const ENV_PREFIX: &str = "FRAMEPACK_";

#[derive(Debug, Default, Serialize)]
pub struct ConfigOverrides {
    logging: LoggingOverrides,
    encode: EncodeOverrides,
    playback: PlaybackOverrides,
}

#[derive(Debug, Default, Serialize)]
struct LoggingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Serialize)]
struct EncodeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frameskip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_frames: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<SourceKind>,
}

#[derive(Debug, Default, Serialize)]
struct PlaybackOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decode_mode: Option<DecodeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_paused: Option<bool>,
}

fn config_error(message: &str) -> AppError {
    AppError::ConfigError {
        message: message.to_string(),
    }
}

fn positive(value: i64) -> AppResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| config_error("Width and height must be positive integers"))
}

impl ConfigOverrides {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let mut overrides = Self {
            logging: LoggingOverrides {
                level: cli.log_level.clone(),
                format: cli.log_format.map(LogFormat::from),
            },
            ..Self::default()
        };

        match &cli.command {
            Command::Encode(args) => overrides.encode = EncodeOverrides::from_args(args)?,
            Command::Play(args) => overrides.playback = PlaybackOverrides::from_args(args),
            Command::Inspect(_) => {}
        }

        Ok(overrides)
    }
}

impl EncodeOverrides {
    fn from_args(args: &EncodeArgs) -> AppResult<Self> {
        let frameskip = args
            .frameskip
            .map(|skip| {
                u32::try_from(skip)
                    .map_err(|_| config_error("Frameskip must be a non-negative integer"))
            })
            .transpose()?;

        let max_frames = args
            .total_frames
            .map(|total| {
                usize::try_from(total)
                    .map_err(|_| config_error("Total frames must be a non-negative integer"))
            })
            .transpose()?;

        Ok(Self {
            width: Some(positive(args.width)?),
            height: Some(positive(args.height)?),
            frameskip,
            max_frames,
            palette_path: args.palette.clone(),
            workers: args.workers,
            source: args.source.map(SourceKind::from),
        })
    }
}

impl PlaybackOverrides {
    fn from_args(args: &PlayArgs) -> Self {
        Self {
            fps: args.fps,
            decode_mode: args.decode_mode.map(DecodeMode::from),
            start_paused: args.paused.then_some(true),
        }
    }
}

pub fn load_config(overrides: &ConfigOverrides) -> AppResult<Config> {
    let default_config = Config::default();
    let mut figment = Figment::from(Serialized::defaults(default_config));

    if Path::new(TOML_FILE).exists() {
        figment = figment.merge(Toml::file(TOML_FILE));
    }

    if Path::new(JSON_FILE).exists() {
        figment = figment.merge(Json::file(JSON_FILE));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}
