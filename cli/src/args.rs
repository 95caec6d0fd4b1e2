use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use framepack_application::infrastructure_config::{DecodeMode, LogFormat, SourceKind};

#[derive(Debug, Parser)]
#[command(
    name = "framepack",
    version,
    about = "Convert videos into run-length encoded pixel documents and play them back"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter, e.g. `info` or `framepack=debug`. `RUST_LOG` wins if set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a video into a document next to it.
    Encode(EncodeArgs),
    /// Play a document in the terminal.
    Play(PlayArgs),
    /// Print document statistics.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Input video file, image, or directory of images.
    #[arg(long)]
    pub video: PathBuf,

    /// Target width in pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub width: i64,

    /// Target height in pixels.
    #[arg(long, allow_negative_numbers = true)]
    pub height: i64,

    /// Source frames to skip between saved frames (0 keeps every frame).
    #[arg(long, allow_negative_numbers = true)]
    pub frameskip: Option<i64>,

    /// JSON file with a `colours` array of `[r, g, b]` entries.
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Stop after this many saved frames (0 = no limit).
    #[arg(long, alias = "totalframes", allow_negative_numbers = true)]
    pub total_frames: Option<i64>,

    /// Frames encoded concurrently.
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long, value_enum)]
    pub source: Option<SourceArg>,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    pub document: PathBuf,

    #[arg(long)]
    pub fps: Option<u32>,

    #[arg(long, value_enum)]
    pub decode_mode: Option<DecodeModeArg>,

    /// Start with playback paused on the first frame.
    #[arg(long)]
    pub paused: bool,

    /// Show every frame once and exit instead of looping.
    #[arg(long, conflicts_with = "paused")]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    pub document: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Auto,
    Ffmpeg,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeModeArg {
    Eager,
    Lazy,
    Auto,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => Self::Json,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Auto => Self::Auto,
            SourceArg::Ffmpeg => Self::Ffmpeg,
            SourceArg::Image => Self::Image,
        }
    }
}

impl From<DecodeModeArg> for DecodeMode {
    fn from(arg: DecodeModeArg) -> Self {
        match arg {
            DecodeModeArg::Eager => Self::Eager,
            DecodeModeArg::Lazy => Self::Lazy,
            DecodeModeArg::Auto => Self::Auto,
        }
    }
}
