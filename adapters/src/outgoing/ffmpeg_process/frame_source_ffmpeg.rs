use serde::Deserialize;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, instrument, warn};

use domain::grid::{Dimensions, PixelGrid};
use framepack_application::{
    error::{AppError, AppResult},
    ports::outgoing::frame_source::{FrameSourcePort, FrameStream, SourceInfo},
};

#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            ffprobe_bin: PathBuf::from("ffprobe"),
        }
    }
}

pub struct FfmpegFrameSource {
    config: FfmpegConfig,
}

impl FfmpegFrameSource {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    fn probe(&self, path: &Path) -> AppResult<SourceInfo> {
        let output = Command::new(&self.config.ffprobe_bin)
            .args(["-v", "error", "-select_streams", "v:0", "-show_entries"])
            .arg("stream=width,height,r_frame_rate,avg_frame_rate,nb_frames")
            .args(["-of", "json"])
            .arg(path)
            .output()
            .map_err(|e| AppError::SourceUnavailable {
                message: format!(
                    "Failed to run {}: {}",
                    self.config.ffprobe_bin.display(),
                    e
                ),
            })?;

        if !output.status.success() {
            return Err(AppError::SourceUnavailable {
                message: format!(
                    "Could not open video {}: {}",
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        parse_probe(&output.stdout)
    }
}

impl FrameSourcePort for FfmpegFrameSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn open(&self, path: &Path) -> AppResult<Box<dyn FrameStream>> {
        let info = self.probe(path)?;
        debug!("Probed {} at {:?} fps", info.resolution, info.fps);

        let mut child = Command::new(&self.config.ffmpeg_bin)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppError::SourceUnavailable {
                message: format!("Failed to run {}: {}", self.config.ffmpeg_bin.display(), e),
            })?;

        let Some(stdout) = child.stdout.take() else {
            return Err(AppError::SourceUnavailable {
                message: "ffmpeg stdout was not captured".to_string(),
            });
        };

        let frames = RawFrameReader::new(BufReader::new(stdout), info.resolution);
        Ok(Box::new(FfmpegStream {
            info,
            child,
            frames,
            frames_read: 0,
            finished: false,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

fn parse_probe(stdout: &[u8]) -> AppResult<SourceInfo> {
    let probe: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| AppError::CodecError {
        message: format!("Unexpected ffprobe output: {e}"),
    })?;

    let Some(stream) = probe.streams.into_iter().next() else {
        return Err(AppError::SourceUnavailable {
            message: "No video stream found".to_string(),
        });
    };

    let resolution =
        Dimensions::new(stream.width, stream.height).map_err(|e| AppError::SourceUnavailable {
            message: e.to_string(),
        })?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate));

    Ok(SourceInfo {
        resolution,
        fps,
        frame_count: stream.nb_frames.and_then(|n| n.parse().ok()),
    })
}

fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (numer, denom) = match rate.split_once('/') {
        Some((numer, denom)) => (numer.parse::<f64>().ok()?, denom.parse::<f64>().ok()?),
        None => (rate.parse::<f64>().ok()?, 1.0),
    };
    (numer > 0.0 && denom > 0.0).then(|| numer / denom)
}

struct RawFrameReader<R> {
    reader: R,
    resolution: Dimensions,
    buffer: Vec<u8>,
}

impl<R: Read> RawFrameReader<R> {
    fn new(reader: R, resolution: Dimensions) -> Self {
        Self {
            reader,
            resolution,
            buffer: vec![0; resolution.pixel_count() * 3],
        }
    }

    fn read_frame(&mut self) -> io::Result<bool> {
        match self.reader.read_exact(&mut self.buffer) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn next_grid(&mut self) -> AppResult<Option<PixelGrid>> {
        if !self.read_frame()? {
            return Ok(None);
        }
        Ok(Some(PixelGrid::from_rgb8(self.resolution, &self.buffer)?))
    }
}

struct FfmpegStream {
    info: SourceInfo,
    child: Child,
    frames: RawFrameReader<BufReader<ChildStdout>>,
    frames_read: u64,
    finished: bool,
}

impl FfmpegStream {
    fn finish(&mut self) -> AppResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let status = self.child.wait()?;
        if status.success() {
            debug!("ffmpeg finished after {} frames", self.frames_read);
            return Ok(());
        }

        let message = format!("ffmpeg exited with {status}");
        if self.frames_read == 0 {
            Err(AppError::SourceUnavailable { message })
        } else {
            Err(AppError::CodecError { message })
        }
    }

    fn advance<T>(&mut self, frame: Option<T>) -> AppResult<Option<T>> {
        match frame {
            Some(frame) => {
                self.frames_read += 1;
                Ok(Some(frame))
            }
            None => {
                self.finish()?;
                Ok(None)
            }
        }
    }
}

impl FrameStream for FfmpegStream {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> AppResult<Option<PixelGrid>> {
        if self.finished {
            return Ok(None);
        }
        let frame = self.frames.next_grid()?;
        self.advance(frame)
    }

    fn skip_frame(&mut self) -> AppResult<bool> {
        if self.finished {
            return Ok(false);
        }
        let frame = self.frames.read_frame()?.then_some(());
        Ok(self.advance(frame)?.is_some())
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.child.kill() {
            warn!("Failed to stop ffmpeg: {}", e);
        }
        if let Err(e) = self.child.wait() {
            warn!("Failed to reap ffmpeg: {}", e);
        }
    }
}
