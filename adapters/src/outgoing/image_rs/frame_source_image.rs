use image::{
    AnimationDecoder, DynamicImage, ImageFormat, ImageReader, ImageResult, RgbImage,
    codecs::gif::GifDecoder,
};
use std::collections::VecDeque;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use domain::grid::{Dimensions, PixelGrid};
use framepack_application::{
    error::{AppError, AppResult},
    ports::outgoing::frame_source::{FrameSourcePort, FrameStream, SourceInfo},
};

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFrameSource;

impl ImageFrameSource {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(path: &Path) -> bool {
        path.is_dir() || ImageFormat::from_path(path).is_ok()
    }
}

impl FrameSourcePort for ImageFrameSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn open(&self, path: &Path) -> AppResult<Box<dyn FrameStream>> {
        if path.is_dir() {
            return Ok(Box::new(ImageSequenceStream::open(path)?));
        }

        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Gif) => Ok(Box::new(DecodedImageStream::animated_gif(path)?)),
            Ok(_) => Ok(Box::new(DecodedImageStream::still(path)?)),
            Err(e) => Err(AppError::SourceUnavailable {
                message: format!("Unsupported image file {}: {}", path.display(), e),
            }),
        }
    }
}

fn unavailable(path: &Path, error: impl fmt::Display) -> AppError {
    AppError::SourceUnavailable {
        message: format!("Could not open {}: {}", path.display(), error),
    }
}

fn codec_error(path: &Path, error: impl fmt::Display) -> AppError {
    AppError::CodecError {
        message: format!("Failed to decode {}: {}", path.display(), error),
    }
}

fn dimensions_of(image: &RgbImage) -> AppResult<Dimensions> {
    Dimensions::new(image.width(), image.height()).map_err(|e| AppError::CodecError {
        message: e.to_string(),
    })
}

fn to_grid(image: &RgbImage) -> AppResult<PixelGrid> {
    Ok(PixelGrid::from_rgb8(dimensions_of(image)?, image.as_raw())?)
}

fn load_rgb(path: &Path) -> ImageResult<RgbImage> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image.to_rgb8())
}

struct DecodedImageStream {
    info: SourceInfo,
    frames: VecDeque<RgbImage>,
}

impl DecodedImageStream {
    fn still(path: &Path) -> AppResult<Self> {
        let image = load_rgb(path).map_err(|e| unavailable(path, e))?;
        let info = SourceInfo {
            resolution: dimensions_of(&image)?,
            fps: None,
            frame_count: Some(1),
        };
        Ok(Self {
            info,
            frames: VecDeque::from([image]),
        })
    }

    fn animated_gif(path: &Path) -> AppResult<Self> {
        let reader = BufReader::new(File::open(path).map_err(|e| unavailable(path, e))?);
        let decoder = GifDecoder::new(reader).map_err(|e| unavailable(path, e))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| unavailable(path, e))?;

        let fps = frames.first().and_then(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            (numer > 0).then(|| f64::from(denom) * 1000.0 / f64::from(numer))
        });

        let frames: VecDeque<RgbImage> = frames
            .into_iter()
            .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8())
            .collect();

        let Some(first) = frames.front() else {
            return Err(AppError::SourceUnavailable {
                message: format!("{} contains no frames", path.display()),
            });
        };

        debug!("Decoded {} GIF frames", frames.len());
        let info = SourceInfo {
            resolution: dimensions_of(first)?,
            fps,
            frame_count: Some(frames.len() as u64),
        };
        Ok(Self { info, frames })
    }
}

impl FrameStream for DecodedImageStream {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> AppResult<Option<PixelGrid>> {
        self.frames.pop_front().as_ref().map(to_grid).transpose()
    }

    fn skip_frame(&mut self) -> AppResult<bool> {
        Ok(self.frames.pop_front().is_some())
    }
}

struct ImageSequenceStream {
    info: SourceInfo,
    paths: VecDeque<PathBuf>,
    decoded: u64,
}

impl ImageSequenceStream {
    fn open(dir: &Path) -> AppResult<Self> {
        let mut paths = fs::read_dir(dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<io::Result<Vec<_>>>()
            })
            .map_err(|e| unavailable(dir, e))?;
        paths.retain(|path| path.is_file() && ImageFormat::from_path(path).is_ok());
        paths.sort();

        let Some(first) = paths.first() else {
            return Err(AppError::SourceUnavailable {
                message: format!("No image files found in {}", dir.display()),
            });
        };

        let (width, height) =
            image::image_dimensions(first).map_err(|e| unavailable(first, e))?;
        let resolution = Dimensions::new(width, height).map_err(|e| unavailable(first, e))?;

        debug!("Found {} images in {}", paths.len(), dir.display());
        Ok(Self {
            info: SourceInfo {
                resolution,
                fps: None,
                frame_count: Some(paths.len() as u64),
            },
            paths: paths.into(),
            decoded: 0,
        })
    }
}

impl FrameStream for ImageSequenceStream {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn next_frame(&mut self) -> AppResult<Option<PixelGrid>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let image = load_rgb(&path).map_err(|e| {
            if self.decoded == 0 {
                unavailable(&path, e)
            } else {
                codec_error(&path, e)
            }
        })?;
        self.decoded += 1;
        to_grid(&image).map(Some)
    }

    fn skip_frame(&mut self) -> AppResult<bool> {
        Ok(self.paths.pop_front().is_some())
    }
}
