use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use domain::frame::EncodedFrame;
use domain::grid::{Dimensions, PixelGrid};
use domain::palette::Palette;
use domain::sampler;

pub const DOCUMENT_EXTENSION: &str = "json";

#[must_use]
pub fn encode_frame(
    grid: &PixelGrid,
    target: Dimensions,
    palette: Option<&Palette>,
) -> EncodedFrame {
    let sampled = sampler::sample(grid, target);
    EncodedFrame::from_grid(&sampled, palette)
}

pub fn output_path_for(video_path: &Path) -> AppResult<PathBuf> {
    let output = video_path.with_extension(DOCUMENT_EXTENSION);
    if output == video_path {
        return Err(AppError::ConfigError {
            message: format!(
                "Input {} already has the .{DOCUMENT_EXTENSION} extension and would be overwritten",
                video_path.display()
            ),
        });
    }
    Ok(output)
}

#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let size = bytes as f64;
    if size < KB {
        format!("{bytes} bytes")
    } else if size < MB {
        format!("{:.2} KB", size / KB)
    } else {
        format!("{:.2} MB", size / MB)
    }
}
