use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use domain::{color::Color, palette::Palette};
use framepack_application::{
    error::{AppError, AppResult},
    ports::outgoing::palette_loader::PaletteLoaderPort,
};

#[derive(Debug, Deserialize)]
struct PaletteFileDto {
    #[serde(alias = "colors")]
    colours: Vec<[f64; 3]>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPaletteLoader;

impl JsonPaletteLoader {
    pub fn new() -> Self {
        Self
    }
}

fn palette_error(path: &Path, reason: impl fmt::Display) -> AppError {
    AppError::ConfigError {
        message: format!("Invalid palette file {}: {}", path.display(), reason),
    }
}

impl PaletteLoaderPort for JsonPaletteLoader {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> AppResult<Palette> {
        let contents = fs::read(path).map_err(|e| AppError::ConfigError {
            message: format!("Failed to read palette file {}: {}", path.display(), e),
        })?;

        let dto: PaletteFileDto =
            serde_json::from_slice(&contents).map_err(|e| palette_error(path, e))?;
        debug!("Palette file lists {} colours", dto.colours.len());

        let colors = dto
            .colours
            .into_iter()
            .map(|[r, g, b]| Color::checked(r, g, b))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| palette_error(path, e))?;

        Palette::new(colors).map_err(|e| palette_error(path, e))
    }
}
