use std::fmt;

use crate::color::{Color, ColorIndex};
use crate::error::{DomainError, DomainResult};
use crate::grid::{Dimensions, PixelGrid};
use crate::palette::Palette;
use crate::rle::{self, Run};

#[derive(Debug, Clone, PartialEq)]
pub enum EncodedFrame {
    Indexed(Vec<Run<ColorIndex>>),
    Rgb(Vec<Run<Color>>),
}

impl EncodedFrame {
    #[must_use]
    pub fn from_grid(grid: &PixelGrid, palette: Option<&Palette>) -> Self {
        match palette {
            Some(palette) => Self::Indexed(rle::encode(&palette.quantize(grid.pixels()))),
            None => Self::Rgb(rle::encode(grid.pixels())),
        }
    }

    #[must_use]
    pub fn run_count(&self) -> usize {
        match self {
            Self::Indexed(runs) => runs.len(),
            Self::Rgb(runs) => runs.len(),
        }
    }

    pub fn pixel_count(&self) -> DomainResult<usize> {
        match self {
            Self::Indexed(runs) => rle::decoded_len(runs),
            Self::Rgb(runs) => rle::decoded_len(runs),
        }
    }

    pub fn validate(&self, dimensions: Dimensions, palette: Option<&Palette>) -> DomainResult<()> {
        let expected = dimensions.pixel_count();
        let actual = self.pixel_count()?;
        if actual != expected {
            return Err(DomainError::LengthMismatch { expected, actual });
        }

        match (self, palette) {
            (Self::Indexed(runs), Some(palette)) => {
                for run in runs {
                    palette.resolve(run.value)?;
                }
                Ok(())
            }
            (Self::Indexed(_), None) => Err(DomainError::CorruptData(
                "index runs in a document without a palette".to_string(),
            )),
            (Self::Rgb(_), Some(_)) => Err(DomainError::CorruptData(
                "color runs in a document with a palette".to_string(),
            )),
            (Self::Rgb(_), None) => Ok(()),
        }
    }

    pub fn decode(
        &self,
        dimensions: Dimensions,
        palette: Option<&Palette>,
    ) -> DomainResult<PixelGrid> {
        let expected = Some(dimensions.pixel_count());
        let pixels = match (self, palette) {
            (Self::Indexed(runs), Some(palette)) => {
                rle::decode_with(runs, expected, |index| palette.resolve(*index))?
            }
            (Self::Rgb(runs), None) => rle::decode(runs, expected)?,
            _ => {
                self.validate(dimensions, palette)?;
                return Err(DomainError::CorruptData(
                    "frame kind does not match the document palette".to_string(),
                ));
            }
        };
        PixelGrid::new(dimensions, pixels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    LegacyDense,
    Rle,
}

impl fmt::Display for FrameLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyDense => write!(f, "legacy-dense"),
            Self::Rle => write!(f, "rle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentFrames {
    LegacyDense(Vec<PixelGrid>),
    Rle(Vec<EncodedFrame>),
}

impl DocumentFrames {
    #[must_use]
    pub fn layout(&self) -> FrameLayout {
        match self {
            Self::LegacyDense(_) => FrameLayout::LegacyDense,
            Self::Rle(_) => FrameLayout::Rle,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::LegacyDense(frames) => frames.len(),
            Self::Rle(frames) => frames.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
