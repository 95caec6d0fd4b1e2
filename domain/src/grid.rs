use std::fmt;

use crate::color::Color;
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> DomainResult<Self> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidDimensions(format!(
                "{width}x{height}: width and height must be positive"
            )));
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    dimensions: Dimensions,
    pixels: Vec<Color>,
}

impl PixelGrid {
    pub fn new(dimensions: Dimensions, pixels: Vec<Color>) -> DomainResult<Self> {
        if pixels.len() != dimensions.pixel_count() {
            return Err(DomainError::LengthMismatch {
                expected: dimensions.pixel_count(),
                actual: pixels.len(),
            });
        }
        Ok(Self { dimensions, pixels })
    }

    pub(crate) fn from_parts(dimensions: Dimensions, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), dimensions.pixel_count());
        Self { dimensions, pixels }
    }

    #[must_use]
    pub fn uniform(dimensions: Dimensions, color: Color) -> Self {
        Self {
            dimensions,
            pixels: vec![color; dimensions.pixel_count()],
        }
    }

    pub fn from_rgb8(dimensions: Dimensions, samples: &[u8]) -> DomainResult<Self> {
        let expected = dimensions.pixel_count() * 3;
        if samples.len() != expected {
            return Err(DomainError::LengthMismatch {
                expected: dimensions.pixel_count(),
                actual: samples.len() / 3,
            });
        }

        let pixels = samples
            .chunks_exact(3)
            .map(|rgb| match rgb {
                [r, g, b] => Color::from_rgb8(*r, *g, *b),
                _ => Color::BLACK,
            })
            .collect();

        Ok(Self { dimensions, pixels })
    }

    pub fn from_rows(dimensions: Dimensions, rows: Vec<Vec<Color>>) -> DomainResult<Self> {
        if rows.len() != dimensions.height() as usize {
            let actual = rows.iter().map(Vec::len).sum();
            return Err(DomainError::LengthMismatch {
                expected: dimensions.pixel_count(),
                actual,
            });
        }

        let mut pixels = Vec::with_capacity(dimensions.pixel_count());
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != dimensions.width() as usize {
                return Err(DomainError::CorruptData(format!(
                    "row {y} has {} pixels, expected {}",
                    row.len(),
                    dimensions.width()
                )));
            }
            pixels.extend(row);
        }

        Ok(Self { dimensions, pixels })
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.height()
    }

    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixels
            .get(y as usize * self.width() as usize + x as usize)
    }

    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Color]> {
        let width = self.width() as usize;
        let start = y as usize * width;
        self.pixels.get(start..start + width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(Dimensions::new(0, 4).is_err());
        assert!(Dimensions::new(4, 0).is_err());
        assert_eq!(Dimensions::new(4, 3).unwrap().pixel_count(), 12);
    }

    #[test]
    fn new_enforces_pixel_count() {
        let dims = Dimensions::new(2, 2).unwrap();
        let result = PixelGrid::new(dims, vec![Color::BLACK; 3]);
        assert_eq!(
            result,
            Err(DomainError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn from_rgb8_normalizes_samples() {
        let dims = Dimensions::new(2, 1).unwrap();
        let grid = PixelGrid::from_rgb8(dims, &[255, 0, 0, 0, 0, 255]).unwrap();
        assert_eq!(grid.get(0, 0), Some(&Color::new(1.0, 0.0, 0.0)));
        assert_eq!(grid.get(1, 0), Some(&Color::new(0.0, 0.0, 1.0)));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn from_rows_checks_row_shape() {
        let dims = Dimensions::new(2, 2).unwrap();
        let good = vec![vec![Color::BLACK, Color::WHITE], vec![Color::WHITE, Color::BLACK]];
        let grid = PixelGrid::from_rows(dims, good).unwrap();
        assert_eq!(grid.row(1), Some(&[Color::WHITE, Color::BLACK][..]));

        let short = vec![vec![Color::BLACK, Color::WHITE]];
        assert!(matches!(
            PixelGrid::from_rows(dims, short),
            Err(DomainError::LengthMismatch { expected: 4, actual: 2 })
        ));

        let ragged = vec![vec![Color::BLACK], vec![Color::WHITE, Color::BLACK]];
        assert!(matches!(
            PixelGrid::from_rows(dims, ragged),
            Err(DomainError::CorruptData(_))
        ));
    }
}
