use crate::error::{DomainError, DomainResult};
use crate::frame::{DocumentFrames, EncodedFrame, FrameLayout};
use crate::grid::Dimensions;
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDocument {
    dimensions: Dimensions,
    palette: Option<Palette>,
    frames: DocumentFrames,
}

impl VideoDocument {
    pub fn from_frames(
        dimensions: Dimensions,
        palette: Option<Palette>,
        frames: DocumentFrames,
    ) -> DomainResult<Self> {
        match &frames {
            DocumentFrames::Rle(encoded) => {
                for (index, frame) in encoded.iter().enumerate() {
                    frame
                        .validate(dimensions, palette.as_ref())
                        .map_err(|e| at_frame(index, e))?;
                }
            }
            DocumentFrames::LegacyDense(grids) => {
                for (index, grid) in grids.iter().enumerate() {
                    if grid.dimensions() != dimensions {
                        return Err(at_frame(
                            index,
                            DomainError::LengthMismatch {
                                expected: dimensions.pixel_count(),
                                actual: grid.pixels().len(),
                            },
                        ));
                    }
                }
            }
        }

        Ok(Self {
            dimensions,
            palette,
            frames,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    #[must_use]
    pub fn frames(&self) -> &DocumentFrames {
        &self.frames
    }

    #[must_use]
    pub fn layout(&self) -> FrameLayout {
        self.frames.layout()
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn into_parts(self) -> (Dimensions, Option<Palette>, DocumentFrames) {
        (self.dimensions, self.palette, self.frames)
    }

    #[must_use]
    pub fn stats(&self) -> DocumentStats {
        let pixels_per_frame = self.dimensions.pixel_count();
        let total_pixels = pixels_per_frame * self.frame_count();
        let total_runs = match &self.frames {
            DocumentFrames::Rle(frames) => frames.iter().map(EncodedFrame::run_count).sum(),
            DocumentFrames::LegacyDense(_) => total_pixels,
        };

        DocumentStats {
            frame_count: self.frame_count(),
            pixels_per_frame,
            total_pixels,
            total_runs,
        }
    }
}

fn at_frame(index: usize, error: DomainError) -> DomainError {
    match error {
        DomainError::CorruptData(message) => {
            DomainError::CorruptData(format!("frame {index}: {message}"))
        }
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentStats {
    pub frame_count: usize,
    pub pixels_per_frame: usize,
    pub total_pixels: usize,
    pub total_runs: usize,
}

impl DocumentStats {
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.total_runs == 0 {
            return 1.0;
        }
        self.total_pixels as f64 / self.total_runs as f64
    }
}

#[derive(Debug)]
pub struct DocumentBuilder {
    dimensions: Dimensions,
    palette: Option<Palette>,
    frames: Vec<EncodedFrame>,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new(dimensions: Dimensions, palette: Option<Palette>) -> Self {
        Self {
            dimensions,
            palette,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: EncodedFrame) -> DomainResult<()> {
        if let Err(error) = frame.validate(self.dimensions, self.palette.as_ref()) {
            return Err(DomainError::InvariantViolation(format!(
                "encoded frame {} is invalid: {error}",
                self.frames.len()
            )));
        }
        self.frames.push(frame);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> VideoDocument {
        VideoDocument {
            dimensions: self.dimensions,
            palette: self.palette,
            frames: DocumentFrames::Rle(self.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorIndex};
    use crate::grid::PixelGrid;
    use crate::rle::Run;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height).unwrap()
    }

    #[test]
    fn rejects_frame_one_pixel_short() {
        let frames = DocumentFrames::Rle(vec![
            EncodedFrame::Rgb(vec![Run::new(Color::BLACK, 100)]),
            EncodedFrame::Rgb(vec![Run::new(Color::BLACK, 50), Run::new(Color::WHITE, 49)]),
        ]);
        assert_eq!(
            VideoDocument::from_frames(dims(10, 10), None, frames),
            Err(DomainError::LengthMismatch {
                expected: 100,
                actual: 99
            })
        );
    }

    #[test]
    fn corrupt_errors_name_the_frame() {
        let palette = Palette::new(vec![Color::BLACK]).unwrap();
        let frames = DocumentFrames::Rle(vec![EncodedFrame::Indexed(vec![Run::new(
            ColorIndex(3),
            4,
        )])]);
        let error = VideoDocument::from_frames(dims(2, 2), Some(palette), frames).unwrap_err();
        assert!(matches!(
            &error,
            DomainError::CorruptData(message) if message.starts_with("frame 0:")
        ));
    }

    #[test]
    fn legacy_frames_must_match_resolution() {
        let frames =
            DocumentFrames::LegacyDense(vec![PixelGrid::uniform(dims(2, 2), Color::BLACK)]);
        assert!(VideoDocument::from_frames(dims(2, 3), None, frames).is_err());

        let frames =
            DocumentFrames::LegacyDense(vec![PixelGrid::uniform(dims(2, 2), Color::BLACK)]);
        let document = VideoDocument::from_frames(dims(2, 2), None, frames).unwrap();
        assert_eq!(document.layout(), FrameLayout::LegacyDense);
        assert_eq!(document.stats().compression_ratio(), 1.0);
    }

    #[test]
    fn builder_reports_broken_frames_as_invariant_violations() {
        let mut builder = DocumentBuilder::new(dims(2, 2), None);
        builder
            .push(EncodedFrame::Rgb(vec![Run::new(Color::WHITE, 4)]))
            .unwrap();
        let result = builder.push(EncodedFrame::Rgb(vec![Run::new(Color::WHITE, 3)]));
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));

        let document = builder.finish();
        assert_eq!(document.frame_count(), 1);
        assert_eq!(document.layout(), FrameLayout::Rle);
        assert_eq!(document.stats().total_runs, 1);
        assert_eq!(document.stats().compression_ratio(), 4.0);
    }
}
