use std::fmt;

use domain::{
    document::VideoDocument,
    error::DomainError,
    frame::DocumentFrames,
    grid::PixelGrid,
    playback::PlaybackState,
};

use crate::{
    error::{AppError, AppResult},
    ports::outgoing::render_surface::RenderSurfacePort,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    Eager,
    Lazy,
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager => write!(f, "eager"),
            Self::Lazy => write!(f, "lazy"),
        }
    }
}

enum DecodedFrames {
    Eager(Vec<PixelGrid>),
    Lazy {
        document: VideoDocument,
        cached: Option<(usize, PixelGrid)>,
    },
}

impl DecodedFrames {
    fn get(&mut self, index: usize) -> AppResult<&PixelGrid> {
        match self {
            Self::Eager(frames) => frames.get(index).ok_or_else(|| missing_frame(index)),
            Self::Lazy { document, cached } => {
                if cached.as_ref().is_none_or(|(cached_index, _)| *cached_index != index) {
                    *cached = Some((index, decode_frame(document, index)?));
                }
                cached
                    .as_ref()
                    .map(|(_, grid)| grid)
                    .ok_or_else(|| missing_frame(index))
            }
        }
    }
}

fn missing_frame(index: usize) -> AppError {
    DomainError::CorruptData(format!("frame {index} does not exist")).into()
}

fn decode_frame(document: &VideoDocument, index: usize) -> AppResult<PixelGrid> {
    match document.frames() {
        DocumentFrames::Rle(frames) => {
            let frame = frames.get(index).ok_or_else(|| missing_frame(index))?;
            Ok(frame.decode(document.dimensions(), document.palette())?)
        }
        DocumentFrames::LegacyDense(grids) => {
            grids.get(index).cloned().ok_or_else(|| missing_frame(index))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered { frame: usize },
    Paused,
}

pub struct PlaybackSession {
    frames: DecodedFrames,
    state: PlaybackState,
}

impl PlaybackSession {
    pub fn eager(document: VideoDocument, fps: u32) -> AppResult<Self> {
        let state = PlaybackState::new(document.frame_count(), fps)?;
        let (dimensions, palette, frames) = document.into_parts();

        let decoded = match frames {
            DocumentFrames::LegacyDense(grids) => grids,
            DocumentFrames::Rle(encoded) => encoded
                .iter()
                .map(|frame| frame.decode(dimensions, palette.as_ref()))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            frames: DecodedFrames::Eager(decoded),
            state,
        })
    }

    pub fn lazy(document: VideoDocument, fps: u32) -> AppResult<Self> {
        let state = PlaybackState::new(document.frame_count(), fps)?;
        Ok(Self {
            frames: DecodedFrames::Lazy {
                document,
                cached: None,
            },
            state,
        })
    }

    #[must_use]
    pub fn strategy(&self) -> DecodeStrategy {
        match self.frames {
            DecodedFrames::Eager(_) => DecodeStrategy::Eager,
            DecodedFrames::Lazy { .. } => DecodeStrategy::Lazy,
        }
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlaybackState {
        &mut self.state
    }

    pub fn frame(&mut self, index: usize) -> AppResult<&PixelGrid> {
        self.frames.get(index)
    }

    pub fn render_current(&mut self, surface: &mut dyn RenderSurfacePort) -> AppResult<usize> {
        let index = self.state.current_frame();
        let frame = self.frames.get(index)?;
        surface.render(frame, &self.state)?;
        Ok(index)
    }

    pub fn tick(&mut self, surface: &mut dyn RenderSurfacePort) -> AppResult<TickOutcome> {
        if !self.state.is_playing() {
            return Ok(TickOutcome::Paused);
        }

        let frame = self.render_current(surface)?;
        self.state.advance();
        Ok(TickOutcome::Rendered { frame })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::color::{Color, ColorIndex};
    use domain::frame::EncodedFrame;
    use domain::grid::Dimensions;
    use domain::palette::Palette;
    use domain::rle::Run;

    #[derive(Default)]
    struct RecordingSurface {
        rendered: Vec<(usize, Color)>,
    }

    impl RenderSurfacePort for RecordingSurface {
        fn render(&mut self, frame: &PixelGrid, state: &PlaybackState) -> AppResult<()> {
            self.rendered
                .push((state.current_frame(), frame.pixels()[0]));
            Ok(())
        }

        fn render_error(&mut self, _message: &str) -> AppResult<()> {
            Ok(())
        }
    }

    fn document() -> VideoDocument {
        let dims = Dimensions::new(2, 1).unwrap();
        let palette = Palette::new(vec![Color::BLACK, Color::WHITE]).unwrap();
        let frames = DocumentFrames::Rle(vec![
            EncodedFrame::Indexed(vec![Run::new(ColorIndex(0), 2)]),
            EncodedFrame::Indexed(vec![Run::new(ColorIndex(1), 2)]),
            EncodedFrame::Indexed(vec![Run::new(ColorIndex(0), 1), Run::new(ColorIndex(1), 1)]),
        ]);
        VideoDocument::from_frames(dims, Some(palette), frames).unwrap()
    }

    #[test]
    fn ticks_render_in_order_and_loop() {
        let mut session = PlaybackSession::eager(document(), 30).unwrap();
        let mut surface = RecordingSurface::default();

        let outcomes: Vec<TickOutcome> = (0..4)
            .map(|_| session.tick(&mut surface).unwrap())
            .collect();

        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Rendered { frame: 0 },
                TickOutcome::Rendered { frame: 1 },
                TickOutcome::Rendered { frame: 2 },
                TickOutcome::Rendered { frame: 0 },
            ]
        );
        assert_eq!(surface.rendered[1], (1, Color::WHITE));
        assert_eq!(session.state().current_frame(), 1);
    }

    #[test]
    fn paused_sessions_do_not_render() {
        let mut session = PlaybackSession::eager(document(), 30).unwrap();
        let mut surface = RecordingSurface::default();
        session.state_mut().pause();

        assert_eq!(session.tick(&mut surface).unwrap(), TickOutcome::Paused);
        assert!(surface.rendered.is_empty());
        assert_eq!(session.state().current_frame(), 0);
    }

    #[test]
    fn lazy_and_eager_decode_the_same_pixels() {
        let mut eager = PlaybackSession::eager(document(), 30).unwrap();
        let mut lazy = PlaybackSession::lazy(document(), 30).unwrap();
        assert_eq!(lazy.strategy(), DecodeStrategy::Lazy);

        for index in [2, 0, 1, 1] {
            let expected = eager.frame(index).unwrap().clone();
            assert_eq!(lazy.frame(index).unwrap(), &expected);
        }
        assert!(lazy.frame(3).is_err());
    }
}
