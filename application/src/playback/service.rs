use std::mem;
use std::path::Path;
use tracing::{info, instrument};

use domain::{color::Color, document::VideoDocument};

use crate::{
    config::PlaybackSettings,
    error::AppResult,
    infrastructure_config::DecodeMode,
    ports::{
        incoming::playback::LoadPlaybackUseCase, outgoing::document_store::DynDocumentStorePort,
    },
};

use super::session::{DecodeStrategy, PlaybackSession};

pub struct PlaybackService {
    document_store: DynDocumentStorePort,
}

impl PlaybackService {
    pub fn new(document_store: DynDocumentStorePort) -> Self {
        Self { document_store }
    }
}

#[must_use]
pub fn decoded_size_bytes(document: &VideoDocument) -> u64 {
    let pixels = document.dimensions().pixel_count() as u64;
    let frames = document.frame_count() as u64;
    pixels
        .saturating_mul(frames)
        .saturating_mul(mem::size_of::<Color>() as u64)
}

#[must_use]
pub fn choose_strategy(document: &VideoDocument, settings: &PlaybackSettings) -> DecodeStrategy {
    match settings.decode_mode {
        DecodeMode::Eager => DecodeStrategy::Eager,
        DecodeMode::Lazy => DecodeStrategy::Lazy,
        DecodeMode::Auto => {
            if decoded_size_bytes(document) <= settings.eager_limit_bytes {
                DecodeStrategy::Eager
            } else {
                DecodeStrategy::Lazy
            }
        }
    }
}

impl LoadPlaybackUseCase for PlaybackService {
    #[instrument(skip(self, settings), fields(path = %path.display()))]
    fn load_session(&self, path: &Path, settings: PlaybackSettings) -> AppResult<PlaybackSession> {
        let document = self.document_store.read(path)?;
        let strategy = choose_strategy(&document, &settings);

        info!(
            "Loaded {} frames at {} ({} layout, palette: {}), decoding {}",
            document.frame_count(),
            document.dimensions(),
            document.layout(),
            document
                .palette()
                .map_or_else(|| "none".to_string(), |p| format!("{} colors", p.len())),
            strategy
        );

        let mut session = match strategy {
            DecodeStrategy::Eager => PlaybackSession::eager(document, settings.fps)?,
            DecodeStrategy::Lazy => PlaybackSession::lazy(document, settings.fps)?,
        };

        if settings.start_paused {
            session.state_mut().pause();
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use domain::color::Color;
    use domain::error::DomainError;
    use domain::frame::{DocumentFrames, EncodedFrame};
    use domain::grid::Dimensions;
    use domain::rle::Run;

    use crate::error::AppError;
    use crate::ports::outgoing::document_store::DocumentStorePort;

    struct FixedStore(Result<VideoDocument, DomainError>);

    impl DocumentStorePort for FixedStore {
        fn write(&self, _path: &Path, _document: &VideoDocument) -> AppResult<u64> {
            Ok(0)
        }

        fn read(&self, _path: &Path) -> AppResult<VideoDocument> {
            self.0.clone().map_err(AppError::from)
        }
    }

    fn document(frames: usize) -> VideoDocument {
        let dims = Dimensions::new(4, 4).unwrap();
        let frames = DocumentFrames::Rle(
            (0..frames)
                .map(|_| EncodedFrame::Rgb(vec![Run::new(Color::WHITE, 16)]))
                .collect(),
        );
        VideoDocument::from_frames(dims, None, frames).unwrap()
    }

    fn settings(decode_mode: DecodeMode, eager_limit_bytes: u64) -> PlaybackSettings {
        PlaybackSettings {
            fps: 200,
            decode_mode,
            eager_limit_bytes,
            start_paused: false,
        }
    }

    #[test]
    fn auto_mode_switches_on_decoded_size() {
        let doc = document(10);
        let size = decoded_size_bytes(&doc);
        assert_eq!(size, 10 * 16 * mem::size_of::<Color>() as u64);

        assert_eq!(
            choose_strategy(&doc, &settings(DecodeMode::Auto, size)),
            DecodeStrategy::Eager
        );
        assert_eq!(
            choose_strategy(&doc, &settings(DecodeMode::Auto, size - 1)),
            DecodeStrategy::Lazy
        );
        assert_eq!(
            choose_strategy(&doc, &settings(DecodeMode::Eager, 1)),
            DecodeStrategy::Eager
        );
    }

    #[test]
    fn load_clamps_fps_and_honours_start_paused() {
        let service = PlaybackService::new(Arc::new(FixedStore(Ok(document(3)))));
        let mut config = settings(DecodeMode::Auto, u64::MAX);
        config.start_paused = true;

        let session = service.load_session(Path::new("clip.json"), config).unwrap();
        assert_eq!(session.strategy(), DecodeStrategy::Eager);
        assert_eq!(session.state().fps(), 120);
        assert_eq!(session.state().total_frames(), 3);
        assert!(!session.state().is_playing());
    }

    #[test]
    fn corrupt_documents_fail_the_whole_load() {
        let error = DomainError::LengthMismatch {
            expected: 100,
            actual: 99,
        };
        let service = PlaybackService::new(Arc::new(FixedStore(Err(error))));
        let result = service.load_session(
            Path::new("clip.json"),
            settings(DecodeMode::Eager, u64::MAX),
        );
        assert!(result.is_err_and(|e| e.is_corrupt_document()));
    }
}
