use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use framepack_application::{
    error::AppResult,
    infrastructure_config::SourceKind,
    ports::outgoing::frame_source::{DynFrameSourcePort, FrameSourcePort, FrameStream},
};

use crate::outgoing::{
    ffmpeg_process::frame_source_ffmpeg::{FfmpegConfig, FfmpegFrameSource},
    image_rs::frame_source_image::ImageFrameSource,
};

pub struct SelectingFrameSource {
    kind: SourceKind,
    image: DynFrameSourcePort,
    ffmpeg: DynFrameSourcePort,
}

impl SelectingFrameSource {
    pub fn new(kind: SourceKind, ffmpeg_config: FfmpegConfig) -> Self {
        Self::with_sources(
            kind,
            Arc::new(ImageFrameSource::new()),
            Arc::new(FfmpegFrameSource::new(ffmpeg_config)),
        )
    }

    pub fn with_sources(
        kind: SourceKind,
        image: DynFrameSourcePort,
        ffmpeg: DynFrameSourcePort,
    ) -> Self {
        Self {
            kind,
            image,
            ffmpeg,
        }
    }

    fn select(&self, path: &Path) -> (&'static str, &DynFrameSourcePort) {
        match self.kind {
            SourceKind::Image => ("image", &self.image),
            SourceKind::Ffmpeg => ("ffmpeg", &self.ffmpeg),
            SourceKind::Auto if ImageFrameSource::supports(path) => ("image", &self.image),
            SourceKind::Auto => ("ffmpeg", &self.ffmpeg),
        }
    }
}

impl FrameSourcePort for SelectingFrameSource {
    fn open(&self, path: &Path) -> AppResult<Box<dyn FrameStream>> {
        let (name, source) = self.select(path);
        debug!("Opening {} with the {} decoder", path.display(), name);
        source.open(path)
    }
}
