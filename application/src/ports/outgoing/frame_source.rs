use std::path::Path;
use std::sync::Arc;

use crate::error::AppResult;
use domain::grid::{Dimensions, PixelGrid};

#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub resolution: Dimensions,
    pub fps: Option<f64>,
    pub frame_count: Option<u64>,
}

pub trait FrameStream: Send {
    fn info(&self) -> &SourceInfo;

    fn next_frame(&mut self) -> AppResult<Option<PixelGrid>>;

    /// Advances past one frame without converting it. Returns `false` once
    /// the stream is exhausted.
    fn skip_frame(&mut self) -> AppResult<bool> {
        Ok(self.next_frame()?.is_some())
    }
}

pub trait FrameSourcePort: Send + Sync {
    fn open(&self, path: &Path) -> AppResult<Box<dyn FrameStream>>;
}

pub type DynFrameSourcePort = Arc<dyn FrameSourcePort>;
