use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use domain::frame::EncodedFrame;
use domain::grid::{Dimensions, PixelGrid};
use domain::palette::Palette;

#[derive(Debug)]
pub struct FrameJob {
    pub source_index: u64,
    pub grid: PixelGrid,
    pub target: Dimensions,
    pub palette: Option<Palette>,
}

#[derive(Debug)]
pub struct BlockingTaskError {
    pub message: String,
}

pub type EncodedFrameFuture =
    Pin<Box<dyn Future<Output = Result<EncodedFrame, BlockingTaskError>> + Send + 'static>>;

pub trait FrameEncodingPort: Send + Sync {
    fn encode(&self, job: FrameJob) -> EncodedFrameFuture;
}

pub type DynFrameEncodingPort = Arc<dyn FrameEncodingPort>;
