use std::path::PathBuf;

use crate::{config::EncodeSettings, error::AppResult};

#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub video_path: PathBuf,
    pub settings: EncodeSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    pub output_path: PathBuf,
    pub frames_read: u64,
    pub frames_saved: usize,
    pub palette_size: Option<usize>,
    pub bytes_written: u64,
}

#[async_trait::async_trait]
pub trait EncodeVideoUseCase: Send + Sync {
    async fn encode_video(&self, request: EncodeRequest) -> AppResult<EncodeReport>;
}
