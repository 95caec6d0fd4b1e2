use std::path::Path;

use crate::{config::PlaybackSettings, error::AppResult, playback::session::PlaybackSession};

pub trait LoadPlaybackUseCase: Send + Sync {
    fn load_session(&self, path: &Path, settings: PlaybackSettings) -> AppResult<PlaybackSession>;
}
