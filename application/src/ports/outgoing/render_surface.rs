use crate::error::AppResult;
use domain::grid::PixelGrid;
use domain::playback::PlaybackState;

pub trait RenderSurfacePort: Send {
    fn render(&mut self, frame: &PixelGrid, state: &PlaybackState) -> AppResult<()>;

    fn render_error(&mut self, message: &str) -> AppResult<()>;
}
