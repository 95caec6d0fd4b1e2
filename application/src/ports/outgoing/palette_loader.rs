use std::path::Path;
use std::sync::Arc;

use crate::error::AppResult;
use domain::palette::Palette;

pub trait PaletteLoaderPort: Send + Sync {
    fn load(&self, path: &Path) -> AppResult<Palette>;
}

pub type DynPaletteLoaderPort = Arc<dyn PaletteLoaderPort>;
