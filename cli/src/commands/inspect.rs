use std::path::Path;
use tracing::info;

use framepack_application::{
    document::service::DocumentSummary, encoding::pipeline::format_size, error::AppResult,
};

use crate::bootstrap::state::AppState;

pub fn run(state: &AppState, document: &Path) -> AppResult<DocumentSummary> {
    let summary = state.document_service.inspect(document)?;
    let stats = &summary.stats;

    info!("📄 {}", summary.path.display());
    info!("  Resolution: {}", summary.dimensions);
    match summary.palette_size {
        Some(size) => info!("  Palette: {} colors", size),
        None => info!("  Palette: none"),
    }
    info!("  Layout: {}", summary.layout);
    info!("  Frames: {}", stats.frame_count);
    info!(
        "  Runs: {} for {} pixels (ratio {:.2}:1)",
        stats.total_runs,
        stats.total_pixels,
        stats.compression_ratio()
    );
    if let Ok(metadata) = document.metadata() {
        info!("  File size: {}", format_size(metadata.len()));
    }

    Ok(summary)
}
