use std::path::Path;
use tracing::info;

use framepack_application::infrastructure_config::{Config, EncodeConfig, PlaybackConfig};

pub fn print_encode_info(config: &Config, video: &Path) {
    info!("🎞️  Encoding {}", video.display());
    print_encode_configuration(&config.encode);
}

pub fn print_playback_info(config: &Config, document: &Path) {
    info!("▶️  Playing {}", document.display());
    print_playback_configuration(&config.playback);
}

fn print_encode_configuration(encode: &EncodeConfig) {
    info!("⚙️  Configuration:");
    info!("  📐 Target size: {}x{} pixels", encode.width, encode.height);
    info!(
        "  ⏭️  Frameskip: {} (keeping every {} frame(s))",
        encode.frameskip,
        u64::from(encode.frameskip) + 1
    );
    if encode.max_frames > 0 {
        info!("  🔢 Frame limit: {}", encode.max_frames);
    }
    match &encode.palette_path {
        Some(path) => info!("  🎨 Palette: {}", path.display()),
        None => info!("  🎨 Palette: none (raw colors)"),
    }
    info!("  🧵 Workers: {}, source: {:?}", encode.workers, encode.source);
}

fn print_playback_configuration(playback: &PlaybackConfig) {
    info!("⚙️  Configuration:");
    info!("  ⏱️  Rate: {} fps", playback.fps);
    info!(
        "  📦 Decode mode: {:?} (eager limit {} MiB)",
        playback.decode_mode,
        playback.eager_limit_bytes / (1024 * 1024)
    );
    if playback.start_paused {
        info!("  ⏸️  Starting paused");
    }
}
