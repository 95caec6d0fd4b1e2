use tracing::info;

use framepack_application::{
    config::EncodeSettings,
    encoding::pipeline::format_size,
    error::AppResult,
    ports::incoming::encode::{EncodeReport, EncodeRequest},
};

use crate::args::EncodeArgs;
use crate::bootstrap::state::AppState;
use crate::observability::startup_info::print_encode_info;

pub async fn run(state: &AppState, args: &EncodeArgs) -> AppResult<EncodeReport> {
    print_encode_info(&state.config, &args.video);
    let settings = EncodeSettings::from_config(&state.config.encode)?;

    let report = state
        .encode_service
        .encode_video(EncodeRequest {
            video_path: args.video.clone(),
            settings,
        })
        .await?;

    info!(
        "✅ Saved {} of {} source frames to {} ({})",
        report.frames_saved,
        report.frames_read,
        report.output_path.display(),
        format_size(report.bytes_written)
    );
    Ok(report)
}
