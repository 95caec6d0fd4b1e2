use std::sync::Arc;
use tokio::{sync::mpsc, task::spawn_blocking};
use tracing::{debug, info, warn};

use framepack_adapters::{
    incoming::playback_tokio::{
        PlaybackCommand,
        driver::{PlaybackSummary, TokioPlaybackDriver},
    },
    outgoing::terminal_ansi::render_surface_ansi::AnsiTerminalSurface,
};
use framepack_application::{
    config::PlaybackSettings,
    error::{AppError, AppResult},
    infrastructure_config::PlaybackConfig,
    ports::outgoing::render_surface::RenderSurfacePort,
};

use crate::args::PlayArgs;
use crate::bootstrap::{controls::spawn_stdin_controls, signals::shutdown_signal, state::AppState};
use crate::observability::startup_info::print_playback_info;

// `--once` has to play every frame, so it overrides a configured paused start.
fn playback_settings(config: &PlaybackConfig, args: &PlayArgs) -> PlaybackSettings {
    let mut settings = PlaybackSettings::from(config);
    if args.once && settings.start_paused {
        warn!("Ignoring start_paused because --once was given");
        settings.start_paused = false;
    }
    settings
}

pub async fn run(state: &AppState, args: &PlayArgs) -> AppResult<PlaybackSummary> {
    print_playback_info(&state.config, &args.document);
    let settings = playback_settings(&state.config.playback, args);
    let mut surface = AnsiTerminalSurface::stdout();

    let service = Arc::clone(&state.playback_service);
    let path = args.document.clone();
    let loaded = spawn_blocking(move || service.load_session(&path, settings))
        .await
        .map_err(|e| AppError::TaskError {
            message: format!("Loading task failed: {e}"),
        })?;

    let session = match loaded {
        Ok(session) => session,
        Err(e) => {
            surface.render_error(&format!(
                "Could not load {}: {}",
                args.document.display(),
                e
            ))?;
            return Err(e);
        }
    };

    let frame_limit = args.once.then(|| session.state().total_frames() as u64);
    let (commands, receiver) = mpsc::unbounded_channel();
    spawn_stdin_controls(commands.clone());
    let stop_on_signal = tokio::spawn(async move {
        shutdown_signal().await;
        if commands.send(PlaybackCommand::Stop).is_err() {
            debug!("Playback already finished");
        }
    });

    let mut driver = TokioPlaybackDriver::new(session, surface);
    let summary = driver.run(receiver, frame_limit).await;
    stop_on_signal.abort();

    let summary = summary?;
    info!(
        "Rendered {} frames, stopped at frame {}",
        summary.frames_rendered, summary.last_frame
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn play_args(once: bool, paused: bool) -> PlayArgs {
        PlayArgs {
            document: PathBuf::from("clip.json"),
            fps: None,
            decode_mode: None,
            paused,
            once,
        }
    }

    #[test]
    fn once_overrides_a_configured_paused_start() {
        let config = PlaybackConfig {
            start_paused: true,
            ..PlaybackConfig::default()
        };

        assert!(!playback_settings(&config, &play_args(true, false)).start_paused);
        assert!(playback_settings(&config, &play_args(false, false)).start_paused);
    }
}
