use std::io::{self, BufRead, IsTerminal};
use std::thread;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use framepack_adapters::incoming::playback_tokio::PlaybackCommand;

// Enter or `p` toggles pause, a number sets the frame rate.
pub fn parse_control(line: &str) -> Option<PlaybackCommand> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | "p" => Some(PlaybackCommand::TogglePause),
        "pause" => Some(PlaybackCommand::Pause),
        "r" | "resume" | "play" => Some(PlaybackCommand::Resume),
        "q" | "quit" | "stop" => Some(PlaybackCommand::Stop),
        _ => line.parse().ok().map(PlaybackCommand::SetFps),
    }
}

pub fn spawn_stdin_controls(commands: UnboundedSender<PlaybackCommand>) {
    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal, keyboard controls disabled");
        return;
    }

    let spawned = thread::Builder::new()
        .name("playback-controls".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let Some(command) = parse_control(&line) else {
                    debug!("Ignoring unknown playback command: {:?}", line);
                    continue;
                };
                if commands.send(command).is_err() {
                    break;
                }
            }
        });

    match spawned {
        Ok(_) => info!("Controls: Enter/p pause, r resume, <number> fps, q quit"),
        Err(e) => warn!("Failed to start keyboard controls: {}", e),
    }
}
