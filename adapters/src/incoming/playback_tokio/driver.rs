use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, instrument};

use framepack_application::{
    error::AppResult,
    playback::session::{PlaybackSession, TickOutcome},
    ports::outgoing::render_surface::RenderSurfacePort,
};

use super::PlaybackCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Stopped,
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub frames_rendered: u64,
    pub last_frame: usize,
    pub reason: StopReason,
}

fn frame_ticker(period: Duration, start: Instant) -> Interval {
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

pub struct TokioPlaybackDriver<S: RenderSurfacePort> {
    session: PlaybackSession,
    surface: S,
    frames_rendered: u64,
}

impl<S: RenderSurfacePort> TokioPlaybackDriver<S> {
    pub fn new(session: PlaybackSession, surface: S) -> Self {
        Self {
            session,
            surface,
            frames_rendered: 0,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[instrument(skip(self, commands))]
    pub async fn run(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<PlaybackCommand>,
        frame_limit: Option<u64>,
    ) -> AppResult<PlaybackSummary> {
        let mut ticker = frame_ticker(self.session.state().frame_interval(), Instant::now());
        let mut listening = true;

        if !self.session.state().is_playing() {
            self.session.render_current(&mut self.surface)?;
        }

        info!(
            "Playing {} frames at {} fps",
            self.session.state().total_frames(),
            self.session.state().fps()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let TickOutcome::Rendered { frame } = self.session.tick(&mut self.surface)? {
                        self.frames_rendered += 1;
                        debug!(frame, "Rendered frame");
                    }
                    if frame_limit.is_some_and(|limit| self.frames_rendered >= limit) {
                        info!("Played {} frames", self.frames_rendered);
                        return Ok(self.summary(StopReason::FrameLimit));
                    }
                }

                command = commands.recv(), if listening => {
                    let Some(command) = command else {
                        debug!("Command channel closed");
                        listening = false;
                        continue;
                    };

                    if command == PlaybackCommand::Stop {
                        info!("Playback stopped");
                        return Ok(self.summary(StopReason::Stopped));
                    }

                    if let Some(period) = self.apply(command)? {
                        ticker = frame_ticker(period, Instant::now() + period);
                    }
                }
            }
        }
    }

    fn apply(&mut self, command: PlaybackCommand) -> AppResult<Option<Duration>> {
        let state = self.session.state_mut();
        match command {
            PlaybackCommand::Pause => state.pause(),
            PlaybackCommand::Resume => state.resume(),
            PlaybackCommand::TogglePause => {
                state.toggle();
            }
            PlaybackCommand::SetFps(fps) => {
                let applied = state.set_fps(fps);
                info!("Playback rate set to {} fps", applied);
                return Ok(Some(state.frame_interval()));
            }
            PlaybackCommand::Stop => {}
        }

        if !self.session.state().is_playing() {
            self.session.render_current(&mut self.surface)?;
            info!("Paused at frame {}", self.session.state().current_frame());
        }
        Ok(None)
    }

    fn summary(&self, reason: StopReason) -> PlaybackSummary {
        PlaybackSummary {
            frames_rendered: self.frames_rendered,
            last_frame: self.session.state().current_frame(),
            reason,
        }
    }
}
