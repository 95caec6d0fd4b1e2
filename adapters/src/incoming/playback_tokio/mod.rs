pub mod driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Pause,
    Resume,
    TogglePause,
    SetFps(u32),
    Stop,
}
