use std::time::Duration;

use crate::error::{DomainError, DomainResult};

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    current_frame: usize,
    total_frames: usize,
    fps: u32,
    playing: bool,
}

impl PlaybackState {
    pub fn new(total_frames: usize, fps: u32) -> DomainResult<Self> {
        if total_frames == 0 {
            return Err(DomainError::CorruptData(
                "document contains no frames".to_string(),
            ));
        }
        Ok(Self {
            current_frame: 0,
            total_frames,
            fps: clamp_fps(fps),
            playing: true,
        })
    }

    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn advance(&mut self) -> usize {
        self.current_frame = (self.current_frame + 1) % self.total_frames;
        self.current_frame
    }

    pub fn set_fps(&mut self, fps: u32) -> u32 {
        self.fps = clamp_fps(fps);
        self.fps
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

#[must_use]
pub fn clamp_fps(fps: u32) -> u32 {
    fps.clamp(MIN_FPS, MAX_FPS)
}
