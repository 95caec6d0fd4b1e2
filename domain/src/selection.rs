#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSelector {
    frameskip: u32,
    max_frames: Option<usize>,
}

impl FrameSelector {
    #[must_use]
    pub fn new(frameskip: u32) -> Self {
        Self {
            frameskip,
            max_frames: None,
        }
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = (max_frames > 0).then_some(max_frames);
        self
    }

    #[must_use]
    pub fn frameskip(&self) -> u32 {
        self.frameskip
    }

    #[must_use]
    pub fn max_frames(&self) -> Option<usize> {
        self.max_frames
    }

    #[must_use]
    pub fn stride(&self) -> u64 {
        u64::from(self.frameskip) + 1
    }

    #[must_use]
    pub fn includes(&self, source_index: u64) -> bool {
        source_index % self.stride() == 0
    }

    #[must_use]
    pub fn limit_reached(&self, kept: usize) -> bool {
        self.max_frames.is_some_and(|max| kept >= max)
    }
}

impl Default for FrameSelector {
    fn default() -> Self {
        Self::new(0)
    }
}
