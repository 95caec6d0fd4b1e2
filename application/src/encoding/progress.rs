use tracing::{debug, info};

pub struct ProgressReporter {
    total_frames: Option<u64>,
    step_percent: u64,
    fallback_every: u64,
    next_percent: u64,
}

impl ProgressReporter {
    pub fn new(total_frames: Option<u64>) -> Self {
        Self {
            total_frames: total_frames.filter(|total| *total > 0),
            step_percent: 10,
            fallback_every: 100,
            next_percent: 10,
        }
    }

    pub fn frame_done(&mut self, source_index: u64, saved: usize) {
        let processed = source_index + 1;
        debug!(frame = processed, saved, "Processed frame");

        match self.total_frames {
            Some(total) => {
                let percent = processed.saturating_mul(100) / total;
                if percent >= self.next_percent {
                    info!(
                        "Processing: {:.1}% (frame {}/{}) (saved frames {})",
                        processed as f64 * 100.0 / total as f64,
                        processed,
                        total,
                        saved
                    );
                    self.next_percent = (percent / self.step_percent + 1) * self.step_percent;
                }
            }
            None => {
                if processed % self.fallback_every == 0 {
                    info!("Processing: frame {} (saved frames {})", processed, saved);
                }
            }
        }
    }
}
