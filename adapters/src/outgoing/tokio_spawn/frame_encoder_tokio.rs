use tokio::task::spawn_blocking;

use framepack_application::{
    encoding::pipeline::encode_frame,
    ports::outgoing::frame_encoding::{
        BlockingTaskError, EncodedFrameFuture, FrameEncodingPort, FrameJob,
    },
};

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFrameEncoderAdapter;

impl TokioFrameEncoderAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl FrameEncodingPort for TokioFrameEncoderAdapter {
    fn encode(&self, job: FrameJob) -> EncodedFrameFuture {
        let source_index = job.source_index;
        let task =
            spawn_blocking(move || encode_frame(&job.grid, job.target, job.palette.as_ref()));

        Box::pin(async move {
            task.await.map_err(|e| BlockingTaskError {
                message: format!("Encoding frame {source_index} failed: {e}"),
            })
        })
    }
}
