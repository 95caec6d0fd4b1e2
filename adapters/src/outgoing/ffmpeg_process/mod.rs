pub mod frame_source_ffmpeg;
