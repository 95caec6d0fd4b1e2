pub mod ffmpeg_process;
pub mod image_rs;
pub mod json_serde;
pub mod source_select;
pub mod terminal_ansi;
pub mod tokio_spawn;
