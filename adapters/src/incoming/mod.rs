pub mod playback_tokio;
