pub mod frame_encoder_tokio;
