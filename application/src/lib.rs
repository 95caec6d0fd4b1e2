#[cfg(any(feature = "adapters", feature = "clap", feature = "image"))]
compile_error!("application must not depend on adapters/framework crates");

pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod infrastructure_config;
pub mod playback;
pub mod ports;
