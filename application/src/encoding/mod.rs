pub mod pipeline;
pub mod progress;
pub mod service;
