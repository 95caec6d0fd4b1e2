pub mod color;
pub mod document;
pub mod error;
pub mod frame;
pub mod grid;
pub mod palette;
pub mod playback;
pub mod rle;
pub mod sampler;
pub mod selection;
