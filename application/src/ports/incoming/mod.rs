pub mod document;
pub mod encode;
pub mod playback;
