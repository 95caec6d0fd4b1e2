pub mod document_store;
pub mod frame_encoding;
pub mod frame_source;
pub mod palette_loader;
pub mod render_surface;
