pub mod frame_source_image;
