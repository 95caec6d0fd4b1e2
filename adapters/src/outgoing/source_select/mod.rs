pub mod frame_source_select;
