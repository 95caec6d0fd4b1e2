pub mod render_surface_ansi;
