pub mod controls;
pub mod signals;
pub mod state;
