pub mod mpv;
pub mod state;
