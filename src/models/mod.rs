pub mod config;
pub mod error;
pub mod format;
pub mod recording;
pub mod state;
