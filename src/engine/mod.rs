pub mod capture;
pub mod playback;
