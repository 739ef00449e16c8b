pub mod app;
pub mod audio;
pub mod config;
pub mod fonts;
pub mod game;
pub mod util;
