use std::env;
use std::path::PathBuf;
use std::time::Duration;

use egui::{Color32, Vec2};

/// TOP / LEFT corner is 0/0
pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 480.0;
pub const HALF_W: f32 = WIDTH / 2.0;
pub const HALF_H: f32 = HEIGHT / 2.0;

pub const FPS: u32 = 60;

pub const BLACK: Color32 = Color32::BLACK;
pub const WHITE: Color32 = Color32::WHITE;
pub const YELLOW: Color32 = Color32::from_rgb(255, 255, 0);
pub const RED: Color32 = Color32::from_rgb(255, 0, 0);

pub const WINDOW_TITLE: &str = "Pong!";

/// a round is over as soon as one score exceeds this
pub const WIN_SCORE_THRESHOLD: u32 = 9;

const MUSIC_VOLUME: f32 = 0.01;
const TITLE_FONT_SIZE: f32 = 64.0;
const BODY_FONT_SIZE: f32 = 32.0;
const FONT_NAME: &str = "Arial";

const ASSETS_ENV_VAR: &str = "PONG_ASSETS";
const SOUNDS_DIR: &str = "sounds";
const MUSIC_DIR: &str = "music";
const MUSIC_FILE: &str = "theme.ogg";

/// Immutable settings, built once at startup and handed around by reference.
#[derive(Clone, Debug)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
    pub background: Color32,
    pub foreground: Color32,
    pub highlight: Color32,
    pub alert: Color32,
    pub win_score_threshold: u32,
    pub music_volume: f32,
    pub title_font_size: f32,
    pub body_font_size: f32,
    pub font_name: String,
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn field_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    pub fn sounds_dir(&self) -> PathBuf {
        self.assets_dir.join(SOUNDS_DIR)
    }

    pub fn music_path(&self) -> PathBuf {
        self.assets_dir.join(MUSIC_DIR).join(MUSIC_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            background: BLACK,
            foreground: WHITE,
            highlight: YELLOW,
            alert: RED,
            win_score_threshold: WIN_SCORE_THRESHOLD,
            music_volume: MUSIC_VOLUME,
            title_font_size: TITLE_FONT_SIZE,
            body_font_size: BODY_FONT_SIZE,
            font_name: FONT_NAME.to_owned(),
            assets_dir: resolve_assets_dir(),
        }
    }
}

/// `PONG_ASSETS` wins; otherwise the working directory if it holds the sounds, else the crate root
fn resolve_assets_dir() -> PathBuf {
    if let Some(dir) = env::var_os(ASSETS_ENV_VAR) {
        return PathBuf::from(dir);
    }
    match env::current_dir() {
        Ok(cwd) if cwd.join(SOUNDS_DIR).is_dir() => cwd,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")),
    }
}
