use std::rc::Rc;

use anyhow::anyhow;

use pong::app::PongApp;
use pong::audio::{AudioOutput, SoundBank, SoundPlayer};
use pong::config::{Config, WINDOW_TITLE};
use pong::fonts;
use pong::util::init_logging;

fn pong_game(config: Config, sfx: Rc<dyn SoundPlayer>) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(config.field_size()),
        resizable: false,
        default_theme: eframe::Theme::Dark,
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| {
            fonts::install(&cc.egui_ctx, &config.font_name);
            Box::new(PongApp::new(cc, config, sfx))
        }),
    )
    .map_err(|e| anyhow!("failed to run the game window: {e}"))
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::default();
    log::info!("assets from {}", config.assets_dir.display());

    let bank = SoundBank::load(&config.sounds_dir())?;
    let audio = AudioOutput::start(bank, &config.music_path(), config.music_volume)?;

    pong_game(config, Rc::new(audio))
}
