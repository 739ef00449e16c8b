use std::rc::Rc;
use std::time::Instant;

use egui::{Context, Id, LayerId, Order, Painter, Pos2, Rect, Rounding};

use crate::audio::SoundPlayer;
use crate::config::Config;
use crate::game::drawer::{GameDrawer, Label, Projection};
use crate::game::input::{KeyState, PlayerCount};

pub use self::session::{AppState, FrameClock, Session};

pub mod session;

pub struct PongApp {
    config: Config,
    session: Session,
    clock: FrameClock,
}

impl PongApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, sfx: Rc<dyn SoundPlayer>) -> Self {
        let session = Session::new(&config, sfx);
        let clock = FrameClock::new(config.frame_interval(), Instant::now());
        Self { config, session, clock }
    }

    fn draw(&self, painter: &Painter) {
        let canvas = painter.clip_rect();
        match self.session.state() {
            AppState::Play => GameDrawer::new(canvas, self.session.game(), &self.config).paint(painter),
            AppState::Menu => self.draw_screen(painter, canvas, &menu_labels(&self.config, self.session.player_count())),
            AppState::GameOver => self.draw_screen(painter, canvas, &game_over_labels(&self.config)),
        }
    }

    fn draw_screen(&self, painter: &Painter, canvas: Rect, labels: &[Label]) {
        painter.rect_filled(canvas, Rounding::none(), self.config.background);
        let projection = Projection::new(canvas, self.config.field_size());
        for label in labels {
            label.paint(painter, &projection);
        }
    }
}

impl eframe::App for PongApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.clock.frame_due(Instant::now()) {
            let keys = KeyState::from_ctx(ctx);
            self.session.step(&self.config, &keys);
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Background, Id::new("pong")));
        self.draw(&painter);

        ctx.request_repaint_after(self.clock.until_next_frame(Instant::now()));
    }
}

pub fn menu_labels(config: &Config, player_count: PlayerCount) -> Vec<Label> {
    let (half_w, half_h) = (config.width / 2.0, config.height / 2.0);
    vec![
        Label {
            text: "Pong!".to_owned(),
            center: Pos2::new(half_w, half_h - 50.0),
            size: config.title_font_size,
            color: config.foreground,
            bold: true,
        },
        Label {
            text: format!("{player_count} Player  (UP/DOWN)"),
            center: Pos2::new(half_w, half_h + 20.0),
            size: config.body_font_size,
            color: config.foreground,
            bold: false,
        },
        Label {
            text: "Press SPACE to start".to_owned(),
            center: Pos2::new(half_w, half_h + 70.0),
            size: config.body_font_size,
            color: config.highlight,
            bold: false,
        },
    ]
}

pub fn game_over_labels(config: &Config) -> Vec<Label> {
    let (half_w, half_h) = (config.width / 2.0, config.height / 2.0);
    vec![
        Label {
            text: "Game Over".to_owned(),
            center: Pos2::new(half_w, half_h - 40.0),
            size: config.title_font_size,
            color: config.alert,
            bold: true,
        },
        Label {
            text: "Press SPACE to return".to_owned(),
            center: Pos2::new(half_w, half_h + 30.0),
            size: config.body_font_size,
            color: config.foreground,
            bold: false,
        },
    ]
}
