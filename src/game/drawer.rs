use egui::epaint::{CircleShape, RectShape};
use egui::{Align2, Color32, FontFamily, FontId, Painter, Pos2, Rect, Rounding, Shape, Stroke, Vec2};

use crate::config::Config;
use crate::fonts::bold_family;

use super::mechanics::{Assert, Ball, Bat, Game, Side};

const CENTER_LINE_WIDTH: f32 = 2.0;
const CENTER_LINE_DASH: f32 = 12.0;
const CENTER_LINE_GAP: f32 = 12.0;

/// horizontal distance of a score from the center line
const SCORE_OFFSET_X: f32 = 60.0;
const SCORE_POS_Y: f32 = 40.0;

/// Maps field coordinates onto a canvas rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    canvas: Rect,
    field: Vec2,
}

impl Projection {
    pub fn new(canvas: Rect, field: Vec2) -> Self {
        Self { canvas, field }
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// pos / field_len = result / canvas_len
    pub fn pos(&self, pos: Pos2) -> Pos2 {
        self.canvas.min + Vec2::new(self.len_x(pos.x), self.len_y(pos.y))
    }

    pub fn len_x(&self, len_x: f32) -> f32 {
        len_x * self.canvas.width() / self.field.x
    }

    pub fn len_y(&self, len_y: f32) -> f32 {
        len_y * self.canvas.height() / self.field.y
    }

    pub fn rect(&self, min: Pos2, max: Pos2) -> Rect {
        Rect::from_two_pos(self.pos(min), self.pos(max))
    }
}

/// A line of text centered on a field position.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub center: Pos2,
    /// font size in field units
    pub size: f32,
    pub color: Color32,
    pub bold: bool,
}

impl Label {
    pub fn family(&self) -> FontFamily {
        if self.bold {
            bold_family()
        } else {
            FontFamily::Proportional
        }
    }

    pub fn paint(&self, painter: &Painter, projection: &Projection) {
        painter.text(
            projection.pos(self.center),
            Align2::CENTER_CENTER,
            &self.text,
            FontId::new(projection.len_y(self.size), self.family()),
            self.color,
        );
    }
}

/// Renders a [Game] without touching it.
pub struct GameDrawer<'a> {
    projection: Projection,
    game: &'a Game,
    config: &'a Config,
}

impl<'a> GameDrawer<'a> {
    pub fn new(canvas: Rect, game: &'a Game, config: &'a Config) -> Self {
        Self {
            projection: Projection::new(canvas, game.field_size()),
            game,
            config,
        }
    }

    pub fn paint(&self, painter: &Painter) {
        for shape in self.shapes() {
            painter.add(shape);
        }
        for label in self.score_labels() {
            label.paint(painter, &self.projection);
        }
    }

    pub fn shapes(&self) -> Vec<Shape> {
        let mut result = Vec::with_capacity(32);
        result.push(self.field());
        result.extend(self.center_line());
        result.extend(Side::BOTH.iter().map(|side| self.draw_bat(self.game.bat(*side))));
        result.push(self.draw_ball(&self.game.ball));
        result
    }

    pub fn score_labels(&self) -> Vec<Label> {
        let field = self.game.field_size();
        Side::BOTH
            .iter()
            .map(|side| Label {
                text: self.game.score(*side).to_string(),
                center: Pos2::new(field.x / 2.0 + side.direction_x() * SCORE_OFFSET_X, SCORE_POS_Y),
                size: self.config.body_font_size,
                color: self.config.foreground,
                bold: false,
            })
            .collect()
    }

    fn field(&self) -> Shape {
        RectShape::filled(self.projection.canvas(), Rounding::none(), self.config.background).into()
    }

    fn center_line(&self) -> Vec<Shape> {
        let field = self.game.field_size();
        Shape::dashed_line(
            &[
                self.projection.pos(Pos2::new(field.x / 2.0, 0.0)),
                self.projection.pos(Pos2::new(field.x / 2.0, field.y)),
            ],
            Stroke::new(CENTER_LINE_WIDTH, self.config.foreground),
            self.projection.len_y(CENTER_LINE_DASH),
            self.projection.len_y(CENTER_LINE_GAP),
        )
    }

    fn draw_bat(&self, bat: &Bat) -> Shape {
        bat.assert(self.game.field_size());
        RectShape::filled(
            self.projection.rect(bat.shape.min, bat.shape.max),
            Rounding::none(),
            self.config.foreground,
        )
        .into()
    }

    fn draw_ball(&self, ball: &Ball) -> Shape {
        ball.assert(self.game.field_size());
        CircleShape::filled(
            self.projection.pos(ball.shape.center),
            self.projection.len_x(ball.shape.radius),
            self.config.foreground,
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use egui::epaint::RectShape;
    use egui::{Pos2, Rect, Shape, Vec2};

    use crate::audio::testing::CueRecorder;
    use crate::config::Config;
    use crate::game::input::{Controls, KeyState};
    use crate::game::mechanics::{Game, Side};

    use super::*;

    fn new_game(config: &Config) -> Game {
        Game::new(config, Controls::none(), Rc::new(CueRecorder::default()))
    }

    #[test]
    fn drawing_twice_gives_the_same_picture() {
        let config = Config::default();
        let mut game = new_game(&config);
        for _ in 0..30 {
            game.update(&KeyState::default());
        }
        let canvas = Rect::from_min_size(Pos2::ZERO, config.field_size());
        let drawer = GameDrawer::new(canvas, &game, &config);

        assert_eq!(drawer.shapes(), drawer.shapes());
        assert_eq!(drawer.score_labels(), drawer.score_labels());
    }

    #[test]
    fn bats_are_projected_onto_the_canvas() {
        let config = Config::default();
        let game = new_game(&config);
        let field = config.field_size();
        let canvas = Rect::from_min_size(Pos2::new(10.0, 20.0), field * 2.0);
        let drawer = GameDrawer::new(canvas, &game, &config);

        let bat = game.bat(Side::Left);
        let expected = Rect::from_min_max(
            Pos2::new(10.0 + bat.shape.min.x * 2.0, 20.0 + bat.shape.min.y * 2.0),
            Pos2::new(10.0 + bat.shape.max.x * 2.0, 20.0 + bat.shape.max.y * 2.0),
        );
        let bat_rects: Vec<Rect> = drawer
            .shapes()
            .into_iter()
            .filter_map(|shape| match shape {
                Shape::Rect(RectShape { rect, fill, .. }) if fill == config.foreground => Some(rect),
                _ => None,
            })
            .collect();

        assert_eq!(bat_rects.len(), 2);
        assert_eq!(bat_rects[0], expected);
    }

    #[test]
    fn score_labels_follow_the_game() {
        let config = Config::default();
        let mut game = new_game(&config);
        game.bats[1].score = 7;
        let canvas = Rect::from_min_size(Pos2::ZERO, config.field_size());

        let labels = GameDrawer::new(canvas, &game, &config).score_labels();

        let texts: Vec<&str> = labels.iter().map(|label| label.text.as_str()).collect();
        assert_eq!(texts, vec!["0", "7"]);
        assert!(labels[0].center.x < config.width / 2.0);
        assert!(labels[1].center.x > config.width / 2.0);
    }

    #[test]
    fn paints_onto_an_egui_layer() {
        let config = Config::default();
        let game = new_game(&config);
        let ctx = egui::Context::default();

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let canvas = Rect::from_min_size(Pos2::ZERO, Vec2::new(config.width, config.height));
            GameDrawer::new(canvas, &game, &config).paint(&painter);
        });

        assert!(output.shapes.len() >= 6, "{} shapes", output.shapes.len());
    }
}
