use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use egui::{Pos2, Vec2};
use rand::Rng;

use crate::audio::{SoundCue, SoundPlayer};
use crate::config::Config;

use super::algebra_2d::{contact_test_circle_aabb, reflected_vector, AaBB, Circle};
use super::input::{Controls, KeyState};

pub const BAT_LEN_X: f32 = 18.0;
pub const BAT_LEN_Y: f32 = 96.0;
/// gap between a side of the field and the outer edge of its bat
const BAT_SIDE_DISTANCE: f32 = 40.0;

pub const BALL_RADIUS: f32 = 7.0;
/// field units per tick
pub const SERVE_SPEED: f32 = 5.0;
pub const MAX_BALL_SPEED: f32 = 12.0;
const HIT_SPEED_STEP: f32 = 1.0;

pub const MAX_SERVE_ANGLE: f32 = FRAC_PI_4;
/// slope added to the outgoing ball for a hit at the very end of a bat
const HIT_DEFLECTION: f32 = 0.75;
/// steepest outgoing slope after a bat hit (45°)
const MAX_HIT_SLOPE: f32 = 1.0;

/// max object distance to still count as contact
pub(super) const CONTACT_PREDICTION: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// sign of the x direction pointing at this side's goal line
    pub fn direction_x(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Bat {
    pub side: Side,
    pub shape: AaBB,
    /// field units per tick, positive is downwards
    pub velocity_y: f32,
    pub score: u32,
}

impl Bat {
    fn new(side: Side, field: Vec2) -> Self {
        let left_x = match side {
            Side::Left => BAT_SIDE_DISTANCE,
            Side::Right => field.x - BAT_SIDE_DISTANCE - BAT_LEN_X,
        };
        Self {
            side,
            shape: AaBB::from_min_size(
                Pos2::new(left_x, (field.y - BAT_LEN_Y) / 2.0),
                Vec2::new(BAT_LEN_X, BAT_LEN_Y),
            ),
            velocity_y: 0.0,
            score: 0,
        }
    }

    pub fn top(&self) -> f32 {
        self.shape.min.y
    }

    /// x of the surface facing the field center
    pub fn face_x(&self) -> f32 {
        match self.side {
            Side::Left => self.shape.max.x,
            Side::Right => self.shape.min.x,
        }
    }

    /// physically move one time step forward; stays inside the field vertically
    fn proceed(&mut self, field_height: f32) {
        let potential_pos = self.shape.translate(Vec2::new(0.0, self.velocity_y));

        if potential_pos.min.y <= 0.0 {
            self.shape = potential_pos.translate(Vec2::new(0.0, -potential_pos.min.y));
        } else if potential_pos.max.y >= field_height {
            self.shape = potential_pos.translate(Vec2::new(0.0, field_height - potential_pos.max.y));
        } else {
            self.shape = potential_pos;
        }
    }
}

/// A ball is a perfect round 2D structure
#[derive(Clone, Debug)]
pub struct Ball {
    pub shape: Circle,
    /// field units per tick
    pub velocity: Vec2,
}

impl Ball {
    /// A ball at `center` heading toward `toward` at serve speed, up to 45° off the horizontal.
    pub fn served(center: Pos2, toward: Side) -> Self {
        let angle = rand::thread_rng().gen_range(-MAX_SERVE_ANGLE..=MAX_SERVE_ANGLE);
        Self {
            shape: Circle {
                center,
                radius: BALL_RADIUS,
            },
            velocity: Vec2::new(toward.direction_x() * angle.cos(), angle.sin()) * SERVE_SPEED,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// the side whose goal line the ball is currently travelling to
    pub fn heading(&self) -> Side {
        if self.velocity.x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

pub struct Game {
    pub ball: Ball,
    pub bats: [Bat; 2],
    field: Vec2,
    controls: Controls,
    sfx: Rc<dyn SoundPlayer>,
}

impl Game {
    pub fn new(config: &Config, controls: Controls, sfx: Rc<dyn SoundPlayer>) -> Self {
        let field = config.field_size();
        let first_serve = if rand::thread_rng().gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        Self {
            ball: Ball::served(field_center(field), first_serve),
            bats: [Bat::new(Side::Left, field), Bat::new(Side::Right, field)],
            field,
            controls,
            sfx,
        }
    }

    pub fn field_size(&self) -> Vec2 {
        self.field
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn bat(&self, side: Side) -> &Bat {
        &self.bats[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.bat(side).score
    }

    pub fn max_score(&self) -> u32 {
        self.bats.iter().map(|bat| bat.score).max().unwrap_or(0)
    }

    /// physically move one time step forward
    pub fn update(&mut self, keys: &KeyState) {
        for bat in self.bats.iter_mut() {
            bat.velocity_y = self.controls.velocity(bat.side, keys);
            bat.proceed(self.field.y);
        }
        self.proceed_ball();
    }

    fn proceed_ball(&mut self) {
        self.ball.shape.center += self.ball.velocity;
        self.reflect_from_bat();
        self.reflect_from_walls();
        self.check_goal();
    }

    fn reflect_from_walls(&mut self) {
        let ball = &mut self.ball;
        let radius = ball.shape.radius;

        let surface_normal = if ball.shape.center.y - radius <= 0.0 && ball.velocity.y < 0.0 {
            Some(Vec2::new(0.0, 1.0))
        } else if ball.shape.center.y + radius >= self.field.y && ball.velocity.y > 0.0 {
            Some(Vec2::new(0.0, -1.0))
        } else {
            None
        };
        ball.shape.center.y = ball.shape.center.y.clamp(radius, self.field.y - radius);

        if let Some(normal) = surface_normal {
            ball.velocity = reflected_vector(ball.velocity, normal);
            self.sfx.play(SoundCue::Wall);
        }
    }

    fn reflect_from_bat(&mut self) {
        let side = self.ball.heading();
        let bat = &self.bats[side.index()];
        let ball = &mut self.ball;
        let radius = ball.shape.radius;
        let away_x = -side.direction_x();

        // a ball whose center already was behind the bat face can only be missed
        let previous_center = ball.shape.center - ball.velocity;
        if (previous_center.x - bat.face_x()) * side.direction_x() > 0.0 {
            return;
        }

        // test contact where the ball first touches the face plane, so fast balls cannot tunnel through
        let touch_x = bat.face_x() + away_x * radius;
        let touch_center = if (ball.shape.center.x - touch_x) * side.direction_x() > 0.0 {
            let portion = ((touch_x - previous_center.x) / ball.velocity.x).clamp(0.0, 1.0);
            previous_center + ball.velocity * portion
        } else {
            ball.shape.center
        };
        let touching = Circle {
            center: touch_center,
            radius,
        };
        if contact_test_circle_aabb(&touching, &bat.shape).is_none() {
            return;
        }

        let offset = ((touch_center.y - bat.shape.center().y) / (BAT_LEN_Y / 2.0)).clamp(-1.0, 1.0);
        let slope = (ball.velocity.y / ball.velocity.x.abs() + offset * HIT_DEFLECTION).clamp(-MAX_HIT_SLOPE, MAX_HIT_SLOPE);
        let speed = (ball.speed() + HIT_SPEED_STEP).min(MAX_BALL_SPEED);

        ball.velocity = Vec2::new(away_x, slope).normalized() * speed;
        ball.shape.center = touch_center;
        log::debug!("{side:?} bat hit, offset: {offset:.2}, velocity: {:?}", ball.velocity);
        self.sfx.play(SoundCue::Hit);
    }

    fn check_goal(&mut self) {
        let x = self.ball.shape.center.x;
        let missed_by = if x < 0.0 {
            Side::Left
        } else if x > self.field.x {
            Side::Right
        } else {
            return;
        };

        let scorer = missed_by.opponent();
        self.bats[scorer.index()].score += 1;
        log::debug!("{scorer:?} scores: {} - {}", self.score(Side::Left), self.score(Side::Right));
        self.sfx.play(SoundCue::Score);
        self.ball = Ball::served(field_center(self.field), missed_by);
    }
}

fn field_center(field: Vec2) -> Pos2 {
    Pos2::new(field.x / 2.0, field.y / 2.0)
}

pub trait Assert {
    fn assert(&self, field: Vec2);
}

impl Assert for Bat {
    fn assert(&self, field: Vec2) {
        debug_assert!(self.shape.min.x >= 0.0);
        debug_assert!(self.shape.max.x <= field.x);
        debug_assert!(self.shape.min.y >= 0.0);
        debug_assert!(self.shape.max.y <= field.y);
    }
}

impl Assert for Ball {
    fn assert(&self, field: Vec2) {
        debug_assert!(self.shape.center.y - self.shape.radius >= 0.0);
        debug_assert!(self.shape.center.y + self.shape.radius <= field.y);
    }
}
