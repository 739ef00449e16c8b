use std::fmt::{Display, Formatter};

use egui::Key;
use rustc_hash::FxHashSet;

use super::mechanics::Side;

/// bat movement per tick while a control key is held
pub const PLAYER_SPEED: f32 = 6.0;

/// Snapshot of the keys held down during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    down: FxHashSet<Key>,
}

impl KeyState {
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            down: i.keys_down.iter().copied().collect(),
        })
    }

    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        Self {
            down: keys.into_iter().collect(),
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}

/// True only on the frame a key goes from released to held.
#[derive(Clone, Copy, Debug, Default)]
pub struct RisingEdge {
    was_down: bool,
}

impl RisingEdge {
    pub fn update(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// Maps the current key state to a vertical bat velocity.
pub type ControlFn = fn(&KeyState) -> f32;

fn vertical_axis(keys: &KeyState, up: Key, down: Key) -> f32 {
    match (keys.is_down(up), keys.is_down(down)) {
        (true, false) => -PLAYER_SPEED,
        (false, true) => PLAYER_SPEED,
        _ => 0.0,
    }
}

pub fn p1_controls(keys: &KeyState) -> f32 {
    vertical_axis(keys, Key::A, Key::Z)
}

pub fn p2_controls(keys: &KeyState) -> f32 {
    vertical_axis(keys, Key::K, Key::M)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayerCount {
    #[default]
    One,
    Two,
}

impl Display for PlayerCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerCount::One => write!(f, "1"),
            PlayerCount::Two => write!(f, "2"),
        }
    }
}

/// A bat without a control function does not move.
#[derive(Clone, Copy, Default)]
pub struct Controls {
    pub left: Option<ControlFn>,
    pub right: Option<ControlFn>,
}

impl Controls {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_players(player_count: PlayerCount) -> Self {
        Self {
            left: Some(p1_controls),
            right: match player_count {
                PlayerCount::One => None,
                PlayerCount::Two => Some(p2_controls),
            },
        }
    }

    pub fn is_controlled(&self, side: Side) -> bool {
        self.control(side).is_some()
    }

    pub fn velocity(&self, side: Side, keys: &KeyState) -> f32 {
        self.control(side).map_or(0.0, |control| control(keys))
    }

    fn control(&self, side: Side) -> Option<ControlFn> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}
