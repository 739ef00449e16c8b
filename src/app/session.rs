use std::rc::Rc;
use std::time::{Duration, Instant};

use egui::Key;

use crate::audio::{SoundCue, SoundPlayer};
use crate::config::Config;
use crate::game::input::{Controls, KeyState, PlayerCount, RisingEdge};
use crate::game::mechanics::{Game, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Play,
    GameOver,
}

/// The menu / play / game-over state machine around one [Game].
/// The game is replaced, never reset, whenever a round starts or ends.
pub struct Session {
    state: AppState,
    player_count: PlayerCount,
    game: Game,
    space: RisingEdge,
    sfx: Rc<dyn SoundPlayer>,
}

impl Session {
    pub fn new(config: &Config, sfx: Rc<dyn SoundPlayer>) -> Self {
        Self {
            state: AppState::Menu,
            player_count: PlayerCount::One,
            game: Game::new(config, Controls::none(), Rc::clone(&sfx)),
            space: RisingEdge::default(),
            sfx,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn player_count(&self) -> PlayerCount {
        self.player_count
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Direct access to the running game, for setting up test situations.
    #[doc(hidden)]
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// one frame of input handling and simulation
    pub fn step(&mut self, config: &Config, keys: &KeyState) {
        let space_pressed = self.space.update(keys.is_down(Key::Space));
        match self.state {
            AppState::Menu => self.menu(config, keys, space_pressed),
            AppState::Play => self.play(config, keys),
            AppState::GameOver => {
                if space_pressed {
                    self.back_to_menu(config)
                }
            }
        }
    }

    fn menu(&mut self, config: &Config, keys: &KeyState, space_pressed: bool) {
        if keys.is_down(Key::ArrowUp) && self.player_count == PlayerCount::Two {
            self.sfx.play(SoundCue::Up);
            self.player_count = PlayerCount::One;
        } else if keys.is_down(Key::ArrowDown) && self.player_count == PlayerCount::One {
            self.sfx.play(SoundCue::Down);
            self.player_count = PlayerCount::Two;
        }

        if space_pressed {
            let controls = Controls::for_players(self.player_count);
            self.game = Game::new(config, controls, Rc::clone(&self.sfx));
            log::info!("starting a {} player game", self.player_count);
            self.enter(AppState::Play);
        } else {
            // the menu keeps the ball bouncing in the background
            self.game.update(keys);
        }
    }

    fn play(&mut self, config: &Config, keys: &KeyState) {
        self.game.update(keys);
        if self.game.max_score() > config.win_score_threshold {
            log::info!(
                "final score: {} - {}",
                self.game.score(Side::Left),
                self.game.score(Side::Right)
            );
            self.enter(AppState::GameOver);
        }
    }

    fn back_to_menu(&mut self, config: &Config) {
        self.player_count = PlayerCount::One;
        self.game = Game::new(config, Controls::none(), Rc::clone(&self.sfx));
        self.enter(AppState::Menu);
    }

    fn enter(&mut self, state: AppState) {
        log::info!("{:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

/// Fixed frame pacing: a frame is due once per interval.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    interval: Duration,
    next_frame: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_frame: now,
        }
    }

    pub fn frame_due(&mut self, now: Instant) -> bool {
        if now < self.next_frame {
            return false;
        }
        self.next_frame += self.interval;
        // after a stall the next frame is one interval from now, lost frames are not made up
        if self.next_frame <= now {
            self.next_frame = now + self.interval;
        }
        true
    }

    pub fn until_next_frame(&self, now: Instant) -> Duration {
        self.next_frame.saturating_duration_since(now)
    }
}
