use std::cell::RefCell;
use std::rc::Rc;

use egui::Key;

use pong::app::Session;
use pong::audio::{SoundCue, SoundPlayer};
use pong::config::Config;
use pong::game::input::KeyState;

#[derive(Default)]
pub struct CueRecorder {
    cues: RefCell<Vec<SoundCue>>,
}

impl CueRecorder {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl SoundPlayer for CueRecorder {
    fn play(&self, cue: SoundCue) {
        self.cues.borrow_mut().push(cue)
    }
}

pub fn keys(down: &[Key]) -> KeyState {
    KeyState::with_keys(down.iter().copied())
}

pub fn new_session() -> (Session, Config, Rc<CueRecorder>) {
    let config = Config::default();
    let recorder = Rc::new(CueRecorder::default());
    (Session::new(&config, recorder.clone()), config, recorder)
}
