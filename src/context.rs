use std::collections::VecDeque;
use std::rc::Rc;

use rand::rngs::StdRng;

use crate::app_state::AppStateManager;
use crate::audio::AudioManager;
use crate::settings::{KeyValueStore, Settings};
use crate::words::WordDatabase;

/// A screen tap, already resolved by the host's raycast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tap {
    /// Word id of the model that was hit, if any.
    pub hit: Option<String>,
}

/// Taps collected between ticks.
#[derive(Debug, Default)]
pub struct InputQueue {
    taps: VecDeque<Tap>,
}

impl InputQueue {
    pub fn push_tap(&mut self, hit: Option<String>) {
        self.taps.push_back(Tap { hit });
    }

    pub fn pop_tap(&mut self) -> Option<Tap> {
        self.taps.pop_front()
    }

    pub fn clear(&mut self) {
        self.taps.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}

/// Services shared by every component, owned by the app and lent out on each
/// lifecycle call.
pub struct AppContext {
    pub app_state: AppStateManager,
    pub words: Rc<WordDatabase>,
    pub audio: AudioManager,
    pub settings: Settings,
    pub store: Box<dyn KeyValueStore>,
    pub input: InputQueue,
    pub rng: StdRng,
}
