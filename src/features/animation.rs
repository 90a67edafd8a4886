use std::time::Duration;

use log::{debug, warn};

use crate::timer::{Scheduler, TimerHandle};
use crate::words::AnimationNames;

const IDLE: &str = "Idle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clip {
    Idle,
    Walk,
    Attack,
}

/// Plays Idle/Walk/Attack on the tracked model. Walk and Attack run for a fixed
/// time and then fall back to Idle; a running one blocks the next.
#[derive(Debug)]
pub struct AnimationController {
    names: AnimationNames,
    duration: Duration,
    current: Clip,
    back_to_idle: Option<TimerHandle>,
    timers: Scheduler<()>,
}

impl AnimationController {
    pub fn new(duration: Duration) -> Self {
        Self {
            names: AnimationNames::default(),
            duration,
            current: Clip::Idle,
            back_to_idle: None,
            timers: Scheduler::new(),
        }
    }

    /// Empty names keep the previous value.
    pub fn set_names(&mut self, names: &AnimationNames) {
        if !names.walk.is_empty() {
            self.names.walk = names.walk.clone();
        }
        if !names.attack.is_empty() {
            self.names.attack = names.attack.clone();
        }
    }

    pub fn current(&self) -> Clip {
        self.current
    }

    pub fn current_name(&self) -> &str {
        match self.current {
            Clip::Idle => IDLE,
            Clip::Walk => &self.names.walk,
            Clip::Attack => &self.names.attack,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.back_to_idle.is_some()
    }

    /// Also drops a pending return to idle, so it cannot cut a later clip short.
    pub fn play_idle(&mut self) {
        if let Some(handle) = self.back_to_idle.take() {
            self.timers.cancel(handle);
        }
        self.current = Clip::Idle;
    }

    pub fn play_walk(&mut self) -> bool {
        self.play(Clip::Walk)
    }

    pub fn play_attack(&mut self) -> bool {
        self.play(Clip::Attack)
    }

    fn play(&mut self, clip: Clip) -> bool {
        if self.is_playing() {
            debug!("{:?} ignored, {} still playing", clip, self.current_name());
            return false;
        }
        self.current = clip;
        if self.current_name().is_empty() {
            warn!("No animation name set for {:?}", clip);
            self.current = Clip::Idle;
            return false;
        }
        debug!("Playing {}", self.current_name());
        self.back_to_idle = Some(self.timers.schedule(self.duration, ()));
        true
    }

    /// Cuts a running animation short.
    pub fn stop(&mut self) {
        if self.is_playing() {
            debug!("Stopping {}", self.current_name());
        }
        self.play_idle();
    }

    pub fn tick(&mut self, dt: Duration) {
        if !self.timers.advance(dt).is_empty() {
            self.back_to_idle = None;
            self.current = Clip::Idle;
        }
    }
}
