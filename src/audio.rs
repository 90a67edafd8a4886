use log::{debug, info};

/// Mixer groups the app exposes a volume for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Sfx,
    Voice,
}

/// Short sounds the quiz asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue<'a> {
    Correct,
    Wrong,
    Hint(&'a str),
}

/// Anything that can play quiz feedback.
pub trait CuePlayer {
    fn play_cue(&mut self, cue: Cue<'_>);
}

/// The sound output the manager drives. Clips are asset paths.
pub trait AudioBackend {
    fn set_gain(&mut self, channel: Channel, decibels: f32);
    fn play(&mut self, channel: Channel, clip: &str);
    fn stop(&mut self, channel: Channel);
}

/// Backend for headless runs: every call becomes a log line.
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn set_gain(&mut self, channel: Channel, decibels: f32) {
        debug!("{:?} gain set to {:.1} dB", channel, decibels);
    }

    fn play(&mut self, channel: Channel, clip: &str) {
        info!("♪ [{:?}] {}", channel, clip);
    }

    fn stop(&mut self, channel: Channel) {
        debug!("{:?} stopped", channel);
    }
}

/// Quiz feedback clips. Either may be left unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackClips {
    pub correct: Option<String>,
    pub wrong: Option<String>,
}

/// Lowest slider value before log10 blows up.
const MIN_LINEAR: f32 = 0.0001;

/// Slider value (0..=1) to mixer attenuation (-80..=0 dB).
pub fn linear_to_decibels(linear: f32) -> f32 {
    linear.clamp(MIN_LINEAR, 1.0).log10() * 20.0
}

pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    feedback: FeedbackClips,
    sfx_level: f32,
    voice_level: f32,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>, feedback: FeedbackClips) -> Self {
        Self {
            backend,
            feedback,
            sfx_level: 1.0,
            voice_level: 1.0,
        }
    }

    pub fn sfx_level(&self) -> f32 {
        self.sfx_level
    }

    pub fn voice_level(&self) -> f32 {
        self.voice_level
    }

    pub fn set_sfx_level(&mut self, level: f32) {
        self.sfx_level = level.clamp(0.0, 1.0);
        self.backend.set_gain(Channel::Sfx, linear_to_decibels(self.sfx_level));
    }

    pub fn set_voice_level(&mut self, level: f32) {
        self.voice_level = level.clamp(0.0, 1.0);
        self.backend.set_gain(Channel::Voice, linear_to_decibels(self.voice_level));
    }

    /// `interrupt` stops whatever the sfx channel is playing first.
    pub fn play_sfx(&mut self, clip: Option<&str>, interrupt: bool) {
        let Some(clip) = clip else {
            debug!("No sfx clip to play");
            return;
        };
        if interrupt {
            self.backend.stop(Channel::Sfx);
        }
        self.backend.play(Channel::Sfx, clip);
    }

    // A new voice line always cuts the previous one.
    pub fn play_voice(&mut self, clip: Option<&str>) {
        let Some(clip) = clip else {
            debug!("No voice clip to play");
            return;
        };
        self.backend.stop(Channel::Voice);
        self.backend.play(Channel::Voice, clip);
    }
}

impl CuePlayer for AudioManager {
    fn play_cue(&mut self, cue: Cue<'_>) {
        match cue {
            Cue::Correct => {
                let clip = self.feedback.correct.clone();
                self.play_sfx(clip.as_deref(), false);
            }
            Cue::Wrong => {
                let clip = self.feedback.wrong.clone();
                self.play_sfx(clip.as_deref(), false);
            }
            Cue::Hint(clip) => self.play_voice(Some(clip)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Gain(Channel, f32),
        Play(Channel, String),
        Stop(Channel),
    }

    /// Backend that records calls into a shared log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingBackend {
        pub calls: Rc<RefCell<Vec<Call>>>,
    }

    impl RecordingBackend {
        pub fn played(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Play(_, clip) => Some(clip.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl AudioBackend for RecordingBackend {
        fn set_gain(&mut self, channel: Channel, decibels: f32) {
            self.calls.borrow_mut().push(Call::Gain(channel, decibels));
        }

        fn play(&mut self, channel: Channel, clip: &str) {
            self.calls.borrow_mut().push(Call::Play(channel, clip.to_string()));
        }

        fn stop(&mut self, channel: Channel) {
            self.calls.borrow_mut().push(Call::Stop(channel));
        }
    }

    /// Cue player that only remembers what it was asked to play.
    #[derive(Debug, Default)]
    pub struct CueLog {
        pub cues: Vec<String>,
    }

    impl CuePlayer for CueLog {
        fn play_cue(&mut self, cue: Cue<'_>) {
            let name = match cue {
                Cue::Correct => "correct".to_string(),
                Cue::Wrong => "wrong".to_string(),
                Cue::Hint(clip) => format!("hint:{clip}"),
            };
            self.cues.push(name);
        }
    }
}
