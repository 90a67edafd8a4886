use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::audio::AudioManager;

const KEY_SFX: &str = "Settings_SFX";
const KEY_VOICE: &str = "Settings_Voice";
const KEY_QUESTION_COUNT: &str = "Quiz_QuestionCount";
const KEY_AUTO_GENERATE: &str = "Quiz_AutoGenerate";

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "settings I/O failed: {}", err),
            SettingsError::Parse(err) => write!(f, "settings file is malformed: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// String-keyed preference storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn flush(&mut self) -> Result<(), SettingsError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }
}

/// A flat JSON object on disk, rewritten on every flush.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// A missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let values = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.values)?;
        Ok(())
    }
}

/// User preferences persisted across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sfx_volume: f32,
    pub voice_volume: f32,
    pub quiz_question_count: u32,
    pub quiz_auto_generate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            voice_volume: 1.0,
            quiz_question_count: 10,
            quiz_auto_generate: true,
        }
    }
}

fn read<T: std::str::FromStr>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unreadable setting {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

impl Settings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Settings::default();
        Self {
            sfx_volume: read(store, KEY_SFX, defaults.sfx_volume).clamp(0.0, 1.0),
            voice_volume: read(store, KEY_VOICE, defaults.voice_volume).clamp(0.0, 1.0),
            quiz_question_count: read(store, KEY_QUESTION_COUNT, defaults.quiz_question_count),
            // stored as 0/1
            quiz_auto_generate: read(store, KEY_AUTO_GENERATE, 1u8) != 0,
        }
    }

    /// Pushes the stored volumes into the mixer.
    pub fn apply(&self, audio: &mut AudioManager) {
        audio.set_sfx_level(self.sfx_volume);
        audio.set_voice_level(self.voice_volume);
    }

    pub fn set_sfx_volume(
        &mut self,
        value: f32,
        store: &mut dyn KeyValueStore,
        audio: &mut AudioManager,
    ) -> Result<(), SettingsError> {
        self.sfx_volume = value.clamp(0.0, 1.0);
        audio.set_sfx_level(self.sfx_volume);
        store.set(KEY_SFX, self.sfx_volume.to_string());
        store.flush()
    }

    pub fn set_voice_volume(
        &mut self,
        value: f32,
        store: &mut dyn KeyValueStore,
        audio: &mut AudioManager,
    ) -> Result<(), SettingsError> {
        self.voice_volume = value.clamp(0.0, 1.0);
        audio.set_voice_level(self.voice_volume);
        store.set(KEY_VOICE, self.voice_volume.to_string());
        store.flush()
    }

    pub fn save_quiz(
        &mut self,
        question_count: u32,
        auto_generate: bool,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), SettingsError> {
        self.quiz_question_count = question_count;
        self.quiz_auto_generate = auto_generate;
        store.set(KEY_QUESTION_COUNT, question_count.to_string());
        store.set(KEY_AUTO_GENERATE, u8::from(auto_generate).to_string());
        store.flush()?;
        info!(
            "Quiz settings saved: {} questions, auto-generate: {}",
            question_count, auto_generate
        );
        Ok(())
    }
}

/// Slider value as shown next to the slider.
pub fn percent_label(value: f32) -> String {
    format!("{:.0}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Call, RecordingBackend};
    use crate::audio::{Channel, FeedbackClips};

    #[test]
    fn defaults_when_store_is_empty() {
        let settings = Settings::load(&MemoryStore::new());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn bad_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_QUESTION_COUNT, "lots".to_string());
        store.set(KEY_SFX, "7.5".to_string());
        store.set(KEY_AUTO_GENERATE, "0".to_string());

        let settings = Settings::load(&store);
        assert_eq!(settings.quiz_question_count, 10);
        assert_eq!(settings.sfx_volume, 1.0);
        assert!(!settings.quiz_auto_generate);
    }

    #[test]
    fn changes_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let backend = RecordingBackend::default();
        let mut audio = AudioManager::new(Box::new(backend.clone()), FeedbackClips::default());
        let mut settings = Settings::default();

        settings.set_voice_volume(0.1, &mut store, &mut audio).unwrap();
        settings.save_quiz(5, false, &mut store).unwrap();

        let reloaded = Settings::load(&store);
        assert_eq!(reloaded.voice_volume, 0.1);
        assert_eq!(reloaded.quiz_question_count, 5);
        assert!(!reloaded.quiz_auto_generate);

        let calls = backend.calls.borrow();
        assert!(matches!(calls[0], Call::Gain(Channel::Voice, db) if (db + 20.0).abs() < 1e-4));
    }

    #[test]
    fn json_store_persists() {
        let path = std::env::temp_dir().join(format!("ar_lingo_settings_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get(KEY_SFX), None);
        store.set(KEY_SFX, "0.25".to_string());
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(Settings::load(&reopened).sfx_volume, 0.25);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn labels() {
        assert_eq!(percent_label(0.5), "50%");
        assert_eq!(percent_label(1.0), "100%");
    }
}
