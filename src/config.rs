use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::audio::FeedbackClips;
use crate::quiz::{QuizConfig, WrongAnswerPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Startup configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub words_path: PathBuf,
    pub quiz_path: Option<PathBuf>,
    pub settings_path: PathBuf,
    pub tick: Duration,
    pub quiz: QuizConfig,
    pub feedback: FeedbackClips,
    pub auto_show_actions: bool,
    pub animation_duration: Duration,
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            words_path: PathBuf::from("data/words.json"),
            quiz_path: None,
            settings_path: PathBuf::from("settings.json"),
            tick: Duration::from_millis(16),
            quiz: QuizConfig::default(),
            feedback: FeedbackClips::default(),
            auto_show_actions: true,
            animation_duration: Duration::from_secs(3),
            seed: None,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

fn parse_bool(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_policy(key: &'static str, raw: String) -> Result<WrongAnswerPolicy, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "retry" => Ok(WrongAnswerPolicy::RetryUntilCorrect),
        "advance" => Ok(WrongAnswerPolicy::AdvanceAfterDelay),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset keys keep their defaults; set but unparsable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(raw) = lookup("AR_LINGO_WORDS") {
            config.words_path = PathBuf::from(raw);
        }
        config.quiz_path = lookup("AR_LINGO_QUIZ").map(PathBuf::from);
        if let Some(raw) = lookup("AR_LINGO_SETTINGS") {
            config.settings_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("AR_LINGO_TICK_MS") {
            let ms: u64 = parse("AR_LINGO_TICK_MS", raw.clone())?;
            if ms == 0 {
                return Err(ConfigError::Invalid {
                    key: "AR_LINGO_TICK_MS",
                    value: raw,
                });
            }
            config.tick = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup("AR_LINGO_WRONG_ANSWER") {
            config.quiz.wrong_answer_policy = parse_policy("AR_LINGO_WRONG_ANSWER", raw)?;
        }
        if let Some(raw) = lookup("AR_LINGO_MAX_HINTS") {
            config.quiz.max_hints = parse("AR_LINGO_MAX_HINTS", raw)?;
        }
        if let Some(raw) = lookup("AR_LINGO_HINT_COOLDOWN_MS") {
            config.quiz.hint_cooldown = Duration::from_millis(parse("AR_LINGO_HINT_COOLDOWN_MS", raw)?);
        }
        if let Some(raw) = lookup("AR_LINGO_REVEAL_MS") {
            config.quiz.reveal_delay = Duration::from_millis(parse("AR_LINGO_REVEAL_MS", raw)?);
        }
        if let Some(raw) = lookup("AR_LINGO_AUTO_SHOW_ACTIONS") {
            config.auto_show_actions = parse_bool("AR_LINGO_AUTO_SHOW_ACTIONS", raw)?;
        }
        config.feedback.correct = lookup("AR_LINGO_SOUND_CORRECT");
        config.feedback.wrong = lookup("AR_LINGO_SOUND_WRONG");
        if let Some(raw) = lookup("AR_LINGO_SEED") {
            config.seed = Some(parse("AR_LINGO_SEED", raw)?);
        }

        Ok(config)
    }
}
