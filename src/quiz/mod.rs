pub mod engine;
pub mod generate;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

pub use engine::{
    AnswerButton, AnswerOutcome, Highlight, HintOutcome, QuizConfig, QuizEngine, QuizPhase,
    QuizResult, WrongAnswerPolicy,
};
pub use generate::generate_questions;

/// Every question has exactly this many options.
pub const ANSWER_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub image: Option<String>,
    pub question_en: String,
    pub question_vi: String,
    pub answers: [String; ANSWER_COUNT],
    pub correct_index: usize,
    #[serde(default)]
    pub word_id: Option<String>,
    #[serde(default)]
    pub hint_audio: Option<String>,
}

impl QuizQuestion {
    pub fn new(
        question_en: impl Into<String>,
        question_vi: impl Into<String>,
        answers: [String; ANSWER_COUNT],
        correct_index: usize,
    ) -> Self {
        Self {
            image: None,
            question_en: question_en.into(),
            question_vi: question_vi.into(),
            answers,
            correct_index,
            word_id: None,
            hint_audio: None,
        }
    }

    /// `None` when `correct_index` points past the answers.
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers.get(self.correct_index).map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.correct_index < ANSWER_COUNT
    }
}

#[derive(Debug)]
pub enum QuizError {
    NotEnoughWords { available: usize, required: usize },
    InvalidCorrectIndex { question: usize, correct_index: usize },
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::NotEnoughWords { available, required } => write!(
                f,
                "need at least {} words to build a quiz, database has {}",
                required, available
            ),
            QuizError::InvalidCorrectIndex {
                question,
                correct_index,
            } => write!(
                f,
                "question {} has correct_index {} outside 0..{}",
                question, correct_index, ANSWER_COUNT
            ),
            QuizError::Io(err) => write!(f, "failed to read quiz: {}", err),
            QuizError::Parse(err) => write!(f, "failed to parse quiz: {}", err),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuizError::Io(err) => Some(err),
            QuizError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::Io(err)
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::Parse(err)
    }
}

/// A hand-authored question set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizData {
    pub questions: Vec<QuizQuestion>,
}

impl QuizData {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        for (i, question) in questions.iter().enumerate() {
            if !question.is_valid() {
                return Err(QuizError::InvalidCorrectIndex {
                    question: i,
                    correct_index: question.correct_index,
                });
            }
        }
        Ok(Self { questions })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, QuizError> {
        let data: QuizData = serde_json::from_reader(reader)?;
        Self::new(data.questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let data = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} authored questions from {}", data.questions.len(), path.display());
        Ok(data)
    }
}
