use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;

use super::{generate_questions, QuizError, QuizQuestion, ANSWER_COUNT};
use crate::audio::{Cue, CuePlayer};
use crate::timer::Scheduler;
use crate::words::WordDatabase;

/// What happens after a wrong answer.
///
/// The app shipped with both behaviors in different builds, so the choice is
/// left to configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrongAnswerPolicy {
    /// Show the mistake, then let the player try the same question again.
    #[default]
    RetryUntilCorrect,
    /// Show the mistake and move on after the reveal delay.
    AdvanceAfterDelay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// How long a revealed answer stays on screen before the next question.
    pub reveal_delay: Duration,
    /// How long the wrong/correct marks stay up before a retry.
    pub retry_reveal: Duration,
    pub max_hints: u32,
    pub hint_cooldown: Duration,
    pub wrong_answer_policy: WrongAnswerPolicy,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_secs(3),
            retry_reveal: Duration::from_secs(1),
            max_hints: 3,
            hint_cooldown: Duration::from_secs(2),
            wrong_answer_policy: WrongAnswerPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    Normal,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerButton {
    pub label: String,
    pub interactable: bool,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No questions loaded.
    Idle,
    AwaitingAnswer,
    Revealed { chosen: usize, correct: bool },
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    Played,
    AlreadyAnswered,
    CoolingDown,
    LimitReached,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
}

impl QuizResult {
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f32 * 100.0 / self.total as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuizTimer {
    Advance,
    ClearReveal,
}

/// Walks a question list one question at a time.
///
/// Time only moves through [`QuizEngine::tick`]; the reveal delay and hint
/// cooldown are measured on that clock.
#[derive(Debug)]
pub struct QuizEngine {
    config: QuizConfig,
    questions: Vec<QuizQuestion>,
    index: usize,
    phase: QuizPhase,
    correct: usize,
    missed_current: bool,
    buttons: [AnswerButton; ANSWER_COUNT],
    hints_used: u32,
    last_hint_at: Option<Duration>,
    timers: Scheduler<QuizTimer>,
}

impl QuizEngine {
    pub fn new(config: QuizConfig) -> Self {
        Self {
            config,
            questions: Vec::new(),
            index: 0,
            phase: QuizPhase::Idle,
            correct: 0,
            missed_current: false,
            buttons: Default::default(),
            hints_used: 0,
            last_hint_at: None,
            timers: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    //--- Session setup ---

    /// Replaces the current session. Pending timers of the old one are dropped.
    /// Questions whose correct index is out of range are dropped.
    pub fn start(&mut self, questions: Vec<QuizQuestion>) {
        self.timers.cancel_all();
        let offered = questions.len();
        self.questions = questions.into_iter().filter(QuizQuestion::is_valid).collect();
        if self.questions.len() < offered {
            warn!(
                "Dropped {} question(s) with an invalid correct index",
                offered - self.questions.len()
            );
        }
        self.index = 0;
        self.correct = 0;

        if self.questions.is_empty() {
            warn!("Quiz started without questions");
            self.phase = QuizPhase::Idle;
            self.buttons = Default::default();
            return;
        }
        info!("Quiz started with {} question(s)", self.questions.len());
        self.show_question();
    }

    /// Generates a fresh session from the database. On error the current
    /// session is left as it was.
    pub fn start_generated<R: Rng + ?Sized>(
        &mut self,
        database: &WordDatabase,
        count: usize,
        rng: &mut R,
    ) -> Result<usize, QuizError> {
        let questions = generate_questions(database, count, rng)?;
        let generated = questions.len();
        self.start(questions);
        Ok(generated)
    }

    fn show_question(&mut self) {
        let question = &self.questions[self.index];
        for (button, label) in self.buttons.iter_mut().zip(question.answers.iter()) {
            *button = AnswerButton {
                label: label.clone(),
                interactable: true,
                highlight: Highlight::Normal,
            };
        }
        if question.image.is_none() {
            debug!("Question {} has no image", self.index + 1);
        }

        self.phase = QuizPhase::AwaitingAnswer;
        self.missed_current = false;
        self.hints_used = 0;
        self.last_hint_at = None;
    }

    //--- Player input ---

    pub fn submit_answer(&mut self, index: usize, audio: &mut dyn CuePlayer) -> AnswerOutcome {
        if self.phase != QuizPhase::AwaitingAnswer || index >= ANSWER_COUNT {
            return AnswerOutcome::Ignored;
        }
        let correct_index = self.questions[self.index].correct_index;
        self.set_interactable(false);

        if index == correct_index {
            if !self.missed_current {
                self.correct += 1;
            }
            self.buttons[index].highlight = Highlight::Correct;
            audio.play_cue(Cue::Correct);

            self.phase = QuizPhase::Revealed {
                chosen: index,
                correct: true,
            };
            // a retry reveal may still be pending
            self.timers.cancel_all();
            self.timers.schedule(self.config.reveal_delay, QuizTimer::Advance);
            return AnswerOutcome::Correct;
        }

        self.missed_current = true;
        self.buttons[index].highlight = Highlight::Wrong;
        self.buttons[correct_index].highlight = Highlight::Correct;
        audio.play_cue(Cue::Wrong);

        match self.config.wrong_answer_policy {
            WrongAnswerPolicy::RetryUntilCorrect => {
                debug!("Wrong answer on question {}, retry allowed", self.index + 1);
                self.set_interactable(true);
                self.timers.cancel_all();
                self.timers.schedule(self.config.retry_reveal, QuizTimer::ClearReveal);
            }
            WrongAnswerPolicy::AdvanceAfterDelay => {
                debug!("Wrong answer on question {}, moving on", self.index + 1);
                self.phase = QuizPhase::Revealed {
                    chosen: index,
                    correct: false,
                };
                self.timers.schedule(self.config.reveal_delay, QuizTimer::Advance);
            }
        }
        AnswerOutcome::Wrong
    }

    pub fn request_hint(&mut self, audio: &mut dyn CuePlayer) -> HintOutcome {
        match self.phase {
            QuizPhase::AwaitingAnswer => {}
            QuizPhase::Revealed { .. } => return HintOutcome::AlreadyAnswered,
            QuizPhase::Idle | QuizPhase::Complete => return HintOutcome::Unavailable,
        }
        let Some(clip) = self.questions[self.index].hint_audio.clone() else {
            return HintOutcome::Unavailable;
        };
        if self.hints_used >= self.config.max_hints {
            return HintOutcome::LimitReached;
        }
        let now = self.timers.now();
        if let Some(last) = self.last_hint_at {
            if now.saturating_sub(last) < self.config.hint_cooldown {
                return HintOutcome::CoolingDown;
            }
        }

        audio.play_cue(Cue::Hint(&clip));
        self.hints_used += 1;
        self.last_hint_at = Some(now);
        if self.hints_used >= self.config.max_hints {
            debug!("Hint limit reached for question {}", self.index + 1);
        }
        HintOutcome::Played
    }

    //--- Time ---

    pub fn tick(&mut self, dt: Duration) {
        for timer in self.timers.advance(dt) {
            match timer {
                QuizTimer::Advance => self.next_question(),
                QuizTimer::ClearReveal => self.clear_reveal(),
            }
        }
    }

    /// Drops every scheduled advance/reveal. Called when the quiz screen goes away.
    pub fn cancel_pending(&mut self) -> usize {
        self.timers.cancel_all()
    }

    pub fn has_pending(&self) -> bool {
        self.timers.pending_count() > 0
    }

    fn next_question(&mut self) {
        self.index += 1;
        if self.index >= self.questions.len() {
            self.index = self.questions.len();
            self.phase = QuizPhase::Complete;
            self.set_interactable(false);
            let result = self.score();
            info!(
                "Quiz complete: {}/{} ({:.0}%)",
                result.correct,
                result.total,
                result.percentage()
            );
            return;
        }
        self.show_question();
    }

    fn clear_reveal(&mut self) {
        if self.phase != QuizPhase::AwaitingAnswer {
            return;
        }
        for button in self.buttons.iter_mut() {
            button.highlight = Highlight::Normal;
        }
    }

    fn set_interactable(&mut self, interactable: bool) {
        for button in self.buttons.iter_mut() {
            button.interactable = interactable;
        }
    }

    //--- Queries ---

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::AwaitingAnswer | QuizPhase::Revealed { .. } => self.questions.get(self.index),
            QuizPhase::Idle | QuizPhase::Complete => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// "Question 2 of 5", or `None` outside an active question.
    pub fn progress_text(&self) -> Option<String> {
        self.current_question()
            .map(|_| format!("Question {} of {}", self.index + 1, self.questions.len()))
    }

    pub fn buttons(&self) -> &[AnswerButton] {
        &self.buttons
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Whether the hint button should be enabled right now (ignores cooldown).
    pub fn hint_enabled(&self) -> bool {
        self.phase == QuizPhase::AwaitingAnswer
            && self.hints_used < self.config.max_hints
            && self
                .current_question()
                .map_or(false, |q| q.hint_audio.is_some())
    }

    /// Running score over the whole session.
    pub fn score(&self) -> QuizResult {
        QuizResult {
            correct: self.correct,
            total: self.questions.len(),
        }
    }

    /// Final score, once the last question has been passed.
    pub fn result(&self) -> Option<QuizResult> {
        self.is_complete().then(|| self.score())
    }
}
