use std::time::Duration;

use log::{debug, info, warn};

use crate::context::AppContext;
use crate::lifecycle::Component;
use crate::quiz::{AnswerOutcome, HintOutcome, QuizConfig, QuizData, QuizEngine};

/// The quiz screen. A new session is built every time it opens.
#[derive(Debug)]
pub struct QuizPanel {
    engine: QuizEngine,
    authored: QuizData,
}

impl QuizPanel {
    pub fn new(config: QuizConfig, authored: QuizData) -> Self {
        Self {
            engine: QuizEngine::new(config),
            authored,
        }
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    /// Answer buttons are numbered from zero.
    pub fn answer(&mut self, ctx: &mut AppContext, index: usize) -> AnswerOutcome {
        self.engine.submit_answer(index, &mut ctx.audio)
    }

    pub fn hint(&mut self, ctx: &mut AppContext) -> HintOutcome {
        self.engine.request_hint(&mut ctx.audio)
    }

    fn start_authored(&mut self) {
        if self.authored.questions.is_empty() {
            warn!("No authored quiz questions configured");
        }
        self.engine.start(self.authored.questions.clone());
    }
}

impl Component for QuizPanel {
    fn name(&self) -> &'static str {
        "quiz"
    }

    fn activate(&mut self, ctx: &mut AppContext) {
        if !ctx.settings.quiz_auto_generate {
            self.start_authored();
            return;
        }

        let count = ctx.settings.quiz_question_count as usize;
        match self.engine.start_generated(&ctx.words, count, &mut ctx.rng) {
            Ok(generated) => info!("Generated {} question(s) from the dictionary", generated),
            Err(err) => {
                warn!("{}, falling back to the authored quiz", err);
                self.start_authored();
            }
        }
    }

    fn tick(&mut self, _ctx: &mut AppContext, dt: Duration) {
        self.engine.tick(dt);
    }

    fn deactivate(&mut self, _ctx: &mut AppContext) {
        let cancelled = self.engine.cancel_pending();
        if cancelled > 0 {
            debug!("Dropped {} pending quiz timer(s)", cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::context;
    use crate::quiz::{QuizPhase, QuizQuestion};
    use crate::words::{WordCategory, WordDatabase, WordEntry};
    use std::rc::Rc;

    fn authored() -> QuizData {
        QuizData::new(vec![QuizQuestion::new(
            "What is this?",
            "Đây là gì?",
            ["Apple", "Pear", "Plum", "Fig"].map(String::from),
            0,
        )])
        .unwrap()
    }

    #[test]
    fn generates_from_settings() {
        let mut ctx = context();
        ctx.settings.quiz_question_count = 2;
        let mut panel = QuizPanel::new(QuizConfig::default(), authored());

        panel.activate(&mut ctx);
        assert_eq!(panel.engine().question_count(), 2);
        assert!(panel.engine().current_question().unwrap().word_id.is_some());
    }

    #[test]
    fn authored_when_auto_generate_is_off() {
        let mut ctx = context();
        ctx.settings.quiz_auto_generate = false;
        let mut panel = QuizPanel::new(QuizConfig::default(), authored());

        panel.activate(&mut ctx);
        assert_eq!(panel.engine().question_count(), 1);
        assert_eq!(panel.engine().current_question().unwrap().correct_answer(), Some("Apple"));
    }

    #[test]
    fn small_dictionary_falls_back_to_authored() {
        let mut ctx = context();
        ctx.words = Rc::new(
            WordDatabase::new(vec![WordEntry::new("animal_cow", WordCategory::Animal, "Cow", "Con bò")])
                .unwrap(),
        );
        let mut panel = QuizPanel::new(QuizConfig::default(), authored());

        panel.activate(&mut ctx);
        assert_eq!(panel.engine().question_count(), 1);
        assert_eq!(panel.engine().current_question().unwrap().word_id, None);
    }

    #[test]
    fn leaving_mid_reveal_cancels_advance() {
        let mut ctx = context();
        ctx.settings.quiz_auto_generate = false;
        let mut panel = QuizPanel::new(QuizConfig::default(), authored());
        panel.activate(&mut ctx);

        assert_eq!(panel.answer(&mut ctx, 0), AnswerOutcome::Correct);
        panel.deactivate(&mut ctx);
        panel.tick(&mut ctx, Duration::from_secs(10));
        assert!(matches!(panel.engine().phase(), QuizPhase::Revealed { .. }));
        assert!(!panel.engine().is_complete());
    }
}
