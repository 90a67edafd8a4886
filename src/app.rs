use std::time::Duration;

use log::{debug, error};

use crate::context::AppContext;
use crate::features::{ArScan, Dictionary, DictionaryBack, Menu, Panel, QuizPanel};
use crate::lifecycle::Component;
use crate::quiz::{AnswerOutcome, HintOutcome};

#[derive(Debug, Default)]
struct ActivePanels {
    scan: bool,
    dictionary: bool,
    quiz: bool,
}

fn set_active(component: &mut dyn Component, ctx: &mut AppContext, active: &mut bool, wanted: bool) {
    if *active == wanted {
        return;
    }
    if wanted {
        debug!("Activating {}", component.name());
        component.activate(ctx);
    } else {
        debug!("Deactivating {}", component.name());
        component.deactivate(ctx);
    }
    *active = wanted;
}

/// Owns the shared services and every screen, and keeps the screens' active
/// state in line with the visible panel.
///
/// Every input (tracking events, button presses, frame ticks) comes in
/// through a method here.
pub struct App {
    ctx: AppContext,
    menu: Menu,
    scan: ArScan,
    dictionary: Dictionary,
    quiz: QuizPanel,
    active: ActivePanels,
}

impl App {
    pub fn new(mut ctx: AppContext, scan: ArScan, quiz: QuizPanel) -> Self {
        let mut menu = Menu::new();
        let mut scan = scan;
        let mut dictionary = Dictionary::new();
        let mut quiz = quiz;

        for component in [
            &mut menu as &mut dyn Component,
            &mut scan,
            &mut dictionary,
            &mut quiz,
        ] {
            component.initialize(&mut ctx);
        }
        ctx.settings.apply(&mut ctx.audio);
        menu.activate(&mut ctx);

        let mut app = Self {
            ctx,
            menu,
            scan,
            dictionary,
            quiz,
            active: ActivePanels::default(),
        };
        app.sync_panels();
        app
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn panel(&self) -> Panel {
        self.menu.panel()
    }

    pub fn scan(&self) -> &ArScan {
        &self.scan
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn quiz(&self) -> &QuizPanel {
        &self.quiz
    }

    /// Activates the screen for the visible panel and deactivates the others.
    fn sync_panels(&mut self) {
        let panel = self.menu.panel();
        let ctx = &mut self.ctx;
        // deactivate first so nothing overlaps
        if panel != Panel::Scan {
            set_active(&mut self.scan, ctx, &mut self.active.scan, false);
        }
        if panel != Panel::Dictionary {
            set_active(&mut self.dictionary, ctx, &mut self.active.dictionary, false);
        }
        if panel != Panel::Quiz {
            set_active(&mut self.quiz, ctx, &mut self.active.quiz, false);
        }
        match panel {
            Panel::Scan => set_active(&mut self.scan, ctx, &mut self.active.scan, true),
            Panel::Dictionary => {
                set_active(&mut self.dictionary, ctx, &mut self.active.dictionary, true)
            }
            Panel::Quiz => set_active(&mut self.quiz, ctx, &mut self.active.quiz, true),
            Panel::Home | Panel::Settings => {}
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        let ctx = &mut self.ctx;
        self.menu.tick(ctx, dt);
        if self.active.scan {
            self.scan.tick(ctx, dt);
        }
        if self.active.dictionary {
            self.dictionary.tick(ctx, dt);
        }
        if self.active.quiz {
            self.quiz.tick(ctx, dt);
        }
        // taps only mean something on the camera screen
        ctx.input.clear();
    }

    pub fn shutdown(&mut self) {
        let ctx = &mut self.ctx;
        set_active(&mut self.scan, ctx, &mut self.active.scan, false);
        set_active(&mut self.dictionary, ctx, &mut self.active.dictionary, false);
        set_active(&mut self.quiz, ctx, &mut self.active.quiz, false);
        self.menu.deactivate(ctx);
    }

    //--- Tracking ---

    pub fn target_found(&mut self, word_id: &str) {
        self.ctx.app_state.on_object_detected(word_id);
        self.sync_panels();
    }

    pub fn target_lost(&mut self) {
        self.ctx.app_state.on_object_lost();
        self.sync_panels();
    }

    //--- Menu ---

    pub fn open_scan(&mut self) {
        self.menu.open_scan(&mut self.ctx);
        self.sync_panels();
    }

    pub fn open_dictionary(&mut self) {
        self.menu.open_dictionary(&mut self.ctx);
        self.sync_panels();
    }

    pub fn open_quiz(&mut self) {
        self.menu.open_quiz(&mut self.ctx);
        self.sync_panels();
    }

    pub fn open_settings(&mut self) {
        self.menu.open_settings();
        self.sync_panels();
    }

    pub fn back_to_home(&mut self) {
        self.menu.back_to_home(&mut self.ctx);
        self.sync_panels();
    }

    //--- Camera screen ---

    pub fn tap(&mut self, hit: Option<String>) {
        self.ctx.input.push_tap(hit);
    }

    pub fn view_info(&mut self) -> bool {
        let opened = self.scan.view_info(&mut self.ctx);
        self.sync_panels();
        opened
    }

    pub fn quiz_from_scan(&mut self) -> bool {
        if !self.active.scan {
            return false;
        }
        let started = self.scan.start_quiz(&mut self.ctx);
        self.sync_panels();
        started
    }

    pub fn reset_scan(&mut self) -> bool {
        if !self.active.scan {
            return false;
        }
        self.scan.reset(&mut self.ctx)
    }

    pub fn walk(&mut self) -> bool {
        self.scan.walk(&mut self.ctx)
    }

    pub fn attack(&mut self) -> bool {
        self.scan.attack(&mut self.ctx)
    }

    pub fn pronounce(&mut self) -> bool {
        self.scan.pronounce(&mut self.ctx)
    }

    //--- Dictionary ---

    pub fn search(&mut self, text: &str) {
        self.dictionary.search(text);
    }

    pub fn select_word(&mut self, word_id: &str) -> bool {
        self.dictionary.select(word_id)
    }

    pub fn play_word(&mut self) -> bool {
        if !self.active.dictionary {
            return false;
        }
        self.dictionary.play_pronunciation(&mut self.ctx)
    }

    pub fn play_word_sound(&mut self) -> bool {
        if !self.active.dictionary {
            return false;
        }
        self.dictionary.play_sound(&mut self.ctx)
    }

    pub fn dictionary_back(&mut self) -> DictionaryBack {
        let back = self.dictionary.back();
        match back {
            DictionaryBack::ToList => {}
            DictionaryBack::ToScan => self.menu.return_to_scan(&mut self.ctx),
            DictionaryBack::ToHome => self.menu.back_to_home(&mut self.ctx),
        }
        self.sync_panels();
        back
    }

    //--- Quiz ---

    pub fn answer(&mut self, index: usize) -> AnswerOutcome {
        if !self.active.quiz {
            return AnswerOutcome::Ignored;
        }
        self.quiz.answer(&mut self.ctx, index)
    }

    pub fn hint(&mut self) -> HintOutcome {
        if !self.active.quiz {
            return HintOutcome::Unavailable;
        }
        self.quiz.hint(&mut self.ctx)
    }

    //--- Settings ---

    pub fn set_sfx_volume(&mut self, value: f32) {
        let ctx = &mut self.ctx;
        if let Err(err) = ctx.settings.set_sfx_volume(value, &mut *ctx.store, &mut ctx.audio) {
            error!("Failed to save sfx volume: {}", err);
        }
    }

    pub fn set_voice_volume(&mut self, value: f32) {
        let ctx = &mut self.ctx;
        if let Err(err) = ctx.settings.set_voice_volume(value, &mut *ctx.store, &mut ctx.audio) {
            error!("Failed to save voice volume: {}", err);
        }
    }

    /// Takes effect the next time the quiz opens.
    pub fn save_quiz_settings(&mut self, question_count: u32, auto_generate: bool) {
        let ctx = &mut self.ctx;
        if let Err(err) = ctx
            .settings
            .save_quiz(question_count, auto_generate, &mut *ctx.store)
        {
            error!("Failed to save quiz settings: {}", err);
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
