use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info, warn};

use super::animation::AnimationController;
use crate::app_state::AppState;
use crate::context::AppContext;
use crate::lifecycle::Component;
use crate::signal::SubscriptionId;
use crate::words::{WordDatabase, WordEntry};

/// What the camera screen currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanView {
    pub detected: Option<WordEntry>,
    pub scan_prompt_visible: bool,
    /// View info and quiz buttons.
    pub actions_visible: bool,
    pub reset_visible: bool,
}

impl Default for ScanView {
    fn default() -> Self {
        Self {
            detected: None,
            scan_prompt_visible: true,
            actions_visible: false,
            reset_visible: false,
        }
    }
}

#[derive(Debug)]
struct ScanState {
    view: ScanView,
    animation: AnimationController,
    auto_show_actions: bool,
}

impl ScanState {
    fn reset(&mut self) {
        self.view = ScanView::default();
        self.animation.stop();
    }

    fn handle_detected(&mut self, words: &WordDatabase, word_id: &str) {
        info!("AR target detected: {}", word_id);

        self.view.detected = words.get(word_id).cloned();
        let Some(word) = &self.view.detected else {
            warn!("Word with id '{}' not found in database", word_id);
            self.reset();
            return;
        };
        debug!("Word found: {} ({})", word.english_name, word.vietnamese_name);

        if word.has_animations() {
            self.animation.set_names(&word.animations);
        }
        self.animation.play_idle();

        self.view.scan_prompt_visible = false;
        self.view.reset_visible = true;
        self.view.actions_visible = self.auto_show_actions;
        if !self.auto_show_actions {
            debug!("Waiting for a tap on the model");
        }
    }
}

/// The camera screen: reacts to tracked cards and taps on the model.
#[derive(Debug)]
pub struct ArScan {
    state: Rc<RefCell<ScanState>>,
    detected_sub: Option<SubscriptionId>,
    lost_sub: Option<SubscriptionId>,
}

impl ArScan {
    pub fn new(auto_show_actions: bool, animation_duration: Duration) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScanState {
                view: ScanView::default(),
                animation: AnimationController::new(animation_duration),
                auto_show_actions,
            })),
            detected_sub: None,
            lost_sub: None,
        }
    }

    pub fn view(&self) -> ScanView {
        self.state.borrow().view.clone()
    }

    pub fn detected_word(&self) -> Option<WordEntry> {
        self.state.borrow().view.detected.clone()
    }

    pub fn animation_name(&self) -> String {
        self.state.borrow().animation.current_name().to_string()
    }

    /// "View info": opens the dictionary on the tracked word.
    pub fn view_info(&mut self, ctx: &mut AppContext) -> bool {
        if self.state.borrow().view.detected.is_none() {
            return false;
        }
        ctx.app_state.change_state(AppState::Dictionary);
        true
    }

    /// Quiz button among the card actions.
    pub fn start_quiz(&mut self, ctx: &mut AppContext) -> bool {
        {
            let state = self.state.borrow();
            if !state.view.actions_visible || state.view.detected.is_none() {
                return false;
            }
        }
        ctx.app_state.change_state(AppState::Quiz);
        true
    }

    /// Reset button: forget the card and go back to looking for one.
    pub fn reset(&mut self, ctx: &mut AppContext) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if !state.view.reset_visible {
                return false;
            }
            info!("Resetting scan state");
            state.reset();
        }
        ctx.app_state.clear_detected();
        ctx.app_state.start_scan();
        true
    }

    pub fn walk(&mut self, ctx: &mut AppContext) -> bool {
        self.animate(ctx, |animation| animation.play_walk())
    }

    pub fn attack(&mut self, ctx: &mut AppContext) -> bool {
        self.animate(ctx, |animation| animation.play_attack())
    }

    fn animate(
        &mut self,
        ctx: &mut AppContext,
        play: impl FnOnce(&mut AnimationController) -> bool,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.view.actions_visible {
            return false;
        }
        let Some(word) = state.view.detected.clone() else {
            return false;
        };
        if !word.has_animations() {
            debug!("{} has no animations", word.english_name);
            return false;
        }
        if !play(&mut state.animation) {
            return false;
        }
        ctx.audio.play_sfx(word.media.sfx_audio.as_deref(), true);
        true
    }

    pub fn pronounce(&mut self, ctx: &mut AppContext) -> bool {
        let state = self.state.borrow();
        match &state.view.detected {
            Some(word) => {
                ctx.audio.play_voice(word.media.pronounce_audio.as_deref());
                true
            }
            None => false,
        }
    }
}

impl Component for ArScan {
    fn name(&self) -> &'static str {
        "ar_scan"
    }

    fn activate(&mut self, ctx: &mut AppContext) {
        self.state.borrow_mut().reset();

        let state = self.state.clone();
        let words = ctx.words.clone();
        self.detected_sub = Some(ctx.app_state.subscribe_word_detected(move |word_id| {
            state.borrow_mut().handle_detected(&words, word_id);
        }));

        let state = self.state.clone();
        self.lost_sub = Some(ctx.app_state.subscribe_target_lost(move |_| {
            info!("AR target lost");
            state.borrow_mut().reset();
        }));

        // back from the dictionary with the card still in view
        if let Some(word_id) = ctx.app_state.current_word_id() {
            self.state.borrow_mut().handle_detected(&ctx.words, word_id);
        }
    }

    fn tick(&mut self, ctx: &mut AppContext, dt: Duration) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.animation.tick(dt);

        while let Some(tap) = ctx.input.pop_tap() {
            let Some(word) = &state.view.detected else {
                continue;
            };
            if state.view.actions_visible {
                continue;
            }
            match tap.hit {
                Some(hit) if hit != word.id => debug!("Tap hit {}, not the tracked model", hit),
                // a miss still opens the actions, the model collider is small
                _ => state.view.actions_visible = true,
            }
        }
    }

    fn deactivate(&mut self, ctx: &mut AppContext) {
        if let Some(id) = self.detected_sub.take() {
            ctx.app_state.unsubscribe_word_detected(id);
        }
        if let Some(id) = self.lost_sub.take() {
            ctx.app_state.unsubscribe_target_lost(id);
        }
        self.state.borrow_mut().animation.stop();
        ctx.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::testing::{context, context_with_audio};

    const RUN: Duration = Duration::from_secs(3);

    fn active_scan(ctx: &mut AppContext, auto_show: bool) -> ArScan {
        let mut scan = ArScan::new(auto_show, RUN);
        scan.activate(ctx);
        ctx.app_state.start_scan();
        scan
    }

    #[test]
    fn known_target_is_shown() {
        let mut ctx = context();
        let scan = active_scan(&mut ctx, true);

        ctx.app_state.on_object_detected("animal_cow");
        let view = scan.view();
        assert_eq!(view.detected.map(|w| w.english_name), Some("Cow".to_string()));
        assert!(!view.scan_prompt_visible);
        assert!(view.actions_visible);
    }

    #[test]
    fn unknown_target_shows_nothing() {
        let mut ctx = context();
        let scan = active_scan(&mut ctx, true);

        ctx.app_state.on_object_detected("unknown_id");
        assert_eq!(ctx.app_state.state(), AppState::ARObjectFound);
        assert_eq!(scan.detected_word(), None);
        assert_eq!(scan.view(), ScanView::default());
    }

    #[test]
    fn lost_target_resets() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, true);

        ctx.app_state.on_object_detected("animal_dog");
        assert!(scan.walk(&mut ctx));
        ctx.app_state.on_object_lost();

        assert_eq!(scan.view(), ScanView::default());
        assert_eq!(scan.animation_name(), "Idle");
    }

    #[test]
    fn tap_reveals_actions() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, false);
        ctx.app_state.on_object_detected("animal_cat");
        assert!(!scan.view().actions_visible);

        ctx.input.push_tap(Some("animal_dog".to_string()));
        scan.tick(&mut ctx, Duration::from_millis(16));
        assert!(!scan.view().actions_visible);

        ctx.input.push_tap(Some("animal_cat".to_string()));
        scan.tick(&mut ctx, Duration::from_millis(16));
        assert!(scan.view().actions_visible);
    }

    #[test]
    fn tap_on_nothing_falls_back_to_showing_actions() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, false);
        ctx.app_state.on_object_detected("animal_cat");

        ctx.input.push_tap(None);
        scan.tick(&mut ctx, Duration::from_millis(16));
        assert!(scan.view().actions_visible);
    }

    #[test]
    fn walk_plays_sound_and_returns_to_idle() {
        let (mut ctx, backend) = context_with_audio();
        let mut scan = active_scan(&mut ctx, true);
        ctx.app_state.on_object_detected("animal_pig");

        assert!(scan.walk(&mut ctx));
        assert!(!scan.attack(&mut ctx));
        assert_eq!(scan.animation_name(), "Walk");
        assert_eq!(backend.played(), vec!["pig_sfx.wav"]);

        scan.tick(&mut ctx, RUN);
        assert_eq!(scan.animation_name(), "Idle");
    }

    #[test]
    fn redetection_does_not_cut_the_next_walk() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, true);
        ctx.app_state.on_object_detected("animal_cow");

        assert!(scan.walk(&mut ctx));
        scan.tick(&mut ctx, Duration::from_secs(2));
        ctx.app_state.on_object_detected("animal_cow");
        assert_eq!(scan.animation_name(), "Idle");

        assert!(scan.walk(&mut ctx));
        scan.tick(&mut ctx, Duration::from_secs(1));
        assert_eq!(scan.animation_name(), "Walk");
        scan.tick(&mut ctx, Duration::from_secs(2));
        assert_eq!(scan.animation_name(), "Idle");
    }

    #[test]
    fn reset_goes_back_to_scanning() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, true);
        assert!(!scan.reset(&mut ctx));

        ctx.app_state.on_object_detected("animal_dog");
        assert!(scan.view().reset_visible);
        assert!(scan.walk(&mut ctx));

        assert!(scan.reset(&mut ctx));
        assert_eq!(scan.view(), ScanView::default());
        assert_eq!(scan.animation_name(), "Idle");
        assert_eq!(ctx.app_state.state(), AppState::ARScanning);
        assert_eq!(ctx.app_state.current_word_id(), None);
    }

    #[test]
    fn quiz_button_needs_the_actions() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, false);
        ctx.app_state.on_object_detected("animal_cat");
        assert!(!scan.start_quiz(&mut ctx));
        assert_eq!(ctx.app_state.state(), AppState::ARObjectFound);

        ctx.input.push_tap(Some("animal_cat".to_string()));
        scan.tick(&mut ctx, Duration::from_millis(16));
        assert!(scan.start_quiz(&mut ctx));
        assert_eq!(ctx.app_state.state(), AppState::Quiz);
    }

    #[test]
    fn inactive_screen_ignores_tracking() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, true);
        scan.deactivate(&mut ctx);

        ctx.app_state.on_object_detected("animal_cow");
        assert_eq!(scan.detected_word(), None);
    }

    #[test]
    fn reactivation_picks_up_tracked_card() {
        let mut ctx = context();
        let mut scan = active_scan(&mut ctx, true);
        ctx.app_state.on_object_detected("animal_cow");

        assert!(scan.view_info(&mut ctx));
        assert_eq!(ctx.app_state.state(), AppState::Dictionary);
        scan.deactivate(&mut ctx);
        scan.activate(&mut ctx);

        assert_eq!(scan.detected_word().map(|w| w.id), Some("animal_cow".to_string()));
    }
}
