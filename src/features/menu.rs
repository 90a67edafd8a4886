use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use crate::app_state::AppState;
use crate::context::AppContext;
use crate::lifecycle::Component;
use crate::signal::SubscriptionId;

/// Top-level screens. Only one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Home,
    Scan,
    Dictionary,
    Quiz,
    Settings,
}

impl Panel {
    pub fn for_state(state: AppState) -> Self {
        match state {
            AppState::Home => Panel::Home,
            AppState::ARScanning | AppState::ARObjectFound => Panel::Scan,
            AppState::Quiz => Panel::Quiz,
            AppState::Dictionary => Panel::Dictionary,
        }
    }
}

/// Home screen buttons and panel switching. Stays active for the whole run.
#[derive(Debug)]
pub struct Menu {
    panel: Rc<Cell<Panel>>,
    subscription: Option<SubscriptionId>,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            panel: Rc::new(Cell::new(Panel::Home)),
            subscription: None,
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel.get()
    }

    pub fn open_scan(&mut self, ctx: &mut AppContext) {
        ctx.app_state.clear_detected();
        ctx.app_state.start_scan();
    }

    pub fn open_dictionary(&mut self, ctx: &mut AppContext) {
        ctx.app_state.clear_detected();
        ctx.app_state.change_state(AppState::Dictionary);
    }

    pub fn open_quiz(&mut self, ctx: &mut AppContext) {
        ctx.app_state.clear_detected();
        ctx.app_state.change_state(AppState::Quiz);
    }

    // Settings is a panel of its own, not an app state.
    pub fn open_settings(&mut self) {
        self.panel.set(Panel::Settings);
    }

    /// Back from a screen opened off the camera view.
    pub fn return_to_scan(&mut self, ctx: &mut AppContext) {
        self.panel.set(Panel::Scan);
        let state = match ctx.app_state.current_word_id() {
            Some(_) => AppState::ARObjectFound,
            None => AppState::ARScanning,
        };
        ctx.app_state.change_state(state);
    }

    pub fn back_to_home(&mut self, ctx: &mut AppContext) {
        ctx.app_state.clear_detected();
        ctx.app_state.change_state(AppState::Home);
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Menu {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn activate(&mut self, ctx: &mut AppContext) {
        self.panel.set(Panel::for_state(ctx.app_state.state()));

        let panel = self.panel.clone();
        self.subscription = Some(ctx.app_state.subscribe_state_changed(move |state| {
            let next = Panel::for_state(*state);
            // tracking keeps reporting while other screens are open
            if next == Panel::Scan
                && matches!(panel.get(), Panel::Dictionary | Panel::Quiz | Panel::Settings)
            {
                return;
            }
            debug!("Showing {:?} panel", next);
            panel.set(next);
        }));
    }

    fn deactivate(&mut self, ctx: &mut AppContext) {
        if let Some(id) = self.subscription.take() {
            ctx.app_state.unsubscribe_state_changed(id);
        }
    }
}
