use std::fmt;

use log::{debug, info};

use crate::signal::{Signal, SubscriptionId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AppState {
    #[default]
    Home,
    /// Camera view, looking for a card.
    ARScanning,
    /// A card is tracked; quiz and dictionary shortcuts are available.
    ARObjectFound,
    Quiz,
    Dictionary,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppState::Home => "Home",
            AppState::ARScanning => "ARScanning",
            AppState::ARObjectFound => "ARObjectFound",
            AppState::Quiz => "Quiz",
            AppState::Dictionary => "Dictionary",
        };
        f.write_str(name)
    }
}

/// Holds the current screen state and the id of the tracked card, and tells
/// subscribers when either changes.
///
/// The tracking subsystem drives it through [`on_object_detected`] and
/// [`on_object_lost`]; UI buttons go through [`change_state`].
///
/// [`on_object_detected`]: AppStateManager::on_object_detected
/// [`on_object_lost`]: AppStateManager::on_object_lost
/// [`change_state`]: AppStateManager::change_state
#[derive(Debug, Default)]
pub struct AppStateManager {
    state: AppState,
    current_word_id: Option<String>,
    state_changed: Signal<AppState>,
    word_detected: Signal<str>,
    target_lost: Signal<()>,
}

impl AppStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn current_word_id(&self) -> Option<&str> {
        self.current_word_id.as_deref()
    }

    pub fn change_state(&mut self, new_state: AppState) {
        self.state = new_state;
        info!("State changed to: {}", new_state);
        self.state_changed.emit(&new_state);
    }

    pub fn on_object_detected(&mut self, word_id: &str) {
        self.current_word_id = Some(word_id.to_string());
        self.change_state(AppState::ARObjectFound);

        debug!("Detected: {}, notifying {} listener(s)", word_id, self.word_detected.len());
        self.word_detected.emit(word_id);
    }

    pub fn on_object_lost(&mut self) {
        info!("Target lost, back to scanning");
        self.current_word_id = None;
        self.change_state(AppState::ARScanning);
        self.target_lost.emit(&());
    }

    /// "Start" on the home screen.
    pub fn start_scan(&mut self) {
        info!("Starting AR session");
        self.change_state(AppState::ARScanning);
    }

    /// Forgets the tracked card without a state transition.
    pub fn clear_detected(&mut self) {
        self.current_word_id = None;
    }

    //--- Subscriptions ---

    pub fn subscribe_state_changed(&mut self, handler: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        self.state_changed.connect(handler)
    }

    pub fn unsubscribe_state_changed(&mut self, id: SubscriptionId) -> bool {
        self.state_changed.disconnect(id)
    }

    pub fn subscribe_word_detected(&mut self, handler: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.word_detected.connect(handler)
    }

    pub fn unsubscribe_word_detected(&mut self, id: SubscriptionId) -> bool {
        self.word_detected.disconnect(id)
    }

    pub fn subscribe_target_lost(&mut self, handler: impl FnMut(&()) + 'static) -> SubscriptionId {
        self.target_lost.connect(handler)
    }

    pub fn unsubscribe_target_lost(&mut self, id: SubscriptionId) -> bool {
        self.target_lost.disconnect(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_at_home() {
        let manager = AppStateManager::new();
        assert_eq!(manager.state(), AppState::Home);
        assert_eq!(manager.current_word_id(), None);
    }

    #[test]
    fn detect_and_lose_alternate() {
        let mut manager = AppStateManager::new();
        manager.start_scan();

        for id in ["animal_cow", "animal_dog", "animal_cow"] {
            manager.on_object_detected(id);
            assert_eq!(manager.state(), AppState::ARObjectFound);
            assert_eq!(manager.current_word_id(), Some(id));

            manager.on_object_lost();
            assert_eq!(manager.state(), AppState::ARScanning);
            assert_eq!(manager.current_word_id(), None);
        }
    }

    #[test]
    fn detection_notifies_state_before_word() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut manager = AppStateManager::new();

        let sink = events.clone();
        manager.subscribe_state_changed(move |state| sink.borrow_mut().push(format!("state:{state}")));
        let sink = events.clone();
        manager.subscribe_word_detected(move |id| sink.borrow_mut().push(format!("word:{id}")));
        let sink = events.clone();
        manager.subscribe_target_lost(move |_| sink.borrow_mut().push("lost".to_string()));

        manager.on_object_detected("animal_pig");
        manager.on_object_lost();

        assert_eq!(
            *events.borrow(),
            vec!["state:ARObjectFound", "word:animal_pig", "state:ARScanning", "lost"]
        );
    }

    #[test]
    fn unknown_id_still_transitions() {
        let mut manager = AppStateManager::new();
        manager.on_object_detected("unknown_id");
        assert_eq!(manager.state(), AppState::ARObjectFound);
        assert_eq!(manager.current_word_id(), Some("unknown_id"));
    }

    #[test]
    fn unsubscribed_listener_stays_quiet() {
        let hits = Rc::new(RefCell::new(0));
        let mut manager = AppStateManager::new();

        let counter = hits.clone();
        let id = manager.subscribe_state_changed(move |_| *counter.borrow_mut() += 1);
        manager.change_state(AppState::Quiz);
        assert!(manager.unsubscribe_state_changed(id));
        manager.change_state(AppState::Home);

        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn clear_detected_keeps_state() {
        let mut manager = AppStateManager::new();
        manager.on_object_detected("animal_cat");
        manager.clear_detected();
        assert_eq!(manager.state(), AppState::ARObjectFound);
        assert_eq!(manager.current_word_id(), None);
    }
}
