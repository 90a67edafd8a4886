use std::rc::Rc;

use log::{debug, warn};

use crate::context::AppContext;
use crate::lifecycle::Component;
use crate::words::{WordDatabase, WordEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryMode {
    List,
    Detail,
}

/// Where the back button leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryBack {
    /// Detail view closed, list view shown.
    ToList,
    /// Opened from the camera screen, return there.
    ToScan,
    ToHome,
}

/// Word list with search, plus a detail page for one word.
#[derive(Debug, Default)]
pub struct Dictionary {
    words: Rc<WordDatabase>,
    query: String,
    selected: Option<String>,
    opened_from_scan: bool,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DictionaryMode {
        if self.selected.is_some() {
            DictionaryMode::Detail
        } else {
            DictionaryMode::List
        }
    }

    pub fn opened_from_scan(&self) -> bool {
        self.opened_from_scan
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search(&mut self, text: &str) {
        self.query = text.to_string();
    }

    /// Entries matching the current query, in database order.
    pub fn entries(&self) -> Vec<&WordEntry> {
        self.words.search(&self.query)
    }

    pub fn select(&mut self, word_id: &str) -> bool {
        if self.words.get(word_id).is_none() {
            warn!("Word with id '{}' not found in database", word_id);
            return false;
        }
        self.selected = Some(word_id.to_string());
        true
    }

    pub fn selected_word(&self) -> Option<&WordEntry> {
        self.selected.as_deref().and_then(|id| self.words.get(id))
    }

    pub fn back(&mut self) -> DictionaryBack {
        if self.opened_from_scan {
            self.opened_from_scan = false;
            self.selected = None;
            return DictionaryBack::ToScan;
        }
        match self.selected.take() {
            Some(_) => DictionaryBack::ToList,
            None => DictionaryBack::ToHome,
        }
    }

    pub fn play_pronunciation(&self, ctx: &mut AppContext) -> bool {
        let Some(word) = self.selected_word() else {
            return false;
        };
        ctx.audio.play_voice(word.media.pronounce_audio.as_deref());
        true
    }

    pub fn play_sound(&self, ctx: &mut AppContext) -> bool {
        let Some(word) = self.selected_word() else {
            return false;
        };
        ctx.audio.play_sfx(word.media.sfx_audio.as_deref(), true);
        true
    }
}

impl Component for Dictionary {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn initialize(&mut self, ctx: &mut AppContext) {
        self.words = ctx.words.clone();
    }

    fn activate(&mut self, ctx: &mut AppContext) {
        self.query.clear();
        self.selected = None;
        self.opened_from_scan = false;

        if let Some(word_id) = ctx.app_state.current_word_id() {
            debug!("Dictionary opened from scan on {}", word_id);
            self.opened_from_scan = self.select(word_id);
        }
    }
}
