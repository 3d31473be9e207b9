//! Per-keyboard input session: the call path from keystrokes to suggestions.
//!
//! `InputSession` owns the word being composed, the text entry state and the
//! ranking engine. It commits words on separators (auto-correcting when the
//! engine is confident), learns from what the user commits, and lets a
//! backspace right after an auto-correction put the typed word back.

pub(crate) mod types;

mod commit;
mod key_handlers;
mod response;
mod text_entry;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use hkbd_core::composer::WordComposer;
use hkbd_core::dict::{AutoDictionary, DicType, Dictionary, SharedDictionary, UserBigramDictionary};
use hkbd_core::settings::{settings, LearningSettings, Settings};
use hkbd_core::suggest::{CorrectionMode, Suggest};

pub use text_entry::{EntryState, SessionStats, TextEntryState};
pub use types::{EditorBuffer, KeyResponse};

use types::LastCommit;

pub struct InputSession {
    suggest: Suggest,
    composer: WordComposer,
    entry: TextEntryState,
    learning: LearningSettings,

    user: Arc<SharedDictionary>,
    auto: Arc<AutoDictionary>,
    user_bigrams: Arc<UserBigramDictionary>,

    candidates: Vec<String>,
    /// Last committed word, context for bigram lookups and learning.
    previous_word: Option<String>,
    last_commit: Option<LastCommit>,
}

impl InputSession {
    /// Session over `main` with the process-wide settings.
    pub fn new(main: Arc<dyn Dictionary>) -> Self {
        Self::with_settings(main, settings())
    }

    pub fn with_settings(main: Arc<dyn Dictionary>, config: &Settings) -> Self {
        let user = Arc::new(SharedDictionary::new(DicType::User));
        let auto = Arc::new(AutoDictionary::new(&config.learning));
        let user_bigrams = Arc::new(UserBigramDictionary::new(&config.learning));

        let mut suggest = Suggest::new(&config.suggest);
        suggest.set_dictionary(DicType::Main, main);
        suggest.set_dictionary(DicType::User, user.clone());
        suggest.set_dictionary(DicType::Auto, auto.clone());
        suggest.set_bigram_dictionary(Some(user_bigrams.clone()));

        Self {
            suggest,
            composer: WordComposer::new(),
            entry: TextEntryState::new(),
            learning: config.learning.clone(),
            user,
            auto,
            user_bigrams,
            candidates: Vec::new(),
            previous_word: None,
            last_commit: None,
        }
    }

    pub fn set_correction_mode(&mut self, mode: CorrectionMode) {
        self.suggest.set_correction_mode(mode);
    }

    pub fn correction_mode(&self) -> CorrectionMode {
        self.suggest.correction_mode()
    }

    /// Whether the editor capitalized the next word on its own (sentence
    /// start). Learning stores such words with a lowercase first letter.
    pub fn set_auto_capitalized(&mut self, auto: bool) {
        self.composer.set_auto_capitalized(auto);
    }

    pub fn state(&self) -> EntryState {
        self.entry.state()
    }

    pub fn stats(&self) -> &SessionStats {
        self.entry.stats()
    }

    pub fn is_composing(&self) -> bool {
        !self.composer.is_empty()
    }

    pub fn composing(&self) -> Option<&str> {
        self.composer.typed_word()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.candidates
    }

    pub fn previous_word(&self) -> Option<&str> {
        self.previous_word.as_deref()
    }

    pub fn next_letters_frequencies(&self) -> &[u32] {
        self.suggest.next_letters_frequencies()
    }

    pub fn user_dictionary(&self) -> &Arc<SharedDictionary> {
        &self.user
    }

    pub fn auto_dictionary(&self) -> &Arc<AutoDictionary> {
        &self.auto
    }

    pub fn user_bigrams(&self) -> &Arc<UserBigramDictionary> {
        &self.user_bigrams
    }

    /// Count a new input session (a text field gained focus).
    pub fn new_session(&mut self) {
        self.entry.new_session();
        self.reset();
    }

    /// Log the session counters and drop any composition.
    pub fn end_session(&mut self) {
        self.entry.end_session();
        self.reset();
    }

    /// Forget the composition and the text context without committing.
    pub fn reset(&mut self) {
        self.composer.reset();
        self.entry.reset();
        self.candidates.clear();
        self.previous_word = None;
        self.last_commit = None;
    }
}
