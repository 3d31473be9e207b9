use hkbd_core::composer::KeyCode;
use tracing::{debug, debug_span};

use super::text_entry::EntryState;
use super::types::{ends_context, KeyResponse, LastCommit};
use super::InputSession;

impl InputSession {
    /// A letter (or any other word character) with its nearby-key
    /// alternates, most likely first.
    pub fn type_char(&mut self, primary: char, alternates: &[KeyCode]) -> KeyResponse {
        let _span = debug_span!("type_char", %primary, state = %self.entry.state()).entered();
        let mut resp = KeyResponse::consumed();
        self.last_commit = None;

        if self.entry.state() == EntryState::Correcting {
            // Typing abandons the correction; the selected word goes back as is.
            resp.commit = self.composer.typed_word().map(str::to_string);
            self.composer.reset();
        }
        if self.composer.is_empty() {
            self.composer.set_first_char_capitalized(primary.is_uppercase());
        }
        self.composer.add(primary, alternates);
        self.entry.typed_character(primary, false);

        self.refresh_candidates();
        self.with_composing(resp)
    }

    /// A space or punctuation. Commits the composition first: the best
    /// suggestion under full correction, the typed word otherwise.
    pub fn type_separator(&mut self, separator: char) -> KeyResponse {
        let _span =
            debug_span!("type_separator", %separator, state = %self.entry.state()).entered();
        let mut resp = KeyResponse::consumed();

        let typed = self.composer.typed_word().map(str::to_string);
        let mut picked_default = false;
        match typed.as_deref() {
            Some(typed) => {
                let previous = self.previous_word.clone();
                let snapshot = self.composer.clone();
                let word = if self.suggest.correction_mode().is_full() {
                    picked_default = true;
                    let best = self.best_word(typed);
                    self.entry.accepted_default(Some(typed), &best);
                    best
                } else {
                    self.entry.accepted_typed(typed);
                    typed.to_string()
                };
                let frequency = self.learning.frequency_for_typed;
                self.learn(&word, frequency, true);

                let committed = format!("{word}{separator}");
                resp.commit = Some(committed.clone());
                self.last_commit = picked_default.then(|| LastCommit {
                    composer: snapshot,
                    committed,
                    previous_word: previous,
                });
                self.previous_word = Some(word);
                self.composer.reset();
            }
            None => {
                resp.commit = Some(separator.to_string());
                self.last_commit = None;
            }
        }

        self.entry.typed_character(separator, true);
        if picked_default {
            self.entry.back_to_accepted_default(typed.as_deref());
        }
        if ends_context(separator) {
            self.previous_word = None;
        }

        self.refresh_candidates();
        resp.composing = Some(String::new());
        resp
    }

    /// Delete one character. Right after an auto-commit this reverts the
    /// commit and puts the typed word back into the composition.
    pub fn backspace(&mut self) -> KeyResponse {
        let _span = debug_span!("backspace", state = %self.entry.state()).entered();

        if !self.composer.is_empty() {
            self.composer.delete_last();
            self.entry.backspace();
            self.refresh_candidates();
            return self.with_composing(KeyResponse::consumed());
        }

        self.entry.backspace();
        if self.entry.state() == EntryState::UndoCommit {
            if let Some(last) = self.last_commit.take() {
                debug!(committed = %last.committed, "reverting auto-commit");
                let mut resp = KeyResponse::consumed();
                resp.delete_before = last.committed.chars().count();
                self.composer = last.composer;
                self.previous_word = last.previous_word;
                self.entry.backspace();
                self.refresh_candidates();
                return self.with_composing(resp);
            }
        }

        self.last_commit = None;
        KeyResponse {
            delete_before: 1,
            ..KeyResponse::consumed()
        }
    }
}
