use hkbd_core::composer::KeyCode;
use hkbd_core::dict::{Dictionary, Learned};
use tracing::{debug, debug_span};

use super::types::KeyResponse;
use super::InputSession;

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl InputSession {
    /// The word a separator commits: the top correction when the engine
    /// found one, else the typed word.
    pub(super) fn best_word(&self, typed: &str) -> String {
        self.suggest
            .auto_correction()
            .unwrap_or(typed)
            .to_string()
    }

    /// Learn from a committed word. Only done under full correction, where
    /// the user expects the keyboard to adapt.
    ///
    /// Unknown words (and words the auto dictionary already trusts) gain
    /// `frequency`; with `unigram` false only the bigram is recorded.
    pub(super) fn learn(&self, word: &str, frequency: u32, unigram: bool) {
        if word.is_empty() || !self.suggest.correction_mode().is_full() {
            return;
        }

        if unigram {
            let known =
                self.suggest.is_valid_word(word) || self.suggest.is_valid_word(&word.to_lowercase());
            if self.auto.is_valid_word(word) || !known {
                let learned = if self.composer.is_auto_capitalized() {
                    lower_first(word)
                } else {
                    word.to_string()
                };
                if let Learned::Promoted(total) = self.auto.add_word(&learned, frequency) {
                    if self.user.word_frequency(&learned).is_none() {
                        debug!(word = %learned, total, "promoted to user dictionary");
                        self.user.add_word(&learned, self.learning.frequency_for_auto_add);
                    }
                }
            }
        }

        if let Some(previous) = self.previous_word.as_deref() {
            let key = self.suggest.bigram_key(previous);
            let total = self.user_bigrams.add_bigram(&key, word);
            debug!(previous = %key, word, total, "learned bigram");
        }
    }

    /// Commit the suggestion at `index` (0 is the typed word). Outside a
    /// correction the word is followed by a space.
    pub fn pick_suggestion(&mut self, index: usize) -> KeyResponse {
        let _span = debug_span!("pick_suggestion", index).entered();
        let Some(word) = self.candidates.get(index).cloned() else {
            return KeyResponse::not_consumed();
        };
        let Some(typed) = self.composer.typed_word().map(str::to_string) else {
            return KeyResponse::not_consumed();
        };

        let correcting = self.entry.is_correcting();
        self.entry.accepted_suggestion(&typed, &word);
        if index == 0 {
            let frequency = self.learning.frequency_for_picked;
            self.learn(&word, frequency, true);
        } else {
            self.learn(&word, 1, false);
        }

        let mut resp = KeyResponse::consumed();
        resp.commit = Some(if correcting {
            word.clone()
        } else {
            format!("{word} ")
        });
        resp.composing = Some(String::new());
        self.previous_word = (!correcting).then_some(word);
        self.last_commit = None;
        self.composer.reset();
        self.refresh_candidates();
        resp
    }

    /// Reopen `word`, which sits right before the cursor, for correction.
    /// Ignored while composing.
    pub fn select_for_correction(&mut self, word: &str) -> KeyResponse {
        let _span = debug_span!("select_for_correction", word).entered();
        if word.is_empty() || !self.composer.is_empty() {
            return KeyResponse::not_consumed();
        }

        self.composer.reset();
        for c in word.chars() {
            self.composer.add(c, &[c as KeyCode]);
        }
        self.composer
            .set_first_char_capitalized(word.chars().next().is_some_and(char::is_uppercase));
        self.entry.selected_for_correction();
        self.last_commit = None;
        self.refresh_candidates();

        let resp = KeyResponse {
            delete_before: word.chars().count(),
            ..KeyResponse::consumed()
        };
        self.with_composing(resp)
    }

    /// Commit the composition exactly as typed, e.g. when the text field
    /// loses focus.
    pub fn finish_input(&mut self) -> KeyResponse {
        let Some(typed) = self.composer.typed_word().map(str::to_string) else {
            return KeyResponse::not_consumed();
        };
        self.entry.manual_typed(&typed);
        let frequency = self.learning.frequency_for_typed;
        self.learn(&typed, frequency, true);

        let mut resp = KeyResponse::consumed();
        resp.commit = Some(typed);
        resp.composing = Some(String::new());
        self.composer.reset();
        self.last_commit = None;
        self.refresh_candidates();
        resp
    }
}
