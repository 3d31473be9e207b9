//! Dictionaries that learn from what the user commits.

use tracing::debug;

use super::{DicType, Dictionary, Matching, SharedDictionary, WordStream, MAX_WORD_LENGTH};
use crate::composer::WordComposer;
use crate::settings::LearningSettings;

/// Outcome of [`AutoDictionary::add_word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Learned {
    /// Too short or too long to learn.
    Skipped,
    /// Stored with the new accumulated frequency.
    Counted(u32),
    /// Reached the promotion threshold; the caller should add the word to
    /// the user dictionary with the promotion frequency.
    Promoted(u32),
}

/// Words the user typed that the main dictionary does not know.
///
/// Every commit adds a little frequency. A word only counts as valid once it
/// was seen often enough, and is handed over to the user dictionary when it
/// keeps coming back.
#[derive(Debug)]
pub struct AutoDictionary {
    dict: SharedDictionary,
    validity_threshold: u32,
    promotion_threshold: u32,
}

impl AutoDictionary {
    pub fn new(learning: &LearningSettings) -> Self {
        Self {
            dict: SharedDictionary::new(DicType::Auto),
            validity_threshold: learning.validity_threshold,
            promotion_threshold: learning.promotion_threshold,
        }
    }

    pub fn add_word(&self, word: &str, frequency: u32) -> Learned {
        let len = word.chars().count();
        if !(2..=MAX_WORD_LENGTH).contains(&len) {
            return Learned::Skipped;
        }
        let mut dict = self.dict.write();
        dict.add_word(word, frequency);
        let total = dict.word_frequency(word).unwrap_or(frequency);
        if total >= self.promotion_threshold {
            debug!(word, total, "promoting auto-learned word");
            Learned::Promoted(total)
        } else {
            Learned::Counted(total)
        }
    }

    pub fn frequency(&self, word: &str) -> Option<u32> {
        self.dict.word_frequency(word)
    }
}

impl Dictionary for AutoDictionary {
    fn words<'a>(&'a self, composer: &'a WordComposer, matching: Matching) -> WordStream<'a> {
        self.dict.words(composer, matching)
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.frequency(word)
            .is_some_and(|f| f >= self.validity_threshold)
    }

    fn word_count(&self) -> usize {
        self.dict.word_count()
    }
}

/// (previous → next) pairs observed in the user's own text.
///
/// Only contributes bigrams; successors are reported once their frequency
/// reached the suggest threshold.
#[derive(Debug)]
pub struct UserBigramDictionary {
    dict: SharedDictionary,
    frequency_for_typed: u32,
}

impl UserBigramDictionary {
    pub fn new(learning: &LearningSettings) -> Self {
        let dict = SharedDictionary::new(DicType::User);
        dict.write()
            .set_bigram_threshold(learning.bigram_suggest_threshold);
        Self {
            dict,
            frequency_for_typed: learning.bigram_frequency_for_typed,
        }
    }

    /// Record one more occurrence of `next` after `previous` and return the
    /// accumulated frequency.
    pub fn add_bigram(&self, previous: &str, next: &str) -> u32 {
        let mut dict = self.dict.write();
        dict.add_bigram(previous, next, self.frequency_for_typed);
        dict.bigram_frequency(previous, next).unwrap_or(0)
    }

    pub fn frequency(&self, previous: &str, next: &str) -> Option<u32> {
        self.dict.read().bigram_frequency(previous, next)
    }
}

impl Dictionary for UserBigramDictionary {
    fn words<'a>(&'a self, _composer: &'a WordComposer, _matching: Matching) -> WordStream<'a> {
        Box::new(std::iter::empty())
    }

    fn bigrams<'a>(&'a self, previous: &'a str) -> WordStream<'a> {
        self.dict.bigrams(previous)
    }

    fn is_valid_word(&self, _word: &str) -> bool {
        false
    }
}
