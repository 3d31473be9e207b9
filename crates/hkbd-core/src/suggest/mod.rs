//! Suggestion orchestration.
//!
//! `Suggest` queries every registered dictionary with the composer, merges
//! the hits into one bounded ranked list and shapes it for display: the
//! typed word first, capitalization carried over, duplicates removed.

mod ranking;
#[cfg(test)]
mod tests;

pub use ranking::{
    bigram_multiplier, boosted_priority, compare_case_insensitive, has_sufficient_commonality,
    insertion_index, matching_chars, CaseStyle, Ranked, RankedList, BIGRAM_MULTIPLIER_MAX,
    BIGRAM_MULTIPLIER_MIN,
};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, debug_span, trace};

use crate::composer::WordComposer;
use crate::dict::{DicType, Dictionary, Matching, WordHit, MAX_WORD_LENGTH};
use crate::normalize::to_lower_case;
use crate::settings::{settings, SuggestSettings};

/// Upper bound accepted by [`Suggest::set_max_suggestions`].
pub const MAX_SUGGESTIONS_LIMIT: usize = 100;
/// Sources with more words than this are searched without the
/// missing-letter passes.
pub const LARGE_DICTIONARY_THRESHOLD: usize = 200_000;
pub const APPROX_MAX_WORD_LENGTH: usize = MAX_WORD_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Only the typed word is offered.
    None = 0,
    /// Exact and prefix matches.
    Basic = 1,
    /// Nearby-key and missing-letter correction.
    Full = 2,
    /// `Full` plus rescoring by the previous word.
    FullBigram = 3,
}

impl CorrectionMode {
    pub fn is_full(self) -> bool {
        matches!(self, CorrectionMode::Full | CorrectionMode::FullBigram)
    }
}

impl fmt::Display for CorrectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CorrectionMode::None => "none",
            CorrectionMode::Basic => "basic",
            CorrectionMode::Full => "full",
            CorrectionMode::FullBigram => "full_bigram",
        })
    }
}

impl FromStr for CorrectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CorrectionMode::None),
            "basic" => Ok(CorrectionMode::Basic),
            "full" => Ok(CorrectionMode::Full),
            "full_bigram" => Ok(CorrectionMode::FullBigram),
            other => Err(format!("unknown correction mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestError {
    #[error("max suggestions must be in 1..={MAX_SUGGESTIONS_LIMIT}, got {0}")]
    MaxSuggestionsOutOfRange(usize),
}

pub struct Suggest {
    dictionaries: BTreeMap<DicType, Arc<dyn Dictionary>>,
    bigram_dictionary: Option<Arc<dyn Dictionary>>,
    correction_mode: CorrectionMode,
    max_suggestions: usize,
    max_bigram_suggestions: usize,
    next_letters: Vec<u32>,
    auto_correction: Option<String>,
}

impl Default for Suggest {
    fn default() -> Self {
        Self::new(&settings().suggest)
    }
}

impl fmt::Debug for Suggest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suggest")
            .field("dictionaries", &self.dictionaries.keys().collect::<Vec<_>>())
            .field("bigram_dictionary", &self.bigram_dictionary.is_some())
            .field("correction_mode", &self.correction_mode)
            .field("max_suggestions", &self.max_suggestions)
            .finish()
    }
}

impl Suggest {
    pub fn new(config: &SuggestSettings) -> Self {
        Self {
            dictionaries: BTreeMap::new(),
            bigram_dictionary: None,
            correction_mode: config.correction_mode,
            max_suggestions: config.max_suggestions.clamp(1, MAX_SUGGESTIONS_LIMIT),
            max_bigram_suggestions: config.max_bigram_suggestions.max(1),
            next_letters: vec![0; config.next_letters_size],
            auto_correction: None,
        }
    }

    /// Register (or replace) the source for `dic_type`.
    pub fn set_dictionary(&mut self, dic_type: DicType, dict: Arc<dyn Dictionary>) {
        self.dictionaries.insert(dic_type, dict);
    }

    pub fn remove_dictionary(&mut self, dic_type: DicType) -> Option<Arc<dyn Dictionary>> {
        self.dictionaries.remove(&dic_type)
    }

    /// Extra source consulted only for bigrams, e.g. pairs learned from
    /// the user's own text.
    pub fn set_bigram_dictionary(&mut self, dict: Option<Arc<dyn Dictionary>>) {
        self.bigram_dictionary = dict;
    }

    pub fn correction_mode(&self) -> CorrectionMode {
        self.correction_mode
    }

    pub fn set_correction_mode(&mut self, mode: CorrectionMode) {
        self.correction_mode = mode;
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Set the ranked list capacity. Values outside `1..=100` are rejected.
    pub fn set_max_suggestions(&mut self, n: usize) -> Result<(), SuggestError> {
        if !(1..=MAX_SUGGESTIONS_LIMIT).contains(&n) {
            return Err(SuggestError::MaxSuggestionsOutOfRange(n));
        }
        self.max_suggestions = n;
        Ok(())
    }

    /// Whether the last request found a correction worth applying on commit.
    pub fn has_auto_correction(&self) -> bool {
        self.auto_correction.is_some()
    }

    /// The word the last request would commit in place of the typed one,
    /// with the typed capitalization applied.
    pub fn auto_correction(&self) -> Option<&str> {
        self.auto_correction.as_deref()
    }

    /// For each code point, how many completions of the last request
    /// continue with it right after the typed prefix.
    pub fn next_letters_frequencies(&self) -> &[u32] {
        &self.next_letters
    }

    /// Whether any source knows `word` exactly. Without correction every
    /// non-empty word is accepted.
    pub fn is_valid_word(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        if self.correction_mode == CorrectionMode::None {
            return true;
        }
        self.dictionaries.values().any(|d| d.is_valid_word(word))
    }

    /// Release every source.
    pub fn close(&self) {
        for dict in self.dictionaries.values() {
            dict.close();
        }
        if let Some(dict) = &self.bigram_dictionary {
            dict.close();
        }
    }

    /// Ranked suggestions for the composer: the typed word first, then up to
    /// `max_suggestions` candidates.
    pub fn get_suggestions(&mut self, composer: &WordComposer, previous: Option<&str>) -> Vec<String> {
        let _span = debug_span!(
            "get_suggestions",
            typed = composer.typed_word().unwrap_or(""),
            previous = previous.unwrap_or(""),
            mode = %self.correction_mode,
        )
        .entered();

        self.auto_correction = None;
        self.next_letters.fill(0);

        let Some(typed) = composer.typed_word() else {
            return Vec::new();
        };
        if self.correction_mode == CorrectionMode::None {
            return vec![typed.to_string()];
        }

        let lower_typed = typed.to_lowercase();
        let case = CaseStyle {
            all_upper: composer.is_all_upper_case() && composer.size() > 1,
            first_upper: composer.is_first_char_capitalized(),
        };
        let previous = previous.filter(|p| !p.is_empty()).map(|p| self.bigram_key(p));
        let size = composer.size();
        let mode = self.correction_mode;

        let mut candidates: Vec<String> = Vec::new();
        if size == 1 && matches!(mode, CorrectionMode::Basic | CorrectionMode::FullBigram) {
            if let Some(prev) = previous.as_deref() {
                candidates = self.predict_from_bigrams(prev, typed, case);
            }
        } else if size > 1 {
            let bigrams = match (mode, previous.as_deref()) {
                (CorrectionMode::FullBigram, Some(prev)) => Some(self.collect_bigrams(prev)),
                _ => None,
            };
            let mut ranked = RankedList::new(self.max_suggestions);
            let mut next_letters = std::mem::take(&mut self.next_letters);
            let mut typed_known = false;
            for (dic_type, dict) in &self.dictionaries {
                let matching = self.matching_for(*dic_type, dict.as_ref());
                for hit in dict.words(composer, matching) {
                    count_next_letter(&mut next_letters, &hit.word, size);
                    typed_known |= compare_case_insensitive(&lower_typed, &hit.word);
                    add_unigram(&mut ranked, hit, &lower_typed, case, mode, bigrams.as_ref());
                }
            }
            self.next_letters = next_letters;

            if mode.is_full() && !typed_known && !self.is_valid_typed(typed, &lower_typed) {
                self.auto_correction = ranked
                    .iter()
                    .next()
                    .filter(|best| best.word != typed)
                    .filter(|best| has_sufficient_commonality(&lower_typed, &best.word))
                    .map(|best| best.word.clone());
            }
            debug!(
                candidates = ranked.len(),
                bigrams = bigrams.as_ref().map_or(0, RankedList::len),
                auto_correction = self.auto_correction.as_deref().unwrap_or(""),
                "ranked unigrams"
            );
            candidates = ranked.into_words();
        }

        let mut suggestions = Vec::with_capacity(candidates.len() + 1);
        suggestions.push(typed.to_string());
        suggestions.extend(candidates);
        remove_dupes(&mut suggestions);
        suggestions
    }

    /// The typed word is known as typed or in lowercase, e.g. a valid word
    /// capitalized at the start of a sentence.
    fn is_valid_typed(&self, typed: &str, lower_typed: &str) -> bool {
        self.is_valid_word(typed) || (lower_typed != typed && self.is_valid_word(lower_typed))
    }

    /// The previous word as bigram tables store it: lowercased when the
    /// main dictionary knows the lowercase form (sentence-initial words).
    pub fn bigram_key(&self, previous: &str) -> String {
        let lower = previous.to_lowercase();
        let main_knows_lower = self
            .dictionaries
            .get(&DicType::Main)
            .is_some_and(|d| d.is_valid_word(&lower));
        if main_knows_lower {
            lower
        } else {
            previous.to_string()
        }
    }

    fn matching_for(&self, dic_type: DicType, dict: &dyn Dictionary) -> Matching {
        match self.correction_mode {
            CorrectionMode::None | CorrectionMode::Basic => Matching::Prefix,
            CorrectionMode::Full | CorrectionMode::FullBigram => {
                let words = dict.word_count();
                if words > LARGE_DICTIONARY_THRESHOLD {
                    trace!(?dic_type, words, "narrowing search on large dictionary");
                    Matching::Narrow
                } else {
                    Matching::Fuzzy
                }
            }
        }
    }

    /// Successors of `previous` from every source, strongest first. A word
    /// reported by several sources keeps its best frequency.
    fn collect_bigrams(&self, previous: &str) -> RankedList {
        let mut list = RankedList::new(self.max_bigram_suggestions);
        let sources = self.bigram_dictionary.iter().chain(self.dictionaries.values());
        for dict in sources {
            for hit in dict.bigrams(previous) {
                list.offer(hit.word, hit.frequency);
            }
        }
        list
    }

    /// Next-word predictions after a single typed letter.
    fn predict_from_bigrams(&self, previous: &str, typed: &str, case: CaseStyle) -> Vec<String> {
        let Some(first) = typed.chars().next().map(to_lower_case) else {
            return Vec::new();
        };
        let bigrams = self.collect_bigrams(previous);
        let predictions: Vec<String> = bigrams
            .iter()
            .filter(|r| r.word.chars().next().map(to_lower_case) == Some(first))
            .take(self.max_suggestions)
            .map(|r| case.apply(&r.word))
            .collect();
        debug!(
            bigrams = bigrams.len(),
            predictions = predictions.len(),
            "predicted from previous word"
        );
        predictions
    }
}

fn add_unigram(
    ranked: &mut RankedList,
    hit: WordHit,
    lower_typed: &str,
    case: CaseStyle,
    mode: CorrectionMode,
    bigrams: Option<&RankedList>,
) {
    if compare_case_insensitive(lower_typed, &hit.word) {
        ranked.insert_at(0, case.apply(&hit.word), hit.frequency);
        return;
    }
    if mode.is_full() && !has_sufficient_commonality(lower_typed, &hit.word) {
        return;
    }
    let priority = match bigrams.and_then(|b| b.find(&hit.word)) {
        Some(bigram) => boosted_priority(hit.frequency, bigram.priority),
        None => hit.frequency,
    };
    ranked.offer(case.apply(&hit.word), priority);
}

fn count_next_letter(counters: &mut [u32], word: &str, typed_len: usize) {
    if let Some(c) = word.chars().nth(typed_len) {
        if let Some(slot) = counters.get_mut(to_lower_case(c) as usize) {
            *slot += 1;
        }
    }
}

/// Drop later copies of a word, keeping the first occurrence.
fn remove_dupes(words: &mut Vec<String>) {
    let mut seen = HashSet::new();
    words.retain(|w| seen.insert(w.clone()));
}
