//! Bounded candidate lists and the scoring rules used while filling them.

use crate::dict::MAXIMUM_BIGRAM_FREQUENCY;
use crate::normalize::to_lower_case;

/// Multiplier for a candidate whose bigram frequency is 0.
pub const BIGRAM_MULTIPLIER_MIN: f64 = 1.2;
/// Multiplier for a candidate whose bigram frequency is at the maximum.
pub const BIGRAM_MULTIPLIER_MAX: f64 = 1.5;

/// Index at which `priority` enters a list holding `priorities`, or
/// `capacity` when it would fall off the end.
///
/// Slots past the end of `priorities` count as priority 0. The candidate
/// goes before the first strictly lower entry, so equal priorities keep
/// their arrival order.
pub fn insertion_index(
    priorities: impl IntoIterator<Item = u32>,
    priority: u32,
    capacity: usize,
) -> usize {
    let mut stored = priorities.into_iter();
    (0..capacity)
        .find(|_| stored.next().unwrap_or(0) < priority)
        .unwrap_or(capacity)
}

/// Linear interpolation between the multiplier bounds by bigram frequency.
pub fn bigram_multiplier(frequency: u32) -> f64 {
    let f = f64::from(frequency.min(MAXIMUM_BIGRAM_FREQUENCY));
    BIGRAM_MULTIPLIER_MIN
        + f / f64::from(MAXIMUM_BIGRAM_FREQUENCY) * (BIGRAM_MULTIPLIER_MAX - BIGRAM_MULTIPLIER_MIN)
}

pub fn boosted_priority(base: u32, bigram_frequency: u32) -> u32 {
    (f64::from(base) * bigram_multiplier(bigram_frequency)).round() as u32
}

/// Positions where both words carry the same letter, ignoring case and
/// diacritics.
pub fn matching_chars(typed: &str, candidate: &str) -> usize {
    typed
        .chars()
        .zip(candidate.chars())
        .filter(|&(a, b)| to_lower_case(a) == to_lower_case(b))
        .count()
}

/// Whether a corrected candidate shares enough letters with what was typed.
///
/// Up to two letters anything goes; three or four need two matches; longer
/// words need a strict majority of the shorter length.
pub fn has_sufficient_commonality(typed: &str, candidate: &str) -> bool {
    let min_len = typed.chars().count().min(candidate.chars().count());
    if min_len <= 2 {
        return true;
    }
    let matching = matching_chars(typed, candidate);
    if min_len <= 4 {
        matching >= 2
    } else {
        matching > min_len / 2
    }
}

fn lower(c: char) -> char {
    let mut it = c.to_lowercase();
    match (it.next(), it.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Whether `word` is a capitalized form of the lowercase `lower_typed`.
///
/// Only words starting with an uppercase letter qualify, so proper nouns
/// match without making lookups case-insensitive in general.
pub fn compare_case_insensitive(lower_typed: &str, word: &str) -> bool {
    let Some(first) = word.chars().next() else {
        return false;
    };
    if !first.is_uppercase() || word.chars().count() != lower_typed.chars().count() {
        return false;
    }
    word.chars().map(lower).eq(lower_typed.chars())
}

/// Capitalization the user typed, carried over to every candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseStyle {
    pub all_upper: bool,
    pub first_upper: bool,
}

impl CaseStyle {
    pub fn apply(self, word: &str) -> String {
        if self.all_upper {
            return word.to_uppercase();
        }
        if self.first_upper {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                return first.to_uppercase().chain(chars).collect();
            }
        }
        word.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub word: String,
    pub priority: u32,
}

/// Priority-sorted candidates, never longer than its capacity.
#[derive(Debug, Clone)]
pub struct RankedList {
    entries: Vec<Ranked>,
    capacity: usize,
}

impl RankedList {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert by priority. Returns the index used, or `None` if the list is
    /// full of entries at least as strong.
    pub fn offer(&mut self, word: String, priority: u32) -> Option<usize> {
        let stored = self.entries.iter().map(|r| r.priority);
        let pos = insertion_index(stored, priority, self.capacity);
        if pos >= self.capacity {
            return None;
        }
        self.insert_at(pos, word, priority);
        Some(pos)
    }

    /// Insert at a fixed index regardless of priority, dropping the last
    /// entry when over capacity.
    pub fn insert_at(&mut self, pos: usize, word: String, priority: u32) {
        if self.capacity == 0 {
            return;
        }
        let pos = pos.min(self.entries.len());
        self.entries.insert(pos, Ranked { word, priority });
        self.entries.truncate(self.capacity);
    }

    /// First (strongest) entry for `word`.
    pub fn find(&self, word: &str) -> Option<&Ranked> {
        self.entries.iter().find(|r| r.word == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ranked> {
        self.entries.iter()
    }

    pub fn into_words(self) -> Vec<String> {
        self.entries.into_iter().map(|r| r.word).collect()
    }
}
