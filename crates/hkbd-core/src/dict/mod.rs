//! Dictionary sources for the suggestion engine.
//!
//! `ExpandableDictionary` is the in-memory, mutable trie. `SharedDictionary`
//! wraps one behind a lock so it can learn while `Suggest` holds a handle;
//! `AutoDictionary` and `UserBigramDictionary` build the learning policy on
//! top of it. Any other backing store plugs in through the `Dictionary` trait.

mod expandable;
mod learning;
mod shared;
#[cfg(test)]
mod tests;
pub mod wordlist;

pub use expandable::{ExpandableDictionary, Words};
pub use learning::{AutoDictionary, Learned, UserBigramDictionary};
pub use shared::SharedDictionary;
pub use wordlist::WordListError;

use crate::composer::WordComposer;

/// Longest word the trie stores and the longest composer it will search for.
pub const MAX_WORD_LENGTH: usize = 32;
/// Stored word frequencies saturate here.
pub const MAX_WORD_FREQUENCY: u32 = 255;
/// Bigram successor frequencies saturate here.
pub const MAXIMUM_BIGRAM_FREQUENCY: u32 = 127;
/// Extra weight for a candidate whose length equals the typed length.
pub const FULL_WORD_FREQ_MULTIPLIER: u32 = 2;
/// Whether fuzzy lookup reports a stored word identical to the typed word.
/// `Suggest` always offers the typed word itself at index 0.
pub const INCLUDE_TYPED_WORD_IF_VALID: bool = false;

/// Fixed source identifiers, in ranking-independent ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DicType {
    UserTyped = 0,
    Main = 1,
    User = 2,
    Auto = 3,
    Contacts = 4,
}

impl DicType {
    pub const ALL: [DicType; 5] = [
        DicType::UserTyped,
        DicType::Main,
        DicType::User,
        DicType::Auto,
        DicType::Contacts,
    ];
    pub const LAST_ID: u8 = DicType::Contacts as u8;

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Unigram = 0,
    Bigram = 1,
}

/// One candidate delivered by a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordHit {
    pub word: String,
    pub frequency: u32,
    pub dic_type: DicType,
    pub data_type: DataType,
}

/// How far a lookup may stray from the typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Primary characters only: the word itself and its completions.
    Prefix,
    /// Nearby-key alternates plus one pass per position that tolerates a
    /// letter the user left out.
    Fuzzy,
    /// Alternates without the missing-letter passes, for very large sources.
    Narrow,
}

/// A finite stream of hits. Lazy sources stop searching when it is
/// dropped; lock-guarded ones such as [`SharedDictionary`] collect up front.
pub type WordStream<'a> = Box<dyn Iterator<Item = WordHit> + 'a>;

pub trait Dictionary: Send + Sync {
    /// Words matching the composer under the given matching policy.
    fn words<'a>(&'a self, composer: &'a WordComposer, matching: Matching) -> WordStream<'a>;

    /// Successors recorded after `previous`. Sources without bigram data
    /// deliver nothing.
    fn bigrams<'a>(&'a self, _previous: &'a str) -> WordStream<'a> {
        Box::new(std::iter::empty())
    }

    fn is_valid_word(&self, word: &str) -> bool;

    /// Number of distinct words, used to pick a narrower search on very large
    /// sources. Zero when unknown.
    fn word_count(&self) -> usize {
        0
    }

    /// Release external resources. In-memory sources have none.
    fn close(&self) {}
}

/// Exact equality of a character buffer with `target`: same length, same
/// characters, case-sensitive.
pub fn same(buffer: &[char], target: &str) -> bool {
    buffer.iter().copied().eq(target.chars())
}
