use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Dictionary, DicType, ExpandableDictionary, Matching, WordStream};
use crate::composer::WordComposer;

/// An `ExpandableDictionary` behind an `RwLock`, so a source registered with
/// `Suggest` can keep learning through a shared handle.
///
/// Lookups are eager: hits are collected while the read lock is held and
/// the returned stream owns them, so dropping it early saves nothing and
/// writers are never blocked by a live stream.
#[derive(Debug)]
pub struct SharedDictionary {
    inner: RwLock<ExpandableDictionary>,
}

impl SharedDictionary {
    pub fn new(dic_type: DicType) -> Self {
        Self::from_dictionary(ExpandableDictionary::new(dic_type))
    }

    pub fn from_dictionary(dict: ExpandableDictionary) -> Self {
        Self {
            inner: RwLock::new(dict),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ExpandableDictionary> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ExpandableDictionary> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_word(&self, word: &str, frequency: u32) {
        self.write().add_word(word, frequency);
    }

    pub fn add_bigram(&self, previous: &str, next: &str, frequency: u32) -> bool {
        self.write().add_bigram(previous, next, frequency)
    }

    pub fn word_frequency(&self, word: &str) -> Option<u32> {
        self.read().word_frequency(word)
    }
}

impl Dictionary for SharedDictionary {
    fn words<'a>(&'a self, composer: &'a WordComposer, matching: Matching) -> WordStream<'a> {
        let hits: Vec<_> = self.read().lookup(composer, matching).collect();
        Box::new(hits.into_iter())
    }

    fn bigrams<'a>(&'a self, previous: &'a str) -> WordStream<'a> {
        let hits: Vec<_> = self.read().bigrams(previous).collect();
        Box::new(hits.into_iter())
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.read().is_valid_word(word)
    }

    fn word_count(&self) -> usize {
        self.read().word_count()
    }
}
