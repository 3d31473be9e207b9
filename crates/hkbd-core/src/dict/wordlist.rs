//! Plain-text word lists for tools and tests.
//!
//! One entry per line, tab-separated:
//!
//! ```text
//! # comment
//! hello	120
//! hello	world	40
//! ```
//!
//! Two fields add a word with its frequency, three fields add a bigram.
//! Blank lines and lines starting with `#` are skipped.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::{DicType, ExpandableDictionary};

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Entries read from one list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordListStats {
    pub words: usize,
    pub bigrams: usize,
}

pub fn load(path: &Path, dic_type: DicType) -> Result<ExpandableDictionary, WordListError> {
    let mut dict = ExpandableDictionary::new(dic_type);
    load_into(&mut dict, path)?;
    Ok(dict)
}

pub fn load_into(dict: &mut ExpandableDictionary, path: &Path) -> Result<WordListStats, WordListError> {
    let text = fs::read_to_string(path)?;
    let stats = parse_into(dict, &text)?;
    debug!(
        path = %path.display(),
        words = stats.words,
        bigrams = stats.bigrams,
        "loaded word list"
    );
    Ok(stats)
}

pub fn parse_into(dict: &mut ExpandableDictionary, text: &str) -> Result<WordListStats, WordListError> {
    let mut stats = WordListStats::default();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        match fields.as_slice() {
            [word, freq] => {
                let freq = parse_frequency(freq, line)?;
                check_word(word, line)?;
                dict.add_word(word, freq);
                stats.words += 1;
            }
            [prev, next, freq] => {
                let freq = parse_frequency(freq, line)?;
                check_word(prev, line)?;
                check_word(next, line)?;
                dict.add_bigram(prev, next, freq);
                stats.bigrams += 1;
            }
            _ => {
                return Err(WordListError::Parse {
                    line,
                    reason: format!("expected 2 or 3 tab-separated fields, got {}", fields.len()),
                });
            }
        }
    }
    Ok(stats)
}

fn parse_frequency(field: &str, line: usize) -> Result<u32, WordListError> {
    field.parse().map_err(|_| WordListError::Parse {
        line,
        reason: format!("invalid frequency {field:?}"),
    })
}

fn check_word(word: &str, line: usize) -> Result<(), WordListError> {
    if word.is_empty() {
        return Err(WordListError::Parse {
            line,
            reason: "empty word".to_string(),
        });
    }
    Ok(())
}
