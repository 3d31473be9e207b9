use std::fs;
use std::path::Path;

use hkbd_engine::dict::wordlist::{self, WordListStats};
use hkbd_engine::dict::{DicType, ExpandableDictionary, WordListError};
use hkbd_engine::settings::{self, SettingsError};
use tracing::info;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

pub mod config_ops;
pub mod simulate_ops;
pub mod suggest_ops;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{path}: {source}")]
    WordList {
        path: String,
        #[source]
        source: WordListError,
    },
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

fn load_list(dict: &mut ExpandableDictionary, path: &str) -> Result<WordListStats, SourceError> {
    wordlist::load_into(dict, Path::new(path)).map_err(|source| SourceError::WordList {
        path: path.to_string(),
        source,
    })
}

/// Main dictionary from a word list, plus an optional file of extra words
/// and bigram lines.
pub fn load_dictionary(
    words_file: &str,
    bigrams_file: Option<&str>,
) -> Result<ExpandableDictionary, SourceError> {
    let mut dict = ExpandableDictionary::new(DicType::Main);
    let mut stats = load_list(&mut dict, words_file)?;
    if let Some(file) = bigrams_file {
        let extra = load_list(&mut dict, file)?;
        stats.words += extra.words;
        stats.bigrams += extra.bigrams;
    }
    info!(
        entries = stats.words,
        bigrams = stats.bigrams,
        vocabulary = dict.word_count(),
        "dictionary loaded"
    );
    Ok(dict)
}

/// Install custom settings before anything reads them.
pub fn apply_settings(settings_file: Option<&str>) -> Result<(), SourceError> {
    let Some(path) = settings_file else {
        return Ok(());
    };
    let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_string(),
        source,
    })?;
    settings::init_custom(content)?;
    Ok(())
}
