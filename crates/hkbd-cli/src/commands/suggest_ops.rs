use std::sync::Arc;

use serde::Serialize;

use hkbd_engine::composer::{KeyCode, WordComposer};
use hkbd_engine::dict::{DicType, Dictionary, ExpandableDictionary};
use hkbd_engine::settings::settings;
use hkbd_engine::suggest::{CorrectionMode, Suggest, SuggestError};

use super::load_dictionary;

/// Result of one suggestion request, as printed by `hkbdtool suggest`.
#[derive(Debug, Serialize)]
pub struct SuggestReport {
    pub typed: String,
    pub previous: Option<String>,
    pub mode: String,
    pub valid: bool,
    pub auto_correction: bool,
    /// Word a separator would commit instead of the typed one.
    pub correction: Option<String>,
    pub suggestions: Vec<String>,
    /// Letters that continue the typed prefix, most frequent first.
    pub next_letters: Vec<(char, u32)>,
}

/// Composer for `typed`, one keystroke per character with no alternates.
pub fn composer_for(typed: &str) -> WordComposer {
    let mut composer = WordComposer::new();
    for c in typed.chars() {
        composer.add(c, &[c as KeyCode]);
    }
    composer.set_first_char_capitalized(typed.chars().next().is_some_and(char::is_uppercase));
    composer
}

pub fn run_suggest(
    dict: ExpandableDictionary,
    typed: &str,
    previous: Option<&str>,
    mode: CorrectionMode,
    max: usize,
) -> Result<SuggestReport, SuggestError> {
    let dict: Arc<dyn Dictionary> = Arc::new(dict);
    let mut suggest = Suggest::new(&settings().suggest);
    suggest.set_dictionary(DicType::Main, dict);
    suggest.set_correction_mode(mode);
    suggest.set_max_suggestions(max)?;

    let composer = composer_for(typed);
    let suggestions = suggest.get_suggestions(&composer, previous);

    let mut next_letters: Vec<(char, u32)> = suggest
        .next_letters_frequencies()
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .filter_map(|(i, &n)| char::from_u32(i as u32).map(|c| (c, n)))
        .collect();
    next_letters.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    Ok(SuggestReport {
        typed: typed.to_string(),
        previous: previous.map(str::to_string),
        mode: mode.to_string(),
        valid: suggest.is_valid_word(typed),
        auto_correction: suggest.has_auto_correction(),
        correction: suggest.auto_correction().map(str::to_string),
        suggestions,
        next_letters,
    })
}

pub fn format_text(report: &SuggestReport) -> String {
    let mut out = String::new();
    for (i, word) in report.suggestions.iter().enumerate() {
        let is_correction = i > 0 && report.correction.as_deref() == Some(word.as_str());
        let mark = if is_correction { " *" } else { "" };
        out.push_str(&format!("#{:>2}: {word}{mark}\n", i));
    }
    if !report.next_letters.is_empty() {
        let letters: Vec<String> = report
            .next_letters
            .iter()
            .map(|(c, n)| format!("{c}={n}"))
            .collect();
        out.push_str(&format!("next: {}\n", letters.join(" ")));
    }
    out
}

pub fn suggest_cmd(
    words_file: &str,
    typed: &str,
    previous: Option<&str>,
    bigrams_file: Option<&str>,
    mode: CorrectionMode,
    max: usize,
    json: bool,
) {
    let dict = die!(
        load_dictionary(words_file, bigrams_file),
        "Error loading dictionary: {}"
    );
    let report = die!(run_suggest(dict, typed, previous, mode, max), "Error: {}");
    if json {
        let out = die!(serde_json::to_string_pretty(&report), "Error: {}");
        println!("{out}");
    } else {
        print!("{}", format_text(&report));
    }
}
