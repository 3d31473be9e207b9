use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use super::*;
use crate::composer::{KeyCode, WordComposer};
use crate::dict::{ExpandableDictionary, SharedDictionary, WordStream};
use crate::settings::{parse_settings_toml, DEFAULT_SETTINGS_TOML};

fn typed(word: &str) -> WordComposer {
    let mut composer = WordComposer::new();
    for c in word.chars() {
        composer.add(c, &[c as KeyCode]);
    }
    composer.set_first_char_capitalized(word.chars().next().is_some_and(char::is_uppercase));
    composer
}

fn frames(keys: &[(char, &str)]) -> WordComposer {
    let mut composer = WordComposer::new();
    for &(primary, alternates) in keys {
        let codes: Vec<KeyCode> = alternates.chars().map(|c| c as KeyCode).collect();
        composer.add(primary, &codes);
    }
    composer
}

fn main_dict(words: &[(&str, u32)]) -> ExpandableDictionary {
    let mut d = ExpandableDictionary::new(DicType::Main);
    for &(w, f) in words {
        d.add_word(w, f);
    }
    d
}

fn suggest_with(dict: ExpandableDictionary, mode: CorrectionMode) -> Suggest {
    let config = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap().suggest;
    let mut suggest = Suggest::new(&config);
    suggest.set_dictionary(DicType::Main, Arc::new(dict));
    suggest.set_correction_mode(mode);
    suggest
}

fn hel_dict() -> ExpandableDictionary {
    main_dict(&[("hello", 100), ("help", 50), ("world", 80)])
}

// --- constants ---

#[test]
fn test_dictionary_type_ids() {
    let ids: Vec<u8> = DicType::ALL.iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(DicType::LAST_ID, 4);
}

#[test]
fn test_correction_modes_are_ordered() {
    assert_eq!(CorrectionMode::None as u8, 0);
    assert_eq!(CorrectionMode::Basic as u8, 1);
    assert_eq!(CorrectionMode::Full as u8, 2);
    assert_eq!(CorrectionMode::FullBigram as u8, 3);
    assert!(CorrectionMode::None < CorrectionMode::Basic);
    assert!(CorrectionMode::Basic < CorrectionMode::Full);
    assert!(CorrectionMode::Full < CorrectionMode::FullBigram);
    assert!(CorrectionMode::FullBigram.is_full());
    assert!(!CorrectionMode::Basic.is_full());
}

#[test]
fn test_correction_mode_round_trips_through_text() {
    for mode in [
        CorrectionMode::None,
        CorrectionMode::Basic,
        CorrectionMode::Full,
        CorrectionMode::FullBigram,
    ] {
        assert_eq!(mode.to_string().parse::<CorrectionMode>(), Ok(mode));
    }
    assert!("aggressive".parse::<CorrectionMode>().is_err());
}

#[test]
fn test_limits() {
    assert_eq!(APPROX_MAX_WORD_LENGTH, 32);
    assert_eq!(LARGE_DICTIONARY_THRESHOLD, 200_000);
    assert_eq!(MAX_SUGGESTIONS_LIMIT, 100);
}

// --- scoring rules ---

#[test]
fn test_bigram_multiplier_bounds() {
    assert!((bigram_multiplier(0) - 1.2).abs() < 1e-9);
    assert!((bigram_multiplier(127) - 1.5).abs() < 1e-9);
    assert!((bigram_multiplier(63) - 1.3488).abs() < 1e-3);
    // Frequencies above the bigram maximum are treated as the maximum.
    assert!((bigram_multiplier(500) - 1.5).abs() < 1e-9);
}

#[test]
fn test_bigram_multiplier_is_monotonic() {
    let values: Vec<f64> = (0..=127).map(bigram_multiplier).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values
        .iter()
        .all(|&m| (BIGRAM_MULTIPLIER_MIN..=BIGRAM_MULTIPLIER_MAX).contains(&m)));
}

#[test]
fn test_boosted_priority_rounds() {
    assert_eq!(boosted_priority(100, 0), 120);
    assert_eq!(boosted_priority(100, 127), 150);
    // 99 * 1.2 = 118.8
    assert_eq!(boosted_priority(99, 0), 119);
}

#[test]
fn test_insertion_index_is_stable() {
    assert_eq!(insertion_index(Vec::<u32>::new(), 100, 12), 0);
    assert_eq!(insertion_index([50, 40, 30], 60, 12), 0);
    assert_eq!(insertion_index([100, 80, 60, 40, 20], 50, 12), 3);
    assert_eq!(insertion_index([50, 40, 30], 40, 12), 2);
    let full = [100, 90, 80, 70, 60, 50, 40, 30, 20, 10, 5, 2];
    assert_eq!(insertion_index(full, 1, 12), 12);
    // Priority 0 never beats an empty slot.
    assert_eq!(insertion_index(Vec::<u32>::new(), 0, 12), 12);
}

#[test]
fn test_matching_chars_counts_positions() {
    assert_eq!(matching_chars("hello", "hello"), 5);
    assert_eq!(matching_chars("hello", "hallo"), 4);
    assert_eq!(matching_chars("abc", "xyz"), 0);
    assert_eq!(matching_chars("hel", "hello"), 3);
    assert_eq!(matching_chars("hello", "HELLO"), 5);
    assert_eq!(matching_chars("cafe", "café"), 4);
}

#[test]
fn test_commonality_gate() {
    assert!(has_sufficient_commonality("ab", "xy"));
    assert!(has_sufficient_commonality("abc", "abd"));
    assert!(!has_sufficient_commonality("abc", "xyc"));
    assert!(has_sufficient_commonality("abcd", "abxy"));
    assert!(has_sufficient_commonality("abcde", "abcxy"));
    assert!(!has_sufficient_commonality("abcde", "abxyz"));
    // Only the shorter length counts.
    assert!(has_sufficient_commonality("hel", "hello"));
}

#[test]
fn test_case_insensitive_comparison() {
    assert!(compare_case_insensitive("hello", "HELLO"));
    assert!(compare_case_insensitive("paris", "Paris"));
    assert!(!compare_case_insensitive("hello", "WORLD"));
    assert!(!compare_case_insensitive("hello", "HI"));
    // Requires an uppercase first letter.
    assert!(!compare_case_insensitive("hello", "hello"));
    assert!(!compare_case_insensitive("", ""));
}

#[test]
fn test_case_style_applies() {
    let all = CaseStyle { all_upper: true, first_upper: true };
    let first = CaseStyle { all_upper: false, first_upper: true };
    assert_eq!(all.apply("hello"), "HELLO");
    assert_eq!(first.apply("hello"), "Hello");
    assert_eq!(first.apply("éclair"), "Éclair");
    assert_eq!(CaseStyle::default().apply("Paris"), "Paris");
    assert_eq!(first.apply(""), "");
}

#[test]
fn test_ranked_list_keeps_arrival_order_for_ties() {
    let mut list = RankedList::new(3);
    assert_eq!(list.offer("a".into(), 10), Some(0));
    assert_eq!(list.offer("b".into(), 10), Some(1));
    assert_eq!(list.offer("c".into(), 20), Some(0));
    assert_eq!(list.offer("d".into(), 5), None);
    assert_eq!(list.offer("e".into(), 15), Some(1));
    let words = list.clone().into_words();
    assert_eq!(words, vec!["c", "e", "a"]);
    assert_eq!(list.find("a").map(|r| r.priority), Some(10));
    assert!(list.find("b").is_none());
}

#[test]
fn test_ranked_list_insert_at_front() {
    let mut list = RankedList::new(2);
    list.offer("a".into(), 100);
    list.offer("b".into(), 50);
    list.insert_at(0, "Z".into(), 1);
    assert_eq!(list.into_words(), vec!["Z", "a"]);
}

proptest! {
    #[test]
    fn test_ranked_list_stays_sorted_and_bounded(
        capacity in 1usize..20,
        priorities in prop::collection::vec(0u32..1000, 0..60),
    ) {
        let mut list = RankedList::new(capacity);
        for (i, &p) in priorities.iter().enumerate() {
            list.offer(format!("w{i}"), p);
            prop_assert!(list.len() <= capacity);
            let stored: Vec<u32> = list.iter().map(|r| r.priority).collect();
            prop_assert!(stored.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}

// --- configuration ---

#[test]
fn test_max_suggestions_range() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert_eq!(suggest.max_suggestions(), 12);
    assert_eq!(
        suggest.set_max_suggestions(0),
        Err(SuggestError::MaxSuggestionsOutOfRange(0))
    );
    assert_eq!(
        suggest.set_max_suggestions(101),
        Err(SuggestError::MaxSuggestionsOutOfRange(101))
    );
    assert_eq!(suggest.max_suggestions(), 12);
    assert!(suggest.set_max_suggestions(1).is_ok());
    assert!(suggest.set_max_suggestions(100).is_ok());
    assert_eq!(suggest.max_suggestions(), 100);
}

#[test]
fn test_is_valid_word_checks_sources() {
    let suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert!(suggest.is_valid_word("hello"));
    assert!(!suggest.is_valid_word("Hello"));
    assert!(!suggest.is_valid_word("helo"));
    assert!(!suggest.is_valid_word(""));
}

#[test]
fn test_no_correction_accepts_typed_word() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::None);
    assert!(suggest.is_valid_word("zzz"));
    assert!(!suggest.is_valid_word(""));
    assert_eq!(suggest.get_suggestions(&typed("hel"), None), vec!["hel"]);
    assert!(!suggest.has_auto_correction());
}

// --- suggestions ---

#[test]
fn test_empty_composer_gives_nothing() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert!(suggest.get_suggestions(&WordComposer::new(), Some("the")).is_empty());
}

#[test]
fn test_completions_ranked_after_typed_word() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    let got = suggest.get_suggestions(&typed("hel"), None);
    assert_eq!(got, vec!["hel", "hello", "help"]);
    assert!(suggest.has_auto_correction());

    let next = suggest.next_letters_frequencies();
    assert_eq!(next.len(), 1280);
    // "hello" arrives from the exact walk and from one missing-letter pass.
    assert_eq!(next['l' as usize], 2);
    assert_eq!(next['p' as usize], 1);
}

#[test]
fn test_valid_typed_word_is_not_auto_corrected() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert_eq!(suggest.get_suggestions(&typed("help"), None), vec!["help"]);
    assert!(!suggest.has_auto_correction());
}

#[test]
fn test_capitalization_is_carried_over() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert_eq!(
        suggest.get_suggestions(&typed("Hel"), None),
        vec!["Hel", "Hello", "Help"]
    );
    assert_eq!(
        suggest.get_suggestions(&typed("HEL"), None),
        vec!["HEL", "HELLO", "HELP"]
    );
}

#[test]
fn test_capitalized_stored_word_goes_first() {
    let dict = main_dict(&[("parish", 50), ("Paris", 10)]);
    let mut suggest = suggest_with(dict, CorrectionMode::Full);
    assert_eq!(
        suggest.get_suggestions(&typed("paris"), None),
        vec!["paris", "Paris", "parish"]
    );
    // A proper noun typed in lowercase is known, not a misspelling.
    assert!(!suggest.has_auto_correction());
}

#[test]
fn test_capitalized_valid_word_is_not_auto_corrected() {
    let dict = main_dict(&[("the", 250), ("there", 100), ("them", 90), ("then", 80)]);
    let mut suggest = suggest_with(dict, CorrectionMode::Full);
    let got = suggest.get_suggestions(&typed("The"), None);
    assert_eq!(got.first().map(String::as_str), Some("The"));
    assert!(!got[1..].contains(&"The".to_string()));
    assert!(!suggest.has_auto_correction());
    assert_eq!(suggest.auto_correction(), None);
}

#[test]
fn test_auto_correction_is_the_ranked_best() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    suggest.get_suggestions(&typed("Helo"), None);
    assert_eq!(suggest.auto_correction(), Some("Hello"));

    suggest.get_suggestions(&typed("help"), None);
    assert_eq!(suggest.auto_correction(), None);
}

#[test]
fn test_missing_letter_is_recovered() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    assert_eq!(suggest.get_suggestions(&typed("helo"), None), vec!["helo", "hello"]);
    assert!(suggest.has_auto_correction());
}

#[test]
fn test_basic_mode_only_completes() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Basic);
    assert_eq!(suggest.get_suggestions(&typed("helo"), None), vec!["helo"]);
    assert_eq!(
        suggest.get_suggestions(&typed("hel"), None),
        vec!["hel", "hello", "help"]
    );
    assert!(!suggest.has_auto_correction());
}

#[test]
fn test_commonality_gate_discards_far_corrections() {
    let dict = main_dict(&[("asd", 10), ("qwd", 10)]);
    let mut suggest = suggest_with(dict, CorrectionMode::Full);
    let composer = frames(&[('q', "qa"), ('w', "ws"), ('e', "ed")]);
    assert_eq!(suggest.get_suggestions(&composer, None), vec!["qwe", "qwd"]);
}

fn bigram_dict() -> ExpandableDictionary {
    let mut dict = main_dict(&[("then", 100), ("them", 90), ("there", 10)]);
    dict.add_bigram("over", "them", 127);
    dict.add_bigram("over", "there", 20);
    dict.add_bigram("over", "me", 50);
    dict
}

#[test]
fn test_bigrams_rescore_candidates() {
    let mut suggest = suggest_with(bigram_dict(), CorrectionMode::FullBigram);
    let got = suggest.get_suggestions(&typed("the"), Some("over"));
    assert_eq!(&got[..3], &["the", "them", "then"]);

    // Sentence-initial previous word is looked up in lowercase.
    let got = suggest.get_suggestions(&typed("the"), Some("Over"));
    assert_eq!(&got[..3], &["the", "them", "then"]);
}

#[test]
fn test_bigrams_ignored_below_full_bigram() {
    let mut suggest = suggest_with(bigram_dict(), CorrectionMode::Full);
    let got = suggest.get_suggestions(&typed("the"), Some("over"));
    assert_eq!(&got[..3], &["the", "then", "them"]);
}

#[test]
fn test_first_letter_predicts_from_previous_word() {
    let mut suggest = suggest_with(bigram_dict(), CorrectionMode::FullBigram);
    assert_eq!(
        suggest.get_suggestions(&typed("t"), Some("over")),
        vec!["t", "them", "there"]
    );
    // A single shifted letter capitalizes rather than shouting.
    assert_eq!(
        suggest.get_suggestions(&typed("T"), Some("over")),
        vec!["T", "Them", "There"]
    );
    assert_eq!(suggest.get_suggestions(&typed("t"), None), vec!["t"]);

    suggest.set_correction_mode(CorrectionMode::Full);
    assert_eq!(suggest.get_suggestions(&typed("t"), Some("over")), vec!["t"]);
}

#[test]
fn test_sources_are_merged_and_deduplicated() {
    let mut suggest = suggest_with(hel_dict(), CorrectionMode::Full);
    let user = SharedDictionary::new(DicType::User);
    user.add_word("helicopter", 255);
    user.add_word("hello", 10);
    suggest.set_dictionary(DicType::User, Arc::new(user));

    let got = suggest.get_suggestions(&typed("hel"), None);
    assert_eq!(got.iter().filter(|w| *w == "hello").count(), 1);
    assert!(got.contains(&"helicopter".to_string()));
    assert!(suggest.is_valid_word("helicopter"));

    assert!(suggest.remove_dictionary(DicType::User).is_some());
    assert!(!suggest.is_valid_word("helicopter"));
}

#[test]
fn test_candidate_list_is_bounded() {
    let words: Vec<(String, u32)> = (0..30).map(|i| (format!("hel{i:02}"), 10 + i)).collect();
    let mut dict = ExpandableDictionary::new(DicType::Main);
    for (w, f) in &words {
        dict.add_word(w, *f);
    }
    let mut suggest = suggest_with(dict, CorrectionMode::Full);
    suggest.set_max_suggestions(5).unwrap();
    let got = suggest.get_suggestions(&typed("hel"), None);
    assert_eq!(got.len(), 6);
    assert_eq!(got[0], "hel");
    assert_eq!(got[1], "hel29");
}

/// Records the matching policy it is queried with.
struct Probe {
    words: usize,
    seen: Mutex<Vec<Matching>>,
}

impl Dictionary for Probe {
    fn words<'a>(&'a self, _composer: &'a WordComposer, matching: Matching) -> WordStream<'a> {
        self.seen.lock().unwrap().push(matching);
        Box::new(std::iter::empty())
    }

    fn is_valid_word(&self, _word: &str) -> bool {
        false
    }

    fn word_count(&self) -> usize {
        self.words
    }
}

fn probe_matching(words: usize, mode: CorrectionMode) -> Vec<Matching> {
    let probe = Arc::new(Probe {
        words,
        seen: Mutex::new(Vec::new()),
    });
    let config = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap().suggest;
    let mut suggest = Suggest::new(&config);
    suggest.set_correction_mode(mode);
    suggest.set_dictionary(DicType::Main, probe.clone());
    suggest.get_suggestions(&typed("abc"), None);
    let seen = probe.seen.lock().unwrap().clone();
    seen
}

#[test]
fn test_large_dictionaries_use_narrow_search() {
    assert_eq!(probe_matching(1_000, CorrectionMode::Full), vec![Matching::Fuzzy]);
    assert_eq!(probe_matching(300_000, CorrectionMode::Full), vec![Matching::Narrow]);
    assert_eq!(probe_matching(300_000, CorrectionMode::Basic), vec![Matching::Prefix]);
    assert!(probe_matching(1_000, CorrectionMode::None).is_empty());
}
