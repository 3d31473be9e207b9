//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::suggest::{CorrectionMode, MAX_SUGGESTIONS_LIMIT};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub suggest: SuggestSettings,
    pub learning: LearningSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestSettings {
    pub max_suggestions: usize,
    pub max_bigram_suggestions: usize,
    pub correction_mode: CorrectionMode,
    pub next_letters_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningSettings {
    pub frequency_for_typed: u32,
    pub frequency_for_picked: u32,
    pub validity_threshold: u32,
    pub promotion_threshold: u32,
    pub frequency_for_auto_add: u32,
    pub bigram_frequency_for_typed: u32,
    pub bigram_suggest_threshold: u32,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_at_most {
        ($section:ident . $field:ident, $max:expr) => {
            if s.$section.$field > $max {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: format!("must be at most {}", $max),
                });
            }
        };
    }

    check_positive!(suggest.max_suggestions);
    check_at_most!(suggest.max_suggestions, MAX_SUGGESTIONS_LIMIT);
    check_positive!(suggest.max_bigram_suggestions);
    check_positive!(suggest.next_letters_size);

    check_positive!(learning.frequency_for_typed);
    check_positive!(learning.frequency_for_picked);
    check_at_most!(learning.validity_threshold, 255);
    check_positive!(learning.promotion_threshold);
    check_at_most!(learning.promotion_threshold, 255);
    check_positive!(learning.frequency_for_auto_add);
    check_at_most!(learning.frequency_for_auto_add, 255);
    check_positive!(learning.bigram_frequency_for_typed);
    check_at_most!(learning.bigram_suggest_threshold, 127);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.suggest.max_suggestions, 12);
        assert_eq!(s.suggest.max_bigram_suggestions, 60);
        assert_eq!(s.suggest.correction_mode, CorrectionMode::FullBigram);
        assert_eq!(s.suggest.next_letters_size, 1280);
        assert_eq!(s.learning.frequency_for_typed, 1);
        assert_eq!(s.learning.frequency_for_picked, 3);
        assert_eq!(s.learning.validity_threshold, 6);
        assert_eq!(s.learning.promotion_threshold, 24);
        assert_eq!(s.learning.frequency_for_auto_add, 250);
        assert_eq!(s.learning.bigram_frequency_for_typed, 2);
        assert_eq!(s.learning.bigram_suggest_threshold, 12);
    }

    #[test]
    fn test_parse_valid_custom_toml() {
        let toml = r#"
[suggest]
max_suggestions = 5
max_bigram_suggestions = 10
correction_mode = "basic"
next_letters_size = 128

[learning]
frequency_for_typed = 2
frequency_for_picked = 4
validity_threshold = 8
promotion_threshold = 30
frequency_for_auto_add = 100
bigram_frequency_for_typed = 1
bigram_suggest_threshold = 0
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.suggest.max_suggestions, 5);
        assert_eq!(s.suggest.correction_mode, CorrectionMode::Basic);
        assert_eq!(s.learning.frequency_for_auto_add, 100);
        assert_eq!(s.learning.bigram_suggest_threshold, 0);
    }

    #[test]
    fn test_reject_max_suggestions_out_of_range() {
        let toml = DEFAULT_SETTINGS_TOML.replace("max_suggestions = 12", "max_suggestions = 101");
        match parse_settings_toml(&toml) {
            Err(SettingsError::InvalidValue { field, .. }) => {
                assert_eq!(field, "suggest.max_suggestions");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        let toml = DEFAULT_SETTINGS_TOML.replace("max_suggestions = 12", "max_suggestions = 0");
        assert!(parse_settings_toml(&toml).is_err());
    }

    #[test]
    fn test_reject_unknown_correction_mode() {
        let toml = DEFAULT_SETTINGS_TOML.replace("\"full_bigram\"", "\"aggressive\"");
        assert!(matches!(
            parse_settings_toml(&toml),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_reject_missing_section() {
        let toml = r#"
[suggest]
max_suggestions = 5
max_bigram_suggestions = 10
correction_mode = "full"
next_letters_size = 128
"#;
        assert!(matches!(
            parse_settings_toml(toml),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_default_toml_accessor() {
        assert_eq!(default_toml(), DEFAULT_SETTINGS_TOML);
    }
}
