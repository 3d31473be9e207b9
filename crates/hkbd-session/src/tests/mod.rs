
use std::sync::Arc;

use hkbd_core::composer::KeyCode;
use hkbd_core::dict::{DicType, Dictionary, ExpandableDictionary};
use hkbd_core::settings::{parse_settings_toml, Settings, DEFAULT_SETTINGS_TOML};

use super::{EditorBuffer, InputSession, KeyResponse};

pub(super) fn make_test_dict() -> Arc<dyn Dictionary> {
    let mut dict = ExpandableDictionary::new(DicType::Main);
    for (word, frequency) in [
        ("hello", 200),
        ("help", 120),
        ("world", 150),
        ("the", 250),
        ("them", 90),
        ("then", 80),
        ("there", 100),
        ("cat", 60),
        ("i", 255),
    ] {
        dict.add_word(word, frequency);
    }
    Arc::new(dict)
}

pub(super) fn test_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap()
}

pub(super) fn make_session() -> InputSession {
    InputSession::with_settings(make_test_dict(), &test_settings())
}

/// Type `text`: spaces and punctuation as separators, everything else as
/// letters without proximity alternates. Responses are applied to `editor`.
pub(super) fn type_string(session: &mut InputSession, editor: &mut EditorBuffer, text: &str) {
    for c in text.chars() {
        let resp = if c.is_alphabetic() || c == '\'' {
            session.type_char(c, &[c as KeyCode])
        } else {
            session.type_separator(c)
        };
        editor.apply(&resp);
    }
}

pub(super) fn apply(editor: &mut EditorBuffer, resp: KeyResponse) -> KeyResponse {
    editor.apply(&resp);
    resp
}
