//! Diacritic- and case-insensitive character folding for trie indexing.
//!
//! The base-character table covers U+0000..U+04FF (ASCII, Latin-1, Latin
//! Extended-A/B, IPA, Greek and Cyrillic). Letters in that range map to the
//! first character of their compatibility decomposition (É → E, ñ → n,
//! Й → И); everything else, including NUL and punctuation, maps to itself.

use std::sync::OnceLock;

use unicode_normalization::char::decompose_compatible;

/// Number of code points covered by the base-character table.
pub const BASE_CHARS_LEN: usize = 0x500;

/// Letters that carry a stroke or bar instead of a combining mark and
/// therefore have no Unicode decomposition.
static STROKE_LETTERS: &[(char, char)] = &[
    ('Đ', 'D'),
    ('đ', 'd'),
    ('Ħ', 'H'),
    ('ħ', 'h'),
    ('ı', 'i'),
    ('Ł', 'L'),
    ('ł', 'l'),
    ('Ø', 'O'),
    ('ø', 'o'),
    ('Ŧ', 'T'),
    ('ŧ', 't'),
    ('ƀ', 'b'),
    ('Ɨ', 'I'),
    ('ƶ', 'z'),
    ('Ƶ', 'Z'),
];

fn base_chars() -> &'static [char] {
    static TABLE: OnceLock<Box<[char]>> = OnceLock::new();
    TABLE.get_or_init(|| {
        (0..BASE_CHARS_LEN as u32)
            .map(|cp| char::from_u32(cp).map_or('\0', fold_letter))
            .collect()
    })
}

fn fold_letter(c: char) -> char {
    if let Some(&(_, base)) = STROKE_LETTERS.iter().find(|&&(k, _)| k == c) {
        return base;
    }
    if !c.is_alphabetic() {
        return c;
    }
    let mut first = None;
    decompose_compatible(c, |d| {
        if first.is_none() {
            first = Some(d);
        }
    });
    match first {
        Some(base) if base.is_alphabetic() => base,
        _ => c,
    }
}

/// Strip diacritics from `c` if it lies inside the table; identity otherwise.
/// Case is preserved (É → E, é → e).
pub fn base_char(c: char) -> char {
    base_chars().get(c as usize).copied().unwrap_or(c)
}

/// Lowercase after folding to the base character.
///
/// ASCII takes the fast path; other code points use Unicode lowercasing when
/// it yields a single character.
pub fn to_lower_case(c: char) -> char {
    let c = base_char(c);
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else if !c.is_ascii() {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => l,
            _ => c,
        }
    } else {
        c
    }
}

/// Apply [`to_lower_case`] to every character of `s`.
pub fn fold_str(s: &str) -> String {
    s.chars().map(to_lower_case).collect()
}
