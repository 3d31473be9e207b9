//! The word currently being typed, one keystroke frame at a time.
//!
//! Each frame keeps the primary character plus the nearby-key alternates
//! reported by the keyboard's proximity detector. Alternates are stored
//! folded (see [`crate::normalize`]) with the primary promoted to index 0,
//! which is what the fuzzy trie walk consumes.

use crate::normalize::to_lower_case;

/// A key code as delivered by the keyboard layer. Negative values are
/// sentinels ("no further alternates") and are preserved as-is.
pub type KeyCode = i32;

/// Sentinel marking the end of the useful alternates in a frame.
pub const NOT_A_CODE: KeyCode = -1;

/// Convert a key code to a character, or `None` for sentinels.
pub fn code_char(code: KeyCode) -> Option<char> {
    u32::try_from(code).ok().and_then(char::from_u32)
}

fn fold_code(code: KeyCode) -> KeyCode {
    match code_char(code) {
        Some(c) => to_lower_case(c) as KeyCode,
        None => code,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    primary: char,
    alternates: Vec<KeyCode>,
}

#[derive(Debug, Clone, Default)]
pub struct WordComposer {
    frames: Vec<Frame>,
    typed_word: String,
    caps_count: usize,
    first_char_capitalized: bool,
    preferred_word: Option<String>,
    auto_capitalized: bool,
}

impl WordComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the word. The auto-capitalized flag belongs to the editor
    /// context and survives a reset.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.typed_word.clear();
        self.caps_count = 0;
        self.first_char_capitalized = false;
        self.preferred_word = None;
    }

    /// Number of keystrokes in the word.
    pub fn size(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Folded alternates for the keystroke at `index`; `[0]` is the primary.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    pub fn codes_at(&self, index: usize) -> &[KeyCode] {
        &self.frames[index].alternates
    }

    /// The primary character typed at `index`, case preserved.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    pub fn primary_at(&self, index: usize) -> char {
        self.frames[index].primary
    }

    /// Append a keystroke.
    ///
    /// All alternates are folded to lowercase base characters. The folded
    /// primary is moved to the front of the list (inserted if the proximity
    /// data omitted it), keeping the remaining alternates in their order.
    pub fn add(&mut self, primary: char, alternates: &[KeyCode]) {
        let mut codes: Vec<KeyCode> = alternates.iter().map(|&c| fold_code(c)).collect();
        let folded = to_lower_case(primary) as KeyCode;
        match codes.iter().position(|&c| c == folded) {
            Some(0) => {}
            Some(pos) => codes[..=pos].rotate_right(1),
            None => codes.insert(0, folded),
        }

        self.typed_word.push(primary);
        if primary.is_uppercase() {
            self.caps_count += 1;
        }
        self.frames.push(Frame {
            primary,
            alternates: codes,
        });
    }

    /// Remove the last keystroke; does nothing on an empty word.
    pub fn delete_last(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.typed_word.pop();
            if frame.primary.is_uppercase() {
                self.caps_count -= 1;
            }
        }
    }

    /// The word as typed, or `None` when nothing has been typed.
    pub fn typed_word(&self) -> Option<&str> {
        if self.frames.is_empty() {
            None
        } else {
            Some(&self.typed_word)
        }
    }

    pub fn set_preferred_word(&mut self, word: impl Into<String>) {
        self.preferred_word = Some(word.into());
    }

    /// The explicit override if set, else the typed word.
    pub fn preferred_word(&self) -> Option<&str> {
        self.preferred_word.as_deref().or_else(|| self.typed_word())
    }

    pub fn caps_count(&self) -> usize {
        self.caps_count
    }

    pub fn set_first_char_capitalized(&mut self, capitalized: bool) {
        self.first_char_capitalized = capitalized;
    }

    pub fn is_first_char_capitalized(&self) -> bool {
        self.first_char_capitalized
    }

    pub fn is_all_upper_case(&self) -> bool {
        self.caps_count > 0 && self.caps_count == self.frames.len()
    }

    pub fn is_mostly_caps(&self) -> bool {
        self.caps_count >= 2
    }

    pub fn set_auto_capitalized(&mut self, auto: bool) {
        self.auto_capitalized = auto;
    }

    /// Whether the first letter was capitalized by the editor rather than
    /// by the user pressing shift.
    pub fn is_auto_capitalized(&self) -> bool {
        self.auto_capitalized
    }
}
