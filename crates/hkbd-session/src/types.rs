use hkbd_core::composer::WordComposer;

/// Separators after which the next word has no bigram context. Only a
/// plain space keeps the previous word.
pub(super) fn ends_context(c: char) -> bool {
    c != ' '
}

/// What the editor should do after one event.
///
/// Apply in field order: delete `delete_before` characters of committed text
/// before the composing region, replace the composing region with `commit`,
/// then show `composing` as the new composing text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResponse {
    pub consumed: bool,
    pub delete_before: usize,
    pub commit: Option<String>,
    /// `Some("")` clears the composing text, `None` leaves it alone.
    pub composing: Option<String>,
    /// Suggestion strip after the event, typed word first.
    pub candidates: Vec<String>,
    /// Whether a separator now would replace the typed word.
    pub auto_correction: bool,
}

impl KeyResponse {
    pub(super) fn not_consumed() -> Self {
        Self::default()
    }

    pub(super) fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::default()
        }
    }
}

/// Minimal model of the host text field, enough to replay responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    pub text: String,
    pub composing: String,
}

impl EditorBuffer {
    pub fn apply(&mut self, response: &KeyResponse) {
        if response.delete_before > 0 {
            let keep = self
                .text
                .chars()
                .count()
                .saturating_sub(response.delete_before);
            self.text = self.text.chars().take(keep).collect();
        }
        if let Some(commit) = &response.commit {
            self.composing.clear();
            self.text.push_str(commit);
        }
        if let Some(composing) = &response.composing {
            self.composing.clone_from(composing);
        }
    }

    /// Committed text followed by the composing text.
    pub fn display(&self) -> String {
        format!("{}{}", self.text, self.composing)
    }
}

/// The last auto-commit, kept so a backspace right after it can restore the
/// typed word.
#[derive(Debug, Clone)]
pub(super) struct LastCommit {
    pub(super) composer: WordComposer,
    /// Word plus separator, as it reached the editor.
    pub(super) committed: String,
    pub(super) previous_word: Option<String>,
}
