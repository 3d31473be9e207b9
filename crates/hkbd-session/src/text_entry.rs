//! What happened to the last word: typed, auto-corrected, picked, or undone.
//!
//! The IME reports every character, commit and backspace here. The state
//! tells it whether a backspace should revert an auto-correction and whether
//! the user is correcting an earlier word.

use std::fmt;

use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    Unknown,
    Start,
    InWord,
    AcceptedDefault,
    PickedSuggestion,
    PunctuationAfterWord,
    PunctuationAfterAccepted,
    SpaceAfterAccepted,
    SpaceAfterPicked,
    UndoCommit,
    Correcting,
    PickedCorrection,
}

impl EntryState {
    pub const ALL: [EntryState; 12] = [
        EntryState::Unknown,
        EntryState::Start,
        EntryState::InWord,
        EntryState::AcceptedDefault,
        EntryState::PickedSuggestion,
        EntryState::PunctuationAfterWord,
        EntryState::PunctuationAfterAccepted,
        EntryState::SpaceAfterAccepted,
        EntryState::SpaceAfterPicked,
        EntryState::UndoCommit,
        EntryState::Correcting,
        EntryState::PickedCorrection,
    ];
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryState::Unknown => "UNKNOWN",
            EntryState::Start => "START",
            EntryState::InWord => "IN_WORD",
            EntryState::AcceptedDefault => "ACCEPTED_DEFAULT",
            EntryState::PickedSuggestion => "PICKED_SUGGESTION",
            EntryState::PunctuationAfterWord => "PUNCTUATION_AFTER_WORD",
            EntryState::PunctuationAfterAccepted => "PUNCTUATION_AFTER_ACCEPTED",
            EntryState::SpaceAfterAccepted => "SPACE_AFTER_ACCEPTED",
            EntryState::SpaceAfterPicked => "SPACE_AFTER_PICKED",
            EntryState::UndoCommit => "UNDO_COMMIT",
            EntryState::Correcting => "CORRECTING",
            EntryState::PickedCorrection => "PICKED_CORRECTION",
        })
    }
}

/// Counters for one input session, logged when it ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub auto_suggest_accepted: u32,
    pub auto_suggest_undone: u32,
    pub manual_suggest: u32,
    pub word_not_in_dictionary: u32,
    pub typed_chars: u32,
    pub actual_chars: u32,
    pub backspaces: u32,
    pub sessions: u32,
}

#[derive(Debug, Clone)]
pub struct TextEntryState {
    state: EntryState,
    stats: SessionStats,
}

impl Default for TextEntryState {
    fn default() -> Self {
        Self::new()
    }
}

fn char_len(s: &str) -> u32 {
    u32::try_from(s.chars().count()).unwrap_or(u32::MAX)
}

impl TextEntryState {
    pub fn new() -> Self {
        Self {
            state: EntryState::Start,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn reset(&mut self) {
        self.set(EntryState::Start);
    }

    /// Start counting a fresh session. The state itself is left alone.
    pub fn new_session(&mut self) {
        let sessions = self.stats.sessions + 1;
        self.stats = SessionStats {
            sessions,
            ..SessionStats::default()
        };
    }

    pub fn end_session(&self) {
        let s = &self.stats;
        info!(
            session = s.sessions,
            auto_accepted = s.auto_suggest_accepted,
            auto_undone = s.auto_suggest_undone,
            manual = s.manual_suggest,
            not_in_dictionary = s.word_not_in_dictionary,
            typed_chars = s.typed_chars,
            actual_chars = s.actual_chars,
            backspaces = s.backspaces,
            "input session ended"
        );
    }

    /// The default suggestion was committed in place of `typed`. `None`
    /// means nothing was being composed and the call is ignored.
    pub fn accepted_default(&mut self, typed: Option<&str>, actual: &str) {
        let Some(typed) = typed else {
            return;
        };
        if typed != actual {
            self.stats.auto_suggest_accepted += 1;
        }
        self.stats.typed_chars += char_len(typed);
        self.stats.actual_chars += char_len(actual);
        self.set(EntryState::AcceptedDefault);
    }

    /// Return to `AcceptedDefault` right after the separator that followed
    /// an auto-commit, so the next backspace can still undo it.
    pub fn back_to_accepted_default(&mut self, typed: Option<&str>) {
        if typed.is_none() {
            return;
        }
        if matches!(
            self.state,
            EntryState::SpaceAfterAccepted
                | EntryState::PunctuationAfterAccepted
                | EntryState::InWord
        ) {
            self.set(EntryState::AcceptedDefault);
        }
    }

    pub fn manual_typed(&mut self, _word: &str) {
        self.set(EntryState::Start);
    }

    /// The typed word was committed as-is.
    pub fn accepted_typed(&mut self, _typed: &str) {
        self.stats.word_not_in_dictionary += 1;
        self.set(EntryState::PickedSuggestion);
    }

    pub fn accepted_suggestion(&mut self, typed: &str, actual: &str) {
        self.stats.manual_suggest += 1;
        let was_correcting = self.is_correcting();
        if typed == actual {
            self.accepted_typed(typed);
        }
        self.set(if was_correcting {
            EntryState::PickedCorrection
        } else {
            EntryState::PickedSuggestion
        });
    }

    pub fn selected_for_correction(&mut self) {
        self.set(EntryState::Correcting);
    }

    /// A character reached the editor. Space is recognised by value;
    /// `is_separator` marks the other word separators.
    pub fn typed_character(&mut self, c: char, is_separator: bool) {
        let is_space = c == ' ';
        let breaks_word = is_space || is_separator;
        let next = match self.state {
            EntryState::InWord => {
                if breaks_word {
                    EntryState::Start
                } else {
                    EntryState::InWord
                }
            }
            EntryState::AcceptedDefault | EntryState::SpaceAfterPicked => {
                if is_space {
                    EntryState::SpaceAfterAccepted
                } else if is_separator {
                    EntryState::PunctuationAfterAccepted
                } else {
                    EntryState::InWord
                }
            }
            EntryState::PickedSuggestion | EntryState::PickedCorrection => {
                if is_space {
                    EntryState::SpaceAfterPicked
                } else if is_separator {
                    EntryState::PunctuationAfterAccepted
                } else {
                    EntryState::InWord
                }
            }
            EntryState::Start
            | EntryState::Unknown
            | EntryState::SpaceAfterAccepted
            | EntryState::PunctuationAfterAccepted
            | EntryState::PunctuationAfterWord => {
                if breaks_word {
                    EntryState::Start
                } else {
                    EntryState::InWord
                }
            }
            EntryState::UndoCommit => {
                if breaks_word {
                    EntryState::AcceptedDefault
                } else {
                    EntryState::InWord
                }
            }
            EntryState::Correcting => EntryState::Start,
        };
        self.set(next);
    }

    pub fn backspace(&mut self) {
        match self.state {
            EntryState::AcceptedDefault => {
                self.stats.auto_suggest_undone += 1;
                self.set(EntryState::UndoCommit);
            }
            EntryState::UndoCommit => self.set(EntryState::InWord),
            _ => {}
        }
        self.stats.backspaces += 1;
    }

    pub fn is_correcting(&self) -> bool {
        matches!(
            self.state,
            EntryState::Correcting | EntryState::PickedCorrection
        )
    }

    fn set(&mut self, next: EntryState) {
        if next != self.state {
            debug!(from = %self.state, to = %next, "text entry state");
            self.state = next;
        }
    }
}
