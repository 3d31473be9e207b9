//! Predictive-text suggestion engine for a touchscreen keyboard.
//!
//! The engine is split in two crates re-exported here: `hkbd_core` holds the
//! dictionaries and ranking, `hkbd_session` drives them from keystrokes.

mod trace_init;

pub use hkbd_core::{composer, dict, normalize, settings, suggest};
pub use hkbd_session::{
    EditorBuffer, EntryState, InputSession, KeyResponse, SessionStats, TextEntryState,
};
pub use trace_init::init_tracing;
