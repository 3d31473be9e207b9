use std::sync::Arc;

use serde::Serialize;

use hkbd_engine::composer::KeyCode;
use hkbd_engine::suggest::CorrectionMode;
use hkbd_engine::{EditorBuffer, InputSession};

use super::load_dictionary;

/// Stands for a backspace in simulated input.
pub const BACKSPACE: char = '<';

/// One simulated key and what the session made of it.
#[derive(Debug, Serialize)]
pub struct SimStep {
    pub key: char,
    pub state: String,
    pub composing: String,
    pub commit: Option<String>,
    pub candidates: Vec<String>,
    pub auto_correction: bool,
}

#[derive(Debug, Serialize)]
pub struct Simulation {
    pub steps: Vec<SimStep>,
    pub text: String,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

/// Feed `input` through `session` key by key. Letters compose, `<` is a
/// backspace and everything else is a separator.
pub fn simulate(session: &mut InputSession, input: &str, show: usize) -> Simulation {
    let mut editor = EditorBuffer::default();
    let mut steps = Vec::with_capacity(input.chars().count());
    for key in input.chars() {
        let resp = if key == BACKSPACE {
            session.backspace()
        } else if is_word_char(key) {
            session.type_char(key, &[key as KeyCode])
        } else {
            session.type_separator(key)
        };
        editor.apply(&resp);
        steps.push(SimStep {
            key,
            state: session.state().to_string(),
            composing: editor.composing.clone(),
            commit: resp.commit.clone(),
            candidates: resp.candidates.iter().take(show).cloned().collect(),
            auto_correction: resp.auto_correction,
        });
    }
    editor.apply(&session.finish_input());
    Simulation {
        steps,
        text: editor.display(),
    }
}

pub fn format_text(sim: &Simulation) -> String {
    let mut out = String::new();
    for step in &sim.steps {
        let commit = step
            .commit
            .as_deref()
            .map(|c| format!(" commit={c:?}"))
            .unwrap_or_default();
        let auto = if step.auto_correction { " auto" } else { "" };
        out.push_str(&format!(
            "{:?} {:<26} [{}] {}{commit}{auto}\n",
            step.key,
            step.state,
            step.composing,
            step.candidates.join(" | "),
        ));
    }
    out.push_str(&format!("=> {:?}\n", sim.text));
    out
}

pub fn simulate_cmd(
    words_file: &str,
    input: &str,
    bigrams_file: Option<&str>,
    mode: CorrectionMode,
    show: usize,
    json: bool,
) {
    let dict = die!(
        load_dictionary(words_file, bigrams_file),
        "Error loading dictionary: {}"
    );
    let mut session = InputSession::new(Arc::new(dict));
    session.set_correction_mode(mode);
    session.new_session();
    let sim = simulate(&mut session, input, show);
    session.end_session();

    if json {
        let out = die!(serde_json::to_string_pretty(&sim), "Error: {}");
        println!("{out}");
    } else {
        print!("{}", format_text(&sim));
    }
}
