
use crate::composer::{KeyCode, WordComposer};

/// Composer where every frame carries only its own character.
fn typed(word: &str) -> WordComposer {
    let mut composer = WordComposer::new();
    for c in word.chars() {
        composer.add(c, &[c as KeyCode]);
    }
    composer
}

/// Composer from (primary, alternates) frames.
fn frames(keys: &[(char, &str)]) -> WordComposer {
    let mut composer = WordComposer::new();
    for &(primary, alternates) in keys {
        let codes: Vec<KeyCode> = alternates.chars().map(|c| c as KeyCode).collect();
        composer.add(primary, &codes);
    }
    composer
}
