use super::types::KeyResponse;
use super::InputSession;

impl InputSession {
    pub(super) fn refresh_candidates(&mut self) {
        self.candidates = self
            .suggest
            .get_suggestions(&self.composer, self.previous_word.as_deref());
    }

    /// Fill the composing text and suggestion strip from the current state.
    pub(super) fn with_composing(&self, mut resp: KeyResponse) -> KeyResponse {
        resp.composing = Some(self.composer.typed_word().unwrap_or("").to_string());
        resp.candidates = self.candidates.clone();
        resp.auto_correction = self.suggest.has_auto_correction();
        resp
    }
}
