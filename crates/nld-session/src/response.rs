use super::types::{KeyResponse, SuggestionAction};
use super::SuggestionSession;

impl SuggestionSession {
    pub(super) fn make_suggestions_response(&self) -> KeyResponse {
        let mut resp = KeyResponse::handled();
        resp.suggestions = match self.open_session() {
            Some(o) if !o.suggestions.is_empty() => SuggestionAction::Show {
                items: o.suggestions.clone(),
                selected: o.selected as u32,
            },
            Some(_) => SuggestionAction::Keep,
            None => SuggestionAction::Hide,
        };
        resp
    }
}
