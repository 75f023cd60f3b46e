//! Stateful suggestion session driving an inline date trigger.
//!
//! `SuggestionSession` watches the cursor through [`Editor`], opens when the
//! trigger phrase is being followed by a query, keeps the overlay in sync,
//! and turns key presses and confirmations into document edits. Each
//! operation returns a [`KeyResponse`] the host translates into its own
//! popup and navigation calls.

pub mod buffer;
pub mod editor;
pub mod overlay;
pub mod router;
pub(crate) mod types;

mod commit;
mod key_handlers;
mod lifecycle;
mod response;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use nld_core::dates::{DateError, DateSource};
use nld_core::keymap::Modifier;
use nld_core::settings::Settings;
use nld_core::{AntiRetriggerMemo, Position, TriggerContext};

pub use buffer::MemoryEditor;
pub use editor::{Change, EditError, Editor, Transaction};
pub use overlay::{DecorationOverlay, DecorationSet, OverlayEffect, Spacer};
pub use router::{KeyEvent, KeyInputRouter, SessionKey};
pub use types::{
    DailyNoteRequest, KeyResponse, Selection, SessionError, SideEffects, SuggestionAction,
};

use types::{Deferred, OpenSession, SessionState};

/// One session per editor view.
pub struct SuggestionSession {
    settings: Arc<Settings>,
    dates: Box<dyn DateSource>,

    state: SessionState,
    /// Consumed by the next trigger recognition, whatever its outcome.
    memo: AntiRetriggerMemo,
    overlay: DecorationOverlay,
    deferred: Option<Deferred>,
}

impl SuggestionSession {
    pub fn new(settings: Arc<Settings>, dates: Box<dyn DateSource>) -> Self {
        Self {
            settings,
            dates,
            state: SessionState::Closed,
            memo: AntiRetriggerMemo::default(),
            overlay: DecorationOverlay::new(),
            deferred: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    pub fn context(&self) -> Option<&TriggerContext> {
        self.open_session().map(|o| &o.context)
    }

    pub fn memo(&self) -> &AntiRetriggerMemo {
        &self.memo
    }

    pub fn overlay(&self) -> &DecorationOverlay {
        &self.overlay
    }

    /// Suggestions last rendered for the open session.
    pub fn suggestions(&self) -> &[String] {
        self.open_session()
            .map(|o| o.suggestions.as_slice())
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.open_session()
            .filter(|o| !o.suggestions.is_empty())
            .map(|o| o.selected)
    }

    pub fn is_modifier_active(&self, modifier: Modifier) -> bool {
        self.open_session()
            .is_some_and(|o| o.router.is_active(modifier))
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn set_locale(&mut self, code: &str) -> Result<(), DateError> {
        self.dates.set_locale(code)
    }

    /// Resolve `text` with the session's date collaborator.
    pub fn parse_date(&self, text: &str) -> Option<time::Date> {
        self.dates.parse_date(text)
    }

    /// Host-side document changes, so the overlay keeps pointing at the phrase.
    pub fn on_document_changed(&mut self, changes: &[Change]) {
        self.overlay.map_changes(changes);
    }

    fn open_session(&self) -> Option<&OpenSession> {
        match &self.state {
            SessionState::Open(o) => Some(o),
            SessionState::Closed => None,
        }
    }

    fn open_session_mut(&mut self) -> Option<&mut OpenSession> {
        match &mut self.state {
            SessionState::Open(o) => Some(o),
            SessionState::Closed => None,
        }
    }

    /// Replace `[from, to)` and keep the overlay mapped through the edit.
    fn edit(
        &mut self,
        editor: &mut dyn Editor,
        text: &str,
        from: Position,
        to: Position,
    ) -> Result<(), SessionError> {
        let (Some(a), Some(b)) = (editor.pos_to_offset(from), editor.pos_to_offset(to)) else {
            return Err(EditError::StaleRange { from, to }.into());
        };
        editor.replace_range(text, from, to)?;
        self.overlay.map_changes(&[Change {
            from: a,
            to: b,
            insert_len: text.chars().count(),
        }]);
        Ok(())
    }
}
