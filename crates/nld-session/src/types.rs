use nld_core::format::FormatError;
use nld_core::{Position, TriggerContext};
use time::Date;

use crate::editor::EditError;
use crate::router::KeyInputRouter;

pub(super) enum SessionState {
    Closed,
    Open(OpenSession),
}

pub(super) struct OpenSession {
    pub(super) context: TriggerContext,
    pub(super) router: KeyInputRouter,
    pub(super) suggestions: Vec<String>,
    pub(super) selected: usize,
}

impl OpenSession {
    pub(super) fn new(context: TriggerContext) -> Self {
        Self {
            context,
            router: KeyInputRouter::new(),
            suggestions: Vec::new(),
            selected: 0,
        }
    }

    pub(super) fn selected_label(&self) -> Option<&str> {
        self.suggestions.get(self.selected).map(String::as_str)
    }
}

/// Work scheduled by a key handler for after the host's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Deferred {
    /// Second space at the query start: collapse the double separator and close.
    DismissAfterSpace { start: Position },
}

/// Suggestion popup action, exactly one of three states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionAction {
    Keep,
    Show { items: Vec<String>, selected: u32 },
    Hide,
}

/// Host request to open (creating if needed) the note for a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNoteRequest {
    pub date: Date,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SideEffects {
    pub open_daily_note: Option<DailyNoteRequest>,
}

/// Response from `handle_key` / `run_deferred`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    /// The host must not run its default action for the key.
    pub handled: bool,
    /// Text written in place of trigger and query by a confirmed selection.
    pub commit: Option<String>,
    pub suggestions: SuggestionAction,
    /// Call `run_deferred` after the host's default action.
    pub deferred: bool,
    pub side_effects: SideEffects,
}

impl KeyResponse {
    pub(super) fn not_handled() -> Self {
        Self {
            handled: false,
            commit: None,
            suggestions: SuggestionAction::Keep,
            deferred: false,
            side_effects: SideEffects::default(),
        }
    }

    pub(super) fn handled() -> Self {
        Self {
            handled: true,
            ..Self::not_handled()
        }
    }

    pub(super) fn hide(mut self) -> Self {
        self.suggestions = SuggestionAction::Hide;
        self
    }
}

/// A confirmed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub label: String,
    pub date: Date,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no open session")]
    NotOpen,
    #[error("cannot resolve {label:?} to a date")]
    UnparsableDate { label: String },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

pub(super) fn cyclic_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let c = current as i32;
    let n = count as i32;
    ((c + delta + n) % n) as usize
}
