use nld_core::keymap::Key;
use nld_core::{Position, TriggerContext};
use nld_session::{Change, DecorationSet, KeyResponse, SuggestionAction};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum NldError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    #[error("session error: {msg}")]
    Session { msg: String },
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct NldPosition {
    pub line: u32,
    pub ch: u32,
}

impl From<Position> for NldPosition {
    fn from(p: Position) -> Self {
        Self {
            line: u32::try_from(p.line).unwrap_or(u32::MAX),
            ch: u32::try_from(p.ch).unwrap_or(u32::MAX),
        }
    }
}

impl From<NldPosition> for Position {
    fn from(p: NldPosition) -> Self {
        Position::new(p.line as usize, p.ch as usize)
    }
}

/// The host's view at the time of a call.
#[derive(Debug, Clone, uniffi::Record)]
pub struct NldDocument {
    pub text: String,
    pub cursor: NldPosition,
    pub view_attached: bool,
    pub has_active_file: bool,
}

/// A host-side edit, in flat `char` offsets.
#[derive(Debug, Clone, Copy, uniffi::Record)]
pub struct NldChange {
    pub from: u64,
    pub to: u64,
    pub insert_len: u64,
}

impl From<NldChange> for Change {
    fn from(c: NldChange) -> Self {
        Change {
            from: c.from as usize,
            to: c.to as usize,
            insert_len: c.insert_len as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NldContext {
    pub start: NldPosition,
    pub phrase_end: NldPosition,
    pub end: NldPosition,
    pub query: String,
    pub first_space_blocked: bool,
}

impl From<&TriggerContext> for NldContext {
    fn from(ctx: &TriggerContext) -> Self {
        Self {
            start: ctx.start.into(),
            phrase_end: ctx.phrase_end.into(),
            end: ctx.end.into(),
            query: ctx.query.clone(),
            first_space_blocked: ctx.first_space_blocked,
        }
    }
}

/// Result of re-running trigger recognition.
#[derive(Debug, uniffi::Record)]
pub struct NldUpdate {
    pub context: Option<NldContext>,
    pub events: Vec<NldEvent>,
}

/// Event-driven response from handle_key / select / run_deferred.
#[derive(Debug, uniffi::Record)]
pub struct NldKeyResponse {
    pub handled: bool,
    pub events: Vec<NldEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum NldEvent {
    ReplaceRange {
        text: String,
        from: NldPosition,
        to: NldPosition,
    },
    SetCursor {
        pos: NldPosition,
    },
    SetDecorations {
        mark_from: u64,
        mark_to: u64,
        spacer: Option<u64>,
    },
    ClearDecorations,
    Commit {
        text: String,
    },
    ShowSuggestions {
        items: Vec<String>,
        selected: u32,
    },
    HideSuggestions,
    OpenDailyNote {
        name: String,
        iso_date: String,
    },
    /// A confirmation could not be applied; the session has closed.
    SelectionFailed {
        reason: String,
    },
    /// Call `run_deferred` after the default action for this key.
    RunDeferred,
}

impl From<&DecorationSet> for NldEvent {
    fn from(set: &DecorationSet) -> Self {
        NldEvent::SetDecorations {
            mark_from: set.mark.start as u64,
            mark_to: set.mark.end as u64,
            spacer: set.spacer.map(|s| s.offset as u64),
        }
    }
}

#[derive(Debug, Clone, uniffi::Enum)]
pub enum NldKey {
    Space,
    Backspace,
    Tab,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Control,
    Meta,
    Alt,
    Char { text: String },
}

impl NldKey {
    pub(super) fn to_key(&self) -> Option<Key> {
        let key = match self {
            NldKey::Space => Key::Space,
            NldKey::Backspace => Key::Backspace,
            NldKey::Tab => Key::Tab,
            NldKey::Enter => Key::Enter,
            NldKey::Escape => Key::Escape,
            NldKey::ArrowUp => Key::ArrowUp,
            NldKey::ArrowDown => Key::ArrowDown,
            NldKey::ArrowLeft => Key::ArrowLeft,
            NldKey::ArrowRight => Key::ArrowRight,
            NldKey::Shift => Key::Shift,
            NldKey::Control => Key::Control,
            NldKey::Meta => Key::Meta,
            NldKey::Alt => Key::Alt,
            NldKey::Char { text } => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Editor events first, then what the response asks of the host.
pub(super) fn convert_to_events(resp: KeyResponse, edits: Vec<NldEvent>) -> NldKeyResponse {
    let mut events = edits;

    // 1. Commit
    if let Some(text) = resp.commit {
        events.push(NldEvent::Commit { text });
    }

    // 2. Suggestions
    match resp.suggestions {
        SuggestionAction::Show { items, selected } => {
            events.push(NldEvent::ShowSuggestions { items, selected });
        }
        SuggestionAction::Hide => events.push(NldEvent::HideSuggestions),
        SuggestionAction::Keep => {}
    }

    // 3. Side effects
    if let Some(note) = resp.side_effects.open_daily_note {
        events.push(NldEvent::OpenDailyNote {
            name: note.name,
            iso_date: note.date.to_string(),
        });
    }

    // 4. Deferred work
    if resp.deferred {
        events.push(NldEvent::RunDeferred);
    }

    NldKeyResponse {
        handled: resp.handled,
        events,
    }
}
