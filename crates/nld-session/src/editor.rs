//! The host editor contract.
//!
//! The session reads lines and the cursor, mutates text through
//! `replace_range`, and installs decorations through `dispatch`. Positions
//! are `(line, ch)`; flat offsets count `char`s from the start of the
//! document, newlines included.

use nld_core::Position;

use crate::overlay::OverlayEffect;

/// One text change in flat offsets: `[from, to)` replaced by `insert_len` chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert_len: usize,
}

/// Low-level update accepted by [`Editor::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    pub changes: Vec<Change>,
    pub effects: Vec<OverlayEffect>,
    pub selection: Option<usize>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("range {from}..{to} is outside the document")]
    StaleRange { from: Position, to: Position },
    #[error("view is detached")]
    Detached,
    #[error("editor rejected update: {0}")]
    Rejected(String),
}

pub trait Editor {
    /// Text of `line` without its line break.
    fn line(&self, line: usize) -> Option<String>;

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, pos: Position);

    /// Single logical edit; `from == to` inserts.
    fn replace_range(&mut self, text: &str, from: Position, to: Position)
        -> Result<(), EditError>;

    fn pos_to_offset(&self, pos: Position) -> Option<usize>;

    fn dispatch(&mut self, tx: Transaction) -> Result<(), EditError>;

    fn is_view_attached(&self) -> bool;

    /// Whether the view is backed by a file the session may edit.
    fn has_active_file(&self) -> bool {
        true
    }
}
