//! In-memory editor for tests, the CLI simulator and hosts without a view.

use std::sync::Arc;

use nld_core::keymap::Key;
use nld_core::position::{byte_index, char_len};
use nld_core::Position;
use tracing::trace;

use crate::editor::{Change, EditError, Editor, Transaction};
use crate::overlay::{map_offset, Assoc, DecorationSet, OverlayEffect};

/// A plain text buffer with one cursor and one decoration slot.
///
/// Edits remap the cursor (sticking before inserted text, like a host
/// `replaceRange`) and the installed decorations.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    text: String,
    cursor: Position,
    attached: bool,
    active_file: bool,
    reject_dispatch: bool,
    decorations: Option<Arc<DecorationSet>>,
    dispatched: usize,
}

impl MemoryEditor {
    /// Buffer with the cursor at the end of the text.
    pub fn new(text: &str) -> Self {
        let mut editor = Self {
            text: text.to_string(),
            cursor: Position::default(),
            attached: true,
            active_file: true,
            reject_dispatch: false,
            decorations: None,
            dispatched: 0,
        };
        editor.cursor = editor.pos_of(char_len(text));
        editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn decorations(&self) -> Option<&DecorationSet> {
        self.decorations.as_deref()
    }

    /// Number of transactions accepted so far.
    pub fn dispatch_count(&self) -> usize {
        self.dispatched
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn set_active_file(&mut self, active: bool) {
        self.active_file = active;
    }

    /// Make every `dispatch` fail, as a host without the overlay extension would.
    pub fn set_reject_dispatch(&mut self, reject: bool) {
        self.reject_dispatch = reject;
    }

    /// Insert at the cursor and move the cursor past the text.
    pub fn type_text(&mut self, text: &str) -> Option<Change> {
        let at = self.cursor;
        let change = self.edit(text, at, at).ok()?;
        self.cursor = self.pos_of(change.from + change.insert_len);
        Some(change)
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> Option<Change> {
        let offset = self.pos_to_offset(self.cursor)?;
        if offset == 0 {
            return None;
        }
        let from = self.pos_of(offset - 1);
        let to = self.cursor;
        self.edit("", from, to).ok()
    }

    /// What a host does with a key nobody handled. Returns the edit, if any.
    pub fn apply_default_key(&mut self, key: Key) -> Option<Change> {
        match key {
            Key::Space => self.type_text(" "),
            Key::Backspace => self.backspace(),
            Key::Tab => self.type_text("\t"),
            Key::Enter => self.type_text("\n"),
            Key::Char(c) => self.type_text(c.encode_utf8(&mut [0; 4])),
            Key::ArrowLeft | Key::ArrowRight => {
                let offset = self.pos_to_offset(self.cursor)?;
                let target = match key {
                    Key::ArrowLeft => offset.checked_sub(1)?,
                    _ => offset + 1,
                };
                if target <= char_len(&self.text) {
                    self.cursor = self.pos_of(target);
                }
                None
            }
            _ => None,
        }
    }

    fn pos_of(&self, offset: usize) -> Position {
        let mut remaining = offset;
        let mut line_count = 0;
        for (n, line) in self.text.split('\n').enumerate() {
            let len = char_len(line);
            if remaining <= len {
                return Position::new(n, remaining);
            }
            remaining -= len + 1;
            line_count = n;
        }
        Position::new(line_count, 0)
    }

    fn edit(&mut self, text: &str, from: Position, to: Position) -> Result<Change, EditError> {
        let stale = EditError::StaleRange { from, to };
        let (Some(a), Some(b)) = (self.pos_to_offset(from), self.pos_to_offset(to)) else {
            return Err(stale);
        };
        if a > b {
            return Err(stale);
        }
        let old_cursor = self.pos_to_offset(self.cursor);
        let start = byte_index(&self.text, a).ok_or_else(|| stale.clone())?;
        let end = byte_index(&self.text, b).ok_or(stale)?;
        self.text.replace_range(start..end, text);

        let change = Change {
            from: a,
            to: b,
            insert_len: char_len(text),
        };
        if let Some(c) = old_cursor {
            self.cursor = self.pos_of(map_offset(c, &change, Assoc::Before));
        }
        if let Some(set) = &self.decorations {
            self.decorations = set.map(&[change]).map(Arc::new);
        }
        trace!(from = a, to = b, inserted = change.insert_len, "buffer edit");
        Ok(change)
    }

    fn line_start(&self, line: usize) -> Option<usize> {
        let mut offset = 0;
        for (n, text) in self.text.split('\n').enumerate() {
            if n == line {
                return Some(offset);
            }
            offset += char_len(text) + 1;
        }
        None
    }
}

impl Editor for MemoryEditor {
    fn line(&self, line: usize) -> Option<String> {
        self.text.split('\n').nth(line).map(str::to_string)
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        if self.pos_to_offset(pos).is_some() {
            self.cursor = pos;
        }
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) -> Result<(), EditError> {
        self.edit(text, from, to).map(|_| ())
    }

    fn pos_to_offset(&self, pos: Position) -> Option<usize> {
        let line = self.line(pos.line)?;
        if pos.ch > char_len(&line) {
            return None;
        }
        Some(self.line_start(pos.line)? + pos.ch)
    }

    fn dispatch(&mut self, tx: Transaction) -> Result<(), EditError> {
        if !self.attached {
            return Err(EditError::Detached);
        }
        if self.reject_dispatch {
            return Err(EditError::Rejected("no decoration field".to_string()));
        }
        if let Some(set) = &self.decorations {
            self.decorations = set.map(&tx.changes).map(Arc::new);
        }
        for effect in tx.effects {
            match effect {
                OverlayEffect::Replace(set) => self.decorations = Some(set),
                OverlayEffect::Clear => self.decorations = None,
            }
        }
        if let Some(sel) = tx.selection {
            self.cursor = self.pos_of(sel);
        }
        self.dispatched += 1;
        Ok(())
    }

    fn is_view_attached(&self) -> bool {
        self.attached
    }

    fn has_active_file(&self) -> bool {
        self.active_file
    }
}
