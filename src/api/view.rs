use nld_core::Position;
use nld_session::{EditError, Editor, MemoryEditor, OverlayEffect, Transaction};
use tracing::warn;

use super::types::{NldDocument, NldError, NldEvent};

/// [`Editor`] over a host snapshot that records every mutation as an
/// [`NldEvent`] for the host to replay.
pub(super) struct HostView {
    buffer: MemoryEditor,
    attached: bool,
    active_file: bool,
    events: Vec<NldEvent>,
}

impl HostView {
    /// Fails when the cursor is not inside `doc.text`.
    pub(super) fn new(doc: &NldDocument) -> Result<Self, NldError> {
        let mut buffer = MemoryEditor::new(&doc.text);
        let cursor = Position::from(doc.cursor);
        if buffer.pos_to_offset(cursor).is_none() {
            warn!(%cursor, "host cursor outside document");
            return Err(NldError::InvalidData {
                msg: format!("cursor {cursor} is outside the document"),
            });
        }
        buffer.set_cursor(cursor);
        Ok(Self {
            buffer,
            attached: doc.view_attached,
            active_file: doc.has_active_file,
            events: Vec::new(),
        })
    }

    pub(super) fn into_events(self) -> Vec<NldEvent> {
        self.events
    }
}

impl Editor for HostView {
    fn line(&self, line: usize) -> Option<String> {
        self.buffer.line(line)
    }

    fn cursor(&self) -> Position {
        self.buffer.cursor()
    }

    fn set_cursor(&mut self, pos: Position) {
        self.buffer.set_cursor(pos);
        self.events.push(NldEvent::SetCursor { pos: pos.into() });
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) -> Result<(), EditError> {
        self.buffer.replace_range(text, from, to)?;
        self.events.push(NldEvent::ReplaceRange {
            text: text.to_string(),
            from: from.into(),
            to: to.into(),
        });
        Ok(())
    }

    fn pos_to_offset(&self, pos: Position) -> Option<usize> {
        self.buffer.pos_to_offset(pos)
    }

    fn dispatch(&mut self, tx: Transaction) -> Result<(), EditError> {
        if !self.attached {
            return Err(EditError::Detached);
        }
        for effect in &tx.effects {
            self.events.push(match effect {
                OverlayEffect::Replace(set) => NldEvent::from(&**set),
                OverlayEffect::Clear => NldEvent::ClearDecorations,
            });
        }
        Ok(())
    }

    fn is_view_attached(&self) -> bool {
        self.attached
    }

    fn has_active_file(&self) -> bool {
        self.active_file
    }
}
