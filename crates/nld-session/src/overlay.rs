//! Visual overlay for the active trigger.
//!
//! One [`DecorationSet`] per view: a mark over the trigger phrase and, while
//! the query is blank, a zero-width spacer widget where the query begins.
//! The set is replaced wholesale on every update and remapped through
//! document changes in between.

use std::ops::Range;
use std::sync::Arc;

use nld_core::TriggerContext;
use tracing::{debug, warn};

use crate::editor::{Change, Editor, Transaction};

/// Which side of an edit at the same offset a point sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// Map a flat offset through one change.
pub fn map_offset(pos: usize, change: &Change, assoc: Assoc) -> usize {
    if pos < change.from {
        pos
    } else if pos > change.to {
        pos - (change.to - change.from) + change.insert_len
    } else {
        match assoc {
            Assoc::Before => change.from,
            Assoc::After => change.from + change.insert_len,
        }
    }
}

/// Zero-width widget drawn at the start of a blank query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacer {
    pub offset: usize,
}

impl Spacer {
    /// Positive side: text typed at the spacer lands before it.
    pub const ASSOC: Assoc = Assoc::After;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSet {
    /// Flat offsets of the trigger phrase.
    pub mark: Range<usize>,
    pub spacer: Option<Spacer>,
}

impl DecorationSet {
    /// Decorations for `ctx`, or `None` if its positions are not in the document.
    pub fn for_context(ctx: &TriggerContext, editor: &dyn Editor) -> Option<Self> {
        let start = editor.pos_to_offset(ctx.start)?;
        let end = editor.pos_to_offset(ctx.phrase_end)?;
        let spacer = if ctx.query_is_blank() {
            Some(Spacer {
                offset: editor.pos_to_offset(ctx.query_start())?,
            })
        } else {
            None
        };
        Some(Self {
            mark: start..end,
            spacer,
        })
    }

    /// Remap through `changes`. `None` once the mark has collapsed.
    pub fn map(&self, changes: &[Change]) -> Option<Self> {
        let mut mark = self.mark.clone();
        let mut spacer = self.spacer;
        for change in changes {
            mark = map_offset(mark.start, change, Assoc::After)
                ..map_offset(mark.end, change, Assoc::Before);
            if let Some(s) = spacer.as_mut() {
                s.offset = map_offset(s.offset, change, Spacer::ASSOC);
            }
            if mark.start >= mark.end {
                return None;
            }
        }
        Some(Self { mark, spacer })
    }
}

/// Effects carried by a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEffect {
    Replace(Arc<DecorationSet>),
    Clear,
}

/// Session-side mirror of what the overlay last installed.
#[derive(Debug, Default)]
pub struct DecorationOverlay {
    installed: Option<Arc<DecorationSet>>,
    /// The host may still hold decorations we dispatched.
    dispatched: bool,
}

impl DecorationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(&self) -> Option<&DecorationSet> {
        self.installed.as_deref()
    }

    /// Replace the decorations with those for `ctx`.
    pub fn apply(&mut self, editor: &mut dyn Editor, ctx: &TriggerContext) {
        if !editor.is_view_attached() {
            debug!("overlay apply skipped: view detached");
            return;
        }
        let Some(set) = DecorationSet::for_context(ctx, &*editor) else {
            warn!(start = %ctx.start, end = %ctx.end, "trigger outside document, clearing overlay");
            self.clear(editor);
            return;
        };
        if self.installed.as_deref() == Some(&set) {
            return;
        }

        let set = Arc::new(set);
        let tx = Transaction {
            effects: vec![OverlayEffect::Replace(Arc::clone(&set))],
            ..Transaction::default()
        };
        match editor.dispatch(tx) {
            Ok(()) => {
                debug!(mark = ?set.mark, spacer = set.spacer.is_some(), "overlay installed");
                self.installed = Some(set);
                self.dispatched = true;
            }
            Err(e) => {
                warn!(error = %e, "overlay unavailable");
                self.installed = None;
            }
        }
    }

    pub fn clear(&mut self, editor: &mut dyn Editor) {
        let was_dispatched = std::mem::take(&mut self.dispatched);
        self.installed = None;
        if !was_dispatched {
            return;
        }
        if !editor.is_view_attached() {
            debug!("overlay clear skipped: view detached");
            return;
        }
        let tx = Transaction {
            effects: vec![OverlayEffect::Clear],
            ..Transaction::default()
        };
        if let Err(e) = editor.dispatch(tx) {
            warn!(error = %e, "overlay clear failed");
        }
    }

    /// Follow document edits made outside the overlay.
    pub fn map_changes(&mut self, changes: &[Change]) {
        if changes.is_empty() {
            return;
        }
        if let Some(set) = &self.installed {
            self.installed = set.map(changes).map(Arc::new);
            if self.installed.is_none() {
                debug!("overlay mark collapsed");
            }
        }
    }
}
