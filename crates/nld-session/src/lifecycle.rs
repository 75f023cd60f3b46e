use nld_core::{parse_trigger, TriggerContext, TriggerRule, SEPARATOR};
use tracing::{debug, debug_span, warn};

use super::editor::Editor;
use super::types::{OpenSession, SessionState};
use super::SuggestionSession;

impl SuggestionSession {
    /// Re-run trigger recognition at the cursor. Call on every cursor or
    /// document change.
    ///
    /// Opens (or updates) the session when a trigger is found, inserting the
    /// separator after a bare phrase; closes it otherwise.
    pub fn on_trigger(&mut self, editor: &mut dyn Editor) -> Option<TriggerContext> {
        let cursor = editor.cursor();
        let _span = debug_span!("on_trigger", %cursor).entered();

        if !editor.has_active_file() {
            self.close(editor);
            return None;
        }
        let Some(line) = editor.line(cursor.line) else {
            self.close(editor);
            return None;
        };

        let memo = std::mem::take(&mut self.memo);
        let rule = TriggerRule::from(&self.settings.trigger);
        match parse_trigger(cursor, &line, &rule, &memo, self.context()) {
            Some(ctx) => self.open(editor, ctx),
            None => {
                self.close(editor);
                None
            }
        }
    }

    /// Open the session on `ctx`, or move the open one to it.
    ///
    /// A context with a different trigger start supersedes the current one.
    pub fn open(&mut self, editor: &mut dyn Editor, ctx: TriggerContext) -> Option<TriggerContext> {
        let mut ctx = ctx;
        if self.context().is_some_and(|c| c.start != ctx.start) {
            self.close(editor);
        }

        if ctx.should_insert_spacer {
            let at = ctx.phrase_end;
            if let Err(e) = self.edit(editor, SEPARATOR.encode_utf8(&mut [0; 4]), at, at) {
                warn!(error = %e, %at, "separator insert failed");
                self.close(editor);
                return None;
            }
            let after = at.offset_ch(1);
            editor.set_cursor(after);
            ctx.end = after;
            ctx.should_insert_spacer = false;
        }

        match &mut self.state {
            SessionState::Open(o) => o.context = ctx.clone(),
            SessionState::Closed => {
                debug!(start = %ctx.start, "session opened");
                self.state = SessionState::Open(OpenSession::new(ctx.clone()));
            }
        }
        self.overlay.apply(editor, &ctx);
        Some(ctx)
    }

    /// Close the session: decorations first, then the session state.
    pub fn close(&mut self, editor: &mut dyn Editor) {
        self.overlay.clear(editor);
        if let SessionState::Open(o) = std::mem::replace(&mut self.state, SessionState::Closed) {
            debug!(start = %o.context.start, "session closed");
        }
    }

    /// Suggestions for `query`; also what the open session navigates.
    ///
    /// Rendering a fresh list resets the selection and held modifiers.
    pub fn get_suggestions(&mut self, query: &str) -> Vec<String> {
        let items = nld_core::suggest::suggestions(query, &self.dates.holiday_names());
        if let Some(o) = self.open_session_mut() {
            o.suggestions = items.clone();
            o.selected = 0;
            o.router.reset();
        }
        items
    }
}
