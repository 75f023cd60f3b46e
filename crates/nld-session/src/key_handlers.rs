use nld_core::keymap::KeyAction;
use nld_core::position::char_len;
use nld_core::{AntiRetriggerMemo, SEPARATOR};
use tracing::{debug, debug_span, warn};

use super::editor::Editor;
use super::router::{KeyEvent, SessionKey};
use super::types::{cyclic_index, Deferred, KeyResponse, SessionState};
use super::SuggestionSession;

impl SuggestionSession {
    /// Process a key event. Closed sessions never handle keys.
    pub fn handle_key(&mut self, editor: &mut dyn Editor, event: KeyEvent) -> KeyResponse {
        let _span = debug_span!("handle_key", ?event).entered();

        let SessionState::Open(open) = &mut self.state else {
            return KeyResponse::not_handled();
        };
        let Some(key) = open.router.route(event, self.settings.keymap()) else {
            return KeyResponse::not_handled();
        };
        debug!(?key, "routed");

        match key {
            SessionKey::Space => self.handle_space(editor),
            SessionKey::Backspace => self.handle_backspace(editor),
            SessionKey::Action(KeyAction::Accept) => self.accept_selected(editor),
            SessionKey::Action(KeyAction::Select) => self.confirm_selected(editor, false),
            SessionKey::Action(KeyAction::DailyNote) => self.confirm_selected(editor, true),
            SessionKey::Action(KeyAction::Next) => self.navigate(1),
            SessionKey::Action(KeyAction::Previous) => self.navigate(-1),
        }
    }

    /// First space at the start of a blank query is swallowed (the
    /// separator is already there); the second passes through and schedules
    /// a dismissal.
    fn handle_space(&mut self, editor: &mut dyn Editor) -> KeyResponse {
        let cursor = editor.cursor();
        let Some(open) = self.open_session_mut() else {
            return KeyResponse::not_handled();
        };
        let ctx = &mut open.context;
        if !ctx.query_is_blank() || cursor != ctx.end {
            return KeyResponse::not_handled();
        }

        if !ctx.first_space_blocked {
            ctx.first_space_blocked = true;
            debug!("first space absorbed");
            return KeyResponse::handled();
        }

        ctx.first_space_blocked = false;
        let start = ctx.start;
        self.memo = AntiRetriggerMemo::new(start, cursor.offset_ch(1));
        self.deferred = Some(Deferred::DismissAfterSpace { start });
        debug!("second space, dismissal scheduled");
        KeyResponse {
            deferred: true,
            ..KeyResponse::not_handled()
        }
    }

    /// Backspace on a blank query removes the separator and closes.
    fn handle_backspace(&mut self, editor: &mut dyn Editor) -> KeyResponse {
        let Some(ctx) = self.context().cloned() else {
            return KeyResponse::not_handled();
        };
        if !ctx.query_is_blank() || ctx.end.ch == 0 {
            return KeyResponse::not_handled();
        }

        let from = ctx.end.offset_ch(-1);
        if let Err(e) = self.edit(editor, "", from, ctx.end) {
            warn!(error = %e, "backspace dismissal failed");
            self.close(editor);
            return KeyResponse::handled().hide();
        }
        editor.set_cursor(from);
        self.close(editor);
        self.memo = AntiRetriggerMemo::new(ctx.start, from);
        KeyResponse::handled().hide()
    }

    /// Replace the query with the selected label and keep the session open.
    fn accept_selected(&mut self, editor: &mut dyn Editor) -> KeyResponse {
        let Some(open) = self.open_session() else {
            return KeyResponse::not_handled();
        };
        let Some(label) = open.selected_label().map(str::to_string) else {
            return KeyResponse::not_handled();
        };
        let mut ctx = open.context.clone();

        // Only the query span; a glued query stays glued.
        let from = ctx.query_start();
        let text = label.clone();
        if let Err(e) = self.edit(editor, &text, from, ctx.end) {
            warn!(error = %e, "accept failed");
            self.close(editor);
            return KeyResponse::handled().hide();
        }

        let end = from.offset_ch(char_len(&text) as isize);
        editor.set_cursor(end);
        ctx.end = end;
        ctx.query = label;
        ctx.first_space_blocked = false;
        ctx.should_insert_spacer = false;

        self.overlay.apply(editor, &ctx);
        let query = ctx.query.clone();
        if let Some(open) = self.open_session_mut() {
            open.context = ctx;
        }
        self.get_suggestions(&query);
        self.make_suggestions_response()
    }

    fn navigate(&mut self, delta: i32) -> KeyResponse {
        let Some(open) = self.open_session_mut() else {
            return KeyResponse::not_handled();
        };
        if open.suggestions.is_empty() {
            return KeyResponse::not_handled();
        }
        open.selected = cyclic_index(open.selected, delta, open.suggestions.len());
        self.make_suggestions_response()
    }

    /// Second half of the double-space dismissal, after the host inserted
    /// its space: collapse the doubled separator and close.
    pub fn run_deferred(&mut self, editor: &mut dyn Editor) -> KeyResponse {
        let Some(Deferred::DismissAfterSpace { start }) = self.deferred.take() else {
            return KeyResponse::not_handled();
        };
        let _span = debug_span!("run_deferred", %start).entered();

        let cursor = editor.cursor();
        let doubled = editor.line(cursor.line).is_some_and(|line| {
            let chars: Vec<char> = line.chars().collect();
            cursor.ch >= 2
                && chars.get(cursor.ch - 1) == Some(&SEPARATOR)
                && chars.get(cursor.ch - 2) == Some(&SEPARATOR)
        });
        if doubled {
            let from = cursor.offset_ch(-1);
            match self.edit(editor, "", from, cursor) {
                Ok(()) => editor.set_cursor(from),
                Err(e) => warn!(error = %e, "separator collapse failed"),
            }
        }

        self.close(editor);
        self.memo = AntiRetriggerMemo::new(start, editor.cursor());
        KeyResponse::handled().hide()
    }
}
