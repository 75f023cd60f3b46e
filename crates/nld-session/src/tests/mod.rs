mod spacer;

use std::sync::Arc;

use nld_core::dates::BuiltinDates;
use nld_core::keymap::Key;
use nld_core::settings::{parse_settings_toml, Settings, DEFAULT_SETTINGS_TOML};
use nld_core::Position;
use time::macros::date;
use time::Date;

use super::{Editor, KeyEvent, KeyResponse, MemoryEditor, SuggestionSession};

/// Saturday.
pub(super) const TODAY: Date = date!(2026 - 10 - 17);

pub(super) fn make_settings(phrase: &str, trigger_happy: bool) -> Arc<Settings> {
    let toml = DEFAULT_SETTINGS_TOML
        .replace(r#"phrase = "@""#, &format!("phrase = {phrase:?}"))
        .replace(
            "trigger_happy = false",
            &format!("trigger_happy = {trigger_happy}"),
        );
    Arc::new(parse_settings_toml(&toml).unwrap())
}

pub(super) fn make_session_with(settings: Arc<Settings>) -> SuggestionSession {
    let dates = BuiltinDates::new("en").unwrap().with_today(TODAY);
    SuggestionSession::new(settings, Box::new(dates))
}

pub(super) fn make_session() -> SuggestionSession {
    make_session_with(make_settings("@date", false))
}

/// Session plus an in-memory editor wired the way a host wires them:
/// unhandled keys get the default edit, every change re-runs trigger
/// recognition, deferred work runs after the default action.
pub(super) struct Host {
    pub session: SuggestionSession,
    pub editor: MemoryEditor,
}

impl Host {
    pub fn new(text: &str) -> Self {
        Self::with_session(make_session(), text)
    }

    pub fn with_session(session: SuggestionSession, text: &str) -> Self {
        let mut host = Self {
            session,
            editor: MemoryEditor::new(text),
        };
        host.refresh();
        host
    }

    pub fn text(&self) -> &str {
        self.editor.text()
    }

    pub fn cursor(&self) -> Position {
        self.editor.cursor()
    }

    pub fn press(&mut self, key: Key) -> KeyResponse {
        let before = (self.editor.text().to_string(), self.editor.cursor());
        let resp = self.session.handle_key(&mut self.editor, KeyEvent::Down(key));
        if !resp.handled {
            if let Some(change) = self.editor.apply_default_key(key) {
                self.session.on_document_changed(&[change]);
            }
        }
        if (self.editor.text().to_string(), self.editor.cursor()) != before {
            self.refresh();
        }
        if resp.deferred {
            let before = (self.editor.text().to_string(), self.editor.cursor());
            self.session.run_deferred(&mut self.editor);
            if (self.editor.text().to_string(), self.editor.cursor()) != before {
                self.refresh();
            }
        }
        resp
    }

    pub fn release(&mut self, key: Key) -> KeyResponse {
        self.session.handle_key(&mut self.editor, KeyEvent::Up(key))
    }

    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            self.press(key);
        }
    }

    /// Cursor moved by the user, as by a mouse click.
    pub fn click(&mut self, pos: Position) {
        self.editor.set_cursor(pos);
        self.refresh();
    }

    /// What the host does after any change: recognise, then render rows.
    pub fn refresh(&mut self) {
        if let Some(ctx) = self.session.on_trigger(&mut self.editor) {
            self.session.get_suggestions(&ctx.query);
        }
    }
}
