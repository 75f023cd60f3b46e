use nld_core::format::{format_date, format_selection, output_style, ModifierCombo};
use nld_core::position::char_len;
use nld_core::AntiRetriggerMemo;
use tracing::{debug, warn};

use super::editor::Editor;
use super::types::{DailyNoteRequest, KeyResponse, Selection, SessionError, SessionState};
use super::SuggestionSession;

impl SuggestionSession {
    /// Confirm `label`: replace trigger and query with its formatted date and
    /// close. The held modifiers pick the output style.
    ///
    /// On an unparsable label or a failed edit the session still closes.
    pub fn select_suggestion(
        &mut self,
        editor: &mut dyn Editor,
        label: &str,
    ) -> Result<Selection, SessionError> {
        let SessionState::Open(open) = &self.state else {
            return Err(SessionError::NotOpen);
        };
        let ctx = open.context.clone();
        let combo = ModifierCombo::from(open.router.modifiers());

        let Some(date) = self.dates.parse_date(label) else {
            debug!(label, "selection does not resolve to a date");
            self.close(editor);
            return Err(SessionError::UnparsableDate {
                label: label.to_string(),
            });
        };
        let style = output_style(combo, self.settings.output.plain_text_by_default);
        let text = match format_selection(date, label, style, &self.settings.output) {
            Ok(text) => text,
            Err(e) => {
                self.close(editor);
                return Err(e.into());
            }
        };

        if let Err(e) = self.replace_trigger(editor, &text, ctx.start, ctx.end) {
            warn!(error = %e, "selection edit failed");
            self.close(editor);
            return Err(e);
        }
        let end = ctx.start.offset_ch(char_len(&text) as isize);
        editor.set_cursor(end);
        self.memo = AntiRetriggerMemo::new(ctx.start, end);
        self.close(editor);

        debug!(label, %date, ?combo, "selection committed");
        Ok(Selection {
            label: label.to_string(),
            date,
            text,
        })
    }

    /// Remove the trigger and query, then insert at the trigger start.
    fn replace_trigger(
        &mut self,
        editor: &mut dyn Editor,
        text: &str,
        start: nld_core::Position,
        end: nld_core::Position,
    ) -> Result<(), SessionError> {
        self.edit(editor, "", start, end)?;
        self.edit(editor, text, start, start)
    }

    /// Select the highlighted suggestion from the keyboard.
    pub(super) fn confirm_selected(&mut self, editor: &mut dyn Editor, daily_note: bool) -> KeyResponse {
        let Some(label) = self
            .open_session()
            .and_then(|o| o.selected_label())
            .map(str::to_string)
        else {
            return KeyResponse::not_handled();
        };

        let selection = match self.select_suggestion(editor, &label) {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "selection failed");
                return KeyResponse::handled().hide();
            }
        };

        let mut resp = KeyResponse::handled().hide();
        if daily_note {
            match format_date(selection.date, &self.settings.output.daily_note_format) {
                Ok(name) => {
                    resp.side_effects.open_daily_note = Some(DailyNoteRequest {
                        date: selection.date,
                        name,
                    });
                }
                Err(e) => warn!(error = %e, "daily note name"),
            }
        }
        resp.commit = Some(selection.text);
        resp
    }
}
