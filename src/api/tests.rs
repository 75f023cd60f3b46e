use nld_session::{DailyNoteRequest, KeyResponse, SideEffects, SuggestionAction};
use time::macros::date;

use super::session::NldSession;
use super::types::{convert_to_events, NldDocument, NldError, NldEvent, NldKey, NldPosition};

fn doc(text: &str, ch: u32) -> NldDocument {
    NldDocument {
        text: text.to_string(),
        cursor: NldPosition { line: 0, ch },
        view_attached: true,
        has_active_file: true,
    }
}

fn pos(ch: u32) -> NldPosition {
    NldPosition { line: 0, ch }
}

#[test]
fn test_convert_orders_edits_before_host_requests() {
    let resp = KeyResponse {
        handled: true,
        commit: Some("[[2026-10-18]]".to_string()),
        suggestions: SuggestionAction::Hide,
        deferred: false,
        side_effects: SideEffects {
            open_daily_note: Some(DailyNoteRequest {
                date: date!(2026 - 10 - 18),
                name: "2026-10-18".to_string(),
            }),
        },
    };
    let edits = vec![NldEvent::SetCursor { pos: pos(3) }];
    let out = convert_to_events(resp, edits);
    assert!(out.handled);
    assert_eq!(
        out.events,
        vec![
            NldEvent::SetCursor { pos: pos(3) },
            NldEvent::Commit {
                text: "[[2026-10-18]]".to_string()
            },
            NldEvent::HideSuggestions,
            NldEvent::OpenDailyNote {
                name: "2026-10-18".to_string(),
                iso_date: "2026-10-18".to_string(),
            },
        ]
    );
}

#[test]
fn test_convert_deferred_is_last() {
    let resp = KeyResponse {
        handled: false,
        commit: None,
        suggestions: SuggestionAction::Keep,
        deferred: true,
        side_effects: SideEffects::default(),
    };
    let out = convert_to_events(resp, Vec::new());
    assert!(!out.handled);
    assert_eq!(out.events, vec![NldEvent::RunDeferred]);
}

#[test]
fn test_multi_char_key_is_ignored() {
    let session = NldSession::new(None).unwrap();
    let resp = session
        .handle_key(doc("meet @", 6), NldKey::Char { text: "ab".into() }, true)
        .unwrap();
    assert!(!resp.handled);
    assert!(resp.events.is_empty());
}

#[test]
fn test_unknown_locale_is_rejected() {
    assert!(NldSession::new(Some("xx".into())).is_err());
    let session = NldSession::new(None).unwrap();
    assert!(session.set_locale("xx".into()).is_err());
    assert!(session.set_locale("de".into()).is_ok());
}

#[test]
fn test_trigger_emits_spacer_and_decorations() {
    let session = NldSession::new(None).unwrap();
    let update = session.on_trigger(doc("meet @", 6)).unwrap();

    let ctx = update.context.unwrap();
    assert_eq!(ctx.start, pos(5));
    assert_eq!(ctx.end, pos(7));
    assert_eq!(
        update.events,
        vec![
            NldEvent::ReplaceRange {
                text: " ".into(),
                from: pos(6),
                to: pos(6),
            },
            NldEvent::SetCursor { pos: pos(7) },
            NldEvent::SetDecorations {
                mark_from: 5,
                mark_to: 6,
                spacer: Some(7),
            },
        ]
    );
    assert!(session.is_open());
    assert!(session.context_json().unwrap().contains("\"query\":\"\""));
}

#[test]
fn test_tab_then_enter_commits() {
    let session = NldSession::new(None).unwrap();
    session.on_trigger(doc("meet @", 6)).unwrap();
    session.get_suggestions(String::new());

    let resp = session
        .handle_key(doc("meet @ ", 7), NldKey::Tab, true)
        .unwrap();
    assert!(resp.handled);
    assert!(resp.events.contains(&NldEvent::ReplaceRange {
        text: "Today".into(),
        from: pos(7),
        to: pos(7),
    }));
    assert!(resp
        .events
        .iter()
        .any(|e| matches!(e, NldEvent::ShowSuggestions { items, selected: 0 } if items[0] == "Today")));

    let resp = session
        .handle_key(doc("meet @ Today", 12), NldKey::Enter, true)
        .unwrap();
    assert!(resp.handled);
    let commit = resp.events.iter().find_map(|e| match e {
        NldEvent::Commit { text } => Some(text.clone()),
        _ => None,
    });
    assert!(commit.unwrap().starts_with("[["));
    assert!(resp.events.contains(&NldEvent::ClearDecorations));
    assert!(resp.events.contains(&NldEvent::HideSuggestions));
    assert!(!session.is_open());
}

#[test]
fn test_failed_select_still_clears_host_decorations() {
    let session = NldSession::new(None).unwrap();
    let update = session.on_trigger(doc("meet @", 6)).unwrap();
    assert!(update
        .events
        .iter()
        .any(|e| matches!(e, NldEvent::SetDecorations { .. })));

    let resp = session.select(doc("meet @ ", 7), "whenever".into()).unwrap();
    assert!(resp.handled);
    assert!(!session.is_open());
    assert_eq!(resp.events[0], NldEvent::ClearDecorations);
    assert!(matches!(
        &resp.events[1],
        NldEvent::SelectionFailed { reason } if reason.contains("whenever")
    ));
    assert_eq!(resp.events[2], NldEvent::HideSuggestions);
    assert!(!resp
        .events
        .iter()
        .any(|e| matches!(e, NldEvent::Commit { .. })));

    // Nothing left for a later close to clear.
    assert!(session.close(doc("meet @ ", 7)).unwrap().is_empty());
}

#[test]
fn test_select_without_session_is_an_error() {
    let session = NldSession::new(None).unwrap();
    assert!(matches!(
        session.select(doc("meet", 4), "today".into()),
        Err(NldError::Session { .. })
    ));
}

#[test]
fn test_cursor_outside_document_is_rejected() {
    let session = NldSession::new(None).unwrap();
    assert!(matches!(
        session.on_trigger(doc("meet @", 40)),
        Err(NldError::InvalidData { .. })
    ));
    let mut d = doc("meet @", 0);
    d.cursor.line = 3;
    assert!(session.handle_key(d, NldKey::Tab, true).is_err());
    assert!(!session.is_open());
}

#[test]
fn test_detached_view_gets_no_decorations() {
    let session = NldSession::new(None).unwrap();
    let mut d = doc("meet @", 6);
    d.view_attached = false;
    let update = session.on_trigger(d).unwrap();
    assert!(update.context.is_some());
    assert!(!update
        .events
        .iter()
        .any(|e| matches!(e, NldEvent::SetDecorations { .. })));

    let events = session.close(doc("meet @ ", 7)).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_parse_date_preview() {
    assert_eq!(
        super::parse_date_preview("2026-12-24".into(), "en".into()).unwrap(),
        Some("2026-12-24".to_string())
    );
    assert_eq!(
        super::parse_date_preview("someday".into(), "en".into()).unwrap(),
        None
    );
    assert!(super::parse_date_preview("today".into(), "xx".into()).is_err());
}
