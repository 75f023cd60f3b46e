use nld_core::keymap::Key;
use nld_core::Position;

use super::{make_session_with, make_settings, Host};

#[test]
fn test_first_space_is_absorbed() {
    let mut host = Host::new("meet @date");
    let resp = host.press(Key::Space);
    assert!(resp.handled);
    assert!(!resp.deferred);
    assert_eq!(host.text(), "meet @date ");
    assert!(host.session.context().unwrap().first_space_blocked);
}

#[test]
fn test_second_space_dismisses_and_collapses() {
    let mut host = Host::new("meet @date");
    host.press(Key::Space);

    let resp = host.press(Key::Space);
    assert!(!resp.handled);
    assert!(resp.deferred);
    assert_eq!(host.text(), "meet @date ");
    assert_eq!(host.cursor(), Position::new(0, 11));
    assert!(!host.session.is_open());
    assert!(!host.session.has_deferred());
    assert!(host.editor.decorations().is_none());
}

#[test]
fn test_block_survives_recognition_at_same_start() {
    let mut host = Host::new("meet @date");
    host.press(Key::Space);
    host.refresh();
    assert!(host.session.context().unwrap().first_space_blocked);
}

#[test]
fn test_block_resets_once_query_is_typed() {
    let mut host = Host::new("meet @date");
    host.press(Key::Space);
    host.type_str("t");
    assert!(!host.session.context().unwrap().first_space_blocked);

    host.press(Key::Backspace);
    assert_eq!(host.text(), "meet @date ");
    assert!(!host.session.context().unwrap().first_space_blocked);
    // Absorbed again rather than dismissing.
    assert!(host.press(Key::Space).handled);
    assert!(host.session.is_open());
}

#[test]
fn test_space_inside_query_passes_through() {
    let mut host = Host::new("meet @date");
    host.type_str("in");
    let resp = host.press(Key::Space);
    assert!(!resp.handled);
    assert_eq!(host.text(), "meet @date in ");
    assert_eq!(host.session.context().unwrap().query, "in ");
}

#[test]
fn test_existing_separator_is_reused() {
    let mut host = Host::new("meet @date tomorrow");
    assert_eq!(host.session.context().unwrap().query, "tomorrow");

    host.click(Position::new(0, 10));
    let ctx = host.session.context().unwrap();
    assert_eq!(ctx.end, Position::new(0, 10));
    assert_eq!(host.text(), "meet @date tomorrow");
}

#[test]
fn test_trigger_happy_accepts_glued_phrase() {
    let session = make_session_with(make_settings("@date", true));
    let host = Host::with_session(session, "x@date");
    assert!(host.session.is_open());
    assert_eq!(host.text(), "x@date ");
}

#[test]
fn test_tab_on_glued_query_adds_no_separator() {
    let session = make_session_with(make_settings("@date", true));
    let mut host = Host::with_session(session, "x@datene");
    assert_eq!(host.session.context().unwrap().query, "ne");

    let resp = host.press(Key::Tab);
    assert!(resp.handled);
    assert_eq!(host.text(), "x@datenext week");
    assert_eq!(host.cursor(), Position::new(0, 15));
    assert_eq!(host.session.context().unwrap().query, "next week");

    host.press(Key::Enter);
    assert_eq!(host.text(), "x[[2026-10-24]]");
}
