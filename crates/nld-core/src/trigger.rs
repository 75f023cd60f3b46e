//! Trigger recognition.
//!
//! `parse_trigger` decides, from the cursor and the text of its line, whether
//! the user is currently typing a query after the configured trigger phrase.
//! It is a pure function: suppression state and the previous context are
//! passed in, never stored here.

use serde::Serialize;
use tracing::trace;

use crate::position::{char_len, Position};
use crate::settings::TriggerSettings;

/// Character auto-inserted between the trigger phrase and the query.
pub const SEPARATOR: char = ' ';

/// How the trigger phrase is recognised.
#[derive(Debug, Clone, Copy)]
pub struct TriggerRule<'a> {
    pub phrase: &'a str,
    /// Phrase must be bounded by whitespace or line edges on both sides.
    pub strict: bool,
}

impl<'a> From<&'a TriggerSettings> for TriggerRule<'a> {
    fn from(s: &'a TriggerSettings) -> Self {
        Self {
            phrase: &s.phrase,
            strict: !s.trigger_happy,
        }
    }
}

/// An active trigger: the phrase at `start`, the query up to `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerContext {
    /// First character of the trigger phrase.
    pub start: Position,
    /// Column just past the trigger phrase.
    pub phrase_end: Position,
    /// Cursor-adjacent end of the query (exclusive).
    pub end: Position,
    pub query: String,
    pub should_insert_spacer: bool,
    pub first_space_blocked: bool,
}

impl TriggerContext {
    /// Whitespace-only queries count as empty.
    pub fn query_is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Where the query text begins (after the optional separator).
    /// Clamped to column 0 for a query longer than `end`.
    pub fn query_start(&self) -> Position {
        Position::new(
            self.end.line,
            self.end.ch.saturating_sub(char_len(&self.query)),
        )
    }
}

/// Single-use record of the span the session itself just wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AntiRetriggerMemo {
    pub last_replaced_start: Option<Position>,
    pub last_insertion_end: Option<Position>,
}

impl AntiRetriggerMemo {
    pub fn new(replaced_start: Position, insertion_end: Position) -> Self {
        Self {
            last_replaced_start: Some(replaced_start),
            last_insertion_end: Some(insertion_end),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_replaced_start.is_none() && self.last_insertion_end.is_none()
    }

    fn suppresses(&self, trigger_start: Position, cursor: Position) -> bool {
        match (self.last_replaced_start, self.last_insertion_end) {
            (Some(replaced), Some(end)) => end == cursor && trigger_start <= replaced,
            _ => false,
        }
    }
}

/// Recognise a trigger on `line_text` (the text of `cursor.line`).
///
/// `previous` is the context of the currently open session, if any; its
/// `first_space_blocked` flag survives while the trigger start is unchanged
/// and the query is still blank.
pub fn parse_trigger(
    cursor: Position,
    line_text: &str,
    rule: &TriggerRule<'_>,
    memo: &AntiRetriggerMemo,
    previous: Option<&TriggerContext>,
) -> Option<TriggerContext> {
    let phrase: Vec<char> = rule.phrase.chars().collect();
    if phrase.is_empty() {
        return None;
    }
    let line: Vec<char> = line_text.chars().collect();
    let cursor_ch = cursor.ch.min(line.len());

    let start = rightmost_occurrence(&line, &phrase, cursor_ch)?;
    let phrase_end = start + phrase.len();

    if rule.strict && !is_bounded(&line, start, phrase_end) {
        return None;
    }
    // Still typing the phrase itself.
    if cursor_ch < phrase_end {
        return None;
    }

    let start_pos = Position::new(cursor.line, start);
    let cursor_pos = Position::new(cursor.line, cursor_ch);
    if memo.suppresses(start_pos, cursor_pos) {
        trace!(%start_pos, %cursor_pos, "trigger suppressed by memo");
        return None;
    }

    let typed = &line[phrase_end..cursor_ch];
    let query_chars = match typed.first() {
        Some(&SEPARATOR) => &typed[1..],
        _ => typed,
    };
    let query: String = query_chars.iter().collect();

    let should_insert_spacer = cursor_ch == phrase_end && line.get(phrase_end) != Some(&SEPARATOR);

    let first_space_blocked = match previous {
        Some(prev) if prev.start == start_pos && query.trim().is_empty() => {
            prev.first_space_blocked
        }
        _ => false,
    };

    Some(TriggerContext {
        start: start_pos,
        phrase_end: Position::new(cursor.line, phrase_end),
        end: cursor_pos,
        query,
        should_insert_spacer,
        first_space_blocked,
    })
}

/// Start of the rightmost occurrence of `phrase` that begins before `limit`.
fn rightmost_occurrence(line: &[char], phrase: &[char], limit: usize) -> Option<usize> {
    (0..limit)
        .rev()
        .find(|&s| line[s..].starts_with(phrase))
}

fn is_bounded(line: &[char], start: usize, end: usize) -> bool {
    let before = start == 0 || line[start - 1].is_whitespace();
    let after = line.get(end).map_or(true, |c| c.is_whitespace());
    before && after
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: TriggerRule<'static> = TriggerRule {
        phrase: "@date",
        strict: true,
    };
    const LOOSE: TriggerRule<'static> = TriggerRule {
        phrase: "@date",
        strict: false,
    };

    fn parse(line: &str, ch: usize, rule: &TriggerRule<'_>) -> Option<TriggerContext> {
        parse_trigger(
            Position::new(0, ch),
            line,
            rule,
            &AntiRetriggerMemo::default(),
            None,
        )
    }

    #[test]
    fn phrase_at_end_of_line_requests_spacer() {
        let ctx = parse("meet @date", 10, &STRICT).unwrap();
        assert_eq!(ctx.start, Position::new(0, 5));
        assert_eq!(ctx.end, Position::new(0, 10));
        assert_eq!(ctx.phrase_end, Position::new(0, 10));
        assert_eq!(ctx.query, "");
        assert!(ctx.should_insert_spacer);
        assert!(!ctx.first_space_blocked);
    }

    #[test]
    fn spacer_is_stripped_from_query() {
        let ctx = parse("meet @date ", 11, &STRICT).unwrap();
        assert_eq!(ctx.query, "");
        assert!(!ctx.should_insert_spacer);
        assert_eq!(ctx.query_start(), Position::new(0, 11));

        let ctx = parse("meet @date tomorrow", 19, &STRICT).unwrap();
        assert_eq!(ctx.query, "tomorrow");
        assert_eq!(ctx.query_start(), Position::new(0, 11));
    }

    #[test]
    fn only_one_separator_is_stripped() {
        let ctx = parse("@date  x", 8, &STRICT).unwrap();
        assert_eq!(ctx.query, " x");
    }

    #[test]
    fn strict_rejects_abutting_text() {
        assert!(parse("x@date", 6, &STRICT).is_none());
        assert!(parse("@datex", 6, &STRICT).is_none());
        assert!(parse("x@date", 6, &LOOSE).is_some());
    }

    #[test]
    fn loose_query_may_abut_phrase() {
        let ctx = parse("x@datenext", 10, &LOOSE).unwrap();
        assert_eq!(ctx.start, Position::new(0, 1));
        assert_eq!(ctx.query, "next");
        assert!(!ctx.should_insert_spacer);
    }

    #[test]
    fn no_phrase_or_empty_phrase() {
        assert!(parse("meet tomorrow", 13, &STRICT).is_none());
        let empty = TriggerRule {
            phrase: "",
            strict: false,
        };
        assert!(parse("meet @date", 10, &empty).is_none());
    }

    #[test]
    fn cursor_inside_phrase_is_not_a_trigger() {
        assert!(parse("meet @date", 8, &STRICT).is_none());
        assert!(parse("@date a @date", 11, &STRICT).is_none());
    }

    #[test]
    fn rightmost_occurrence_wins() {
        let ctx = parse("@date a @date b", 15, &STRICT).unwrap();
        assert_eq!(ctx.start, Position::new(0, 8));
        assert_eq!(ctx.query, "b");
    }

    #[test]
    fn cursor_past_line_end_is_clamped() {
        let ctx = parse("@date", 40, &STRICT).unwrap();
        assert_eq!(ctx.end, Position::new(0, 5));
    }

    #[test]
    fn columns_count_chars() {
        let ctx = parse("日本 @date 明日", 11, &STRICT).unwrap();
        assert_eq!(ctx.start, Position::new(0, 3));
        assert_eq!(ctx.query, "明日");
    }

    #[test]
    fn memo_suppresses_at_insertion_end_only() {
        let line = "@date x [[2026-10-18]]";
        let memo = AntiRetriggerMemo::new(Position::new(0, 8), Position::new(0, 22));
        let at_end = parse_trigger(Position::new(0, 22), line, &STRICT, &memo, None);
        assert!(at_end.is_none());

        let elsewhere = parse_trigger(Position::new(0, 21), line, &STRICT, &memo, None);
        assert!(elsewhere.is_some());
    }

    #[test]
    fn memo_does_not_suppress_later_trigger() {
        let line = "[[2026-10-18]] @date";
        let memo = AntiRetriggerMemo::new(Position::new(0, 0), Position::new(0, 20));
        let ctx = parse_trigger(Position::new(0, 20), line, &STRICT, &memo, None);
        assert_eq!(ctx.unwrap().start, Position::new(0, 15));
    }

    #[test]
    fn memo_on_other_line_never_suppresses() {
        let memo = AntiRetriggerMemo::new(Position::new(0, 0), Position::new(0, 6));
        let ctx = parse_trigger(Position::new(1, 6), "@date ", &STRICT, &memo, None);
        assert!(ctx.is_some());
    }

    #[test]
    fn first_space_blocked_carries_while_blank() {
        let mut prev = parse("meet @date ", 11, &STRICT).unwrap();
        prev.first_space_blocked = true;

        let memo = AntiRetriggerMemo::default();
        let same = parse_trigger(Position::new(0, 11), "meet @date ", &STRICT, &memo, Some(&prev));
        assert!(same.unwrap().first_space_blocked);

        let typed =
            parse_trigger(Position::new(0, 12), "meet @date t", &STRICT, &memo, Some(&prev));
        assert!(!typed.unwrap().first_space_blocked);
    }

    #[test]
    fn whitespace_query_is_blank() {
        let ctx = parse("@date   ", 8, &STRICT).unwrap();
        assert_eq!(ctx.query, "  ");
        assert!(ctx.query_is_blank());
    }

    #[test]
    fn parse_is_pure() {
        let memo = AntiRetriggerMemo::new(Position::new(0, 0), Position::new(0, 3));
        let a = parse_trigger(Position::new(0, 12), "go @date fri", &STRICT, &memo, None);
        let b = parse_trigger(Position::new(0, 12), "go @date fri", &STRICT, &memo, None);
        assert_eq!(a, b);
        assert_eq!(memo, AntiRetriggerMemo::new(Position::new(0, 0), Position::new(0, 3)));
    }

    #[test]
    fn query_start_clamps_oversized_query() {
        let ctx = TriggerContext {
            start: Position::new(0, 0),
            phrase_end: Position::new(0, 1),
            end: Position::new(0, 3),
            query: "much longer than three".to_string(),
            should_insert_spacer: false,
            first_space_blocked: false,
        };
        assert_eq!(ctx.query_start(), Position::new(0, 0));

        let ctx = parse("meet @date tom", 14, &STRICT).unwrap();
        assert_eq!(ctx.query_start(), Position::new(0, 11));
    }
}
