//! Document positions.
//!
//! A `Position` addresses a character by line and column. Columns count
//! `char`s, so a position is stable regardless of how many bytes the
//! characters before it take.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    /// Same line, column moved by `delta` (saturating at column 0).
    pub fn offset_ch(self, delta: isize) -> Self {
        Self {
            line: self.line,
            ch: self.ch.saturating_add_signed(delta),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

/// Byte index of the `ch`-th character of `text`, or `None` past the end.
/// `ch == char count` maps to `text.len()`.
pub fn byte_index(text: &str, ch: usize) -> Option<usize> {
    if ch == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (i, _) in text.char_indices() {
        if count == ch {
            return Some(i);
        }
        count += 1;
    }
    (count == ch).then_some(text.len())
}

/// Number of `char`s in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
