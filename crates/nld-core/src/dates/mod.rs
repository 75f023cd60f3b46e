//! Date collaborator.
//!
//! The session never interprets query text itself; it asks a [`DateSource`].
//! [`BuiltinDates`] is a small reference implementation covering relative
//! phrases, ISO dates and fixed-date holidays.

mod builtin;
pub mod holidays;

pub use builtin::BuiltinDates;

use time::Date;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unsupported locale {0:?}")]
    UnknownLocale(String),
}

pub trait DateSource: Send {
    /// Resolve `text` to a calendar date, or `None` when it is not understood.
    fn parse_date(&self, text: &str) -> Option<Date>;

    /// Holiday names of the active locale, in calendar order.
    fn holiday_names(&self) -> Vec<String>;

    /// Switch locale. On error the previous locale stays active.
    fn set_locale(&mut self, code: &str) -> Result<(), DateError>;
}
