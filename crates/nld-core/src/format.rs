//! Final insertion text for a confirmed suggestion.
//!
//! The held modifiers pick an [`OutputStyle`] through [`output_style`], a
//! total match over every [`ModifierCombo`].

use time::Date;

use crate::keymap::Modifiers;
use crate::settings::OutputSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierCombo {
    Plain,
    Shift,
    Mod,
    Alt,
    ShiftMod,
    ShiftAlt,
    ModAlt,
    ShiftModAlt,
}

impl From<Modifiers> for ModifierCombo {
    fn from(m: Modifiers) -> Self {
        match (m.shift, m.primary(), m.alt) {
            (false, false, false) => Self::Plain,
            (true, false, false) => Self::Shift,
            (false, true, false) => Self::Mod,
            (false, false, true) => Self::Alt,
            (true, true, false) => Self::ShiftMod,
            (true, false, true) => Self::ShiftAlt,
            (false, true, true) => Self::ModAlt,
            (true, true, true) => Self::ShiftModAlt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `[[2026-10-18]]`
    Link,
    /// `[[2026-10-18|tomorrow]]`
    AliasedLink,
    /// `2026-10-18`
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    Primary,
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    pub mode: OutputMode,
    pub style: DateStyle,
}

/// Shift flips link/plain, Mod asks for an aliased link, Alt picks the
/// alternate format.
pub fn output_style(combo: ModifierCombo, plain_text_by_default: bool) -> OutputStyle {
    use DateStyle::{Alternate, Primary};

    let (default, flipped) = if plain_text_by_default {
        (OutputMode::PlainText, OutputMode::Link)
    } else {
        (OutputMode::Link, OutputMode::PlainText)
    };
    let (mode, style) = match combo {
        ModifierCombo::Plain => (default, Primary),
        ModifierCombo::Shift => (flipped, Primary),
        ModifierCombo::Mod => (OutputMode::AliasedLink, Primary),
        ModifierCombo::Alt => (default, Alternate),
        ModifierCombo::ShiftAlt => (flipped, Alternate),
        ModifierCombo::ModAlt => (OutputMode::AliasedLink, Alternate),
        // Alias wins over the link/plain toggle.
        ModifierCombo::ShiftMod => (OutputMode::AliasedLink, Primary),
        ModifierCombo::ShiftModAlt => (OutputMode::AliasedLink, Alternate),
    };
    OutputStyle { mode, style }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid format description {format:?}: {reason}")]
    Description { format: String, reason: String },
    #[error("cannot format date: {0}")]
    Render(String),
}

/// Render `date` with a `time` format description such as `[year]-[month]-[day]`.
pub fn format_date(date: Date, format: &str) -> Result<String, FormatError> {
    let items =
        time::format_description::parse(format).map_err(|e| FormatError::Description {
            format: format.to_string(),
            reason: e.to_string(),
        })?;
    date.format(&items)
        .map_err(|e| FormatError::Render(e.to_string()))
}

/// Text that replaces the trigger and query.
pub fn format_selection(
    date: Date,
    label: &str,
    style: OutputStyle,
    output: &OutputSettings,
) -> Result<String, FormatError> {
    let format = match style.style {
        DateStyle::Primary => &output.format,
        DateStyle::Alternate => &output.alt_format,
    };
    let rendered = format_date(date, format)?;
    Ok(match style.mode {
        OutputMode::Link => format!("[[{rendered}]]"),
        OutputMode::AliasedLink => format!("[[{rendered}|{label}]]"),
        OutputMode::PlainText => rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn output() -> OutputSettings {
        OutputSettings {
            plain_text_by_default: false,
            format: "[year]-[month]-[day]".to_string(),
            alt_format: "[weekday], [month repr:long] [day], [year]".to_string(),
            daily_note_format: "[year]-[month]-[day]".to_string(),
        }
    }

    #[test]
    fn combos_cover_every_modifier_set() {
        let mut seen = std::collections::HashSet::new();
        for bits in 0u8..8 {
            let m = Modifiers {
                shift: bits & 1 != 0,
                control: bits & 2 != 0,
                alt: bits & 4 != 0,
                meta: false,
            };
            seen.insert(ModifierCombo::from(m));
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn meta_counts_as_mod() {
        let m = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ModifierCombo::from(m), ModifierCombo::Mod);
    }

    #[test]
    fn shift_flips_default_mode() {
        assert_eq!(output_style(ModifierCombo::Plain, false).mode, OutputMode::Link);
        assert_eq!(output_style(ModifierCombo::Shift, false).mode, OutputMode::PlainText);
        assert_eq!(output_style(ModifierCombo::Plain, true).mode, OutputMode::PlainText);
        assert_eq!(output_style(ModifierCombo::Shift, true).mode, OutputMode::Link);
    }

    #[test]
    fn mod_aliases_and_alt_switches_format() {
        let s = output_style(ModifierCombo::ModAlt, true);
        assert_eq!(s.mode, OutputMode::AliasedLink);
        assert_eq!(s.style, DateStyle::Alternate);
        assert_eq!(output_style(ModifierCombo::Alt, false).style, DateStyle::Alternate);
    }

    #[test]
    fn selection_text_per_mode() {
        let d = date!(2026 - 10 - 18);
        let out = output();
        let link = output_style(ModifierCombo::Plain, false);
        assert_eq!(format_selection(d, "Tomorrow", link, &out).unwrap(), "[[2026-10-18]]");

        let alias = output_style(ModifierCombo::Mod, false);
        assert_eq!(
            format_selection(d, "Tomorrow", alias, &out).unwrap(),
            "[[2026-10-18|Tomorrow]]"
        );

        let alt_plain = output_style(ModifierCombo::ShiftAlt, false);
        assert_eq!(
            format_selection(d, "Tomorrow", alt_plain, &out).unwrap(),
            "Sunday, October 18, 2026"
        );
    }

    #[test]
    fn bad_format_is_reported() {
        let err = format_date(date!(2026 - 1 - 1), "[yeer]").unwrap_err();
        assert!(matches!(err, FormatError::Description { .. }));

        let err = format_date(date!(2026 - 1 - 1), "[hour]").unwrap_err();
        assert!(matches!(err, FormatError::Render(_)));
    }
}
