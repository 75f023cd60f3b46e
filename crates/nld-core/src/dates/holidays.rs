//! Fixed-date holiday tables.

use time::{Date, Month};

#[derive(Debug, Clone, Copy)]
pub struct Holiday {
    pub name: &'static str,
    pub month: Month,
    pub day: u8,
}

const fn h(name: &'static str, month: Month, day: u8) -> Holiday {
    Holiday { name, month, day }
}

const EN: &[Holiday] = &[
    h("New Year's Day", Month::January, 1),
    h("Valentine's Day", Month::February, 14),
    h("St. Patrick's Day", Month::March, 17),
    h("Independence Day", Month::July, 4),
    h("Halloween", Month::October, 31),
    h("Christmas Eve", Month::December, 24),
    h("Christmas", Month::December, 25),
    h("New Year's Eve", Month::December, 31),
];

const DE: &[Holiday] = &[
    h("Neujahr", Month::January, 1),
    h("Tag der Arbeit", Month::May, 1),
    h("Tag der Deutschen Einheit", Month::October, 3),
    h("Heiligabend", Month::December, 24),
    h("Weihnachten", Month::December, 25),
    h("Silvester", Month::December, 31),
];

const FR: &[Holiday] = &[
    h("Jour de l'an", Month::January, 1),
    h("Fête du Travail", Month::May, 1),
    h("Fête nationale", Month::July, 14),
    h("Toussaint", Month::November, 1),
    h("Armistice", Month::November, 11),
    h("Noël", Month::December, 25),
];

pub const LOCALES: &[&str] = &["en", "de", "fr"];

pub fn table(locale: &str) -> Option<&'static [Holiday]> {
    match locale {
        "en" => Some(EN),
        "de" => Some(DE),
        "fr" => Some(FR),
        _ => None,
    }
}

pub fn is_supported_locale(locale: &str) -> bool {
    table(locale).is_some()
}

/// Find a holiday by case-insensitive name.
pub fn lookup(locale: &str, name: &str) -> Option<Holiday> {
    let name = name.trim().to_lowercase();
    table(locale)?
        .iter()
        .find(|h| h.name.to_lowercase() == name)
        .copied()
}

/// The holiday on or after `today`.
pub fn next_occurrence(holiday: &Holiday, today: Date) -> Option<Date> {
    let this_year = Date::from_calendar_date(today.year(), holiday.month, holiday.day).ok()?;
    if this_year >= today {
        Some(this_year)
    } else {
        Date::from_calendar_date(today.year() + 1, holiday.month, holiday.day).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn every_locale_has_a_table() {
        for locale in LOCALES {
            assert!(table(locale).is_some_and(|t| !t.is_empty()));
        }
        assert!(!is_supported_locale("xx"));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("en", "christmas").unwrap().day, 25);
        assert_eq!(lookup("fr", "NOËL").unwrap().month, Month::December);
        assert!(lookup("de", "Christmas").is_none());
    }

    #[test]
    fn next_occurrence_rolls_over() {
        let halloween = lookup("en", "Halloween").unwrap();
        assert_eq!(
            next_occurrence(&halloween, date!(2026 - 10 - 17)),
            Some(date!(2026 - 10 - 31))
        );
        assert_eq!(
            next_occurrence(&halloween, date!(2026 - 11 - 01)),
            Some(date!(2027 - 10 - 31))
        );
        assert_eq!(
            next_occurrence(&halloween, date!(2026 - 10 - 31)),
            Some(date!(2026 - 10 - 31))
        );
    }
}
