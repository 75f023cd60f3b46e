use time::{Date, Duration, Month, OffsetDateTime, Weekday};
use tracing::debug;

use super::holidays;
use super::{DateError, DateSource};

/// Reference date collaborator.
///
/// "Today" is the local date unless pinned with [`BuiltinDates::with_today`].
#[derive(Debug, Clone)]
pub struct BuiltinDates {
    locale: String,
    today: Option<Date>,
}

impl BuiltinDates {
    pub fn new(locale: &str) -> Result<Self, DateError> {
        if !holidays::is_supported_locale(locale) {
            return Err(DateError::UnknownLocale(locale.to_string()));
        }
        Ok(Self {
            locale: locale.to_string(),
            today: None,
        })
    }

    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn today(&self) -> Date {
        self.today.unwrap_or_else(|| {
            OffsetDateTime::now_local()
                .unwrap_or_else(|_| OffsetDateTime::now_utc())
                .date()
        })
    }
}

impl DateSource for BuiltinDates {
    fn parse_date(&self, text: &str) -> Option<Date> {
        let today = self.today();
        if let Some(holiday) = holidays::lookup(&self.locale, text) {
            return holidays::next_occurrence(&holiday, today);
        }
        parse_phrase(text, today)
    }

    fn holiday_names(&self) -> Vec<String> {
        holidays::table(&self.locale)
            .unwrap_or_default()
            .iter()
            .map(|h| h.name.to_string())
            .collect()
    }

    fn set_locale(&mut self, code: &str) -> Result<(), DateError> {
        if !holidays::is_supported_locale(code) {
            return Err(DateError::UnknownLocale(code.to_string()));
        }
        debug!(from = %self.locale, to = code, "date locale changed");
        self.locale = code.to_string();
        Ok(())
    }
}

/// Larger offsets overflow `Duration` long before they mean anything.
const MAX_SHIFT: u64 = 100_000;

#[derive(Debug, Clone, Copy)]
enum Unit {
    Day,
    Week,
    Month,
    Year,
}

fn parse_unit(word: &str) -> Option<Unit> {
    match word {
        "day" | "days" => Some(Unit::Day),
        "week" | "weeks" => Some(Unit::Week),
        "month" | "months" => Some(Unit::Month),
        "year" | "years" => Some(Unit::Year),
        _ => None,
    }
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    let day = match word {
        "monday" => Weekday::Monday,
        "tuesday" => Weekday::Tuesday,
        "wednesday" => Weekday::Wednesday,
        "thursday" => Weekday::Thursday,
        "friday" => Weekday::Friday,
        "saturday" => Weekday::Saturday,
        "sunday" => Weekday::Sunday,
        _ => return None,
    };
    Some(day)
}

fn parse_phrase(text: &str, today: Date) -> Option<Date> {
    let lowered = text.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    match words.as_slice() {
        ["today"] | ["now"] => Some(today),
        ["tomorrow"] => today.next_day(),
        ["yesterday"] => today.previous_day(),
        [reference @ ("next" | "last" | "this"), what] => {
            let sign = match *reference {
                "next" => 1,
                "last" => -1,
                _ => 0,
            };
            if let Some(unit) = parse_unit(what) {
                return shift(today, unit, sign);
            }
            let weekday = parse_weekday(what)?;
            match sign {
                1 => step_to(today, weekday, 1, false),
                -1 => step_to(today, weekday, -1, false),
                _ => step_to(today, weekday, 1, true),
            }
        }
        ["in", n, unit] => shift(today, parse_unit(unit)?, n.parse().ok()?),
        [n, unit, "ago"] => {
            let n = n.parse::<i64>().ok()?.checked_neg()?;
            shift(today, parse_unit(unit)?, n)
        }
        [single] => single
            .parse::<i64>()
            .ok()
            .and_then(|n| shift(today, Unit::Day, n))
            .or_else(|| parse_iso(single)),
        _ => None,
    }
}

fn shift(today: Date, unit: Unit, n: i64) -> Option<Date> {
    if n.unsigned_abs() > MAX_SHIFT {
        return None;
    }
    match unit {
        Unit::Day => today.checked_add(Duration::days(n)),
        Unit::Week => today.checked_add(Duration::weeks(n)),
        Unit::Month => add_months(today, n),
        Unit::Year => add_months(today, n.checked_mul(12)?),
    }
}

/// Calendar month arithmetic, clamping the day to the target month's length.
fn add_months(date: Date, n: i64) -> Option<Date> {
    let index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1 + n;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}

/// Walk day by day in `direction` until `weekday`; `inclusive` accepts `from`.
fn step_to(from: Date, weekday: Weekday, direction: i64, inclusive: bool) -> Option<Date> {
    if inclusive && from.weekday() == weekday {
        return Some(from);
    }
    (1..=7)
        .filter_map(|n| from.checked_add(Duration::days(n * direction)))
        .find(|d| d.weekday() == weekday)
}

fn parse_iso(word: &str) -> Option<Date> {
    let mut parts = word.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}
