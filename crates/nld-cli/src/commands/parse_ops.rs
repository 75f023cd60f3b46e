use std::process;

use serde::Serialize;

use nld_core::dates::{BuiltinDates, DateSource};
use nld_core::position::char_len;
use nld_core::settings::settings;
use nld_core::{parse_trigger, AntiRetriggerMemo, Position, TriggerContext, TriggerRule};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Serialize)]
struct ParseReport<'a> {
    line: &'a str,
    cursor: usize,
    phrase: &'a str,
    strict: bool,
    context: Option<TriggerContext>,
}

/// Run trigger recognition once on `line`. `cursor` defaults to end of line.
pub fn parse(line: &str, cursor: Option<usize>, phrase: Option<&str>, trigger_happy: bool, json: bool) {
    let s = settings();
    let phrase = phrase.unwrap_or(&s.trigger.phrase);
    let strict = !(trigger_happy || s.trigger.trigger_happy);
    let cursor = cursor.unwrap_or_else(|| char_len(line));
    if cursor > char_len(line) {
        eprintln!("Error: cursor {cursor} is past the end of the line");
        process::exit(1);
    }

    let rule = TriggerRule { phrase, strict };
    let ctx = parse_trigger(
        Position::new(0, cursor),
        line,
        &rule,
        &AntiRetriggerMemo::default(),
        None,
    );

    if json {
        let report = ParseReport {
            line,
            cursor,
            phrase,
            strict,
            context: ctx,
        };
        println!("{}", die!(serde_json::to_string_pretty(&report), "Error: {}"));
        return;
    }

    match ctx {
        None => println!("no trigger"),
        Some(ctx) => {
            println!("start:   {}", ctx.start);
            println!("phrase:  {}..{}", ctx.start, ctx.phrase_end);
            println!("end:     {}", ctx.end);
            println!("query:   {:?}", ctx.query);
            if ctx.should_insert_spacer {
                println!("spacer:  would be inserted at {}", ctx.phrase_end);
            }
        }
    }
}

/// Print the suggestion list for `query` with the date each label resolves to.
pub fn suggest(query: &str, locale: Option<&str>) {
    let locale = locale.unwrap_or(&settings().dates.locale);
    let dates = die!(BuiltinDates::new(locale), "Error: {}");
    let items = nld_core::suggest::suggestions(query, &dates.holiday_names());
    if items.is_empty() {
        println!("no suggestions");
        return;
    }
    let width = items.iter().map(|s| char_len(s)).max().unwrap_or(0);
    for label in &items {
        match dates.parse_date(label) {
            Some(date) => println!("{label:<width$}  {date}"),
            None => println!("{label:<width$}  -"),
        }
    }
}
