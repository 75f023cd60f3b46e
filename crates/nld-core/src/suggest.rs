//! Suggestion candidates for a query.

const REFERENCE_TARGETS: &[&str] = &[
    "week",
    "month",
    "year",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const DEFAULTS: &[&str] = &["Today", "Yesterday", "Tomorrow"];

/// Candidate labels for `query`, filtered by case-insensitive prefix.
///
/// `next|last|this …` expands to that reference crossed with the
/// [`REFERENCE_TARGETS`]; a leading number expands to relative offsets;
/// anything else gets today/yesterday/tomorrow. Holidays are appended.
/// A bare number also matches the `in N …` forms.
pub fn suggestions(query: &str, holidays: &[String]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    let forward = format!("in {query}");
    let bare_number = !query.starts_with("in ") && leading_number(&query).is_some();

    let mut out: Vec<String> = if let Some(reference) = reference_word(&query) {
        REFERENCE_TARGETS
            .iter()
            .map(|target| format!("{reference} {target}"))
            .collect()
    } else if let Some(n) = leading_number(&query) {
        vec![
            format!("in {n} days"),
            format!("in {n} weeks"),
            format!("in {n} months"),
            format!("{n} days ago"),
            format!("{n} weeks ago"),
            format!("{n} months ago"),
        ]
    } else {
        DEFAULTS.iter().map(|s| s.to_string()).collect()
    };
    out.extend(holidays.iter().cloned());

    out.retain(|label| {
        let label = label.to_lowercase();
        label.starts_with(&query) || (bare_number && label.starts_with(&forward))
    });
    out
}

fn reference_word(query: &str) -> Option<&'static str> {
    let first = query.split_whitespace().next()?;
    ["next", "last", "this"]
        .into_iter()
        .find(|r| *r == first || (query == first && r.starts_with(first) && first.len() >= 2))
}

/// `3`, `+3`, `in 3` → `"3"` / `"+3"`.
fn leading_number(query: &str) -> Option<&str> {
    let rest = query.strip_prefix("in ").unwrap_or(query).trim_start();
    let end = rest
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-'))))
        .map_or(rest.len(), |(i, _)| i);
    let number = &rest[..end];
    number
        .chars()
        .any(|c| c.is_ascii_digit())
        .then_some(number)
}
