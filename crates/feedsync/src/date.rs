use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::error::DateParseError;

const ITALIAN_MONTHS: [(&str, &str); 12] = [
    ("gen", "Jan"),
    ("feb", "Feb"),
    ("mar", "Mar"),
    ("apr", "Apr"),
    ("mag", "May"),
    ("giu", "Jun"),
    ("lug", "Jul"),
    ("ago", "Aug"),
    ("set", "Sep"),
    ("ott", "Oct"),
    ("nov", "Nov"),
    ("dic", "Dec"),
];

const DATETIME_LAYOUTS: [&str; 7] = [
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_LAYOUTS: [&str; 4] = ["%d %b %Y", "%b %d %Y", "%Y-%m-%d", "%d/%m/%Y"];

/// A standalone run of exactly three ASCII letters.
static MONTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[[:alpha:]]{3}\b").expect("month token pattern is valid"));

/// Translates the first three-letter token when it is an Italian month.
fn translate_month(input: &str) -> String {
    let Some(token) = MONTH_TOKEN.find(input) else {
        return input.to_string();
    };
    let lowered = token.as_str().to_ascii_lowercase();
    match ITALIAN_MONTHS.iter().find(|(it, _)| *it == lowered) {
        Some((_, en)) => format!("{}{}{}", &input[..token.start()], en, &input[token.end()..]),
        None => input.to_string(),
    }
}

fn collapse(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_general(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(d.to_utc());
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(d.to_utc());
    }

    let collapsed = collapse(trimmed);
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(&collapsed, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS.iter().find_map(|layout| {
                NaiveDate::parse_from_str(&collapsed, layout)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        })
        .map(|naive| naive.and_utc())
}

/// Parses a date string that may carry an Italian month abbreviation
/// (`"31 gen 2026 14:00"`). Zone-less values are taken as UTC.
pub fn parse_italian_date(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    parse_general(&translate_month(input)).ok_or_else(|| DateParseError {
        input: input.to_string(),
    })
}
