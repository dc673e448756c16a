//! Value helpers shared by filters and the validator.
//!
//! Numbers tolerate surrounding whitespace and thousands separators. Dates are
//! parsed tolerantly: ISO and slash forms first, then a token pass that
//! understands month names, ordinals and two-digit years.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::column::Column;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a numeric cell, ignoring surrounding whitespace and `,` separators.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|ch| *ch != ',').collect();
    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn is_number(value: &str) -> bool {
    parse_number(value).is_some()
}

/// Render an aggregate; whole numbers keep a trailing `.0`.
pub fn format_number(value: f64) -> String {
    let rendered = value.to_string();
    if rendered.contains(['.', 'e', 'E']) || !value.is_finite() {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalise_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalised, case-folded form used for comparisons and keys.
pub fn normalise_string(value: &str) -> String {
    normalise_whitespace(value).to_lowercase()
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "t" | "y" | "1"
    )
}

pub fn is_falsy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "no" | "f" | "n" | "0"
    )
}

/// True for values that read as a yes/no flag.
pub fn is_boolean(value: &str) -> bool {
    is_truthy(value) || is_falsy(value)
}

/// True for columns that hold dates: `#date` or any tag ending in `_date`.
pub fn is_date_column(column: &Column) -> bool {
    column
        .tag
        .as_deref()
        .is_some_and(|tag| tag == "#date" || tag.ends_with("_date"))
}

/// True for columns that hold numbers: tags ending in `_num` or carrying `+num`.
pub fn is_number_column(column: &Column) -> bool {
    column.has_attribute("num") || column.tag.as_deref().is_some_and(|tag| tag.ends_with("_num"))
}

/// Render a date as `YYYY-MM-DD`, or `None` if it cannot be parsed.
pub fn normalise_date(value: &str) -> Option<String> {
    parse_date(value).map(|date| date.format("%Y-%m-%d").to_string())
}

pub fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

/// Parse a full calendar date in any of the common phrasings.
///
/// Partial dates (a year alone, a month and year) are rejected.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bytes = trimmed.as_bytes();
    let year_first =
        bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && !bytes[4].is_ascii_digit();
    if year_first {
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Some(date);
            }
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(stamp.date_naive());
        }
        for format in DATETIME_FORMATS {
            if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Some(stamp.date());
            }
        }
    }
    parse_date_tokens(&trimmed.to_lowercase())
}

#[derive(Debug, Clone, Copy)]
struct NumberToken {
    value: u32,
    digits: usize,
}

fn parse_date_tokens(value: &str) -> Option<NaiveDate> {
    let mut numbers: Vec<NumberToken> = Vec::new();
    let mut month_name: Option<u32> = None;

    for word in value.split(|ch: char| !ch.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let digit_end = word
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_digit())
            .map_or(word.len(), |(idx, _)| idx);
        let (digits, letters) = word.split_at(digit_end);
        if !digits.is_empty() {
            if !(letters.is_empty() || ORDINAL_SUFFIXES.contains(&letters)) {
                return None;
            }
            numbers.push(NumberToken {
                value: digits.parse().ok()?,
                digits: digits.len(),
            });
            continue;
        }
        if let Some(month) = lookup_name(&MONTHS, letters) {
            if month_name.replace(month as u32 + 1).is_some() {
                return None;
            }
        } else if lookup_name(&WEEKDAYS, letters).is_none() && letters != "of" {
            return None;
        }
    }

    let (year, month, day) = match (month_name, numbers.as_slice()) {
        (Some(month), [first, second]) => {
            if first.digits == 4 || first.value > 31 {
                (expand_year(*first), month, second.value)
            } else {
                (expand_year(*second), month, first.value)
            }
        }
        (None, [first, second, third]) => {
            if first.digits == 4 {
                (expand_year(*first), second.value, third.value)
            } else if first.value > 12 {
                (expand_year(*third), second.value, first.value)
            } else {
                (expand_year(*third), first.value, second.value)
            }
        }
        (None, [only]) if only.digits == 8 => {
            let year = only.value / 10_000;
            let month = (only.value / 100) % 100;
            let day = only.value % 100;
            (i32::try_from(year).ok()?, month, day)
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn lookup_name(names: &[&str], word: &str) -> Option<usize> {
    if word.len() < 3 {
        return None;
    }
    names.iter().position(|name| name.starts_with(word))
}

fn expand_year(token: NumberToken) -> i32 {
    let value = i32::try_from(token.value).unwrap_or(i32::MAX);
    if token.digits <= 2 {
        if value < 69 { 2000 + value } else { 1900 + value }
    } else {
        value
    }
}
