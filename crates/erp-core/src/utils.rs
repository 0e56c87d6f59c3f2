//! Formatting and id helpers shared by list views, stat cards and charts

use crate::types::RecordId;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert `,` every three digits of a non-negative integer
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Format a plain number rounded to whole units with thousands separators
#[must_use]
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = value.round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let magnitude = rounded.abs() as u64;

    if rounded < 0.0 && magnitude > 0 {
        format!("-{}", group_thousands(magnitude))
    } else {
        group_thousands(magnitude)
    }
}

/// Format an amount as Korean won, e.g. `₩1,500,000`
///
/// Non-finite input renders as `₩0`.
#[must_use]
pub fn format_won(amount: f64) -> String {
    let number = format_number(amount);
    number
        .strip_prefix('-')
        .map_or_else(|| format!("₩{number}"), |rest| format!("-₩{rest}"))
}

/// Format a ratio in percent with one decimal, e.g. `0.425` → `42.5%`
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.1}%", ratio * 100.0)
    } else {
        "0.0%".to_string()
    }
}

/// Calendar date of a `YYYY-MM-DD[ HH:mm:ss]` string
///
/// Only the first ten characters are considered. Returns `None` when they do
/// not form a valid date.
#[must_use]
pub fn calendar_date(value: &str) -> Option<NaiveDate> {
    let prefix = value.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` or `YYYY-MM-DD HH:mm:ss` timestamp
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Render a date string in Korean short form, e.g. `2024. 1. 15.`
///
/// Strings that are not dates are returned unchanged.
#[must_use]
pub fn format_date_ko(value: &str) -> String {
    calendar_date(value).map_or_else(
        || value.to_string(),
        |date| format!("{}. {}. {}.", date.year(), date.month(), date.day()),
    )
}

/// Render a timestamp in Korean short form with time, e.g. `2024. 1. 15. 09:30`
///
/// Date-only input renders without time; anything else is returned unchanged.
#[must_use]
pub fn format_datetime_ko(value: &str) -> String {
    match NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT) {
        Ok(timestamp) => format!(
            "{} {}",
            format_date_ko(value),
            timestamp.format("%H:%M")
        ),
        Err(_) => format_date_ko(value),
    }
}

/// Next id for a list: one more than the largest existing id, or 1
pub fn next_id<I>(ids: I) -> RecordId
where
    I: IntoIterator<Item = RecordId>,
{
    ids.into_iter().max().map_or(1, |max| max.saturating_add(1))
}
