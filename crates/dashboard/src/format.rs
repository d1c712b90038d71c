//! Number and time formatting for the text views.

use chrono::{Local, TimeZone};

/// Formats `value` with en-US thousands separators and at most three
/// fraction digits, e.g. `1234567.891` → `1,234,567.891`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && (int_part != "0" || !frac_part.is_empty());
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Formats a number the way it would print in a browser: integral values
/// without a fraction, everything else in shortest form.
pub fn plain_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Local date-time for a Unix timestamp in seconds.
pub fn format_timestamp(seconds: f64) -> String {
    let millis = (seconds * 1000.0) as i64;
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// First `len` characters of `text`.
pub fn truncate(text: &str, len: usize) -> &str {
    match text.char_indices().nth(len) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
