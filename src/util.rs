//! Shared helpers: phone formatting, comma-decimal numbers, DD-MM-YYYY dates.

use chrono::NaiveDate;

/// Country prefixes the phone formatter knows how to group. Luxembourg is the
/// only one with strict validation; the rest get best-effort spacing.
const KNOWN_PREFIXES: [&str; 4] = ["+352", "+33", "+49", "+32"];

/// Strip spaces and dashes, keeping a leading `+` and digits.
fn strip_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Group a digit run into blocks of three separated by spaces.
fn group_digits(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format a phone number according to its country prefix.
///
/// `+352` numbers are grouped `+352 xxx xxx xxx`; other known prefixes get the
/// same best-effort grouping without validation; anything else is passed
/// through trimmed.
pub fn format_phone(raw: &str) -> String {
    let stripped = strip_phone(raw);
    for prefix in KNOWN_PREFIXES {
        if let Some(rest) = stripped.strip_prefix(prefix) {
            if rest.is_empty() {
                return prefix.to_string();
            }
            return format!("{prefix} {}", group_digits(rest));
        }
    }
    raw.trim().to_string()
}

/// Strict Luxembourg rule: `+352` followed by exactly 9 digits.
pub fn is_valid_lux_phone(raw: &str) -> bool {
    let stripped = strip_phone(raw);
    match stripped.strip_prefix("+352") {
        Some(rest) => rest.len() == 9 && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Parse a numeric input that may use a comma as the decimal separator.
/// Unparseable input is 0, matching the original's forgiving numeric fields.
pub fn parse_comma_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Keep only digits, commas, dots and a minus sign (numeric input guard).
pub fn sanitize_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect()
}

/// Round to two decimal places, the display precision for every average.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a date as DD-MM-YYYY, the display convention across all pages.
pub fn to_ddmmyyyy(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn from_ddmmyyyy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d-%m-%Y").ok()
}
