use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static MONTH_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTHS})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b"
    ))
    .unwrap()
});
static DAY_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS})\.?(?:,?\s+\d{{4}})?\b"
    ))
    .unwrap()
});
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap());
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

/// First date-like substring in free text: month-name forms first, then
/// day-first forms, then numeric separators. No calendar validation.
pub fn find(text: &str) -> Option<String> {
    MONTH_FIRST_RE
        .find(text)
        .or_else(|| DAY_FIRST_RE.find(text))
        .or_else(|| NUMERIC_RE.find(text))
        .map(|m| m.as_str().to_string())
}

/// Normalize to ISO `YYYY-MM-DD` when the string parses under a common
/// format; otherwise keep the trimmed input as-is.
pub fn clean(raw: &str) -> String {
    let s = raw.trim();
    normalize(s).unwrap_or_else(|| s.to_string())
}

fn normalize(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive().to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date().to_string());
        }
    }

    let stripped = ORDINAL_RE.replace_all(s, "$1");
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%B %d, %Y",
        "%B %d %Y",
        "%b %d, %Y",
        "%b %d %Y",
        "%d %B %Y",
        "%d %b %Y",
        "%A, %B %d, %Y",
        "%a, %B %d, %Y",
        "%a, %b %d, %Y",
        "%m/%d/%Y",
        "%m/%d/%y",
    ];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(stripped.as_ref(), fmt) {
            return Some(d.to_string());
        }
    }
    None
}
