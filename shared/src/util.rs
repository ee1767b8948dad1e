use chrono::NaiveDate;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Calendar date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, returning the normalized text form.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a real calendar date (`2024-02-30` is rejected).
pub fn normalize_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

/// Lowercase a value and drop every non-alphanumeric character.
///
/// Used for CSV header matching, so `First Name`, `firstname` and
/// `FIRST_NAME` all compare equal.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
