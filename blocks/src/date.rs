use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const INVALID_DATE: &str = "Invalid date";

const DISPLAY_FORMAT: &str = "%A, %B %-d, %Y";

/// `2024-05-01T10:00:00.000Z` -> `Wednesday, May 1, 2024` (UTC).
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match parsed {
        Ok(date) => date.format(DISPLAY_FORMAT).to_string(),
        Err(err) => {
            tracing::debug!(date = raw, error = %err, "unparsable date");
            INVALID_DATE.to_string()
        }
    }
}
