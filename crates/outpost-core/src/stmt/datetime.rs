use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Canonical date text, `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Canonical datetime text: ISO-8601 in UTC with the sub-second part
/// truncated to zero, e.g. `2020-01-01T10:00:00.000Z`.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

/// Parses a date. Accepts `YYYY-MM-DD` and anything [`parse_datetime`]
/// accepts, in which case the UTC calendar date is used.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(text).map(|datetime| datetime.date_naive()))
}

/// Parses a datetime, normalizing to UTC.
///
/// A string without a zone offset is read as UTC (a trailing `Z` is appended
/// before parsing), never as local time. A bare date is midnight UTC.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }

    if text.len() > 10 {
        let zoned = format!("{text}Z");
        if let Ok(datetime) = DateTime::parse_from_rfc3339(&zoned) {
            return Some(datetime.with_timezone(&Utc));
        }
        return None;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
