// src/utils/time.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Timestamp as shown next to posts and comments.
pub fn display_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%-m/%-d/%Y, %-I:%M:%S %p UTC").to_string(),
        None => String::new(),
    }
}

/// Reads a stored timestamp. Values with an offset are converted to UTC;
/// values without one (a `timestamp` column) are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Serde adapter for `created_at` columns. Unreadable values are logged and
/// read as missing instead of failing the whole row.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            tracing::warn!("Ignoring unreadable timestamp: {}", raw);
        }
        parsed
    }))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_like_a_locale_string() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 15, 4, 5).unwrap();
        assert_eq!(display_timestamp(Some(at)), "3/7/2025, 3:04:05 PM UTC");
        assert_eq!(display_timestamp(None), "");
    }

    #[test]
    fn offset_and_naive_timestamps_both_parse() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 7, 15, 4, 5).unwrap();

        let with_offset = parse_timestamp("2025-03-07T15:04:05.123456+00:00").unwrap();
        assert_eq!(with_offset.timestamp(), expected.timestamp());

        let shifted = parse_timestamp("2025-03-07T17:04:05+02:00").unwrap();
        assert_eq!(shifted, expected);

        let naive = parse_timestamp("2025-03-07T15:04:05.123456").unwrap();
        assert_eq!(naive.timestamp(), expected.timestamp());
        assert_eq!(naive.timestamp_subsec_micros(), 123456);

        assert_eq!(parse_timestamp("2025-03-07 15:04:05"), Some(expected));
    }

    #[test]
    fn garbage_is_not_a_timestamp() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
