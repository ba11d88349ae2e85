//! Normalization of date-like values into [`Timestamp`].
//!
//! Goal records arrive with instants in several shapes: RFC 3339 strings,
//! bare calendar dates, epoch milliseconds, or backend timestamp objects
//! (`{ "seconds": .., "nanoseconds": .. }`). Everything is collapsed into a
//! single `Timestamp` here so nothing downstream has to care.
//!
//! Unreadable values become `None` rather than errors. A goal with a broken
//! date is a data-quality problem, not a reason to reject the whole snapshot.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Deserializer, de::IgnoredAny};

/// The shapes an instant may take on the wire.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Text(String),
    Millis(i64),
    Object {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds", alias = "nanos")]
        nanoseconds: i32,
    },
    Other(IgnoredAny),
}

/// Parse a textual instant: RFC 3339 first, then `YYYY-MM-DD` at midnight UTC.
pub fn parse_text(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(ts) = s.parse::<Timestamp>() {
        return Some(ts);
    }
    let date = s.parse::<Date>().ok()?;
    date.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

fn normalize(raw: RawInstant) -> Option<Timestamp> {
    match raw {
        RawInstant::Text(s) => parse_text(&s),
        RawInstant::Millis(ms) => Timestamp::from_millisecond(ms).ok(),
        RawInstant::Object {
            seconds,
            nanoseconds,
        } => Timestamp::new(seconds, nanoseconds).ok(),
        RawInstant::Other(_) => None,
    }
}

/// Lenient deserializer for `Option<Timestamp>` fields.
///
/// Use with `#[serde(default, deserialize_with = "instant::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawInstant>::deserialize(deserializer)?;
    Ok(raw.and_then(normalize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient")]
        at: Option<Timestamp>,
    }

    fn at(json: &str) -> Option<Timestamp> {
        serde_json::from_str::<Holder>(json).unwrap().at
    }

    fn jan(day: i8) -> Timestamp {
        jiff::civil::date(2024, 1, day)
            .to_zoned(TimeZone::UTC)
            .unwrap()
            .timestamp()
    }

    #[test]
    fn accepts_rfc3339() {
        assert_eq!(at(r#"{"at": "2024-01-05T00:00:00Z"}"#), Some(jan(5)));
    }

    #[test]
    fn accepts_calendar_date() {
        assert_eq!(at(r#"{"at": "2024-01-05"}"#), Some(jan(5)));
    }

    #[test]
    fn accepts_epoch_millis() {
        let ms = jan(5).as_millisecond();
        assert_eq!(at(&format!(r#"{{"at": {ms}}}"#)), Some(jan(5)));
    }

    #[test]
    fn accepts_backend_timestamp_objects() {
        let secs = jan(5).as_second();
        assert_eq!(
            at(&format!(r#"{{"at": {{"seconds": {secs}, "nanoseconds": 0}}}}"#)),
            Some(jan(5))
        );
        assert_eq!(
            at(&format!(r#"{{"at": {{"_seconds": {secs}, "_nanoseconds": 0}}}}"#)),
            Some(jan(5))
        );
    }

    #[test]
    fn missing_null_and_garbage_are_none() {
        assert_eq!(at("{}"), None);
        assert_eq!(at(r#"{"at": null}"#), None);
        assert_eq!(at(r#"{"at": "next tuesday"}"#), None);
        assert_eq!(at(r#"{"at": [1, 2]}"#), None);
    }
}
