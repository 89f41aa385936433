//! Date/timestamp redaction
//!
//! Parses a date, replaces selected components and returns either an ISO 8601
//! string or a unix timestamp (seconds).

use super::{value_kind, Alteration};
use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Earliest year representable as a non-negative unix timestamp
const UNIX_EPOCH_YEAR: i32 = 1970;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d %B %Y", "%B %d, %Y"];

/// Replaces parts of a date for anonymization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRedaction {
    /// Return seconds since the epoch instead of an ISO 8601 string
    pub unix_timestamp: bool,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Replace unparseable dates with `safe_parse_overwrite`
    pub safe_parse: bool,
    pub safe_parse_overwrite: String,
}

impl Default for DateRedaction {
    fn default() -> Self {
        Self {
            unix_timestamp: false,
            year: None,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            safe_parse: true,
            safe_parse_overwrite: "#ANONYMIZED_COULD_NOT_PARSE".to_string(),
        }
    }
}

/// Parsed input, keeping the offset when the source carried one
#[derive(Debug, Clone, Copy, PartialEq)]
struct ParsedDate {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

/// Output of a successful redaction
#[derive(Debug, Clone, PartialEq)]
pub enum RedactedDate {
    Iso(String),
    Unix(i64),
}

impl DateRedaction {
    /// Redact a date string
    ///
    /// Returns `None` when the input cannot be parsed or the replaced
    /// components don't form a valid date.
    pub fn redact(&self, input: &str) -> Option<RedactedDate> {
        let parsed = parse_date(input)?;
        let year = self.effective_year(parsed.local.year());

        let date = NaiveDate::from_ymd_opt(
            year,
            self.month.unwrap_or(parsed.local.month()),
            self.day.unwrap_or(parsed.local.day()),
        )?;
        let local = date.and_hms_nano_opt(
            self.hour.unwrap_or(parsed.local.hour()),
            self.minute.unwrap_or(parsed.local.minute()),
            self.second.unwrap_or(parsed.local.second()),
            parsed.local.nanosecond(),
        )?;

        let out = match parsed.offset {
            Some(offset) => {
                let dt = offset.from_local_datetime(&local).single()?;
                if self.unix_timestamp {
                    RedactedDate::Unix(dt.timestamp())
                } else {
                    RedactedDate::Iso(dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string())
                }
            }
            None => {
                if self.unix_timestamp {
                    RedactedDate::Unix(Utc.from_utc_datetime(&local).timestamp())
                } else {
                    RedactedDate::Iso(local.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
                }
            }
        };
        Some(out)
    }

    /// Replacement year, falling back to a random one when a pre-epoch year
    /// is requested for a unix timestamp
    fn effective_year(&self, parsed_year: i32) -> i32 {
        match self.year {
            Some(year) if self.unix_timestamp && year < UNIX_EPOCH_YEAR => {
                let current = Utc::now().year();
                let random = rand::thread_rng().gen_range(UNIX_EPOCH_YEAR..=current);
                tracing::warn!(
                    requested_year = year,
                    chosen_year = random,
                    "Year before 1970 can't be a unix timestamp, using a random year instead"
                );
                random
            }
            Some(year) => year,
            None => parsed_year,
        }
    }

    fn unparseable(&self, original: &Value) -> Value {
        if self.safe_parse {
            tracing::warn!(
                overwrite = %self.safe_parse_overwrite,
                "Date could not be parsed, returning the overwrite value"
            );
            Value::String(self.safe_parse_overwrite.clone())
        } else {
            tracing::warn!("Date could not be parsed, returning the original value");
            original.clone()
        }
    }
}

impl Alteration for DateRedaction {
    fn alter(&self, value: &Value) -> Value {
        let input = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                tracing::debug!(kind = value_kind(other), "Date redaction got a non-date value");
                return self.unparseable(other);
            }
        };

        match self.redact(&input) {
            Some(RedactedDate::Iso(s)) => Value::String(s),
            Some(RedactedDate::Unix(ts)) => Value::from(ts),
            None => self.unparseable(value),
        }
    }
}

fn parse_date(input: &str) -> Option<ParsedDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(secs) = input.parse::<f64>() {
        if !secs.is_finite() {
            return None;
        }
        let dt = DateTime::from_timestamp(secs.trunc() as i64, 0)?;
        return Some(ParsedDate {
            local: dt.naive_utc(),
            offset: None,
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(ParsedDate {
            local: dt.naive_local(),
            offset: Some(*dt.offset()),
        });
    }

    for format in DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ParsedDate {
                local,
                offset: None,
            });
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(ParsedDate {
                local: date.and_hms_opt(0, 0, 0)?,
                offset: None,
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("2013-07-21T14:05:09" ; "iso")]
    #[test_case("2013-07-21 14:05:09" ; "space separated")]
    #[test_case("21.07.2013 14:05:09" ; "german")]
    fn test_parse_datetime_formats(input: &str) {
        let parsed = parse_date(input).unwrap();
        assert_eq!(parsed.local.year(), 2013);
        assert_eq!(parsed.local.month(), 7);
        assert_eq!(parsed.local.day(), 21);
        assert_eq!(parsed.local.hour(), 14);
        assert_eq!(parsed.local.second(), 9);
    }

    #[test_case("2013-07-21" ; "iso date")]
    #[test_case("21 July 2013" ; "day month year")]
    #[test_case("July 21, 2013" ; "month day year")]
    #[test_case("21/07/2013" ; "slashes")]
    fn test_parse_date_formats(input: &str) {
        let parsed = parse_date(input).unwrap();
        assert_eq!(
            parsed.local.date(),
            NaiveDate::from_ymd_opt(2013, 7, 21).unwrap()
        );
    }

    #[test]
    fn test_replace_day_and_month() {
        let redaction = DateRedaction {
            month: Some(1),
            day: Some(1),
            ..Default::default()
        };
        assert_eq!(
            redaction.redact("1985-06-15"),
            Some(RedactedDate::Iso("1985-01-01T00:00:00".to_string()))
        );
    }

    #[test]
    fn test_offset_is_kept() {
        let redaction = DateRedaction {
            hour: Some(0),
            ..Default::default()
        };
        assert_eq!(
            redaction.redact("2020-02-03T10:11:12+02:00"),
            Some(RedactedDate::Iso("2020-02-03T00:11:12+02:00".to_string()))
        );
    }

    #[test]
    fn test_unix_output() {
        let redaction = DateRedaction {
            unix_timestamp: true,
            ..Default::default()
        };
        assert_eq!(
            redaction.redact("2020-01-01T00:00:00"),
            Some(RedactedDate::Unix(1_577_836_800))
        );
    }

    #[test]
    fn test_numeric_input_is_a_timestamp() {
        let redaction = DateRedaction {
            day: Some(2),
            ..Default::default()
        };
        assert_eq!(
            redaction.alter(&json!(1_577_836_800_i64)),
            json!("2020-01-02T00:00:00")
        );
    }

    #[test]
    fn test_pre_epoch_year_with_unix_output_is_randomized() {
        let redaction = DateRedaction {
            unix_timestamp: true,
            year: Some(1900),
            ..Default::default()
        };
        match redaction.redact("2000-01-01") {
            Some(RedactedDate::Unix(ts)) => assert!(ts >= 0),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_replacement_is_unparseable() {
        let redaction = DateRedaction {
            month: Some(2),
            day: Some(30),
            ..Default::default()
        };
        assert_eq!(redaction.redact("2021-01-15"), None);
        assert_eq!(
            redaction.alter(&json!("2021-01-15")),
            json!("#ANONYMIZED_COULD_NOT_PARSE")
        );
    }

    #[test]
    fn test_unparseable_without_safe_mode_returns_original() {
        let redaction = DateRedaction {
            safe_parse: false,
            ..Default::default()
        };
        assert_eq!(redaction.alter(&json!("not a date")), json!("not a date"));
    }

    #[test]
    fn test_unparseable_with_safe_mode_is_overwritten() {
        let redaction = DateRedaction::default();
        assert_eq!(
            redaction.alter(&json!("yesterday-ish")),
            json!("#ANONYMIZED_COULD_NOT_PARSE")
        );
    }
}
