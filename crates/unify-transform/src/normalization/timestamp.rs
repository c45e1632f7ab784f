//! Login timestamps: epoch seconds of local wall-clock time, converted to UTC.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::TransformError;
use crate::normalization::numeric::parse_integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampTransformer {
    timezone: Tz,
}

impl TimestampTransformer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// A wall-clock time skipped by a DST transition is a date error; a
    /// repeated one resolves to its earliest instant.
    pub fn transform(&self, raw: &str) -> Result<DateTime<Utc>, TransformError> {
        let seconds = parse_integer(raw)?;
        let wall_clock = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| TransformError::date("epoch seconds out of range"))?
            .naive_utc();
        let local = self
            .timezone
            .from_local_datetime(&wall_clock)
            .earliest()
            .ok_or_else(|| {
                TransformError::date(format!(
                    "local time {wall_clock} does not exist in {}",
                    self.timezone
                ))
            })?;
        Ok(local.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn local_time_is_shifted_to_utc() {
        let paris = TimestampTransformer::new(chrono_tz::Europe::Paris);
        // 2023-07-01 12:00 local
        let raw = utc(2023, 7, 1, 12, 0).timestamp().to_string();
        assert_eq!(paris.transform(&raw), Ok(utc(2023, 7, 1, 10, 0)));

        let new_york = TimestampTransformer::new(chrono_tz::America::New_York);
        let raw = utc(2023, 1, 15, 9, 30).timestamp().to_string();
        assert_eq!(new_york.transform(&raw), Ok(utc(2023, 1, 15, 14, 30)));
    }

    #[test]
    fn utc_is_identity() {
        let t = TimestampTransformer::new(chrono_tz::UTC);
        assert_eq!(t.transform("1672531200"), Ok(utc(2023, 1, 1, 0, 0)));
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        let london = TimestampTransformer::new(chrono_tz::Europe::London);
        // clocks jump from 01:00 to 02:00 on 2023-03-26
        let raw = utc(2023, 3, 26, 1, 30).timestamp().to_string();
        let err = london.transform(&raw).unwrap_err();
        assert_eq!(err.reason(), unify_model::ReasonCode::DateParseError);
    }

    #[test]
    fn repeated_local_time_takes_earliest() {
        let london = TimestampTransformer::new(chrono_tz::Europe::London);
        // 01:30 occurs twice on 2023-10-29; the first is BST (UTC+1)
        let raw = utc(2023, 10, 29, 1, 30).timestamp().to_string();
        assert_eq!(london.transform(&raw), Ok(utc(2023, 10, 29, 0, 30)));
    }

    #[test]
    fn non_numeric_is_numeric_error() {
        let t = TimestampTransformer::new(chrono_tz::UTC);
        assert_eq!(
            t.transform("yesterday").unwrap_err().reason(),
            unify_model::ReasonCode::NumericParseError
        );
    }
}
