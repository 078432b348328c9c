//! SQLite column conversions for `Date`.
//!
//! # Responsibility
//! - Read any timestamp-like SQLite value into a date.
//! - Write dates as offset-qualified midnight timestamps.
//!
//! # Invariants
//! - NULL scans to the zero value.
//! - Written text round-trips through `scan` to an equal date.

use super::{truncate_to_day, Date, DateError, DateResult};
use crate::convert::DataType;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::warn;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

const STORAGE_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%:z";
const OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

impl Date {
    /// Populates `self` from a SQLite value.
    ///
    /// # Errors
    /// - Returns [`DateError::Conversion`] for blobs, unparsable text and
    ///   numbers outside the representable range. `self` is left unchanged.
    pub fn scan(&mut self, value: ValueRef<'_>) -> DateResult<()> {
        let instant = match value {
            ValueRef::Null => {
                *self = Date::default();
                return Ok(());
            }
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|err| DateError::Conversion(format!("text is not UTF-8: {err}")))?;
                parse_timestamp_text(text).ok_or_else(|| {
                    DateError::Conversion(format!("unrecognized timestamp text `{}`", text.trim()))
                })?
            }
            ValueRef::Integer(seconds) => DateTime::<Utc>::from_timestamp(seconds, 0)
                .map(|instant| instant.fixed_offset())
                .ok_or_else(|| {
                    DateError::Conversion(format!("unix seconds {seconds} out of range"))
                })?,
            ValueRef::Real(julian_day) => from_julian_day(julian_day).ok_or_else(|| {
                DateError::Conversion(format!("julian day {julian_day} out of range"))
            })?,
            ValueRef::Blob(bytes) => {
                return Err(DateError::Conversion(format!(
                    "unsupported blob value of {} bytes",
                    bytes.len()
                )));
            }
        };

        *self = Date(truncate_to_day(instant));
        Ok(())
    }

    /// Midnight of this date's calendar day, in the date's own offset.
    pub fn storage_value(&self) -> DateTime<FixedOffset> {
        truncate_to_day(self.0)
    }
}

impl DataType for Date {
    fn data_type(&self) -> &'static str {
        "date"
    }
}

impl FromSql for Date {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let mut date = Date::default();
        match date.scan(value) {
            Ok(()) => Ok(date),
            Err(err) => {
                warn!(
                    "event=date_scan module=sql status=error value_type={} error={}",
                    value.data_type(),
                    err
                );
                Err(FromSqlError::Other(Box::new(err)))
            }
        }
    }
}

impl ToSql for Date {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(
            self.storage_value().format(STORAGE_LAYOUT).to_string(),
        ))
    }
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant);
    }
    if let Some(instant) = OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(text, layout).ok())
    {
        return Some(instant);
    }
    if let Some(naive) = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
    {
        return Some(naive.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc().fixed_offset())
}

fn from_julian_day(julian_day: f64) -> Option<DateTime<FixedOffset>> {
    let seconds = (julian_day - UNIX_EPOCH_JULIAN_DAY) * SECONDS_PER_DAY;
    if !seconds.is_finite() || seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0).map(|instant| instant.fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::{from_julian_day, parse_timestamp_text};
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_timestamp_text_accepts_common_sqlite_shapes() {
        for (input, offset_seconds) in [
            ("2023-10-01", 0),
            ("2023-10-01 08:30:00", 0),
            ("2023-10-01T08:30:00.125", 0),
            ("2023-10-01 08:30", 0),
            ("2023-10-01T08:30:00Z", 0),
            ("2023-10-01 08:30:00+02:00", 7200),
            ("2023-10-01 08:30:00.5-0500", -18000),
        ] {
            let instant = parse_timestamp_text(input)
                .unwrap_or_else(|| panic!("`{input}` should parse"));
            assert_eq!(instant.year(), 2023, "{input}");
            assert_eq!(instant.day(), 1, "{input}");
            assert_eq!(instant.offset().local_minus_utc(), offset_seconds, "{input}");
        }
    }

    #[test]
    fn parse_timestamp_text_rejects_garbage() {
        assert!(parse_timestamp_text("yesterday").is_none());
        assert!(parse_timestamp_text("01-10-2023").is_none());
    }

    #[test]
    fn julian_day_of_unix_epoch_is_midnight_1970() {
        let instant = from_julian_day(2_440_587.5).unwrap();
        assert_eq!(instant.year(), 1970);
        assert_eq!(instant.hour(), 0);
        assert!(from_julian_day(f64::NAN).is_none());
    }
}
