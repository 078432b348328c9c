//! JSON codec for `Date`.
//!
//! # Responsibility
//! - Encode dates as `"YYYY-MM-DD"` or `null`.
//! - Decode with two separate skip rules: `null` is a no-op, empty text is
//!   the zero date.
//!
//! # Invariants
//! - Decoded dates are stored at UTC midnight.
//! - Non-empty text must match `YYYY-MM-DD` exactly.

use super::{midnight_in, Date, DateError, DateResult};
use chrono::{NaiveDate, Offset, Utc};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;

const ZERO_DATE_TEXT: &str = "0001-01-01";
const MAX_PREVIEW_CHARS: usize = 64;

impl Date {
    /// Encodes the date as JSON text: `null` for the zero value, otherwise
    /// `"YYYY-MM-DD"`.
    pub fn to_json(&self) -> DateResult<String> {
        serde_json::to_string(self).map_err(|err| DateError::Serialization(err.to_string()))
    }

    /// Decodes JSON bytes into `self`.
    ///
    /// JSON `null` leaves `self` untouched so callers can tell "absent" from
    /// "cleared". An empty or whitespace-only string stores the zero date.
    ///
    /// # Errors
    /// - [`DateError::Type`] when `data` is not a JSON string or `null`.
    /// - [`DateError::Format`] when the string is not `YYYY-MM-DD`.
    pub fn scan_json(&mut self, data: &[u8]) -> DateResult<()> {
        let text = serde_json::from_slice::<Option<String>>(data).map_err(|_| {
            DateError::Type(format!("date should be a string, got {}", preview(data)))
        })?;
        let Some(text) = text else {
            return Ok(());
        };
        *self = parse_lenient(&text)?;
        Ok(())
    }

    fn json_text(&self) -> DateResult<String> {
        let year = self.year();
        // RFC 3339 only carries four-digit years.
        if !(0..=9999).contains(&year) {
            return Err(DateError::Serialization(format!(
                "year {year} outside of range [0,9999]"
            )));
        }
        Ok(format!("{year:04}-{:02}-{:02}", self.month(), self.day()))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            return serializer.serialize_none();
        }
        let text = self
            .json_text()
            .map_err(<S::Error as ser::Error>::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(DateVisitor)
    }
}

struct DateVisitor;

impl<'de> Visitor<'de> for DateVisitor {
    type Value = Date;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a date string of the format yyyy-mm-dd, or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Date::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Date::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        // `any` so non-string input reaches the typed arms below.
        deserializer.deserialize_any(DateVisitor)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        parse_lenient(value).map_err(E::custom)
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Err(not_a_string(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Err(not_a_string(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Err(not_a_string(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Err(not_a_string(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(not_a_string("an array"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<Self::Value, A::Error> {
        Err(not_a_string("an object"))
    }
}

fn not_a_string<E: de::Error>(got: impl std::fmt::Display) -> E {
    E::custom(DateError::Type(format!("date should be a string, got {got}")))
}

/// Empty or whitespace-only text is the zero date; anything else is strict.
pub(super) fn parse_lenient(text: &str) -> DateResult<Date> {
    let text = if text.trim().is_empty() {
        ZERO_DATE_TEXT
    } else {
        text
    };
    let day = parse_strict(text).ok_or_else(|| DateError::Format {
        input: text.to_string(),
    })?;
    midnight_in(day, Utc.fix())
        .map(Date)
        .ok_or(DateError::OutOfRange)
}

/// Accepts exactly four year digits, two month digits and two day digits.
fn parse_strict(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = digits(&bytes[0..4])?;
    let month = digits(&bytes[5..7])?;
    let day = digits(&bytes[8..10])?;
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, byte| {
        byte.is_ascii_digit()
            .then(|| acc * 10 + u32::from(byte - b'0'))
    })
}

fn preview(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    let mut truncated = text.chars().take(MAX_PREVIEW_CHARS).collect::<String>();
    if text.chars().count() > MAX_PREVIEW_CHARS {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{parse_lenient, parse_strict, preview};
    use crate::DateError;
    use chrono::NaiveDate;

    #[test]
    fn parse_strict_accepts_canonical_layout() {
        assert_eq!(
            parse_strict("2015-10-21"),
            NaiveDate::from_ymd_opt(2015, 10, 21)
        );
        assert_eq!(parse_strict("0001-01-01"), NaiveDate::from_ymd_opt(1, 1, 1));
    }

    #[test]
    fn parse_strict_rejects_loose_layouts() {
        for input in [
            "2015-1-21",
            "2015-10-1",
            "15-10-21",
            "2015/10/21",
            "2015-10-21T00:00:00Z",
            " 2015-10-21",
            "+015-10-21",
            "2015-02-30",
            "2023-13-01",
            "2023-00-10",
        ] {
            assert_eq!(parse_strict(input), None, "`{input}` should be rejected");
        }
    }

    #[test]
    fn parse_lenient_maps_blank_text_to_zero_date() {
        assert!(parse_lenient("").unwrap().is_zero());
        assert!(parse_lenient(" \t ").unwrap().is_zero());
    }

    #[test]
    fn parse_lenient_reports_format_error() {
        let err = parse_lenient("21/10/2015").unwrap_err();
        assert_eq!(
            err,
            DateError::Format {
                input: "21/10/2015".to_string()
            }
        );
        assert_eq!(err.to_string(), "date should be of the format: yyyy-mm-dd");
    }

    #[test]
    fn preview_truncates_long_input() {
        let long = vec![b'9'; 200];
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), 67);
    }
}
