//! Binary envelope for instants in time.
//!
//! # Responsibility
//! - Encode a `DateTime<FixedOffset>` into the common 15/16-byte instant layout.
//! - Decode the same layout without losing seconds, nanoseconds or offset.
//!
//! # Invariants
//! - Byte 0 is the layout version (`1`, or `2` when the offset has seconds).
//! - Seconds count from 0001-01-01T00:00:00Z, big-endian.
//! - Offset minutes of `-1` denote UTC.

use crate::date::{DateError, DateResult};
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;

const VERSION_V1: u8 = 1;
const VERSION_V2: u8 = 2;
const V1_LEN: usize = 15;
const V2_LEN: usize = 16;
const UTC_OFFSET_MINUTES: i16 = -1;
/// Seconds between 0001-01-01T00:00:00Z and the unix epoch.
const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

/// Encodes an instant into the binary envelope.
///
/// # Errors
/// - Returns [`DateError::Binary`] when the offset cannot be expressed in
///   whole minutes as an `i16` other than `-1`.
pub fn encode_instant(instant: &DateTime<FixedOffset>) -> DateResult<Vec<u8>> {
    let offset_seconds = instant.offset().local_minus_utc();
    let mut version = VERSION_V1;
    let offset_minutes = if offset_seconds == 0 {
        UTC_OFFSET_MINUTES
    } else {
        if offset_seconds % 60 != 0 {
            version = VERSION_V2;
        }
        let minutes = offset_seconds / 60;
        match i16::try_from(minutes) {
            Ok(minutes) if minutes != UTC_OFFSET_MINUTES => minutes,
            _ => {
                return Err(DateError::Binary(format!(
                    "unexpected zone offset {offset_seconds}s"
                )));
            }
        }
    };

    let seconds = instant.timestamp() + UNIX_TO_INTERNAL;
    let nanos = instant.timestamp_subsec_nanos() as i32;

    let mut out = Vec::with_capacity(V2_LEN);
    out.push(version);
    out.extend_from_slice(&seconds.to_be_bytes());
    out.extend_from_slice(&nanos.to_be_bytes());
    out.extend_from_slice(&offset_minutes.to_be_bytes());
    if version == VERSION_V2 {
        out.push((offset_seconds % 60) as i8 as u8);
    }
    Ok(out)
}

/// Decodes an instant from the binary envelope.
///
/// # Errors
/// - Returns [`DateError::Binary`] for empty input, unknown versions, wrong
///   lengths and instants chrono cannot represent.
pub fn decode_instant(data: &[u8]) -> DateResult<DateTime<FixedOffset>> {
    let result = decode_fields(data);
    if let Err(err) = &result {
        debug!(
            "event=instant_decode module=instant status=error len={} error={}",
            data.len(),
            err
        );
    }
    result
}

fn decode_fields(data: &[u8]) -> DateResult<DateTime<FixedOffset>> {
    let Some((&version, rest)) = data.split_first() else {
        return Err(DateError::Binary("no data".to_string()));
    };
    let expected_len = match version {
        VERSION_V1 => V1_LEN,
        VERSION_V2 => V2_LEN,
        other => return Err(DateError::Binary(format!("unsupported version {other}"))),
    };
    if data.len() != expected_len {
        return Err(DateError::Binary(format!(
            "invalid length {} for version {version}",
            data.len()
        )));
    }

    let seconds = i64::from_be_bytes(array_at(rest, 0));
    let nanos = i32::from_be_bytes(array_at(rest, 8));
    let offset_minutes = i16::from_be_bytes(array_at(rest, 12));

    let mut offset_seconds = if offset_minutes == UTC_OFFSET_MINUTES {
        0
    } else {
        i32::from(offset_minutes) * 60
    };
    if version == VERSION_V2 {
        offset_seconds += i32::from(rest[14] as i8);
    }

    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| DateError::Binary(format!("invalid zone offset {offset_seconds}s")))?;
    let nanos = u32::try_from(nanos)
        .map_err(|_| DateError::Binary(format!("negative nanoseconds {nanos}")))?;
    let unix_seconds = seconds
        .checked_sub(UNIX_TO_INTERNAL)
        .ok_or_else(|| DateError::Binary("seconds out of range".to_string()))?;
    let instant = DateTime::<Utc>::from_timestamp(unix_seconds, nanos)
        .ok_or_else(|| DateError::Binary(format!("instant {seconds}s out of range")))?;
    Ok(instant.with_timezone(&offset))
}

fn array_at<const N: usize>(bytes: &[u8], start: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[start..start + N]);
    out
}

#[cfg(test)]
mod tests {
    use super::{decode_instant, encode_instant, UNIX_TO_INTERNAL};
    use crate::DateError;
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn utc_instant_uses_v1_layout_with_utc_marker() {
        let instant = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap().fixed_offset();
        let bytes = encode_instant(&instant).unwrap();

        assert_eq!(bytes.len(), 15);
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..9], &UNIX_TO_INTERNAL.to_be_bytes());
        assert_eq!(&bytes[9..13], &[0, 0, 0, 0]);
        assert_eq!(&bytes[13..15], &(-1i16).to_be_bytes());
    }

    #[test]
    fn offset_and_nanoseconds_survive_decode() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = offset
            .with_ymd_and_hms(2023, 10, 1, 7, 30, 15)
            .unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let decoded = decode_instant(&encode_instant(&instant).unwrap()).unwrap();

        assert_eq!(decoded, instant);
        assert_eq!(decoded.offset(), instant.offset());
    }

    #[test]
    fn sub_minute_offset_uses_v2_layout() {
        let offset = FixedOffset::east_opt(3600 + 30).unwrap();
        let instant = offset.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
        let bytes = encode_instant(&instant).unwrap();

        assert_eq!(bytes[0], 2);
        assert_eq!(bytes.len(), 16);
        let decoded = decode_instant(&bytes).unwrap();
        assert_eq!(decoded.offset().local_minus_utc(), 3630);
    }

    #[test]
    fn minus_one_minute_offset_cannot_be_encoded() {
        let offset = FixedOffset::west_opt(60).unwrap();
        let instant = offset.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(encode_instant(&instant), Err(DateError::Binary(_))));
    }

    #[test]
    fn malformed_envelopes_are_rejected() {
        assert_eq!(
            decode_instant(&[]).unwrap_err(),
            DateError::Binary("no data".to_string())
        );
        assert!(decode_instant(&[9; 15]).is_err());
        assert!(decode_instant(&[1; 14]).is_err());
        assert!(decode_instant(&[2; 15]).is_err());
    }
}
