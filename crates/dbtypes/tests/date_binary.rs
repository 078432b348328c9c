use chrono::{FixedOffset, Timelike};
use dbtypes::instant::encode_instant;
use dbtypes::{BinaryCodec, Date, DateError};

#[test]
fn binary_round_trip_keeps_day_offset_and_midnight() {
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let date = Date::try_new_in(2023, 10, 1, offset).unwrap();

    let decoded = Date::decode_binary(&date.encode_binary().unwrap()).unwrap();

    assert_eq!(decoded, date);
    assert_eq!(decoded.to_string(), "2023-10-01");
    assert_eq!(*decoded.as_datetime().offset(), offset);
    assert_eq!(decoded.as_datetime().hour(), 0);
    assert_eq!(decoded.as_datetime().nanosecond(), 0);
}

#[test]
fn binary_layout_matches_instant_codec() {
    let date = Date::new(2015, 10, 21);

    assert_eq!(
        date.encode_binary().unwrap(),
        encode_instant(&date.as_datetime()).unwrap()
    );
}

#[test]
fn zero_date_survives_binary_envelope() {
    let bytes = Date::default().encode_binary().unwrap();

    assert_eq!(bytes, [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff]);
    assert!(Date::decode_binary(&bytes).unwrap().is_zero());
}

#[test]
fn truncated_envelope_is_rejected() {
    let bytes = Date::new(2015, 10, 21).encode_binary().unwrap();

    assert!(matches!(
        Date::decode_binary(&bytes[..bytes.len() - 1]),
        Err(DateError::Binary(_))
    ));
}
