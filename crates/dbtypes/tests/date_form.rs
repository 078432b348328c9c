use dbtypes::{Date, DateError, FormScanner};

#[test]
fn form_scan_parses_owned_and_borrowed_strings() {
    let mut date = Date::default();
    date.form_scan(&"2023-10-01".to_string()).unwrap();
    assert_eq!(date.to_string(), "2023-10-01");
    assert_eq!(date.as_datetime().offset().local_minus_utc(), 0);

    let mut date = Date::default();
    date.form_scan(&"2024-02-29").unwrap();
    assert_eq!(date.to_string(), "2024-02-29");
}

#[test]
fn form_scan_skips_empty_value() {
    let mut date = Date::new(2020, 5, 17);
    date.form_scan(&String::new()).unwrap();
    assert_eq!(date.to_string(), "2020-05-17");

    let mut unset = Date::default();
    unset.form_scan(&"").unwrap();
    assert!(unset.is_zero());
}

#[test]
fn form_scan_requires_a_string() {
    let mut date = Date::new(2020, 5, 17);
    let err = date.form_scan(&20200517_i64).unwrap_err();

    assert_eq!(
        err,
        DateError::Type("invalid date. Expected value as a string".to_string())
    );
    assert_eq!(date.to_string(), "2020-05-17");
}

#[test]
fn form_scan_rejects_quoted_or_malformed_text() {
    let mut date = Date::default();

    assert!(matches!(
        date.form_scan(&"\"2023-10-01\""),
        Err(DateError::Format { .. })
    ));
    assert!(matches!(
        date.form_scan(&"10/01/2023"),
        Err(DateError::Format { .. })
    ));
    assert!(date.is_zero());
}
