//! Form and query-string input for `Date`.
//!
//! Required-field checks belong to the caller; an empty field is skipped.

use super::{parse_date, Date, DateError};
use crate::convert::FormScanner;
use std::any::Any;

impl FormScanner for Date {
    type Error = DateError;

    /// Accepts `String` or `&str`. An empty string keeps the current value.
    fn form_scan(&mut self, value: &dyn Any) -> Result<(), Self::Error> {
        let text = if let Some(text) = value.downcast_ref::<String>() {
            text.as_str()
        } else if let Some(text) = value.downcast_ref::<&str>() {
            text
        } else {
            return Err(DateError::Type(
                "invalid date. Expected value as a string".to_string(),
            ));
        };

        if text.is_empty() {
            return Ok(());
        }

        *self = parse_date(text)?;
        Ok(())
    }
}
