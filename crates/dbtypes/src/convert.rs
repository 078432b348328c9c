//! Boundary contracts implemented by every database value type.
//!
//! # Responsibility
//! - Declare the column type hint consumed by mapping layers.
//! - Declare the form-scan and binary-envelope entry points.

use std::any::Any;

/// Column type hint for ORM/mapping layers.
pub trait DataType {
    fn data_type(&self) -> &'static str;
}

/// Populates a value from a raw form or query-string field.
///
/// Form frameworks hand over loosely typed values, so the input is `dyn Any`
/// and implementations decide which concrete types they accept.
pub trait FormScanner {
    type Error;

    fn form_scan(&mut self, value: &dyn Any) -> Result<(), Self::Error>;
}

/// Binary envelope used when a value is embedded in a binary-encoded record.
pub trait BinaryCodec: Sized {
    type Error;

    fn encode_binary(&self) -> Result<Vec<u8>, Self::Error>;
    fn decode_binary(data: &[u8]) -> Result<Self, Self::Error>;
}
