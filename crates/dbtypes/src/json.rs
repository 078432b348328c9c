//! Associative JSON document column type.
//!
//! # Responsibility
//! - Store a JSON object in a text/blob column and read it back losslessly.
//!
//! # Invariants
//! - Only JSON objects are accepted; arrays and scalars are rejected.
//! - Keys come back sorted; input key order is not preserved.

use crate::convert::{BinaryCodec, DataType};
use log::warn;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// JSON object stored as a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonMap(Map<String, Value>);

impl JsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Parses a JSON object from raw bytes.
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}

impl Deref for JsonMap {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for JsonMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for JsonMap {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl FromIterator<(String, Value)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl DataType for JsonMap {
    fn data_type(&self) -> &'static str {
        "jsonb"
    }
}

impl BinaryCodec for JsonMap {
    type Error = serde_json::Error;

    fn encode_binary(&self) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(&self.0)
    }

    fn decode_binary(data: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(data)
    }
}

impl FromSql for JsonMap {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let bytes = match value {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes,
            _ => return Err(FromSqlError::InvalidType),
        };
        Self::from_slice(bytes).map_err(|err| {
            warn!(
                "event=json_scan module=json status=error len={} error={}",
                bytes.len(),
                err
            );
            FromSqlError::Other(Box::new(err))
        })
    }
}

impl ToSql for JsonMap {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = serde_json::to_string(&self.0)
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
        Ok(ToSqlOutput::from(text))
    }
}
