//! Database value types: a calendar `Date` and a `JsonMap` document.
//! Both convert across SQLite columns, JSON text, a binary envelope and,
//! for dates, raw form fields.

pub mod convert;
pub mod date;
pub mod instant;
pub mod json;
pub mod logging;

pub use convert::{BinaryCodec, DataType, FormScanner};
pub use date::{parse_date, Date, DateError, DateResult};
pub use json::JsonMap;
pub use logging::{default_log_level, init_logging, logging_status};

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
