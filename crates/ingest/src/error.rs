//! Error types produced by the ingest crate.
//!
//! Errors are cloneable and comparable so callers and tests can match on them
//! directly.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`Io`](IngestError::Io) | A catalog or CSV file cannot be read |
//! | [`InvalidCatalog`](IngestError::InvalidCatalog) | Catalog JSON is not an array of objects |
//! | [`MalformedCsv`](IngestError::MalformedCsv) | Bulk CSV cannot be parsed (bad quoting, invalid UTF-8) |
//! | [`TooManyRows`](IngestError::TooManyRows) | Bulk CSV exceeds `CsvOptions::max_rows` |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | `CsvOptions` failed validation |
use thiserror::Error;

/// Errors that can occur while loading a catalog or parsing bulk rows.
///
/// Marked `#[non_exhaustive]`; match with a catch-all arm.
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::TooManyRows { limit: 10 };
/// assert_eq!(err.to_string(), "bulk input exceeds the limit of 10 rows");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// Reading a file failed. Carries the path and the OS error text.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Catalog JSON is unparseable or not an array of objects.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Bulk CSV could not be parsed into rows.
    #[error("malformed csv: {0}")]
    MalformedCsv(String),

    /// Bulk CSV has more data rows than allowed.
    #[error("bulk input exceeds the limit of {limit} rows")]
    TooManyRows { limit: usize },

    /// Parsing options are unusable.
    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    /// `true` for errors describing a structurally broken bulk upload, as
    /// opposed to a missing file or bad configuration.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            IngestError::MalformedCsv(_) | IngestError::TooManyRows { .. }
        )
    }

    /// Suggested HTTP status code.
    pub fn http_status_code(&self) -> u16 {
        match self {
            IngestError::TooManyRows { .. } => 413,
            IngestError::Io { .. } | IngestError::InvalidConfig(_) => 500,
            _ => 400,
        }
    }
}
