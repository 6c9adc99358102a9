//! Parsing options for bulk CSV uploads.
//!
//! ```rust
//! use ingest::CsvOptions;
//!
//! let opts = CsvOptions {
//!     delimiter: b';',
//!     ..CsvOptions::default()
//! };
//! opts.validate().expect("valid options");
//! ```
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// How a bulk upload is split into header-keyed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter byte.
    #[serde(default = "CsvOptions::default_delimiter")]
    pub delimiter: u8,
    /// Lines starting with this byte are skipped. `None` disables comments.
    #[serde(default = "CsvOptions::default_comment")]
    pub comment: Option<u8>,
    /// Trim whitespace around header names before using them as keys.
    #[serde(default)]
    pub trim_headers: bool,
    /// Reject uploads with more data rows than this.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl CsvOptions {
    pub(crate) fn default_delimiter() -> u8 {
        b','
    }

    pub(crate) fn default_comment() -> Option<u8> {
        Some(b'#')
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), IngestError> {
        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(IngestError::InvalidConfig(format!(
                "delimiter {:?} is not allowed",
                self.delimiter as char
            )));
        }
        if self.comment == Some(self.delimiter) {
            return Err(IngestError::InvalidConfig(
                "comment byte must differ from the delimiter".into(),
            ));
        }
        if self.max_rows == Some(0) {
            return Err(IngestError::InvalidConfig(
                "max_rows must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: Self::default_delimiter(),
            comment: Self::default_comment(),
            trim_headers: false,
            max_rows: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = CsvOptions::default();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.delimiter, b',');
        assert_eq!(opts.comment, Some(b'#'));
    }

    #[test]
    fn quote_delimiter_rejected() {
        let opts = CsvOptions {
            delimiter: b'"',
            ..CsvOptions::default()
        };
        assert!(matches!(opts.validate(), Err(IngestError::InvalidConfig(_))));
    }

    #[test]
    fn comment_equal_to_delimiter_rejected() {
        let opts = CsvOptions {
            delimiter: b'#',
            ..CsvOptions::default()
        };
        let err = opts.validate().expect_err("options should be invalid");
        assert!(err.to_string().contains("comment"));
    }

    #[test]
    fn zero_max_rows_rejected() {
        let opts = CsvOptions {
            max_rows: Some(0),
            ..CsvOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
