//! # Planet Finder Ingest (`ingest`)
//!
//! Turns bytes on disk or in a request body into the inputs the matcher
//! works on:
//!
//! - [`load_catalog`] / [`parse_catalog`]: a JSON array of planet objects into
//!   a [`matcher::Catalog`], order preserved.
//! - [`parse_bulk_csv`] / [`load_bulk_csv`]: a header-keyed CSV upload into
//!   [`matcher::RawRow`]s, one per data line.
//!
//! Nothing here scores or compares records.
//!
//! ```
//! use ingest::{parse_bulk_csv_str, parse_catalog, CsvOptions};
//! use matcher::match_bulk;
//!
//! let catalog = parse_catalog(r#"[{"planetName": "Kepler-22b", "radius": 2.4}]"#)?;
//! let rows = parse_bulk_csv_str("planetName,radius\nKEPLER-22B,2.4\n", &CsvOptions::default())?;
//!
//! let results = match_bulk(&catalog, &rows);
//! assert_eq!(results[0].row_index, 1);
//! assert_eq!(results[0].result.score(), Some(2));
//! # Ok::<(), ingest::IngestError>(())
//! ```

mod catalog;
mod config;
mod error;
mod rows;

pub use crate::catalog::{catalog_from_value, load_catalog, parse_catalog};
pub use crate::config::CsvOptions;
pub use crate::error::IngestError;
pub use crate::rows::{load_bulk_csv, parse_bulk_csv, parse_bulk_csv_str};
