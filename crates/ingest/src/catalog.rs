//! Catalog acquisition: a JSON array of planet objects, read once.

use std::fs;
use std::path::Path;
use std::time::Instant;

use matcher::{Catalog, CatalogRecord};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::IngestError;

/// Read and parse a catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, IngestError> {
    let path = path.as_ref();
    let start = Instant::now();
    let text = fs::read_to_string(path).map_err(|err| {
        warn!(path = %path.display(), error = %err, "catalog_read_failure");
        IngestError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    })?;

    let catalog = parse_catalog(&text)?;
    info!(
        path = %path.display(),
        records = catalog.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "catalog_loaded"
    );
    Ok(catalog)
}

/// Parse catalog JSON text.
pub fn parse_catalog(json: &str) -> Result<Catalog, IngestError> {
    let value: JsonValue = serde_json::from_str(json)
        .map_err(|err| IngestError::InvalidCatalog(format!("not valid JSON: {err}")))?;
    catalog_from_value(value)
}

/// Build a catalog from an already-parsed JSON value.
///
/// The value must be an array whose elements are all objects. Order is kept
/// as-is; an empty array is a valid, empty catalog.
pub fn catalog_from_value(value: JsonValue) -> Result<Catalog, IngestError> {
    let JsonValue::Array(items) = value else {
        return Err(IngestError::InvalidCatalog(
            "top-level value must be an array of records".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            CatalogRecord::from_value(item).ok_or_else(|| {
                IngestError::InvalidCatalog(format!("record {idx} is not an object"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Catalog::new)
}
