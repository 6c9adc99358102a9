//! Bulk CSV uploads: a header row followed by one query per line.
//!
//! Each data line becomes a [`RawRow`] keyed by header name. Header names are
//! kept verbatim (no case folding), so only columns spelled exactly like a
//! schema wire name take part in matching. Blank lines and `#` comment lines
//! are skipped; short lines simply lack the trailing keys, and cells beyond
//! the header width are dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use matcher::RawRow;
use tracing::{debug, warn};

use crate::config::CsvOptions;
use crate::error::IngestError;

/// Parse CSV from any reader.
pub fn parse_bulk_csv<R: Read>(reader: R, opts: &CsvOptions) -> Result<Vec<RawRow>, IngestError> {
    opts.validate()?;

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(opts.delimiter)
        .comment(opts.comment)
        .from_reader(reader);

    let headers = header_names(csv_reader.headers().map_err(malformed)?, opts.trim_headers);
    if headers.is_empty() {
        debug!("bulk csv has no header row");
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(malformed)?;
        if let Some(limit) = opts.max_rows {
            if rows.len() == limit {
                warn!(limit, "bulk csv row limit exceeded");
                return Err(IngestError::TooManyRows { limit });
            }
        }
        rows.push(to_row(&headers, &record));
    }

    debug!(columns = headers.len(), rows = rows.len(), "bulk csv parsed");
    Ok(rows)
}

/// Parse CSV held in memory.
pub fn parse_bulk_csv_str(text: &str, opts: &CsvOptions) -> Result<Vec<RawRow>, IngestError> {
    parse_bulk_csv(text.as_bytes(), opts)
}

/// Read and parse a CSV file.
pub fn load_bulk_csv(path: impl AsRef<Path>, opts: &CsvOptions) -> Result<Vec<RawRow>, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| IngestError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse_bulk_csv(file, opts)
}

fn header_names(record: &StringRecord, trim: bool) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = if idx == 0 {
                name.trim_start_matches('\u{feff}')
            } else {
                name
            };
            let name = if trim { name.trim() } else { name };
            name.to_string()
        })
        .collect()
}

fn to_row(headers: &[String], record: &StringRecord) -> RawRow {
    headers
        .iter()
        .zip(record.iter())
        .map(|(name, cell)| (name.clone(), cell.to_string()))
        .collect()
}

fn malformed(err: csv::Error) -> IngestError {
    IngestError::MalformedCsv(err.to_string())
}
