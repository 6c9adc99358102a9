//! Workspace umbrella crate for Planet Finder.
//!
//! This crate ties catalog loading, bulk CSV parsing and the matching engine
//! together behind a YAML configuration, so callers can go from files on disk
//! to match results in one call.

pub mod config;

pub use config::{
    BulkYamlConfig, CatalogYamlConfig, ConfigLoadError, LoggingYamlConfig, PlanetFinderConfig,
};
pub use ingest::{
    CsvOptions, IngestError, catalog_from_value, load_bulk_csv, load_catalog, parse_bulk_csv,
    parse_bulk_csv_str, parse_catalog,
};
pub use matcher::{
    ATTRIBUTE_COUNT, AttributeKey, BulkResult, Catalog, CatalogRecord, DefaultMatcher,
    MatchConfig, MatchError, MatchFailure, MatchKind, MatchMetrics, MatchResult, Matcher,
    QueryRecord, RawRow, attribute_names, match_bulk, match_bulk_with_config, rows_from_json,
    score, score_with_config, select_best, select_best_with_config, set_match_metrics,
};

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

/// Errors that can occur while going from configuration and files to results.
#[derive(Debug)]
pub enum PipelineError {
    Config(ConfigLoadError),
    Ingest(IngestError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(err) => write!(f, "configuration failure: {err}"),
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Match(err) => write!(f, "matching failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Config(err) => Some(err),
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Structurally broken bulk uploads surface as
/// [`MatchError::MalformedBulkInput`]; everything else stays an ingest error.
impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        if value.is_malformed_input() {
            PipelineError::Match(MatchError::MalformedBulkInput(value.to_string()))
        } else {
            PipelineError::Ingest(value)
        }
    }
}

/// Build a matcher over the catalog named in `cfg`.
pub fn matcher_from_config(cfg: &PlanetFinderConfig) -> Result<DefaultMatcher, PipelineError> {
    let catalog = load_catalog(&cfg.catalog.path)?;
    let matcher = DefaultMatcher::with_catalog_arc(Arc::new(catalog), cfg.match_config())?;
    Ok(matcher)
}

/// Match one query against the configured catalog.
pub fn match_query(
    cfg: &PlanetFinderConfig,
    query: &QueryRecord,
) -> Result<MatchResult, PipelineError> {
    let matcher = matcher_from_config(cfg)?;
    Ok(matcher.match_record(query))
}

/// Match every row of a CSV file against the configured catalog.
pub fn match_bulk_file(
    cfg: &PlanetFinderConfig,
    csv_path: impl AsRef<Path>,
) -> Result<Vec<BulkResult>, PipelineError> {
    let matcher = matcher_from_config(cfg)?;
    match_bulk_file_with(&matcher, csv_path, &cfg.csv_options()?)
}

/// Match every row of a CSV file with an existing matcher.
pub fn match_bulk_file_with(
    matcher: &DefaultMatcher,
    csv_path: impl AsRef<Path>,
    opts: &CsvOptions,
) -> Result<Vec<BulkResult>, PipelineError> {
    let csv_path = csv_path.as_ref();
    let rows = load_bulk_csv(csv_path, opts)?;
    info!(path = %csv_path.display(), rows = rows.len(), "bulk input loaded");
    Ok(matcher.match_rows(&rows))
}
