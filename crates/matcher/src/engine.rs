use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::metrics::{metrics_recorder, MatchKind};
use crate::schema::AttributeKey;
use crate::types::{
    rows_from_json, BulkResult, Catalog, CatalogRecord, MatchConfig, MatchError, MatchFailure,
    MatchResult, QueryRecord, RawRow,
};


/// Query values normalized once so a catalog scan only folds the catalog side.
struct PreparedQuery {
    needles: Vec<(AttributeKey, String)>,
    trim: bool,
}

impl PreparedQuery {
    fn new(query: &QueryRecord, trim: bool) -> Self {
        let needles = query
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key, fold(value, trim)))
            .collect();
        Self { needles, trim }
    }

    fn score(&self, record: &CatalogRecord) -> u32 {
        self.needles
            .iter()
            .filter(|(key, needle)| {
                record
                    .text(*key)
                    .is_some_and(|text| !text.trim().is_empty() && folds_to(&text, needle, self.trim))
            })
            .count() as u32
    }
}

fn fold(value: &str, trim: bool) -> String {
    let value = if trim { value.trim() } else { value };
    value.to_lowercase()
}

fn folds_to(candidate: &str, needle: &str, trim: bool) -> bool {
    fold(candidate, trim) == needle
}

/// Similarity between one catalog record and one query, using the default
/// configuration.
///
/// One point per schema attribute that is specified in the query, present in
/// the record, and equal to it after case folding. Always in `0..=24`.
pub fn score(record: &CatalogRecord, query: &QueryRecord) -> u32 {
    score_with_config(record, query, &MatchConfig::default())
}

/// [`score`] with explicit configuration.
pub fn score_with_config(record: &CatalogRecord, query: &QueryRecord, cfg: &MatchConfig) -> u32 {
    PreparedQuery::new(query, cfg.trim_values).score(record)
}

/// Pick the highest-scoring catalog record for `query`, using the default
/// configuration.
///
/// Ties keep the earlier record. An empty catalog yields
/// [`MatchFailure::NoCatalogData`]; otherwise the first record is a
/// candidate even at score 0.
pub fn select_best(catalog: &[CatalogRecord], query: &QueryRecord) -> MatchResult {
    select_best_with_config(catalog, query, &MatchConfig::default())
}

/// [`select_best`] with explicit configuration.
///
/// When `cfg.min_score` is set, a best candidate below it is reported as
/// [`MatchFailure::NoMatchFound`].
pub fn select_best_with_config(
    catalog: &[CatalogRecord],
    query: &QueryRecord,
    cfg: &MatchConfig,
) -> MatchResult {
    if catalog.is_empty() {
        return MatchFailure::NoCatalogData.into();
    }

    let prepared = PreparedQuery::new(query, cfg.trim_values);
    let mut best: Option<(&CatalogRecord, u32)> = None;
    for record in catalog {
        let score = prepared.score(record);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((record, score)),
        }
    }

    match best {
        Some((record, score)) if cfg.min_score.is_none_or(|min| score >= min) => {
            MatchResult::Matched {
                matched_record: record.clone(),
                score,
            }
        }
        Some((_, score)) => {
            debug!(score, min_score = ?cfg.min_score, "best candidate below threshold");
            MatchFailure::NoMatchFound.into()
        }
        None => MatchFailure::NoMatchFound.into(),
    }
}

/// Match every row against the catalog, using the default configuration.
///
/// Output has one entry per input row, in input order, with 1-based
/// `row_index`. Rows never fail individually; an empty catalog marks every
/// row with [`MatchFailure::NoCatalogData`].
pub fn match_bulk(catalog: &[CatalogRecord], rows: &[RawRow]) -> Vec<BulkResult> {
    match_bulk_with_config(catalog, rows, &MatchConfig::default())
}

/// [`match_bulk`] with explicit configuration.
pub fn match_bulk_with_config(
    catalog: &[CatalogRecord],
    rows: &[RawRow],
    cfg: &MatchConfig,
) -> Vec<BulkResult> {
    if cfg.use_parallel {
        rows.par_iter()
            .enumerate()
            .map(|(idx, row)| match_row(catalog, idx, row, cfg))
            .collect()
    } else {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| match_row(catalog, idx, row, cfg))
            .collect()
    }
}

fn match_row(catalog: &[CatalogRecord], idx: usize, row: &RawRow, cfg: &MatchConfig) -> BulkResult {
    let input = QueryRecord::from_raw_row(row);
    let result = select_best_with_config(catalog, &input, cfg);
    BulkResult {
        row_index: idx + 1,
        input,
        result,
    }
}

/// Trait for a matching engine bound to a catalog.
pub trait Matcher: Send + Sync {
    /// Match a single query.
    fn match_record(&self, query: &QueryRecord) -> MatchResult;

    /// Match already-parsed bulk rows.
    fn match_rows(&self, rows: &[RawRow]) -> Vec<BulkResult>;
}

/// Matcher over a shared, immutable catalog.
#[derive(Debug, Clone)]
pub struct DefaultMatcher {
    catalog: Arc<Catalog>,
    cfg: MatchConfig,
}

impl DefaultMatcher {
    /// Construct a matcher that owns `catalog`.
    pub fn new(catalog: Catalog, cfg: MatchConfig) -> Result<Self, MatchError> {
        Self::with_catalog_arc(Arc::new(catalog), cfg)
    }

    /// Construct a matcher from a shared catalog handle.
    pub fn with_catalog_arc(catalog: Arc<Catalog>, cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { catalog, cfg })
    }

    /// A matcher with the same configuration over a different catalog.
    ///
    /// The old catalog is left untouched; in-flight matches holding it keep
    /// seeing it until they finish.
    pub fn with_replaced_catalog(&self, catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            cfg: self.cfg.clone(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Validate a JSON bulk payload and match its rows.
    pub fn match_json_rows(&self, payload: &JsonValue) -> Result<Vec<BulkResult>, MatchError> {
        let rows = rows_from_json(payload)?;
        Ok(self.match_rows(&rows))
    }
}

impl Matcher for DefaultMatcher {
    fn match_record(&self, query: &QueryRecord) -> MatchResult {
        let start = Instant::now();
        let result = select_best_with_config(&self.catalog, query, &self.cfg);
        let latency = start.elapsed();

        debug!(
            kind = MatchKind::Single.as_str(),
            catalog_size = self.catalog.len(),
            specified = query.specified_count(),
            score = ?result.score(),
            failure = ?result.failure(),
            latency_us = latency.as_micros() as u64,
            "match complete"
        );

        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(MatchKind::Single, latency, 1, usize::from(result.is_match()));
        }

        result
    }

    fn match_rows(&self, rows: &[RawRow]) -> Vec<BulkResult> {
        let start = Instant::now();
        let results = match_bulk_with_config(&self.catalog, rows, &self.cfg);
        let latency = start.elapsed();
        let matched = results.iter().filter(|r| r.result.is_match()).count();

        info!(
            kind = MatchKind::Bulk.as_str(),
            catalog_size = self.catalog.len(),
            rows = rows.len(),
            matched,
            parallel = self.cfg.use_parallel,
            latency_ms = latency.as_millis() as u64,
            "match complete"
        );

        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(MatchKind::Bulk, latency, rows.len(), matched);
        }

        results
    }
}
