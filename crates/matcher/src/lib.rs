//! # Planet Finder Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` is the matching engine behind Planet Finder. Given a partially
//! filled-in exoplanet description it finds the closest record in a reference
//! catalog, one query at a time or row-by-row over a bulk upload.
//!
//! Matching is deliberately simple: a record scores one point for every schema
//! attribute whose value equals the query's value after trimming and case
//! folding. There is no numeric tolerance (`1.01` and `1.0` do not match) and no
//! partial string matching.
//!
//! ## Core Types
//!
//! - [`AttributeKey`]: the fixed, ordered set of 24 compared attributes.
//! - [`QueryRecord`]: one text slot per attribute; empty means "don't compare".
//! - [`CatalogRecord`] / [`Catalog`]: immutable reference records in load order.
//! - [`MatchResult`]: the matched record and its score, or a [`MatchFailure`].
//! - [`BulkResult`]: per-row result carrying the 1-based row index and the
//!   projected input.
//! - [`DefaultMatcher`]: a [`Matcher`] over a shared catalog and a [`MatchConfig`].
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{select_best, AttributeKey, Catalog, CatalogRecord, QueryRecord};
//! use serde_json::json;
//!
//! let catalog: Catalog = [
//!     json!({"planetName": "Kepler-22b", "radius": "2.4"}),
//!     json!({"planetName": "TRAPPIST-1e", "radius": "0.92"}),
//! ]
//! .into_iter()
//! .filter_map(CatalogRecord::from_value)
//! .collect();
//!
//! let query = QueryRecord::new().with(AttributeKey::PlanetName, "kepler-22b");
//! let result = select_best(&catalog, &query);
//!
//! assert_eq!(result.score(), Some(1));
//! assert_eq!(
//!     result.matched_record().and_then(|r| r.display_name()),
//!     Some("Kepler-22b")
//! );
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-call latency and match counts from [`DefaultMatcher`].

pub mod engine;
pub mod metrics;
pub mod schema;
pub mod types;

pub use crate::engine::{
    match_bulk, match_bulk_with_config, score, score_with_config, select_best,
    select_best_with_config, DefaultMatcher, Matcher,
};
pub use crate::metrics::{set_match_metrics, MatchKind, MatchMetrics};
pub use crate::schema::{attribute_names, AttributeKey, UnknownAttributeKey, ATTRIBUTE_COUNT};
pub use crate::types::{
    rows_from_json, BulkResult, Catalog, CatalogRecord, MatchConfig, MatchError, MatchFailure,
    MatchResult, QueryRecord, RawRow,
};
