use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use ingest::parse_bulk_csv;
use matcher::{rows_from_json, BulkResult, MatchResult, Matcher, QueryRecord, RawRow};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Bulk match response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkMatchResponse {
    pub total_rows: usize,
    pub results: Vec<BulkEntry>,
}

/// One bulk row, labelled with the matched planet's name when it has one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEntry {
    #[serde(flatten)]
    pub row: BulkResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_name: Option<String>,
}

impl From<BulkResult> for BulkEntry {
    fn from(row: BulkResult) -> Self {
        let matched_name = row
            .result
            .matched_record()
            .and_then(|record| record.display_name())
            .map(str::to_string);
        Self { row, matched_name }
    }
}

impl BulkMatchResponse {
    fn new(results: Vec<BulkResult>) -> Self {
        Self {
            total_rows: results.len(),
            results: results.into_iter().map(BulkEntry::from).collect(),
        }
    }
}

/// Match one form-style query.
///
/// Body: a JSON object of attribute name to value. Unknown attributes are
/// ignored; numbers and booleans are compared by their text form.
pub async fn match_record(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ServerResult<Json<MatchResult>> {
    let Json(body) = payload?;
    let object = body.as_object().ok_or_else(|| {
        ServerError::BadRequest("expected a JSON object of attribute values".to_string())
    })?;

    let query = QueryRecord::from_json_object(object);
    Ok(Json(state.matcher().match_record(&query)))
}

/// Match a JSON bulk payload: `{ "rows": [ { ... }, ... ] }`.
pub async fn match_bulk_json(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ServerResult<Json<BulkMatchResponse>> {
    let Json(body) = payload?;
    let object = body.as_object().ok_or_else(|| {
        ServerError::BadRequest("expected a JSON object with a \"rows\" field".to_string())
    })?;

    let rows = rows_from_json(object.get("rows").unwrap_or(&JsonValue::Null))?;
    run_bulk(state, rows).await
}

/// Match a raw CSV upload with a header row.
pub async fn match_bulk_csv(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<BulkMatchResponse>> {
    let opts = state.csv_options.clone();
    let rows = tokio::task::spawn_blocking(move || parse_bulk_csv(&body[..], &opts)).await??;
    run_bulk(state, rows).await
}

async fn run_bulk(
    state: Arc<ServerState>,
    rows: Vec<RawRow>,
) -> ServerResult<Json<BulkMatchResponse>> {
    let matcher = state.matcher();
    let results = tokio::task::spawn_blocking(move || matcher.match_rows(&rows)).await?;
    Ok(Json(BulkMatchResponse::new(results)))
}
