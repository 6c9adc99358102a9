use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use ingest::load_catalog;
use matcher::{attribute_names, ATTRIBUTE_COUNT};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub loaded_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResponse {
    pub previous_records: usize,
    pub records: usize,
    pub loaded_at: String,
}

/// Attribute keys in schema order.
pub async fn schema() -> Json<JsonValue> {
    Json(json!({
        "count": ATTRIBUTE_COUNT,
        "attributes": attribute_names().collect::<Vec<_>>(),
    }))
}

pub async fn catalog_stats(State(state): State<Arc<ServerState>>) -> Json<CatalogStats> {
    Json(CatalogStats {
        records: state.matcher().catalog().len(),
        source: state
            .catalog_source()
            .map(|path| path.display().to_string()),
        loaded_at: state.loaded_at().to_rfc3339(),
    })
}

/// Re-read the catalog file and swap it in. A failed read leaves the current
/// catalog in place.
pub async fn reload_catalog(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<ReloadResponse>> {
    let path = state.catalog_source().cloned().ok_or_else(|| {
        ServerError::CatalogUnavailable("catalog was not loaded from a file".to_string())
    })?;

    let catalog = tokio::task::spawn_blocking(move || load_catalog(path)).await??;
    let swap = state.replace_catalog(catalog);

    tracing::info!(
        previous_records = swap.previous_records,
        records = swap.records,
        "catalog reloaded"
    );

    Ok(Json(ReloadResponse {
        previous_records: swap.previous_records,
        records: swap.records,
        loaded_at: swap.loaded_at.to_rfc3339(),
    }))
}
