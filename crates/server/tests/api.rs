use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ingest::{parse_catalog, CsvOptions};
use matcher::{Catalog, MatchConfig};
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

const CATALOG: &str = r#"[
    {"planetName": "Kepler-22b", "hostName": "Kepler-22", "radius": 2.4, "discoveryMethod": "Transit"},
    {"planetName": "TRAPPIST-1e", "hostName": "TRAPPIST-1", "radius": 0.92, "discoveryMethod": "Transit"},
    {"name": "51 Peg b", "hostName": "51 Peg", "discoveryMethod": "Radial Velocity"}
]"#;

fn app_with(catalog: Catalog, csv_options: CsvOptions) -> Router {
    let state = ServerState::with_catalog(
        ServerConfig::default(),
        catalog,
        MatchConfig::default(),
        csv_options,
    )
    .unwrap();
    build_router(Arc::new(state))
}

fn app() -> Router {
    app_with(parse_catalog(CATALOG).unwrap(), CsvOptions::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_csv(uri: &str, body: &'static str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "text/csv")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_and_ready() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(app(), get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["catalog_records"], 3);
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let request = Request::get("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");

    let response = app().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn schema_lists_keys_in_order() {
    let (status, body) = send(app(), get("/api/v1/schema")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 24);
    assert_eq!(body["attributes"][0], "radius");
    assert_eq!(body["attributes"][22], "planetName");
    assert_eq!(body["attributes"][23], "discoveryMethod");
}

#[tokio::test]
async fn single_match_is_case_insensitive() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/match", json!({"planetName": "kepler-22b", "koi_score": "0.9"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 1);
    assert_eq!(body["matchedRecord"]["planetName"], "Kepler-22b");
}

#[tokio::test]
async fn numeric_form_values_compare_as_text() {
    let (_, body) = send(
        app(),
        post_json("/api/v1/match", json!({"radius": 0.92, "discoveryMethod": "transit"})),
    )
    .await;

    assert_eq!(body["score"], 2);
    assert_eq!(body["matchedRecord"]["planetName"], "TRAPPIST-1e");
}

#[tokio::test]
async fn empty_catalog_reports_no_catalog_data() {
    let app = app_with(Catalog::default(), CsvOptions::default());
    let (status, body) = send(app, post_json("/api/v1/match", json!({"planetName": "x"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "no catalog data"}));
}

#[tokio::test]
async fn single_match_rejects_non_object() {
    let (status, body) = send(app(), post_json("/api/v1/match", json!(["planetName"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn bulk_json_keeps_order_and_labels_rows() {
    let rows = json!({
        "rows": [
            {"hostName": "51 peg"},
            {"planetName": "TRAPPIST-1E"},
            {}
        ]
    });
    let (status, body) = send(app(), post_json("/api/v1/match/bulk", rows)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRows"], 3);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["rowIndex"], 1);
    assert_eq!(results[0]["matchedName"], "51 Peg b");
    assert_eq!(results[1]["rowIndex"], 2);
    assert_eq!(results[1]["matchedName"], "TRAPPIST-1e");
    assert_eq!(results[1]["input"]["planetName"], "TRAPPIST-1E");
    assert_eq!(results[1]["input"]["radius"], "");

    // A blank row still gets the first catalog record at score 0.
    assert_eq!(results[2]["result"]["score"], 0);
    assert_eq!(results[2]["matchedName"], "Kepler-22b");
}

#[tokio::test]
async fn bulk_json_rejects_non_array_rows() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/match/bulk", json!({"rows": {"planetName": "x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MALFORMED_BULK_INPUT");
}

#[tokio::test]
async fn bulk_json_rejects_non_object_row() {
    let (status, body) = send(
        app(),
        post_json("/api/v1/match/bulk", json!({"rows": [{"planetName": "x"}, 7]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MALFORMED_BULK_INPUT");
}

#[tokio::test]
async fn bulk_json_missing_rows_is_malformed() {
    let (status, body) = send(app(), post_json("/api/v1/match/bulk", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MALFORMED_BULK_INPUT");
}

#[tokio::test]
async fn bulk_csv_matches_rows() {
    let csv = "# uploaded list\nplanetName,hostName\nKepler-22b,Kepler-22\n,TRAPPIST-1\n";
    let (status, body) = send(app(), post_csv("/api/v1/match/bulk/csv", csv)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalRows"], 2);
    assert_eq!(body["results"][0]["result"]["score"], 2);
    assert_eq!(body["results"][1]["matchedName"], "TRAPPIST-1e");
    assert_eq!(body["results"][1]["result"]["score"], 1);
}

#[tokio::test]
async fn bulk_csv_header_only_is_empty() {
    let (status, body) = send(app(), post_csv("/api/v1/match/bulk/csv", "planetName\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"totalRows": 0, "results": []}));
}

#[tokio::test]
async fn bulk_csv_invalid_utf8_is_malformed() {
    let request = Request::post("/api/v1/match/bulk/csv")
        .body(Body::from(&b"planetName\n\xff\xfe\n"[..]))
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MALFORMED_BULK_INPUT");
}

#[tokio::test]
async fn bulk_csv_row_limit() {
    let opts = CsvOptions {
        max_rows: Some(1),
        ..CsvOptions::default()
    };
    let app = app_with(parse_catalog(CATALOG).unwrap(), opts);
    let (status, body) = send(app, post_csv("/api/v1/match/bulk/csv", "planetName\na\nb\n")).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn catalog_stats_for_in_memory_catalog() {
    let (status, body) = send(app(), get("/api/v1/catalog/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], 3);
    assert!(body.get("source").is_none());
    assert!(body["loadedAt"].is_string());
}

#[tokio::test]
async fn reload_without_source_is_unavailable() {
    let request = Request::post("/api/v1/catalog/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "CATALOG_UNAVAILABLE");
}

#[tokio::test]
async fn reload_swaps_catalog_from_file() {
    let file = tempfile_with(CATALOG);
    let config = ServerConfig {
        catalog_path: file.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(config).unwrap());
    let app = build_router(state.clone());

    let (_, body) = send(app.clone(), get("/api/v1/catalog/stats")).await;
    assert_eq!(body["records"], 3);

    std::fs::write(file.path(), r#"[{"planetName": "HD 209458 b"}]"#).unwrap();

    let reload = Request::post("/api/v1/catalog/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), reload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["previousRecords"], 3);
    assert_eq!(body["records"], 1);

    let (_, body) = send(
        app,
        post_json("/api/v1/match", json!({"planetName": "hd 209458 b"})),
    )
    .await;
    assert_eq!(body["matchedRecord"]["planetName"], "HD 209458 b");
}

#[tokio::test]
async fn failed_reload_keeps_current_catalog() {
    let file = tempfile_with(CATALOG);
    let config = ServerConfig {
        catalog_path: file.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(config).unwrap());
    let app = build_router(state.clone());

    std::fs::write(file.path(), r#"{"not": "an array"}"#).unwrap();

    let reload = Request::post("/api/v1/catalog/reload")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, reload).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(state.matcher().catalog().len(), 3);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = send(app(), get("/api/v1/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

fn tempfile_with(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
