//! HTTP-level tests driving the router in-process.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;
use txmatch::{
    EmbeddingProvider, Engine, EngineConfig, HashEmbedder, RecordStore, SemanticError,
    SimilaritySearch, StaticSource,
};

fn store() -> RecordStore {
    RecordStore::new(StaticSource::from_pairs(
        [
            ("u1", "Liam Johnson"),
            ("u2", "Zoe Smith"),
            ("u3", "Liam"),
        ],
        [
            ("t1", "payment to liam johnson for march"),
            ("t2", "monthly salary payment"),
            ("t3", "coffee beans"),
        ],
    ))
}

fn app_with(engine: Engine) -> Router {
    build_router(Arc::new(ServerState::with_engine(
        ServerConfig::default(),
        engine,
    )))
}

fn app() -> Router {
    app_with(Engine::new(
        store(),
        Arc::new(HashEmbedder::new(128)),
        SimilaritySearch::default(),
    ))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn match_users_returns_ranked_users() {
    let (status, body) = get(app(), "/match-users/t1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_number_of_matches"], 2);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users[0]["id"], "u3");
    assert_eq!(users[1]["id"], "u1");
    let metric = users[1]["match_metric"].as_f64().unwrap();
    assert!((metric - 0.89).abs() < 1e-6);
}

#[tokio::test]
async fn unknown_transaction_is_empty_200() {
    let (status, body) = get(app(), "/match-users/t999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"users": [], "total_number_of_matches": 0})
    );
}

#[tokio::test]
async fn search_similar_descriptions_returns_scored_transactions() {
    let (status, body) = get(app(), "/search-similar-descriptions?query=salary%20payment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_number_of_tokens_used"], 2);

    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions[0]["id"], "t2");
    for tx in transactions {
        let score = tx["embedding"].as_f64().unwrap();
        assert!(score > 0.3 && score <= 1.0);
    }
}

#[tokio::test]
async fn missing_or_empty_query_is_422() {
    for uri in [
        "/search-similar-descriptions",
        "/search-similar-descriptions?query=",
    ] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

struct Unavailable;

#[async_trait]
impl EmbeddingProvider for Unavailable {
    fn model_name(&self) -> &str {
        "unavailable"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, SemanticError> {
        Err(SemanticError::Request("HTTP error 503".into()))
    }
}

#[tokio::test]
async fn embedding_failure_is_500() {
    let app = app_with(Engine::new(
        store(),
        Arc::new(Unavailable),
        SimilaritySearch::default(),
    ));
    let (status, body) = get(app, "/search-similar-descriptions?query=salary").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "EMBEDDING_ERROR");
}

#[tokio::test]
async fn unreadable_records_are_500() {
    let dir = tempfile::TempDir::new().unwrap();
    let transactions = dir.path().join("transactions.csv");
    std::fs::write(&transactions, b"id,description\nt1,\xff\n").unwrap();
    let engine = Engine::from_config(&EngineConfig {
        users_path: dir.path().join("users.csv"),
        transactions_path: transactions,
        ..Default::default()
    })
    .unwrap();

    let (status, body) = get(app_with(engine), "/match-users/t1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INGEST_ERROR");
}

#[tokio::test]
async fn health_and_readiness() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(app(), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["components"]["record_store"], "pending");
    assert_eq!(body["components"]["embedder"], "ready");
}

#[tokio::test]
async fn readiness_reflects_warm_up() {
    let engine = Engine::new(
        store(),
        Arc::new(HashEmbedder::new(16)),
        SimilaritySearch::default(),
    );
    engine.warm_up().unwrap();
    let (_, body) = get(app_with(engine), "/ready").await;
    assert_eq!(body["components"]["record_store"], "loaded");
}

#[tokio::test]
async fn api_info_lists_endpoints() {
    let (status, body) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Transaction Matching API");
    assert!(body["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "/match-users/{id}"));
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let (status, body) = get(app(), "/api/v1/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn metrics_disabled_without_recorder() {
    let (status, _) = get(app(), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_rendered_with_handle() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let state = ServerState::with_engine(
        ServerConfig::default(),
        Engine::new(
            store(),
            Arc::new(HashEmbedder::new(16)),
            SimilaritySearch::default(),
        ),
    )
    .with_metrics(recorder.handle());
    let app = build_router(Arc::new(state));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");

    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}
