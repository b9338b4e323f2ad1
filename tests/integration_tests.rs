// Integration tests: HTTP and WebSocket endpoints

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::SAMPLE_JSON;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use threadscope::config::AppConfig;
use threadscope::routes;
use threadscope::summary_repo::SummaryRepo;
use threadscope::ui_state::UiEventBus;
use tokio::sync::broadcast;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[telemetry]
mode = "seeded"
seed = 7

[dashboard]
default_page_size = 2
max_page_size = 50
collapsed_rows = 1

[publishing]
broadcast_capacity = 10

[monitoring]
stats_log_interval_secs = 60
"#;

fn test_app() -> (axum::Router, Arc<SummaryRepo>) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let (tx, _) = broadcast::channel(config.publishing.broadcast_capacity);
    let repo = Arc::new(SummaryRepo::new(None, tx));
    let app = routes::app(
        repo.clone(),
        UiEventBus::new(config.publishing.broadcast_capacity),
        Arc::new(AtomicUsize::new(0)),
        config,
    );
    (app, repo)
}

fn test_server() -> TestServer {
    TestServer::new(test_app().0)
}

async fn loaded_server() -> TestServer {
    let server = test_server();
    server
        .post("/api/summary")
        .text(SAMPLE_JSON)
        .await
        .assert_status_ok();
    server
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("threadscope: thread-dump analyzer");
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("threadscope")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_data_routes_404_before_upload() {
    let server = test_server();
    for path in [
        "/api/overview",
        "/api/pools",
        "/api/threads",
        "/api/deadlocks",
        "/api/export",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let json: serde_json::Value = response.json();
        assert_eq!(json["error"], "no summary loaded", "{}", path);
    }
}

#[tokio::test]
async fn test_invalid_upload_is_400() {
    let server = test_server();
    let response = server
        .post("/api/summary")
        .text(r#"{ "totalThreads": 3, "daemonCount": 1, "nonDaemonCount": 1, "threads": [] }"#)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("daemon"));

    server
        .post("/api/summary")
        .text("not json")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/overview")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_returns_generation() {
    let server = test_server();
    let json: serde_json::Value = server.post("/api/summary").text(SAMPLE_JSON).await.json();
    assert_eq!(json["generation"], 1);
    assert_eq!(json["totalThreads"], 4);
}

#[tokio::test]
async fn test_upload_reports_its_own_thread_count() {
    let server = loaded_server().await;
    let single = r#"{ "totalThreads": 1, "daemonCount": 0, "nonDaemonCount": 1,
        "threads": [ { "name": "main", "state": "RUNNABLE", "priority": 5, "daemon": false } ] }"#;
    let json: serde_json::Value = server.post("/api/summary").text(single).await.json();
    assert_eq!(json["generation"], 2);
    assert_eq!(json["totalThreads"], 1);

    let json: serde_json::Value = server.post("/api/summary").text(SAMPLE_JSON).await.json();
    assert_eq!(json["generation"], 3);
    assert_eq!(json["totalThreads"], 4);
}

#[tokio::test]
async fn test_duplicate_thread_names_are_rejected() {
    let server = test_server();
    let dup = r#"{ "totalThreads": 2, "daemonCount": 0, "nonDaemonCount": 2, "threads": [
        { "name": "w", "state": "RUNNABLE", "priority": 5, "daemon": false },
        { "name": "w", "state": "WAITING", "priority": 5, "daemon": false } ] }"#;
    let response = server.post("/api/summary").text(dup).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("more than once"));
}

#[tokio::test]
async fn test_pools_honor_row_limit() {
    let server = loaded_server().await;
    let all: serde_json::Value = server.get("/api/pools").await.json();
    assert_eq!(all.as_array().unwrap().len(), 3);

    let collapsed: serde_json::Value = server
        .get("/api/pools")
        .add_query_param("expanded", false)
        .await
        .json();
    assert_eq!(collapsed.as_array().unwrap().len(), 1);
    assert_eq!(collapsed[0]["name"], "HTTP Worker Pool");

    let expanded: serde_json::Value = server
        .get("/api/pools")
        .add_query_param("expanded", true)
        .await
        .json();
    assert_eq!(expanded, all);
}

#[tokio::test]
async fn test_lowercase_state_counts_as_unknown() {
    let server = test_server();
    let json = r#"{ "totalThreads": 1, "daemonCount": 0, "nonDaemonCount": 1,
        "threads": [ { "name": "ExecuteThread: '0'", "state": "runnable", "priority": 5, "daemon": false } ] }"#;
    server.post("/api/summary").text(json).await.assert_status_ok();
    let pools: serde_json::Value = server.get("/api/pools").await.json();
    assert_eq!(pools[0]["stateCounts"]["running"], 0);
    assert_eq!(pools[0]["utilizationPercent"], 0.0);
}

#[tokio::test]
async fn test_pools_are_ranked_and_stable() {
    let server = loaded_server().await;
    let first: serde_json::Value = server.get("/api/pools").await.json();
    let rows = first.as_array().unwrap();
    assert_eq!(rows[0]["name"], "HTTP Worker Pool");
    assert_eq!(rows[0]["rank"], 1);
    assert_eq!(rows[0]["count"], 2);
    let total: u64 = rows.iter().map(|r| r["count"].as_u64().unwrap()).sum();
    assert_eq!(total, 4);

    let second: serde_json::Value = server.get("/api/pools").await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_overview_endpoint() {
    let server = loaded_server().await;
    let json: serde_json::Value = server.get("/api/overview").await.json();
    let cards = json["cards"].as_array().unwrap();
    let total = cards.iter().find(|c| c["key"] == "total").unwrap();
    assert_eq!(total["value"], 4);
    assert_eq!(json["healthScore"], 50.0);
}

#[tokio::test]
async fn test_threads_paginate_with_configured_default() {
    let server = loaded_server().await;
    let json: serde_json::Value = server.get("/api/threads").await.json();
    assert_eq!(json["perPage"], 2);
    assert_eq!(json["totalItems"], 4);
    assert_eq!(json["totalPages"], 2);

    let json: serde_json::Value = server
        .get("/api/threads")
        .add_query_param("state", "BLOCKED")
        .await
        .json();
    assert_eq!(json["totalItems"], 2);

    let json: serde_json::Value = server
        .get("/api/threads")
        .add_query_param("search", "billing")
        .await
        .json();
    assert_eq!(json["items"][0]["name"], "ExecuteThread: '0'");
}

#[tokio::test]
async fn test_thread_detail_by_name() {
    let server = loaded_server().await;
    let response = server
        .get("/api/thread")
        .add_query_param("name", "ExecuteThread: '0'")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["stackTrace"][0], "com.acme.Billing.compute(Billing.java:42)");

    server
        .get("/api/thread")
        .add_query_param("name", "nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_drill_down_lists() {
    let server = loaded_server().await;

    let cpu: serde_json::Value = server.get("/api/threads/cpu-intensive").await.json();
    assert_eq!(cpu.as_array().unwrap().len(), 1);
    assert_eq!(cpu[0]["name"], "ExecuteThread: '0'");

    let finalizers: serde_json::Value = server.get("/api/threads/finalizers").await.json();
    assert_eq!(finalizers[0]["name"], "Finalizer");

    let stuck: serde_json::Value = server.get("/api/threads/stuck").await.json();
    assert_eq!(stuck[0]["name"], "ExecuteThread: '1'");

    let gc: serde_json::Value = server.get("/api/threads/gc").await.json();
    assert!(gc.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dependencies_and_deadlocks() {
    let server = loaded_server().await;
    let deadlocks: serde_json::Value = server.get("/api/deadlocks").await.json();
    assert_eq!(deadlocks.as_array().unwrap().len(), 1);
    assert_eq!(
        deadlocks[0]["threads"],
        serde_json::json!(["ExecuteThread: '1'", "Scheduler-1"])
    );

    let chains: serde_json::Value = server.get("/api/dependencies").await.json();
    assert!(chains.as_array().unwrap().iter().any(|c| c["cycle"] == true));
}

#[tokio::test]
async fn test_export_is_a_download() {
    let server = loaded_server().await;
    let response = server.get("/api/export").await;
    response.assert_status_ok();
    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains("thread-report.json"));
    let json: serde_json::Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(json["jvmVersion"], "1.8.0_392");
    assert!(json["generator"].as_str().unwrap().starts_with("threadscope "));
    assert_eq!(json["deadlocks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_without_file_is_noop() {
    let server = loaded_server().await;
    let json: serde_json::Value = server.post("/api/refresh").await.json();
    assert_eq!(json["reloaded"], false);
    assert_eq!(json["generation"], 1);
}

#[tokio::test]
async fn test_ui_reduce_endpoint() {
    let server = test_server();
    let json: serde_json::Value = server
        .post("/api/ui/reduce")
        .json(&serde_json::json!({ "action": { "action": "openModal", "modal": { "kind": "cpuIntensive" } } }))
        .await
        .json();
    assert_eq!(json["view"], "overview");
    assert_eq!(json["modal"]["kind"], "cpuIntensive");

    let json: serde_json::Value = server
        .post("/api/ui/reduce")
        .json(&serde_json::json!({
            "state": json,
            "action": { "action": "closeModal" }
        }))
        .await
        .json();
    assert!(json["modal"].is_null());
}

// --- WebSocket tests (require http_transport + ws feature) ---

/// Receive until a JSON text frame with the given `type` arrives.
async fn receive_json_of_type(ws: &mut axum_test::TestWebSocket, kind: &str) -> serde_json::Value {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(3);
    loop {
        let text = ws.receive_text().await;
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(&text)
            && v["type"] == kind
        {
            return v;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {}",
            kind
        );
    }
}

#[tokio::test]
async fn test_ws_events_reports_updates() {
    let (app, _) = test_app();
    let server = TestServer::builder().http_transport().build(app);
    let mut ws = server.get_websocket("/ws/events").await.into_websocket().await;

    let welcome = receive_json_of_type(&mut ws, "info").await;
    assert_eq!(welcome["generation"], 0);

    server
        .post("/api/summary")
        .text(SAMPLE_JSON)
        .await
        .assert_status_ok();
    let updated = receive_json_of_type(&mut ws, "updated").await;
    assert_eq!(updated["generation"], 1);
    assert_eq!(updated["totalThreads"], 4);
}

#[tokio::test]
async fn test_ws_events_relays_scroll_requests() {
    let (app, _) = test_app();
    let server = TestServer::builder().http_transport().build(app);
    let mut ws = server.get_websocket("/ws/events").await.into_websocket().await;
    receive_json_of_type(&mut ws, "info").await;

    server
        .post("/api/ui/reduce")
        .json(&serde_json::json!({ "action": { "action": "scrollToThreads", "thread": "main" } }))
        .await
        .assert_status_ok();
    let event = receive_json_of_type(&mut ws, "scrollToThreadView").await;
    assert_eq!(event["thread"], "main");
}
