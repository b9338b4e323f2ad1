// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::summary_repo::SummaryRepo;
use crate::ui_state::UiEventBus;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) summary_repo: Arc<SummaryRepo>,
    pub(crate) ui_bus: UiEventBus,
    pub(crate) ws_event_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    summary_repo: Arc<SummaryRepo>,
    ui_bus: UiEventBus,
    ws_event_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        summary_repo,
        ui_bus,
        ws_event_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "threadscope: thread-dump analyzer" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/summary", post(http::upload_summary_handler)) // POST /api/summary
        .route("/api/overview", get(http::overview_handler)) // GET /api/overview
        .route("/api/pools", get(http::pools_handler)) // GET /api/pools
        .route("/api/threads", get(http::threads_handler)) // GET /api/threads
        .route("/api/thread", get(http::thread_detail_handler)) // GET /api/thread?name=
        .route("/api/threads/cpu-intensive", get(http::cpu_intensive_handler))
        .route("/api/threads/gc", get(http::gc_threads_handler))
        .route("/api/threads/finalizers", get(http::finalizers_handler))
        .route("/api/threads/stuck", get(http::stuck_threads_handler))
        .route("/api/dependencies", get(http::dependencies_handler)) // GET /api/dependencies
        .route("/api/deadlocks", get(http::deadlocks_handler)) // GET /api/deadlocks
        .route("/api/export", get(http::export_handler)) // GET /api/export
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .route("/api/ui/reduce", post(http::ui_reduce_handler)) // POST /api/ui/reduce
        .route("/ws/events", get(ws::ws_events)) // WS /ws/events
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
