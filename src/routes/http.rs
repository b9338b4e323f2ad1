// JSON handlers: summary upload, dashboard data, drill-downs, export, refresh, UI reducer

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use super::AppState;
use crate::dashboard::{self, RowLimit, ThreadQuery};
use crate::error::ApiError;
use crate::models::{PoolRow, Summary};
use crate::pool::pools_for;
use crate::report;
use crate::ui_state::{UiAction, UiEvent, UiState, reduce};
use crate::version::{NAME, VERSION};

impl AppState {
    async fn summary(&self) -> Result<Arc<Summary>, ApiError> {
        self.summary_repo.current().await.ok_or(ApiError::NoSummary)
    }

    fn pools(&self, summary: &Summary) -> Vec<PoolRow> {
        pools_for(summary, &self.config.telemetry)
    }
}

/// GET /version: package name and version this binary was built as.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// POST /api/summary: body is the summary JSON; validated before it replaces the current one.
pub(super) async fn upload_summary_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let summary = Summary::from_json(&body)?;
    let total_threads = summary.total_threads;
    let generation = state.summary_repo.replace(summary).await;
    Ok(Json(serde_json::json!({
        "generation": generation,
        "totalThreads": total_threads,
    })))
}

pub(super) async fn overview_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let pools = state.pools(&summary);
    Ok(Json(dashboard::overview(&summary, &pools)))
}

#[derive(Debug, Deserialize)]
pub(super) struct PoolsParams {
    expanded: Option<bool>,
}

/// GET /api/pools: ranked pool rows. `?expanded=false` trims to the collapsed row count.
pub(super) async fn pools_handler(
    State(state): State<AppState>,
    Query(params): Query<PoolsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let mut pools = state.pools(&summary);
    if let Some(expanded) = params.expanded {
        let limit = RowLimit {
            collapsed_rows: state.config.dashboard.collapsed_rows,
            expanded,
        };
        pools.truncate(limit.visible(&pools).len());
    }
    Ok(Json(pools))
}

pub(super) async fn threads_handler(
    State(state): State<AppState>,
    Query(query): Query<ThreadQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let dash = &state.config.dashboard;
    Ok(Json(dashboard::query_threads(
        &summary,
        &query,
        dash.default_page_size,
        dash.max_page_size,
    )))
}

#[derive(Debug, Deserialize)]
pub(super) struct ThreadName {
    name: String,
}

/// GET /api/thread?name=: one thread with its stack trace. Names may contain '/', hence a query param.
pub(super) async fn thread_detail_handler(
    State(state): State<AppState>,
    Query(ThreadName { name }): Query<ThreadName>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let thread = dashboard::find_thread(&summary, &name)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("thread {:?}", name)))?;
    Ok(Json(thread))
}

#[derive(Debug, Deserialize)]
pub(super) struct LimitParams {
    limit: Option<usize>,
}

pub(super) async fn cpu_intensive_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let limit = params
        .limit
        .unwrap_or(state.config.dashboard.cpu_intensive_limit);
    Ok(Json(dashboard::cpu_intensive(&summary, limit)))
}

pub(super) async fn gc_threads_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    Ok(Json(dashboard::gc_threads(&summary)))
}

pub(super) async fn finalizers_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    Ok(Json(dashboard::finalizer_threads(&summary)))
}

pub(super) async fn stuck_threads_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    Ok(Json(dashboard::stuck_threads(&summary)))
}

pub(super) async fn dependencies_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    Ok(Json(dashboard::dependency_chains(&summary)))
}

pub(super) async fn deadlocks_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    Ok(Json(dashboard::detect_deadlocks(&summary)))
}

/// GET /api/export: pretty JSON report, served as a download.
pub(super) async fn export_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.summary().await?;
    let pools = state.pools(&summary);
    let export = report::export(&summary, pools, chrono::Utc::now());
    let body = report::export_json(&export)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"thread-report.json\"",
            ),
        ],
        body,
    ))
}

/// POST /api/refresh: re-reads the summary file (if configured) and answers once it is loaded.
pub(super) async fn refresh_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let reloaded = state.summary_repo.reload_from_file().await?;
    Ok(Json(serde_json::json!({
        "generation": state.summary_repo.generation(),
        "reloaded": reloaded.is_some(),
    })))
}

#[derive(Debug, Deserialize)]
pub(super) struct UiReduceRequest {
    #[serde(default)]
    state: Option<UiState>,
    action: UiAction,
}

/// POST /api/ui/reduce: applies one UI action; scroll requests are also published to /ws/events.
pub(super) async fn ui_reduce_handler(
    State(state): State<AppState>,
    Json(req): Json<UiReduceRequest>,
) -> impl IntoResponse {
    let current = req
        .state
        .unwrap_or_else(|| UiState::new(state.config.dashboard.collapsed_rows));
    if let UiAction::ScrollToThreads { thread } = &req.action {
        let receivers = state.ui_bus.publish(UiEvent::ScrollToThreadView {
            thread: thread.clone(),
        });
        tracing::debug!(receivers, "scroll-to-thread published");
    }
    Json(reduce(current, req.action))
}
