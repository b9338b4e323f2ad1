use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use threadscope::*;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let (events_tx, _) =
        broadcast::channel::<models::SummaryEvent>(app_config.publishing.broadcast_capacity);
    let summary_repo = Arc::new(summary_repo::SummaryRepo::new(
        app_config.summary.path.as_ref().map(PathBuf::from),
        events_tx,
    ));

    // A bad file at startup is not fatal: uploads still work and the worker retries on change.
    let last_seen = summary_repo.file_modified().await;
    match summary_repo.reload_from_file().await {
        Ok(Some(generation)) => tracing::info!(generation, "initial summary loaded"),
        Ok(None) => tracing::info!("no summary.path configured; waiting for upload"),
        Err(e) => tracing::warn!(error = %e, "initial summary load failed"),
    }

    let ui_bus = ui_state::UiEventBus::new(app_config.publishing.broadcast_capacity);
    let ws_event_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            summary_repo: summary_repo.clone(),
            ws_event_connections: ws_event_connections.clone(),
            reloads_total: Arc::new(AtomicU64::new(0)),
            reload_failures_total: Arc::new(AtomicU64::new(0)),
            last_seen,
            shutdown_rx,
        },
        worker::WorkerConfig {
            reload_interval_secs: app_config.summary.reload_interval_secs,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let app = routes::app(
        summary_repo,
        ui_bus,
        ws_event_connections,
        app_config.clone(),
    );
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
