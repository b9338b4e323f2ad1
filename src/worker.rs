// Background refresh worker: watches the summary file and reloads it on change.
// Also logs app stats on a fixed real-time interval.

use crate::summary_repo::SummaryRepo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Repos, counters, and shutdown for the worker.
pub struct WorkerDeps {
    pub summary_repo: Arc<SummaryRepo>,
    pub ws_event_connections: Arc<AtomicUsize>,
    pub reloads_total: Arc<AtomicU64>,
    pub reload_failures_total: Arc<AtomicU64>,
    /// Mtime of the file as loaded at startup, so the first tick does not reload it again.
    pub last_seen: Option<SystemTime>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub reload_interval_secs: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Reloads when the file's mtime differs from `last_seen`. Returns the mtime now considered seen.
/// A failed reload still records the mtime so a bad file is not retried every tick.
pub async fn reload_if_changed(
    repo: &SummaryRepo,
    last_seen: Option<SystemTime>,
    reloads_total: &AtomicU64,
    reload_failures_total: &AtomicU64,
) -> Option<SystemTime> {
    let modified = repo.file_modified().await;
    if modified.is_none() || modified == last_seen {
        return last_seen;
    }
    match repo.reload_from_file().await {
        Ok(Some(generation)) => {
            reloads_total.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(operation = "reload_summary", generation, "summary reloaded");
        }
        Ok(None) => {}
        Err(e) => {
            reload_failures_total.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                error = %e,
                operation = "reload_summary",
                "summary reload failed; keeping previous summary"
            );
        }
    }
    modified
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        summary_repo,
        ws_event_connections,
        reloads_total,
        reload_failures_total,
        mut last_seen,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        reload_interval_secs,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", reload_interval_secs);

    tokio::spawn(
        async move {
            let mut reload_tick = interval(Duration::from_secs(reload_interval_secs));
            reload_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = reload_tick.tick() => {
                        last_seen = reload_if_changed(
                            &summary_repo,
                            last_seen,
                            &reloads_total,
                            &reload_failures_total,
                        )
                        .await;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_event_clients = ws_event_connections.load(Ordering::Relaxed),
                            summary_generation = summary_repo.generation(),
                            reloads_total = reloads_total.load(Ordering::Relaxed),
                            reload_failures_total = reload_failures_total.load(Ordering::Relaxed),
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
