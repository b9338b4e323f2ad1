// Holds the current validated summary. Loads from disk or upload; publishes SummaryEvent on change.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use tokio::sync::{RwLock, broadcast};
use tracing::instrument;

use crate::error::SummaryError;
use crate::models::{Summary, SummaryEvent};

pub struct SummaryRepo {
    current: RwLock<Option<Arc<Summary>>>,
    generation: AtomicU64,
    path: Option<PathBuf>,
    events: broadcast::Sender<SummaryEvent>,
}

impl SummaryRepo {
    /// Empty repo; `path` (if any) is what [`SummaryRepo::reload_from_file`] reads.
    pub fn new(path: Option<PathBuf>, events: broadcast::Sender<SummaryEvent>) -> Self {
        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            path,
            events,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 0 until the first summary is loaded.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SummaryEvent> {
        self.events.subscribe()
    }

    pub async fn current(&self) -> Option<Arc<Summary>> {
        self.current.read().await.clone()
    }

    /// Installs `summary` as current and notifies subscribers. Returns the new generation.
    #[instrument(skip(self, summary), fields(repo = "summary", operation = "replace", total_threads = summary.total_threads))]
    pub async fn replace(&self, summary: Summary) -> u64 {
        let total_threads = summary.total_threads;
        let generation = {
            let mut guard = self.current.write().await;
            *guard = Some(Arc::new(summary));
            self.generation.fetch_add(1, Ordering::AcqRel) + 1
        };
        if self
            .events
            .send(SummaryEvent::Updated {
                generation,
                total_threads,
            })
            .is_err()
        {
            tracing::debug!("No /ws/events subscribers for summary update");
        }
        tracing::info!(generation, total_threads, "summary updated");
        generation
    }

    /// Validates JSON text and installs it. The current summary is untouched on error.
    pub async fn load_json(&self, json: &str) -> Result<u64, SummaryError> {
        let summary = Summary::from_json(json)?;
        Ok(self.replace(summary).await)
    }

    /// Re-reads the configured file. `Ok(None)` when no path is configured.
    /// A rejected file publishes `ReloadFailed` and keeps the previous summary.
    #[instrument(skip(self), fields(repo = "summary", operation = "reload_from_file"))]
    pub async fn reload_from_file(&self) -> anyhow::Result<Option<u64>> {
        let Some(path) = self.path.as_deref() else {
            return Ok(None);
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("read {}: {}", path.display(), e))?;
        match self.load_json(&json).await {
            Ok(generation) => Ok(Some(generation)),
            Err(e) => {
                let _ = self.events.send(SummaryEvent::ReloadFailed {
                    error: e.to_string(),
                });
                Err(anyhow::Error::new(e).context(format!("invalid summary in {}", path.display())))
            }
        }
    }

    /// Modification time of the configured file, if there is one and it exists.
    pub async fn file_modified(&self) -> Option<SystemTime> {
        let path = self.path.as_deref()?;
        tokio::fs::metadata(path).await.ok()?.modified().ok()
    }
}
