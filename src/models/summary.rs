// Thread-dump summary: the one payload everything else is derived from.
// Deserialized through RawSummary and validated once; downstream code trusts it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ThreadRecord, ThreadState};
use crate::error::SummaryError;

/// Per-state tallies as reported upstream (or recomputed from `threads`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCounts {
    pub runnable: u32,
    pub waiting: u32,
    pub blocked: u32,
    pub timed_waiting: u32,
    #[serde(default)]
    pub other: u32,
}

impl StateCounts {
    pub fn from_threads(threads: &[ThreadRecord]) -> Self {
        let mut counts = StateCounts::default();
        for t in threads {
            match t.state {
                ThreadState::Runnable => counts.runnable += 1,
                ThreadState::Waiting => counts.waiting += 1,
                ThreadState::Blocked => counts.blocked += 1,
                ThreadState::TimedWaiting => counts.timed_waiting += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadlock {
    pub threads: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Wire shape accepted at the boundary; optional sections may be missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSummary {
    total_threads: u32,
    daemon_count: u32,
    non_daemon_count: u32,
    #[serde(default)]
    state_counts: Option<StateCounts>,
    threads: Vec<ThreadRecord>,
    #[serde(default)]
    deadlocks: Vec<Deadlock>,
    #[serde(default)]
    stuck_threads: Vec<String>,
    #[serde(default)]
    captured_at: Option<String>,
    #[serde(default)]
    jvm_version: Option<String>,
}

/// Validated summary. Build it with [`Summary::from_json`] or [`Summary::from_threads`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSummary")]
pub struct Summary {
    pub total_threads: u32,
    pub daemon_count: u32,
    pub non_daemon_count: u32,
    pub state_counts: StateCounts,
    pub threads: Vec<ThreadRecord>,
    pub deadlocks: Vec<Deadlock>,
    pub stuck_threads: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_version: Option<String>,
}

impl Summary {
    /// Parse and validate a summary from JSON text.
    pub fn from_json(s: &str) -> Result<Self, SummaryError> {
        let raw: RawSummary = serde_json::from_str(s)?;
        Self::try_from(raw)
    }

    /// Summary whose counts are derived from the given threads (no deadlocks or stuck threads).
    pub fn from_threads(threads: Vec<ThreadRecord>) -> Self {
        let daemon_count = threads.iter().filter(|t| t.daemon).count() as u32;
        let total_threads = threads.len() as u32;
        Self {
            total_threads,
            daemon_count,
            non_daemon_count: total_threads - daemon_count,
            state_counts: StateCounts::from_threads(&threads),
            threads,
            deadlocks: Vec::new(),
            stuck_threads: Vec::new(),
            captured_at: None,
            jvm_version: None,
        }
    }

    pub fn validate(&self) -> Result<(), SummaryError> {
        if self.daemon_count as u64 + self.non_daemon_count as u64 != self.total_threads as u64 {
            return Err(SummaryError::DaemonMismatch {
                daemon: self.daemon_count,
                non_daemon: self.non_daemon_count,
                total: self.total_threads,
            });
        }
        if (self.total_threads as usize) < self.threads.len() {
            return Err(SummaryError::ThreadCountMismatch {
                total: self.total_threads,
                listed: self.threads.len(),
            });
        }
        let mut names: HashSet<&str> = HashSet::with_capacity(self.threads.len());
        for (index, t) in self.threads.iter().enumerate() {
            if t.name.trim().is_empty() {
                return Err(SummaryError::EmptyThreadName { index });
            }
            if !(1..=10).contains(&t.priority) {
                return Err(SummaryError::InvalidPriority {
                    name: t.name.clone(),
                    priority: t.priority,
                });
            }
            if !names.insert(t.name.as_str()) {
                return Err(SummaryError::DuplicateThread(t.name.clone()));
            }
        }
        let referenced = self
            .deadlocks
            .iter()
            .flat_map(|d| d.threads.iter())
            .chain(self.stuck_threads.iter());
        for name in referenced {
            if !names.contains(name.as_str()) {
                return Err(SummaryError::UnknownThread(name.clone()));
            }
        }
        Ok(())
    }

    pub fn thread(&self, name: &str) -> Option<&ThreadRecord> {
        self.threads.iter().find(|t| t.name == name)
    }
}

impl TryFrom<RawSummary> for Summary {
    type Error = SummaryError;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        let state_counts = raw
            .state_counts
            .unwrap_or_else(|| StateCounts::from_threads(&raw.threads));
        let summary = Summary {
            total_threads: raw.total_threads,
            daemon_count: raw.daemon_count,
            non_daemon_count: raw.non_daemon_count,
            state_counts,
            threads: raw.threads,
            deadlocks: raw.deadlocks,
            stuck_threads: raw.stuck_threads,
            captured_at: raw.captured_at,
            jvm_version: raw.jvm_version,
        };
        summary.validate()?;
        Ok(summary)
    }
}
