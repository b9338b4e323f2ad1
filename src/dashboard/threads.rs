// Threads table (filter + paginate) and the drill-down lists behind the modals

use serde::{Deserialize, Serialize};

use crate::models::{Summary, ThreadRecord, ThreadState};
use crate::pool::classifier::{GC_POOL, classify};

/// Frames a RUNNABLE thread sits in while actually idle (blocked in native I/O or parked).
const IDLE_NATIVE_FRAMES: &[&str] = &[
    "socketRead",
    "socketAccept",
    "SocketDispatcher.read",
    "ServerSocketChannelImpl.accept",
    "EPoll.wait",
    "epollWait",
    "KQueue.poll",
    "kevent0",
    "Net.poll",
    "Unsafe.park",
    "WindowsSelectorImpl",
];

const GC_NAME_MARKERS: &[&str] = &["G1 ", "Parallel GC", "ConcurrentMark"];
const FINALIZER_NAME_MARKERS: &[&str] = &["Finalizer", "Reference Handler"];

/// Filters and paging for the threads table; every field is optional on the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ThreadState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daemon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<usize>,
}

impl ThreadQuery {
    pub fn matches(&self, thread: &ThreadRecord) -> bool {
        if let Some(state) = self.state
            && thread.state != state
        {
            return false;
        }
        if let Some(daemon) = self.daemon
            && thread.daemon != daemon
        {
            return false;
        }
        if let Some(pool) = &self.pool
            && classify(&thread.name) != pool.as_str()
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => thread.matches_lowercase(&s.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// 1-based page of `items`. Page 0 reads as page 1; `per_page` is clamped to `1..=max_per_page`.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize, max_per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, max_per_page.max(1));
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let start = (page - 1).saturating_mul(per_page);
    let items = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();
    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

pub fn query_threads(
    summary: &Summary,
    query: &ThreadQuery,
    default_per_page: usize,
    max_per_page: usize,
) -> Page<ThreadRecord> {
    let matched: Vec<ThreadRecord> = summary
        .threads
        .iter()
        .filter(|t| query.matches(t))
        .cloned()
        .collect();
    paginate(
        &matched,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(default_per_page),
        max_per_page,
    )
}

/// "Show more / show fewer" state for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLimit {
    pub collapsed_rows: usize,
    pub expanded: bool,
}

impl RowLimit {
    pub fn collapsed(rows: usize) -> Self {
        Self {
            collapsed_rows: rows,
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.expanded {
            items
        } else {
            &items[..items.len().min(self.collapsed_rows)]
        }
    }
}

pub fn find_thread<'a>(summary: &'a Summary, name: &str) -> Option<&'a ThreadRecord> {
    summary.thread(name)
}

fn is_idle_native(thread: &ThreadRecord) -> bool {
    thread
        .top_frame()
        .is_some_and(|f| IDLE_NATIVE_FRAMES.iter().any(|m| f.contains(m)))
}

/// RUNNABLE threads doing real work, busiest first (cpu time, then stack depth).
pub fn cpu_intensive(summary: &Summary, limit: usize) -> Vec<ThreadRecord> {
    let mut busy: Vec<&ThreadRecord> = summary
        .threads
        .iter()
        .filter(|t| t.state == ThreadState::Runnable && !is_idle_native(t))
        .collect();
    busy.sort_by(|a, b| {
        b.cpu_time_ms
            .cmp(&a.cpu_time_ms)
            .then_with(|| b.stack_trace.len().cmp(&a.stack_trace.len()))
    });
    busy.into_iter().take(limit).cloned().collect()
}

pub fn gc_threads(summary: &Summary) -> Vec<ThreadRecord> {
    summary
        .threads
        .iter()
        .filter(|t| classify(&t.name) == GC_POOL || GC_NAME_MARKERS.iter().any(|m| t.name.contains(m)))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizerThread {
    #[serde(flatten)]
    pub thread: ThreadRecord,
    /// Blocked or waiting on a lock: finalization may be stalled.
    pub suspicious: bool,
}

pub fn finalizer_threads(summary: &Summary) -> Vec<FinalizerThread> {
    summary
        .threads
        .iter()
        .filter(|t| FINALIZER_NAME_MARKERS.iter().any(|m| t.name.contains(m)))
        .map(|t| FinalizerThread {
            suspicious: matches!(t.state, ThreadState::Blocked | ThreadState::Waiting)
                && t.waiting_on.is_some(),
            thread: t.clone(),
        })
        .collect()
}

pub fn stuck_threads(summary: &Summary) -> Vec<ThreadRecord> {
    summary
        .stuck_threads
        .iter()
        .filter_map(|name| summary.thread(name))
        .cloned()
        .collect()
}
