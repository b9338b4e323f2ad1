// Overview tab: metric cards and chart series

use serde::Serialize;

use super::dependencies::detect_deadlocks;
use crate::models::{PoolRow, Summary, ThreadState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: u32,
    pub percent_of_total: f64,
}

/// One slice/bar/point of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub label: String,
    pub value: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub cards: Vec<MetricCard>,
    pub state_distribution: Vec<SeriesPoint>,
    pub daemon_split: Vec<SeriesPoint>,
    pub priority_histogram: Vec<SeriesPoint>,
    pub pool_distribution: Vec<SeriesPoint>,
    pub health_score: f64,
}

const DEADLOCK_PENALTY: f64 = 20.0;
const STUCK_THREAD_PENALTY: f64 = 5.0;

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn point(label: impl Into<String>, value: u32, whole: u32) -> SeriesPoint {
    SeriesPoint {
        label: label.into(),
        value,
        percent: percent(value, whole),
    }
}

pub fn overview(summary: &Summary, pools: &[PoolRow]) -> Overview {
    let total = summary.total_threads;
    let sc = summary.state_counts;
    let deadlocks = detect_deadlocks(summary).len() as u32;
    let stuck = summary.stuck_threads.len() as u32;

    let card = |key, label, value| MetricCard {
        key,
        label,
        value,
        percent_of_total: percent(value, total),
    };
    let cards = vec![
        card("total", "Total Threads", total),
        card("daemon", "Daemon Threads", summary.daemon_count),
        card("nonDaemon", "Non-Daemon Threads", summary.non_daemon_count),
        card("runnable", "Runnable", sc.runnable),
        card("waiting", "Waiting", sc.waiting),
        card("timedWaiting", "Timed Waiting", sc.timed_waiting),
        card("blocked", "Blocked", sc.blocked),
        card("deadlocks", "Deadlocks", deadlocks),
        card("stuck", "Stuck Threads", stuck),
        MetricCard {
            key: "pools",
            label: "Thread Pools",
            value: pools.len() as u32,
            percent_of_total: 0.0,
        },
    ];

    let state_distribution = [
        (ThreadState::Runnable.label(), sc.runnable),
        (ThreadState::Waiting.label(), sc.waiting),
        (ThreadState::TimedWaiting.label(), sc.timed_waiting),
        (ThreadState::Blocked.label(), sc.blocked),
        ("Other", sc.other),
    ]
    .into_iter()
    .filter(|(_, v)| *v > 0)
    .map(|(label, v)| point(label, v, total))
    .collect();

    let daemon_split = vec![
        point("Daemon", summary.daemon_count, total),
        point("Non-Daemon", summary.non_daemon_count, total),
    ];

    let listed = summary.threads.len() as u32;
    let mut by_priority = [0u32; 10];
    for t in &summary.threads {
        by_priority[(t.priority.clamp(1, 10) - 1) as usize] += 1;
    }
    let priority_histogram = by_priority
        .iter()
        .enumerate()
        .map(|(i, v)| point((i + 1).to_string(), *v, listed))
        .collect();

    let pool_distribution = pools
        .iter()
        .map(|p| point(p.name.clone(), p.count, listed))
        .collect();

    let health_score = health_score(deadlocks, stuck, percent(sc.blocked, total));

    Overview {
        cards,
        state_distribution,
        daemon_split,
        priority_histogram,
        pool_distribution,
        health_score,
    }
}

/// 100, minus penalties for deadlocks, stuck threads and half the blocked percentage; clamped to 0..=100.
pub fn health_score(deadlocks: u32, stuck: u32, blocked_percent: f64) -> f64 {
    let score = 100.0
        - DEADLOCK_PENALTY * deadlocks as f64
        - STUCK_THREAD_PENALTY * stuck as f64
        - blocked_percent / 2.0;
    score.clamp(0.0, 100.0)
}
