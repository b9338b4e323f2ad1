// Pool rows: one per thread pool, derived fresh on every aggregation pass

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
}

impl PriorityLabel {
    /// `>= 8` High, `>= 5` Medium, else Low.
    pub fn from_avg_priority(avg: f64) -> Self {
        if avg >= 8.0 {
            PriorityLabel::High
        } else if avg >= 5.0 {
            PriorityLabel::Medium
        } else {
            PriorityLabel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStateCounts {
    pub running: u32,
    pub waiting: u32,
    pub blocked: u32,
    pub timed_waiting: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRow {
    pub rank: u32,
    pub name: String,
    pub count: u32,
    pub avg_cpu_usage: f64,
    pub avg_memory_usage: f64,
    pub utilization_percent: f64,
    pub priority_label: PriorityLabel,
    pub state_counts: PoolStateCounts,
}
