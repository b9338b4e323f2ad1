// Single synchronous pass: classify, accumulate per-pool buckets, derive ranked rows.

use std::collections::HashMap;

use super::classifier::classify;
use super::sampler::UsageSampler;
use crate::models::{PoolRow, PoolStateCounts, PriorityLabel, ThreadRecord, ThreadState};

/// Accumulator for one pool; lives only for the duration of [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoolBucket {
    pub name: &'static str,
    pub count: u32,
    pub cpu_usage_sum: f64,
    pub memory_usage_sum: f64,
    pub state_counts: PoolStateCounts,
    pub priority_sum: i64,
}

impl PoolBucket {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            count: 0,
            cpu_usage_sum: 0.0,
            memory_usage_sum: 0.0,
            state_counts: PoolStateCounts::default(),
            priority_sum: 0,
        }
    }

    fn add(&mut self, thread: &ThreadRecord, sampler: &mut dyn UsageSampler) {
        self.count += 1;
        match thread.state {
            ThreadState::Runnable => self.state_counts.running += 1,
            ThreadState::Waiting => self.state_counts.waiting += 1,
            ThreadState::Blocked => self.state_counts.blocked += 1,
            ThreadState::TimedWaiting => self.state_counts.timed_waiting += 1,
            _ => {}
        }
        self.priority_sum += thread.priority as i64;
        self.cpu_usage_sum += sampler.sample_cpu(thread);
        self.memory_usage_sum += sampler.sample_memory(thread);
    }

    /// Row with rank 0; ranks are assigned after sorting. `count` is never 0 here.
    fn into_row(self) -> PoolRow {
        let count = self.count as f64;
        let avg_priority = self.priority_sum as f64 / count;
        PoolRow {
            rank: 0,
            name: self.name.to_string(),
            count: self.count,
            avg_cpu_usage: self.cpu_usage_sum / count,
            avg_memory_usage: self.memory_usage_sum / count,
            utilization_percent: self.state_counts.running as f64 / count * 100.0,
            priority_label: PriorityLabel::from_avg_priority(avg_priority),
            state_counts: self.state_counts,
        }
    }
}

/// Buckets in first-seen order.
pub fn bucket_threads(threads: &[ThreadRecord], sampler: &mut dyn UsageSampler) -> Vec<PoolBucket> {
    let mut index: HashMap<&'static str, usize> = HashMap::new();
    let mut buckets: Vec<PoolBucket> = Vec::new();
    for thread in threads {
        let pool = classify(&thread.name);
        let i = *index.entry(pool).or_insert_with(|| {
            buckets.push(PoolBucket::new(pool));
            buckets.len() - 1
        });
        buckets[i].add(thread, sampler);
    }
    buckets
}

/// Pool rows sorted by thread count descending (ties keep first-seen order), ranked from 1.
pub fn aggregate(threads: &[ThreadRecord], sampler: &mut dyn UsageSampler) -> Vec<PoolRow> {
    let mut rows: Vec<PoolRow> = bucket_threads(threads, sampler)
        .into_iter()
        .map(PoolBucket::into_row)
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
    tracing::debug!(
        operation = "aggregate_pools",
        threads = threads.len(),
        pools = rows.len(),
        "pools aggregated"
    );
    rows
}
