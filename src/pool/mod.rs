// Thread-pool classification and aggregation

pub mod aggregator;
pub mod classifier;
pub mod sampler;

pub use aggregator::{PoolBucket, aggregate, bucket_threads};
pub use classifier::classify;
pub use sampler::{FixedSampler, SeededSampler, ThreadTimeSampler, UsageSampler};

use crate::config::{TelemetryConfig, TelemetryMode};
use crate::models::{PoolRow, Summary};

/// Pool rows for a summary, with the sampler chosen by config.
/// A fresh seeded sampler per call keeps rows identical for an unchanged summary.
pub fn pools_for(summary: &Summary, telemetry: &TelemetryConfig) -> Vec<PoolRow> {
    match telemetry.mode {
        TelemetryMode::Seeded => {
            let mut sampler = SeededSampler::new(telemetry.seed, telemetry.max_memory_mb);
            aggregate(&summary.threads, &mut sampler)
        }
        TelemetryMode::ThreadTime => {
            let mut sampler = ThreadTimeSampler::for_threads(&summary.threads);
            aggregate(&summary.threads, &mut sampler)
        }
    }
}
