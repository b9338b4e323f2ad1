// Per-thread CPU/memory figures for pool rows.
// Thread dumps carry no usage telemetry, so the source is injectable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::ThreadRecord;

pub const DEFAULT_MAX_MEMORY_MB: f64 = 512.0;

/// Supplies the CPU (percent) and memory (MB) contribution of one thread.
pub trait UsageSampler {
    fn sample_cpu(&mut self, thread: &ThreadRecord) -> f64;
    fn sample_memory(&mut self, thread: &ThreadRecord) -> f64;
}

/// Mock telemetry from a seeded generator; the same seed always yields the same figures.
pub struct SeededSampler {
    rng: SmallRng,
    max_memory_mb: f64,
}

impl SeededSampler {
    pub fn new(seed: u64, max_memory_mb: f64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            max_memory_mb,
        }
    }
}

impl UsageSampler for SeededSampler {
    fn sample_cpu(&mut self, _thread: &ThreadRecord) -> f64 {
        self.rng.random_range(0.0..100.0)
    }

    fn sample_memory(&mut self, _thread: &ThreadRecord) -> f64 {
        if self.max_memory_mb <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(0.0..self.max_memory_mb)
    }
}

/// Constant figures.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler {
    pub cpu: f64,
    pub memory: f64,
}

impl UsageSampler for FixedSampler {
    fn sample_cpu(&mut self, _thread: &ThreadRecord) -> f64 {
        self.cpu
    }

    fn sample_memory(&mut self, _thread: &ThreadRecord) -> f64 {
        self.memory
    }
}

/// Real `cpuTimeMs` from the dump, scaled against the busiest thread. Memory is always 0.
#[derive(Debug, Clone, Copy)]
pub struct ThreadTimeSampler {
    max_cpu_time_ms: u64,
}

impl ThreadTimeSampler {
    pub fn for_threads(threads: &[ThreadRecord]) -> Self {
        let max_cpu_time_ms = threads.iter().filter_map(|t| t.cpu_time_ms).max().unwrap_or(0);
        Self { max_cpu_time_ms }
    }
}

impl UsageSampler for ThreadTimeSampler {
    fn sample_cpu(&mut self, thread: &ThreadRecord) -> f64 {
        match thread.cpu_time_ms {
            Some(ms) if self.max_cpu_time_ms > 0 => ms as f64 / self.max_cpu_time_ms as f64 * 100.0,
            _ => 0.0,
        }
    }

    fn sample_memory(&mut self, _thread: &ThreadRecord) -> f64 {
        0.0
    }
}
