use serde::Deserialize;

use crate::pool::sampler::DEFAULT_MAX_MEMORY_MB;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Summary JSON loaded at startup and watched for changes. Without it, summaries arrive via upload only.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            path: None,
            reload_interval_secs: default_reload_interval_secs(),
        }
    }
}

fn default_reload_interval_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryMode {
    Seeded,
    ThreadTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_mode")]
    pub mode: TelemetryMode,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_max_memory_mb")]
    pub max_memory_mb: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            mode: default_telemetry_mode(),
            seed: 0,
            max_memory_mb: default_max_memory_mb(),
        }
    }
}

fn default_telemetry_mode() -> TelemetryMode {
    TelemetryMode::Seeded
}

fn default_max_memory_mb() -> f64 {
    DEFAULT_MAX_MEMORY_MB
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Rows shown while a table is collapsed ("show more" toggles the rest).
    #[serde(default = "default_collapsed_rows")]
    pub collapsed_rows: usize,
    #[serde(default = "default_cpu_intensive_limit")]
    pub cpu_intensive_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            collapsed_rows: default_collapsed_rows(),
            cpu_intensive_limit: default_cpu_intensive_limit(),
        }
    }
}

fn default_page_size() -> usize {
    25
}

fn default_max_page_size() -> usize {
    500
}

fn default_collapsed_rows() -> usize {
    10
}

fn default_cpu_intensive_limit() -> usize {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of summary events kept in the broadcast channel for /ws/events (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (ws clients, reloads) at INFO level.
    pub stats_log_interval_secs: u64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        if let Some(path) = &self.summary.path {
            anyhow::ensure!(!path.is_empty(), "summary.path must be non-empty when set");
        }
        anyhow::ensure!(
            self.summary.reload_interval_secs > 0,
            "summary.reload_interval_secs must be > 0, got {}",
            self.summary.reload_interval_secs
        );
        anyhow::ensure!(
            self.telemetry.max_memory_mb.is_finite() && self.telemetry.max_memory_mb >= 0.0,
            "telemetry.max_memory_mb must be a finite value >= 0, got {}",
            self.telemetry.max_memory_mb
        );
        anyhow::ensure!(
            self.dashboard.max_page_size > 0,
            "dashboard.max_page_size must be > 0, got {}",
            self.dashboard.max_page_size
        );
        anyhow::ensure!(
            (1..=self.dashboard.max_page_size).contains(&self.dashboard.default_page_size),
            "dashboard.default_page_size must be between 1 and max_page_size ({}), got {}",
            self.dashboard.max_page_size,
            self.dashboard.default_page_size
        );
        anyhow::ensure!(
            self.dashboard.collapsed_rows > 0,
            "dashboard.collapsed_rows must be > 0, got {}",
            self.dashboard.collapsed_rows
        );
        anyhow::ensure!(
            self.dashboard.cpu_intensive_limit > 0,
            "dashboard.cpu_intensive_limit must be > 0, got {}",
            self.dashboard.cpu_intensive_limit
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        Ok(())
    }
}
