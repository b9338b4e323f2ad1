// JSON export of the dashboard: overview cards, pools and deadlocks in one document

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::{MetricCard, detect_deadlocks, overview};
use crate::models::{Deadlock, PoolRow, Summary};
use crate::version::{NAME, VERSION};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    pub generated_at: String,
    pub generator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm_version: Option<String>,
    pub health_score: f64,
    pub cards: Vec<MetricCard>,
    pub pools: Vec<PoolRow>,
    pub deadlocks: Vec<Deadlock>,
}

pub fn export(summary: &Summary, pools: Vec<PoolRow>, generated_at: DateTime<Utc>) -> ReportExport {
    let ov = overview(summary, &pools);
    ReportExport {
        generated_at: generated_at.to_rfc3339(),
        generator: format!("{} {}", NAME, VERSION),
        captured_at: summary.captured_at.clone(),
        jvm_version: summary.jvm_version.clone(),
        health_score: ov.health_score,
        cards: ov.cards,
        pools,
        deadlocks: detect_deadlocks(summary),
    }
}

pub fn export_json(report: &ReportExport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
