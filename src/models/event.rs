// Summary lifecycle events pushed to /ws/events subscribers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SummaryEvent {
    /// A new summary replaced the current one.
    #[serde(rename_all = "camelCase")]
    Updated { generation: u64, total_threads: u32 },
    /// A reload from disk was rejected; the previous summary stays current.
    #[serde(rename_all = "camelCase")]
    ReloadFailed { error: String },
}
