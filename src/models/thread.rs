// Thread records as captured in a parsed thread dump

use serde::{Deserialize, Serialize};

/// JVM thread state; serializes to the `Thread.State` spelling (e.g. "TIMED_WAITING").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadState {
    New,
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    Terminated,
    #[serde(other)]
    Unknown,
}

impl ThreadState {
    /// Display text for chart series.
    pub fn label(self) -> &'static str {
        match self {
            ThreadState::New => "New",
            ThreadState::Runnable => "Runnable",
            ThreadState::Blocked => "Blocked",
            ThreadState::Waiting => "Waiting",
            ThreadState::TimedWaiting => "Timed Waiting",
            ThreadState::Terminated => "Terminated",
            ThreadState::Unknown => "Unknown",
        }
    }
}

/// One thread from the dump. Read-only once the summary has been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    pub name: String,
    pub state: ThreadState,
    pub priority: i32,
    pub daemon: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Frames, top of stack first.
    #[serde(default)]
    pub stack_trace: Vec<String>,
    #[serde(default)]
    pub locks_held: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_time_ms: Option<u64>,
}

impl ThreadRecord {
    /// Bare record with no stack, locks or timing.
    pub fn new(name: impl Into<String>, state: ThreadState, priority: i32, daemon: bool) -> Self {
        Self {
            name: name.into(),
            state,
            priority,
            daemon,
            id: None,
            stack_trace: Vec::new(),
            locks_held: Vec::new(),
            waiting_on: None,
            cpu_time_ms: None,
        }
    }

    pub fn top_frame(&self) -> Option<&str> {
        self.stack_trace.first().map(String::as_str)
    }

    /// Case-insensitive match over name, id and stack frames. `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .id
                .as_deref()
                .is_some_and(|id| id.to_lowercase().contains(needle))
            || self
                .stack_trace
                .iter()
                .any(|f| f.to_lowercase().contains(needle))
    }
}
