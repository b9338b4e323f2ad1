// Dashboard view state as one value: which view, which modal (at most one), paging and filters.
// Components dispatch UiAction and read UiState; scroll requests go over an app-scoped event bus.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::dashboard::{RowLimit, ThreadQuery};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActiveView {
    #[default]
    Overview,
    Threads,
    Pools,
    Dependencies,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Modal {
    StackTrace { thread: String },
    CpuIntensive,
    Finalizers,
    GcThreads,
    PoolDetail { pool: String },
    DependencyChain { thread: String },
    Deadlocks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub view: ActiveView,
    pub modal: Option<Modal>,
    pub row_limit: RowLimit,
    pub query: ThreadQuery,
}

impl UiState {
    pub fn new(collapsed_rows: usize) -> Self {
        Self {
            view: ActiveView::Overview,
            modal: None,
            row_limit: RowLimit::collapsed(collapsed_rows),
            query: ThreadQuery::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UiAction {
    SelectView { view: ActiveView },
    OpenModal { modal: Modal },
    CloseModal,
    ToggleRows,
    SetSearch { search: String },
    SetPage { page: usize },
    ScrollToThreads { thread: String },
}

pub fn reduce(mut state: UiState, action: UiAction) -> UiState {
    match action {
        UiAction::SelectView { view } => {
            state.view = view;
            state.modal = None;
        }
        UiAction::OpenModal { modal } => state.modal = Some(modal),
        UiAction::CloseModal => state.modal = None,
        UiAction::ToggleRows => state.row_limit.toggle(),
        UiAction::SetSearch { search } => {
            state.query.search = (!search.trim().is_empty()).then_some(search);
            state.query.page = Some(1);
        }
        UiAction::SetPage { page } => state.query.page = Some(page.max(1)),
        UiAction::ScrollToThreads { thread } => {
            state.view = ActiveView::Threads;
            state.modal = None;
            state.query.search = Some(thread);
            state.query.page = Some(1);
        }
    }
    state
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
    ScrollToThreadView { thread: String },
}

/// Cross-component notifications, owned by the application and dropped with it.
#[derive(Clone)]
pub struct UiEventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl UiEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Number of subscribers that will see the event (0 is not an error).
    pub fn publish(&self, event: UiEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }
}
