// Dashboard view model: overview, threads table, drill-downs, dependency chains

pub mod dependencies;
pub mod overview;
pub mod threads;

pub use dependencies::{DependencyChain, DependencyLink, dependency_chains, detect_deadlocks};
pub use overview::{MetricCard, Overview, SeriesPoint, overview};
pub use threads::{
    FinalizerThread, Page, RowLimit, ThreadQuery, cpu_intensive, finalizer_threads, find_thread,
    gc_threads, paginate, query_threads, stuck_threads,
};
