// Domain models: thread records, the validated summary, pool rows, events

mod event;
mod pool;
mod summary;
mod thread;

pub use event::SummaryEvent;
pub use pool::{PoolRow, PoolStateCounts, PriorityLabel};
pub use summary::{Deadlock, StateCounts, Summary};
pub use thread::{ThreadRecord, ThreadState};
