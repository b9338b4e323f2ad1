// Thread name -> pool label. Ordered, first match wins; the order is part of the output contract.

pub const HTTP_WORKER_POOL: &str = "HTTP Worker Pool";
pub const DATABASE_POOL: &str = "Database Connection Pool";
pub const GC_POOL: &str = "JVM GC Pool";
pub const ASYNC_POOL: &str = "Async Processing Pool";
pub const SCHEDULER_POOL: &str = "Scheduler Pool";
pub const CACHE_POOL: &str = "Cache Management Pool";
pub const IO_POOL: &str = "I/O Operations Pool";
pub const MONITORING_POOL: &str = "Monitoring Pool";
pub const BACKGROUND_POOL: &str = "Background Tasks Pool";
pub const APPLICATION_POOL: &str = "Application Pool";

enum Rule {
    Contains(&'static [&'static str]),
    StartsWith(&'static str),
}

impl Rule {
    fn matches(&self, name: &str) -> bool {
        match self {
            Rule::Contains(needles) => needles.iter().any(|n| name.contains(n)),
            Rule::StartsWith(prefix) => name.starts_with(prefix),
        }
    }
}

const RULES: &[(Rule, &str)] = &[
    (Rule::Contains(&["ExecuteThread"]), HTTP_WORKER_POOL),
    (Rule::Contains(&["SMPPSession", "jTDS"]), DATABASE_POOL),
    (Rule::Contains(&["GC"]), GC_POOL),
    (Rule::Contains(&["Async"]), ASYNC_POOL),
    (Rule::Contains(&["Scheduler"]), SCHEDULER_POOL),
    (Rule::Contains(&["Cache"]), CACHE_POOL),
    (Rule::Contains(&["IO", "I/O"]), IO_POOL),
    (Rule::Contains(&["Monitor"]), MONITORING_POOL),
    (Rule::StartsWith("Thread-"), BACKGROUND_POOL),
];

/// Pool label for a thread name. Falls through to [`APPLICATION_POOL`].
pub fn classify(name: &str) -> &'static str {
    RULES
        .iter()
        .find(|(rule, _)| rule.matches(name))
        .map_or(APPLICATION_POOL, |(_, pool)| pool)
}
