// Shared test helpers
#![allow(dead_code)]

use threadscope::models::*;

pub fn thread(name: &str, state: ThreadState, priority: i32) -> ThreadRecord {
    ThreadRecord::new(name, state, priority, false)
}

pub fn daemon(name: &str, state: ThreadState, priority: i32) -> ThreadRecord {
    ThreadRecord::new(name, state, priority, true)
}

pub fn with_stack(mut t: ThreadRecord, frames: &[&str]) -> ThreadRecord {
    t.stack_trace = frames.iter().map(|f| f.to_string()).collect();
    t
}

pub fn with_locks(mut t: ThreadRecord, held: &[&str], waiting_on: Option<&str>) -> ThreadRecord {
    t.locks_held = held.iter().map(|l| l.to_string()).collect();
    t.waiting_on = waiting_on.map(str::to_string);
    t
}

/// A small WebLogic-ish dump: HTTP workers, a JDBC thread, GC, finalizer and a couple of plain threads.
pub fn sample_summary() -> Summary {
    Summary::from_threads(vec![
        thread("[ACTIVE] ExecuteThread: '0' for queue: 'weblogic.kernel.Default'", ThreadState::Runnable, 5),
        thread("[ACTIVE] ExecuteThread: '1' for queue: 'weblogic.kernel.Default'", ThreadState::Waiting, 5),
        thread("[STUCK] ExecuteThread: '2' for queue: 'weblogic.kernel.Default'", ThreadState::Blocked, 5),
        thread("jTDS TimerThread", ThreadState::TimedWaiting, 5),
        daemon("GC task thread#0 (ParallelGC)", ThreadState::Runnable, 9),
        daemon("Finalizer", ThreadState::Waiting, 8),
        daemon("Reference Handler", ThreadState::Waiting, 10),
        thread("Thread-7", ThreadState::Runnable, 5),
        thread("main", ThreadState::Runnable, 5),
    ])
}

pub const SAMPLE_JSON: &str = r#"{
  "totalThreads": 4,
  "daemonCount": 1,
  "nonDaemonCount": 3,
  "threads": [
    { "name": "ExecuteThread: '0'", "state": "RUNNABLE", "priority": 5, "daemon": false,
      "stackTrace": ["com.acme.Billing.compute(Billing.java:42)", "java.lang.Thread.run(Thread.java:750)"],
      "cpuTimeMs": 1200 },
    { "name": "ExecuteThread: '1'", "state": "BLOCKED", "priority": 5, "daemon": false,
      "locksHeld": ["0xb"], "waitingOn": "0xa" },
    { "name": "Scheduler-1", "state": "BLOCKED", "priority": 5, "daemon": false,
      "locksHeld": ["0xa"], "waitingOn": "0xb" },
    { "name": "Finalizer", "state": "WAITING", "priority": 8, "daemon": true,
      "waitingOn": "0xf" }
  ],
  "stuckThreads": ["ExecuteThread: '1'"],
  "capturedAt": "2026-10-19T08:00:00Z",
  "jvmVersion": "1.8.0_392"
}"#;
