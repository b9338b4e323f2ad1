// Lock dependency chains and deadlock detection

mod common;

use common::{SAMPLE_JSON, thread, with_locks};
use threadscope::dashboard::{dependency_chains, detect_deadlocks};
use threadscope::models::{Deadlock, Summary, ThreadState};

#[test]
fn linear_chain_ends_at_running_owner() {
    let summary = Summary::from_threads(vec![
        with_locks(thread("a", ThreadState::Blocked, 5), &[], Some("L1")),
        with_locks(thread("b", ThreadState::Blocked, 5), &["L1"], Some("L2")),
        with_locks(thread("c", ThreadState::Runnable, 5), &["L2"], None),
    ]);
    let chains = dependency_chains(&summary);
    assert_eq!(chains.len(), 2);

    let a = &chains[0];
    assert_eq!(a.root, "a");
    assert!(!a.cycle);
    let hops: Vec<(&str, &str, Option<&str>)> = a
        .links
        .iter()
        .map(|l| (l.thread.as_str(), l.waits_on.as_str(), l.held_by.as_deref()))
        .collect();
    assert_eq!(hops, vec![("a", "L1", Some("b")), ("b", "L2", Some("c"))]);
    assert!(detect_deadlocks(&summary).is_empty());
}

#[test]
fn unknown_owner_ends_chain() {
    let summary = Summary::from_threads(vec![with_locks(
        thread("a", ThreadState::Waiting, 5),
        &[],
        Some("0xdead"),
    )]);
    let chains = dependency_chains(&summary);
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].links.len(), 1);
    assert_eq!(chains[0].links[0].held_by, None);
    assert!(!chains[0].cycle);
}

#[test]
fn waiting_on_own_monitor_is_not_a_cycle() {
    let summary = Summary::from_threads(vec![with_locks(
        thread("a", ThreadState::Waiting, 5),
        &["0x1"],
        Some("0x1"),
    )]);
    let chains = dependency_chains(&summary);
    assert!(!chains[0].cycle);
    assert!(detect_deadlocks(&summary).is_empty());
}

#[test]
fn two_thread_cycle_is_reported_once() {
    let summary = Summary::from_json(SAMPLE_JSON).unwrap();
    let chains = dependency_chains(&summary);
    assert_eq!(chains.iter().filter(|c| c.cycle).count(), 2);

    let deadlocks = detect_deadlocks(&summary);
    assert_eq!(deadlocks.len(), 1);
    assert_eq!(deadlocks[0].threads, vec!["ExecuteThread: '1'", "Scheduler-1"]);
    let description = deadlocks[0].description.as_deref().unwrap();
    assert!(description.starts_with("ExecuteThread: '1' waits on 0xa held by Scheduler-1"));
}

#[test]
fn tail_into_cycle_reports_only_the_loop() {
    let summary = Summary::from_threads(vec![
        with_locks(thread("root", ThreadState::Blocked, 5), &[], Some("L1")),
        with_locks(thread("y", ThreadState::Blocked, 5), &["L1", "L3"], Some("L2")),
        with_locks(thread("x", ThreadState::Blocked, 5), &["L2"], Some("L3")),
    ]);
    let deadlocks = detect_deadlocks(&summary);
    assert_eq!(deadlocks.len(), 1);
    // Rotated to start from the smallest name.
    assert_eq!(deadlocks[0].threads, vec!["x", "y"]);
}

#[test]
fn upstream_deadlocks_merge_with_detected_ones() {
    let mut summary = Summary::from_json(SAMPLE_JSON).unwrap();
    summary.deadlocks.push(Deadlock {
        threads: vec!["Scheduler-1".into(), "ExecuteThread: '1'".into()],
        description: Some("reported by jstack".into()),
    });
    let deadlocks = detect_deadlocks(&summary);
    assert_eq!(deadlocks.len(), 1);
    assert_eq!(deadlocks[0].description.as_deref(), Some("reported by jstack"));
}
