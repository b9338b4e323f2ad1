// Thread dependency chains: who waits on a lock held by whom, and lock cycles (deadlocks).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Deadlock, Summary, ThreadRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLink {
    pub thread: String,
    pub waits_on: String,
    /// Owner of `waits_on`; `None` when no listed thread holds it.
    pub held_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChain {
    pub root: String,
    pub links: Vec<DependencyLink>,
    pub cycle: bool,
}

/// Lock id -> owning thread name. First holder wins if the dump lists a lock twice.
pub fn lock_owners(threads: &[ThreadRecord]) -> HashMap<&str, &str> {
    let mut owners = HashMap::new();
    for t in threads {
        for lock in &t.locks_held {
            owners.entry(lock.as_str()).or_insert(t.name.as_str());
        }
    }
    owners
}

fn follow<'a>(
    root: &'a ThreadRecord,
    by_name: &HashMap<&str, &'a ThreadRecord>,
    owners: &HashMap<&str, &'a str>,
) -> DependencyChain {
    let mut links = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([root.name.as_str()]);
    let mut current = root;
    let mut cycle = false;

    while let Some(lock) = current.waiting_on.as_deref() {
        let owner = owners.get(lock).copied();
        links.push(DependencyLink {
            thread: current.name.clone(),
            waits_on: lock.to_string(),
            held_by: owner.map(str::to_string),
        });
        let Some(owner) = owner else { break };
        // Object.wait() on a monitor the thread itself holds.
        if owner == current.name {
            break;
        }
        if !seen.insert(owner) {
            cycle = true;
            break;
        }
        let Some(&next) = by_name.get(owner) else { break };
        current = next;
    }

    DependencyChain {
        root: root.name.clone(),
        links,
        cycle,
    }
}

/// One chain per thread that waits on a lock.
pub fn dependency_chains(summary: &Summary) -> Vec<DependencyChain> {
    let owners = lock_owners(&summary.threads);
    let by_name: HashMap<&str, &ThreadRecord> = summary
        .threads
        .iter()
        .map(|t| (t.name.as_str(), t))
        .collect();
    summary
        .threads
        .iter()
        .filter(|t| t.waiting_on.is_some())
        .map(|t| follow(t, &by_name, &owners))
        .collect()
}

/// The links forming the loop at the end of a cyclic chain, rotated to start at the smallest thread name.
fn cycle_links(chain: &DependencyChain) -> Option<Vec<&DependencyLink>> {
    if !chain.cycle {
        return None;
    }
    let repeated = chain.links.last()?.held_by.as_deref()?;
    let start = chain.links.iter().position(|l| l.thread == repeated)?;
    let mut links: Vec<&DependencyLink> = chain.links[start..].iter().collect();
    let min = links
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.thread.cmp(&b.thread))
        .map(|(i, _)| i)?;
    links.rotate_left(min);
    Some(links)
}

fn thread_set(threads: &[String]) -> Vec<String> {
    let mut set = threads.to_vec();
    set.sort();
    set.dedup();
    set
}

/// Upstream deadlocks plus lock cycles found in the dump, each distinct thread set once.
pub fn detect_deadlocks(summary: &Summary) -> Vec<Deadlock> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut out = Vec::new();

    for d in &summary.deadlocks {
        if seen.insert(thread_set(&d.threads)) {
            out.push(d.clone());
        }
    }

    for chain in dependency_chains(summary) {
        let Some(links) = cycle_links(&chain) else {
            continue;
        };
        let threads: Vec<String> = links.iter().map(|l| l.thread.clone()).collect();
        if !seen.insert(thread_set(&threads)) {
            continue;
        }
        let description = links
            .iter()
            .map(|l| {
                format!(
                    "{} waits on {} held by {}",
                    l.thread,
                    l.waits_on,
                    l.held_by.as_deref().unwrap_or("?")
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        out.push(Deadlock {
            threads,
            description: Some(description),
        });
    }
    out
}
