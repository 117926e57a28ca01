//! Snapshot diffing.
//!
//! Finds the screens that a commit destroyed so their pending results can be
//! cancelled. Shared subtrees are skipped with `Arc::ptr_eq`, so the cost is
//! proportional to the part of the tree an operation rebuilt.

use crate::node::{NavNode, NodeRef};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Keys of screens present in `old` but absent from `new`
pub fn diff<D>(old: &NodeRef<D>, new: &NodeRef<D>) -> HashSet<String> {
    let mut candidates = Vec::new();
    walk(old, new, &mut candidates);
    if candidates.is_empty() {
        return HashSet::new();
    }

    // A screen may survive under a rebuilt ancestor with a different key
    let present: HashSet<String> = new.screen_keys().into_iter().collect();
    candidates
        .into_iter()
        .filter(|key| !present.contains(key))
        .collect()
}

fn walk<D>(old: &NodeRef<D>, new: &NodeRef<D>, out: &mut Vec<String>) {
    if Arc::ptr_eq(old, new) {
        return;
    }
    if old.key() != new.key() || old.kind() != new.kind() {
        old.collect_screen_keys(out);
        return;
    }

    let counterparts: HashMap<&str, &NodeRef<D>> = new
        .children()
        .into_iter()
        .map(|(_, child)| (child.key(), child))
        .collect();
    for (_, child) in old.children() {
        match counterparts.get(child.key()) {
            Some(counterpart) => walk(child, counterpart, out),
            None => child.collect_screen_keys(out),
        }
    }
}

/// Whether any screen of `old` is gone from `new`
pub fn removes_screens<D>(old: &NavNode<D>, new: &NavNode<D>) -> bool {
    let present: HashSet<String> = new.screen_keys().into_iter().collect();
    old.screen_keys().iter().any(|key| !present.contains(key))
}
