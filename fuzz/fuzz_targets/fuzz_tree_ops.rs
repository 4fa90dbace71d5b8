//! Fuzz target for tree store operation sequences.
//!
//! Replays arbitrary operations, including ones on removed or stale handles,
//! and checks the store never panics and never lets a cached lookup disagree
//! with a plain sibling walk.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use treestore::{ColumnType, Error, TreePosition, TreeStore};

#[derive(Arbitrary, Debug)]
enum Op {
    AddChild(Option<u8>),
    InsertBefore(u8),
    InsertAfter(u8),
    Remove(u8),
    Child(Option<u8>, u8),
    Count(Option<u8>),
    Next(u8),
    Parent(u8),
    SetValue(u8, i64),
    Clear,
}

fn pick(handles: &[TreePosition], sel: u8) -> Option<TreePosition> {
    if handles.is_empty() {
        None
    } else {
        Some(handles[sel as usize % handles.len()])
    }
}

/// Child `index` found by walking `next` from the first child.
fn walk(store: &mut TreeStore, parent: Option<&TreePosition>, index: usize) -> Option<TreePosition> {
    let mut current = store.child(parent, 0).ok()??;
    for _ in 0..index {
        current = store.next(&current).ok()??;
    }
    Some(current)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut store = TreeStore::new([ColumnType::Int]);
    // Every handle ever issued, live or not.
    let mut handles: Vec<TreePosition> = Vec::new();

    for op in ops.into_iter().take(512) {
        match op {
            Op::AddChild(sel) => {
                let parent = sel.and_then(|s| pick(&handles, s));
                if let Ok(pos) = store.add_child(parent.as_ref()) {
                    handles.push(pos);
                }
            }
            Op::InsertBefore(sel) => {
                if let Some(Ok(pos)) = pick(&handles, sel).map(|p| store.insert_before(&p)) {
                    handles.push(pos);
                }
            }
            Op::InsertAfter(sel) => {
                if let Some(Ok(pos)) = pick(&handles, sel).map(|p| store.insert_after(&p)) {
                    handles.push(pos);
                }
            }
            Op::Remove(sel) => {
                if let Some(pos) = pick(&handles, sel) {
                    let _ = store.remove(&pos);
                }
            }
            Op::Child(sel, index) => {
                let parent = sel.and_then(|s| pick(&handles, s));
                let cached = store.child(parent.as_ref(), index as usize);
                if let Ok(cached) = cached {
                    let walked = walk(&mut store, parent.as_ref(), index as usize);
                    assert_eq!(cached.map(|p| p.node()), walked.map(|p| p.node()));
                } else if let Err(err) = cached {
                    assert!(matches!(err, Error::InvalidPosition(_)));
                }
            }
            Op::Count(sel) => {
                let parent = sel.and_then(|s| pick(&handles, s));
                let _ = store.children_count(parent.as_ref());
            }
            Op::Next(sel) => {
                if let Some(pos) = pick(&handles, sel) {
                    let _ = store.next(&pos);
                }
            }
            Op::Parent(sel) => {
                if let Some(pos) = pick(&handles, sel) {
                    let _ = store.parent(&pos);
                }
            }
            Op::SetValue(sel, value) => {
                if let Some(pos) = pick(&handles, sel) {
                    let _ = store.set_value(&pos, 0, value);
                }
            }
            Op::Clear => store.clear(),
        }
    }
});
