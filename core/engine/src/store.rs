//! FILENAME: core/engine/src/store.rs
//! PURPOSE: The sparse nested count store.
//! CONTEXT: One level of `Branch` per tag, in schema order, ending in a
//! `Leaf` counter. Only combinations that were recorded exist in the tree.

use rustc_hash::FxHashMap;
use crate::value::TagValue;

// ============================================================================
// COUNT NODE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountNode {
    /// Children keyed by the coerced value of the tag at this depth.
    Branch(FxHashMap<TagValue, CountNode>),
    /// Number of records whose tags follow the path to this leaf.
    Leaf(u64),
}

impl CountNode {
    /// An empty node for a level with `remaining` tags below it.
    fn empty(remaining: usize) -> Self {
        if remaining == 0 {
            CountNode::Leaf(0)
        } else {
            CountNode::Branch(FxHashMap::default())
        }
    }

    /// Sum of every leaf under this node.
    pub fn total(&self) -> u64 {
        match self {
            CountNode::Leaf(n) => *n,
            CountNode::Branch(children) => children.values().map(CountNode::total).sum(),
        }
    }

    /// True if every leaf sits exactly `depth` levels below this node.
    fn has_depth(&self, depth: usize) -> bool {
        match self {
            CountNode::Leaf(_) => depth == 0,
            CountNode::Branch(children) => {
                depth > 0 && children.values().all(|c| c.has_depth(depth - 1))
            }
        }
    }
}

// ============================================================================
// COUNT STORE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountStore {
    root: CountNode,
    depth: usize,
}

impl CountStore {
    pub fn new(depth: usize) -> Self {
        CountStore {
            root: CountNode::empty(depth),
            depth,
        }
    }

    /// Wraps a tree built elsewhere (e.g. read back from disk).
    /// Returns None if any leaf is not exactly `depth` levels deep.
    pub fn from_root(root: CountNode, depth: usize) -> Option<Self> {
        if root.has_depth(depth) {
            Some(CountStore { root, depth })
        } else {
            None
        }
    }

    pub fn root(&self) -> &CountNode {
        &self.root
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Adds one to the leaf at `path`, creating intermediate branches lazily.
    /// `path` must hold exactly one value per tag.
    pub fn increment(&mut self, path: &[TagValue]) {
        debug_assert_eq!(path.len(), self.depth);
        let mut node = &mut self.root;
        for (i, key) in path.iter().enumerate() {
            let remaining = self.depth - i - 1;
            node = match node {
                CountNode::Branch(children) => children
                    .entry(key.clone())
                    .or_insert_with(|| CountNode::empty(remaining)),
                CountNode::Leaf(_) => unreachable!("leaf found above depth {}", self.depth),
            };
        }
        if let CountNode::Leaf(count) = node {
            *count += 1;
        }
    }

    /// Leaf count for one fully specified path, 0 if never recorded.
    pub fn get(&self, path: &[TagValue]) -> u64 {
        let mut node = &self.root;
        for key in path {
            match node {
                CountNode::Branch(children) => match children.get(key) {
                    Some(child) => node = child,
                    None => return 0,
                },
                CountNode::Leaf(_) => return 0,
            }
        }
        match node {
            CountNode::Leaf(n) => *n,
            CountNode::Branch(_) => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.root.total()
    }
}
