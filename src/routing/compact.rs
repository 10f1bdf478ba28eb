//! Single-child branch folding.
//!
//! A branch with exactly one child adds a resolver level without narrowing
//! anything, so the child is hoisted into the parent under the joined key
//! `parent/child`. Children are compacted before their parent is examined,
//! which makes the rewrite idempotent.

use crate::routing::tree::{Entry, Key, Node};

/// Bottom-up tree compactor with a merge counter.
#[derive(Debug, Default)]
pub struct Compactor {
    merges: usize,
}

impl Compactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges performed so far.
    pub fn merges(&self) -> usize {
        self.merges
    }

    /// Return the compacted form of `node`.
    ///
    /// Terminals and passthrough entries are moved as-is; only branches
    /// are rewritten.
    pub fn compact(&mut self, node: Node) -> Node {
        let mut compacted = Node::new();
        for (key, entry) in node.into_children() {
            let (key, entry) = match entry {
                Entry::Branch(child) => {
                    let child = self.compact(child);
                    self.fold(key, child)
                }
                other => (key, other),
            };
            compacted.insert(key, entry);
        }
        compacted
    }

    /// The joined key keeps the kind of the child: a terminal stays a
    /// terminal, a branch stays a branch.
    fn fold(&mut self, key: Key, child: Node) -> (Key, Entry) {
        let Key::Group(parent) = key else {
            return (key, Entry::Branch(child));
        };
        match child.into_only_child() {
            Ok((child_key, entry)) => {
                let joined = join_keys(&parent, child_key.as_segment());
                tracing::debug!(parent = %parent, child = %child_key, joined = %joined, "Merged single-child branch");
                self.merges += 1;
                let key = match child_key {
                    Key::Group(_) => Key::Group(joined),
                    _ => Key::Segment(joined),
                };
                (key, entry)
            }
            Err(child) => (Key::Group(parent), Entry::Branch(child)),
        }
    }
}

/// Compact `node`, returning the tree and the number of merges.
pub fn compact(node: Node) -> (Node, usize) {
    let mut compactor = Compactor::new();
    let node = compactor.compact(node);
    (node, compactor.merges())
}

/// Join two keys with a separator. An anchor on the child would sit
/// mid-pattern after joining, where it can never match, so it is dropped.
fn join_keys(parent: &str, child: &str) -> String {
    let child = child.strip_prefix('^').unwrap_or(child);
    format!("{}/{}", parent, child)
}
