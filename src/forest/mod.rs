//! The loaded forest: an arena of resolved nodes plus a designated root.
//!
//! Nodes form a directed graph rather than a strict tree: any number of
//! branches may point at the same node. The whole graph is owned by the
//! [`Forest`]; branches hold [`NodeIndex`] handles into it. A forest is never
//! mutated after [`load`](crate::io::model_file::load) returns it, so it can
//! be shared across threads (for example behind an `Arc`) and scored
//! concurrently without locking.

pub mod node;

pub use node::{ResolvedBranch, ResolvedNode};

use crate::core::types::{FeatureId, NodeId, NodeIndex, Score};
use std::collections::HashMap;

/// Immutable decision forest.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    nodes: Vec<ResolvedNode>,
    index: HashMap<NodeId, NodeIndex>,
    root: NodeIndex,
}

impl Forest {
    /// Seals a fully wired arena. Callers guarantee `root` and every branch
    /// target are valid indices into `nodes`.
    pub(crate) fn from_parts(
        nodes: Vec<ResolvedNode>,
        index: HashMap<NodeId, NodeIndex>,
        root: NodeIndex,
    ) -> Self {
        debug_assert!(root.0 < nodes.len());
        Forest { nodes, index, root }
    }

    /// The root node (the first node id seen in the model text).
    pub fn root(&self) -> &ResolvedNode {
        &self.nodes[self.root.0]
    }

    /// Arena handle of the root node.
    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    /// Node behind an arena handle.
    ///
    /// # Panics
    /// Panics if the handle did not come from this forest.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &ResolvedNode {
        &self.nodes[index.0]
    }

    /// Looks up a node by the id it had in the model text.
    pub fn get(&self, node_id: NodeId) -> Option<&ResolvedNode> {
        self.index_of(node_id).map(|idx| self.node(idx))
    }

    /// Arena handle for a model node id.
    pub fn index_of(&self, node_id: NodeId) -> Option<NodeIndex> {
        self.index.get(&node_id).copied()
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a loaded forest; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of branches across all nodes.
    pub fn num_branches(&self) -> usize {
        self.nodes.iter().map(|n| n.branches().len()).sum()
    }

    /// Distinct feature ids tested anywhere in the forest, ascending.
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .nodes
            .iter()
            .flat_map(|n| n.branches().iter().map(|b| b.feature_id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Nodes reachable from the root, each once, in depth-first pre-order
    /// (a node, then for each branch its yes side followed by its no side).
    pub fn reachable_from_root(&self) -> Vec<NodeIndex> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(idx) = stack.pop() {
            if visited[idx.0] {
                continue;
            }
            visited[idx.0] = true;
            order.push(idx);

            // pushed in reverse so the first branch's yes side is popped first
            for branch in self.nodes[idx.0].branches().iter().rev() {
                stack.push(branch.no_branch);
                stack.push(branch.yes_branch);
            }
        }

        order
    }

    /// Finds a node lying on a cycle, if the graph has one.
    ///
    /// Iterative three-colour depth-first search over every node, so it does
    /// not rely on the graph being acyclic to terminate.
    pub fn find_cycle(&self) -> Option<NodeId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        // (node, next child position); each branch contributes two children
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            marks[start] = Mark::InProgress;
            stack.push((start, 0));

            while let Some(top) = stack.last_mut() {
                let (current, child_pos) = *top;
                let branches = self.nodes[current].branches();

                if child_pos == branches.len() * 2 {
                    marks[current] = Mark::Done;
                    stack.pop();
                    continue;
                }
                top.1 += 1;

                let branch = &branches[child_pos / 2];
                let next = if child_pos % 2 == 0 {
                    branch.yes_branch.0
                } else {
                    branch.no_branch.0
                };

                match marks[next] {
                    Mark::InProgress => return Some(self.nodes[next].node_id()),
                    Mark::Unvisited => {
                        marks[next] = Mark::InProgress;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }

    /// Additive score of a row; see [`crate::prediction::scorer::score`].
    #[inline]
    pub fn score(&self, sorted_feature_ids: &[FeatureId]) -> Score {
        crate::prediction::scorer::score(self, sorted_feature_ids)
    }
}
