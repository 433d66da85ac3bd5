//! Resolved node and branch records of the forest graph.
//!
//! Branches refer to their continuations by [`NodeIndex`] into the owning
//! forest's arena, so one node can be the target of any number of branches
//! without any per-node ownership bookkeeping.

use crate::core::types::{FeatureId, NodeId, NodeIndex, Score};
use std::fmt;

/// A test on one feature with a yes and a no continuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBranch {
    /// Feature identity tested at this branch
    pub feature_id: FeatureId,
    /// Continuation taken when the feature is active in the row
    pub yes_branch: NodeIndex,
    /// Continuation taken when the feature is absent from the row
    pub no_branch: NodeIndex,
}

impl ResolvedBranch {
    /// Continuation for a given membership outcome.
    #[inline]
    pub fn follow(&self, feature_present: bool) -> NodeIndex {
        if feature_present {
            self.yes_branch
        } else {
            self.no_branch
        }
    }
}

/// A node carrying an additive base value and its outgoing branches.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    node_id: NodeId,
    base_value: Score,
    branches: Vec<ResolvedBranch>,
}

impl ResolvedNode {
    /// Creates a node with no branches yet.
    pub(crate) fn new(node_id: NodeId, base_value: Score) -> Self {
        ResolvedNode {
            node_id,
            base_value,
            branches: Vec::new(),
        }
    }

    /// Appends a branch. Only the loader wires edges, before the forest is sealed.
    pub(crate) fn push_branch(&mut self, branch: ResolvedBranch) {
        self.branches.push(branch);
    }

    pub(crate) fn reserve_branches(&mut self, additional: usize) {
        self.branches.reserve_exact(additional);
    }

    /// Id this node had in the model text.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Additive contribution of this node.
    pub fn base_value(&self) -> Score {
        self.base_value
    }

    /// Branches in model order.
    pub fn branches(&self) -> &[ResolvedBranch] {
        &self.branches
    }

    /// Whether the node has no branches.
    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }
}

impl fmt::Display for ResolvedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} (base={}, branches={})",
            self.node_id,
            self.base_value,
            self.branches.len()
        )
    }
}
