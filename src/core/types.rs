//! Core data types for the forest inference engine.
//!
//! These aliases pin down the numeric widths used by the model text format
//! and by the scoring path, so the loader, the graph and the scorer agree on
//! one representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier as written in the model file.
/// Unique within one load, not necessarily contiguous or starting at zero.
pub type NodeId = u64;

/// Feature identity tested at a branch. 1-based in the model format.
pub type FeatureId = u32;

/// Additive score type. Base values and accumulated scores use 64-bit floats.
pub type Score = f64;

/// Handle of a node inside a [`Forest`](crate::forest::Forest) arena.
///
/// Indices are only meaningful for the forest that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which continuation of a branch a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchSide {
    /// Taken when the feature is present in the row
    Yes,
    /// Taken when the feature is absent from the row
    No,
}

impl fmt::Display for BranchSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSide::Yes => write!(f, "yes"),
            BranchSide::No => write!(f, "no"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_index_display() {
        let idx = NodeIndex(3);
        assert_eq!(idx.index(), 3);
        assert_eq!(idx.to_string(), "#3");
    }

    #[test]
    fn test_branch_side_display() {
        assert_eq!(BranchSide::Yes.to_string(), "yes");
        assert_eq!(BranchSide::No.to_string(), "no");
    }
}
