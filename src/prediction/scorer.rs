//! Forest scoring: additive path accumulation and the logistic link.
//!
//! Every node visited on the way down contributes its base value once. At each
//! node the branches are evaluated in stored order; a branch whose feature is
//! present in the row continues into its yes node, otherwise into its no node,
//! and the continuation's own accumulated score is added.
//!
//! Recursion depth equals the longest branch chain. A cyclic forest (only
//! possible when loaded without cycle rejection) recurses without bound; that
//! is a malformed-model hazard and is not checked here on each call.

use crate::core::error::{ForestError, Result};
use crate::core::types::{FeatureId, NodeIndex, Score};
use crate::forest::Forest;

/// Additive score of one row.
///
/// `sorted_feature_ids` must be strictly ascending with no duplicates. This
/// is not re-validated; a violating slice yields an unspecified score. Use
/// [`score_checked`] when the input is not trusted.
pub fn score(forest: &Forest, sorted_feature_ids: &[FeatureId]) -> Score {
    score_node(forest, forest.root_index(), sorted_feature_ids)
}

fn score_node(forest: &Forest, index: NodeIndex, features: &[FeatureId]) -> Score {
    let node = forest.node(index);
    let mut acc = node.base_value();

    for branch in node.branches() {
        let present = contains_feature(features, branch.feature_id);
        acc += score_node(forest, branch.follow(present), features);
    }

    acc
}

/// Exact-match membership test in O(log F).
#[inline]
pub fn contains_feature(sorted_feature_ids: &[FeatureId], feature_id: FeatureId) -> bool {
    sorted_feature_ids.binary_search(&feature_id).is_ok()
}

/// Logistic transform of a raw score.
///
/// Strictly inside (0, 1) for moderate scores. In `f64` the result rounds to
/// exactly 1.0 from a score of about 37 upward and to exactly 0.0 below
/// about -710, where the exponential overflows.
#[inline]
pub fn to_probability(score: Score) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

/// Whether a feature-id slice satisfies the scorer's precondition.
pub fn is_strictly_ascending(feature_ids: &[FeatureId]) -> bool {
    feature_ids.windows(2).all(|w| w[0] < w[1])
}

/// Like [`score`] but rejects unsorted or duplicated feature ids.
pub fn score_checked(forest: &Forest, feature_ids: &[FeatureId]) -> Result<Score> {
    if let Some(pos) = feature_ids.windows(2).position(|w| w[0] >= w[1]) {
        return Err(ForestError::invalid_input(format!(
            "feature ids must be strictly ascending: {} at position {} is followed by {}",
            feature_ids[pos],
            pos,
            feature_ids[pos + 1]
        )));
    }
    Ok(score(forest, feature_ids))
}

/// Scoring handle over a borrowed forest.
#[derive(Debug, Clone, Copy)]
pub struct ForestScorer<'a> {
    forest: &'a Forest,
    strict: bool,
}

impl<'a> ForestScorer<'a> {
    /// Create a scorer that trusts its input ordering
    pub fn new(forest: &'a Forest) -> Self {
        ForestScorer {
            forest,
            strict: false,
        }
    }

    /// Enable or disable feature-id validation
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The forest being scored
    pub fn forest(&self) -> &'a Forest {
        self.forest
    }

    /// Raw additive score
    pub fn score(&self, sorted_feature_ids: &[FeatureId]) -> Result<Score> {
        if self.strict {
            score_checked(self.forest, sorted_feature_ids)
        } else {
            Ok(score(self.forest, sorted_feature_ids))
        }
    }

    /// Score passed through the logistic link
    pub fn probability(&self, sorted_feature_ids: &[FeatureId]) -> Result<f64> {
        self.score(sorted_feature_ids).map(to_probability)
    }
}
