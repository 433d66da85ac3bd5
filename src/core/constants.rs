//! System constants and configuration defaults.

use crate::core::types::FeatureId;

/// Header line written in front of every serialized forest.
/// The loader skips the first line unconditionally; this literal is only
/// compared against when header checking is enabled.
pub const MODEL_HEADER: &str = "dtree";

/// Field separator inside a node line.
pub const FIELD_SEPARATOR: char = '\t';

/// Separator between branch triples in the branch-list field.
pub const BRANCH_SEPARATOR: char = '|';

/// Separator between the three integers of one branch triple.
pub const BRANCH_FIELD_SEPARATOR: char = ':';

/// Offset added to zero-based sparse-vector indices to obtain model feature ids.
pub const DEFAULT_FEATURE_OFFSET: FeatureId = 1;

/// Fractional digits used when writing base values.
pub const BASE_VALUE_PRECISION: usize = 7;

/// Batches below this size are scored on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Default number of scoring threads (0 = rayon's global pool).
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Environment variable overriding the feature offset.
pub const ENV_FEATURE_OFFSET: &str = "DTREE_FEATURE_OFFSET";

/// Environment variable selecting raw score output.
pub const ENV_RAW_SCORE: &str = "DTREE_RAW_SCORE";

/// Environment variable enabling strict feature validation.
pub const ENV_STRICT_FEATURES: &str = "DTREE_STRICT_FEATURES";

/// Environment variable enabling cycle rejection at load time.
pub const ENV_REJECT_CYCLES: &str = "DTREE_REJECT_CYCLES";

/// Environment variable overriding the number of scoring threads.
pub const ENV_NUM_THREADS: &str = "DTREE_NUM_THREADS";

/// Library version.
pub const DTREE_RUST_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_are_distinct() {
        let seps = [FIELD_SEPARATOR, BRANCH_SEPARATOR, BRANCH_FIELD_SEPARATOR];
        assert_ne!(seps[0], seps[1]);
        assert_ne!(seps[1], seps[2]);
        assert_ne!(seps[0], seps[2]);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_FEATURE_OFFSET, 1);
        assert_eq!(MODEL_HEADER, "dtree");
        assert!(DEFAULT_PARALLEL_THRESHOLD > 0);
        assert!(!DTREE_RUST_VERSION.is_empty());
    }
}
