//! # Pure Rust DTree
//!
//! A small inference engine for additive decision-tree forests. A forest is
//! read from a tab-separated text model into an arena-backed node graph and
//! then scored against sparse rows: every node on the realized path adds its
//! base value, and the total is squashed through the logistic link.
//!
//! ## Quick Start
//!
//! ```rust
//! use dtree_rust::{load_str, to_probability};
//!
//! # fn main() -> dtree_rust::Result<()> {
//! let model = "dtree\n1\t0.0\t5:2:3\n2\t1.0\t\n3\t-1.0\t\n";
//! let forest = load_str(model)?;
//!
//! // feature ids must be strictly ascending
//! assert_eq!(forest.score(&[5]), 1.0);
//! assert_eq!(forest.score(&[]), -1.0);
//!
//! let p = to_probability(forest.score(&[5]));
//! assert!(p > 0.5 && p < 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ### Batch prediction
//!
//! ```rust
//! use dtree_rust::{load_str, ForestConfigBuilder, Predictor};
//! use std::sync::Arc;
//!
//! # fn main() -> dtree_rust::Result<()> {
//! let forest = load_str("dtree\n1\t0.0\t5:2:3\n2\t1.0\t\n3\t-1.0\t\n")?;
//! let config = ForestConfigBuilder::new().raw_score(true).build()?;
//! let predictor = Predictor::new(Arc::new(forest), config)?;
//!
//! // svm indices are zero-based; index 4 is model feature 5
//! let scores = predictor.predict_svm("1 4:1\n0 0:1\n".as_bytes())?;
//! assert_eq!(scores, vec![1.0, -1.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: identifier types, constants, error handling
//! - [`config`]: loading and scoring options
//! - [`forest`]: the immutable node graph
//! - [`io`]: model text loader/writer and the svm row reader
//! - [`prediction`]: the scorer and the batch predictor

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

pub mod config;
pub mod core;
pub mod forest;
pub mod io;
pub mod prediction;

pub use crate::core::{
    constants::*,
    error::{ForestError, MalformedModelError, Result},
    types::*,
};

pub use config::{ConfigManager, ConfigSource, ForestConfig, ForestConfigBuilder};
pub use forest::{Forest, ResolvedBranch, ResolvedNode};
pub use io::{
    load, load_path, load_str, save_path, write_forest, ForestLoader, RawBranchRecord,
    RawNodeRecord, SvmReader, SvmRow,
};
pub use prediction::{score, score_checked, to_probability, ForestScorer, Predictor};

pub use crate::core::constants::DTREE_RUST_VERSION as VERSION;

/// Initialize the library.
///
/// Sets up logging through `env_logger` (defaulting to `info` when
/// `RUST_LOG` is unset). Safe to call more than once; calling it is optional
/// for applications that install their own logger.
pub fn init() -> Result<()> {
    crate::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    crate::core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports() {
        let forest = load_str("dtree\n1\t2.0\t\n").unwrap();
        assert_eq!(score(&forest, &[]), 2.0);
        let err = load_str("dtree\n").unwrap_err();
        assert_eq!(err.category(), "malformed_model");
    }
}
