//! Prediction pipeline.
//!
//! - [`scorer`]: the traversal that turns a row into an additive score, and
//!   the logistic link
//! - [`predictor`]: configuration-driven row, batch and svm-file prediction

pub mod predictor;
pub mod scorer;

pub use predictor::Predictor;
pub use scorer::{
    contains_feature, is_strictly_ascending, score, score_checked, to_probability, ForestScorer,
};
