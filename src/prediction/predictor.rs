//! Configuration-driven prediction over a shared forest.
//!
//! A [`Predictor`] owns an `Arc<Forest>` and a [`ForestConfig`]. It publishes
//! either probabilities or raw scores, validates inputs when strict mode is
//! on, and scores batches in parallel while keeping output order equal to
//! input order.

use crate::config::ForestConfig;
use crate::core::error::{ForestError, Result};
use crate::core::types::{FeatureId, Score};
use crate::forest::Forest;
use crate::io::model_file::ForestLoader;
use crate::io::svm::SvmReader;
use crate::prediction::scorer::{to_probability, ForestScorer};
use rayon::prelude::*;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Scores rows against one loaded forest
#[derive(Debug, Clone)]
pub struct Predictor {
    forest: Arc<Forest>,
    config: ForestConfig,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Predictor {
    /// Create a new predictor for a forest
    pub fn new(forest: Arc<Forest>, config: ForestConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.num_threads)
                .build()
                .map_err(|e| ForestError::config(format!("Failed to build thread pool: {}", e)))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Predictor {
            forest,
            config,
            pool,
        })
    }

    /// Load a model file and wrap it in a predictor
    pub fn from_model_file<P: AsRef<Path>>(path: P, config: ForestConfig) -> Result<Self> {
        let forest = ForestLoader::from_config(&config).load_path(path)?;
        Self::new(Arc::new(forest), config)
    }

    /// The forest being scored
    pub fn forest(&self) -> &Arc<Forest> {
        &self.forest
    }

    /// Get prediction configuration
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    fn scorer(&self) -> ForestScorer<'_> {
        ForestScorer::new(&self.forest).with_strict(self.config.strict_features)
    }

    /// Raw additive score of one row
    pub fn raw_score(&self, sorted_feature_ids: &[FeatureId]) -> Result<Score> {
        self.scorer().score(sorted_feature_ids)
    }

    /// Published value of one row: probability, or raw score if configured
    pub fn predict_row(&self, sorted_feature_ids: &[FeatureId]) -> Result<f64> {
        let raw = self.raw_score(sorted_feature_ids)?;
        Ok(if self.config.raw_score {
            raw
        } else {
            to_probability(raw)
        })
    }

    /// Published values for a batch of rows, in input order
    pub fn predict_batch<F>(&self, rows: &[F]) -> Result<Vec<f64>>
    where
        F: AsRef<[FeatureId]> + Sync,
    {
        if rows.len() < self.config.parallel_threshold {
            return rows.iter().map(|r| self.predict_row(r.as_ref())).collect();
        }

        log::debug!("Scoring batch of {} rows in parallel", rows.len());
        let run = || {
            rows.par_iter()
                .map(|r| self.predict_row(r.as_ref()))
                .collect::<Result<Vec<f64>>>()
        };

        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Published values for every row of an svm stream, in input order
    pub fn predict_svm<R: BufRead>(&self, reader: R) -> Result<Vec<f64>> {
        self.predict_rows(SvmReader::with_offset(reader, self.config.feature_offset))
    }

    /// Published values for every row of an svm file, in input order
    pub fn predict_svm_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<f64>> {
        self.predict_rows(SvmReader::open(path, self.config.feature_offset)?)
    }

    fn predict_rows<R: BufRead>(&self, reader: SvmReader<R>) -> Result<Vec<f64>> {
        let rows = reader.read_all()?;
        let features: Vec<Vec<FeatureId>> = rows.into_iter().map(|r| r.feature_ids).collect();
        log::debug!("Read {} svm rows", features.len());
        self.predict_batch(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForestConfigBuilder;
    use crate::io::model_file::load_str;
    use approx::assert_relative_eq;

    const MODEL: &str = "dtree\n1\t0.0\t5:2:3\n2\t1.0\t\n3\t-1.0\t\n";

    fn predictor(config: ForestConfig) -> Predictor {
        Predictor::new(Arc::new(load_str(MODEL).unwrap()), config).unwrap()
    }

    #[test]
    fn test_predict_row_probability() {
        let p = predictor(ForestConfig::default());
        assert_relative_eq!(p.predict_row(&[5]).unwrap(), to_probability(1.0));
        assert_eq!(p.raw_score(&[]).unwrap(), -1.0);
    }

    #[test]
    fn test_predict_row_raw() {
        let config = ForestConfigBuilder::new().raw_score(true).build().unwrap();
        let p = predictor(config);
        assert_eq!(p.predict_row(&[5]).unwrap(), 1.0);
    }

    #[test]
    fn test_strict_mode() {
        let config = ForestConfigBuilder::new()
            .strict_features(true)
            .build()
            .unwrap();
        let p = predictor(config);
        assert!(p.predict_row(&[6, 5]).is_err());
        assert!(p.predict_row(&[5, 6]).is_ok());
    }

    #[test]
    fn test_batch_order_sequential_and_parallel() {
        let rows: Vec<Vec<FeatureId>> = (0..64)
            .map(|i| if i % 3 == 0 { vec![5] } else { vec![1, 2] })
            .collect();

        let sequential = predictor(ForestConfig::default());
        let parallel = predictor(
            ForestConfigBuilder::new()
                .parallel_threshold(1)
                .num_threads(2)
                .build()
                .unwrap(),
        );

        let a = sequential.predict_batch(&rows).unwrap();
        let b = parallel.predict_batch(&rows).unwrap();
        assert_eq!(a, b);
        for (i, value) in a.iter().enumerate() {
            let expected = if i % 3 == 0 { 1.0 } else { -1.0 };
            assert_relative_eq!(*value, to_probability(expected));
        }
    }

    #[test]
    fn test_predict_svm() {
        let p = predictor(ForestConfig::default());
        // raw index 4 maps to feature 5
        let values = p.predict_svm("1 4:1\n0 5:1\n".as_bytes()).unwrap();
        assert_eq!(values.len(), 2);
        assert_relative_eq!(values[0], to_probability(1.0));
        assert_relative_eq!(values[1], to_probability(-1.0));
    }

    #[test]
    fn test_predict_svm_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.svm");
        std::fs::write(&path, "1 4:1\n\n0 0:1 # no feature 5\n").unwrap();

        let config = ForestConfigBuilder::new().raw_score(true).build().unwrap();
        let values = predictor(config).predict_svm_file(&path).unwrap();
        assert_eq!(values, vec![1.0, -1.0]);
    }

    #[test]
    fn test_predict_svm_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = predictor(ForestConfig::default())
            .predict_svm_file(dir.path().join("missing.svm"))
            .unwrap_err();
        assert_eq!(err.category(), "io");
    }

    #[test]
    fn test_predict_svm_zero_offset() {
        let config = ForestConfigBuilder::new().feature_offset(0).build().unwrap();
        let p = predictor(config);
        let values = p.predict_svm("1 5:1\n".as_bytes()).unwrap();
        assert_relative_eq!(values[0], to_probability(1.0));
    }
}
