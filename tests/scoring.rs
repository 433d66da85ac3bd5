//! Integration and property tests for forest scoring.

use approx::assert_relative_eq;
use dtree_rust::*;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

mod common;
use common::*;

#[test]
fn test_leaf_only_model() {
    let forest = load_str(LEAF_ONLY).unwrap();
    assert_eq!(score(&forest, &[]), 2.0);
    assert_eq!(score(&forest, &[1, 2, 3]), 2.0);
    assert_relative_eq!(to_probability(2.0), 0.8808, epsilon = 1e-4);
}

#[test]
fn test_single_branch_feature_present_and_absent() {
    let forest = load_str(SINGLE_BRANCH).unwrap();
    assert_eq!(score(&forest, &[5]), 1.0);
    assert_eq!(score(&forest, &[]), -1.0);
}

#[test]
fn test_shared_subtree_scores() {
    let forest = load_str(SHARED_SUBTREE).unwrap();
    assert_eq!(forest.score(&[3, 9]), 3.75);
    assert_eq!(forest.score(&[]), 1.625);
    assert_eq!(forest.score(&[3, 7]), 1.625);
}

#[test]
fn test_exact_match_only() {
    let forest = load_str(SINGLE_BRANCH).unwrap();
    for neighbours in [&[4][..], &[6][..], &[4, 6][..], &[1, 2, 3, 4, 6, 7][..]] {
        assert_eq!(forest.score(neighbours), -1.0, "{:?}", neighbours);
    }
    assert_eq!(forest.score(&[4, 5, 6]), 1.0);
}

#[test]
fn test_concurrent_scoring_of_one_forest() {
    let forest = Arc::new(load_str(&model_text(&random_forest_spec(3, 300, 50))).unwrap());
    let rows: Vec<Vec<FeatureId>> = (0..50u32).map(|i| (1..=i).step_by(3).collect()).collect();
    let expected: Vec<f64> = rows.iter().map(|r| forest.score(r)).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let forest = Arc::clone(&forest);
            let rows = rows.clone();
            std::thread::spawn(move || rows.iter().map(|r| forest.score(r)).collect::<Vec<f64>>())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_forest_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Forest>();
    assert_send_sync::<Predictor>();
}

fn feature_set() -> impl Strategy<Value = Vec<FeatureId>> {
    prop::collection::btree_set(1u32..=30, 0..12)
        .prop_map(|s: BTreeSet<FeatureId>| s.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_scoring_is_deterministic(seed in 0u64..500, features in feature_set()) {
        let forest = load_str(&model_text(&random_forest_spec(seed, 40, 30))).unwrap();
        let first = forest.score(&features);
        let second = forest.score(&features);
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn prop_matches_linear_scan_reference(seed in 0u64..500, features in feature_set()) {
        let spec = random_forest_spec(seed, 40, 30);
        let forest = load_str(&model_text(&spec)).unwrap();
        let expected = reference_score(&spec, spec[0].0, &features);
        prop_assert_eq!(forest.score(&features), expected);
    }

    #[test]
    fn prop_probability_in_unit_interval(score in -30.0f64..30.0) {
        let p = to_probability(score);
        prop_assert!(p > 0.0 && p < 1.0);
        prop_assert!((to_probability(-score) - (1.0 - p)).abs() < 1e-12);
    }

    #[test]
    fn prop_checked_agrees_with_unchecked(seed in 0u64..100, features in feature_set()) {
        let forest = load_str(&model_text(&random_forest_spec(seed, 25, 30))).unwrap();
        prop_assert_eq!(score_checked(&forest, &features).unwrap(), score(&forest, &features));
    }
}
