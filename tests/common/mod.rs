//! Common fixtures for the integration tests.

#![allow(dead_code)]

use dtree_rust::{FeatureId, NodeId};
use rand::prelude::*;
use std::collections::HashMap;
use std::fmt::Write;

/// Single leaf with base value 2.0.
pub const LEAF_ONLY: &str = "dtree\n1\t2.0\t\n";

/// Root 0.0 testing feature 5: yes -> 1.0, no -> -1.0.
pub const SINGLE_BRANCH: &str = "dtree\n1\t0.0\t5:2:3\n2\t1.0\t\n3\t-1.0\t\n";

/// Two root branches that both reach node 4, which is defined last.
pub const SHARED_SUBTREE: &str = "dtree\n\
1\t0.5\t3:4:2|7:2:4\n\
2\t-0.25\t\n\
4\t1.5\t9:5:6\n\
5\t0.125\t\n\
6\t-0.125\t\n";

/// Root id 17 appears first, smaller ids follow.
pub const ROOT_NOT_SMALLEST: &str = "dtree\n\
17\t0.0\t2:3:8\n\
3\t1.0\t\n\
8\t-1.0\t\n";

/// Node lines in generated text form: (id, base, branches).
pub type NodeSpec = (NodeId, f64, Vec<(FeatureId, NodeId, NodeId)>);

/// Render node specs as model text.
pub fn model_text(nodes: &[NodeSpec]) -> String {
    let mut text = String::from("dtree\n");
    for (id, base, branches) in nodes {
        let branch_list: Vec<String> = branches
            .iter()
            .map(|(f, y, n)| format!("{}:{}:{}", f, y, n))
            .collect();
        writeln!(text, "{}\t{}\t{}", id, base, branch_list.join("|")).unwrap();
    }
    text
}

/// Random acyclic forest: every branch of node `k` points at nodes defined
/// after it, so edges only go "down" and many targets are shared.
pub fn random_forest_spec(seed: u64, num_nodes: usize, num_features: FeatureId) -> Vec<NodeSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids: Vec<NodeId> = (0..num_nodes).map(|i| 1000 + (i as NodeId) * 7).collect();

    (0..num_nodes)
        .map(|k| {
            let base = rng.gen_range(-1.0..1.0);
            let remaining = num_nodes - k - 1;
            let num_branches = if remaining == 0 { 0 } else { rng.gen_range(0..=2) };
            let branches = (0..num_branches)
                .map(|_| {
                    let feature = rng.gen_range(1..=num_features);
                    let yes = ids[rng.gen_range(k + 1..num_nodes)];
                    let no = ids[rng.gen_range(k + 1..num_nodes)];
                    (feature, yes, no)
                })
                .collect();
            (ids[k], base, branches)
        })
        .collect()
}

/// Straightforward scoring over the specs, using linear membership tests.
pub fn reference_score(nodes: &[NodeSpec], root: NodeId, features: &[FeatureId]) -> f64 {
    let by_id: HashMap<NodeId, &NodeSpec> = nodes.iter().map(|n| (n.0, n)).collect();

    fn walk(by_id: &HashMap<NodeId, &NodeSpec>, id: NodeId, features: &[FeatureId]) -> f64 {
        let (_, base, branches) = by_id[&id];
        let mut acc = *base;
        for (feature, yes, no) in branches {
            let next = if features.contains(feature) { *yes } else { *no };
            acc += walk(by_id, next, features);
        }
        acc
    }

    walk(&by_id, root, features)
}
