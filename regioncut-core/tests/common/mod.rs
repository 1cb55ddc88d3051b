//! Fixtures shared by the integration suites.

use std::sync::Arc;

use regioncut_core::{Adjacency, DenseFeatures, Label, Labeling, RegionGraph};

/// Labels written as characters, `'A'` → 0, `'B'` → 1, and so on.
pub fn labels(raw: &str) -> Vec<Label> {
    raw.bytes()
        .map(|byte| Label::new(i32::from(byte - b'A')))
        .collect()
}

/// Labeling of `raw` over an adjacency of `edges`.
pub fn labeling(edges: &[(usize, usize)], raw: &str) -> Labeling {
    let adjacency = Adjacency::new(raw.len(), edges.iter().copied()).expect("valid adjacency");
    Labeling::new(Arc::new(adjacency), labels(raw)).expect("one label per region")
}

/// Row-major two-bin histograms.
pub fn histograms(rows: &[[f64; 2]]) -> DenseFeatures {
    let values = rows.iter().flatten().copied().collect();
    DenseFeatures::new("histograms", 2, values).expect("valid features")
}

/// Weighted graph plus a labeling over the same adjacency.
pub fn weighted(edges: &[(usize, usize, f64)], raw: &str) -> (Labeling, RegionGraph) {
    let graph =
        RegionGraph::from_edge_weights(raw.len(), edges.iter().copied()).expect("valid graph");
    let labeling = Labeling::new(Arc::new(graph.adjacency().clone()), labels(raw))
        .expect("one label per region");
    (labeling, graph)
}
