//! Unit tests for adjacency and weighted region graphs.

use rstest::rstest;

use crate::error::{GraphError, GraphErrorCode};

use super::{Adjacency, Edge, RegionGraph};

fn chain(weights: &[f64]) -> RegionGraph {
    RegionGraph::from_edge_weights(
        weights.len() + 1,
        weights
            .iter()
            .enumerate()
            .map(|(idx, weight)| (idx, idx + 1, *weight)),
    )
    .expect("chain graph must be valid")
}

#[test]
fn adjacency_is_symmetric_and_deduplicated() {
    let adjacency = Adjacency::new(4, [(0, 1), (1, 0), (3, 2), (1, 2)]).expect("valid edges");

    assert_eq!(adjacency.edge_count(), 3);
    assert_eq!(adjacency.neighbours(1).collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(adjacency.neighbours(2).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(adjacency.degree(3), 1);
    assert!(adjacency.contains_edge(2, 3));
    assert!(adjacency.contains_edge(3, 2));
    assert!(!adjacency.contains_edge(0, 3));
}

#[test]
fn edges_are_listed_once_in_canonical_order() {
    let adjacency = Adjacency::new(4, [(3, 2), (2, 0), (1, 0)]).expect("valid edges");
    let edges: Vec<_> = adjacency.edges().collect();
    assert_eq!(
        edges,
        vec![Edge::new(0, 1), Edge::new(0, 2), Edge::new(2, 3)]
    );
}

#[test]
fn unknown_regions_have_no_neighbours() {
    let adjacency = Adjacency::empty(2);
    assert_eq!(adjacency.neighbours(7).count(), 0);
    assert_eq!(adjacency.degree(7), 0);
}

#[rstest]
#[case(vec![(0, 3)], GraphErrorCode::InvalidRegion)]
#[case(vec![(1, 1)], GraphErrorCode::SelfLoop)]
fn adjacency_rejects_bad_pairs(#[case] pairs: Vec<(usize, usize)>, #[case] code: GraphErrorCode) {
    let err = Adjacency::new(3, pairs).expect_err("pairs must be rejected");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case(0, vec![], GraphErrorCode::EmptyGraph)]
#[case(2, vec![(0, 2, 1.0)], GraphErrorCode::InvalidRegion)]
#[case(2, vec![(0, 0, 1.0)], GraphErrorCode::SelfLoop)]
#[case(2, vec![(0, 1, 1.0), (1, 0, 2.0)], GraphErrorCode::DuplicateEdge)]
#[case(2, vec![(0, 1, -0.5)], GraphErrorCode::InvalidWeight)]
#[case(2, vec![(0, 1, f64::NAN)], GraphErrorCode::InvalidWeight)]
#[case(2, vec![(0, 1, f64::INFINITY)], GraphErrorCode::InvalidWeight)]
fn region_graph_rejects_invalid_input(
    #[case] region_count: usize,
    #[case] edges: Vec<(usize, usize, f64)>,
    #[case] code: GraphErrorCode,
) {
    let err = RegionGraph::from_edge_weights(region_count, edges).expect_err("input is invalid");
    assert_eq!(err.code(), code);
}

#[test]
fn duplicate_edge_reports_canonical_endpoints() {
    let err = RegionGraph::from_edge_weights(3, [(2, 1, 0.5), (1, 2, 0.5)])
        .expect_err("duplicate pair");
    assert_eq!(err, GraphError::DuplicateEdge { left: 1, right: 2 });
}

#[test]
fn weight_lookup_is_order_independent() {
    let graph = RegionGraph::from_edge_weights(3, [(2, 0, 0.7), (0, 1, 0.2)]).expect("valid");
    assert_eq!(graph.weight(0, 2), Some(0.7));
    assert_eq!(graph.weight(2, 0), Some(0.7));
    assert_eq!(graph.weight(1, 2), None);
}

#[test]
fn distinct_weights_are_sorted_and_deduplicated() {
    let graph = chain(&[0.5, 0.1, 0.5, 0.3, 0.1]);
    assert_eq!(graph.all_distinct_weights(), vec![0.1, 0.3, 0.5]);
}

#[test]
fn negative_zero_groups_with_zero() {
    let graph = RegionGraph::from_edge_weights(3, [(0, 1, -0.0), (1, 2, 0.0)]).expect("valid");
    assert_eq!(graph.all_distinct_weights().len(), 1);
}

#[test]
fn edges_ascending_breaks_ties_by_endpoints() {
    let graph = RegionGraph::from_edge_weights(4, [(2, 3, 0.2), (0, 1, 0.2), (1, 2, 0.1)])
        .expect("valid");
    let order: Vec<_> = graph
        .edges_ascending()
        .iter()
        .map(|(edge, _)| (edge.source(), edge.target()))
        .collect();
    assert_eq!(order, vec![(1, 2), (0, 1), (2, 3)]);
}

#[rstest]
#[case(0.05, 4)]
#[case(0.1, 3)]
#[case(0.25, 3)]
#[case(0.3, 2)]
#[case(0.5, 0)]
#[case(9.0, 0)]
fn thresholded_keeps_edges_strictly_above_value(#[case] value: f64, #[case] expected: usize) {
    let graph = chain(&[0.5, 0.1, 0.5, 0.3]);
    let cut = graph.thresholded(value);
    assert_eq!(cut.region_count(), 5);
    assert_eq!(cut.edge_count(), expected);
    for edge in cut.edges() {
        let weight = graph
            .weight(edge.source(), edge.target())
            .expect("kept edges exist in the graph");
        assert!(weight > value);
    }
}

#[test]
fn graph_without_edges_has_no_weights() {
    let graph = RegionGraph::from_edge_weights(1, []).expect("single region is valid");
    assert!(graph.all_distinct_weights().is_empty());
    assert_eq!(graph.thresholded(0.0).edge_count(), 0);
}
