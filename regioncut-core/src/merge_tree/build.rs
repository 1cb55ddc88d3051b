//! Merge tree construction by a Kruskal-order sweep over the region graph.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::{disjoint_set::DisjointSet, graph::RegionGraph, labeling::Labeling};

use super::{MergeTree, MergeTreeError, MergeTreeNode, NodeId, NodeKind};

impl MergeTree {
    /// Builds the merge tree of `graph` and starts the current partition at
    /// the root.
    ///
    /// Edges are taken by ascending weight, ties in canonical edge order.
    /// An edge whose endpoints are already in one component is skipped;
    /// every other edge creates an internal node over the nodes standing for
    /// its endpoints' components.
    ///
    /// # Errors
    /// Returns [`MergeTreeError::RegionCountMismatch`] when `labeling` and
    /// `graph` disagree on the region count,
    /// [`MergeTreeError::AdjacencyMismatch`] when the labeling was made over
    /// other edges than the graph's, and
    /// [`MergeTreeError::Disconnected`] when the graph does not reduce to a
    /// single component.
    #[instrument(
        name = "merge_tree.build",
        level = "debug",
        skip(labeling, graph),
        fields(regions = graph.region_count(), edges = graph.edges_ascending().len()),
    )]
    pub fn build(labeling: Labeling, graph: RegionGraph) -> Result<Self, MergeTreeError> {
        let leaf_count = graph.region_count();
        if labeling.region_count() != leaf_count {
            return Err(MergeTreeError::RegionCountMismatch {
                labeling: labeling.region_count(),
                graph: leaf_count,
            });
        }
        if labeling.adjacency() != graph.adjacency() {
            return Err(MergeTreeError::AdjacencyMismatch);
        }

        let mut nodes = Vec::with_capacity(leaf_count.saturating_mul(2).saturating_sub(1));
        nodes.extend((0..leaf_count).map(|region| MergeTreeNode {
            id: NodeId(region),
            parent: None,
            kind: NodeKind::Leaf { region },
            regions: vec![region],
        }));

        let mut dsu = DisjointSet::new(leaf_count);
        merge_edges(&mut dsu, &mut nodes, &graph);
        if dsu.set_count() != 1 {
            return Err(MergeTreeError::Disconnected {
                components: dsu.set_count(),
            });
        }

        let root = NodeId(nodes.len() - 1);
        debug!(
            internal = nodes.len() - leaf_count,
            root = root.index(),
            "built merge tree"
        );
        Ok(Self {
            graph,
            labeling,
            nodes,
            leaf_count,
            active: BTreeSet::from([root]),
        })
    }
}

fn merge_edges(dsu: &mut DisjointSet, nodes: &mut Vec<MergeTreeNode>, graph: &RegionGraph) {
    for &(edge, threshold) in graph.edges_ascending() {
        let left_root = dsu.find(edge.source());
        let right_root = dsu.find(edge.target());
        if left_root == right_root {
            continue;
        }
        let left = NodeId(dsu.component_node[left_root]);
        let right = NodeId(dsu.component_node[right_root]);
        let id = NodeId(nodes.len());
        let regions = merged_regions(&nodes[left.0].regions, &nodes[right.0].regions);
        nodes[left.0].parent = Some(id);
        nodes[right.0].parent = Some(id);
        nodes.push(MergeTreeNode {
            id,
            parent: None,
            kind: NodeKind::Internal {
                left,
                right,
                threshold,
            },
            regions,
        });
        let merged = dsu.union(left_root, right_root);
        dsu.component_node[merged] = id.0;
    }
}

fn merged_regions(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] < right[j] {
            merged.push(left[i]);
            i += 1;
        } else {
            merged.push(right[j]);
            j += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}
