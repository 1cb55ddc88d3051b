//! Agglomerative merge tree over the regions of a weighted region graph.
//!
//! The tree is built once by sweeping edges in non-decreasing weight order
//! and merging the components of their endpoints, one binary internal node
//! per merge. Nodes live in an arena indexed by [`NodeId`]: leaves first
//! (leaf id equals region id), then internal nodes in creation order, so the
//! root is always the last node.
//!
//! On top of the fixed hierarchy the tree keeps a mutable cut, the current
//! partition. [`MergeTree::split`] replaces an active node by its children and
//! [`MergeTree::merge`] replaces an active node and its active sibling by
//! their parent. Requests that do not fit the current partition are reported
//! through [`PartitionOutcome`] and leave the partition untouched.

mod build;

use std::{collections::BTreeSet, fmt};

use tracing::warn;

use crate::{graph::RegionGraph, labeling::Labeling};

/// Index of a node in a [`MergeTree`] arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node stands for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// A single region.
    Leaf {
        /// The region id.
        region: usize,
    },
    /// The merge of two subtrees at `threshold`.
    Internal {
        /// Node standing for the component of the merge edge's smaller endpoint.
        left: NodeId,
        /// Node standing for the component of the larger endpoint.
        right: NodeId,
        /// Edge weight at which the merge happened.
        threshold: f64,
    },
}

/// One node of a [`MergeTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct MergeTreeNode {
    id: NodeId,
    parent: Option<NodeId>,
    kind: NodeKind,
    regions: Vec<usize>,
}

impl MergeTreeNode {
    /// This node's arena index.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> NodeId { self.id }

    /// The parent node, `None` for the root.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> Option<NodeId> { self.parent }

    /// Whether this is a leaf or an internal merge.
    #[must_use]
    #[rustfmt::skip]
    pub fn kind(&self) -> NodeKind { self.kind }

    /// Regions under this node in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn regions(&self) -> &[usize] { &self.regions }

    /// Whether the node wraps a single region.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The children of an internal node.
    #[must_use]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Internal { left, right, .. } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// The merge threshold of an internal node.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Internal { threshold, .. } => Some(threshold),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// Result of a [`MergeTree::split`] or [`MergeTree::merge`] request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum PartitionOutcome {
    /// The partition changed.
    Applied,
    /// The node is not in the current partition.
    NotActive,
    /// Leaves cannot be split.
    LeafNode,
    /// The root cannot be merged.
    RootNode,
    /// The node's sibling is not in the current partition.
    SiblingInactive,
}

impl PartitionOutcome {
    /// Whether the request changed the partition.
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::NotActive => "NOT_ACTIVE",
            Self::LeafNode => "LEAF_NODE",
            Self::RootNode => "ROOT_NODE",
            Self::SiblingInactive => "SIBLING_INACTIVE",
        }
    }
}

/// Errors returned by merge tree construction.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MergeTreeError {
    /// The labeling and graph describe different numbers of regions.
    #[error("labeling has {labeling} regions but the graph has {graph}")]
    RegionCountMismatch {
        /// Regions in the labeling.
        labeling: usize,
        /// Regions in the graph.
        graph: usize,
    },
    /// The labeling was made over a different adjacency than the graph's.
    #[error("labeling adjacency does not match the region graph's edges")]
    AdjacencyMismatch,
    /// The graph did not reduce to a single component.
    #[error("region graph is disconnected: {components} components remain after merging")]
    Disconnected {
        /// Top-level components left after every edge was processed.
        components: usize,
    },
}

impl MergeTreeError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> MergeTreeErrorCode {
        match self {
            Self::RegionCountMismatch { .. } => MergeTreeErrorCode::RegionCountMismatch,
            Self::AdjacencyMismatch => MergeTreeErrorCode::AdjacencyMismatch,
            Self::Disconnected { .. } => MergeTreeErrorCode::Disconnected,
        }
    }
}

/// Machine-readable error codes for [`MergeTreeError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum MergeTreeErrorCode {
    /// The labeling and graph disagree on the region count.
    RegionCountMismatch,
    /// The labeling and graph disagree on the edges.
    AdjacencyMismatch,
    /// The graph is not connected.
    Disconnected,
}

impl MergeTreeErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegionCountMismatch => "MERGE_TREE_REGION_COUNT_MISMATCH",
            Self::AdjacencyMismatch => "MERGE_TREE_ADJACENCY_MISMATCH",
            Self::Disconnected => "MERGE_TREE_DISCONNECTED",
        }
    }
}

/// A binary merge hierarchy with a mutable current partition.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use regioncut_core::{Label, Labeling, MergeTree, RegionGraph};
///
/// let graph = RegionGraph::from_edge_weights(3, [(0, 1, 0.2), (1, 2, 0.7)])?;
/// let labeling = Labeling::new(
///     Arc::new(graph.adjacency().clone()),
///     vec![Label::new(0), Label::new(0), Label::new(1)],
/// )?;
/// let mut tree = MergeTree::build(labeling, graph)?;
/// assert_eq!(tree.internal_count(), 2);
///
/// let root = tree.root();
/// assert!(tree.split(root).is_applied());
/// assert_eq!(tree.current_partition().len(), 2);
///
/// let cut = tree.thresholded_cut(0.5);
/// assert_eq!(cut.adjacency().edge_count(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct MergeTree {
    graph: RegionGraph,
    labeling: Labeling,
    nodes: Vec<MergeTreeNode>,
    leaf_count: usize,
    active: BTreeSet<NodeId>,
}

impl MergeTree {
    /// The root node; the single leaf when there is only one region.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(self.nodes.len() - 1)
    }

    /// The node at `id`, `None` when it is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&MergeTreeNode> {
        self.nodes.get(id.0)
    }

    /// Every node in id order: leaves first, then internal nodes in creation
    /// order.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[MergeTreeNode] { &self.nodes }

    /// The leaf of `region`.
    #[must_use]
    pub fn leaf(&self, region: usize) -> Option<NodeId> {
        (region < self.leaf_count).then_some(NodeId(region))
    }

    /// Number of leaves, one per region.
    #[must_use]
    #[rustfmt::skip]
    pub fn leaf_count(&self) -> usize { self.leaf_count }

    /// Number of internal nodes.
    #[must_use]
    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count
    }

    /// The parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(MergeTreeNode::parent)
    }

    /// The children of `id` when it is an internal node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.node(id).and_then(MergeTreeNode::children)
    }

    /// The other child of `id`'s parent.
    #[must_use]
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let (left, right) = self.children(self.parent(id)?)?;
        Some(if left == id { right } else { left })
    }

    /// Every distinct edge weight of the graph in ascending order.
    ///
    /// Each value is a level at which [`MergeTree::thresholded_cut`] yields a
    /// different cut, including weights of edges that closed a cycle and so
    /// never created a node.
    #[must_use]
    pub fn all_weights(&self) -> Vec<f64> {
        self.graph.all_distinct_weights()
    }

    /// Merge thresholds of the internal nodes in creation order.
    #[must_use]
    pub fn merge_thresholds(&self) -> Vec<f64> {
        self.internal_nodes()
            .iter()
            .filter_map(MergeTreeNode::threshold)
            .collect()
    }

    /// The most recently created internal node whose threshold is at most
    /// `threshold`.
    ///
    /// Returns `None` when no merge happened at or below `threshold`.
    #[must_use]
    pub fn level(&self, threshold: f64) -> Option<NodeId> {
        let internal = self.internal_nodes();
        let count = internal.partition_point(|node| {
            node.threshold()
                .is_some_and(|value| value.total_cmp(&threshold).is_le())
        });
        count.checked_sub(1).map(|offset| internal[offset].id)
    }

    /// The weighted graph the tree was built from.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &RegionGraph { &self.graph }

    /// The labeling the tree was built with.
    #[must_use]
    #[rustfmt::skip]
    pub fn labeling(&self) -> &Labeling { &self.labeling }

    fn internal_nodes(&self) -> &[MergeTreeNode] {
        &self.nodes[self.leaf_count..]
    }

    /// Nodes currently forming the partition.
    #[must_use]
    #[rustfmt::skip]
    pub fn current_partition(&self) -> &BTreeSet<NodeId> { &self.active }

    /// Whether `id` is in the current partition.
    #[must_use]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active.contains(&id)
    }

    /// Whether `id` has a sibling and that sibling is in the current
    /// partition.
    #[must_use]
    pub fn is_sibling_in_partition(&self, id: NodeId) -> bool {
        self.sibling(id).is_some_and(|sibling| self.is_active(sibling))
    }

    /// Replaces active internal node `id` by its two children.
    pub fn split(&mut self, id: NodeId) -> PartitionOutcome {
        if !self.is_active(id) {
            return rejected("split", id, PartitionOutcome::NotActive);
        }
        let Some((left, right)) = self.children(id) else {
            return rejected("split", id, PartitionOutcome::LeafNode);
        };
        self.active.remove(&id);
        self.active.insert(left);
        self.active.insert(right);
        PartitionOutcome::Applied
    }

    /// Replaces active node `id` and its active sibling by their parent.
    pub fn merge(&mut self, id: NodeId) -> PartitionOutcome {
        if !self.is_active(id) {
            return rejected("merge", id, PartitionOutcome::NotActive);
        }
        let Some(parent) = self.parent(id) else {
            return rejected("merge", id, PartitionOutcome::RootNode);
        };
        let Some(sibling) = self.sibling(id).filter(|&sibling| self.is_active(sibling)) else {
            return rejected("merge", id, PartitionOutcome::SiblingInactive);
        };
        self.active.remove(&id);
        self.active.remove(&sibling);
        self.active.insert(parent);
        PartitionOutcome::Applied
    }

    /// For every region, the active node containing it.
    #[must_use]
    pub fn partition_assignment(&self) -> Vec<NodeId> {
        let mut assignment = vec![self.root(); self.leaf_count];
        for &id in &self.active {
            for &region in self.nodes[id.0].regions() {
                assignment[region] = id;
            }
        }
        assignment
    }

    /// A new labeling keeping only graph edges heavier than `value`.
    ///
    /// Labels and confidences come from the tree's labeling. The current
    /// partition is not consulted or changed.
    #[must_use]
    pub fn thresholded_cut(&self, value: f64) -> Labeling {
        self.labeling.with_adjacency(self.graph.thresholded(value))
    }
}

fn rejected(operation: &'static str, node: NodeId, outcome: PartitionOutcome) -> PartitionOutcome {
    warn!(
        operation,
        node = node.index(),
        outcome = outcome.as_str(),
        "partition operation rejected"
    );
    record_rejected();
    outcome
}

#[cfg(feature = "metrics")]
fn record_rejected() {
    metrics::counter!("partition_operations_rejected").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_rejected() {}
