//! Regioncut core library.
//!
//! A region-graph partitioning engine for structured prediction over image
//! regions. It proposes candidate labelings by cutting a labeled adjacency
//! graph at random and relabeling the pieces, or by flipping single regions,
//! and it builds an agglomerative merge tree over a weighted region graph
//! with a mutable cut through the hierarchy.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod disjoint_set;
mod error;
mod features;
mod graph;
mod labeling;
mod merge_tree;
mod partition;
mod successor;

#[cfg(test)]
mod test_utils;

pub use crate::{
    config::LabelConfig,
    error::{
        ConfigError, ConfigErrorCode, FeatureError, FeatureErrorCode, GraphError,
        GraphErrorCode, LabelingError, LabelingErrorCode, PartitionError, PartitionErrorCode,
        SuccessorError, SuccessorErrorCode,
    },
    features::{DenseFeatures, FeatureSource},
    graph::{Adjacency, Edge, RegionGraph},
    labeling::{Confidences, Label, Labeling, hamming_loss},
    merge_tree::{
        MergeTree, MergeTreeError, MergeTreeErrorCode, MergeTreeNode, NodeId, NodeKind,
        PartitionOutcome,
    },
    partition::{ConnectedComponent, Partition},
    successor::{
        CutPolicy, EdgeCut, FlipSuccessor, StochasticSuccessor, StochasticSuccessorBuilder,
        SuccessorFunction,
    },
};
