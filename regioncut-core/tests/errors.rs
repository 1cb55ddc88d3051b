use std::sync::Arc;

use regioncut_core::{
    ConfigError, ConfigErrorCode, FeatureError, FeatureErrorCode, GraphError, GraphErrorCode,
    Label, LabelingError, LabelingErrorCode, MergeTreeError, MergeTreeErrorCode, PartitionError,
    PartitionErrorCode, SuccessorError, SuccessorErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(GraphError::EmptyGraph, GraphErrorCode::EmptyGraph, "GRAPH_EMPTY")]
#[case(
    GraphError::InvalidRegion { region: 9, region_count: 3 },
    GraphErrorCode::InvalidRegion,
    "GRAPH_INVALID_REGION",
)]
#[case(GraphError::SelfLoop { region: 1 }, GraphErrorCode::SelfLoop, "GRAPH_SELF_LOOP")]
#[case(
    GraphError::DuplicateEdge { left: 0, right: 1 },
    GraphErrorCode::DuplicateEdge,
    "GRAPH_DUPLICATE_EDGE",
)]
#[case(
    GraphError::InvalidWeight { left: 0, right: 1, weight: -1.0 },
    GraphErrorCode::InvalidWeight,
    "GRAPH_INVALID_WEIGHT",
)]
fn returns_expected_graph_code(
    #[case] error: GraphError,
    #[case] expected: GraphErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
    assert_eq!(error.code().to_string(), text);
}

#[rstest]
#[case(
    LabelingError::LengthMismatch { labels: 1, regions: 2 },
    LabelingErrorCode::LengthMismatch,
)]
#[case(
    LabelingError::ConfidenceRows { rows: 1, regions: 2 },
    LabelingErrorCode::ConfidenceRows,
)]
#[case(
    LabelingError::ConfidenceShape { rows: 1, columns: 2, values: 3 },
    LabelingErrorCode::ConfidenceShape,
)]
#[case(
    LabelingError::RegionCountMismatch { left: 1, right: 2 },
    LabelingErrorCode::RegionCountMismatch,
)]
fn returns_expected_labeling_code(
    #[case] error: LabelingError,
    #[case] expected: LabelingErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert!(error.code().as_str().starts_with("LABELING_"));
}

#[rstest]
#[case(ConfigError::InvalidTemperature { got: 0.0 }, ConfigErrorCode::InvalidTemperature)]
#[case(ConfigError::NoLabels, ConfigErrorCode::NoLabels)]
#[case(
    ConfigError::DuplicateLabel { label: Label::new(3) },
    ConfigErrorCode::DuplicateLabel,
)]
#[case(
    ConfigError::UnknownBackground { label: Label::new(-1) },
    ConfigErrorCode::UnknownBackground,
)]
fn returns_expected_config_code(#[case] error: ConfigError, #[case] expected: ConfigErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.code().as_str().starts_with("CONFIG_"));
}

#[rstest]
#[case(
    PartitionError::RegionCountMismatch { kept: 1, regions: 2 },
    PartitionErrorCode::RegionCountMismatch,
)]
#[case(PartitionError::UnknownEdge { left: 0, right: 5 }, PartitionErrorCode::UnknownEdge)]
fn returns_expected_partition_code(
    #[case] error: PartitionError,
    #[case] expected: PartitionErrorCode,
) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(
    SuccessorError::InsufficientFeatures {
        source_name: Arc::from("hist"),
        available: 1,
        regions: 2,
    },
    SuccessorErrorCode::InsufficientFeatures,
    None,
)]
#[case(
    SuccessorError::from(FeatureError::DimensionMismatch { left: 2, right: 3 }),
    SuccessorErrorCode::FeatureFailure,
    Some(FeatureErrorCode::DimensionMismatch),
)]
#[case(
    SuccessorError::from(FeatureError::OutOfBounds { source_name: Arc::from("hist"), region: 4 }),
    SuccessorErrorCode::FeatureFailure,
    Some(FeatureErrorCode::OutOfBounds),
)]
#[case(
    SuccessorError::from(PartitionError::UnknownEdge { left: 0, right: 1 }),
    SuccessorErrorCode::PartitionFailure,
    None,
)]
fn returns_expected_successor_code(
    #[case] error: SuccessorError,
    #[case] expected: SuccessorErrorCode,
    #[case] feature_code: Option<FeatureErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.feature_code(), feature_code);
}

#[rstest]
#[case(
    MergeTreeError::RegionCountMismatch { labeling: 2, graph: 3 },
    MergeTreeErrorCode::RegionCountMismatch,
    "MERGE_TREE_REGION_COUNT_MISMATCH",
)]
#[case(
    MergeTreeError::AdjacencyMismatch,
    MergeTreeErrorCode::AdjacencyMismatch,
    "MERGE_TREE_ADJACENCY_MISMATCH",
)]
#[case(
    MergeTreeError::Disconnected { components: 2 },
    MergeTreeErrorCode::Disconnected,
    "MERGE_TREE_DISCONNECTED",
)]
fn returns_expected_merge_tree_code(
    #[case] error: MergeTreeError,
    #[case] expected: MergeTreeErrorCode,
    #[case] text: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), text);
}

#[test]
fn successor_errors_expose_their_source() {
    use std::error::Error as _;

    let error = SuccessorError::from(FeatureError::ZeroDimension);
    let source = error.source().expect("feature failures carry a source");
    assert_eq!(source.to_string(), FeatureError::ZeroDimension.to_string());
}
