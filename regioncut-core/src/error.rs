//! Error types for the regioncut core library.
//!
//! Every public error enum carries a stable, machine-readable code so
//! callers can branch or report without matching on message text.

use std::sync::Arc;

use thiserror::Error;

use crate::labeling::Label;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing an [`crate::Adjacency`] or
/// [`crate::RegionGraph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// The graph must contain at least one region.
    #[error("a region graph requires at least one region")]
    EmptyGraph,
    /// An edge referenced a region outside `0..region_count`.
    #[error("edge references region {region}, but region_count is {region_count}")]
    InvalidRegion {
        /// The offending region id.
        region: usize,
        /// Number of regions in the graph.
        region_count: usize,
    },
    /// An edge connected a region to itself.
    #[error("self-edge on region {region} is not allowed")]
    SelfLoop {
        /// Region appearing at both ends of the edge.
        region: usize,
    },
    /// The same unordered pair was supplied more than once.
    #[error("edge ({left}, {right}) was supplied more than once")]
    DuplicateEdge {
        /// Smaller endpoint id.
        left: usize,
        /// Larger endpoint id.
        right: usize,
    },
    /// An edge weight was negative or non-finite.
    #[error("invalid weight {weight} for edge ({left}, {right})")]
    InvalidWeight {
        /// Smaller endpoint id.
        left: usize,
        /// Larger endpoint id.
        right: usize,
        /// Rejected weight value.
        weight: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The graph must contain at least one region.
        EmptyGraph => EmptyGraph => "GRAPH_EMPTY",
        /// An edge referenced a region outside the graph.
        InvalidRegion => InvalidRegion { .. } => "GRAPH_INVALID_REGION",
        /// An edge connected a region to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The same unordered pair was supplied more than once.
        DuplicateEdge => DuplicateEdge { .. } => "GRAPH_DUPLICATE_EDGE",
        /// An edge weight was negative or non-finite.
        InvalidWeight => InvalidWeight { .. } => "GRAPH_INVALID_WEIGHT",
    }
}

/// An error produced while constructing or comparing [`crate::Labeling`]s.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LabelingError {
    /// The label vector did not cover every region exactly once.
    #[error("labeling has {labels} labels but the adjacency has {regions} regions")]
    LengthMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of regions in the adjacency.
        regions: usize,
    },
    /// The confidence matrix had the wrong number of rows.
    #[error("confidences cover {rows} regions but the labeling has {regions}")]
    ConfidenceRows {
        /// Rows in the confidence matrix.
        rows: usize,
        /// Regions in the labeling.
        regions: usize,
    },
    /// The confidence matrix had the wrong shape for its declared size.
    #[error("confidence matrix of {rows}x{columns} cannot hold {values} values")]
    ConfidenceShape {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// Two labelings being compared cover a different number of regions.
    #[error("cannot compare labelings over {left} and {right} regions")]
    RegionCountMismatch {
        /// Regions in the left-hand labeling.
        left: usize,
        /// Regions in the right-hand labeling.
        right: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`LabelingError`] variants.
    enum LabelingErrorCode for LabelingError {
        /// The label vector did not cover every region exactly once.
        LengthMismatch => LengthMismatch { .. } => "LABELING_LENGTH_MISMATCH",
        /// The confidence matrix had the wrong number of rows.
        ConfidenceRows => ConfidenceRows { .. } => "LABELING_CONFIDENCE_ROWS",
        /// The confidence matrix had the wrong shape.
        ConfidenceShape => ConfidenceShape { .. } => "LABELING_CONFIDENCE_SHAPE",
        /// Two labelings being compared cover a different number of regions.
        RegionCountMismatch => RegionCountMismatch { .. } => "LABELING_REGION_COUNT_MISMATCH",
    }
}

/// An error produced by [`crate::FeatureSource`] lookups.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FeatureError {
    /// Requested region was outside the source's bounds.
    #[error("feature source `{source_name}` has no region {region}")]
    OutOfBounds {
        /// Name of the feature source.
        source_name: Arc<str>,
        /// The requested region.
        region: usize,
    },
    /// Feature vectors must have positive dimension.
    #[error("feature vectors must have positive dimension")]
    ZeroDimension,
    /// The flat value buffer did not divide into rows of the stated dimension.
    #[error("{values} values do not form rows of dimension {dimension}")]
    RaggedData {
        /// Declared dimension.
        dimension: usize,
        /// Number of values supplied.
        values: usize,
    },
    /// Two feature vectors being compared had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand vector.
        left: usize,
        /// Dimensionality of the right-hand vector.
        right: usize,
    },
    /// A feature value was negative or non-finite.
    #[error("invalid feature value {value} for region {region}")]
    InvalidValue {
        /// Region owning the value.
        region: usize,
        /// Rejected value.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`FeatureError`] variants.
    enum FeatureErrorCode for FeatureError {
        /// Requested region was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "FEATURES_OUT_OF_BOUNDS",
        /// Feature vectors must have positive dimension.
        ZeroDimension => ZeroDimension => "FEATURES_ZERO_DIMENSION",
        /// The value buffer did not divide into rows.
        RaggedData => RaggedData { .. } => "FEATURES_RAGGED_DATA",
        /// Compared vectors had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "FEATURES_DIMENSION_MISMATCH",
        /// A feature value was negative or non-finite.
        InvalidValue => InvalidValue { .. } => "FEATURES_INVALID_VALUE",
    }
}

/// An error produced while validating configuration values.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The stochastic temperature must be finite and strictly positive.
    #[error("temperature must be finite and > 0 (got {got})")]
    InvalidTemperature {
        /// The rejected temperature.
        got: f64,
    },
    /// A label configuration needs at least one class.
    #[error("label configuration must contain at least one label")]
    NoLabels,
    /// A label appeared more than once in the class list.
    #[error("label {label} appears more than once")]
    DuplicateLabel {
        /// The repeated label.
        label: Label,
    },
    /// The background label was not part of the class list.
    #[error("background label {label} is not one of the configured labels")]
    UnknownBackground {
        /// The rejected background label.
        label: Label,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigError`] variants.
    enum ConfigErrorCode for ConfigError {
        /// The stochastic temperature must be finite and positive.
        InvalidTemperature => InvalidTemperature { .. } => "CONFIG_INVALID_TEMPERATURE",
        /// A label configuration needs at least one class.
        NoLabels => NoLabels => "CONFIG_NO_LABELS",
        /// A label appeared more than once.
        DuplicateLabel => DuplicateLabel { .. } => "CONFIG_DUPLICATE_LABEL",
        /// The background label was not configured.
        UnknownBackground => UnknownBackground { .. } => "CONFIG_UNKNOWN_BACKGROUND",
    }
}

/// An error produced by the connectivity partitioner.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PartitionError {
    /// The kept-edge adjacency covers a different number of regions.
    #[error("kept edges cover {kept} regions but the labeling has {regions}")]
    RegionCountMismatch {
        /// Regions in the kept-edge adjacency.
        kept: usize,
        /// Regions in the labeling.
        regions: usize,
    },
    /// A kept edge is absent from the labeling's adjacency.
    #[error("kept edge ({left}, {right}) is not an edge of the labeling")]
    UnknownEdge {
        /// Smaller endpoint id.
        left: usize,
        /// Larger endpoint id.
        right: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`PartitionError`] variants.
    enum PartitionErrorCode for PartitionError {
        /// The kept-edge adjacency covers a different number of regions.
        RegionCountMismatch => RegionCountMismatch { .. } => "PARTITION_REGION_COUNT_MISMATCH",
        /// A kept edge is absent from the labeling's adjacency.
        UnknownEdge => UnknownEdge { .. } => "PARTITION_UNKNOWN_EDGE",
    }
}

/// Error type produced when generating successor labelings.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SuccessorError {
    /// The feature source does not cover every region of the labeling.
    #[error("feature source `{source_name}` covers {available} regions but the labeling has {regions}")]
    InsufficientFeatures {
        /// Name of the feature source.
        source_name: Arc<str>,
        /// Regions covered by the feature source.
        available: usize,
        /// Regions in the labeling.
        regions: usize,
    },
    /// A feature lookup failed while weighting an edge.
    #[error("feature lookup failed: {source}")]
    Features {
        /// Underlying feature lookup error.
        #[from]
        source: FeatureError,
    },
    /// The connectivity partitioner rejected the cut.
    #[error("partitioning failed: {source}")]
    Partition {
        /// Underlying partitioning error.
        #[from]
        source: PartitionError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SuccessorError`] variants.
    enum SuccessorErrorCode for SuccessorError {
        /// The feature source does not cover every region.
        InsufficientFeatures => InsufficientFeatures { .. } => "SUCCESSOR_INSUFFICIENT_FEATURES",
        /// A feature lookup failed.
        FeatureFailure => Features { .. } => "SUCCESSOR_FEATURE_FAILURE",
        /// The connectivity partitioner failed.
        PartitionFailure => Partition { .. } => "SUCCESSOR_PARTITION_FAILURE",
    }
}

impl SuccessorError {
    /// Retrieve the inner [`FeatureErrorCode`] when the error originated in a
    /// [`crate::FeatureSource`].
    #[must_use]
    pub const fn feature_code(&self) -> Option<FeatureErrorCode> {
        match self {
            Self::Features { source } => Some(source.code()),
            _ => None,
        }
    }
}
