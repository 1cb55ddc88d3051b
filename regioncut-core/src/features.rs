//! Feature lookup abstractions consumed by the stochastic successor.
//!
//! Feature extraction itself happens elsewhere; the engine only needs a
//! non-negative vector per region to derive edge dissimilarities.

use std::sync::Arc;

use crate::error::FeatureError;

/// Abstraction over per-region feature vectors.
///
/// # Examples
/// ```
/// use regioncut_core::{FeatureError, FeatureSource};
///
/// struct Constant(Vec<f64>, usize);
///
/// impl FeatureSource for Constant {
///     fn region_count(&self) -> usize { self.1 }
///     fn name(&self) -> &str { "constant" }
///     fn features(&self, _region: usize) -> Result<&[f64], FeatureError> { Ok(&self.0) }
/// }
///
/// let source = Constant(vec![0.5, 0.5], 3);
/// assert_eq!(source.region_count(), 3);
/// assert_eq!(source.features(2)?, &[0.5, 0.5]);
/// # Ok::<(), FeatureError>(())
/// ```
pub trait FeatureSource {
    /// Number of regions with features.
    fn region_count(&self) -> usize;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Feature vector of `region`.
    ///
    /// # Errors
    /// Implementations must return [`FeatureError::OutOfBounds`] for regions
    /// they do not cover.
    fn features(&self, region: usize) -> Result<&[f64], FeatureError>;
}

/// Feature vectors backed by a contiguous row-major buffer.
///
/// # Examples
/// ```
/// use regioncut_core::{DenseFeatures, FeatureSource};
///
/// let features = DenseFeatures::new("hist", 2, vec![0.2, 0.8, 0.6, 0.4])?;
/// assert_eq!(features.region_count(), 2);
/// assert_eq!(features.features(1)?, &[0.6, 0.4]);
/// # Ok::<(), regioncut_core::FeatureError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseFeatures {
    name: Arc<str>,
    dimension: usize,
    values: Vec<f64>,
}

impl DenseFeatures {
    /// Validates and wraps a row-major matrix of `dimension` columns.
    ///
    /// # Errors
    /// Returns [`FeatureError::ZeroDimension`] when `dimension == 0`,
    /// [`FeatureError::RaggedData`] when `values` does not split into whole
    /// rows, and [`FeatureError::InvalidValue`] for negative or non-finite
    /// entries.
    pub fn new(
        name: impl Into<Arc<str>>,
        dimension: usize,
        values: Vec<f64>,
    ) -> Result<Self, FeatureError> {
        if dimension == 0 {
            return Err(FeatureError::ZeroDimension);
        }
        if values.len() % dimension != 0 {
            return Err(FeatureError::RaggedData {
                dimension,
                values: values.len(),
            });
        }
        if let Some((position, value)) = values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(FeatureError::InvalidValue {
                region: position / dimension,
                value,
            });
        }
        Ok(Self {
            name: name.into(),
            dimension,
            values,
        })
    }

    /// Builds a source from one vector per region.
    ///
    /// # Errors
    /// As [`Self::new`], plus [`FeatureError::DimensionMismatch`] when rows
    /// differ in length.
    pub fn from_rows(
        name: impl Into<Arc<str>>,
        rows: &[Vec<f64>],
    ) -> Result<Self, FeatureError> {
        let dimension = rows.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(dimension * rows.len());
        for row in rows {
            if row.len() != dimension {
                return Err(FeatureError::DimensionMismatch {
                    left: dimension,
                    right: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Self::new(name, dimension, values)
    }

    /// Returns the dimensionality of each row.
    #[must_use]
    #[rustfmt::skip]
    pub fn dimension(&self) -> usize { self.dimension }
}

impl FeatureSource for DenseFeatures {
    fn region_count(&self) -> usize {
        self.values.len() / self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn features(&self, region: usize) -> Result<&[f64], FeatureError> {
        let start = region.checked_mul(self.dimension);
        let end = start.and_then(|start| start.checked_add(self.dimension));
        start
            .zip(end)
            .and_then(|(start, end)| self.values.get(start..end))
            .ok_or_else(|| FeatureError::OutOfBounds {
                source_name: Arc::clone(&self.name),
                region,
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::FeatureErrorCode;

    #[rstest]
    #[case(0, vec![], FeatureErrorCode::ZeroDimension)]
    #[case(2, vec![0.1, 0.2, 0.3], FeatureErrorCode::RaggedData)]
    #[case(1, vec![0.1, -0.2], FeatureErrorCode::InvalidValue)]
    #[case(1, vec![f64::NAN], FeatureErrorCode::InvalidValue)]
    fn rejects_invalid_matrices(
        #[case] dimension: usize,
        #[case] values: Vec<f64>,
        #[case] code: FeatureErrorCode,
    ) {
        let err = DenseFeatures::new("bad", dimension, values).expect_err("matrix is invalid");
        assert_eq!(err.code(), code);
    }

    #[test]
    fn invalid_value_reports_owning_region() {
        let err = DenseFeatures::new("bad", 2, vec![0.0, 0.1, 0.2, -1.0])
            .expect_err("negative entry");
        assert_eq!(
            err,
            FeatureError::InvalidValue {
                region: 1,
                value: -1.0
            }
        );
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = DenseFeatures::from_rows("ragged", &[vec![0.1, 0.2], vec![0.3]])
            .expect_err("rows differ in length");
        assert!(matches!(
            err,
            FeatureError::DimensionMismatch { left: 2, right: 1 }
        ));
    }

    #[test]
    fn out_of_bounds_lookup_names_the_source() {
        let features = DenseFeatures::new("hist", 1, vec![0.5]).expect("valid");
        let err = features.features(3).expect_err("region 3 is missing");
        assert_eq!(err.code(), FeatureErrorCode::OutOfBounds);
        assert!(err.to_string().contains("hist"));
    }
}
