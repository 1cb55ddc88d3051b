//! Labelings: one class label per region over a fixed adjacency.
//!
//! A [`Labeling`] is a value. Clones share the immutable adjacency and cut
//! record through `Arc`, so successor generation can fan a single labeling
//! out into many candidates cheaply without any shared mutable state.

use std::{collections::BTreeSet, fmt, sync::Arc};

use tracing::debug;

use crate::{
    config::LabelConfig,
    error::LabelingError,
    graph::{Adjacency, Edge},
};

/// A class label attached to a region.
///
/// # Examples
/// ```
/// use regioncut_core::Label;
///
/// let label = Label::new(-1);
/// assert_eq!(label.get(), -1);
/// assert_eq!(label.to_string(), "-1");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label(i32);

impl Label {
    /// Wraps a raw class label.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw class label.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-region, per-class confidence values stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Confidences {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl Confidences {
    /// Builds a `rows × columns` matrix from row-major `values`.
    ///
    /// # Errors
    /// Returns [`LabelingError::ConfidenceShape`] when `values.len()` is not
    /// `rows * columns`.
    pub fn new(rows: usize, columns: usize, values: Vec<f64>) -> Result<Self, LabelingError> {
        if rows.checked_mul(columns) != Some(values.len()) {
            return Err(LabelingError::ConfidenceShape {
                rows,
                columns,
                values: values.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// Number of regions covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn rows(&self) -> usize { self.rows }

    /// Number of classes covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn columns(&self) -> usize { self.columns }

    /// Confidence of `region` for class column `class_index`.
    #[must_use]
    pub fn get(&self, region: usize, class_index: usize) -> Option<f64> {
        if region >= self.rows || class_index >= self.columns {
            return None;
        }
        self.values.get(region * self.columns + class_index).copied()
    }
}

/// An assignment of one label to every region of an adjacency.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use regioncut_core::{Adjacency, Label, Labeling};
///
/// let adjacency = Arc::new(Adjacency::new(3, [(0, 1), (1, 2)])?);
/// let labeling = Labeling::new(adjacency, vec![Label::new(1), Label::new(1), Label::new(2)])?;
/// assert_eq!(labeling.neighbour_labels(1).len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Labeling {
    adjacency: Arc<Adjacency>,
    labels: Vec<Label>,
    confidences: Option<Arc<Confidences>>,
    stochastic_cuts: Option<Arc<[Edge]>>,
}

impl Labeling {
    /// Labels every region of `adjacency`.
    ///
    /// # Errors
    /// Returns [`LabelingError::LengthMismatch`] when `labels` does not hold
    /// exactly one entry per region.
    pub fn new(adjacency: Arc<Adjacency>, labels: Vec<Label>) -> Result<Self, LabelingError> {
        if labels.len() != adjacency.region_count() {
            return Err(LabelingError::LengthMismatch {
                labels: labels.len(),
                regions: adjacency.region_count(),
            });
        }
        Ok(Self {
            adjacency,
            labels,
            confidences: None,
            stochastic_cuts: None,
        })
    }

    /// Attaches per-region class confidences.
    ///
    /// # Errors
    /// Returns [`LabelingError::ConfidenceRows`] when the matrix does not
    /// have one row per region.
    pub fn with_confidences(mut self, confidences: Confidences) -> Result<Self, LabelingError> {
        if confidences.rows() != self.region_count() {
            return Err(LabelingError::ConfidenceRows {
                rows: confidences.rows(),
                regions: self.region_count(),
            });
        }
        self.confidences = Some(Arc::new(confidences));
        Ok(self)
    }

    /// Number of labeled regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.labels.len()
    }

    /// The adjacency this labeling was made over.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Label of `region`, if it exists.
    #[must_use]
    pub fn label(&self, region: usize) -> Option<Label> {
        self.labels.get(region).copied()
    }

    /// All labels, indexed by region.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &[Label] { &self.labels }

    /// Distinct labels held by the neighbours of `region`.
    #[must_use]
    pub fn neighbour_labels(&self, region: usize) -> BTreeSet<Label> {
        self.adjacency
            .neighbours(region)
            .map(|neighbour| self.labels[neighbour])
            .collect()
    }

    /// Class confidences, when available.
    #[must_use]
    pub fn confidences(&self) -> Option<&Confidences> {
        self.confidences.as_deref()
    }

    /// Edges cut by the stochastic step that produced this labeling.
    #[must_use]
    pub fn stochastic_cuts(&self) -> Option<&[Edge]> {
        self.stochastic_cuts.as_deref()
    }

    /// Returns a copy with `regions` relabeled to `label`.
    pub(crate) fn relabeled<I>(&self, regions: I, label: Label) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut next = self.clone();
        for region in regions {
            next.labels[region] = label;
        }
        next
    }

    pub(crate) fn with_stochastic_cuts(mut self, cuts: Option<Arc<[Edge]>>) -> Self {
        self.stochastic_cuts = cuts;
        self
    }

    /// Returns a labeling with the same labels over a different adjacency.
    pub(crate) fn with_adjacency(&self, adjacency: Adjacency) -> Self {
        Self {
            adjacency: Arc::new(adjacency),
            labels: self.labels.clone(),
            confidences: self.confidences.clone(),
            stochastic_cuts: None,
        }
    }

    /// Relabels isolated, low-confidence foreground regions as background.
    ///
    /// A region is changed when its label is not background, none of its
    /// neighbours carries a foreground label, and its confidence for its
    /// own label is below `confidence_threshold`. Regions are visited in
    /// ascending order and see earlier changes. Does nothing without
    /// confidences or a configured background label.
    ///
    /// Returns the number of regions relabeled.
    pub fn eliminate_islands(&mut self, config: &LabelConfig, confidence_threshold: f64) -> usize {
        let Some(background) = config.background() else {
            return 0;
        };
        let Some(confidences) = self.confidences.clone() else {
            return 0;
        };

        let mut changed = 0;
        for region in 0..self.region_count() {
            let label = self.labels[region];
            if config.is_background(label) || self.has_foreground_neighbour(config, region) {
                continue;
            }
            let Some(confidence) = config
                .class_index(label)
                .and_then(|class| confidences.get(region, class))
            else {
                continue;
            };
            if confidence < confidence_threshold {
                self.labels[region] = background;
                changed += 1;
            }
        }
        debug!(changed, "eliminated foreground islands");
        changed
    }

    fn has_foreground_neighbour(&self, config: &LabelConfig, region: usize) -> bool {
        self.adjacency
            .neighbours(region)
            .any(|neighbour| !config.is_background(self.labels[neighbour]))
    }
}

/// Fraction of regions whose labels differ between `predicted` and `truth`.
///
/// # Errors
/// Returns [`LabelingError::RegionCountMismatch`] when the labelings cover a
/// different number of regions.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use regioncut_core::{Adjacency, Label, Labeling, hamming_loss};
///
/// let adjacency = Arc::new(Adjacency::empty(4));
/// let a = Labeling::new(Arc::clone(&adjacency), vec![Label::new(0); 4])?;
/// let b = Labeling::new(adjacency, vec![Label::new(0), Label::new(1), Label::new(0), Label::new(0)])?;
/// assert_eq!(hamming_loss(&a, &b)?, 0.25);
/// # Ok::<(), regioncut_core::LabelingError>(())
/// ```
pub fn hamming_loss(predicted: &Labeling, truth: &Labeling) -> Result<f64, LabelingError> {
    if predicted.region_count() != truth.region_count() {
        return Err(LabelingError::RegionCountMismatch {
            left: predicted.region_count(),
            right: truth.region_count(),
        });
    }
    if predicted.region_count() == 0 {
        return Ok(0.0);
    }
    let mismatched = predicted
        .labels()
        .iter()
        .zip(truth.labels())
        .filter(|(left, right)| left != right)
        .count();
    Ok(mismatched as f64 / predicted.region_count() as f64)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;

    fn label_vec(raw: &[i32]) -> Vec<Label> {
        raw.iter().copied().map(Label::new).collect()
    }

    fn chain(raw: &[i32]) -> Labeling {
        let adjacency = Adjacency::new(raw.len(), (1..raw.len()).map(|idx| (idx - 1, idx)))
            .expect("chain adjacency");
        Labeling::new(Arc::new(adjacency), label_vec(raw)).expect("labels cover the chain")
    }

    fn background_config() -> LabelConfig {
        LabelConfig::new(label_vec(&[0, 1, 2]), Some(Label::new(0))).expect("valid config")
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let err = Labeling::new(Arc::new(Adjacency::empty(3)), label_vec(&[1, 2]))
            .expect_err("two labels for three regions");
        assert_eq!(
            err,
            LabelingError::LengthMismatch {
                labels: 2,
                regions: 3
            }
        );
    }

    #[test]
    fn rejects_confidence_row_mismatch() {
        let confidences = Confidences::new(2, 1, vec![0.5, 0.5]).expect("2x1 matrix");
        let err = chain(&[1, 1, 1])
            .with_confidences(confidences)
            .expect_err("rows must match regions");
        assert!(matches!(err, LabelingError::ConfidenceRows { rows: 2, regions: 3 }));
    }

    #[rstest]
    #[case(2, 2, 3)]
    #[case(0, 3, 1)]
    fn rejects_misshapen_confidences(
        #[case] rows: usize,
        #[case] columns: usize,
        #[case] values: usize,
    ) {
        let err = Confidences::new(rows, columns, vec![0.0; values]).expect_err("bad shape");
        assert!(matches!(err, LabelingError::ConfidenceShape { .. }));
    }

    #[test]
    fn neighbour_labels_are_distinct() {
        let labeling = chain(&[4, 2, 4]);
        assert_eq!(
            labeling.neighbour_labels(1),
            BTreeSet::from([Label::new(4)])
        );
        assert_eq!(
            labeling.neighbour_labels(0),
            BTreeSet::from([Label::new(2)])
        );
    }

    #[test]
    fn relabeled_leaves_source_untouched() {
        let source = chain(&[1, 1, 2]);
        let next = source.relabeled([0, 1], Label::new(2));
        assert_eq!(source.labels(), label_vec(&[1, 1, 2]).as_slice());
        assert_eq!(next.labels(), label_vec(&[2, 2, 2]).as_slice());
    }

    #[test]
    fn eliminates_only_isolated_low_confidence_foreground() {
        // Regions: 0 bg, 1 fg(1) isolated low conf, 2 bg, 3 fg(2) high conf, 4 bg.
        let confidences = Confidences::new(
            5,
            3,
            vec![
                0.9, 0.05, 0.05, //
                0.4, 0.5, 0.1, //
                0.9, 0.05, 0.05, //
                0.1, 0.1, 0.8, //
                0.9, 0.05, 0.05,
            ],
        )
        .expect("5x3 matrix");
        let mut labeling = chain(&[0, 1, 0, 2, 0])
            .with_confidences(confidences)
            .expect("rows match");

        let changed = labeling.eliminate_islands(&background_config(), 0.75);

        assert_eq!(changed, 1);
        assert_eq!(labeling.labels(), label_vec(&[0, 0, 0, 2, 0]).as_slice());
    }

    #[test]
    fn keeps_foreground_with_foreground_neighbours() {
        let confidences = Confidences::new(2, 3, vec![0.0, 0.1, 0.0, 0.0, 0.1, 0.0])
            .expect("2x3 matrix");
        let mut labeling = chain(&[1, 1])
            .with_confidences(confidences)
            .expect("rows match");
        assert_eq!(labeling.eliminate_islands(&background_config(), 0.75), 0);
    }

    #[test]
    fn island_elimination_needs_confidences_and_background() {
        let mut labeling = chain(&[0, 1, 0]);
        assert_eq!(labeling.eliminate_islands(&background_config(), 0.75), 0);

        let no_background = LabelConfig::new(label_vec(&[0, 1]), None).expect("valid config");
        let confidences = Confidences::new(3, 2, vec![0.0; 6]).expect("3x2 matrix");
        let mut labeling = chain(&[0, 1, 0])
            .with_confidences(confidences)
            .expect("rows match");
        assert_eq!(labeling.eliminate_islands(&no_background, 0.75), 0);
    }

    #[rstest]
    #[case(&[1, 2, 3], &[1, 2, 3], 0.0)]
    #[case(&[1, 2, 3, 4], &[1, 0, 3, 0], 0.5)]
    #[case(&[1, 1], &[2, 2], 1.0)]
    fn hamming_loss_counts_mismatches(
        #[case] predicted: &[i32],
        #[case] truth: &[i32],
        #[case] expected: f64,
    ) {
        let loss = hamming_loss(&chain(predicted), &chain(truth)).expect("same size");
        assert!((loss - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn hamming_loss_rejects_size_mismatch() {
        let err = hamming_loss(&chain(&[1]), &chain(&[1, 2])).expect_err("different sizes");
        assert!(matches!(err, LabelingError::RegionCountMismatch { left: 1, right: 2 }));
    }
}
