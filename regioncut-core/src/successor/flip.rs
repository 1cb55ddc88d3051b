//! Single-region label flips.

use std::collections::BTreeSet;

use rand::RngCore;
use tracing::{debug, instrument};

use crate::{error::SuccessorError, features::FeatureSource, labeling::Labeling};

use super::{SuccessorFunction, record_successors};

/// Proposes, for every region, each neighbouring label it does not hold.
///
/// Features and randomness are ignored. Successors carry no cut record.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rand::rngs::mock::StepRng;
/// use regioncut_core::{
///     Adjacency, DenseFeatures, FlipSuccessor, Label, Labeling, SuccessorFunction,
/// };
///
/// let adjacency = Arc::new(Adjacency::new(3, [(0, 1), (1, 2)])?);
/// let labeling = Labeling::new(
///     adjacency,
///     vec![Label::new(1), Label::new(1), Label::new(2)],
/// )?;
/// let features = DenseFeatures::new("unused", 1, vec![1.0; 3])?;
///
/// let successors =
///     FlipSuccessor.generate_successors(&features, &labeling, &mut StepRng::new(0, 0))?;
/// // Region 1 may take label 2, region 2 may take label 1.
/// assert_eq!(successors.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FlipSuccessor;

impl FlipSuccessor {
    /// Every flip successor of `labeling`, regions ascending then labels
    /// ascending.
    #[must_use]
    pub fn flips(&self, labeling: &Labeling) -> Vec<Labeling> {
        let cleared = labeling.clone().with_stochastic_cuts(None);
        let mut successors = Vec::new();
        for (region, &own) in labeling.labels().iter().enumerate() {
            let mut candidates: BTreeSet<_> = labeling.neighbour_labels(region);
            candidates.remove(&own);
            successors.extend(
                candidates
                    .into_iter()
                    .map(|label| cleared.relabeled([region], label)),
            );
        }
        successors
    }
}

impl SuccessorFunction for FlipSuccessor {
    #[instrument(
        name = "successor.flip",
        level = "debug",
        skip(self, _features, labeling, _rng),
        fields(regions = labeling.region_count()),
    )]
    fn generate_successors(
        &self,
        _features: &dyn FeatureSource,
        labeling: &Labeling,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Labeling>, SuccessorError> {
        let successors = self.flips(labeling);
        debug!(successors = successors.len(), "generated flip successors");
        record_successors(successors.len());
        Ok(successors)
    }
}
