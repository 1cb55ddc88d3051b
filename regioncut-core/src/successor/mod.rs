//! Successor generation: candidate labelings one step away from a labeling.
//!
//! Two generators are provided. [`StochasticSuccessor`] cuts edges at
//! random, biased by feature dissimilarity, and relabels whole connected
//! pieces. [`FlipSuccessor`] changes one region at a time to a neighbouring
//! label. Both sit behind [`SuccessorFunction`] so a search loop can swap
//! them freely.

mod divergence;
mod flip;
mod stochastic;

use rand::RngCore;

use crate::{error::SuccessorError, features::FeatureSource, labeling::Labeling};

pub use self::{
    flip::FlipSuccessor,
    stochastic::{CutPolicy, EdgeCut, StochasticSuccessor, StochasticSuccessorBuilder},
};

/// Produces the successor labelings of a labeling.
///
/// Implementations never mutate their inputs; every successor is a fresh
/// [`Labeling`] sharing only immutable data with its source.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rand::{SeedableRng, rngs::SmallRng};
/// use regioncut_core::{
///     Adjacency, DenseFeatures, FlipSuccessor, Label, Labeling, StochasticSuccessor,
///     SuccessorFunction,
/// };
///
/// let adjacency = Arc::new(Adjacency::new(2, [(0, 1)])?);
/// let labeling = Labeling::new(adjacency, vec![Label::new(0), Label::new(1)])?;
/// let features = DenseFeatures::new("hist", 1, vec![1.0, 1.0])?;
/// let generators: Vec<Box<dyn SuccessorFunction>> = vec![
///     Box::new(FlipSuccessor),
///     Box::new(StochasticSuccessor::builder().build()?),
/// ];
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// for generator in &generators {
///     let successors = generator.generate_successors(&features, &labeling, &mut rng)?;
///     assert!(successors.len() <= 2);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait SuccessorFunction {
    /// Generates every successor of `labeling`.
    ///
    /// # Errors
    /// Returns [`SuccessorError`] when the features cannot weight the
    /// labeling's edges or the labeling cannot be partitioned.
    fn generate_successors(
        &self,
        features: &dyn FeatureSource,
        labeling: &Labeling,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Labeling>, SuccessorError>;
}

#[cfg(feature = "metrics")]
fn record_successors(count: usize) {
    metrics::counter!("successors_generated").increment(count as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_successors(_count: usize) {}
