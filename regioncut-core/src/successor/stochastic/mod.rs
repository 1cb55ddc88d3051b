//! Stochastic successor generation by weighted random edge cutting.
//!
//! Each edge is weighted by `w = exp(-(KL(p‖q) + KL(q‖p)) · T / 2)` where
//! `p` and `q` are the endpoint feature vectors and `T` the temperature.
//! Similar regions get weights near one and are rarely separated. After the
//! cut, every connected piece is offered every label bordering it.

use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::{debug, instrument, warn};

use crate::{
    error::{ConfigError, SuccessorError},
    features::FeatureSource,
    graph::{Adjacency, Edge},
    labeling::Labeling,
    partition::Partition,
};

use super::{SuccessorFunction, divergence::symmetric_kl, record_successors};

const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Selects how edge weights are turned into cut decisions.
///
/// # Examples
/// ```
/// use regioncut_core::CutPolicy;
///
/// assert_eq!(CutPolicy::default(), CutPolicy::Independent);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CutPolicy {
    /// Cut each edge on its own with probability `1 - w`.
    #[default]
    Independent,
    /// Draw one threshold `θ` per call and cut every edge with `w <= θ`.
    GlobalThreshold,
}

/// The outcome of the random cutting step.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeCut {
    kept: Adjacency,
    cut: Vec<Edge>,
    threshold: f64,
    skipped_terms: usize,
}

impl EdgeCut {
    /// Adjacency holding only the edges that survived.
    #[must_use]
    #[rustfmt::skip]
    pub fn kept(&self) -> &Adjacency { &self.kept }

    /// Edges that were cut, in ascending canonical order.
    #[must_use]
    #[rustfmt::skip]
    pub fn cut(&self) -> &[Edge] { &self.cut }

    /// The threshold drawn for this call.
    ///
    /// Only [`CutPolicy::GlobalThreshold`] consults it, but it is drawn under
    /// both policies so the random stream advances identically.
    #[must_use]
    #[rustfmt::skip]
    pub fn threshold(&self) -> f64 { self.threshold }

    /// Divergence terms skipped because the reference vector had no mass.
    #[must_use]
    #[rustfmt::skip]
    pub fn skipped_terms(&self) -> usize { self.skipped_terms }
}

/// Generates successors by cutting edges at random and relabeling the pieces.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use rand::rngs::mock::StepRng;
/// use regioncut_core::{
///     Adjacency, DenseFeatures, Label, Labeling, StochasticSuccessor, SuccessorFunction,
/// };
///
/// let adjacency = Arc::new(Adjacency::new(3, [(0, 1), (1, 2)])?);
/// let labeling = Labeling::new(
///     adjacency,
///     vec![Label::new(1), Label::new(1), Label::new(2)],
/// )?;
/// let features = DenseFeatures::new("hist", 2, vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.5])?;
/// let generator = StochasticSuccessor::builder().build()?;
///
/// // Identical features never cut, so the single component borders nothing.
/// let mut rng = StepRng::new(u64::MAX / 2, 0);
/// let successors = generator.generate_successors(&features, &labeling, &mut rng)?;
/// assert!(successors.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StochasticSuccessor {
    temperature: f64,
    policy: CutPolicy,
}

impl StochasticSuccessor {
    /// Starts a builder with temperature `0.5` and [`CutPolicy::Independent`].
    #[must_use]
    pub fn builder() -> StochasticSuccessorBuilder {
        StochasticSuccessorBuilder::default()
    }

    /// Returns the configured temperature.
    #[must_use]
    #[rustfmt::skip]
    pub fn temperature(&self) -> f64 { self.temperature }

    /// Returns the configured cut policy.
    #[must_use]
    #[rustfmt::skip]
    pub fn cut_policy(&self) -> CutPolicy { self.policy }

    /// Weight of the edge between two feature vectors at this temperature.
    fn edge_weight(&self, divergence: f64) -> f64 {
        (-divergence * self.temperature / 2.0).exp()
    }

    /// Weights every edge of `labeling` and decides which to cut.
    ///
    /// One threshold is drawn first; under [`CutPolicy::Independent`] one
    /// further uniform value is drawn per edge, in ascending edge order.
    ///
    /// # Errors
    /// Returns [`SuccessorError::InsufficientFeatures`] when `features`
    /// covers fewer regions than `labeling`, and [`SuccessorError::Features`]
    /// when a lookup fails or endpoint vectors are empty or differ in
    /// dimension.
    #[instrument(
        name = "successor.stochastic.cut",
        level = "trace",
        skip(self, features, labeling, rng),
        fields(edges = labeling.adjacency().edge_count(), policy = ?self.policy),
    )]
    pub fn cut_edges(
        &self,
        features: &dyn FeatureSource,
        labeling: &Labeling,
        rng: &mut dyn RngCore,
    ) -> Result<EdgeCut, SuccessorError> {
        if features.region_count() < labeling.region_count() {
            return Err(SuccessorError::InsufficientFeatures {
                source_name: Arc::from(features.name()),
                available: features.region_count(),
                regions: labeling.region_count(),
            });
        }

        let threshold: f64 = rng.gen_range(0.0..1.0);
        let mut kept = Vec::new();
        let mut cut = Vec::new();
        let mut skipped_terms = 0;
        for edge in labeling.adjacency().edges() {
            let divergence = symmetric_kl(
                features.features(edge.source())?,
                features.features(edge.target())?,
            )?;
            skipped_terms += divergence.skipped;
            let weight = self.edge_weight(divergence.value);
            let severed = match self.policy {
                CutPolicy::Independent => rng.gen_range(0.0..1.0) < 1.0 - weight,
                CutPolicy::GlobalThreshold => weight <= threshold,
            };
            if severed {
                cut.push(edge);
            } else {
                kept.push(edge);
            }
        }

        if skipped_terms > 0 {
            warn!(
                skipped_terms,
                source = features.name(),
                "KL divergence skipped terms with zero reference mass"
            );
        }
        record_cut_edges(cut.len());

        Ok(EdgeCut {
            kept: Adjacency::from_edges(labeling.region_count(), kept),
            cut,
            threshold,
            skipped_terms,
        })
    }
}

impl SuccessorFunction for StochasticSuccessor {
    #[instrument(
        name = "successor.stochastic",
        level = "debug",
        skip(self, features, labeling, rng),
        fields(regions = labeling.region_count()),
    )]
    fn generate_successors(
        &self,
        features: &dyn FeatureSource,
        labeling: &Labeling,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Labeling>, SuccessorError> {
        let edge_cut = self.cut_edges(features, labeling, rng)?;
        let partition = Partition::compute(labeling, edge_cut.kept())?;
        let cuts: Arc<[Edge]> = Arc::from(edge_cut.cut);

        let mut successors = Vec::new();
        for component in partition.components() {
            for &label in component.neighbour_labels() {
                let successor = labeling
                    .relabeled(component.regions().iter().copied(), label)
                    .with_stochastic_cuts(Some(Arc::clone(&cuts)));
                successors.push(successor);
            }
        }

        debug!(
            components = partition.len(),
            cut_edges = cuts.len(),
            successors = successors.len(),
            "generated stochastic successors"
        );
        record_successors(successors.len());
        Ok(successors)
    }
}

/// Configures and validates a [`StochasticSuccessor`].
///
/// # Examples
/// ```
/// use regioncut_core::{CutPolicy, StochasticSuccessor};
///
/// let generator = StochasticSuccessor::builder()
///     .with_temperature(2.0)
///     .with_cut_policy(CutPolicy::GlobalThreshold)
///     .build()?;
/// assert_eq!(generator.temperature(), 2.0);
/// assert_eq!(generator.cut_policy(), CutPolicy::GlobalThreshold);
///
/// assert!(StochasticSuccessor::builder().with_temperature(0.0).build().is_err());
/// # Ok::<(), regioncut_core::ConfigError>(())
/// ```
#[derive(Clone, Debug)]
pub struct StochasticSuccessorBuilder {
    temperature: f64,
    policy: CutPolicy,
}

impl Default for StochasticSuccessorBuilder {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            policy: CutPolicy::default(),
        }
    }
}

impl StochasticSuccessorBuilder {
    /// Overrides the temperature scaling the divergence.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Selects the cut policy.
    #[must_use]
    pub fn with_cut_policy(mut self, policy: CutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTemperature`] unless the temperature is
    /// finite and strictly positive.
    pub fn build(self) -> Result<StochasticSuccessor, ConfigError> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ConfigError::InvalidTemperature {
                got: self.temperature,
            });
        }
        Ok(StochasticSuccessor {
            temperature: self.temperature,
            policy: self.policy,
        })
    }
}

#[cfg(feature = "metrics")]
fn record_cut_edges(count: usize) {
    metrics::counter!("stochastic_edges_cut").increment(count as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_cut_edges(_count: usize) {}
