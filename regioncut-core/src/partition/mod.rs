//! Connected components of a labeling under a set of kept edges.
//!
//! Removing edges from a labeling's adjacency splits its regions into
//! connected components. Each component also records the labels found just
//! outside it in the uncut adjacency; these are the candidate labels the
//! stochastic successor offers when relabeling the component.

use std::collections::{BTreeSet, VecDeque};

use tracing::{instrument, trace};

use crate::{
    error::PartitionError,
    graph::Adjacency,
    labeling::{Label, Labeling},
};

/// One connected component of a [`Partition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectedComponent {
    regions: Vec<usize>,
    neighbour_labels: BTreeSet<Label>,
}

impl ConnectedComponent {
    /// Member regions in ascending order.
    #[must_use]
    #[rustfmt::skip]
    pub fn regions(&self) -> &[usize] { &self.regions }

    /// Distinct labels of regions adjacent to, but outside, the component in
    /// the uncut adjacency.
    #[must_use]
    #[rustfmt::skip]
    pub fn neighbour_labels(&self) -> &BTreeSet<Label> { &self.neighbour_labels }

    /// Number of member regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Components always hold at least one region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A partition of every region into connected components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    components: Vec<ConnectedComponent>,
    membership: Vec<usize>,
}

impl Partition {
    /// Computes the components of `labeling` when only `kept` edges remain.
    ///
    /// Components are ordered by their smallest region.
    ///
    /// # Errors
    /// Returns [`PartitionError::RegionCountMismatch`] when `kept` covers a
    /// different number of regions, and [`PartitionError::UnknownEdge`] when
    /// a kept edge is not part of the labeling's adjacency.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use regioncut_core::{Adjacency, Label, Labeling, Partition};
    ///
    /// let full = Arc::new(Adjacency::new(3, [(0, 1), (1, 2)])?);
    /// let labeling = Labeling::new(full, vec![Label::new(1), Label::new(1), Label::new(2)])?;
    /// let kept = Adjacency::new(3, [(0, 1)])?;
    ///
    /// let partition = Partition::compute(&labeling, &kept)?;
    /// assert_eq!(partition.len(), 2);
    /// assert_eq!(partition.components()[0].regions(), &[0, 1]);
    /// assert!(partition.components()[0].neighbour_labels().contains(&Label::new(2)));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "partition.compute",
        level = "trace",
        skip(labeling, kept),
        fields(regions = labeling.region_count(), kept_edges = kept.edge_count()),
    )]
    pub fn compute(labeling: &Labeling, kept: &Adjacency) -> Result<Self, PartitionError> {
        let full = labeling.adjacency();
        if kept.region_count() != full.region_count() {
            return Err(PartitionError::RegionCountMismatch {
                kept: kept.region_count(),
                regions: full.region_count(),
            });
        }
        if let Some(edge) = kept
            .edges()
            .find(|edge| !full.contains_edge(edge.source(), edge.target()))
        {
            return Err(PartitionError::UnknownEdge {
                left: edge.source(),
                right: edge.target(),
            });
        }

        let region_count = full.region_count();
        let mut membership = vec![usize::MAX; region_count];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();

        for seed in 0..region_count {
            if membership[seed] != usize::MAX {
                continue;
            }
            let component_id = components.len();
            let mut regions = Vec::new();
            membership[seed] = component_id;
            queue.push_back(seed);
            while let Some(region) = queue.pop_front() {
                regions.push(region);
                for neighbour in kept.neighbours(region) {
                    if membership[neighbour] == usize::MAX {
                        membership[neighbour] = component_id;
                        queue.push_back(neighbour);
                    }
                }
            }
            regions.sort_unstable();
            components.push(ConnectedComponent {
                regions,
                neighbour_labels: BTreeSet::new(),
            });
        }

        for component in &mut components {
            component.neighbour_labels =
                bordering_labels(labeling, &membership, &component.regions);
        }

        trace!(components = components.len(), "partitioned labeling");
        Ok(Self {
            components,
            membership,
        })
    }

    /// Components ordered by their smallest region.
    #[must_use]
    #[rustfmt::skip]
    pub fn components(&self) -> &[ConnectedComponent] { &self.components }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the partition has no components (only for zero regions).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The component containing `region`.
    #[must_use]
    pub fn component_of(&self, region: usize) -> Option<&ConnectedComponent> {
        self.membership
            .get(region)
            .and_then(|&component| self.components.get(component))
    }
}

fn bordering_labels(
    labeling: &Labeling,
    membership: &[usize],
    regions: &[usize],
) -> BTreeSet<Label> {
    let Some(&first) = regions.first() else {
        return BTreeSet::new();
    };
    let own = membership[first];
    let labels = labeling.labels();
    regions
        .iter()
        .flat_map(|&region| labeling.adjacency().neighbours(region))
        .filter(|&neighbour| membership[neighbour] != own)
        .map(|neighbour| labels[neighbour])
        .collect()
}
