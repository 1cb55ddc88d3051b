//! Region adjacency graphs.
//!
//! [`Adjacency`] is the unweighted neighbour structure a labeling is defined
//! over. [`RegionGraph`] pairs it with one non-negative dissimilarity weight
//! per edge, which drives merge-tree construction and thresholded cuts.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use crate::error::GraphError;

/// An undirected edge in canonical form (`source < target`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    /// Canonicalises `(a, b)` into `(min, max)`.
    ///
    /// # Examples
    /// ```
    /// use regioncut_core::Edge;
    ///
    /// let edge = Edge::new(4, 1);
    /// assert_eq!((edge.source(), edge.target()), (1, 4));
    /// ```
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            source: a.min(b),
            target: a.max(b),
        }
    }

    /// Returns the smaller endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the larger endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }
}

/// Symmetric neighbour sets over `0..region_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    neighbours: Vec<BTreeSet<usize>>,
    edge_count: usize,
}

impl Adjacency {
    /// Builds an adjacency from undirected region pairs.
    ///
    /// Repeated pairs collapse into a single edge.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidRegion`] for ids outside
    /// `0..region_count` and [`GraphError::SelfLoop`] for `(r, r)` pairs.
    ///
    /// # Examples
    /// ```
    /// use regioncut_core::Adjacency;
    ///
    /// let adjacency = Adjacency::new(3, [(0, 1), (2, 1), (1, 0)])?;
    /// assert_eq!(adjacency.edge_count(), 2);
    /// assert!(adjacency.contains_edge(1, 2));
    /// # Ok::<(), regioncut_core::GraphError>(())
    /// ```
    pub fn new<I>(region_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut adjacency = Self::empty(region_count);
        for (a, b) in edges {
            let edge = validate_pair(region_count, a, b)?;
            adjacency.insert(edge);
        }
        Ok(adjacency)
    }

    /// Returns an adjacency over `region_count` regions with no edges.
    #[must_use]
    pub fn empty(region_count: usize) -> Self {
        Self {
            neighbours: vec![BTreeSet::new(); region_count],
            edge_count: 0,
        }
    }

    pub(crate) fn from_edges<I>(region_count: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut adjacency = Self::empty(region_count);
        for edge in edges {
            adjacency.insert(edge);
        }
        adjacency
    }

    fn insert(&mut self, edge: Edge) -> bool {
        let inserted = self.neighbours[edge.source].insert(edge.target);
        if inserted {
            self.neighbours[edge.target].insert(edge.source);
            self.edge_count += 1;
        }
        inserted
    }

    /// Number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Number of undirected edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edge_count }

    /// Neighbours of `region` in ascending order. Unknown regions have none.
    pub fn neighbours(&self, region: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbours
            .get(region)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Number of neighbours of `region`.
    #[must_use]
    pub fn degree(&self, region: usize) -> usize {
        self.neighbours.get(region).map_or(0, BTreeSet::len)
    }

    /// Returns whether `a` and `b` are adjacent.
    #[must_use]
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.neighbours
            .get(a)
            .is_some_and(|set| set.contains(&b))
    }

    /// Every edge exactly once, in ascending canonical order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.neighbours
            .iter()
            .enumerate()
            .flat_map(|(source, set)| {
                set.range(source + 1..)
                    .map(move |&target| Edge { source, target })
            })
    }
}

/// A region adjacency graph with a dissimilarity weight on every edge.
///
/// # Examples
/// ```
/// use regioncut_core::RegionGraph;
///
/// let graph = RegionGraph::from_edge_weights(3, [(0, 1, 0.4), (1, 2, 0.1)])?;
/// assert_eq!(graph.all_distinct_weights(), vec![0.1, 0.4]);
/// assert_eq!(graph.thresholded(0.2).edge_count(), 1);
/// # Ok::<(), regioncut_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RegionGraph {
    adjacency: Adjacency,
    weights: BTreeMap<Edge, f64>,
    // Sorted by (weight, source, target).
    weighted: Vec<(Edge, f64)>,
}

impl RegionGraph {
    /// Builds a graph from an edge→weight map.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyGraph`] when `region_count == 0`,
    /// [`GraphError::InvalidRegion`] or [`GraphError::SelfLoop`] for bad
    /// endpoints, [`GraphError::DuplicateEdge`] when an unordered pair
    /// repeats, and [`GraphError::InvalidWeight`] for negative or non-finite
    /// weights.
    pub fn from_edge_weights<I>(region_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        if region_count == 0 {
            return Err(GraphError::EmptyGraph);
        }

        let mut adjacency = Adjacency::empty(region_count);
        let mut weights = BTreeMap::new();
        for (a, b, weight) in edges {
            let edge = validate_pair(region_count, a, b)?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    left: edge.source,
                    right: edge.target,
                    weight,
                });
            }
            if !adjacency.insert(edge) {
                return Err(GraphError::DuplicateEdge {
                    left: edge.source,
                    right: edge.target,
                });
            }
            // Folds -0.0 into 0.0 so equal weights group together.
            weights.insert(edge, weight + 0.0);
        }
        let mut weighted: Vec<(Edge, f64)> =
            weights.iter().map(|(edge, weight)| (*edge, *weight)).collect();
        weighted.sort_by(|left, right| compare_weighted(*left, *right));

        Ok(Self {
            adjacency,
            weights,
            weighted,
        })
    }

    /// The unweighted neighbour structure.
    #[must_use]
    #[rustfmt::skip]
    pub fn adjacency(&self) -> &Adjacency { &self.adjacency }

    /// Number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.adjacency.region_count()
    }

    /// Weight of the edge between `a` and `b`, if present.
    #[must_use]
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        self.weights.get(&Edge::new(a, b)).copied()
    }

    /// Edges with their weights, sorted by `(weight, source, target)`.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges_ascending(&self) -> &[(Edge, f64)] { &self.weighted }

    /// Every distinct weight present, ascending and deduplicated.
    #[must_use]
    pub fn all_distinct_weights(&self) -> Vec<f64> {
        let mut weights: Vec<f64> = self.weighted.iter().map(|(_, weight)| *weight).collect();
        weights.dedup();
        weights
    }

    /// Returns an adjacency over the same regions that keeps only the edges
    /// whose weight is strictly greater than `value`.
    #[must_use]
    pub fn thresholded(&self, value: f64) -> Adjacency {
        let start = self.weighted.partition_point(|(_, weight)| *weight <= value);
        Adjacency::from_edges(
            self.region_count(),
            self.weighted.iter().skip(start).map(|(edge, _)| *edge),
        )
    }
}

fn validate_pair(region_count: usize, a: usize, b: usize) -> Result<Edge, GraphError> {
    for region in [a, b] {
        if region >= region_count {
            return Err(GraphError::InvalidRegion {
                region,
                region_count,
            });
        }
    }
    if a == b {
        return Err(GraphError::SelfLoop { region: a });
    }
    Ok(Edge::new(a, b))
}

fn compare_weighted(left: (Edge, f64), right: (Edge, f64)) -> Ordering {
    left.1.total_cmp(&right.1).then_with(|| left.0.cmp(&right.0))
}

#[cfg(test)]
mod tests;
