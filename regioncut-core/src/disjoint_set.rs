//! Union-find (disjoint set union) over dense region identifiers.
//!
//! The merge tree consumes edges in non-decreasing weight order and merges
//! the components of their endpoints. This module tracks component
//! membership for that sweep, along with the tree node currently standing
//! for each component.

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
    /// Payload slot per representative; callers keep it current after a
    /// union by writing to the returned representative.
    pub(crate) component_node: Vec<usize>,
}

impl DisjointSet {
    /// Creates `n` singleton sets, `{0}, {1}, .., {n - 1}`.
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
            component_node: (0..n).collect(),
        }
    }

    /// Returns the canonical representative of `node`'s set.
    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Merges the sets containing `left` and `right` and returns the
    /// surviving representative.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        self.sets -= 1;
        left
    }

    /// Number of disjoint sets remaining.
    pub(crate) fn set_count(&self) -> usize {
        self.sets
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::DisjointSet;

    fn naive_components(n: usize, unions: &[(usize, usize)]) -> Vec<usize> {
        let mut label: Vec<usize> = (0..n).collect();
        for &(a, b) in unions {
            let (from, to) = (label[b], label[a]);
            for entry in &mut label {
                if *entry == from {
                    *entry = to;
                }
            }
        }
        label
    }

    #[test]
    fn starts_with_singletons() {
        let mut dsu = DisjointSet::new(4);
        assert_eq!(dsu.set_count(), 4);
        for node in 0..4 {
            assert_eq!(dsu.find(node), node);
        }
    }

    #[rstest]
    #[case(&[(0, 1), (2, 3)], 3)]
    #[case(&[(0, 1), (1, 2), (2, 3), (3, 4)], 1)]
    #[case(&[(0, 1), (1, 0), (0, 1)], 4)]
    fn counts_sets_after_unions(#[case] unions: &[(usize, usize)], #[case] expected: usize) {
        let mut dsu = DisjointSet::new(5);
        for &(a, b) in unions {
            dsu.union(a, b);
        }
        assert_eq!(dsu.set_count(), expected);
    }

    #[test]
    fn union_returns_current_representative() {
        let mut dsu = DisjointSet::new(3);
        let root = dsu.union(0, 1);
        assert_eq!(dsu.find(0), root);
        assert_eq!(dsu.find(1), root);
        assert_eq!(dsu.union(1, 0), root);
    }

    proptest! {
        #[test]
        fn find_agrees_with_transitive_closure(
            n in 1_usize..24,
            raw in prop::collection::vec((0_usize..24, 0_usize..24), 0..40),
        ) {
            let unions: Vec<(usize, usize)> =
                raw.into_iter().map(|(a, b)| (a % n, b % n)).collect();
            let mut dsu = DisjointSet::new(n);
            for &(a, b) in &unions {
                dsu.union(a, b);
            }
            let expected = naive_components(n, &unions);
            for a in 0..n {
                for b in 0..n {
                    prop_assert_eq!(dsu.find(a) == dsu.find(b), expected[a] == expected[b]);
                }
            }
        }
    }
}
