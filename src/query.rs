use std::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::distance_metric::DistanceMetric;
use crate::heap::BoundedPriorityQueue;
use crate::kdtree::KdTree;
use crate::nearest_neighbour::NearestNeighbour;
use crate::types::{Axis, NodeId};

/// A node admitted to the best-so-far collector during a query. `node` is `None`
/// for the sentinels that stand in for a distance cutoff.
#[derive(Debug, Clone, Copy)]
struct Candidate<A> {
    node: Option<NodeId>,
    distance: A,
}

impl<A> PartialEq for Candidate<A> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<P, A, M> KdTree<P, A, M>
where
    A: Axis,
    M: DistanceMetric<P, A>,
{
    /// Finds the nearest `qty` payloads to `query`, using the tree's distance metric,
    /// sorted by ascending distance.
    ///
    /// With `max_distance`, only payloads strictly closer than it are returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let points = vec![[2.0, 3.0], [5.0, 4.0], [9.0, 6.0], [4.0, 7.0], [8.0, 1.0], [7.0, 2.0]];
    /// let tree = KdTree::build(points, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    ///
    /// let nearest = tree.nearest_n(&[9.0, 2.0], 2, None);
    ///
    /// assert_eq!(nearest.len(), 2);
    /// assert_eq!(nearest[0].payload, &[8.0, 1.0]);
    /// assert_eq!(nearest[0].distance, 2.0);
    /// assert_eq!(nearest[1].payload, &[7.0, 2.0]);
    ///
    /// let within = tree.nearest_n(&[9.0, 2.0], 2, Some(3.0));
    /// assert_eq!(within.len(), 1);
    /// ```
    pub fn nearest_n(
        &self,
        query: &P,
        qty: usize,
        max_distance: Option<A>,
    ) -> Vec<NearestNeighbour<'_, A, P>> {
        let mut result = self.nearest_n_unsorted(query, qty, max_distance);
        result.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        result
    }

    /// As [`nearest_n`](KdTree::nearest_n), but returns the results in the order the
    /// collector holds them internally: the furthest result first, the rest in no
    /// particular order.
    pub fn nearest_n_unsorted(
        &self,
        query: &P,
        qty: usize,
        max_distance: Option<A>,
    ) -> Vec<NearestNeighbour<'_, A, P>> {
        // never more results than stored payloads
        let qty = qty.min(self.size);
        if qty == 0 {
            return Vec::new();
        }

        let mut best =
            BoundedPriorityQueue::with_capacity(qty + 1, |c: &Candidate<A>| -c.distance);

        if let Some(cutoff) = max_distance {
            for _ in 0..qty {
                best.push(Candidate {
                    node: None,
                    distance: cutoff,
                });
            }
        }

        if let Some(root) = self.root {
            self.nearest_n_recurse(query, qty, root, &mut best);
        }

        best.into_vec()
            .into_iter()
            .filter_map(|candidate| {
                let node = self.node(candidate.node?);
                Some(NearestNeighbour {
                    distance: candidate.distance,
                    item: node.item(),
                    payload: node.payload(),
                })
            })
            .collect()
    }

    /// Finds the payload nearest to `query`, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let mut tree = KdTree::new(array_axes::<f64, 3>(), SquaredEuclidean).unwrap();
    /// tree.insert([1.0, 2.0, 5.0]).unwrap();
    /// let item = tree.insert([2.0, 3.0, 6.0]).unwrap();
    ///
    /// let nearest = tree.nearest_one(&[2.1, 3.0, 6.0]).unwrap();
    ///
    /// assert_eq!(nearest.item, item);
    /// assert!((nearest.distance - 0.01f64).abs() < 1e-9);
    /// ```
    pub fn nearest_one(&self, query: &P) -> Option<NearestNeighbour<'_, A, P>> {
        self.nearest_n_unsorted(query, 1, None).into_iter().next()
    }

    fn nearest_n_recurse<F>(
        &self,
        query: &P,
        qty: usize,
        curr: NodeId,
        best: &mut BoundedPriorityQueue<Candidate<A>, A, F>,
    ) where
        F: Fn(&Candidate<A>) -> A,
    {
        let node = self.node(curr);
        let dim = node.dimension;
        let own_distance = self.metric.dist(query, node.payload());

        if node.is_leaf() {
            if Self::dist_belongs_in_heap(own_distance, qty, best) {
                let candidate = Candidate {
                    node: Some(curr),
                    distance: own_distance,
                };
                best.push_capped(candidate, qty);
            }
            return;
        }

        let query_coord = self.coord(query, dim);
        let node_coord = self.coord(node.payload(), dim);
        // lower bound on the distance to anything across this node's splitting plane
        let plane_distance = self.metric.dist1(query_coord, node_coord).abs();

        let go_left = match (node.left, node.right) {
            (_, None) => true,
            (None, _) => false,
            _ => query_coord < node_coord,
        };
        let (closer, further) = if go_left {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(closer) = closer {
            self.nearest_n_recurse(query, qty, closer, best);
        }

        if Self::dist_belongs_in_heap(own_distance, qty, best) {
            let candidate = Candidate {
                node: Some(curr),
                distance: own_distance,
            };
            best.push_capped(candidate, qty);
        }

        if let Some(further) = further {
            if Self::dist_belongs_in_heap(plane_distance, qty, best) {
                self.nearest_n_recurse(query, qty, further, best);
            } else {
                #[cfg(feature = "tracing")]
                event!(Level::TRACE, pruned = further.idx(), "skipped subtree beyond split");
            }
        }
    }

    fn dist_belongs_in_heap<F>(
        dist: A,
        qty: usize,
        best: &BoundedPriorityQueue<Candidate<A>, A, F>,
    ) -> bool
    where
        F: Fn(&Candidate<A>) -> A,
    {
        best.size() < qty || best.peek().is_some_and(|worst| dist < worst.distance)
    }
}
