use ordered_float::OrderedFloat;

#[cfg(feature = "tracing")]
use tracing::{event, span, Level};

use crate::axes::{checked_coords, AxisAccessor};
use crate::distance_metric::DistanceMetric;
use crate::error::{KdError, Result};
use crate::kdtree::KdTree;
use crate::node::{Entry, TreeNode};
use crate::types::{Axis, ItemId, NodeId};

impl<P, A, M> KdTree<P, A, M>
where
    A: Axis,
    M: DistanceMetric<P, A>,
{
    /// Builds a balanced tree from `points`.
    ///
    /// At each level the points are sorted on that level's axis and the median
    /// becomes the node, with the points before it going left and those after it
    /// going right. Points are given [`ItemId`]s `0..n` in input order.
    ///
    /// Fails with [`KdError::Configuration`](crate::KdError::Configuration) if the
    /// axes are invalid or any point has a NaN coordinate.
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
    /// assert_eq!(tree.size(), 6);
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn build(points: Vec<P>, axes: Vec<AxisAccessor<P, A>>, metric: M) -> Result<Self> {
        let mut tree = Self::new(axes, metric)?;

        #[cfg(feature = "tracing")]
        let span = span!(Level::DEBUG, "build", points = points.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        for point in &points {
            checked_coords(&tree.axes, point)?;
        }

        let entries: Vec<Entry<P>> = points
            .into_iter()
            .enumerate()
            .map(|(idx, payload)| Entry {
                item: ItemId(idx as u64),
                payload,
            })
            .collect();

        tree.size = entries.len();
        tree.next_item = ItemId(entries.len() as u64);
        tree.nodes.reserve(entries.len());
        tree.root = tree.build_recurse(entries, 0, None);

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, size = tree.size, height = tree.height(), "built tree");

        Ok(tree)
    }

    fn build_recurse(
        &mut self,
        mut entries: Vec<Entry<P>>,
        depth: usize,
        parent: Option<NodeId>,
    ) -> Option<NodeId> {
        let dim = depth % self.axes.len();

        if entries.len() <= 1 {
            let entry = entries.pop()?;
            return Some(self.alloc(TreeNode::new(entry, dim, parent)));
        }

        let axis = &self.axes[dim];
        entries.sort_by_key(|entry| OrderedFloat(axis.coord(&entry.payload)));

        // anything left of the node must be strictly less on this axis
        let mut median = entries.len() / 2;
        let split = axis.coord(&entries[median].payload);
        while median > 0 && axis.coord(&entries[median - 1].payload) == split {
            median -= 1;
        }

        let right = entries.split_off(median + 1);
        let entry = entries.pop()?;
        let left = entries;

        let id = self.alloc(TreeNode::new(entry, dim, parent));
        let left = self.build_recurse(left, depth + 1, Some(id));
        let right = self.build_recurse(right, depth + 1, Some(id));

        let node = self.node_mut(id);
        node.left = left;
        node.right = right;

        Some(id)
    }

    /// Adds `payload` as a new leaf and returns the identity it was given.
    ///
    /// The tree is descended from the root, going left where the payload is
    /// strictly less than the node on the node's axis and right otherwise. No
    /// rebalancing takes place.
    ///
    /// Fails with [`KdError::Configuration`] if the payload has a NaN coordinate or
    /// the tree has handed out every identity up to `u64::MAX`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let mut tree = KdTree::new(array_axes::<f64, 3>(), SquaredEuclidean).unwrap();
    ///
    /// tree.insert([1.0, 2.0, 5.0]).unwrap();
    /// tree.insert([1.1, 2.1, 5.1]).unwrap();
    ///
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn insert(&mut self, payload: P) -> Result<ItemId> {
        checked_coords(&self.axes, &payload)?;
        let item = self.next_item;
        let next_item = item.next().ok_or_else(|| {
            KdError::Configuration(format!("no identities left after {:?}", item))
        })?;

        let mut curr = self.root;
        let mut parent = None;
        let mut is_left_child = false;

        while let Some(id) = curr {
            let node = self.node(id);
            let dim = node.dimension;
            is_left_child = self.coord(&payload, dim) < self.coord(node.payload(), dim);
            parent = Some(id);
            curr = if is_left_child { node.left } else { node.right };
        }

        self.next_item = next_item;
        let entry = Entry { item, payload };

        match parent {
            None => {
                let id = self.alloc(TreeNode::new(entry, 0, None));
                self.root = Some(id);
            }
            Some(parent_id) => {
                let dim = (self.node(parent_id).dimension + 1) % self.axes.len();
                let id = self.alloc(TreeNode::new(entry, dim, Some(parent_id)));
                let parent_node = self.node_mut(parent_id);
                if is_left_child {
                    parent_node.left = Some(id);
                } else {
                    parent_node.right = Some(id);
                }
            }
        }

        self.size += 1;

        #[cfg(feature = "tracing")]
        event!(Level::TRACE, item = item.0, size = self.size, "inserted");

        Ok(item)
    }

    /// Removes the payload stored as `item`, returning whether it was found.
    ///
    /// `payload` supplies the coordinates used to descend the tree; the node is
    /// matched on `item` alone, so an equal payload stored under another identity
    /// is left in place. Removing something that isn't there does nothing.
    ///
    /// A removed inner node keeps its place in the tree and takes over the payload
    /// with the smallest coordinate on its axis from its right subtree (or from its
    /// left subtree, which then becomes the right one).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let mut tree = KdTree::new(array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    /// let a = tree.insert([1.0, 2.0]).unwrap();
    /// let b = tree.insert([1.0, 2.0]).unwrap();
    ///
    /// assert!(tree.remove(&[1.0, 2.0], a));
    /// assert!(!tree.remove(&[1.0, 2.0], a));
    /// assert!(tree.contains(&[1.0, 2.0], b));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn remove(&mut self, payload: &P, item: ItemId) -> bool {
        let Some(id) = self.find_entry(payload, item) else {
            #[cfg(feature = "tracing")]
            event!(Level::TRACE, item = item.0, "nothing to remove");
            return false;
        };

        self.remove_node(id);
        self.size -= 1;

        #[cfg(feature = "tracing")]
        event!(Level::TRACE, item = item.0, size = self.size, "removed");

        true
    }

    pub(crate) fn find_entry(&self, payload: &P, item: ItemId) -> Option<NodeId> {
        let mut curr = self.root;

        while let Some(id) = curr {
            let node = self.node(id);
            if node.item() == item {
                return Some(id);
            }
            let dim = node.dimension;
            curr = if self.coord(payload, dim) < self.coord(node.payload(), dim) {
                node.left
            } else {
                node.right
            };
        }

        None
    }

    /// Takes the entry held by `id` out of the tree, returning it. Leaves are
    /// unlinked; inner nodes stay and receive a replacement entry from below.
    fn remove_node(&mut self, id: NodeId) -> Entry<P> {
        let node = self.node(id);
        let dim = node.dimension;

        match (node.left, node.right) {
            (None, None) => self.detach_leaf(id),
            (_, Some(right)) => {
                let next = self.find_min(right, dim);
                let replacement = self.remove_node(next);
                std::mem::replace(&mut self.node_mut(id).entry, replacement)
            }
            (Some(left), None) => {
                let next = self.find_min(left, dim);
                let replacement = self.remove_node(next);
                let node = self.node_mut(id);
                node.right = node.left.take();
                std::mem::replace(&mut node.entry, replacement)
            }
        }
    }

    fn detach_leaf(&mut self, id: NodeId) -> Entry<P> {
        match self.node(id).parent {
            None => self.root = None,
            Some(parent_id) => {
                let parent = self.node_mut(parent_id);
                if parent.left == Some(id) {
                    parent.left = None;
                } else {
                    parent.right = None;
                }
            }
        }

        self.release(id).entry
    }

    /// Finds the node with the smallest coordinate on axis `dim` in the subtree
    /// rooted at `id`. Ties go to the subtree root, then the left side.
    pub(crate) fn find_min(&self, id: NodeId, dim: usize) -> NodeId {
        let node = self.node(id);

        if node.dimension == dim {
            return match node.left {
                Some(left) => self.find_min(left, dim),
                None => id,
            };
        }

        let mut min = id;
        let mut min_coord = self.coord(node.payload(), dim);

        for child in [node.left, node.right].into_iter().flatten() {
            let candidate = self.find_min(child, dim);
            let candidate_coord = self.coord(self.node(candidate).payload(), dim);
            if candidate_coord < min_coord {
                min = candidate;
                min_coord = candidate_coord;
            }
        }

        min
    }
}
