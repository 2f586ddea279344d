//! Arena-backed k-d tree over arbitrary payloads, whose coordinates are read through
//! an ordered list of [`AxisAccessor`]s and compared with a [`DistanceMetric`].

use az::Az;
use std::fmt;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::axes::{validate_axes, AxisAccessor};
use crate::distance_metric::DistanceMetric;
use crate::error::Result;
use crate::node::TreeNode;
use crate::types::{Axis, ItemId, NodeId};

/// k-d tree
///
/// Each node holds one payload and splits its subtree on one axis: at build time
/// everything under the left child is strictly less than the node on that axis,
/// everything under the right child greater or equal. The split axis cycles with
/// depth. Nodes live in a flat arena and refer to each other by [`NodeId`].
///
/// The tree never rebalances. Insertions in sorted order degrade it towards a
/// list, and since deletion and search recurse once per level, very deep trees
/// can exhaust the call stack; rebuild with [`KdTree::build`] when
/// [`balance_factor`](KdTree::balance_factor) grows.
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
///
/// assert_eq!(tree.size(), 1);
/// ```
pub struct KdTree<P, A, M> {
    pub(crate) nodes: Vec<Option<TreeNode<P>>>,
    pub(crate) vacant: Vec<NodeId>,
    pub(crate) root: Option<NodeId>,
    pub(crate) axes: Vec<AxisAccessor<P, A>>,
    pub(crate) metric: M,
    pub(crate) size: usize,
    pub(crate) next_item: ItemId,
}

impl<P, A, M> KdTree<P, A, M>
where
    A: Axis,
    M: DistanceMetric<P, A>,
{
    /// Creates an empty tree over `axes`, measuring distances with `metric`.
    ///
    /// Fails with [`KdError::Configuration`](crate::KdError::Configuration) if
    /// `axes` is empty or two axes share a name.
    pub fn new(axes: Vec<AxisAccessor<P, A>>, metric: M) -> Result<Self> {
        validate_axes(&axes)?;

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, dimensions = axes.len(), "created empty tree");

        Ok(Self {
            nodes: Vec::new(),
            vacant: Vec::new(),
            root: None,
            axes,
            metric,
            size: 0,
            next_item: ItemId::default(),
        })
    }

    /// Returns the current number of payloads stored in the tree
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no payloads.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of axes, `k`.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.axes.len()
    }

    /// The ordered axis accessors this tree was configured with.
    pub fn axes(&self) -> &[AxisAccessor<P, A>] {
        &self.axes
    }

    /// The distance metric this tree was configured with.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Handle of the root node, if the tree is not empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Looks up a node by handle. Returns `None` for vacated slots.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<P>> {
        self.nodes.get(id.idx()).and_then(Option::as_ref)
    }

    /// Iterate over all `(item, payload)` tuples in depth-first order.
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::{ItemId, KdTree};
    ///
    /// let point = [1.0f64, 2.0f64, 3.0f64];
    /// let tree = KdTree::build(vec![point], array_axes::<f64, 3>(), SquaredEuclidean).unwrap();
    ///
    /// let mut pairs: Vec<_> = tree.iter().collect();
    /// assert_eq!(pairs.pop(), Some((ItemId(0), &point)));
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &P)> + '_ {
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let node = self.node(id);
            stack.extend(node.right);
            stack.extend(node.left);
            Some((node.item(), node.payload()))
        })
    }

    /// Whether the payload stored as `item` can be reached by descending the tree
    /// with `payload`'s coordinates, i.e. whether [`remove`](KdTree::remove) would find it.
    pub fn contains(&self, payload: &P, item: ItemId) -> bool {
        self.find_entry(payload, item).is_some()
    }

    /// Number of nodes on the longest root-to-leaf path. Zero for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }

        height
    }

    /// `height / log2(size)`: 1.0 or a little over for a balanced tree, growing as
    /// the tree degenerates.
    ///
    /// Diagnostic only. A single-node tree gives `+inf` (since `log2(1) == 0`) and
    /// an empty tree `-0.0`, so callers must guard those cases.
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let points = vec![[2.0, 3.0], [5.0, 4.0], [9.0, 6.0], [4.0, 7.0], [8.0, 1.0], [7.0, 2.0]];
    /// let tree = KdTree::build(points, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    ///
    /// let balance = tree.balance_factor();
    /// assert!((1.0..=3.0).contains(&balance));
    /// ```
    pub fn balance_factor(&self) -> f64 {
        self.height().az::<f64>() / self.size.az::<f64>().log2()
    }

    #[inline]
    pub(crate) fn coord(&self, payload: &P, dim: usize) -> A {
        self.axes[dim].coord(payload)
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &TreeNode<P> {
        match &self.nodes[id.idx()] {
            Some(node) => node,
            None => unreachable!("node handle {:?} refers to a vacated slot", id),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode<P> {
        match &mut self.nodes[id.idx()] {
            Some(node) => node,
            None => unreachable!("node handle {:?} refers to a vacated slot", id),
        }
    }

    /// Places `node` in the arena, reusing a vacated slot when there is one.
    pub(crate) fn alloc(&mut self, node: TreeNode<P>) -> NodeId {
        match self.vacant.pop() {
            Some(id) => {
                self.nodes[id.idx()] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Vacates the slot of `id`, returning the node that was in it.
    pub(crate) fn release(&mut self, id: NodeId) -> TreeNode<P> {
        match self.nodes[id.idx()].take() {
            Some(node) => {
                self.vacant.push(id);
                node
            }
            None => unreachable!("node handle {:?} released twice", id),
        }
    }
}

impl<P: fmt::Debug, A, M> fmt::Debug for KdTree<P, A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("axes", &self.axes)
            .field("root", &self.root)
            .field("size", &self.size)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::axes::{array_axes, AxisAccessor};
    use crate::distance::SquaredEuclidean;
    use crate::error::KdError;
    use crate::kdtree::KdTree;
    use crate::types::ItemId;

    type AX = f64;

    #[test]
    fn it_can_be_constructed_with_new() {
        let tree = KdTree::new(array_axes::<AX, 4>(), SquaredEuclidean).unwrap();

        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.dimensions(), 4);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn it_cannot_be_constructed_without_axes() {
        let axes: Vec<AxisAccessor<[AX; 2], AX>> = vec![];
        let result = KdTree::new(axes, SquaredEuclidean);

        assert!(matches!(result, Err(KdError::Configuration(_))));
    }

    #[test]
    fn can_iterate() {
        let mut t = KdTree::new(array_axes::<AX, 3>(), SquaredEuclidean).unwrap();
        let points = [[1.0, 2.0, 3.0], [10.0, 2.0, 3.0], [1.0, 20.0, 3.0]];

        let expected: HashMap<_, _> = points
            .iter()
            .map(|p| (t.insert(*p).unwrap(), *p))
            .collect();

        let actual: HashMap<ItemId, [AX; 3]> = t.iter().map(|(item, p)| (item, *p)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn height_counts_nodes_on_the_longest_path() {
        let mut t = KdTree::new(array_axes::<AX, 1>(), SquaredEuclidean).unwrap();
        for x in 0..5 {
            t.insert([x as AX]).unwrap();
        }

        assert_eq!(t.height(), 5);
        assert_eq!(t.balance_factor(), 5.0 / 5f64.log2());
    }

    #[test]
    fn balance_factor_of_a_single_node_is_infinite() {
        let t = KdTree::build(vec![[1.0, 1.0]], array_axes::<AX, 2>(), SquaredEuclidean).unwrap();

        assert!(t.balance_factor().is_infinite());
    }

    #[test]
    fn vacated_slots_are_reused() {
        let mut t = KdTree::new(array_axes::<AX, 2>(), SquaredEuclidean).unwrap();
        t.insert([1.0, 1.0]).unwrap();
        let item = t.insert([2.0, 2.0]).unwrap();

        assert!(t.remove(&[2.0, 2.0], item));
        t.insert([3.0, 3.0]).unwrap();

        assert_eq!(t.nodes.len(), 2);
        assert!(t.vacant.is_empty());
    }
}
