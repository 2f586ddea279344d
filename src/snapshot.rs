//! Export and restore of a tree's shape.
//!
//! A [`Snapshot`] is a plain nested copy of the tree holding each node's payload,
//! identity, split axis and children, but no parent links, so it has no reference
//! cycles and can be encoded as a nested document. With the `serde` feature it
//! derives `Serialize` and `Deserialize`.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::{event, span, Level};

use crate::axes::{checked_coords, AxisAccessor};
use crate::distance_metric::DistanceMetric;
use crate::error::{KdError, Result};
use crate::kdtree::KdTree;
use crate::node::{Entry, TreeNode};
use crate::types::{Axis, ItemId, NodeId};

/// Acyclic copy of a (sub)tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<P> {
    /// identity of the payload
    pub item: ItemId,
    /// the stored payload
    pub payload: P,
    /// left (strictly less) subtree
    pub left: Option<Box<Snapshot<P>>>,
    /// right (greater or equal) subtree
    pub right: Option<Box<Snapshot<P>>>,
    /// split axis index
    pub dimension: usize,
}

impl<P, A, M> KdTree<P, A, M>
where
    A: Axis,
    M: DistanceMetric<P, A>,
{
    /// Deep-copies the tree into a [`Snapshot`]. `None` for an empty tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let points = vec![[1.0, 1.0], [2.0, 2.0]];
    /// let tree = KdTree::build(points, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    /// let snapshot = tree.to_snapshot().unwrap();
    ///
    /// assert_eq!(snapshot.payload, [2.0, 2.0]);
    /// assert_eq!(snapshot.left.unwrap().payload, [1.0, 1.0]);
    /// ```
    pub fn to_snapshot(&self) -> Option<Snapshot<P>>
    where
        P: Clone,
    {
        self.root.map(|root| self.snapshot_recurse(root))
    }

    fn snapshot_recurse(&self, id: NodeId) -> Snapshot<P>
    where
        P: Clone,
    {
        let node = self.node(id);
        Snapshot {
            item: node.item(),
            payload: node.payload().clone(),
            left: node.left.map(|left| Box::new(self.snapshot_recurse(left))),
            right: node.right.map(|right| Box::new(self.snapshot_recurse(right))),
            dimension: node.dimension,
        }
    }

    /// Restores a tree from a [`Snapshot`], rebuilding parent links.
    ///
    /// Fails with [`KdError::Configuration`] if a node's split axis is out of range
    /// for `axes` or doesn't follow on from its parent's, if two nodes share an
    /// [`ItemId`], if a payload has a NaN coordinate, or if an [`ItemId`] is
    /// `u64::MAX`. Later insertions are given identities after the largest one in
    /// the snapshot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdarena::axes::array_axes;
    /// use kdarena::distance::SquaredEuclidean;
    /// use kdarena::KdTree;
    ///
    /// let points = vec![[1.0, 1.0], [2.0, 2.0]];
    /// let tree = KdTree::build(points, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    /// let snapshot = tree.to_snapshot().unwrap();
    ///
    /// let restored =
    ///     KdTree::from_snapshot(snapshot, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    ///
    /// assert_eq!(restored.size(), 2);
    /// ```
    pub fn from_snapshot(
        snapshot: Snapshot<P>,
        axes: Vec<AxisAccessor<P, A>>,
        metric: M,
    ) -> Result<Self> {
        let mut tree = Self::new(axes, metric)?;

        #[cfg(feature = "tracing")]
        let span = span!(Level::DEBUG, "restore");
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut seen = HashSet::new();
        tree.root = Some(tree.restore_recurse(snapshot, None, &mut seen)?);

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, size = tree.size, "restored tree");

        Ok(tree)
    }

    fn restore_recurse(
        &mut self,
        snapshot: Snapshot<P>,
        parent: Option<NodeId>,
        seen: &mut HashSet<ItemId>,
    ) -> Result<NodeId> {
        let Snapshot {
            item,
            payload,
            left,
            right,
            dimension,
        } = snapshot;
        let k = self.axes.len();

        if dimension >= k {
            return Err(KdError::Configuration(format!(
                "snapshot node {:?} splits on axis {} but only {} axes are configured",
                item, dimension, k
            )));
        }
        if let Some(parent_id) = parent {
            let expected = (self.node(parent_id).dimension + 1) % k;
            if dimension != expected {
                return Err(KdError::Configuration(format!(
                    "snapshot node {:?} splits on axis {} where {} was expected",
                    item, dimension, expected
                )));
            }
        }
        if !seen.insert(item) {
            return Err(KdError::Configuration(format!(
                "snapshot holds {:?} more than once",
                item
            )));
        }
        checked_coords(&self.axes, &payload)?;
        let next_item = item.next().ok_or_else(|| {
            KdError::Configuration(format!(
                "snapshot node {:?} leaves no identity for insertion",
                item
            ))
        })?;

        let id = self.alloc(TreeNode::new(Entry { item, payload }, dimension, parent));
        self.size += 1;
        self.next_item = self.next_item.max(next_item);

        let left = left
            .map(|left| self.restore_recurse(*left, Some(id), seen))
            .transpose()?;
        let right = right
            .map(|right| self.restore_recurse(*right, Some(id), seen))
            .transpose()?;

        let node = self.node_mut(id);
        node.left = left;
        node.right = right;

        Ok(id)
    }
}
