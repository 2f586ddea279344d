//! Tree node record.

use crate::types::{ItemId, NodeId};

/// A payload together with the identity it was given when it entered the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<P> {
    /// identity used to match the payload on deletion
    pub item: ItemId,
    /// the stored payload
    pub payload: P,
}

/// A node within the tree's arena.
///
/// Children are owned through their slot in the parent; the parent link is a
/// plain, non-owning handle and is `None` only for the root.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode<P> {
    pub(crate) entry: Entry<P>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) dimension: usize,
}

impl<P> TreeNode<P> {
    pub(crate) fn new(entry: Entry<P>, dimension: usize, parent: Option<NodeId>) -> Self {
        Self {
            entry,
            left: None,
            right: None,
            parent,
            dimension,
        }
    }

    /// The stored payload.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.entry.payload
    }

    /// The identity of the stored payload.
    #[inline]
    pub fn item(&self) -> ItemId {
        self.entry.item
    }

    /// Index of the axis this node splits its subtree on.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Handle of the left (strictly less) child.
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Handle of the right (greater or equal) child.
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Handle of the parent, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
