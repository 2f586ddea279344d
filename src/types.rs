use num_traits::float::FloatCore;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis trait represents the traits that must be implemented
/// by the coordinate type, `A`, that axis accessors extract from payloads.
/// This will be [`f64`] or [`f32`].
pub trait Axis: FloatCore + Default + Debug + Copy {
    /// returns absolute diff between two values of a type implementing this trait
    fn saturating_dist(self, other: Self) -> Self;

    /// whether this value can be ordered against other coordinates. NaN can't.
    fn is_comparable(self) -> bool;
}

impl<T: FloatCore + Default + Debug + Copy> Axis for T {
    #[inline]
    fn saturating_dist(self, other: Self) -> Self {
        (self - other).abs()
    }

    #[inline]
    fn is_comparable(self) -> bool {
        !self.is_nan()
    }
}

/// Handle of a node slot within a tree's arena.
///
/// Handles are only meaningful for the tree that produced them, and a slot
/// freed by a deletion may be handed out again by a later insertion.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0
    }
}

/// Stable identity of a payload stored in a tree.
///
/// Assigned when a payload enters the tree, either in input order by a balanced
/// build or by [`insert`](crate::KdTree::insert). Deletion matches on this, never on
/// payload value, so two equal payloads stored separately stay distinguishable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ItemId(pub u64);

impl ItemId {
    /// The identity after this one, or `None` once `u64` is exhausted.
    #[inline]
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(ItemId)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_dist_is_symmetric() {
        assert_eq!(3f64.saturating_dist(5f64), 2f64);
        assert_eq!(5f64.saturating_dist(3f64), 2f64);
        assert_eq!((-1f32).saturating_dist(1f32), 2f32);
    }

    #[test]
    fn nan_is_not_comparable() {
        assert!(1f64.is_comparable());
        assert!(f64::INFINITY.is_comparable());
        assert!(!f64::NAN.is_comparable());
    }

    #[test]
    fn item_ids_count_up() {
        assert_eq!(ItemId(7).next(), Some(ItemId(8)));
        assert_eq!(ItemId(u64::MAX).next(), None);
        assert_eq!(u64::from(ItemId(3)), 3);
    }
}
