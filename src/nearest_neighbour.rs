//! A result item returned by a query
use std::cmp::Ordering;

use crate::types::ItemId;

/// Represents an entry in the results of a nearest neighbour query, with `distance` being
/// the distance of this particular item from the query point, `item` being the identity
/// of the stored payload that was found
/// and `payload` borrowing that payload from the tree.
#[derive(Debug, Copy, Clone)]
pub struct NearestNeighbour<'t, A, P> {
    /// the distance of the found item from the query point according to the supplied
    /// distance metric
    pub distance: A,
    /// the identity of a payload that was found in the query
    pub item: ItemId,
    /// the payload that was found in the query
    pub payload: &'t P,
}

impl<A: PartialOrd, P> Ord for NearestNeighbour<'_, A, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

#[allow(unknown_lints)]
#[allow(clippy::non_canonical_partial_ord_impl)]
impl<A: PartialOrd, P> PartialOrd for NearestNeighbour<'_, A, P> {
    /// By distance, then by item, so ordering agrees with equality.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.distance.partial_cmp(&other.distance)? {
            Ordering::Equal => Some(self.item.cmp(&other.item)),
            ordering => Some(ordering),
        }
    }
}

impl<A: PartialEq, P> Eq for NearestNeighbour<'_, A, P> {}

impl<A: PartialEq, P> PartialEq for NearestNeighbour<'_, A, P> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.item == other.item
    }
}

impl<A, P> From<NearestNeighbour<'_, A, P>> for (A, ItemId) {
    fn from(elem: NearestNeighbour<'_, A, P>) -> Self {
        (elem.distance, elem.item)
    }
}

#[cfg(test)]
mod tests {
    use crate::nearest_neighbour::NearestNeighbour;
    use crate::types::ItemId;
    use std::cmp::Ordering;

    #[test]
    fn test_from_tuple() {
        let payload = [0f32, 1f32];
        let nn: (f32, ItemId) = NearestNeighbour {
            distance: 1.0f32,
            item: ItemId(1),
            payload: &payload,
        }
        .into();

        assert_eq!(nn.0, 1.0f32);
        assert_eq!(nn.1, ItemId(1));
    }

    #[test]
    fn test_partial_cmp() {
        let payload = "a";
        let a = NearestNeighbour {
            distance: 1.0f32,
            item: ItemId(10),
            payload: &payload,
        };
        let b = NearestNeighbour {
            distance: 2.0f32,
            item: ItemId(5),
            payload: &payload,
        };

        assert_eq!(a.partial_cmp(&b).unwrap(), Ordering::Less)
    }

    #[test]
    fn equal_distances_order_by_item() {
        let payload = "a";
        let a = NearestNeighbour {
            distance: 1.0f32,
            item: ItemId(3),
            payload: &payload,
        };
        let b = NearestNeighbour {
            distance: 1.0f32,
            item: ItemId(4),
            payload: &payload,
        };

        assert_ne!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(a.cmp(&a), Ordering::Equal);
        assert_eq!(a, a);
    }
}
