//! Contains a selection of distance metrics that can be chosen from to measure the distance
//! between two points stored inside the tree.

use std::fmt;

use crate::distance_metric::DistanceMetric;
use crate::types::Axis;

/// Returns the Manhattan / "taxi cab" distance between two points.
///
/// # Examples
///
/// ```rust
/// use kdarena::distance::Manhattan;
/// use kdarena::distance_metric::DistanceMetric;
///
/// assert_eq!(0f32, Manhattan.dist(&[0f32, 0f32], &[0f32, 0f32]));
/// assert_eq!(1f32, Manhattan.dist(&[0f32, 0f32], &[1f32, 0f32]));
/// assert_eq!(2f32, Manhattan.dist(&[0f32, 0f32], &[1f32, 1f32]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<A: Axis, const K: usize> DistanceMetric<[A; K], A> for Manhattan {
    #[inline]
    fn dist(&self, a: &[A; K], b: &[A; K]) -> A {
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| a_val.saturating_dist(b_val))
            .fold(A::zero(), std::ops::Add::add)
    }

    #[inline]
    fn dist1(&self, a: A, b: A) -> A {
        a.saturating_dist(b)
    }
}

/// Returns the squared euclidean distance between two points.
///
/// Faster than Euclidean distance due to not needing a square root, but still
/// preserves the same distance ordering as with Euclidean distance.
///
/// # Examples
///
/// ```rust
/// use kdarena::distance::SquaredEuclidean;
/// use kdarena::distance_metric::DistanceMetric;
///
/// assert_eq!(0f32, SquaredEuclidean.dist(&[0f32, 0f32], &[0f32, 0f32]));
/// assert_eq!(1f32, SquaredEuclidean.dist(&[0f32, 0f32], &[1f32, 0f32]));
/// assert_eq!(2f32, SquaredEuclidean.dist(&[0f32, 0f32], &[1f32, 1f32]));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl<A: Axis, const K: usize> DistanceMetric<[A; K], A> for SquaredEuclidean {
    #[inline]
    fn dist(&self, a: &[A; K], b: &[A; K]) -> A {
        a.iter()
            .zip(b.iter())
            .map(|(&a_val, &b_val)| (a_val - b_val) * (a_val - b_val))
            .fold(A::zero(), std::ops::Add::add)
    }

    #[inline]
    fn dist1(&self, a: A, b: A) -> A {
        (a - b) * (a - b)
    }
}

/// Returns the euclidean distance between two points.
///
/// # Examples
///
/// ```rust
/// use kdarena::distance::Euclidean;
/// use kdarena::distance_metric::DistanceMetric;
///
/// assert_eq!(5f64, Euclidean.dist(&[0f64, 0f64], &[3f64, 4f64]));
/// assert_eq!(3f64, DistanceMetric::<[f64; 2], f64>::dist1(&Euclidean, 1f64, 4f64));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl<const K: usize> DistanceMetric<[f64; K], f64> for Euclidean {
    #[inline]
    fn dist(&self, a: &[f64; K], b: &[f64; K]) -> f64 {
        let squared: f64 = SquaredEuclidean.dist(a, b);
        squared.sqrt()
    }

    #[inline]
    fn dist1(&self, a: f64, b: f64) -> f64 {
        a.saturating_dist(b)
    }
}

impl<const K: usize> DistanceMetric<[f32; K], f32> for Euclidean {
    #[inline]
    fn dist(&self, a: &[f32; K], b: &[f32; K]) -> f32 {
        let squared: f32 = SquaredEuclidean.dist(a, b);
        squared.sqrt()
    }

    #[inline]
    fn dist1(&self, a: f32, b: f32) -> f32 {
        a.saturating_dist(b)
    }
}

/// A metric over arbitrary payloads made from a pair of closures: one measuring
/// the distance between two payloads, the other the distance between two
/// coordinates on a single axis.
///
/// # Examples
///
/// ```rust
/// use kdarena::distance::FnMetric;
/// use kdarena::distance_metric::DistanceMetric;
///
/// struct Point { x: f64, y: f64 }
///
/// let metric = FnMetric::new(
///     |a: &Point, b: &Point| ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt(),
///     |a: f64, b: f64| (a - b).abs(),
/// );
///
/// assert_eq!(metric.dist(&Point { x: 0.0, y: 0.0 }, &Point { x: 3.0, y: 4.0 }), 5.0);
/// ```
#[derive(Clone, Copy)]
pub struct FnMetric<D, D1> {
    dist: D,
    dist1: D1,
}

impl<D, D1> FnMetric<D, D1> {
    /// Wraps a payload distance function and its single-axis counterpart.
    pub fn new(dist: D, dist1: D1) -> Self {
        Self { dist, dist1 }
    }
}

impl<P, A, D, D1> DistanceMetric<P, A> for FnMetric<D, D1>
where
    D: Fn(&P, &P) -> A,
    D1: Fn(A, A) -> A,
{
    #[inline]
    fn dist(&self, a: &P, b: &P) -> A {
        (self.dist)(a, b)
    }

    #[inline]
    fn dist1(&self, a: A, b: A) -> A {
        (self.dist1)(a, b)
    }
}

impl<D, D1> fmt::Debug for FnMetric<D, D1> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMetric").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case([0f64, 0f64], [0f64, 0f64], 0f64)]
    #[case([0f64, 0f64], [1f64, 0f64], 1f64)]
    #[case([0f64, 0f64], [1f64, 1f64], 2f64)]
    #[case([-1f64, 2f64], [2f64, -2f64], 7f64)]
    fn manhattan_distances(#[case] a: [f64; 2], #[case] b: [f64; 2], #[case] expected: f64) {
        assert_eq!(Manhattan.dist(&a, &b), expected);
        assert_eq!(Manhattan.dist(&b, &a), expected);
    }

    #[rstest]
    #[case([0f64, 0f64], [0f64, 0f64], 0f64)]
    #[case([0f64, 0f64], [3f64, 4f64], 25f64)]
    #[case([1f64, 1f64], [2f64, 3f64], 5f64)]
    fn squared_euclidean_distances(
        #[case] a: [f64; 2],
        #[case] b: [f64; 2],
        #[case] expected: f64,
    ) {
        assert_eq!(SquaredEuclidean.dist(&a, &b), expected);
    }

    #[test]
    fn single_axis_distance_bounds_full_distance() {
        let a = [1f64, 5f64, -2f64];
        let b = [4f64, 1f64, 0f64];

        fn bounded<M>(metric: &M, a: &[f64; 3], b: &[f64; 3]) -> bool
        where
            M: DistanceMetric<[f64; 3], f64>,
        {
            (0..3).all(|dim| metric.dist1(a[dim], b[dim]) <= metric.dist(a, b))
        }

        assert!(bounded(&SquaredEuclidean, &a, &b));
        assert!(bounded(&Manhattan, &a, &b));
        assert!(bounded(&Euclidean, &a, &b));
    }

    #[test]
    fn fn_metric_delegates_to_its_closures() {
        let metric = FnMetric::new(
            |a: &i32, b: &i32| (a - b).abs() as f64,
            |a: f64, b: f64| (a - b).abs(),
        );

        assert_eq!(metric.dist(&3, &-4), 7.0);
        assert_eq!(DistanceMetric::<i32, f64>::dist1(&metric, 1.5, 0.5), 1.0);
    }
}
