//! The trait that needs to be implemented by any distance metrics

/// Trait that needs to be implemented by any potential distance
/// metric to be used within queries
///
/// Nearest-neighbour pruning is only correct for metrics that decompose per axis
/// (Euclidean, squared Euclidean, Manhattan and other Minkowski distances): `dist1`
/// of two coordinates must never exceed `dist` of two payloads that differ on that
/// axis by the same amount.
pub trait DistanceMetric<P, A> {
    /// returns the distance between two payloads, as measured
    /// by a particular distance metric
    fn dist(&self, a: &P, b: &P) -> A;

    /// returns the distance between two points along a single axis,
    /// as measured by a particular distance metric.
    ///
    /// (used by the NN query to bound the distance from the query to anything
    /// on the far side of a node's splitting hyperplane)
    fn dist1(&self, a: A, b: A) -> A;
}
