//! Named coordinate accessors. A tree over `k` dimensions is configured with an
//! ordered list of `k` accessors, one per axis; the split dimension stored in each
//! node is an index into that list.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::error::{KdError, Result};
use crate::types::Axis;

/// Extracts the coordinate on one axis from a payload of type `P`.
///
/// # Examples
///
/// ```rust
/// use kdarena::axes::AxisAccessor;
///
/// struct City { lat: f64, lon: f64 }
///
/// let lat = AxisAccessor::new("lat", |c: &City| c.lat);
/// assert_eq!(lat.name(), "lat");
/// assert_eq!(lat.coord(&City { lat: 51.5, lon: -0.1 }), 51.5);
/// ```
pub struct AxisAccessor<P, A> {
    name: Cow<'static, str>,
    get: Arc<dyn Fn(&P) -> A + Send + Sync>,
}

impl<P, A: Axis> AxisAccessor<P, A> {
    /// Creates an accessor called `name` that reads its coordinate with `get`.
    pub fn new<N, F>(name: N, get: F) -> Self
    where
        N: Into<Cow<'static, str>>,
        F: Fn(&P) -> A + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            get: Arc::new(get),
        }
    }

    /// The axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads this axis' coordinate from `payload`.
    #[inline]
    pub fn coord(&self, payload: &P) -> A {
        (self.get)(payload)
    }
}

impl<P, A> Clone for AxisAccessor<P, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            get: Arc::clone(&self.get),
        }
    }
}

impl<P, A> fmt::Debug for AxisAccessor<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisAccessor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Accessors for payloads that are plain coordinate arrays, named `"0"`, `"1"`, ...
///
/// # Examples
///
/// ```rust
/// use kdarena::axes::array_axes;
///
/// let axes = array_axes::<f64, 3>();
/// assert_eq!(axes.len(), 3);
/// assert_eq!(axes[2].coord(&[1.0, 2.0, 3.0]), 3.0);
/// ```
pub fn array_axes<A, const K: usize>() -> Vec<AxisAccessor<[A; K], A>>
where
    A: Axis + Send + Sync + 'static,
{
    (0..K)
        .map(|dim| AxisAccessor::new(dim.to_string(), move |p: &[A; K]| p[dim]))
        .collect()
}

/// Checks an axis list before a tree is built from it: there must be at least
/// one axis, and axis names must be unique.
pub(crate) fn validate_axes<P, A: Axis>(axes: &[AxisAccessor<P, A>]) -> Result<()> {
    if axes.is_empty() {
        #[cfg(feature = "tracing")]
        event!(Level::WARN, "rejected tree configuration without axes");
        return Err(KdError::Configuration(
            "at least one axis accessor is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(axes.len());
    for axis in axes {
        if !seen.insert(axis.name()) {
            #[cfg(feature = "tracing")]
            event!(Level::WARN, axis = axis.name(), "rejected duplicate axis name");
            return Err(KdError::Configuration(format!(
                "axis name {:?} is used more than once",
                axis.name()
            )));
        }
    }

    Ok(())
}

/// Reads every coordinate of `payload`, failing if any of them is NaN and so
/// can't be ordered along its axis.
pub(crate) fn checked_coords<P, A: Axis>(axes: &[AxisAccessor<P, A>], payload: &P) -> Result<()> {
    for axis in axes {
        if !axis.coord(payload).is_comparable() {
            return Err(KdError::Configuration(format!(
                "coordinate on axis {:?} is not comparable",
                axis.name()
            )));
        }
    }
    Ok(())
}
