#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # kdarena
//!
//! A mutable k-d tree over arbitrary payloads.
//!
//! Payloads are whatever the host application stores: the tree reads their
//! coordinates through an ordered list of named [`AxisAccessor`](axes::AxisAccessor)s,
//! one per dimension, and compares them with a [`DistanceMetric`](distance_metric::DistanceMetric).
//! Nodes live in a flat arena and link to their children and parent by handle.
//!
//! The tree can be built balanced from a batch of points, grown one point at a time,
//! have individual points removed again, and be queried for the `n` nearest
//! payloads to a query point, optionally within a maximum distance.
//!
//! ## Usage
//! ```rust
//! use kdarena::axes::array_axes;
//! use kdarena::distance::SquaredEuclidean;
//! use kdarena::KdTree;
//!
//! let points = vec![[2.0, 3.0], [5.0, 4.0], [9.0, 6.0], [4.0, 7.0], [8.0, 1.0], [7.0, 2.0]];
//! let mut kdtree = KdTree::build(points, array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
//!
//! assert_eq!(kdtree.size(), 6);
//!
//! let nearest = kdtree.nearest_n(&[9.0, 2.0], 1, None);
//! assert_eq!(nearest[0].payload, &[8.0, 1.0]);
//!
//! let item = kdtree.insert([9.0, 2.5]).unwrap();
//! assert_eq!(kdtree.nearest_one(&[9.0, 2.0]).unwrap().item, item);
//!
//! kdtree.remove(&[9.0, 2.5], item);
//! assert_eq!(kdtree.size(), 6);
//! ```
//!
//! ## Payloads with named fields
//! ```rust
//! use kdarena::axes::AxisAccessor;
//! use kdarena::distance::FnMetric;
//! use kdarena::KdTree;
//!
//! struct Star { name: &'static str, x: f64, y: f64 }
//!
//! let axes = vec![
//!     AxisAccessor::new("x", |s: &Star| s.x),
//!     AxisAccessor::new("y", |s: &Star| s.y),
//! ];
//! let metric = FnMetric::new(
//!     |a: &Star, b: &Star| ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt(),
//!     |a: f64, b: f64| (a - b).abs(),
//! );
//! let stars = vec![
//!     Star { name: "Vega", x: 1.0, y: 2.0 },
//!     Star { name: "Deneb", x: -3.0, y: 0.5 },
//! ];
//!
//! let tree = KdTree::build(stars, axes, metric).unwrap();
//! let probe = Star { name: "probe", x: 0.0, y: 0.0 };
//!
//! assert_eq!(tree.nearest_one(&probe).unwrap().payload.name, "Vega");
//! ```
//!
//! ## Cargo features
//! * `tracing` (default): emits [`tracing`](https://docs.rs/tracing) events for
//!   construction, insertion, removal and pruning.
//! * `serde`: derives `Serialize`/`Deserialize` for [`Snapshot`](snapshot::Snapshot)
//!   and [`ItemId`].

#[cfg(feature = "serde")]
extern crate serde;
#[cfg(feature = "serde")]
extern crate serde_derive;

pub mod axes;
mod construction;
pub mod distance;
pub mod distance_metric;
pub mod error;
pub mod heap;
pub mod kdtree;
pub mod nearest_neighbour;
pub mod node;
mod query;
pub mod snapshot;
pub mod types;

pub use crate::error::{KdError, Result};
pub use crate::kdtree::KdTree;
pub use crate::nearest_neighbour::NearestNeighbour;
pub use crate::types::{ItemId, NodeId};
