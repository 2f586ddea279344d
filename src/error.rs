//! Errors returned by tree and queue operations.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdError {
    /// An element asked to be removed from a
    /// [`BoundedPriorityQueue`](crate::heap::BoundedPriorityQueue) is not present in it.
    #[error("Element not found")]
    NotFound,

    /// The axes, snapshot or coordinates handed to a tree cannot be used to build or search it.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, KdError>;
