//! Array-backed binary min-heap ordered by a caller-supplied scoring function.
//!
//! Used by nearest-neighbour queries as a bounded best-candidates collector: with
//! candidates scored by negative distance, the worst admitted candidate sits at
//! the top and is the first to be evicted once the collector is over capacity.

use std::marker::PhantomData;

use crate::error::{KdError, Result};

/// Binary heap keyed by `score`; the element with the lowest score is at the top.
///
/// # Examples
///
/// ```rust
/// use kdarena::heap::BoundedPriorityQueue;
///
/// let mut heap = BoundedPriorityQueue::new(|e: &i32| *e);
/// heap.push(5);
/// heap.push(1);
/// heap.push(3);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.size(), 2);
/// ```
pub struct BoundedPriorityQueue<E, S, F>
where
    F: Fn(&E) -> S,
    S: PartialOrd,
{
    content: Vec<E>,
    score: F,
    _score: PhantomData<fn() -> S>,
}

impl<E, S, F> BoundedPriorityQueue<E, S, F>
where
    F: Fn(&E) -> S,
    S: PartialOrd,
{
    /// Creates an empty heap ordered by `score`.
    pub fn new(score: F) -> Self {
        Self::with_capacity(0, score)
    }

    /// Creates an empty heap with room for `capacity` elements before reallocating.
    pub fn with_capacity(capacity: usize, score: F) -> Self {
        Self {
            content: Vec::with_capacity(capacity),
            score,
            _score: PhantomData,
        }
    }

    /// Adds `element`, restoring heap order.
    pub fn push(&mut self, element: E) {
        self.content.push(element);
        self.bubble_up(self.content.len() - 1);
    }

    /// Adds `element`, then evicts the lowest-scored element if that leaves more
    /// than `cap` elements. Returns the evicted element, if any.
    pub fn push_capped(&mut self, element: E, cap: usize) -> Option<E> {
        self.push(element);
        if self.content.len() > cap {
            self.pop()
        } else {
            None
        }
    }

    /// Removes and returns the lowest-scored element.
    pub fn pop(&mut self) -> Option<E> {
        if self.content.is_empty() {
            return None;
        }
        let result = self.content.swap_remove(0);
        if !self.content.is_empty() {
            self.sink_down(0);
        }
        Some(result)
    }

    /// Returns the lowest-scored element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&E> {
        self.content.first()
    }

    /// Number of elements currently held.
    #[inline]
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Whether the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The backing storage, in heap order rather than sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.content.iter()
    }

    /// Consumes the heap, returning its backing storage in heap order.
    pub fn into_vec(self) -> Vec<E> {
        self.content
    }

    fn bubble_up(&mut self, mut n: usize) {
        let element_score = (self.score)(&self.content[n]);
        while n > 0 {
            let parent_n = (n + 1) / 2 - 1;
            if element_score < (self.score)(&self.content[parent_n]) {
                self.content.swap(n, parent_n);
                n = parent_n;
            } else {
                break;
            }
        }
    }

    fn sink_down(&mut self, mut n: usize) {
        let length = self.content.len();
        let element_score = (self.score)(&self.content[n]);

        loop {
            let child2_n = (n + 1) * 2;
            let child1_n = child2_n - 1;
            let mut swap: Option<(usize, S)> = None;

            if child1_n < length {
                let child1_score = (self.score)(&self.content[child1_n]);
                if child1_score < element_score {
                    swap = Some((child1_n, child1_score));
                }
            }
            if child2_n < length {
                let child2_score = (self.score)(&self.content[child2_n]);
                let beats = match &swap {
                    None => child2_score < element_score,
                    Some((_, child1_score)) => child2_score < *child1_score,
                };
                if beats {
                    swap = Some((child2_n, child2_score));
                }
            }

            match swap {
                Some((swap_n, _)) => {
                    self.content.swap(n, swap_n);
                    n = swap_n;
                }
                None => break,
            }
        }
    }
}

impl<E, S, F> BoundedPriorityQueue<E, S, F>
where
    E: PartialEq,
    F: Fn(&E) -> S,
    S: PartialOrd,
{
    /// Removes the element equal to `element`.
    ///
    /// Callers give `E` an identity-based `PartialEq`; the first match in storage
    /// order is removed. Fails with [`KdError::NotFound`] if nothing matches.
    pub fn remove(&mut self, element: &E) -> Result<()> {
        let len = self.content.len();
        let i = self
            .content
            .iter()
            .position(|e| e == element)
            .ok_or(KdError::NotFound)?;

        let removed = self.content.swap_remove(i);
        if i != len - 1 {
            if (self.score)(&self.content[i]) < (self.score)(&removed) {
                self.bubble_up(i);
            } else {
                self.sink_down(i);
            }
        }
        Ok(())
    }
}

impl<E: std::fmt::Debug, S, F> std::fmt::Debug for BoundedPriorityQueue<E, S, F>
where
    F: Fn(&E) -> S,
    S: PartialOrd,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedPriorityQueue")
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}
