//! Array-backed binary min-heap ordered by an injected comparator.
//!
//! The heap never inspects its entries beyond asking the comparator for a
//! three-way ordering, so callers are free to store bare indices, tuples or
//! full records. There is no decrease-key: callers that need to lower a
//! priority push a fresh entry and skip the stale one when it surfaces.

use std::cmp::Ordering;

/// Three-way comparison capability used to order heap entries.
pub trait Comparator<T> {
    /// Orders `a` relative to `b`; `Less` moves `a` toward the root.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Binary heap that keeps the smallest entry, as judged by its comparator, at the root.
#[derive(Clone, Debug)]
pub struct MinHeap<T, C> {
    entries: Vec<T>,
    comparator: C,
}

impl<T, C> MinHeap<T, C>
where
    C: Comparator<T>,
{
    /// Creates an empty heap ordered by `comparator`.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self::with_capacity(0, comparator)
    }

    /// Creates an empty heap with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize, comparator: C) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            comparator,
        }
    }

    /// Inserts `value` and returns the number of stored entries.
    pub fn push(&mut self, value: T) -> usize {
        self.entries.push(value);
        let last = self.entries.len() - 1;
        self.sift_up(last);
        self.entries.len()
    }

    /// Removes and returns the smallest entry, or `None` when the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let root = self.entries.pop();
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        root
    }

    /// Smallest entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.entries.first()
    }

    /// Number of stored entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.comparator.compare(&self.entries[a], &self.entries[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}
