//! Shuffle history
//!
//! Bounded stack of playlist indices visited by shuffled "next", popped by
//! "previous".

use std::collections::VecDeque;

/// Shuffle history with bounded size
///
/// Implements a ring buffer that automatically discards oldest entries.
#[derive(Debug, Clone)]
pub struct History {
    /// Index buffer (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record an index
    ///
    /// If history is full, oldest entry is discarded
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Pop most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Most recent index without removing it
    pub fn peek(&self) -> Option<usize> {
        self.indices.back().copied()
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
