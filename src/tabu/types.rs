//! Taboo memory and search tree nodes.

use std::collections::VecDeque;

use crate::tour::Tour;

/// An undirected pair of cities whose exchange or reversal is forbidden.
///
/// `ForbiddenMove::new(a, b) == ForbiddenMove::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForbiddenMove {
    low: usize,
    high: usize,
}

impl ForbiddenMove {
    /// Creates the move between cities `a` and `b`.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The two cities, smaller first.
    pub fn cities(&self) -> (usize, usize) {
        (self.low, self.high)
    }
}

/// Bounded FIFO of forbidden moves.
///
/// When full, pushing evicts the oldest entry. A capacity of zero disables
/// the memory entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabuList {
    capacity: usize,
    entries: VecDeque<ForbiddenMove>,
}

impl TabuList {
    /// Creates an empty list holding at most `capacity` moves.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Returns `true` if `mv` is currently forbidden.
    pub fn contains(&self, mv: &ForbiddenMove) -> bool {
        self.entries.contains(mv)
    }

    /// Records `mv`, evicting the oldest move when full.
    pub fn push(&mut self, mv: ForbiddenMove) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(mv);
    }

    /// Number of moves currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no move is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of moves held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Held moves, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ForbiddenMove> {
        self.entries.iter()
    }
}

/// One entry of the backtracking stack.
///
/// Holds the tour that improved on its parent, the taboo memory as it was
/// when the node was created, and the first move taken out of it.
#[derive(Debug, Clone)]
pub struct SearchTreeNode<C> {
    /// Tour at this node.
    pub tour: Tour,
    /// Cost of `tour`.
    pub cost: C,
    /// Taboo memory snapshot taken when the node was pushed.
    pub memory: TabuList,
    /// First move taken from this node, re-forbidden on backtrack.
    pub last_move: Option<ForbiddenMove>,
}
