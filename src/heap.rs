//! Array-backed binary heaps.
//!
//! A [`Heap`] keeps its elements in a dense zero-indexed sequence where the
//! children of index `i` sit at `2i + 1` and `2i + 2`. The sequence is the
//! source of truth. A tree view ([`HeapLinks`] per index) is derived from
//! index arithmetic and recomputed whenever the sequence changes length, so
//! a renderer can draw the heap as a tree.
//!
//! Every element carries a stable serial [`NodeId`] that follows it across
//! swaps.
//!
//! # Examples
//!
//! ```rust
//! use treeviz::heap::{Heap, HeapMode};
//! use treeviz::step::Trace;
//!
//! let mut heap = Heap::new(HeapMode::Min);
//! let mut trace = Trace::headless();
//! heap.build([5, 3, 8, 1, 9, 2], &mut trace);
//!
//! assert_eq!(heap.peek(), Some(1));
//! assert_eq!(heap.extract_root(&mut trace), Ok(1));
//! assert_eq!(heap.peek(), Some(2));
//! ```

use crate::Key;
use crate::error::{InvariantViolation, StructureError};
use crate::frame::{Frame, FrameNode, TreeFrame};
use crate::node::{Color, NodeId};
use crate::stats::Statistics;
use crate::step::{Focus, Operation, Trace};

// =============================================================================
// HeapMode
// =============================================================================

/// Which end of the order sits at the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeapMode {
    /// Smallest key at the root.
    #[default]
    Min,
    /// Largest key at the root.
    Max,
}

impl HeapMode {
    /// Returns `true` if `key` must sit above `other`.
    ///
    /// Equal keys never precede each other.
    #[must_use]
    pub const fn precedes(self, key: Key, other: Key) -> bool {
        match self {
            Self::Min => key < other,
            Self::Max => key > other,
        }
    }
}

// =============================================================================
// Entries and links
// =============================================================================

/// One heap element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapEntry {
    /// Stable identity across swaps.
    pub id: NodeId,
    /// The element's key.
    pub key: Key,
}

/// Tree-view links of one heap index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapLinks {
    /// Index of the left child.
    pub left: Option<usize>,
    /// Index of the right child.
    pub right: Option<usize>,
    /// Index of the parent.
    pub parent: Option<usize>,
}

// =============================================================================
// Heap
// =============================================================================

/// A binary heap with a fixed [`HeapMode`].
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `insert`       | O(log N)   |
/// | `extract_root` | O(log N)   |
/// | `build`        | O(N)       |
/// | `peek`         | O(1)       |
#[derive(Clone, Debug, Default)]
pub struct Heap {
    mode: HeapMode,
    entries: Vec<HeapEntry>,
    links: Vec<HeapLinks>,
    next_serial: usize,
}

impl Heap {
    /// Creates an empty heap.
    #[must_use]
    pub const fn new(mode: HeapMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            links: Vec::new(),
            next_serial: 0,
        }
    }

    /// Returns the heap mode.
    #[must_use]
    pub const fn mode(&self) -> HeapMode {
        self.mode
    }

    /// Returns the root key.
    #[must_use]
    pub fn peek(&self) -> Option<Key> {
        self.entries.first().map(|entry| entry.key)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the heap has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the keys in array order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.entries.iter().map(|entry| entry.key).collect()
    }

    /// Returns the elements in array order.
    #[must_use]
    pub fn entries(&self) -> &[HeapEntry] {
        &self.entries
    }

    /// Returns the tree view, one entry per index.
    #[must_use]
    pub fn links(&self) -> &[HeapLinks] {
        &self.links
    }

    /// Discards every element.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.links.clear();
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends `key` and sifts it up. Duplicate keys are allowed.
    ///
    /// Returns the new element's identity.
    pub fn insert(&mut self, key: Key, trace: &mut Trace) -> NodeId {
        let id = self.next_id();
        self.entries.push(HeapEntry { id, key });
        self.relink();

        let index = self.entries.len() - 1;
        trace.record(Operation::Place, [Focus::Slot(index)], || self.frame());
        self.sift_up(index, trace);
        trace.settle(|| self.frame());
        id
    }

    /// Removes and returns the root key.
    ///
    /// The last element moves into the root slot and sifts down.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyStructure`] on an empty heap.
    pub fn extract_root(&mut self, trace: &mut Trace) -> Result<Key, StructureError> {
        if self.entries.is_empty() {
            return Err(StructureError::empty("extract"));
        }

        trace.record(Operation::Remove, [Focus::Slot(0)], || self.frame());
        let root = self.entries.swap_remove(0);
        self.relink();

        if !self.entries.is_empty() {
            trace.record(Operation::Replace, [Focus::Slot(0)], || self.frame());
            self.sift_down(0, trace);
        }
        trace.settle(|| self.frame());
        Ok(root.key)
    }

    /// Replaces the contents with `values` and heapifies bottom-up.
    pub fn build<I>(&mut self, values: I, trace: &mut Trace)
    where
        I: IntoIterator<Item = Key>,
    {
        self.entries.clear();
        for key in values {
            let id = self.next_id();
            self.entries.push(HeapEntry { id, key });
        }
        self.relink();
        trace.record(Operation::Load, [], || self.frame());

        for index in (0..self.entries.len() / 2).rev() {
            trace.record(Operation::Heapify, [Focus::Slot(index)], || self.frame());
            self.sift_down(index, trace);
        }
        trace.settle(|| self.frame());
    }

    /// Recomputes the tree view from index arithmetic.
    pub fn relink(&mut self) {
        let len = self.entries.len();
        let within = |index: usize| (index < len).then_some(index);
        self.links = (0..len)
            .map(|index| HeapLinks {
                left: within(2 * index + 1),
                right: within(2 * index + 2),
                parent: index.checked_sub(1).map(|before| before / 2),
            })
            .collect();
    }

    fn sift_up(&mut self, mut index: usize, trace: &mut Trace) {
        while index > 0 {
            let parent = (index - 1) / 2;
            trace.record(
                Operation::Compare,
                [Focus::Slot(index), Focus::Slot(parent)],
                || self.frame(),
            );
            if !self.precedes(index, parent) {
                break;
            }
            self.swap(index, parent, trace);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize, trace: &mut Trace) {
        let len = self.entries.len();
        loop {
            let mut chosen = index;
            for child in [2 * index + 1, 2 * index + 2] {
                if child < len {
                    trace.record(
                        Operation::Compare,
                        [Focus::Slot(child), Focus::Slot(chosen)],
                        || self.frame(),
                    );
                    if self.precedes(child, chosen) {
                        chosen = child;
                    }
                }
            }
            if chosen == index {
                break;
            }
            self.swap(index, chosen, trace);
            index = chosen;
        }
    }

    fn swap(&mut self, first: usize, second: usize, trace: &mut Trace) {
        trace.record(
            Operation::Swap,
            [Focus::Slot(first), Focus::Slot(second)],
            || self.frame(),
        );
        self.entries.swap(first, second);
    }

    fn precedes(&self, index: usize, other: usize) -> bool {
        self.mode
            .precedes(self.entries[index].key, self.entries[other].key)
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_serial);
        self.next_serial += 1;
        id
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Returns tree-view height, element count and leaf count.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let len = self.entries.len();
        let height = (usize::BITS - len.leading_zeros()) as usize;
        Statistics::new(height, len, len - len / 2)
    }

    /// Captures the tree view of the heap.
    #[must_use]
    pub fn frame(&self) -> Frame {
        if self.entries.is_empty() {
            return Frame::Empty;
        }
        let id_at = |index: Option<usize>| index.map(|index| self.entries[index].id);
        let nodes = self
            .entries
            .iter()
            .zip(&self.links)
            .map(|(entry, links)| FrameNode {
                id: entry.id,
                key: entry.key,
                color: Color::default(),
                left: id_at(links.left),
                right: id_at(links.right),
            })
            .collect();
        Frame::Tree(TreeFrame {
            root: self.entries.first().map(|entry| entry.id),
            nodes,
        })
    }

    /// Checks the heap property and the tree view.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::HeapOrder`] with the first child that
    /// precedes its parent.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        match (1..self.entries.len()).find(|&index| self.precedes(index, (index - 1) / 2)) {
            Some(index) => Err(InvariantViolation::HeapOrder { index }),
            None => Ok(()),
        }
    }
}
