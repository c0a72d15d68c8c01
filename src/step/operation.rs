//! The checkpoint vocabulary.

use std::fmt;

use smallvec::SmallVec;

use crate::graph::VertexId;
use crate::node::NodeId;

/// Direction of a single rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The right child becomes the subtree root.
    Left,
    /// The left child becomes the subtree root.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Left => "Left",
            Self::Right => "Right",
        })
    }
}

/// Why a rotation happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotationCase {
    /// AVL left-left imbalance.
    LeftLeft,
    /// AVL left-right imbalance.
    LeftRight,
    /// AVL right-right imbalance.
    RightRight,
    /// AVL right-left imbalance.
    RightLeft,
    /// Red-black pre-rotation turning an inner child into an outer one.
    InnerChild,
    /// Red-black rotation of the grandparent.
    OuterChild,
    /// LLRB: red right link with a non-red left link.
    RightLean,
    /// LLRB: two red links in a row on the left.
    DoubleRed,
}

impl fmt::Display for RotationCase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::LeftLeft => "LL",
            Self::LeftRight => "LR",
            Self::RightRight => "RR",
            Self::RightLeft => "RL",
            Self::InnerChild => "Inner Child",
            Self::OuterChild => "Outer Child",
            Self::RightLean => "Right Lean",
            Self::DoubleRed => "2 Reds",
        })
    }
}

/// What happens at a checkpoint.
///
/// # Examples
///
/// ```rust
/// use treeviz::step::{Direction, Operation, RotationCase};
///
/// let operation = Operation::Rotate {
///     direction: Direction::Right,
///     case: RotationCase::LeftRight,
/// };
/// assert_eq!(operation.to_string(), "Right Rotation (LR)");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// A new element was attached.
    Place,
    /// Search compared the key against a node.
    Probe,
    /// A traversal visited a node and emitted its key.
    Visit,
    /// Two elements are compared.
    Compare,
    /// Two elements were swapped.
    Swap,
    /// A single rotation is about to be applied.
    Rotate {
        /// Rotation direction.
        direction: Direction,
        /// The rebalancing case that triggered it.
        case: RotationCase,
    },
    /// Node colors are about to change.
    Recolor,
    /// LLRB color flip is about to be applied.
    FlipColors,
    /// A key is about to be overwritten by its in-order successor, or a
    /// heap root by the last element.
    Replace,
    /// An element is about to be removed.
    Remove,
    /// A structure was (re)loaded wholesale.
    Load,
    /// Build-heap is about to sift down one index.
    Heapify,
    /// BFS discovered a neighbor.
    Discover,
    /// DFS finished a vertex.
    Backtrack,
}

impl Operation {
    /// Returns `true` for rotations, recolors and color flips.
    #[must_use]
    pub const fn is_rebalancing(self) -> bool {
        matches!(
            self,
            Self::Rotate { .. } | Self::Recolor | Self::FlipColors
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place => formatter.write_str("Insert"),
            Self::Probe => formatter.write_str("Search"),
            Self::Visit => formatter.write_str("Visit"),
            Self::Compare => formatter.write_str("Compare"),
            Self::Swap => formatter.write_str("Swap"),
            Self::Rotate { direction, case } => write!(formatter, "{direction} Rotation ({case})"),
            Self::Recolor => formatter.write_str("Recoloring"),
            Self::FlipColors => formatter.write_str("Flip Colors"),
            Self::Replace => formatter.write_str("Replace"),
            Self::Remove => formatter.write_str("Remove"),
            Self::Load => formatter.write_str("Load"),
            Self::Heapify => formatter.write_str("Heapify"),
            Self::Discover => formatter.write_str("Discover"),
            Self::Backtrack => formatter.write_str("Backtrack"),
        }
    }
}

/// What a checkpoint highlights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Focus {
    /// A tree node.
    Node(NodeId),
    /// A heap index.
    Slot(usize),
    /// A graph vertex.
    Vertex(VertexId),
}

impl fmt::Display for Focus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(formatter, "node {id}"),
            Self::Slot(index) => write!(formatter, "slot {index}"),
            Self::Vertex(id) => write!(formatter, "vertex {id}"),
        }
    }
}

/// The highlighted elements of one checkpoint, usually one or two.
pub type Foci = SmallVec<[Focus; 2]>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Operation::Rotate { direction: Direction::Left, case: RotationCase::OuterChild }, true)]
    #[case(Operation::Recolor, true)]
    #[case(Operation::FlipColors, true)]
    #[case(Operation::Swap, false)]
    #[case(Operation::Heapify, false)]
    #[case(Operation::Place, false)]
    fn test_rebalancing_operations(#[case] operation: Operation, #[case] expected: bool) {
        assert_eq!(operation.is_rebalancing(), expected);
    }
}
