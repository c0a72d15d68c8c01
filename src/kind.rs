//! Structure kind selection.
//!
//! [`StructureKind`] is the enumerated selection a presentation layer hands to
//! the [`Visualizer`](crate::session::Visualizer). Each kind maps onto exactly
//! one engine: an ordered tree variant, a heap mode, or the graph engine.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::heap::HeapMode;
use crate::tree::Variant;

/// The structure kinds the visualizer can host.
///
/// # Examples
///
/// ```rust
/// use treeviz::kind::StructureKind;
///
/// let kind: StructureKind = "llrbt".parse().unwrap();
/// assert_eq!(kind, StructureKind::LeftLeaningRedBlack);
/// assert_eq!(kind.to_string(), "LLRBT");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructureKind {
    /// Unbalanced binary search tree.
    #[default]
    Bst,
    /// AVL tree.
    Avl,
    /// Classic red-black tree with parent handles.
    RedBlack,
    /// Left-leaning red-black tree.
    LeftLeaningRedBlack,
    /// Binary min-heap.
    MinHeap,
    /// Binary max-heap.
    MaxHeap,
    /// Undirected graph.
    Graph,
}

impl StructureKind {
    /// Every kind, in selection-menu order.
    pub const ALL: [Self; 7] = [
        Self::Bst,
        Self::Avl,
        Self::RedBlack,
        Self::LeftLeaningRedBlack,
        Self::MinHeap,
        Self::MaxHeap,
        Self::Graph,
    ];

    /// Returns the ordered tree variant for tree kinds.
    #[must_use]
    pub const fn variant(self) -> Option<Variant> {
        match self {
            Self::Bst => Some(Variant::Bst),
            Self::Avl => Some(Variant::Avl),
            Self::RedBlack => Some(Variant::RedBlack),
            Self::LeftLeaningRedBlack => Some(Variant::LeftLeaningRedBlack),
            Self::MinHeap | Self::MaxHeap | Self::Graph => None,
        }
    }

    /// Returns the heap mode for heap kinds.
    #[must_use]
    pub const fn heap_mode(self) -> Option<HeapMode> {
        match self {
            Self::MinHeap => Some(HeapMode::Min),
            Self::MaxHeap => Some(HeapMode::Max),
            _ => None,
        }
    }

    /// Returns `true` for the four ordered tree kinds.
    #[must_use]
    pub const fn is_tree(self) -> bool {
        self.variant().is_some()
    }

    /// Returns `true` for the two heap kinds.
    #[must_use]
    pub const fn is_heap(self) -> bool {
        self.heap_mode().is_some()
    }
}

impl From<Variant> for StructureKind {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Bst => Self::Bst,
            Variant::Avl => Self::Avl,
            Variant::RedBlack => Self::RedBlack,
            Variant::LeftLeaningRedBlack => Self::LeftLeaningRedBlack,
        }
    }
}

impl From<HeapMode> for StructureKind {
    fn from(mode: HeapMode) -> Self {
        match mode {
            HeapMode::Min => Self::MinHeap,
            HeapMode::Max => Self::MaxHeap,
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bst => "BST",
            Self::Avl => "AVL",
            Self::RedBlack => "RBT",
            Self::LeftLeaningRedBlack => "LLRBT",
            Self::MinHeap => "MinHeap",
            Self::MaxHeap => "MaxHeap",
            Self::Graph => "Graph",
        };
        formatter.write_str(name)
    }
}

impl FromStr for StructureKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bst" => Ok(Self::Bst),
            "avl" => Ok(Self::Avl),
            "rbt" | "red-black" | "redblack" => Ok(Self::RedBlack),
            "llrbt" | "llrb" | "left-leaning" => Ok(Self::LeftLeaningRedBlack),
            "minheap" | "min-heap" | "min" => Ok(Self::MinHeap),
            "maxheap" | "max-heap" | "max" => Ok(Self::MaxHeap),
            "graph" => Ok(Self::Graph),
            _ => Err(ConfigError::invalid_value(
                "structure kind",
                format!("unknown structure kind `{value}`"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BST", StructureKind::Bst)]
    #[case("avl", StructureKind::Avl)]
    #[case("RBT", StructureKind::RedBlack)]
    #[case("llrb", StructureKind::LeftLeaningRedBlack)]
    #[case("MinHeap", StructureKind::MinHeap)]
    #[case("max", StructureKind::MaxHeap)]
    #[case(" graph ", StructureKind::Graph)]
    fn test_parse_structure_kind(#[case] input: &str, #[case] expected: StructureKind) {
        assert_eq!(input.parse::<StructureKind>(), Ok(expected));
    }

    #[rstest]
    fn test_parse_unknown_kind_fails() {
        assert!("splay".parse::<StructureKind>().is_err());
    }

    #[rstest]
    fn test_display_round_trips_through_parse() {
        for kind in StructureKind::ALL {
            assert_eq!(kind.to_string().parse::<StructureKind>(), Ok(kind));
        }
    }

    #[rstest]
    fn test_engine_mapping() {
        assert_eq!(StructureKind::Avl.variant(), Some(Variant::Avl));
        assert_eq!(StructureKind::MaxHeap.heap_mode(), Some(HeapMode::Max));
        assert!(!StructureKind::Graph.is_tree());
        assert!(!StructureKind::Graph.is_heap());
        assert_eq!(StructureKind::from(Variant::RedBlack), StructureKind::RedBlack);
    }
}
