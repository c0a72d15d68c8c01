//! Aggregate statistics shown next to a tree or heap.

use std::fmt;

/// Height, node count and leaf count of a tree-shaped structure.
///
/// Height counts nodes, so a single node has height 1 and an empty
/// structure height 0.
///
/// # Examples
///
/// ```rust
/// use treeviz::stats::Statistics;
///
/// let statistics = Statistics::new(2, 3, 2);
/// assert_eq!(statistics.to_string(), "height 2, nodes 3, leaves 2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Number of nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Number of nodes.
    pub total: usize,
    /// Number of nodes without children.
    pub leaves: usize,
}

impl Statistics {
    /// Creates a statistics record.
    #[must_use]
    pub const fn new(height: usize, total: usize, leaves: usize) -> Self {
        Self {
            height,
            total,
            leaves,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "height {}, nodes {}, leaves {}",
            self.height, self.total, self.leaves
        )
    }
}
