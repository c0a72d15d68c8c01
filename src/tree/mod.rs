//! Ordered binary trees: BST, AVL, Red-Black and Left-Leaning Red-Black.
//!
//! This module provides [`OrderedTree`], an arena-backed binary search tree
//! whose insert and delete algorithms are selected by a [`Variant`].
//!
//! # Overview
//!
//! | Variant                | Insert                         | Delete      |
//! |------------------------|--------------------------------|-------------|
//! | `Bst`                  | leaf placement                 | supported   |
//! | `Avl`                  | LL / RR / LR / RL rotations    | supported   |
//! | `RedBlack`             | recolor + rotate fix-up loop   | unsupported |
//! | `LeftLeaningRedBlack`  | lean / double-red / flip       | unsupported |
//!
//! Every operation writes its checkpoints into a [`Trace`]: one per placed
//! node, visited node, rotation or recolor. Rotations and recolors are
//! recorded *before* they are applied, so the frame attached to the step
//! shows the tree the operation is about to change.
//!
//! # Examples
//!
//! ```rust
//! use treeviz::step::Trace;
//! use treeviz::tree::{OrderedTree, TraversalOrder, Variant};
//!
//! let mut tree = OrderedTree::new(Variant::Bst);
//! let mut trace = Trace::headless();
//! for key in [50, 30, 70, 20, 40] {
//!     tree.insert(key, &mut trace).unwrap();
//! }
//!
//! let keys = tree.traverse(TraversalOrder::InOrder, &mut trace).unwrap();
//! assert_eq!(keys, vec![20, 30, 40, 50, 70]);
//! ```
//!
//! # Internal Structure
//!
//! Nodes live in a [`NodeArena`]. Every mutation keeps the parent handles
//! consistent, so all variants walk their unwind path upward through
//! `parent` instead of recursing.

use std::fmt;
use std::str::FromStr;

use crate::Key;
use crate::error::{ConfigError, StructureError};
use crate::frame::{Frame, FrameNode, TreeFrame};
use crate::kind::StructureKind;
use crate::node::{Color, Node, NodeArena, NodeId};
use crate::stats::Statistics;
use crate::step::{Focus, Operation, Trace};

mod avl;
mod llrb;
mod red_black;
mod rotation;
mod search;
mod validate;

// =============================================================================
// Variant
// =============================================================================

/// The algorithm family governing an [`OrderedTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Plain binary search tree, no rebalancing.
    #[default]
    Bst,
    /// Height-balanced AVL tree.
    Avl,
    /// Classic red-black tree.
    RedBlack,
    /// Sedgewick's left-leaning red-black tree.
    LeftLeaningRedBlack,
}

impl Variant {
    /// Returns `true` for the two red-black variants.
    #[must_use]
    pub const fn is_red_black(self) -> bool {
        matches!(self, Self::RedBlack | Self::LeftLeaningRedBlack)
    }

    /// Returns `true` if [`OrderedTree::delete`] is implemented.
    #[must_use]
    pub const fn supports_delete(self) -> bool {
        matches!(self, Self::Bst | Self::Avl)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructureKind::from(*self).fmt(formatter)
    }
}

// =============================================================================
// TraversalOrder
// =============================================================================

/// Depth-first visiting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraversalOrder {
    /// Self, left, right.
    PreOrder,
    /// Left, self, right.
    InOrder,
    /// Left, right, self.
    PostOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::PreOrder => "PreOrder",
            Self::InOrder => "InOrder",
            Self::PostOrder => "PostOrder",
        })
    }
}

impl FromStr for TraversalOrder {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pre" | "preorder" | "pre-order" => Ok(Self::PreOrder),
            "in" | "inorder" | "in-order" => Ok(Self::InOrder),
            "post" | "postorder" | "post-order" => Ok(Self::PostOrder),
            _ => Err(ConfigError::invalid_value(
                "traversal order",
                format!("unknown traversal order `{value}`"),
            )),
        }
    }
}

// =============================================================================
// OrderedTree
// =============================================================================

/// An arena-backed binary search tree with variant-selected balancing.
///
/// Keys are unique; inserting a present key is rejected without changing
/// the tree.
///
/// # Time Complexity
///
/// | Operation          | BST  | AVL      | RBT / LLRBT |
/// |--------------------|------|----------|-------------|
/// | `insert`           | O(h) | O(N)     | O(log N)    |
/// | `delete`           | O(h) | O(N)     | unsupported |
/// | `search`           | O(h) | O(log N) | O(log N)    |
/// | `traverse`         | O(N) | O(N)     | O(N)        |
/// | `rebuild_balanced` | O(N) | O(N)     | O(N)        |
///
/// AVL heights are not cached: every balance factor on the unwind path is
/// measured from its subtree, so an AVL update visits O(N) nodes in total
/// while the tree itself stays O(log N) tall.
#[derive(Clone, Debug, Default)]
pub struct OrderedTree {
    variant: Variant,
    arena: NodeArena,
    root: Option<NodeId>,
}

impl OrderedTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new(variant: Variant) -> Self {
        Self {
            variant,
            arena: NodeArena::new(),
            root: None,
        }
    }

    /// Builds a tree by inserting `keys` in order, skipping duplicates.
    #[must_use]
    pub fn from_keys<I>(variant: Variant, keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        let mut tree = Self::new(variant);
        let mut trace = Trace::headless();
        for key in keys {
            let _ = tree.insert(key, &mut trace);
        }
        tree
    }

    /// Returns the variant.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the root handle.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node behind `id`, if it is part of the tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Returns the handle of the node holding `key`, without recording.
    #[must_use]
    pub fn find(&self, key: Key) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns all keys in ascending order, without recording.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.arena[id].left;
            }
            if let Some(id) = stack.pop() {
                keys.push(self.arena[id].key);
                current = self.arena[id].right;
            }
        }
        keys
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    /// Returns height, node count and leaf count.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let leaves = self
            .arena
            .iter()
            .filter(|(_, node)| node.is_leaf())
            .count();
        Statistics::new(self.height(), self.len(), leaves)
    }

    /// Captures a snapshot of the tree.
    #[must_use]
    pub fn frame(&self) -> Frame {
        if self.root.is_none() {
            return Frame::Empty;
        }
        let mut nodes = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            nodes.push(FrameNode {
                id,
                key: node.key,
                color: node.color,
                left: node.left,
                right: node.right,
            });
            stack.extend(node.right);
            stack.extend(node.left);
        }
        Frame::Tree(TreeFrame {
            root: self.root,
            nodes,
        })
    }

    /// Discards every node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Inserts `key` and rebalances according to the variant.
    ///
    /// Returns the handle of the new node.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateKey`] if `key` is already present;
    /// the tree is left untouched and nothing is recorded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeviz::step::Trace;
    /// use treeviz::tree::{OrderedTree, Variant};
    ///
    /// let mut tree = OrderedTree::new(Variant::Avl);
    /// let mut trace = Trace::headless();
    /// for key in [10, 20, 30] {
    ///     tree.insert(key, &mut trace).unwrap();
    /// }
    /// assert_eq!(tree.keys(), vec![10, 20, 30]);
    /// assert!(tree.insert(20, &mut trace).is_err());
    /// ```
    pub fn insert(&mut self, key: Key, trace: &mut Trace) -> Result<NodeId, StructureError> {
        if self.contains(key) {
            return Err(StructureError::DuplicateKey { key });
        }

        let inserted = self.attach_leaf(key);
        trace.record(Operation::Place, [Focus::Node(inserted)], || self.frame());

        match self.variant {
            Variant::Bst => {}
            Variant::Avl => self.rebalance_after_insert(inserted, key, trace),
            Variant::RedBlack => self.fix_red_black_insert(inserted, trace),
            Variant::LeftLeaningRedBlack => self.fix_left_leaning_insert(inserted, trace),
        }

        if self.variant.is_red_black()
            && let Some(root) = self.root
        {
            self.arena[root].color = Color::Black;
        }

        trace.settle(|| self.frame());
        Ok(inserted)
    }

    /// Places `key` as a new leaf, linking it under its search parent.
    fn attach_leaf(&mut self, key: Key) -> NodeId {
        let color = if self.variant.is_red_black() && self.root.is_none() {
            Color::Black
        } else {
            Color::Red
        };

        let mut parent = None;
        let mut current = self.root;
        while let Some(id) = current {
            parent = Some(id);
            let node = &self.arena[id];
            current = if key < node.key { node.left } else { node.right };
        }

        let inserted = self.arena.allocate(Node {
            parent,
            ..Node::with_color(key, color)
        });
        match parent {
            None => self.root = Some(inserted),
            Some(parent) if key < self.arena[parent].key => {
                self.arena[parent].left = Some(inserted);
            }
            Some(parent) => self.arena[parent].right = Some(inserted),
        }
        inserted
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Removes `key`.
    ///
    /// A leaf is removed directly, a node with one child is replaced by that
    /// child, and a node with two children takes its in-order successor's key
    /// before the successor is removed. AVL trees then rebalance along the
    /// path from the removed node's parent to the root.
    ///
    /// # Errors
    ///
    /// - [`StructureError::Unsupported`] for the red-black variants
    /// - [`StructureError::EmptyStructure`] if the tree is empty
    /// - [`StructureError::KeyNotFound`] if `key` is absent
    ///
    /// The tree is left untouched on every error.
    pub fn delete(&mut self, key: Key, trace: &mut Trace) -> Result<(), StructureError> {
        if !self.variant.supports_delete() {
            return Err(StructureError::unsupported("delete", self.variant.into()));
        }
        if self.root.is_none() {
            return Err(StructureError::empty("delete"));
        }
        let Some(target) = self.find(key) else {
            return Err(StructureError::KeyNotFound { key });
        };

        let node = &self.arena[target];
        let spliced_parent = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = self.minimum(right);
                trace.record(
                    Operation::Replace,
                    [Focus::Node(target), Focus::Node(successor)],
                    || self.frame(),
                );
                self.arena[target].key = self.arena[successor].key;
                self.splice(successor, trace)
            }
            _ => self.splice(target, trace),
        };

        if self.variant == Variant::Avl {
            self.rebalance_after_delete(spliced_parent, trace);
        }

        trace.settle(|| self.frame());
        Ok(())
    }

    /// Removes a node with at most one child, returning its former parent.
    fn splice(&mut self, id: NodeId, trace: &mut Trace) -> Option<NodeId> {
        trace.record(Operation::Remove, [Focus::Node(id)], || self.frame());
        let node = &self.arena[id];
        let child = node.left.or(node.right);
        let parent = node.parent;
        self.replace_child(parent, id, child);
        let _ = self.arena.release(id);
        parent
    }

    // =========================================================================
    // Link helpers
    // =========================================================================

    /// Points `parent`'s slot (or the root) that held `old` at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let slot = &mut self.arena[parent];
                if slot.left == Some(old) {
                    slot.left = new;
                } else {
                    slot.right = new;
                }
            }
        }
        if let Some(new) = new {
            self.arena[new].parent = parent;
        }
    }

    /// Returns the leftmost node of the subtree rooted at `id`.
    fn minimum(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(left) = self.arena[current].left {
            current = left;
        }
        current
    }

    fn left_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].left
    }

    fn right_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].right
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent
    }

    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|id| self.arena[id].is_red())
    }

    fn subtree_height(&self, node: Option<NodeId>) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = node.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Returns `height(left) - height(right)`, zero for an absent node.
    #[allow(clippy::cast_possible_wrap)]
    fn balance_factor(&self, node: Option<NodeId>) -> isize {
        node.map_or(0, |id| {
            let node = &self.arena[id];
            self.subtree_height(node.left) as isize - self.subtree_height(node.right) as isize
        })
    }
}
