//! Single rotations shared by every variant.

use crate::node::{Color, NodeId};
use crate::step::{Direction, Focus, Operation, RotationCase, Trace};

use super::OrderedTree;

impl OrderedTree {
    /// Rotates the subtree rooted at `pivot` to the left.
    ///
    /// The right child becomes the subtree root, `pivot` becomes its left
    /// child and the child's former left subtree moves under `pivot`. The
    /// subtree is re-seated in `pivot`'s old parent slot (or as the root).
    ///
    /// Returns the new subtree root. A pivot without a right child, or a
    /// handle that is not in the tree, is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeviz::tree::{OrderedTree, Variant};
    ///
    /// let mut tree = OrderedTree::from_keys(Variant::Bst, [1, 2, 3]);
    /// let root = tree.root().unwrap();
    /// let top = tree.rotate_left(root);
    ///
    /// assert_eq!(tree.root(), Some(top));
    /// assert_eq!(tree.node(top).unwrap().key(), 2);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn rotate_left(&mut self, pivot: NodeId) -> NodeId {
        let Some(child) = self.arena.get(pivot).and_then(|node| node.right) else {
            return pivot;
        };
        let parent = self.parent_of(pivot);
        let inner = self.left_of(child);

        self.arena[pivot].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        self.replace_child(parent, pivot, Some(child));
        self.arena[child].left = Some(pivot);
        self.arena[pivot].parent = Some(child);
        child
    }

    /// Rotates the subtree rooted at `pivot` to the right.
    ///
    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub fn rotate_right(&mut self, pivot: NodeId) -> NodeId {
        let Some(child) = self.arena.get(pivot).and_then(|node| node.left) else {
            return pivot;
        };
        let parent = self.parent_of(pivot);
        let inner = self.right_of(child);

        self.arena[pivot].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(pivot);
        }
        self.replace_child(parent, pivot, Some(child));
        self.arena[child].right = Some(pivot);
        self.arena[pivot].parent = Some(child);
        child
    }

    /// Records a rotation checkpoint, then applies it.
    pub(super) fn rotate_recorded(
        &mut self,
        pivot: NodeId,
        direction: Direction,
        case: RotationCase,
        trace: &mut Trace,
    ) -> NodeId {
        trace.record(
            Operation::Rotate { direction, case },
            [Focus::Node(pivot)],
            || self.frame(),
        );
        match direction {
            Direction::Left => self.rotate_left(pivot),
            Direction::Right => self.rotate_right(pivot),
        }
    }

    /// Rotation that hands the pivot's color to the new subtree root and
    /// paints the pivot red.
    pub(super) fn rotate_leaning(
        &mut self,
        pivot: NodeId,
        direction: Direction,
        case: RotationCase,
        trace: &mut Trace,
    ) -> NodeId {
        let color = self.arena[pivot].color;
        let top = self.rotate_recorded(pivot, direction, case, trace);
        if top != pivot {
            self.arena[top].color = color;
            self.arena[pivot].color = Color::Red;
        }
        top
    }
}
