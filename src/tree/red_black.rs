//! Red-black insertion fix-up.

use crate::node::{Color, NodeId};
use crate::step::{Direction, Focus, Operation, RotationCase, Trace};

use super::OrderedTree;

impl OrderedTree {
    /// Restores the red-black properties after `inserted` was placed.
    ///
    /// While the node and its parent are both red: a red uncle pushes the
    /// violation two levels up by recoloring; otherwise an inner child is
    /// first rotated to the outside, then the grandparent is rotated and
    /// the parent and grandparent swap colors.
    pub(super) fn fix_red_black_insert(&mut self, inserted: NodeId, trace: &mut Trace) {
        let mut node = inserted;
        loop {
            if Some(node) == self.root || !self.is_red(Some(node)) {
                break;
            }
            let Some(mut parent) = self.parent_of(node).filter(|&id| self.is_red(Some(id))) else {
                break;
            };
            // A red parent can still be the root right after a balanced rebuild.
            let Some(grandparent) = self.parent_of(parent) else {
                break;
            };

            let parent_is_left = self.left_of(grandparent) == Some(parent);
            let uncle = if parent_is_left {
                self.right_of(grandparent)
            } else {
                self.left_of(grandparent)
            };

            if let Some(uncle) = uncle.filter(|&id| self.is_red(Some(id))) {
                trace.record(
                    Operation::Recolor,
                    [
                        Focus::Node(grandparent),
                        Focus::Node(parent),
                        Focus::Node(uncle),
                    ],
                    || self.frame(),
                );
                self.arena[grandparent].color = Color::Red;
                self.arena[parent].color = Color::Black;
                self.arena[uncle].color = Color::Black;
                node = grandparent;
                continue;
            }

            let (inner, outer) = if parent_is_left {
                (Direction::Left, Direction::Right)
            } else {
                (Direction::Right, Direction::Left)
            };
            let is_inner_child = if parent_is_left {
                self.right_of(parent) == Some(node)
            } else {
                self.left_of(parent) == Some(node)
            };
            if is_inner_child {
                parent = self.rotate_recorded(parent, inner, RotationCase::InnerChild, trace);
            }

            self.rotate_recorded(grandparent, outer, RotationCase::OuterChild, trace);
            trace.record(
                Operation::Recolor,
                [Focus::Node(parent), Focus::Node(grandparent)],
                || self.frame(),
            );
            let parent_color = self.arena[parent].color;
            self.arena[parent].color = self.arena[grandparent].color;
            self.arena[grandparent].color = parent_color;
            node = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Variant;
    use super::*;
    use crate::Key;
    use rstest::rstest;

    fn color_of(tree: &OrderedTree, key: Key) -> Color {
        tree.arena[tree.find(key).unwrap()].color
    }

    #[rstest]
    fn test_ascending_insert_rotates_outer_child() {
        let mut tree = OrderedTree::new(Variant::RedBlack);
        let mut trace = Trace::headless();
        for key in [1, 2, 3] {
            tree.insert(key, &mut trace).unwrap();
        }

        let root = tree.root().unwrap();
        assert_eq!(tree.arena[root].key, 2);
        assert_eq!(color_of(&tree, 2), Color::Black);
        assert_eq!(color_of(&tree, 1), Color::Red);
        assert_eq!(color_of(&tree, 3), Color::Red);
        assert!(trace.operations().any(|operation| operation
            == Operation::Rotate {
                direction: Direction::Left,
                case: RotationCase::OuterChild,
            }));
    }

    #[rstest]
    fn test_red_uncle_recolors() {
        let mut tree = OrderedTree::from_keys(Variant::RedBlack, [2, 1, 3]);
        let mut trace = Trace::headless();
        tree.insert(4, &mut trace).unwrap();

        assert_eq!(color_of(&tree, 1), Color::Black);
        assert_eq!(color_of(&tree, 3), Color::Black);
        assert_eq!(color_of(&tree, 4), Color::Red);
        assert_eq!(color_of(&tree, 2), Color::Black);
        assert!(trace.operations().any(|operation| operation == Operation::Recolor));
    }

    #[rstest]
    fn test_inner_child_is_rotated_first() {
        let mut tree = OrderedTree::new(Variant::RedBlack);
        let mut trace = Trace::headless();
        for key in [3, 1, 2] {
            tree.insert(key, &mut trace).unwrap();
        }

        let cases: Vec<RotationCase> = trace
            .operations()
            .filter_map(|operation| match operation {
                Operation::Rotate { case, .. } => Some(case),
                _ => None,
            })
            .collect();
        assert_eq!(cases, vec![RotationCase::InnerChild, RotationCase::OuterChild]);
        assert_eq!(tree.arena[tree.root().unwrap()].key, 2);
        assert_eq!(color_of(&tree, 2), Color::Black);
        assert_eq!(color_of(&tree, 1), Color::Red);
        assert_eq!(color_of(&tree, 3), Color::Red);
        assert!(tree.validate().is_ok());
    }
}
