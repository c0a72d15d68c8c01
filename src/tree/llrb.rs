//! Left-leaning red-black fix-ups.

use crate::node::{Color, NodeId};
use crate::step::{Direction, Focus, Operation, RotationCase, Trace};

use super::OrderedTree;

impl OrderedTree {
    /// Applies the three local fixes at every ancestor of `inserted`,
    /// bottom-up.
    pub(super) fn fix_left_leaning_insert(&mut self, inserted: NodeId, trace: &mut Trace) {
        let mut current = self.parent_of(inserted);
        while let Some(id) = current {
            let top = self.lean_left(id, trace);
            current = self.parent_of(top);
        }
    }

    /// Right-leaning red, then two reds in a row, then a four-node split.
    fn lean_left(&mut self, node: NodeId, trace: &mut Trace) -> NodeId {
        let mut node = node;

        if self.is_red(self.right_of(node)) && !self.is_red(self.left_of(node)) {
            node = self.rotate_leaning(node, Direction::Left, RotationCase::RightLean, trace);
        }

        let left = self.left_of(node);
        if self.is_red(left) && self.is_red(left.and_then(|id| self.left_of(id))) {
            node = self.rotate_leaning(node, Direction::Right, RotationCase::DoubleRed, trace);
        }

        if let (Some(left), Some(right)) = (self.left_of(node), self.right_of(node))
            && self.is_red(Some(left))
            && self.is_red(Some(right))
        {
            trace.record(
                Operation::FlipColors,
                [Focus::Node(node), Focus::Node(left), Focus::Node(right)],
                || self.frame(),
            );
            self.arena[node].color = Color::Red;
            self.arena[left].color = Color::Black;
            self.arena[right].color = Color::Black;
        }

        node
    }
}

#[cfg(test)]
mod tests {
    use super::super::Variant;
    use super::*;
    use rstest::rstest;

    fn insert_traced(tree: &mut OrderedTree, key: crate::Key) -> Vec<Operation> {
        let mut trace = Trace::headless();
        tree.insert(key, &mut trace).unwrap();
        trace.operations().collect()
    }

    #[rstest]
    fn test_right_child_leans_left() {
        let mut tree = OrderedTree::from_keys(Variant::LeftLeaningRedBlack, [1]);
        let operations = insert_traced(&mut tree, 2);

        assert_eq!(
            operations,
            vec![
                Operation::Place,
                Operation::Rotate {
                    direction: Direction::Left,
                    case: RotationCase::RightLean,
                },
            ]
        );
        let root = tree.root().unwrap();
        assert_eq!(tree.arena[root].key, 2);
        assert_eq!(tree.arena[root].color, Color::Black);
        let left = tree.left_of(root).unwrap();
        assert_eq!(tree.arena[left].color, Color::Red);
    }

    #[rstest]
    fn test_two_reds_rotate_then_flip() {
        let mut tree = OrderedTree::from_keys(Variant::LeftLeaningRedBlack, [3, 2]);
        let operations = insert_traced(&mut tree, 1);

        assert_eq!(
            operations,
            vec![
                Operation::Place,
                Operation::Rotate {
                    direction: Direction::Right,
                    case: RotationCase::DoubleRed,
                },
                Operation::FlipColors,
            ]
        );
        let root = tree.root().unwrap();
        assert_eq!(tree.arena[root].key, 2);
        assert_eq!(tree.arena[root].color, Color::Black);
        assert!(tree.validate().is_ok());
    }

    #[rstest]
    fn test_ascending_inserts_stay_left_leaning() {
        let tree = OrderedTree::from_keys(Variant::LeftLeaningRedBlack, 1..=20);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.keys(), (1..=20).collect::<Vec<_>>());
    }
}
