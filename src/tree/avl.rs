//! AVL rebalancing.
//!
//! Both unwinds walk from a starting node to the root through parent handles,
//! re-evaluating the balance factor at each level. Insertion picks the case
//! by comparing the inserted key with the heavy child; deletion picks it from
//! the heavy child's own balance factor.

use crate::Key;
use crate::node::NodeId;
use crate::step::{Direction, RotationCase, Trace};

use super::OrderedTree;

impl OrderedTree {
    pub(super) fn rebalance_after_insert(&mut self, inserted: NodeId, key: Key, trace: &mut Trace) {
        let mut current = self.parent_of(inserted);
        while let Some(id) = current {
            let top = self.rebalance_for_insert(id, key, trace);
            current = self.parent_of(top);
        }
    }

    pub(super) fn rebalance_after_delete(&mut self, start: Option<NodeId>, trace: &mut Trace) {
        let mut current = start;
        while let Some(id) = current {
            let top = self.rebalance_for_delete(id, trace);
            current = self.parent_of(top);
        }
    }

    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance_for_insert(&mut self, node: NodeId, key: Key, trace: &mut Trace) -> NodeId {
        let balance = self.balance_factor(Some(node));
        let heavy_left = self.left_of(node).filter(|_| balance > 1);
        let heavy_right = self.right_of(node).filter(|_| balance < -1);

        match (heavy_left, heavy_right) {
            (Some(left), _) if key < self.arena[left].key => {
                self.rotate_recorded(node, Direction::Right, RotationCase::LeftLeft, trace)
            }
            (_, Some(right)) if key > self.arena[right].key => {
                self.rotate_recorded(node, Direction::Left, RotationCase::RightRight, trace)
            }
            (Some(left), _) if key > self.arena[left].key => {
                self.rotate_recorded(left, Direction::Left, RotationCase::LeftRight, trace);
                self.rotate_recorded(node, Direction::Right, RotationCase::LeftRight, trace)
            }
            (_, Some(right)) if key < self.arena[right].key => {
                self.rotate_recorded(right, Direction::Right, RotationCase::RightLeft, trace);
                self.rotate_recorded(node, Direction::Left, RotationCase::RightLeft, trace)
            }
            _ => node,
        }
    }

    fn rebalance_for_delete(&mut self, node: NodeId, trace: &mut Trace) -> NodeId {
        let balance = self.balance_factor(Some(node));
        if balance > 1 {
            let Some(left) = self.left_of(node) else {
                return node;
            };
            if self.balance_factor(Some(left)) >= 0 {
                self.rotate_recorded(node, Direction::Right, RotationCase::LeftLeft, trace)
            } else {
                self.rotate_recorded(left, Direction::Left, RotationCase::LeftRight, trace);
                self.rotate_recorded(node, Direction::Right, RotationCase::LeftRight, trace)
            }
        } else if balance < -1 {
            let Some(right) = self.right_of(node) else {
                return node;
            };
            if self.balance_factor(Some(right)) <= 0 {
                self.rotate_recorded(node, Direction::Left, RotationCase::RightRight, trace)
            } else {
                self.rotate_recorded(right, Direction::Right, RotationCase::RightLeft, trace);
                self.rotate_recorded(node, Direction::Left, RotationCase::RightLeft, trace)
            }
        } else {
            node
        }
    }
}
