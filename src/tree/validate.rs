//! Structural invariant checks.

use std::collections::HashMap;

use crate::error::InvariantViolation;
use crate::node::{Color, NodeId};

use super::{OrderedTree, Variant};

impl OrderedTree {
    /// Checks the invariants of the tree's variant.
    ///
    /// Every variant must keep strictly ascending in-order keys and
    /// consistent parent handles. AVL trees additionally keep every balance
    /// factor within `-1..=1`. Red-black trees keep a black root, no red node
    /// with a red child and equal black heights; left-leaning trees also have
    /// no red right child.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.validate_links()?;
        self.validate_order()?;
        match self.variant {
            Variant::Bst => Ok(()),
            Variant::Avl => self.validate_heights(),
            Variant::RedBlack | Variant::LeftLeaningRedBlack => {
                if self.is_red(self.root) {
                    return Err(InvariantViolation::RedRoot);
                }
                self.validate_colors()
            }
        }
    }

    fn validate_links(&self) -> Result<(), InvariantViolation> {
        if let Some(root) = self.root
            && self.parent_of(root).is_some()
        {
            return Err(InvariantViolation::BrokenParentLink {
                key: self.arena[root].key,
            });
        }
        for (id, node) in self.arena.iter() {
            for child in [node.left, node.right].into_iter().flatten() {
                if self.parent_of(child) != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink {
                        key: self.arena[child].key,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_order(&self) -> Result<(), InvariantViolation> {
        let keys = self.keys();
        match keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            Some(pair) => Err(InvariantViolation::OutOfOrder { key: pair[1] }),
            None => Ok(()),
        }
    }

    /// Lists the nodes in pre-order; reversed, every child precedes its parent.
    fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.right_of(id));
            stack.extend(self.left_of(id));
        }
        order
    }

    fn validate_heights(&self) -> Result<(), InvariantViolation> {
        let mut heights: HashMap<NodeId, usize> = HashMap::with_capacity(self.len());
        let height_of = |heights: &HashMap<NodeId, usize>, node: Option<NodeId>| {
            node.map_or(0, |id| heights.get(&id).copied().unwrap_or(0))
        };
        for id in self.pre_order().into_iter().rev() {
            let left = height_of(&heights, self.left_of(id));
            let right = height_of(&heights, self.right_of(id));
            if left.abs_diff(right) > 1 {
                return Err(InvariantViolation::Unbalanced {
                    key: self.arena[id].key,
                    balance: self.balance_factor(Some(id)),
                });
            }
            heights.insert(id, 1 + left.max(right));
        }
        Ok(())
    }

    /// Checks the coloring rules; black heights count the absent leaf.
    fn validate_colors(&self) -> Result<(), InvariantViolation> {
        let order = self.pre_order();
        for &id in &order {
            let (left, right) = (self.left_of(id), self.right_of(id));
            let key = self.arena[id].key;
            if self.is_red(Some(id)) && (self.is_red(left) || self.is_red(right)) {
                return Err(InvariantViolation::DoubleRed { key });
            }
            if self.variant == Variant::LeftLeaningRedBlack && self.is_red(right) {
                return Err(InvariantViolation::RightLeaningRed { key });
            }
        }

        let mut black_heights: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
        let black_height_of = |heights: &HashMap<NodeId, usize>, node: Option<NodeId>| {
            node.map_or(1, |id| heights.get(&id).copied().unwrap_or(1))
        };
        for id in order.into_iter().rev() {
            let left = black_height_of(&black_heights, self.left_of(id));
            let right = black_height_of(&black_heights, self.right_of(id));
            if left != right {
                return Err(InvariantViolation::BlackHeightMismatch {
                    key: self.arena[id].key,
                });
            }
            black_heights.insert(id, left + usize::from(self.arena[id].color == Color::Black));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Trace;
    use rstest::rstest;

    #[rstest]
    #[case(Variant::Bst)]
    #[case(Variant::Avl)]
    #[case(Variant::RedBlack)]
    #[case(Variant::LeftLeaningRedBlack)]
    fn test_fresh_trees_validate(#[case] variant: Variant) {
        let tree = OrderedTree::from_keys(variant, [41, 38, 31, 12, 19, 8, 50, 45]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_rotated_avl_reports_imbalance() {
        let mut tree = OrderedTree::from_keys(Variant::Avl, [2, 1, 3, 4, 5]);
        let root = tree.root().unwrap();
        tree.rotate_left(root);
        tree.rotate_left(tree.root().unwrap());
        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::Unbalanced { .. })
        ));
    }

    #[rstest]
    fn test_red_root_is_reported() {
        let mut tree = OrderedTree::from_keys(Variant::RedBlack, [2, 1, 3]);
        tree.rebuild_balanced(&mut Trace::headless());
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_right_red_is_reported_for_left_leaning() {
        let mut tree = OrderedTree::from_keys(Variant::LeftLeaningRedBlack, [1, 2]);
        let root = tree.root().unwrap();
        let left = tree.left_of(root).unwrap();
        tree.rotate_right(root);
        tree.arena[left].color = Color::Black;
        tree.arena[root].color = Color::Red;
        assert!(matches!(
            tree.validate(),
            Err(InvariantViolation::RightLeaningRed { key: 1 })
        ));
    }
}
