//! Search, traversal and balanced rebuild.

use crate::Key;
use crate::error::StructureError;
use crate::node::{Node, NodeId};
use crate::step::{Focus, Operation, Trace};

use super::{OrderedTree, TraversalOrder};

impl OrderedTree {
    /// Walks from the root toward `key`, recording one probe per node.
    ///
    /// # Errors
    ///
    /// - [`StructureError::EmptyStructure`] if the tree is empty
    /// - [`StructureError::KeyNotFound`] once the walk falls off the tree
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treeviz::step::Trace;
    /// use treeviz::tree::{OrderedTree, Variant};
    ///
    /// let tree = OrderedTree::from_keys(Variant::Bst, [50, 30, 70]);
    /// let mut trace = Trace::headless();
    /// assert!(tree.search(70, &mut trace).is_ok());
    /// assert_eq!(trace.len(), 2);
    /// ```
    pub fn search(&self, key: Key, trace: &mut Trace) -> Result<NodeId, StructureError> {
        if self.root.is_none() {
            return Err(StructureError::empty("search"));
        }

        let mut current = self.root;
        while let Some(id) = current {
            trace.record(Operation::Probe, [Focus::Node(id)], || self.frame());
            let node = &self.arena[id];
            current = match key.cmp(&node.key) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => {
                    trace.settle(|| self.frame());
                    return Ok(id);
                }
            };
        }

        trace.settle(|| self.frame());
        Err(StructureError::KeyNotFound { key })
    }

    /// Visits every node in `order`, emitting each key as it is visited.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyStructure`] if the tree is empty.
    pub fn traverse(
        &self,
        order: TraversalOrder,
        trace: &mut Trace,
    ) -> Result<Vec<Key>, StructureError> {
        if self.root.is_none() {
            return Err(StructureError::empty("traverse"));
        }
        let mut keys = Vec::with_capacity(self.len());
        self.walk(self.root, order, &mut keys, trace);
        trace.settle(|| self.frame());
        Ok(keys)
    }

    fn walk(
        &self,
        node: Option<NodeId>,
        order: TraversalOrder,
        keys: &mut Vec<Key>,
        trace: &mut Trace,
    ) {
        // `true` marks a node whose children are already scheduled.
        let mut stack: Vec<(NodeId, bool)> = node.map(|id| (id, false)).into_iter().collect();
        while let Some((id, expanded)) = stack.pop() {
            let Node {
                key, left, right, ..
            } = self.arena[id];
            if expanded {
                self.emit(id, key, keys, trace);
                continue;
            }

            let this = Some((id, true));
            let left = left.map(|left| (left, false));
            let right = right.map(|right| (right, false));
            let scheduled = match order {
                TraversalOrder::PreOrder => [right, left, this],
                TraversalOrder::InOrder => [right, this, left],
                TraversalOrder::PostOrder => [this, right, left],
            };
            stack.extend(scheduled.into_iter().flatten());
        }
    }

    fn emit(&self, id: NodeId, key: Key, keys: &mut Vec<Key>, trace: &mut Trace) {
        keys.push(key);
        trace.visit(Operation::Visit, [Focus::Node(id)], key, || self.frame());
    }

    /// Replaces the tree with a perfectly balanced one over the same keys.
    ///
    /// The middle key of each sorted range becomes the subtree root. Colors
    /// and AVL heights are reset, so a rebuilt red-black tree need not
    /// satisfy the coloring rules. An empty tree is left as is.
    pub fn rebuild_balanced(&mut self, trace: &mut Trace) {
        let keys = self.keys();
        if keys.is_empty() {
            return;
        }

        self.arena.clear();
        self.root = self.build_range(&keys, None);
        trace.record(Operation::Load, self.root.map(Focus::Node), || self.frame());
        trace.settle(|| self.frame());
    }

    fn build_range(&mut self, keys: &[Key], parent: Option<NodeId>) -> Option<NodeId> {
        if keys.is_empty() {
            return None;
        }
        let middle = (keys.len() - 1) / 2;
        let id = self.arena.allocate(Node {
            parent,
            ..Node::new(keys[middle])
        });
        let left = self.build_range(&keys[..middle], Some(id));
        let right = self.build_range(&keys[middle + 1..], Some(id));
        let node = &mut self.arena[id];
        node.left = left;
        node.right = right;
        Some(id)
    }
}
