//! Property-based tests for the binary heap engine.

use proptest::prelude::*;
use treeviz::heap::{Heap, HeapMode};
use treeviz::step::Trace;

fn arbitrary_mode() -> impl Strategy<Value = HeapMode> {
    prop_oneof![Just(HeapMode::Min), Just(HeapMode::Max)]
}

fn sorted_for(mode: HeapMode, mut keys: Vec<i64>) -> Vec<i64> {
    keys.sort_unstable();
    if mode == HeapMode::Max {
        keys.reverse();
    }
    keys
}

proptest! {
    /// Law: build produces a valid heap over the same multiset.
    #[test]
    fn prop_build_is_valid(mode in arbitrary_mode(), keys in prop::collection::vec(-100i64..100, 0..64)) {
        let mut heap = Heap::new(mode);
        heap.build(keys.clone(), &mut Trace::headless());
        prop_assert_eq!(heap.validate(), Ok(()));
        let mut stored = heap.keys();
        stored.sort_unstable();
        prop_assert_eq!(stored, sorted_for(HeapMode::Min, keys));
    }

    /// Law: inserting one at a time keeps the heap valid.
    #[test]
    fn prop_insert_is_valid(mode in arbitrary_mode(), keys in prop::collection::vec(-100i64..100, 0..64)) {
        let mut heap = Heap::new(mode);
        let mut trace = Trace::headless();
        for key in keys {
            heap.insert(key, &mut trace);
            prop_assert_eq!(heap.validate(), Ok(()));
        }
    }

    /// Law: draining by extract yields the keys in heap order.
    #[test]
    fn prop_extract_drains_sorted(mode in arbitrary_mode(), keys in prop::collection::vec(-100i64..100, 0..64)) {
        let mut heap = Heap::new(mode);
        let mut trace = Trace::headless();
        heap.build(keys.clone(), &mut trace);
        let mut drained = Vec::with_capacity(keys.len());
        while let Ok(key) = heap.extract_root(&mut trace) {
            drained.push(key);
        }
        prop_assert_eq!(drained, sorted_for(mode, keys));
    }

    /// Law: the tree view always mirrors index arithmetic.
    #[test]
    fn prop_links_mirror_indices(len in 0usize..40) {
        let mut heap = Heap::new(HeapMode::Min);
        #[allow(clippy::cast_possible_wrap)]
        heap.build((0..len).map(|index| index as i64), &mut Trace::headless());
        for (index, links) in heap.links().iter().enumerate() {
            prop_assert_eq!(links.left, (2 * index + 1 < len).then_some(2 * index + 1));
            prop_assert_eq!(links.right, (2 * index + 2 < len).then_some(2 * index + 2));
            prop_assert_eq!(links.parent, index.checked_sub(1).map(|before| before / 2));
        }
    }
}
