//! Integration tests for the binary heap engine.

use rstest::rstest;
use treeviz::error::StructureError;
use treeviz::heap::{Heap, HeapMode};
use treeviz::step::{Focus, Operation, Trace};

fn count(trace: &Trace, wanted: Operation) -> usize {
    trace.operations().filter(|operation| *operation == wanted).count()
}

// =============================================================================
// Build
// =============================================================================

#[rstest]
fn test_min_heap_build_from_array() {
    let mut heap = Heap::new(HeapMode::Min);
    let mut trace = Trace::new();
    heap.build([5, 3, 8, 1, 9, 2], &mut trace);

    assert_eq!(heap.keys(), vec![1, 3, 2, 5, 9, 8]);
    assert_eq!(heap.peek(), Some(1));
    assert_eq!(count(&trace, Operation::Load), 1);
    assert_eq!(count(&trace, Operation::Heapify), 3);
    assert_eq!(count(&trace, Operation::Swap), 4);
    assert_eq!(heap.validate(), Ok(()));
}

#[rstest]
fn test_max_heap_build_from_array() {
    let mut heap = Heap::new(HeapMode::Max);
    heap.build([5, 3, 8, 1, 9, 2], &mut Trace::headless());
    assert_eq!(heap.peek(), Some(9));
    assert_eq!(heap.validate(), Ok(()));
}

#[rstest]
fn test_build_replaces_previous_contents() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.insert(100, &mut Trace::headless());
    heap.build([3, 2], &mut Trace::headless());
    assert_eq!(heap.keys(), vec![2, 3]);
}

#[rstest]
fn test_build_from_nothing_is_empty() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.build(Vec::new(), &mut Trace::headless());
    assert!(heap.is_empty());
    assert_eq!(heap.peek(), None);
}

// =============================================================================
// Insert and Extract
// =============================================================================

#[rstest]
fn test_max_heap_insert_sifts_up() {
    let mut heap = Heap::new(HeapMode::Max);
    let mut trace = Trace::new();
    for key in [3, 9, 4] {
        heap.insert(key, &mut trace);
    }
    assert_eq!(heap.keys(), vec![9, 3, 4]);
    assert_eq!(count(&trace, Operation::Place), 3);
    assert_eq!(count(&trace, Operation::Swap), 1);
}

#[rstest]
fn test_insert_allows_duplicates() {
    let mut heap = Heap::new(HeapMode::Min);
    let mut trace = Trace::headless();
    let first = heap.insert(4, &mut trace);
    let second = heap.insert(4, &mut trace);
    assert_ne!(first, second);
    assert_eq!(heap.len(), 2);
}

#[rstest]
#[case(HeapMode::Min, vec![1, 2, 3, 5, 8, 9])]
#[case(HeapMode::Max, vec![9, 8, 5, 3, 2, 1])]
fn test_repeated_extract_is_sorted(#[case] mode: HeapMode, #[case] expected: Vec<i64>) {
    let mut heap = Heap::new(mode);
    let mut trace = Trace::headless();
    heap.build([5, 3, 8, 1, 9, 2], &mut trace);

    let mut extracted = Vec::new();
    while let Ok(key) = heap.extract_root(&mut trace) {
        extracted.push(key);
        assert_eq!(heap.validate(), Ok(()));
    }
    assert_eq!(extracted, expected);
}

#[rstest]
fn test_extract_records_remove_then_replace() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.build([1, 2, 3], &mut Trace::headless());
    let mut trace = Trace::new();
    heap.extract_root(&mut trace).unwrap();

    let steps = trace.steps();
    assert_eq!(steps[0].operation, Operation::Remove);
    assert_eq!(steps[0].primary_focus(), Some(Focus::Slot(0)));
    assert_eq!(steps[1].operation, Operation::Replace);
}

#[rstest]
fn test_extract_last_element_skips_replace() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.insert(7, &mut Trace::headless());
    let mut trace = Trace::new();
    assert_eq!(heap.extract_root(&mut trace), Ok(7));
    assert!(heap.is_empty());
    assert_eq!(trace.operations().collect::<Vec<_>>(), vec![Operation::Remove]);
}

#[rstest]
fn test_extract_from_empty_heap_fails() {
    let mut heap = Heap::new(HeapMode::Max);
    let mut trace = Trace::new();
    assert_eq!(
        heap.extract_root(&mut trace),
        Err(StructureError::empty("extract"))
    );
    assert!(trace.is_empty());
}

// =============================================================================
// Tree view
// =============================================================================

#[rstest]
fn test_links_follow_index_arithmetic() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.build([1, 2, 3, 4, 5], &mut Trace::headless());
    let links = heap.links();
    assert_eq!(links[0].left, Some(1));
    assert_eq!(links[0].right, Some(2));
    assert_eq!(links[0].parent, None);
    assert_eq!(links[1].left, Some(3));
    assert_eq!(links[1].right, Some(4));
    assert_eq!(links[4].parent, Some(1));
    assert_eq!(links[2].left, None);
}

#[rstest]
fn test_frame_draws_heap_as_tree() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.build([4, 1, 3], &mut Trace::headless());
    let frame = heap.frame();
    let tree = frame.as_tree().unwrap();
    assert_eq!(tree.root_key(), Some(1));
    assert_eq!(tree.nodes.len(), 3);
}

#[rstest]
fn test_statistics() {
    let mut heap = Heap::new(HeapMode::Min);
    heap.build(1..=6, &mut Trace::headless());
    let statistics = heap.statistics();
    assert_eq!(statistics.height, 3);
    assert_eq!(statistics.total, 6);
    assert_eq!(statistics.leaves, 3);
}
