#![cfg(feature = "serde")]
//! Serialization tests for renderer-facing types.

use rstest::rstest;
use treeviz::config::VisualizerConfig;
use treeviz::frame::Frame;
use treeviz::graph::Graph;
use treeviz::step::{Step, Trace};
use treeviz::tree::{OrderedTree, Variant};

#[rstest]
fn test_tree_steps_survive_json() {
    let mut tree = OrderedTree::new(Variant::RedBlack);
    let mut trace = Trace::new();
    for key in [10, 20, 30] {
        tree.insert(key, &mut trace).unwrap();
    }

    let json = serde_json::to_string(trace.steps()).unwrap();
    let restored: Vec<Step> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, trace.steps());
}

#[rstest]
fn test_graph_frame_survives_json() {
    let mut graph = Graph::new();
    let first = graph.add_vertex(1, kurbo::Point::new(10.0, 20.0));
    let second = graph.add_vertex(2, kurbo::Point::new(30.0, 40.0));
    graph.add_edge(first, second);

    let frame = graph.frame();
    let json = serde_json::to_value(&frame).unwrap();
    let restored: Frame = serde_json::from_value(json).unwrap();
    assert_eq!(restored, frame);
}

#[rstest]
fn test_config_survives_json() {
    let config = VisualizerConfig::default().with_seed(3).with_speed(2.0);
    let json = serde_json::to_string(&config).unwrap();
    let restored: VisualizerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}
