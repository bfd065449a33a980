//! Level 2: Edge Tests
//!
//! Edge creation, shortening at node borders, self-loops, re-pointing and
//! the incident-edge bookkeeping that keeps node moves incremental.

mod common;

use common::{chain_scene, row_scene};
use proptest::prelude::*;
use slint_network_view::geom::{point, rect};
use slint_network_view::style::{PenStyle, DARK_GRAY};
use slint_network_view::{EdgePath, GeometryConfig, NetworkScene, Node, SceneConfig};

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_edges_follow_style_pen_and_width() {
    let scene = chain_scene(2);
    let edge = scene.edge(0).unwrap();
    assert_eq!(edge.pen().color, DARK_GRAY);
    assert_eq!(edge.width(), 1.0);
    assert_eq!(edge.source(), Some(0));
    assert_eq!(edge.dest(), Some(1));
}

#[test]
fn test_mismatched_batch_creates_nothing() {
    let mut scene = row_scene(3);
    let created = scene.create_edges(&[0, 1], &[0, 1], &[1, 2], &[1.0]);
    assert!(created.is_empty());
    assert_eq!(scene.edge_count(), 0);
    assert!(scene.node(1).unwrap().edges().is_empty());
}

#[test]
fn test_edges_register_in_both_endpoints() {
    let scene = chain_scene(3);
    let middle: Vec<usize> = scene.node(1).unwrap().edges().iter().copied().collect();
    assert_eq!(middle, vec![0, 1]);
    assert_eq!(scene.node(0).unwrap().edges().len(), 1);
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_edge_stops_at_node_border() {
    let scene = chain_scene(2);
    let edge = scene.edge(0).unwrap();
    // radius 30 + border 1 + margin 1
    assert_close(edge.source_point().x, 32.0);
    assert_close(edge.dest_point().x, 68.0);
}

#[test]
fn test_margin_free_config_touches_border() {
    let config = SceneConfig {
        geometry: GeometryConfig {
            edge_margin: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut scene = NetworkScene::with_config(config);
    scene.create_nodes(&[0, 1], &[], &[point(0.0, 0.0), point(100.0, 0.0)], &[], &[10.0, 10.0]);
    scene.create_edges(&[0], &[0], &[1], &[1.0]);
    let edge = scene.edge(0).unwrap();
    assert_close(edge.source_point().x, 11.0);
    assert_close(edge.dest_point().x, 89.0);
}

#[test]
fn test_unstroked_border_does_not_push_edge_back() {
    let mut scene = chain_scene(2);
    for index in [0, 1] {
        scene.update_node(index, |node| {
            let pen = node.pen().with_style(PenStyle::None);
            node.set_pen(pen);
        });
    }
    let edge = scene.edge(0).unwrap();
    // radius 30 + margin 1, the border is not drawn
    assert_close(edge.source_point().x, 31.0);
    assert_close(edge.dest_point().x, 69.0);
}

#[test]
fn test_overlapping_nodes_give_degenerate_edge() {
    let mut scene = NetworkScene::new();
    scene.create_nodes(&[0, 1], &[], &[point(0.0, 0.0), point(50.0, 0.0)], &[], &[]);
    scene.create_edges(&[0], &[0], &[1], &[1.0]);
    let edge = scene.edge(0).unwrap();
    assert!(edge.is_degenerate());
    assert!(scene.render_plan(1.0, None).iter().all(|item| !matches!(
        item.item,
        slint_network_view::ItemRef::Edge(_)
    )));
}

#[test]
fn test_self_loop_is_a_unit_width_curve() {
    let mut scene = NetworkScene::new();
    scene.create_nodes(&[0], &[], &[], &[], &[20.0]);
    scene.create_edges(&[0], &[0], &[0], &[6.0]);
    let edge = scene.edge(0).unwrap();
    assert!(edge.is_self_loop());
    assert_eq!(edge.width(), 1.0);
    assert!(matches!(edge.path(), EdgePath::Cubic(_)));
    assert_eq!(edge.bounding_rect(), rect(-43.5, -43.5, 46.0, 46.0));
    assert_eq!(scene.node(0).unwrap().edges().len(), 1);
}

#[test]
fn test_moving_a_node_only_reroutes_its_edges() {
    let mut scene = chain_scene(4);
    let far_before = *scene.edge(2).unwrap().path();
    scene.move_node(1, point(100.0, 100.0));

    let e0 = scene.edge(0).unwrap();
    assert!(e0.dest_point().y > 0.0);
    let e1 = scene.edge(1).unwrap();
    assert!(e1.source_point().y > 0.0);
    assert_eq!(scene.edge(2).unwrap().path(), &far_before);
}

#[test]
fn test_unknown_endpoint_leaves_edge_without_geometry() {
    let mut scene = row_scene(1);
    scene.create_edges(&[0], &[0], &[77], &[1.0]);
    let edge = scene.edge(0).unwrap();
    assert_eq!(edge.dest(), None);
    assert!(edge.path().is_empty());
    assert_eq!(edge.bounding_rect(), rect(0.0, 0.0, 0.0, 0.0));
}

// ============================================================================
// Re-pointing and removal
// ============================================================================

#[test]
fn test_set_edge_dest_moves_registration() {
    let mut scene = chain_scene(3);
    scene.set_edge_dest(0, Some(2));
    assert!(!scene.node(1).unwrap().edges().contains(&0));
    assert!(scene.node(2).unwrap().edges().contains(&0));
    assert_close(scene.edge(0).unwrap().dest_point().x, 168.0);
}

#[test]
fn test_set_edge_source_to_none_clears_geometry() {
    let mut scene = chain_scene(2);
    scene.set_edge_source(0, None);
    assert!(scene.node(0).unwrap().edges().is_empty());
    assert!(scene.edge(0).unwrap().path().is_empty());
}

#[test]
fn test_repointing_into_self_loop_keeps_single_registration() {
    let mut scene = chain_scene(2);
    scene.set_edge_dest(0, Some(0));
    assert!(scene.edge(0).unwrap().is_self_loop());
    assert!(scene.node(1).unwrap().edges().is_empty());
    assert_eq!(scene.node(0).unwrap().edges().len(), 1);

    // Leaving the loop from the source side keeps node 0 registered as dest.
    scene.set_edge_source(0, Some(1));
    assert!(scene.node(0).unwrap().edges().contains(&0));
    assert!(scene.node(1).unwrap().edges().contains(&0));
}

#[test]
fn test_removing_node_keeps_dangling_edge() {
    let mut scene = chain_scene(2);
    scene.remove_nodes(&[1]);
    let edge = scene.edge(0).unwrap();
    assert_eq!(edge.dest(), Some(1));
    assert!(edge.path().is_empty());
    scene.remove_edges(&[0]);
    assert!(scene.node(0).unwrap().edges().is_empty());
}

#[test]
fn test_recreated_node_picks_up_dangling_edge() {
    let mut scene = chain_scene(2);
    scene.remove_nodes(&[1]);
    scene.create_nodes(&[1], &[], &[point(200.0, 0.0)], &[], &[]);

    assert!(scene.node(1).unwrap().edges().contains(&0));
    assert_close(scene.edge(0).unwrap().dest_point().x, 168.0);

    scene.move_node(1, point(500.0, 0.0));
    assert_close(scene.edge(0).unwrap().dest_point().x, 468.0);
}

#[test]
fn test_added_node_picks_up_dangling_edge() {
    let mut scene = chain_scene(2);
    scene.remove_nodes(&[0]);
    assert!(scene.add_node(Node::new(0)));

    assert_eq!(scene.node(0).unwrap().edges().iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_close(scene.edge(0).unwrap().source_point().x, 32.0);

    scene.move_node(0, point(-100.0, 0.0));
    assert_close(scene.edge(0).unwrap().source_point().x, -68.0);
}

#[test]
fn test_remove_all() {
    let mut scene = chain_scene(5);
    scene.remove_all_edges();
    assert_eq!(scene.edge_count(), 0);
    assert!(scene.nodes().iter().all(|n| n.edges().is_empty()));
    scene.remove_all_nodes();
    assert_eq!(scene.node_count(), 0);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_registration_matches_endpoints(ops in prop::collection::vec((0usize..6, any::<bool>(), prop::option::of(0usize..8)), 0..40)) {
        let mut scene = row_scene(6);
        let n = 6;
        let indices: Vec<usize> = (0..n).collect();
        let sources: Vec<usize> = (0..n).collect();
        let dests: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
        scene.create_edges(&indices, &sources, &dests, &vec![1.0; n]);

        for (edge, source_end, node) in ops {
            if source_end {
                scene.set_edge_source(edge, node);
            } else {
                scene.set_edge_dest(edge, node);
            }
        }

        for node in scene.nodes() {
            for edge in scene.edges() {
                let endpoint = edge.source() == Some(node.index()) || edge.dest() == Some(node.index());
                prop_assert_eq!(node.edges().contains(&edge.index()), endpoint);
            }
        }
    }

    #[test]
    fn prop_edge_ends_outside_both_nodes(x in 70.0f32..500.0, y in -300.0f32..300.0, r in 1.0f32..30.0) {
        let mut scene = NetworkScene::new();
        scene.create_nodes(&[0, 1], &[], &[point(0.0, 0.0), point(x, y)], &[], &[r, r]);
        scene.create_edges(&[0], &[0], &[1], &[1.0]);
        let edge = scene.edge(0).unwrap();
        let s = edge.source_point().to_vector().length();
        let d = (edge.dest_point() - point(x, y)).length();
        prop_assert!(s >= r);
        prop_assert!(d >= r);
    }
}
