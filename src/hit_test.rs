//! Point and rubber-band hit testing in scene coordinates.

use crate::edge::Edge;
use crate::geom::{Point, Rect};
use crate::node::Node;

/// Find the topmost node whose shape contains `point`.
///
/// Nodes later in render order are on top, and selected nodes sit above all
/// unselected ones. Hidden and non-selectable nodes are skipped.
pub fn find_node_at<'a, I>(point: Point, nodes: I, is_selected: impl Fn(usize) -> bool) -> Option<usize>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut best: Option<(bool, usize)> = None;

    for node in nodes {
        if !node.is_visible() || !node.flags().selectable {
            continue;
        }
        if !node.contains_scene_point(point) {
            continue;
        }
        let key = (is_selected(node.index()), node.index());
        if best.map_or(true, |b| key > b) {
            best = Some(key);
        }
    }

    best.map(|(_, index)| index)
}

/// Find the edge closest to `point` within `hover_distance`.
///
/// On an exact tie the edge seen first wins.
pub fn find_edge_at<'a, I>(point: Point, edges: I, hover_distance: f32, hit_samples: usize) -> Option<usize>
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut closest = None;
    let mut closest_distance = hover_distance;

    for edge in edges {
        if !edge.is_visible() || edge.is_degenerate() {
            continue;
        }
        let distance = edge.distance_to(point, hit_samples);
        if distance < closest_distance {
            closest_distance = distance;
            closest = Some(edge.index());
        }
    }

    closest
}

/// Selectable nodes whose bounds intersect `area`.
pub fn nodes_in_rect<'a, I>(area: &Rect, nodes: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Node>,
{
    nodes
        .into_iter()
        .filter(|node| node.is_visible() && node.flags().selectable)
        .filter(|node| node.scene_bounding_rect().intersects(area))
        .map(Node::index)
        .collect()
}

/// Edges whose bounds intersect `area`.
pub fn edges_in_rect<'a, I>(area: &Rect, edges: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a Edge>,
{
    edges
        .into_iter()
        .filter(|edge| edge.is_visible() && !edge.path().is_empty())
        .filter(|edge| edge.bounding_rect().intersects(area))
        .map(Edge::index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeometryConfig;
    use crate::edge::EdgeAnchor;
    use crate::geom::{point, rect};

    fn node_at(index: usize, x: f32, y: f32) -> Node {
        let mut node = Node::new(index).with_pos(point(x, y));
        node.set_label("");
        node.set_radius(10.0);
        node
    }

    fn edge_between(index: usize, a: (f32, f32), b: (f32, f32)) -> Edge {
        let anchor = |node, (x, y): (f32, f32)| EdgeAnchor {
            node,
            pos: point(x, y),
            radius: 1.0,
            border_width: 0.0,
        };
        let cfg = GeometryConfig {
            edge_margin: 0.0,
            ..Default::default()
        };
        let mut edge = Edge::new(index, Some(2 * index), Some(2 * index + 1), 1.0);
        edge.adjust(Some(anchor(2 * index, a)), Some(anchor(2 * index + 1, b)), &cfg);
        edge
    }

    // ========================================================================
    // find_node_at()
    // ========================================================================

    #[test]
    fn test_find_node_at_hit_and_miss() {
        let nodes = vec![node_at(0, 0.0, 0.0), node_at(1, 100.0, 0.0)];
        assert_eq!(find_node_at(point(3.0, 3.0), &nodes, |_| false), Some(0));
        assert_eq!(find_node_at(point(95.0, 0.0), &nodes, |_| false), Some(1));
        assert_eq!(find_node_at(point(50.0, 0.0), &nodes, |_| false), None);
    }

    #[test]
    fn test_find_node_at_empty_list() {
        let nodes: Vec<Node> = vec![];
        assert_eq!(find_node_at(point(0.0, 0.0), &nodes, |_| false), None);
    }

    #[test]
    fn test_find_node_at_later_node_is_on_top() {
        let nodes = vec![node_at(0, 0.0, 0.0), node_at(1, 5.0, 0.0)];
        assert_eq!(find_node_at(point(2.0, 0.0), &nodes, |_| false), Some(1));
    }

    #[test]
    fn test_find_node_at_selected_is_on_top() {
        let nodes = vec![node_at(0, 0.0, 0.0), node_at(1, 5.0, 0.0)];
        assert_eq!(find_node_at(point(2.0, 0.0), &nodes, |i| i == 0), Some(0));
    }

    #[test]
    fn test_find_node_at_skips_hidden_and_unselectable() {
        let mut hidden = node_at(0, 0.0, 0.0);
        hidden.set_visible(false);
        let mut inert = node_at(1, 0.0, 0.0);
        inert.set_flags(crate::node::NodeFlags::ISOLATED);
        let nodes = vec![hidden, inert];
        assert_eq!(find_node_at(point(0.0, 0.0), &nodes, |_| false), None);
    }

    // ========================================================================
    // find_edge_at()
    // ========================================================================

    #[test]
    fn test_find_edge_at_single_edge() {
        let edges = vec![edge_between(0, (0.0, 50.0), (100.0, 50.0))];
        assert_eq!(find_edge_at(point(50.0, 50.0), &edges, 10.0, 20), Some(0));
        assert_eq!(find_edge_at(point(50.0, 200.0), &edges, 10.0, 20), None);
    }

    #[test]
    fn test_find_edge_at_empty_list() {
        let edges: Vec<Edge> = vec![];
        assert_eq!(find_edge_at(point(50.0, 50.0), &edges, 10.0, 20), None);
    }

    #[test]
    fn test_find_edge_at_closest_wins() {
        let edges = vec![
            edge_between(0, (0.0, 50.0), (100.0, 50.0)),
            edge_between(1, (0.0, 55.0), (100.0, 55.0)),
        ];
        assert_eq!(find_edge_at(point(50.0, 53.0), &edges, 10.0, 20), Some(1));
    }

    #[test]
    fn test_find_edge_at_first_wins_on_tie() {
        let edges = vec![
            edge_between(0, (0.0, 50.0), (100.0, 50.0)),
            edge_between(1, (0.0, 50.0), (100.0, 50.0)),
        ];
        assert_eq!(find_edge_at(point(50.0, 50.0), &edges, 10.0, 20), Some(0));
    }

    #[test]
    fn test_find_edge_at_hover_distance_threshold() {
        let edges = vec![edge_between(0, (0.0, 50.0), (100.0, 50.0))];
        assert_eq!(find_edge_at(point(50.0, 59.0), &edges, 10.0, 20), Some(0));
        assert_eq!(find_edge_at(point(50.0, 70.0), &edges, 10.0, 20), None);
    }

    #[test]
    fn test_find_edge_at_ignores_degenerate_edges() {
        let edges = vec![edge_between(0, (50.0, 50.0), (50.5, 50.0))];
        assert_eq!(find_edge_at(point(50.0, 50.0), &edges, 10.0, 20), None);
    }

    // ========================================================================
    // nodes_in_rect() / edges_in_rect()
    // ========================================================================

    #[test]
    fn test_nodes_in_rect() {
        let nodes = vec![node_at(0, 0.0, 0.0), node_at(1, 200.0, 0.0), node_at(2, 60.0, 100.0)];
        let selected = nodes_in_rect(&rect(0.0, 0.0, 150.0, 200.0), &nodes);
        assert_eq!(selected, vec![0, 2]);
    }

    #[test]
    fn test_nodes_in_rect_touching_edge_is_no_overlap() {
        let nodes = vec![node_at(0, 110.5, 50.0)];
        assert!(nodes_in_rect(&rect(0.0, 0.0, 100.0, 100.0), &nodes).is_empty());
    }

    #[test]
    fn test_edges_in_rect() {
        let edges = vec![
            edge_between(0, (10.0, 10.0), (200.0, 10.0)),
            edge_between(1, (200.0, 10.0), (300.0, 10.0)),
        ];
        assert_eq!(edges_in_rect(&rect(0.0, 0.0, 100.0, 100.0), &edges), vec![0]);
    }
}
