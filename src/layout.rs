//! Sugiyama hierarchical graph layout.
//!
//! Computes layered layouts with the `rust-sugiyama` crate and turns them into
//! the positions array [`NetworkScene::set_layout`] expects.
//!
//! `rust-sugiyama` works in `f64`; everything crossing this module's API is
//! `f32` like the rest of the crate.
//!
//! Requires the `layout` feature to be enabled.

use std::collections::{BTreeSet, HashMap};

use crate::geom::{point, Point};
use crate::scene::NetworkScene;

/// Layout direction for the Sugiyama algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Direction {
    /// Layers flow top to bottom (default).
    #[default]
    TopToBottom,
    /// Layers flow left to right.
    LeftToRight,
}

/// A positioned node returned by [`sugiyama_layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    pub index: usize,
    pub pos: Point,
}

#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct SugiyamaConfig {
    /// Minimum spacing between vertices; 0 keeps the `rust-sugiyama` default.
    pub vertex_spacing: f32,
    /// Minimum edge length between layers; 0 keeps the `rust-sugiyama` default.
    pub minimum_length: u32,
    pub dummy_vertices: bool,
    pub direction: Direction,
}

/// Compute Sugiyama layout positions.
///
/// `edges` are `(source, dest)` node index pairs and `node_sizes` are
/// `(index, (width, height))`. Edges naming unknown nodes are skipped and
/// duplicate node entries keep the first size.
pub fn sugiyama_layout(
    edges: &[(usize, usize)],
    node_sizes: &[(usize, (f32, f32))],
    config: &SugiyamaConfig,
) -> Vec<NodePosition> {
    if node_sizes.is_empty() {
        return Vec::new();
    }

    let horizontal = config.direction == Direction::LeftToRight;

    // rust-sugiyama wants dense u32 ids.
    let mut to_dense: HashMap<usize, u32> = HashMap::new();
    let mut from_dense: Vec<usize> = Vec::with_capacity(node_sizes.len());
    let mut vertices: Vec<(u32, (f64, f64))> = Vec::with_capacity(node_sizes.len());

    for &(index, (w, h)) in node_sizes {
        if let std::collections::hash_map::Entry::Vacant(e) = to_dense.entry(index) {
            let dense = from_dense.len() as u32;
            e.insert(dense);
            from_dense.push(index);
            let (w, h) = if horizontal { (h, w) } else { (w, h) };
            vertices.push((dense, (f64::from(w), f64::from(h))));
        }
    }

    let mapped_edges: Vec<(u32, u32)> = edges
        .iter()
        .filter_map(|(src, dst)| Some((*to_dense.get(src)?, *to_dense.get(dst)?)))
        .collect();

    let mut sg_config = rust_sugiyama::configure::Config {
        dummy_vertices: config.dummy_vertices,
        ..Default::default()
    };
    if config.vertex_spacing > 0.0 {
        sg_config.vertex_spacing = f64::from(config.vertex_spacing);
    }
    if config.minimum_length > 0 {
        sg_config.minimum_length = config.minimum_length;
    }

    let subgraphs = rust_sugiyama::from_vertices_and_edges(&vertices, &mapped_edges, &sg_config);

    let mut results = Vec::with_capacity(from_dense.len());
    for (layout, _width, _height) in &subgraphs {
        for &(dense, (x, y)) in layout {
            if let Some(&index) = from_dense.get(dense) {
                let (x, y) = if horizontal { (y, x) } else { (x, y) };
                results.push(NodePosition {
                    index,
                    pos: point(x as f32, y as f32),
                });
            }
        }
    }

    tracing::debug!(nodes = results.len(), edges = mapped_edges.len(), "sugiyama layout");
    results
}

/// Lay out the scene's nodes and return a positions array indexed by node
/// index, ready for [`NetworkScene::set_layout`] with scale 1.
///
/// Self-loops, dangling edges and parallel edges are dropped before layout.
pub fn scene_layout_positions(scene: &NetworkScene, config: &SugiyamaConfig) -> Vec<Point> {
    let node_sizes: Vec<(usize, (f32, f32))> = scene
        .nodes()
        .iter()
        .map(|node| {
            let size = node.shape().outline.rect().size;
            (node.index(), (size.width, size.height))
        })
        .collect();

    let edges: Vec<(usize, usize)> = scene
        .edges()
        .iter()
        .filter_map(|edge| Some((edge.source()?, edge.dest()?)))
        .filter(|(src, dst)| src != dst)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let len = node_sizes.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
    let mut positions = vec![point(0.0, 0.0); len];
    for NodePosition { index, pos } in sugiyama_layout(&edges, &node_sizes, config) {
        positions[index] = pos;
    }
    positions
}
