//! # Slint Network View
//!
//! Scene and geometry engine for interactive network graphs rendered with
//! Slint: round or polygonal nodes with labels, pie charts and molecule
//! pixmaps, straight or self-looping edges, style sheets and a minimap-aware
//! viewport.
//!
//! ## Features
//!
//! - **Index-keyed scene** - Nodes and edges are addressed by stable indices and
//!   always enumerated in index order
//! - **Incremental geometry** - Moving a node only re-routes its own edges
//! - **Display-independent painting** - Items describe themselves as
//!   [`DrawCommand`] lists with level-of-detail degradation
//! - **Style sheets** - Load node, edge and scene styling from JSON
//! - **Optional layout** - Sugiyama layering behind the `layout` feature
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_network_view::{NetworkScene, geom::point};
//!
//! let mut scene = NetworkScene::new();
//! scene.create_nodes(&[0, 1], &[], &[point(0.0, 0.0), point(200.0, 0.0)], &[], &[]);
//! scene.create_edges(&[0], &[0], &[1], &[2.0]);
//! scene.set_nodes_selection(slint_network_view::Selector::Index(&[1]));
//!
//! for item in scene.render_plan(1.0, None) {
//!     // replay item.commands at item.origin
//! }
//! ```
//!
//! ## Modules
//!
//! - [`scene`] - [`NetworkScene`], the owner of all items
//! - [`node`] / [`edge`] - Per-item geometry and paint state
//! - [`style`] - [`NetworkStyle`] and the importable [`StyleSheet`]
//! - [`render`] - [`DrawCommand`] plans
//! - [`viewport`] - Zoom, pan and minimap
//! - [`controller`] - [`NetworkView`], the Slint-facing handle
//! - [`hit_test`] - Point and rubber-band picking

pub mod config;
pub mod controller;
pub mod edge;
pub mod error;
pub mod geom;
pub mod hit_test;
#[cfg(feature = "layout")]
pub mod layout;
pub mod molecule;
pub mod node;
pub mod path;
pub mod polygon;
pub mod render;
pub mod scene;
pub mod selection;
pub mod style;
pub mod table;
pub mod text;
pub mod viewport;

pub use config::{GeometryConfig, RenderConfig, SceneConfig, ViewConfig, RADIUS};
pub use controller::NetworkView;
pub use edge::{Edge, EdgeAnchor};
pub use error::{ConfigError, DescriptorError, StyleError};
pub use hit_test::{edges_in_rect, find_edge_at, find_node_at, nodes_in_rect};
pub use molecule::{MoleculeDescriptor, MoleculeRenderer, NullRenderer, PixmapFormat};
pub use node::{auto_text_color, CacheMode, Node, NodeFlags, NodeShape, Outline};
pub use path::{CubicBezier, EdgePath};
pub use polygon::NodePolygon;
pub use render::{edge_render_plan, level_of_detail, node_render_plan, ClipShape, DrawCommand, RenderContext};
pub use scene::{ItemRef, NetworkScene, RenderItem, SceneEvent, Selector};
pub use selection::ItemSelection;
pub use style::{default_style, NetworkStyle, Pen, PenStyle, StyleSheet};
pub use table::TableSource;
pub use text::{AverageCharMetrics, Font, TextMetrics};
pub use viewport::{Minimap, Viewport, ViewportController};
