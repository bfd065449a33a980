//! The network scene: owner of all nodes and edges.
//!
//! Items are keyed by their stable index and always enumerated in index
//! order, which is also the paint order inside a layer. Edges paint below
//! nodes. Nodes reference their edges by index only; the scene keeps both
//! sides of that relation consistent.
//!
//! Interactive operations never fail. Malformed input is clamped or
//! skipped, and batch setters whose preconditions fail leave the scene
//! untouched without notifying listeners.

use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use slint::{Color, SharedString};

use crate::config::SceneConfig;
use crate::edge::{Edge, EdgeAnchor};
use crate::geom::{point, union_rects, Point, Rect};
use crate::hit_test::{edges_in_rect, nodes_in_rect};
use crate::molecule::{MoleculeRenderer, PixmapFormat};
use crate::node::{Node, NodeFlags};
use crate::polygon::NodePolygon;
use crate::render::{edge_render_plan, node_render_plan, DrawCommand, RenderContext};
use crate::selection::ItemSelection;
use crate::style::{default_style, NetworkStyle};
use crate::table::TableSource;
use crate::text::{AverageCharMetrics, TextMetrics};

/// Change notifications emitted by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    /// Carries the effective factor.
    ScaleChanged(f32),
    LayoutChanged,
    ItemsVisibilityChanged,
    PieChartsVisibilityChanged(bool),
    PixmapVisibilityChanged(bool),
    Locked(bool),
    StyleChanged,
}

/// A scene item, identified by kind and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Node(usize),
    Edge(usize),
}

/// Which items a selection call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Stable item indices.
    Index(&'a [usize]),
    /// Ranks in the sorted enumeration, i.e. positions in `nodes()` or
    /// `edges()`. Out-of-range ranks are ignored.
    Position(&'a [usize]),
}

impl Selector<'_> {
    fn is_empty(&self) -> bool {
        match self {
            Selector::Index(ids) | Selector::Position(ids) => ids.is_empty(),
        }
    }
}

/// Draw commands for one item, in that item's coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub item: ItemRef,
    /// Scene position of the item origin.
    pub origin: Point,
    pub selected: bool,
    pub commands: Vec<DrawCommand>,
}

type Listener = Box<dyn FnMut(&SceneEvent)>;

pub struct NetworkScene {
    nodes: BTreeMap<usize, Node>,
    edges: BTreeMap<usize, Edge>,
    scale: f32,
    locked: bool,
    pie_colors: Vec<Color>,
    style: NetworkStyle,
    pie_charts_visible: bool,
    pixmaps_visible: bool,
    node_selection: ItemSelection,
    edge_selection: ItemSelection,
    config: SceneConfig,
    metrics: Rc<dyn TextMetrics>,
    listeners: Vec<Listener>,
}

impl Default for NetworkScene {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NetworkScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkScene")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("scale", &self.scale)
            .field("locked", &self.locked)
            .field("style", &self.style.name())
            .finish_non_exhaustive()
    }
}

impl NetworkScene {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            scale: 1.0,
            locked: false,
            pie_colors: Vec::new(),
            style: default_style(),
            pie_charts_visible: true,
            pixmaps_visible: true,
            node_selection: ItemSelection::new(),
            edge_selection: ItemSelection::new(),
            config,
            metrics: Rc::new(AverageCharMetrics),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Register a listener called for every emitted event.
    pub fn on_event(&mut self, listener: impl FnMut(&SceneEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: SceneEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Add a fully built node. An index already in use is rejected.
    pub fn add_node(&mut self, mut node: Node) -> bool {
        let index = node.index();
        if self.nodes.contains_key(&index) {
            tracing::warn!(index, "node index already in use");
            return false;
        }
        node.set_text_metrics(self.metrics.clone());
        self.apply_lock_flag(&mut node);
        self.nodes.insert(index, node);
        self.attach_dangling_edges(&[index]);
        true
    }

    /// Create nodes for `indices`.
    ///
    /// The optional lists are matched positionally and may be shorter than
    /// `indices`; missing entries keep the defaults. Duplicate indices are
    /// skipped. Returns the created indices in ascending order.
    pub fn create_nodes(
        &mut self,
        indices: &[usize],
        labels: &[SharedString],
        positions: &[Point],
        colors: &[Option<Color>],
        radii: &[f32],
    ) -> Vec<usize> {
        if indices.is_empty() {
            return Vec::new();
        }

        let mut created = Vec::with_capacity(indices.len());
        for (i, &index) in indices.iter().enumerate() {
            if self.nodes.contains_key(&index) {
                tracing::warn!(index, "skipping duplicate node index");
                continue;
            }
            let mut node = Node::with_metrics(index, labels.get(i).cloned(), self.metrics.clone());
            node.update_style(&self.style, None);
            if let Some(&pos) = positions.get(i) {
                node.set_pos(pos);
            }
            if let Some(&Some(color)) = colors.get(i) {
                node.set_brush(color, true);
            }
            if let Some(&radius) = radii.get(i) {
                node.set_radius(radius);
            }
            self.apply_lock_flag(&mut node);
            self.nodes.insert(index, node);
            created.push(index);
        }
        created.sort_unstable();
        self.attach_dangling_edges(&created);
        tracing::debug!(count = created.len(), "created nodes");
        created
    }

    /// Create edges between existing nodes.
    ///
    /// All four lists must have the same length, otherwise nothing happens.
    /// Endpoints naming unknown nodes are left unset.
    pub fn create_edges(
        &mut self,
        indices: &[usize],
        sources: &[usize],
        dests: &[usize],
        widths: &[f32],
    ) -> Vec<usize> {
        if indices.is_empty() {
            return Vec::new();
        }
        if sources.len() != indices.len()
            || dests.len() != indices.len()
            || widths.len() != indices.len()
        {
            tracing::warn!(
                indices = indices.len(),
                sources = sources.len(),
                dests = dests.len(),
                widths = widths.len(),
                "edge batch lengths differ, nothing created"
            );
            return Vec::new();
        }

        let mut created = Vec::with_capacity(indices.len());
        for (i, &index) in indices.iter().enumerate() {
            if self.edges.contains_key(&index) {
                tracing::warn!(index, "skipping duplicate edge index");
                continue;
            }
            let source = self.known_node(sources[i]);
            let dest = self.known_node(dests[i]);
            let mut edge = Edge::new(index, source, dest, widths[i]);
            edge.set_pen(*self.style.edge_pen(false));
            self.edges.insert(index, edge);
            self.register_endpoint(index, source);
            self.register_endpoint(index, dest);
            self.adjust_edges(&[index]);
            created.push(index);
        }
        created.sort_unstable();
        tracing::debug!(count = created.len(), "created edges");
        created
    }

    fn known_node(&self, index: usize) -> Option<usize> {
        if self.nodes.contains_key(&index) {
            Some(index)
        } else {
            tracing::warn!(index, "edge endpoint names an unknown node");
            None
        }
    }

    /// Remove nodes. Incident edges stay and lose their geometry until a node
    /// with the same index is created again or the edges are removed.
    pub fn remove_nodes(&mut self, indices: &[usize]) {
        let mut orphaned = Vec::new();
        for index in indices {
            if let Some(node) = self.nodes.remove(index) {
                orphaned.extend(node.edges().iter().copied());
                self.node_selection.remove(*index);
            }
        }
        self.adjust_edges(&orphaned);
    }

    pub fn remove_all_nodes(&mut self) {
        let indices: Vec<usize> = self.nodes.keys().copied().collect();
        self.remove_nodes(&indices);
    }

    pub fn remove_edges(&mut self, indices: &[usize]) {
        for index in indices {
            if let Some(edge) = self.edges.remove(index) {
                for end in [edge.source(), edge.dest()].into_iter().flatten() {
                    if let Some(node) = self.nodes.get_mut(&end) {
                        node.remove_edge(*index);
                    }
                }
                self.edge_selection.remove(*index);
            }
        }
    }

    pub fn remove_all_edges(&mut self) {
        let indices: Vec<usize> = self.edges.keys().copied().collect();
        self.remove_edges(&indices);
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.nodes.clear();
        self.node_selection.clear();
        self.edge_selection.clear();
    }

    /// Nodes sorted by index.
    pub fn nodes(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    /// Edges sorted by index.
    pub fn edges(&self) -> Vec<&Edge> {
        self.edges.values().collect()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(&index)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(&index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Apply `f` to a node, then refresh the geometry of its edges.
    pub fn update_node<R>(&mut self, index: usize, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        let node = self.nodes.get_mut(&index)?;
        let result = f(node);
        let edges: Vec<usize> = node.edges().iter().copied().collect();
        self.adjust_edges(&edges);
        Some(result)
    }

    /// Move a node; only its own edges are re-adjusted.
    pub fn move_node(&mut self, index: usize, pos: Point) {
        self.update_node(index, |node| node.set_pos(pos));
    }

    pub fn set_edge_source(&mut self, edge: usize, node: Option<usize>) {
        self.repoint_edge(edge, node, true);
    }

    pub fn set_edge_dest(&mut self, edge: usize, node: Option<usize>) {
        self.repoint_edge(edge, node, false);
    }

    fn repoint_edge(&mut self, index: usize, node: Option<usize>, source_end: bool) {
        let node = node.and_then(|n| self.known_node(n));
        let Some(edge) = self.edges.get_mut(&index) else {
            return;
        };
        let (old, other) = if source_end {
            (edge.source(), edge.dest())
        } else {
            (edge.dest(), edge.source())
        };
        if source_end {
            edge.set_source(node);
        } else {
            edge.set_dest(node);
        }
        // The old node stays registered if it is still the other endpoint.
        if old != other {
            if let Some(old_node) = old.and_then(|o| self.nodes.get_mut(&o)) {
                old_node.remove_edge(index);
            }
        }
        self.register_endpoint(index, node);
        self.adjust_edges(&[index]);
    }

    /// Hook edges that still name one of `created` (sorted) as an endpoint
    /// back onto the new node, as left behind by `remove_nodes`.
    fn attach_dangling_edges(&mut self, created: &[usize]) {
        if self.edges.is_empty() || created.is_empty() {
            return;
        }
        let is_new = |end: Option<usize>| end.is_some_and(|n| created.binary_search(&n).is_ok());
        let attached: Vec<(usize, Option<usize>, Option<usize>)> = self
            .edges
            .values()
            .filter(|e| is_new(e.source()) || is_new(e.dest()))
            .map(|e| (e.index(), e.source(), e.dest()))
            .collect();
        if attached.is_empty() {
            return;
        }
        let mut indices = Vec::with_capacity(attached.len());
        for (edge, source, dest) in attached {
            self.register_endpoint(edge, source);
            self.register_endpoint(edge, dest);
            indices.push(edge);
        }
        tracing::debug!(count = indices.len(), "re-attached dangling edges");
        self.adjust_edges(&indices);
    }

    fn register_endpoint(&mut self, edge: usize, node: Option<usize>) {
        if let Some(node) = node.and_then(|n| self.nodes.get_mut(&n)) {
            node.add_edge(edge);
        }
    }

    // ========================================================================
    // Edge geometry
    // ========================================================================

    fn anchor_of(nodes: &BTreeMap<usize, Node>, index: Option<usize>) -> Option<EdgeAnchor> {
        index.and_then(|i| nodes.get(&i)).map(Node::anchor)
    }

    fn adjust_edges(&mut self, indices: &[usize]) {
        let Self {
            nodes,
            edges,
            config,
            ..
        } = self;
        for index in indices {
            if let Some(edge) = edges.get_mut(index) {
                let source = Self::anchor_of(nodes, edge.source());
                let dest = Self::anchor_of(nodes, edge.dest());
                edge.adjust(source, dest, &config.geometry);
            }
        }
    }

    /// One pass over all edges.
    fn adjust_all_edges(&mut self) {
        let Self {
            nodes,
            edges,
            config,
            ..
        } = self;
        for edge in edges.values_mut() {
            let source = Self::anchor_of(nodes, edge.source());
            let dest = Self::anchor_of(nodes, edge.dest());
            edge.adjust(source, dest, &config.geometry);
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Select nodes, replacing the whole selection. An empty selector only
    /// clears.
    pub fn set_nodes_selection(&mut self, selector: Selector<'_>) {
        self.clear_selection();
        if selector.is_empty() {
            return;
        }
        let ids = Self::resolve(&self.nodes, selector);
        let selectable: Vec<usize> = ids
            .into_iter()
            .filter(|i| self.nodes.get(i).is_some_and(|n| n.flags().selectable))
            .collect();
        self.node_selection.set(selectable);
    }

    pub fn set_edges_selection(&mut self, selector: Selector<'_>) {
        self.clear_selection();
        if selector.is_empty() {
            return;
        }
        let ids = Self::resolve(&self.edges, selector);
        self.edge_selection.set(ids);
    }

    fn resolve<T>(items: &BTreeMap<usize, T>, selector: Selector<'_>) -> Vec<usize> {
        match selector {
            Selector::Index(ids) => ids
                .iter()
                .copied()
                .filter(|i| items.contains_key(i))
                .collect(),
            Selector::Position(ranks) => {
                let keys: Vec<usize> = items.keys().copied().collect();
                ranks.iter().filter_map(|&r| keys.get(r).copied()).collect()
            }
        }
    }

    pub fn selected_nodes(&self) -> Vec<usize> {
        self.node_selection.to_vec()
    }

    pub fn selected_edges(&self) -> Vec<usize> {
        self.edge_selection.to_vec()
    }

    pub fn is_selected(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Node(i) => self.node_selection.contains(i),
            ItemRef::Edge(i) => self.edge_selection.contains(i),
        }
    }

    pub fn clear_selection(&mut self) {
        self.node_selection.clear();
        self.edge_selection.clear();
    }

    pub fn node_selection(&self) -> &ItemSelection {
        &self.node_selection
    }

    pub fn edge_selection(&self) -> &ItemSelection {
        &self.edge_selection
    }

    /// Click on an item, or on empty space when `item` is `None`.
    ///
    /// A plain click selects only the item; shift toggles it.
    pub fn handle_click(&mut self, item: Option<ItemRef>, shift: bool) {
        match item {
            None if !shift => self.clear_selection(),
            None => {}
            Some(ItemRef::Node(i)) => {
                if !self.nodes.get(&i).is_some_and(|n| n.flags().selectable) {
                    return;
                }
                if !shift {
                    self.edge_selection.clear();
                }
                self.node_selection.click(i, shift);
            }
            Some(ItemRef::Edge(i)) => {
                if !self.edges.contains_key(&i) {
                    return;
                }
                if !shift {
                    self.node_selection.clear();
                }
                self.edge_selection.click(i, shift);
            }
        }
    }

    /// Rubber-band selection of every item whose bounds intersect `area`.
    pub fn select_in_rect(&mut self, area: &Rect, extend: bool) {
        let nodes = nodes_in_rect(area, self.nodes.values());
        let edges = edges_in_rect(area, self.edges.values());
        if !extend {
            self.clear_selection();
        }
        self.node_selection.extend(nodes);
        self.edge_selection.extend(edges);
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    pub fn selected_nodes_bounding_rect(&self) -> Rect {
        self.node_selection
            .iter()
            .filter_map(|i| self.nodes.get(&i))
            .fold(Rect::zero(), |acc, n| union_rects(acc, n.scene_bounding_rect()))
    }

    /// Bounds of the nodes that are shown, isolated nodes excluded.
    pub fn visible_nodes_bounding_rect(&self) -> Rect {
        self.nodes
            .values()
            .filter(|n| n.is_visible() && n.flags().has_contents)
            .fold(Rect::zero(), |acc, n| union_rects(acc, n.scene_bounding_rect()))
    }

    /// Bounds of every visible item.
    pub fn items_bounding_rect(&self) -> Rect {
        self.edges
            .values()
            .filter(|e| e.is_visible())
            .fold(self.visible_nodes_bounding_rect(), |acc, e| {
                union_rects(acc, e.bounding_rect())
            })
    }

    // ========================================================================
    // Scale and layout
    // ========================================================================

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rescale node positions from the current scale to `factor`.
    ///
    /// Non-positive factors mean 1.
    pub fn set_scale(&mut self, factor: f32) {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        let ratio = factor / self.scale;
        for node in self.nodes.values_mut() {
            let p = node.pos();
            node.set_pos(point(p.x * ratio, p.y * ratio));
        }
        self.adjust_all_edges();
        self.scale = factor;
        tracing::debug!(factor, nodes = self.nodes.len(), "scale changed");
        self.emit(SceneEvent::ScaleChanged(factor));
    }

    /// Place nodes at `positions[index] * scale`.
    ///
    /// Nodes in `isolated` keep their position but become inert and are not
    /// drawn. Returns false, without touching anything, when there are fewer
    /// positions than nodes or when a node that is not isolated has no
    /// position at its index.
    pub fn set_layout(&mut self, positions: &[Point], scale: Option<f32>, isolated: &[usize]) -> bool {
        if positions.len() < self.nodes.len() {
            tracing::warn!(
                positions = positions.len(),
                nodes = self.nodes.len(),
                "not enough positions for layout"
            );
            return false;
        }
        let isolated: HashSet<usize> = isolated.iter().copied().collect();
        if let Some(&index) = self
            .nodes
            .keys()
            .find(|&&i| i >= positions.len() && !isolated.contains(&i))
        {
            tracing::warn!(index, positions = positions.len(), "node has no layout position");
            return false;
        }
        let scale = scale
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(self.scale);
        let movable = !self.locked;

        for (&index, node) in self.nodes.iter_mut() {
            if isolated.contains(&index) {
                node.set_flags(NodeFlags::ISOLATED);
                self.node_selection.remove(index);
                continue;
            }
            node.set_flags(NodeFlags {
                movable,
                ..NodeFlags::default()
            });
            if let Some(p) = positions.get(index) {
                node.set_pos(point(p.x * scale, p.y * scale));
            }
        }

        self.adjust_all_edges();
        tracing::debug!(
            nodes = self.nodes.len(),
            isolated = isolated.len(),
            scale,
            "layout applied"
        );
        self.emit(SceneEvent::LayoutChanged);
        true
    }

    // ========================================================================
    // Labels and radii
    // ========================================================================

    /// Assign labels in node order; nodes past the end of `labels` get
    /// their default label.
    pub fn set_labels(&mut self, labels: &[SharedString]) {
        for (rank, node) in self.nodes.values_mut().enumerate() {
            match labels.get(rank) {
                Some(label) => node.set_label(label.clone()),
                None => node.set_label((node.index() + 1).to_string()),
            }
        }
    }

    /// Read each node's label from row `index` of `column`. Missing cells
    /// leave the label unchanged.
    pub fn set_labels_from_model<T, S>(&mut self, source: &S, column: usize)
    where
        S: TableSource<T> + ?Sized,
        T: Into<SharedString>,
    {
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(label) = source.cell(index, column) {
                node.set_label(label);
            }
        }
    }

    pub fn reset_labels(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_label((node.index() + 1).to_string());
        }
    }

    /// Radii read from `column` and mapped through `func`.
    pub fn set_nodes_radii_from_model<T, S>(
        &mut self,
        source: &S,
        column: usize,
        func: impl Fn(T) -> f32,
    ) where
        S: TableSource<T> + ?Sized,
    {
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(value) = source.cell(index, column) {
                node.set_radius(func(value));
            }
        }
        self.adjust_all_edges();
    }

    pub fn reset_nodes_radii(&mut self) {
        let radius = self.config.geometry.default_radius;
        for node in self.nodes.values_mut() {
            node.set_radius(radius);
        }
        self.adjust_all_edges();
    }

    /// Radius per node in order, 0 where the default radius is used.
    pub fn nodes_radii(&self) -> Vec<f32> {
        let default = self.config.geometry.default_radius;
        self.nodes
            .values()
            .map(|n| if n.radius() != default { n.radius() } else { 0.0 })
            .collect()
    }

    /// Set `radii[index]` on each node. A list shorter than the node count
    /// is ignored.
    pub fn set_nodes_radii(&mut self, radii: &[f32]) {
        if !self.batch_covers_nodes(radii.len(), "radii") {
            return;
        }
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(&radius) = radii.get(index) {
                node.set_radius(radius);
            }
        }
        self.adjust_all_edges();
    }

    pub fn set_selected_nodes_radius(&mut self, radius: f32) {
        for index in self.node_selection.to_vec() {
            self.update_node(index, |node| node.set_radius(radius));
        }
    }

    fn batch_covers_nodes(&self, len: usize, what: &str) -> bool {
        if len < self.nodes.len() {
            tracing::warn!(len, nodes = self.nodes.len(), what, "batch shorter than node count, ignored");
            false
        } else {
            true
        }
    }

    // ========================================================================
    // Pie charts
    // ========================================================================

    pub fn pie_colors(&self) -> &[Color] {
        &self.pie_colors
    }

    pub fn set_pie_colors(&mut self, colors: Vec<Color>) {
        self.pie_colors = colors;
    }

    /// Pie weights from `columns`. Asking for more columns than there are
    /// palette colors does nothing.
    pub fn set_pie_charts_from_model<S>(&mut self, source: &S, columns: &[usize])
    where
        S: TableSource<f32> + ?Sized,
    {
        if columns.len() > self.pie_colors.len() {
            tracing::warn!(
                columns = columns.len(),
                colors = self.pie_colors.len(),
                "more pie columns than colors, ignored"
            );
            return;
        }
        for (&index, node) in self.nodes.iter_mut() {
            let values: Vec<f32> = columns
                .iter()
                .map(|&c| source.cell(index, c).unwrap_or(0.0))
                .collect();
            node.set_pie(Some(&values));
        }
    }

    pub fn reset_pie_charts(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_pie(None);
        }
    }

    pub fn pie_charts_visibility(&self) -> bool {
        self.pie_charts_visible
    }

    pub fn set_pie_charts_visibility(&mut self, visible: bool) {
        if visible != self.pie_charts_visible {
            self.pie_charts_visible = visible;
            self.emit(SceneEvent::PieChartsVisibilityChanged(visible));
        }
    }

    // ========================================================================
    // Pixmaps
    // ========================================================================

    /// Ask `renderer` for a depiction of each node's descriptor in `column`.
    /// Empty cells are skipped; failed depictions leave no pixmap.
    pub fn set_pixmaps_from_model<T, S>(
        &mut self,
        source: &S,
        column: usize,
        format: PixmapFormat,
        renderer: &dyn MoleculeRenderer,
    ) where
        S: TableSource<T> + ?Sized,
        T: AsRef<str>,
    {
        let mut rendered = 0usize;
        for (&index, node) in self.nodes.iter_mut() {
            let Some(text) = source.cell(index, column) else {
                continue;
            };
            if text.as_ref().is_empty() {
                continue;
            }
            if node.set_pixmap_from_descriptor(renderer, text.as_ref(), format) {
                rendered += 1;
            }
        }
        tracing::debug!(rendered, "pixmaps updated");
    }

    pub fn reset_pixmaps(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_pixmap(None);
        }
    }

    pub fn pixmap_visibility(&self) -> bool {
        self.pixmaps_visible
    }

    pub fn set_pixmap_visibility(&mut self, visible: bool) {
        if visible != self.pixmaps_visible {
            self.pixmaps_visible = visible;
            self.emit(SceneEvent::PixmapVisibilityChanged(visible));
        }
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    fn set_item_visible(&mut self, item: ItemRef, visible: bool) {
        match item {
            ItemRef::Node(i) => {
                if let Some(node) = self.nodes.get_mut(&i) {
                    node.set_visible(visible);
                }
            }
            ItemRef::Edge(i) => {
                if let Some(edge) = self.edges.get_mut(&i) {
                    edge.set_visible(visible);
                }
            }
        }
    }

    pub fn hide_items(&mut self, items: &[ItemRef]) {
        for &item in items {
            self.set_item_visible(item, false);
        }
        self.emit(SceneEvent::ItemsVisibilityChanged);
    }

    pub fn show_items(&mut self, items: &[ItemRef]) {
        for &item in items {
            self.set_item_visible(item, true);
        }
        self.emit(SceneEvent::ItemsVisibilityChanged);
    }

    /// Hide the selected items and clear the selection.
    pub fn hide_selected_items(&mut self) {
        let items: Vec<ItemRef> = self
            .node_selection
            .iter()
            .map(ItemRef::Node)
            .chain(self.edge_selection.iter().map(ItemRef::Edge))
            .collect();
        self.clear_selection();
        self.hide_items(&items);
    }

    pub fn show_all_items(&mut self) {
        self.set_all_visible(true);
    }

    pub fn hide_all_items(&mut self) {
        self.set_all_visible(false);
    }

    fn set_all_visible(&mut self, visible: bool) {
        for node in self.nodes.values_mut() {
            node.set_visible(visible);
        }
        for edge in self.edges.values_mut() {
            edge.set_visible(visible);
        }
        self.emit(SceneEvent::ItemsVisibilityChanged);
    }

    // ========================================================================
    // Per-node colors, overlays and polygons
    // ========================================================================

    /// Fill per node in order; `None` where the node wears the style fill.
    pub fn nodes_colors(&self) -> Vec<Option<Color>> {
        let default = self.style.node_fill(false);
        self.nodes
            .values()
            .map(|n| (Some(n.fill()) != default).then(|| n.fill()))
            .collect()
    }

    /// Set `colors[index]` on each node, skipping `None`. A list shorter
    /// than the node count is ignored.
    pub fn set_nodes_colors(&mut self, colors: &[Option<Color>]) {
        if !self.batch_covers_nodes(colors.len(), "colors") {
            return;
        }
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(&Some(color)) = colors.get(index) {
                node.set_brush(color, true);
            }
        }
    }

    pub fn set_selected_nodes_color(&mut self, color: Color) {
        for index in self.node_selection.to_vec() {
            if let Some(node) = self.nodes.get_mut(&index) {
                node.set_brush(color, true);
            }
        }
    }

    pub fn nodes_overlay_brushes(&self) -> Vec<Option<Color>> {
        self.nodes.values().map(Node::overlay_brush).collect()
    }

    pub fn set_nodes_overlay_brushes(&mut self, brushes: &[Option<Color>]) {
        if !self.batch_covers_nodes(brushes.len(), "overlay brushes") {
            return;
        }
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(&brush) = brushes.get(index) {
                node.set_overlay_brush(brush);
            }
        }
    }

    pub fn set_selected_nodes_overlay_brush(&mut self, brush: Option<Color>) {
        for index in self.node_selection.to_vec() {
            if let Some(node) = self.nodes.get_mut(&index) {
                node.set_overlay_brush(brush);
            }
        }
    }

    pub fn nodes_polygons(&self) -> Vec<NodePolygon> {
        self.nodes.values().map(Node::polygon).collect()
    }

    pub fn set_nodes_polygons(&mut self, polygons: &[NodePolygon]) {
        if !self.batch_covers_nodes(polygons.len(), "polygons") {
            return;
        }
        for (&index, node) in self.nodes.iter_mut() {
            if let Some(&polygon) = polygons.get(index) {
                node.set_polygon(polygon);
            }
        }
    }

    pub fn set_selected_nodes_polygon(&mut self, polygon: NodePolygon) {
        for index in self.node_selection.to_vec() {
            self.update_node(index, |node| node.set_polygon(polygon));
        }
    }

    // ========================================================================
    // Locking
    // ========================================================================

    /// Lock or unlock node dragging. Emits only on an actual change.
    pub fn lock(&mut self, locked: bool) {
        if locked == self.locked {
            return;
        }
        self.locked = locked;
        for node in self.nodes.values_mut() {
            if node.flags().has_contents {
                node.set_flags(NodeFlags {
                    movable: !locked,
                    ..node.flags()
                });
            }
        }
        self.emit(SceneEvent::Locked(locked));
    }

    pub fn unlock(&mut self) {
        self.lock(false);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn apply_lock_flag(&self, node: &mut Node) {
        if self.locked {
            node.set_flags(NodeFlags {
                movable: false,
                ..node.flags()
            });
        }
    }

    // ========================================================================
    // Style
    // ========================================================================

    pub fn network_style(&self) -> &NetworkStyle {
        &self.style
    }

    /// Switch style; `None` restores the default one.
    ///
    /// Nodes keep custom fills; borders, fonts and edge pens always follow.
    pub fn set_network_style(&mut self, style: Option<NetworkStyle>) {
        let new = style.unwrap_or_else(default_style);
        for node in self.nodes.values_mut() {
            node.update_style(&new, Some(&self.style));
        }
        let edge_pen = *new.edge_pen(false);
        for edge in self.edges.values_mut() {
            edge.set_pen(edge_pen);
        }
        tracing::debug!(style = new.name(), nodes = self.nodes.len(), "style applied");
        self.style = new;
        // Border widths feed into edge endpoints.
        self.adjust_all_edges();
        self.emit(SceneEvent::StyleChanged);
    }

    /// Measure labels with `metrics` from now on.
    pub fn set_text_metrics(&mut self, metrics: Rc<dyn TextMetrics>) {
        for node in self.nodes.values_mut() {
            node.set_text_metrics(metrics.clone());
        }
        self.metrics = metrics;
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Paint plan for one frame.
    ///
    /// Edges come first, then nodes. Within a layer selected items come last
    /// so they paint on top. Items whose bounds miss `visible` are culled.
    pub fn render_plan(&self, lod: f32, visible: Option<&Rect>) -> Vec<RenderItem> {
        let ctx = RenderContext {
            lod,
            selected: false,
            style: &self.style,
            pie_colors: &self.pie_colors,
            pie_visible: self.pie_charts_visible,
            pixmap_visible: self.pixmaps_visible,
            config: &self.config.render,
        };
        let in_view = |r: Rect| visible.map_or(true, |v| r.intersects(v));

        let mut plan = Vec::new();
        for selected_pass in [false, true] {
            for edge in self.edges.values() {
                if self.edge_selection.contains(edge.index()) != selected_pass
                    || !in_view(edge.bounding_rect())
                {
                    continue;
                }
                let commands = edge_render_plan(edge, &ctx.with_selected(selected_pass));
                if !commands.is_empty() {
                    plan.push(RenderItem {
                        item: ItemRef::Edge(edge.index()),
                        origin: point(0.0, 0.0),
                        selected: selected_pass,
                        commands,
                    });
                }
            }
        }
        for selected_pass in [false, true] {
            for node in self.nodes.values() {
                if self.node_selection.contains(node.index()) != selected_pass
                    || !in_view(node.scene_bounding_rect())
                {
                    continue;
                }
                let commands = node_render_plan(node, &ctx.with_selected(selected_pass));
                if !commands.is_empty() {
                    plan.push(RenderItem {
                        item: ItemRef::Node(node.index()),
                        origin: node.pos(),
                        selected: selected_pass,
                        commands,
                    });
                }
            }
        }
        plan
    }
}
