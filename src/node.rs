//! Node geometry and per-node paint state.
//!
//! A [`Node`] knows its own outline, label box, pie weights and pixmap. Its
//! position is owned by the scene, which re-adjusts the incident edges
//! whenever it changes (see `NetworkScene::move_node`).

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use slint::{Color, Image, SharedString};

use crate::config::RADIUS;
use crate::edge::EdgeAnchor;
use crate::geom::{centered_rect, inflate, point, points_bounds, union_rects, Point, Rect};
use crate::molecule::{MoleculeDescriptor, MoleculeRenderer, PixmapFormat};
use crate::polygon::{fit_outline, polygon_contains, scale_outline, NodePolygon};
use crate::style::{NetworkStyle, Pen, BLACK, LIGHT_GRAY, WHITE};
use crate::text::{AverageCharMetrics, Font, TextMetrics};

/// Interaction flags a host applies to the node item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags {
    pub selectable: bool,
    pub movable: bool,
    /// When false only the item exists; nothing is painted.
    pub has_contents: bool,
    pub ignores_transformations: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            selectable: true,
            movable: true,
            has_contents: true,
            ignores_transformations: false,
        }
    }
}

impl NodeFlags {
    /// Flags of a node left out of the current layout.
    pub const ISOLATED: NodeFlags = NodeFlags {
        selectable: false,
        movable: false,
        has_contents: false,
        ignores_transformations: true,
    };
}

/// Rasterization cache policy requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    NoCache,
    ItemCoordinate,
    #[default]
    DeviceCoordinate,
}

/// Base outline of a node in item coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Ellipse { radius: f32 },
    Polygon(Vec<Point>),
}

impl Outline {
    pub fn rect(&self) -> Rect {
        match self {
            Outline::Ellipse { radius } => centered_rect(point(0.0, 0.0), *radius, *radius),
            Outline::Polygon(points) => points_bounds(points),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Outline::Ellipse { radius } => p.to_vector().square_length() <= radius * radius,
            Outline::Polygon(points) => polygon_contains(points, p),
        }
    }

    /// Same outline scaled about the origin.
    pub fn scaled(&self, factor: f32) -> Outline {
        match self {
            Outline::Ellipse { radius } => Outline::Ellipse {
                radius: radius * factor,
            },
            Outline::Polygon(points) => Outline::Polygon(scale_outline(points, factor)),
        }
    }
}

/// Hit-test region of a node: its outline plus the label box.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub outline: Outline,
    pub label_rect: Rect,
}

impl NodeShape {
    pub fn contains(&self, local: Point) -> bool {
        self.outline.contains(local) || (!self.label_rect.is_empty() && self.label_rect.contains(local))
    }

    pub fn bounding_rect(&self) -> Rect {
        union_rects(self.outline.rect(), self.label_rect)
    }
}

/// Text color readable on top of `fill`, using perceived luminance.
pub fn auto_text_color(fill: Color) -> Color {
    if fill.alpha() < 128 {
        return BLACK;
    }
    let luma = (0.299 * fill.red() as f32 + 0.587 * fill.green() as f32 + 0.114 * fill.blue() as f32)
        / 255.0;
    if luma > 0.5 {
        BLACK
    } else {
        WHITE
    }
}

pub struct Node {
    index: usize,
    label: SharedString,
    radius: f32,
    polygon: NodePolygon,
    shape: NodeShape,
    fill: Color,
    pen: Pen,
    font: Font,
    text_color: Color,
    overlay: Option<Color>,
    pie: Vec<f32>,
    pixmap: Option<Image>,
    edges: BTreeSet<usize>,
    pos: Point,
    flags: NodeFlags,
    visible: bool,
    revision: u64,
    cache_mode: CacheMode,
    metrics: Rc<dyn TextMetrics>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index)
            .field("label", &self.label)
            .field("pos", &self.pos)
            .field("radius", &self.radius)
            .field("polygon", &self.polygon)
            .field("edges", &self.edges)
            .field("flags", &self.flags)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl Node {
    /// A node labelled `index + 1`.
    pub fn new(index: usize) -> Self {
        Self::with_metrics(index, None, Rc::new(AverageCharMetrics))
    }

    pub fn with_label(index: usize, label: impl Into<SharedString>) -> Self {
        Self::with_metrics(index, Some(label.into()), Rc::new(AverageCharMetrics))
    }

    pub fn with_metrics(
        index: usize,
        label: Option<SharedString>,
        metrics: Rc<dyn TextMetrics>,
    ) -> Self {
        let label = label.unwrap_or_else(|| SharedString::from((index + 1).to_string()));
        let mut node = Self {
            index,
            label,
            radius: RADIUS,
            polygon: NodePolygon::Circle,
            shape: NodeShape {
                outline: Outline::Ellipse { radius: RADIUS },
                label_rect: Rect::zero(),
            },
            fill: LIGHT_GRAY,
            pen: Pen::new(BLACK, 1.0),
            font: Font::default(),
            text_color: BLACK,
            overlay: None,
            pie: Vec::new(),
            pixmap: None,
            edges: BTreeSet::new(),
            pos: point(0.0, 0.0),
            flags: NodeFlags::default(),
            visible: true,
            revision: 0,
            cache_mode: CacheMode::default(),
            metrics,
        };
        node.update_label_rect();
        node
    }

    pub fn with_pos(mut self, pos: Point) -> Self {
        self.pos = pos;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    /// Positions are changed through the scene so incident edges follow.
    pub(crate) fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }

    // ------------------------------------------------------------------
    // Label and font
    // ------------------------------------------------------------------

    pub fn label(&self) -> &SharedString {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<SharedString>) {
        self.label = label.into();
        self.update_label_rect();
    }

    pub fn label_rect(&self) -> Rect {
        self.shape.label_rect
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.update_label_rect();
    }

    pub fn set_text_metrics(&mut self, metrics: Rc<dyn TextMetrics>) {
        self.metrics = metrics;
        self.update_label_rect();
    }

    fn update_label_rect(&mut self) {
        self.shape.label_rect = if self.label.is_empty() {
            Rect::zero()
        } else {
            self.metrics.label_rect(&self.label, &self.font)
        };
        self.touch();
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Non-positive or non-finite radii are ignored.
    pub fn set_radius(&mut self, radius: f32) {
        if !(radius.is_finite() && radius > 0.0) {
            tracing::trace!(node = self.index, radius, "ignoring invalid radius");
            return;
        }
        if radius == self.radius {
            return;
        }
        let factor = radius / self.radius;
        self.shape.outline = self.shape.outline.scaled(factor);
        self.radius = radius;
        self.touch();
    }

    pub fn polygon(&self) -> NodePolygon {
        self.polygon
    }

    /// Outline points in item coordinates; empty for circles.
    pub fn polygon_points(&self) -> &[Point] {
        match &self.shape.outline {
            Outline::Ellipse { .. } => &[],
            Outline::Polygon(points) => points,
        }
    }

    pub fn set_polygon(&mut self, kind: NodePolygon) {
        if kind == NodePolygon::Custom {
            // A custom kind without points is a circle; keep the current one.
            return;
        }
        self.polygon = kind;
        self.shape.outline = match kind {
            NodePolygon::Circle | NodePolygon::Custom => Outline::Ellipse {
                radius: self.radius,
            },
            stock => Outline::Polygon(fit_outline(&stock.unit_outline(), self.radius)),
        };
        self.touch();
    }

    /// Use an arbitrary closed polygon, fitted to the current radius.
    ///
    /// An empty polygon makes the node a circle again.
    pub fn set_custom_polygon(&mut self, points: &[Point]) {
        if points.is_empty() {
            self.set_polygon(NodePolygon::Circle);
            return;
        }
        self.polygon = NodePolygon::Custom;
        self.shape.outline = Outline::Polygon(fit_outline(points, self.radius));
        self.touch();
    }

    pub fn shape(&self) -> &NodeShape {
        &self.shape
    }

    /// Bounds in item coordinates. Incident edges never contribute.
    pub fn bounding_rect(&self) -> Rect {
        let outline = inflate(self.shape.outline.rect(), self.pen.effective_width() / 2.0);
        union_rects(outline, self.shape.label_rect)
    }

    pub fn scene_bounding_rect(&self) -> Rect {
        self.bounding_rect().translate(self.pos.to_vector())
    }

    /// Hit-test in scene coordinates.
    pub fn contains_scene_point(&self, p: Point) -> bool {
        self.shape.contains(p - self.pos.to_vector())
    }

    /// Square inscribed in the circle of the node radius.
    pub fn image_rect(&self) -> Rect {
        let half = self.radius * std::f32::consts::SQRT_2 / 2.0;
        centered_rect(point(0.0, 0.0), half, half)
    }

    pub fn anchor(&self) -> EdgeAnchor {
        EdgeAnchor {
            node: self.index,
            pos: self.pos,
            radius: self.radius,
            border_width: self.pen.effective_width(),
        }
    }

    // ------------------------------------------------------------------
    // Paint attributes
    // ------------------------------------------------------------------

    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Set the fill; with `auto_text` the text switches between black
    /// and white to stay readable.
    pub fn set_brush(&mut self, color: Color, auto_text: bool) {
        self.fill = color;
        if auto_text {
            self.text_color = auto_text_color(color);
        }
        self.touch();
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.touch();
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
        self.touch();
    }

    pub fn overlay_brush(&self) -> Option<Color> {
        self.overlay
    }

    pub fn set_overlay_brush(&mut self, color: Option<Color>) {
        self.overlay = color;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Pie chart
    // ------------------------------------------------------------------

    /// Normalized pie weights, empty when no pie is shown.
    pub fn pie(&self) -> &[f32] {
        &self.pie
    }

    /// Store `weights` normalized to sum to one.
    ///
    /// Negative and non-finite weights count as zero. A missing or all-zero
    /// list clears the pie.
    pub fn set_pie(&mut self, weights: Option<&[f32]>) {
        let cleaned: Vec<f32> = weights
            .unwrap_or_default()
            .iter()
            .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
            .collect();
        let sum: f32 = cleaned.iter().sum();
        self.pie = if sum > 0.0 {
            cleaned.into_iter().map(|w| w / sum).collect()
        } else {
            Vec::new()
        };
        self.touch();
    }

    /// Sectors as `(start, span)` in degrees, counter-clockwise from 0.
    pub fn pie_sectors(&self) -> Vec<(f32, f32)> {
        let mut start = 0.0;
        self.pie
            .iter()
            .map(|w| {
                let sector = (start * 360.0, w * 360.0);
                start += w;
                sector
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Pixmap
    // ------------------------------------------------------------------

    pub fn pixmap(&self) -> Option<&Image> {
        self.pixmap.as_ref()
    }

    pub fn set_pixmap(&mut self, image: Option<Image>) {
        self.pixmap = image;
        self.touch();
    }

    /// Request a depiction of `text` sized to the node. Any failure leaves the
    /// node without a pixmap. Returns whether a pixmap was set.
    pub fn set_pixmap_from_descriptor(
        &mut self,
        renderer: &dyn MoleculeRenderer,
        text: &str,
        format: PixmapFormat,
    ) -> bool {
        let image = match MoleculeDescriptor::classify(text, format) {
            Ok(descriptor) => renderer.render(&descriptor, (2.0 * self.radius).round() as u32),
            Err(err) => {
                tracing::trace!(node = self.index, %err, "unusable molecule descriptor");
                None
            }
        };
        let found = image.is_some();
        self.set_pixmap(image);
        found
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    /// Indices of incident edges. The scene keeps this in sync.
    pub fn edges(&self) -> &BTreeSet<usize> {
        &self.edges
    }

    pub(crate) fn add_edge(&mut self, edge: usize) {
        self.edges.insert(edge);
    }

    pub(crate) fn remove_edge(&mut self, edge: usize) {
        self.edges.remove(&edge);
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: NodeFlags) {
        if flags.has_contents != self.flags.has_contents {
            self.touch();
        }
        self.flags = flags;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Bumped on every visual change so hosts can drop cached rasters.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache_mode
    }

    pub fn set_cache_mode(&mut self, mode: CacheMode) {
        self.cache_mode = mode;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Switch from `old` to `new`.
    ///
    /// Fill and text color only follow when the node still wears the old
    /// normal fill; a custom fill survives. Border and font always follow.
    pub fn update_style(&mut self, new: &NetworkStyle, old: Option<&NetworkStyle>) {
        let uncustomized = old.map_or(true, |old| old.node_fill(false) == Some(self.fill));
        if uncustomized {
            if let Some(fill) = new.node_fill(false) {
                self.set_brush(fill, false);
            }
            if let Some(color) = new.node_text_color(false) {
                self.set_text_color(color);
            }
        }
        self.set_pen(*new.node_pen(false));
        self.set_font(new.node_font(false).clone());
    }
}
