//! Edge geometry: shortened straight segments and self-loop curves.

use crate::config::{GeometryConfig, DEFAULT_EDGE_WIDTH};
use crate::geom::{fuzzy_eq_points, inflate, point, rect, Point, Rect};
use crate::path::{CubicBezier, EdgePath};
use crate::style::{Pen, DARK_GRAY};

/// What an edge needs to know about one of its endpoint nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAnchor {
    pub node: usize,
    pub pos: Point,
    pub radius: f32,
    pub border_width: f32,
}

#[derive(Debug, Clone)]
pub struct Edge {
    index: usize,
    source: Option<usize>,
    dest: Option<usize>,
    width: f32,
    pen: Pen,
    source_point: Point,
    dest_point: Point,
    path: EdgePath,
    /// Radius and border width of the looped node, captured by `adjust`.
    loop_node: Option<(f32, f32)>,
    visible: bool,
}

impl Edge {
    pub fn new(index: usize, source: Option<usize>, dest: Option<usize>, width: f32) -> Self {
        let mut edge = Self {
            index,
            source,
            dest,
            width: DEFAULT_EDGE_WIDTH,
            pen: Pen::new(DARK_GRAY, DEFAULT_EDGE_WIDTH),
            source_point: point(0.0, 0.0),
            dest_point: point(0.0, 0.0),
            path: EdgePath::Empty,
            loop_node: None,
            visible: true,
        };
        edge.set_width(width);
        edge
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn dest(&self) -> Option<usize> {
        self.dest
    }

    /// Endpoint registration is the scene's job, see
    /// `NetworkScene::set_edge_source`.
    pub(crate) fn set_source(&mut self, source: Option<usize>) {
        self.source = source;
    }

    pub(crate) fn set_dest(&mut self, dest: Option<usize>) {
        self.dest = dest;
    }

    /// Both endpoints are set and equal.
    pub fn is_self_loop(&self) -> bool {
        self.source.is_some() && self.source == self.dest
    }

    /// Self-loops always read as unit width.
    pub fn width(&self) -> f32 {
        if self.is_self_loop() {
            DEFAULT_EDGE_WIDTH
        } else {
            self.width
        }
    }

    /// Negative or non-finite widths, and any width on a self-loop, fall
    /// back to 1.
    pub fn set_width(&mut self, width: f32) {
        self.width = if width.is_finite() && width >= 0.0 && !self.is_self_loop() {
            width
        } else {
            DEFAULT_EDGE_WIDTH
        };
    }

    /// The stroke pen, carrying the edge width.
    pub fn pen(&self) -> Pen {
        Pen {
            width: self.width(),
            ..self.pen
        }
    }

    /// Replace color and style; the width is kept.
    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = Pen {
            width: self.pen.width,
            ..pen
        };
    }

    pub fn source_point(&self) -> Point {
        self.source_point
    }

    pub fn dest_point(&self) -> Point {
        self.dest_point
    }

    pub fn path(&self) -> &EdgePath {
        &self.path
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Visible endpoints coincide on an ordinary edge.
    pub fn is_degenerate(&self) -> bool {
        !self.is_self_loop() && fuzzy_eq_points(self.source_point, self.dest_point)
    }

    /// Recompute the path from the endpoint nodes.
    ///
    /// A missing anchor leaves the edge without geometry.
    pub fn adjust(
        &mut self,
        source: Option<EdgeAnchor>,
        dest: Option<EdgeAnchor>,
        cfg: &GeometryConfig,
    ) {
        let (Some(s), Some(d)) = (source, dest) else {
            self.path = EdgePath::Empty;
            self.loop_node = None;
            return;
        };

        let line = d.pos - s.pos;
        let length = line.length();
        let min_len = s.radius + d.radius + s.border_width + d.border_width;

        if length > min_len {
            let unit = line / length;
            self.source_point = s.pos + unit * (s.radius + s.border_width + cfg.edge_margin);
            self.dest_point = d.pos - unit * (d.radius + d.border_width + cfg.edge_margin);
        } else {
            self.source_point = s.pos;
            self.dest_point = s.pos;
        }

        if self.is_self_loop() {
            let r = s.radius;
            let gap = r + 2.0 * s.border_width;
            let reach = cfg.self_loop_reach * r;
            let (sp, dp) = (self.source_point, self.dest_point);
            self.path = EdgePath::Cubic(CubicBezier::new(
                point(sp.x - gap, sp.y),
                point(sp.x - reach, sp.y),
                point(sp.x, sp.y - reach),
                point(dp.x, dp.y - gap),
            ));
            self.loop_node = Some((r, s.border_width));
        } else {
            self.path = EdgePath::Line {
                from: self.source_point,
                to: self.dest_point,
            };
            self.loop_node = None;
        }
    }

    /// Path bounds grown by half the stroke width.
    pub fn natural_rect(&self) -> Rect {
        if self.path.is_empty() {
            return Rect::zero();
        }
        inflate(self.path.control_point_rect(), self.width() / 2.0)
    }

    /// Bounds used for culling and rubber-band selection.
    ///
    /// A self-loop gets a square that contains the loop drawn around its node.
    pub fn bounding_rect(&self) -> Rect {
        if self.source.is_none() || self.dest.is_none() {
            return Rect::zero();
        }
        let natural = self.natural_rect();
        match (self.is_self_loop(), self.loop_node) {
            (true, Some((radius, border))) => {
                let w = self.width();
                let delta = 2.0 * radius - 2.0 * border - w;
                let size = 2.0 * (radius + border + 1.0 + w);
                rect(natural.origin.x + delta, natural.origin.y + delta, size, size)
            }
            _ => natural,
        }
    }

    /// Distance from a scene point to the drawn path.
    pub fn distance_to(&self, p: Point, samples: usize) -> f32 {
        self.path.distance_to(p, samples)
    }
}
