//! Node outline library.
//!
//! Every stock outline is normalized to the `[-1, 1]` box around the origin
//! and scaled to the node radius by [`fit_outline`]. `Circle` has no polygon;
//! the node draws its native ellipse instead.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::geom::{point, points_bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodePolygon {
    #[default]
    Circle,
    Square,
    Diamond,
    ThinDiamond,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Pentagon,
    Hexagon,
    Octagon,
    Star,
    Hexagram,
    Octagram,
    Decagram,
    Plus,
    X,
    Mask,
    Heart,
    Spade,
    Club,
    Custom,
}

impl NodePolygon {
    pub const STOCK: [NodePolygon; 21] = [
        NodePolygon::Circle,
        NodePolygon::Square,
        NodePolygon::Diamond,
        NodePolygon::ThinDiamond,
        NodePolygon::TriangleUp,
        NodePolygon::TriangleDown,
        NodePolygon::TriangleLeft,
        NodePolygon::TriangleRight,
        NodePolygon::Pentagon,
        NodePolygon::Hexagon,
        NodePolygon::Octagon,
        NodePolygon::Star,
        NodePolygon::Hexagram,
        NodePolygon::Octagram,
        NodePolygon::Decagram,
        NodePolygon::Plus,
        NodePolygon::X,
        NodePolygon::Mask,
        NodePolygon::Heart,
        NodePolygon::Spade,
        NodePolygon::Club,
    ];

    /// Map an integer id (as stored in data tables) to a polygon kind.
    ///
    /// Ids follow the declaration order; unknown ids fall back to `Circle`.
    pub fn from_id(id: i32) -> Self {
        if id == Self::STOCK.len() as i32 {
            return NodePolygon::Custom;
        }
        usize::try_from(id)
            .ok()
            .and_then(|i| Self::STOCK.get(i).copied())
            .unwrap_or(NodePolygon::Circle)
    }

    pub fn id(self) -> i32 {
        Self::STOCK
            .iter()
            .position(|&p| p == self)
            .map(|i| i as i32)
            .unwrap_or(Self::STOCK.len() as i32)
    }

    /// Normalized outline for stock shapes. Empty for `Circle` and `Custom`.
    pub fn unit_outline(self) -> Vec<Point> {
        let raw = match self {
            NodePolygon::Circle | NodePolygon::Custom => return Vec::new(),
            NodePolygon::Square => vec![
                point(-1.0, -1.0),
                point(1.0, -1.0),
                point(1.0, 1.0),
                point(-1.0, 1.0),
            ],
            NodePolygon::Diamond => vec![
                point(0.0, -1.0),
                point(1.0, 0.0),
                point(0.0, 1.0),
                point(-1.0, 0.0),
            ],
            NodePolygon::ThinDiamond => vec![
                point(0.0, -1.0),
                point(0.6, 0.0),
                point(0.0, 1.0),
                point(-0.6, 0.0),
            ],
            NodePolygon::TriangleUp => vec![point(0.0, -1.0), point(1.0, 1.0), point(-1.0, 1.0)],
            NodePolygon::TriangleDown => {
                vec![point(-1.0, -1.0), point(1.0, -1.0), point(0.0, 1.0)]
            }
            NodePolygon::TriangleLeft => {
                vec![point(-1.0, 0.0), point(1.0, -1.0), point(1.0, 1.0)]
            }
            NodePolygon::TriangleRight => {
                vec![point(-1.0, -1.0), point(1.0, 0.0), point(-1.0, 1.0)]
            }
            NodePolygon::Pentagon => regular(5),
            NodePolygon::Hexagon => regular(6),
            NodePolygon::Octagon => regular(8),
            NodePolygon::Star => star(5, 0.382),
            NodePolygon::Hexagram => star(6, 0.577),
            NodePolygon::Octagram => star(8, 0.5),
            NodePolygon::Decagram => star(10, 0.618),
            NodePolygon::Plus => plus(),
            NodePolygon::X => plus()
                .into_iter()
                .map(|p| rotate(p, PI / 4.0))
                .collect(),
            NodePolygon::Mask => vec![
                point(-1.0, -0.5),
                point(-0.3, -0.6),
                point(0.0, -0.3),
                point(0.3, -0.6),
                point(1.0, -0.5),
                point(0.8, 0.4),
                point(0.3, 0.5),
                point(0.0, 0.2),
                point(-0.3, 0.5),
                point(-0.8, 0.4),
            ],
            NodePolygon::Heart => heart(),
            NodePolygon::Spade => spade(),
            NodePolygon::Club => club(),
        };
        normalize(&raw)
    }
}

/// Scale an outline so that its larger bounding-box side spans `2 * radius`.
///
/// An outline with zero extent is returned unscaled.
pub fn fit_outline(points: &[Point], radius: f32) -> Vec<Point> {
    let bounds = points_bounds(points);
    let extent = bounds.size.width.max(bounds.size.height);
    let factor = if extent > 0.0 { 2.0 * radius / extent } else { 1.0 };
    points.iter().map(|p| point(p.x * factor, p.y * factor)).collect()
}

/// Scale an outline about the origin.
pub fn scale_outline(points: &[Point], factor: f32) -> Vec<Point> {
    points.iter().map(|p| point(p.x * factor, p.y * factor)).collect()
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Center a point set on the origin and scale it into `[-1, 1]`, keeping
/// the aspect ratio.
fn normalize(points: &[Point]) -> Vec<Point> {
    let b = points_bounds(points);
    let extent = b.size.width.max(b.size.height);
    if extent <= 0.0 {
        return points.to_vec();
    }
    let cx = b.origin.x + b.size.width / 2.0;
    let cy = b.origin.y + b.size.height / 2.0;
    let k = 2.0 / extent;
    points
        .iter()
        .map(|p| point((p.x - cx) * k, (p.y - cy) * k))
        .collect()
}

fn rotate(p: Point, angle: f32) -> Point {
    let (s, c) = angle.sin_cos();
    point(p.x * c - p.y * s, p.x * s + p.y * c)
}

fn polar(r: f32, angle: f32) -> Point {
    point(r * angle.cos(), r * angle.sin())
}

// First vertex points straight up.
fn regular(sides: usize) -> Vec<Point> {
    (0..sides)
        .map(|i| polar(1.0, -PI / 2.0 + TAU * i as f32 / sides as f32))
        .collect()
}

fn star(spikes: usize, inner: f32) -> Vec<Point> {
    let n = spikes * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { 1.0 } else { inner };
            polar(r, -PI / 2.0 + TAU * i as f32 / n as f32)
        })
        .collect()
}

fn plus() -> Vec<Point> {
    let t = 1.0 / 3.0;
    vec![
        point(-t, -1.0),
        point(t, -1.0),
        point(t, -t),
        point(1.0, -t),
        point(1.0, t),
        point(t, t),
        point(t, 1.0),
        point(-t, 1.0),
        point(-t, t),
        point(-1.0, t),
        point(-1.0, -t),
        point(-t, -t),
    ]
}

// Classic parametric heart; y grows downwards so the tip ends up at the bottom.
fn heart_point(t: f32) -> Point {
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    point(x, y)
}

fn heart() -> Vec<Point> {
    const SAMPLES: usize = 36;
    (0..SAMPLES)
        .map(|i| heart_point(TAU * i as f32 / SAMPLES as f32))
        .collect()
}

fn spade() -> Vec<Point> {
    const SAMPLES: usize = 32;
    let start = 0.55_f32;
    let end = TAU - 0.55;
    let mut pts = vec![
        point(-2.0, 4.0),
        point(-5.0, 16.0),
        point(5.0, 16.0),
        point(2.0, 4.0),
    ];
    pts.extend((0..=SAMPLES).map(|i| {
        let t = start + (end - start) * i as f32 / SAMPLES as f32;
        let p = heart_point(t);
        point(p.x, -p.y)
    }));
    pts
}

fn club() -> Vec<Point> {
    const SAMPLES: usize = 48;
    // Three-lobed rose with lobes at the top and lower left/right; the trough
    // at the bottom carries the stem.
    let delta = 0.3_f32;
    let start = PI / 2.0 + delta;
    let end = PI / 2.0 + TAU - delta;
    let mut pts = vec![
        point(-0.1, 0.25),
        point(-0.35, 1.0),
        point(0.35, 1.0),
        point(0.1, 0.25),
    ];
    pts.extend((0..=SAMPLES).map(|i| {
        let theta = start + (end - start) * i as f32 / SAMPLES as f32;
        let r = 0.6 + 0.4 * (3.0 * (theta + PI / 2.0)).cos();
        polar(r, theta)
    }));
    pts
}
