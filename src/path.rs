use std::fmt::Write as _;

use crate::geom::{point, points_bounds, Point, Rect, Vector};

/// Cubic bezier curve for self-loops and distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        point(x, y)
    }

    /// Rect spanned by the end and control points.
    ///
    /// This always contains the curve and is what a path item reports as its
    /// bounds.
    pub fn control_rect(&self) -> Rect {
        points_bounds(&[self.p0, self.p1, self.p2, self.p3])
    }

    fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self::new(f(self.p0), f(self.p1), f(self.p2), f(self.p3))
    }
}

/// Geometry computed for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EdgePath {
    /// No valid geometry, e.g. an endpoint is missing.
    #[default]
    Empty,
    Line { from: Point, to: Point },
    Cubic(CubicBezier),
}

impl EdgePath {
    pub fn is_empty(&self) -> bool {
        matches!(self, EdgePath::Empty)
    }

    /// Natural bounds of the path (control points included).
    pub fn control_point_rect(&self) -> Rect {
        match self {
            EdgePath::Empty => Rect::zero(),
            EdgePath::Line { from, to } => points_bounds(&[*from, *to]),
            EdgePath::Cubic(c) => c.control_rect(),
        }
    }

    /// Minimum distance from `p` to the path; infinite for an empty path.
    pub fn distance_to(&self, p: Point, samples: usize) -> f32 {
        match self {
            EdgePath::Empty => f32::INFINITY,
            EdgePath::Line { from, to } => distance_to_line_segment_sq(p, *from, *to).sqrt(),
            EdgePath::Cubic(c) => distance_to_bezier(p, c, samples),
        }
    }

    /// Same path under `zoom` then `pan`, i.e. in screen space.
    pub fn transformed(&self, zoom: f32, pan: Vector) -> Self {
        let f = |q: Point| point(q.x * zoom + pan.x, q.y * zoom + pan.y);
        match self {
            EdgePath::Empty => EdgePath::Empty,
            EdgePath::Line { from, to } => EdgePath::Line {
                from: f(*from),
                to: f(*to),
            },
            EdgePath::Cubic(c) => EdgePath::Cubic(c.map(f)),
        }
    }

    /// SVG path commands suitable for a Slint `Path { commands: ... }`.
    ///
    /// Returns e.g. "M 10 20 L 90 20" or "M 10 20 C 60 20 90 80 140 80";
    /// an empty string for an empty path.
    pub fn to_svg_commands(&self) -> String {
        let mut out = String::new();
        match self {
            EdgePath::Empty => {}
            EdgePath::Line { from, to } => {
                let _ = write!(out, "M {} {} L {} {}", from.x, from.y, to.x, to.y);
            }
            EdgePath::Cubic(c) => {
                let _ = write!(
                    out,
                    "M {} {} C {} {} {} {} {} {}",
                    c.p0.x, c.p0.y, c.p1.x, c.p1.y, c.p2.x, c.p2.y, c.p3.x, c.p3.y
                );
            }
        }
        out
    }
}

/// Calculate squared distance from a point to a line segment
pub fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.square_length();

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.square_length();
    }

    // Project point onto line, clamped to segment
    let t = (ap.dot(ab) / ab_len_sq).clamp(0.0, 1.0);

    let closest = a + ab * t;
    (point - closest).square_length()
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Uses subdivision approach: sample curve at regular intervals and find closest point.
///
/// # Arguments
/// * `point` - The point to measure distance from
/// * `bezier` - The bezier curve
/// * `num_samples` - Number of samples for distance calculation (default: 20)
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{rect, vector};

    fn loop_curve() -> CubicBezier {
        CubicBezier::new(
            point(-22.0, 0.0),
            point(-80.0, 0.0),
            point(0.0, -80.0),
            point(0.0, -22.0),
        )
    }

    // ========================================================================
    // EdgePath::to_svg_commands()
    // ========================================================================

    #[test]
    fn test_line_svg_format() {
        let path = EdgePath::Line {
            from: point(10.0, 20.0),
            to: point(100.0, 80.0),
        };
        assert_eq!(path.to_svg_commands(), "M 10 20 L 100 80");
    }

    #[test]
    fn test_cubic_svg_format() {
        let path = EdgePath::Cubic(loop_curve());
        let svg = path.to_svg_commands();
        assert!(svg.starts_with("M -22 0 C"));
        assert!(svg.ends_with("0 -22"));
    }

    #[test]
    fn test_empty_svg_is_empty() {
        assert_eq!(EdgePath::Empty.to_svg_commands(), "");
    }

    // ========================================================================
    // CubicBezier::eval()
    // ========================================================================

    #[test]
    fn test_bezier_eval_endpoints() {
        let bezier = loop_curve();
        assert_eq!(bezier.eval(0.0), bezier.p0);
        assert_eq!(bezier.eval(1.0), bezier.p3);
    }

    #[test]
    fn test_bezier_stays_inside_control_rect() {
        let bezier = loop_curve();
        let r = bezier.control_rect();
        for i in 0..=50 {
            let p = bezier.eval(i as f32 / 50.0);
            assert!(p.x >= r.min_x() && p.x <= r.max_x());
            assert!(p.y >= r.min_y() && p.y <= r.max_y());
        }
    }

    // ========================================================================
    // distance_to_line_segment_sq() / distance_to_bezier()
    // ========================================================================

    #[test]
    fn test_distance_to_line_segment() {
        let a = point(0.0, 0.0);
        let b = point(100.0, 0.0);
        assert_eq!(distance_to_line_segment_sq(point(50.0, 10.0), a, b), 100.0);
        // Beyond the end clamps to the endpoint
        assert_eq!(distance_to_line_segment_sq(point(110.0, 0.0), a, b), 100.0);
        // Degenerate segment
        assert_eq!(distance_to_line_segment_sq(point(3.0, 4.0), a, a), 25.0);
    }

    #[test]
    fn test_distance_to_bezier_on_curve_is_small() {
        let bezier = loop_curve();
        let on_curve = bezier.eval(0.5);
        assert!(distance_to_bezier(on_curve, &bezier, 20) < 0.5);
        assert!(distance_to_bezier(point(50.0, 50.0), &bezier, 20) > 50.0);
    }

    #[test]
    fn test_distance_to_bezier_zero_samples_uses_default() {
        let bezier = loop_curve();
        let a = distance_to_bezier(point(-30.0, -30.0), &bezier, 0);
        let b = distance_to_bezier(point(-30.0, -30.0), &bezier, 20);
        assert_eq!(a, b);
    }

    // ========================================================================
    // EdgePath bounds / transform
    // ========================================================================

    #[test]
    fn test_control_point_rect() {
        let line = EdgePath::Line {
            from: point(10.0, 5.0),
            to: point(-10.0, 15.0),
        };
        assert_eq!(line.control_point_rect(), rect(-10.0, 5.0, 20.0, 10.0));
        assert_eq!(
            EdgePath::Cubic(loop_curve()).control_point_rect(),
            rect(-80.0, -80.0, 80.0, 80.0)
        );
        assert_eq!(EdgePath::Empty.control_point_rect(), Rect::zero());
    }

    #[test]
    fn test_transformed_applies_zoom_then_pan() {
        let line = EdgePath::Line {
            from: point(10.0, 10.0),
            to: point(20.0, 10.0),
        };
        let t = line.transformed(2.0, vector(5.0, -5.0));
        assert_eq!(
            t,
            EdgePath::Line {
                from: point(25.0, 15.0),
                to: point(45.0, 15.0)
            }
        );
    }

    #[test]
    fn test_empty_path_distance_is_infinite() {
        assert!(EdgePath::Empty.distance_to(point(0.0, 0.0), 20).is_infinite());
    }
}
