//! Geometry value types shared by nodes, edges and the viewport.
//!
//! Everything is `f32` in an untyped unit, which matches the coordinates Slint
//! hands out in its callbacks.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f32, Unit>;
pub type Vector = euclid::Vector2D<f32, Unit>;
pub type Size = euclid::Size2D<f32, Unit>;
pub type Rect = euclid::Rect<f32, Unit>;
pub type Transform = euclid::Transform2D<f32, Unit, Unit>;

pub fn point(x: f32, y: f32) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f32, y: f32) -> Vector {
    euclid::vec2(x, y)
}

pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
    euclid::rect(x, y, width, height)
}

/// A rect centered on `center` with the given half extents.
pub fn centered_rect(center: Point, half_width: f32, half_height: f32) -> Rect {
    rect(
        center.x - half_width,
        center.y - half_height,
        2.0 * half_width,
        2.0 * half_height,
    )
}

/// Union that treats zero-sized rects as "null" and ignores them.
///
/// euclid's `union` would otherwise stretch the result to include the origin
/// of an empty rect.
pub fn union_rects(a: Rect, b: Rect) -> Rect {
    if is_null(&a) {
        b
    } else if is_null(&b) {
        a
    } else {
        a.union(&b)
    }
}

pub fn is_null(r: &Rect) -> bool {
    r.size.width <= 0.0 && r.size.height <= 0.0
}

/// Grow a rect by `d` on every side. Negative values shrink it.
pub fn inflate(r: Rect, d: f32) -> Rect {
    rect(
        r.origin.x - d,
        r.origin.y - d,
        r.size.width + 2.0 * d,
        r.size.height + 2.0 * d,
    )
}

/// Bounding rect of a point set; an empty rect for no points.
pub fn points_bounds(points: &[Point]) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::zero();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in iter {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    rect(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Approximate equality in the spirit of `qFuzzyCompare`, with an absolute
/// floor so that comparisons against zero behave.
pub fn fuzzy_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5 * a.abs().max(b.abs()).max(1.0)
}

pub fn fuzzy_eq_points(a: Point, b: Point) -> bool {
    fuzzy_eq(a.x, b.x) && fuzzy_eq(a.y, b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_ignores_null_rects() {
        let a = rect(10.0, 10.0, 5.0, 5.0);
        assert_eq!(union_rects(a, Rect::zero()), a);
        assert_eq!(union_rects(Rect::zero(), a), a);
        let u = union_rects(a, rect(0.0, 0.0, 2.0, 2.0));
        assert_eq!(u, rect(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn test_inflate_and_shrink() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(inflate(r, 2.0), rect(-2.0, -2.0, 14.0, 14.0));
        assert_eq!(inflate(r, -1.0), rect(1.0, 1.0, 8.0, 8.0));
    }

    #[test]
    fn test_points_bounds() {
        let pts = [point(-1.0, 2.0), point(3.0, -4.0), point(0.0, 0.0)];
        assert_eq!(points_bounds(&pts), rect(-1.0, -4.0, 4.0, 6.0));
        assert_eq!(points_bounds(&[]), Rect::zero());
    }

    #[test]
    fn test_fuzzy_eq_near_zero() {
        assert!(fuzzy_eq(0.0, 1e-7));
        assert!(!fuzzy_eq(0.0, 0.01));
        assert!(fuzzy_eq(100000.0, 100000.5));
    }
}
