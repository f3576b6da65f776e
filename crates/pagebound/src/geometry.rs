//! Polygon and rectangle geometry used by the contour filtering and
//! approximation stages.

use crate::types::{BoundingBox, Point};

/// Enclosed area of a closed polygon via the shoelace formula.
///
/// The closing edge from the last point back to the first is implicit.
/// Returns zero for fewer than 3 points.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.x.mul_add(q.y, -(q.x * p.y));
    }
    sum.abs() / 2.0
}

/// Perimeter of a closed polygon (the closing edge is included).
#[must_use]
pub fn perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.distance(q);
    }
    sum
}

/// Axis-aligned bounding box of a point set.
///
/// An empty set yields a zero-sized box at the origin.
#[must_use]
pub fn bounding_box(points: &[Point]) -> BoundingBox {
    let Some(first) = points.first() else {
        return BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        };
    };
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Distance from point `p` to the segment from `a` to `b`.
///
/// The parametric projection is clamped to the segment, so points past
/// either end measure to the nearest endpoint. A zero-length segment
/// measures to `a`.
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);
    if length_sq == 0.0 {
        return p.distance(a);
    }
    let t = (dx.mul_add(p.x - a.x, dy * (p.y - a.y)) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y)))
}

/// Whether a closed polygon is convex.
///
/// Checks that the signed cross products of consecutive edge pairs all
/// share a sign; zero crosses (collinear runs) are ignored.
#[must_use]
pub fn is_convex(points: &[Point]) -> bool {
    if points.len() < 4 {
        return true;
    }
    let n = points.len();
    let mut positive = false;
    let mut negative = false;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b.x - a.x).mul_add(c.y - b.y, -((b.y - a.y) * (c.x - b.x)));
        if cross > 0.0 {
            positive = true;
        } else if cross < 0.0 {
            negative = true;
        }
        if positive && negative {
            return false;
        }
    }
    true
}

/// Intersection-over-union of two axis-aligned bounding boxes.
///
/// Disjoint or degenerate boxes yield zero.
#[must_use]
pub fn bbox_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let ix = (a.right().min(b.right()) - a.x.max(b.x)).max(0.0);
    let iy = (a.bottom().min(b.bottom()) - a.y.max(b.y)).max(0.0);
    let intersection = ix * iy;
    let union = a.area() + b.area() - intersection;
    if union <= 0.0 {
        return 0.0;
    }
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn area_of_unit_square() {
        assert!((polygon_area(&square(1.0)) - 1.0).abs() < 1e-12);
        assert!((polygon_area(&square(10.0)) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn area_is_orientation_independent() {
        let mut reversed = square(4.0);
        reversed.reverse();
        assert!((polygon_area(&reversed) - 16.0).abs() < 1e-12);
    }

    #[test]
    fn area_of_degenerate_polygon_is_zero() {
        assert!(polygon_area(&[]).abs() < f64::EPSILON);
        assert!(polygon_area(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]).abs() < f64::EPSILON);
    }

    #[test]
    fn perimeter_includes_closing_edge() {
        assert!((perimeter(&square(3.0)) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_of_scattered_points() {
        let points = [
            Point::new(3.0, 7.0),
            Point::new(-1.0, 2.0),
            Point::new(5.0, 4.0),
        ];
        let bbox = bounding_box(&points);
        assert!((bbox.x - -1.0).abs() < f64::EPSILON);
        assert!((bbox.y - 2.0).abs() < f64::EPSILON);
        assert!((bbox.width - 6.0).abs() < f64::EPSILON);
        assert!((bbox.height - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn segment_distance_perpendicular() {
        let d = point_segment_distance(
            Point::new(1.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_clamps_to_endpoint() {
        // Projection falls past b; distance is measured to b itself.
        let d = point_segment_distance(
            Point::new(5.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn segment_distance_degenerate_segment() {
        let d = point_segment_distance(
            Point::new(3.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn square_is_convex() {
        assert!(is_convex(&square(5.0)));
    }

    #[test]
    fn dart_is_not_convex() {
        let dart = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 1.0),
            Point::new(8.0, 0.0),
            Point::new(4.0, 6.0),
        ];
        assert!(!is_convex(&dart));
    }

    #[test]
    fn collinear_run_does_not_break_convexity() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ];
        assert!(is_convex(&points));
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
        };
        let b = BoundingBox {
            x: 5.0,
            y: 5.0,
            width: 2.0,
            height: 2.0,
        };
        assert!(bbox_iou(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = BoundingBox {
            x: 1.0,
            y: 1.0,
            width: 4.0,
            height: 3.0,
        };
        assert!((bbox_iou(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn iou_of_nested_boxes_is_area_ratio() {
        let outer = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let inner = BoundingBox {
            x: 2.0,
            y: 2.0,
            width: 5.0,
            height: 5.0,
        };
        assert!((bbox_iou(&outer, &inner) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn iou_of_half_overlapping_boxes() {
        let a = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 4.0,
        };
        let b = BoundingBox {
            x: 2.0,
            y: 0.0,
            width: 4.0,
            height: 4.0,
        };
        // Intersection 8, union 24.
        assert!((bbox_iou(&a, &b) - 8.0 / 24.0).abs() < 1e-12);
    }
}
