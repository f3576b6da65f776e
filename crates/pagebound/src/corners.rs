//! Curvature-based corner search.
//!
//! Fallback for contours the epsilon sweep cannot reduce to a usable
//! polygon: score every subsampled contour point by how sharply the
//! boundary turns there, then greedily pick the sharpest turns that are
//! far enough apart.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::types::{BoundingBox, Point};

/// Fraction of the shorter bounding-box side two corners must be apart.
const MIN_SEPARATION_FACTOR: f64 = 0.2;

/// Pick up to `target` corner points from a closed contour.
///
/// The contour is subsampled to at most ~100 points; each sample's turn
/// angle is measured against neighbors `window` samples away on either
/// side. Samples are taken sharpest-first, skipping any candidate
/// closer than `0.2 * min(bbox.width, bbox.height)` to an already
/// selected corner. Returned points are in selection order; contours
/// shorter than 8 points yield nothing.
#[must_use]
pub fn curvature_corners(points: &[Point], target: usize, bbox: &BoundingBox) -> Vec<Point> {
    if points.len() < 8 {
        return Vec::new();
    }

    let step = (points.len() / 100).max(1);
    let sampled: Vec<Point> = points.iter().copied().step_by(step).collect();
    let n = sampled.len();
    let window = (n / 20).max(3);

    let mut scored: Vec<(f64, usize)> = Vec::with_capacity(n);
    for i in 0..n {
        let curr = sampled[i];
        let prev = sampled[(i + n - window) % n];
        let next = sampled[(i + window) % n];

        // Arms from the sample toward both neighbors: the angle between
        // them is the interior angle at this point.
        let v1 = (prev.x - curr.x, prev.y - curr.y);
        let v2 = (next.x - curr.x, next.y - curr.y);
        let len1 = v1.0.hypot(v1.1);
        let len2 = v2.0.hypot(v2.1);
        if len1 == 0.0 || len2 == 0.0 {
            continue;
        }

        let cos = (v1.0.mul_add(v2.0, v1.1 * v2.1) / (len1 * len2)).clamp(-1.0, 1.0);
        // Straight-through motion scores 0; a full reversal scores pi.
        scored.push((PI - cos.acos(), i));
    }

    // Sharpest first; sample index breaks exact ties.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });

    let min_separation = MIN_SEPARATION_FACTOR * bbox.width.min(bbox.height);
    let mut corners: Vec<Point> = Vec::with_capacity(target);
    for &(_, i) in &scored {
        let candidate = sampled[i];
        if corners
            .iter()
            .all(|c| c.distance(candidate) >= min_separation)
        {
            corners.push(candidate);
            if corners.len() == target {
                break;
            }
        }
    }
    corners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry;

    /// Closed square outline traced pixel by pixel.
    fn square_contour(origin: f64, size: i32) -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..size {
            points.push(Point::new(origin + f64::from(i), origin));
        }
        for i in 0..size {
            points.push(Point::new(origin + f64::from(size), origin + f64::from(i)));
        }
        for i in (1..=size).rev() {
            points.push(Point::new(origin + f64::from(i), origin + f64::from(size)));
        }
        for i in (1..=size).rev() {
            points.push(Point::new(origin, origin + f64::from(i)));
        }
        points
    }

    #[test]
    fn too_short_contour_yields_nothing() {
        let points: Vec<Point> = (0..7).map(|i| Point::new(f64::from(i), 0.0)).collect();
        let bbox = geometry::bounding_box(&points);
        assert!(curvature_corners(&points, 4, &bbox).is_empty());
    }

    #[test]
    fn square_yields_four_corners_near_the_vertices() {
        let points = square_contour(0.0, 80);
        let bbox = geometry::bounding_box(&points);
        let corners = curvature_corners(&points, 4, &bbox);
        assert_eq!(corners.len(), 4);

        for expected in [
            Point::new(0.0, 0.0),
            Point::new(80.0, 0.0),
            Point::new(80.0, 80.0),
            Point::new(0.0, 80.0),
        ] {
            let nearest = corners
                .iter()
                .map(|c| c.distance(expected))
                .fold(f64::INFINITY, f64::min);
            // Subsampling may land a few pixels off the exact vertex.
            assert!(
                nearest <= 8.0,
                "no corner near ({}, {}), corners: {corners:?}",
                expected.x,
                expected.y,
            );
        }
    }

    #[test]
    fn corners_respect_minimum_separation() {
        let points = square_contour(10.0, 60);
        let bbox = geometry::bounding_box(&points);
        let corners = curvature_corners(&points, 4, &bbox);
        let min_separation = 0.2 * bbox.width.min(bbox.height);
        for (i, a) in corners.iter().enumerate() {
            for b in &corners[i + 1..] {
                assert!(a.distance(*b) >= min_separation);
            }
        }
    }

    #[test]
    fn triangle_yields_three_corners_sharpest_first() {
        // Right triangle: the acute 45-degree vertices turn harder than
        // the right angle and are selected before it.
        let mut points = Vec::new();
        for i in 0..60 {
            points.push(Point::new(f64::from(i), 0.0));
        }
        for i in 0..60 {
            points.push(Point::new(f64::from(60 - i), f64::from(i)));
        }
        for i in 0..60 {
            points.push(Point::new(0.0, f64::from(60 - i)));
        }
        let bbox = geometry::bounding_box(&points);
        let corners = curvature_corners(&points, 3, &bbox);
        assert_eq!(corners.len(), 3);
        assert!(
            corners[0].distance(Point::new(60.0, 0.0)) <= 10.0,
            "sharpest corner should be an acute vertex, got {corners:?}",
        );
        for expected in [Point::new(0.0, 0.0), Point::new(0.0, 60.0)] {
            let nearest = corners
                .iter()
                .map(|c| c.distance(expected))
                .fold(f64::INFINITY, f64::min);
            assert!(nearest <= 10.0, "no corner near ({}, {})", expected.x, expected.y);
        }
    }
}
