//! Candidate filtering, vertex ordering, overlap suppression, and
//! document-role labeling.
//!
//! Contours surviving the area and aspect gates are approximated to
//! small polygons, deduplicated by bounding-box overlap, and finally
//! labeled as a single document, plain documents, or the two pages of a
//! book spread.

use std::cmp::Ordering;

use crate::geometry;
use crate::simplify;
use crate::types::{Boundary, BoundaryKind, BoundingBox, Contour, DetectOptions, Point};

/// Narrowest acceptable bounding-box aspect ratio.
pub const MIN_ASPECT_RATIO: f64 = 0.3;

/// Widest acceptable bounding-box aspect ratio.
pub const MAX_ASPECT_RATIO: f64 = 3.5;

/// Bounding-box IoU above which the smaller boundary is suppressed.
pub const MAX_OVERLAP_IOU: f64 = 0.5;

/// Two pages read as a spread when their gap is below this fraction of
/// their average width and their heights differ by less than the same
/// fraction of their average height.
const SPREAD_TOLERANCE: f64 = 0.3;

/// Contour measurements the per-contour filter gates on.
struct ContourMetrics {
    area: f64,
    bounding_rect: BoundingBox,
    aspect_ratio: f64,
}

/// Gate a contour on area and aspect before any approximation work.
fn filter_contour(contour: &Contour, image_area: f64, options: &DetectOptions) -> Option<ContourMetrics> {
    let points = contour.points();
    let area = geometry::polygon_area(points);
    if area < options.min_area_ratio * image_area || area > options.max_area_ratio * image_area {
        return None;
    }

    let bounding_rect = geometry::bounding_box(points);
    if bounding_rect.height == 0.0 {
        return None;
    }
    let aspect_ratio = bounding_rect.width / bounding_rect.height;
    if !(MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&aspect_ratio) {
        return None;
    }

    Some(ContourMetrics {
        area,
        bounding_rect,
        aspect_ratio,
    })
}

/// Order the four vertices of a quadrilateral counterclockwise on
/// screen, starting from the vertex with the smallest `x + y`.
#[must_use]
pub fn order_quad(mut points: Vec<Point>) -> Vec<Point> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    // With the origin at the top-left, descending atan2 walks the
    // vertices counterclockwise as the viewer sees them.
    points.sort_by(|a, b| {
        let ta = (a.y - cy).atan2(a.x - cx);
        let tb = (b.y - cy).atan2(b.x - cx);
        tb.partial_cmp(&ta).unwrap_or(Ordering::Equal)
    });

    let first = points
        .iter()
        .enumerate()
        .min_by(|(_, p), (_, q)| {
            (p.x + p.y)
                .partial_cmp(&(q.x + q.y))
                .unwrap_or(Ordering::Equal)
        })
        .map_or(0, |(i, _)| i);
    points.rotate_left(first);
    points
}

/// Turn traced contours into classified boundaries.
///
/// Returns the final boundary list (largest first, no overlapping pair)
/// and the number of candidates that entered overlap suppression.
#[must_use]
pub fn build_boundaries(
    contours: &[Contour],
    width: u32,
    height: u32,
    options: &DetectOptions,
) -> (Vec<Boundary>, usize) {
    let image_area = f64::from(width) * f64::from(height);

    let mut candidates = Vec::new();
    for contour in contours {
        let Some(metrics) = filter_contour(contour, image_area, options) else {
            continue;
        };
        let Some(approx) = simplify::approximate_polygon(contour, &metrics.bounding_rect) else {
            continue;
        };
        let points = if approx.len() == 4 {
            order_quad(approx)
        } else {
            approx
        };
        let is_convex = geometry::is_convex(&points);
        candidates.push(Boundary {
            num_vertices: points.len(),
            points,
            area: metrics.area,
            aspect_ratio: metrics.aspect_ratio,
            bounding_rect: metrics.bounding_rect,
            is_convex,
            kind: BoundaryKind::Document,
        });
    }

    let candidate_count = candidates.len();
    let mut boundaries = suppress_overlaps(candidates);
    classify_kinds(&mut boundaries);
    (boundaries, candidate_count)
}

/// Drop every boundary whose bounding box overlaps an accepted larger
/// one by more than [`MAX_OVERLAP_IOU`].
///
/// Boundaries are considered largest first (ties keep insertion order),
/// so the output is sorted by area descending. Idempotent: accepted
/// boundaries never overlap each other above the cutoff.
#[must_use]
pub fn suppress_overlaps(mut boundaries: Vec<Boundary>) -> Vec<Boundary> {
    boundaries.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(Ordering::Equal));

    let mut accepted: Vec<Boundary> = Vec::with_capacity(boundaries.len());
    for boundary in boundaries {
        let overlaps = accepted.iter().any(|kept| {
            geometry::bbox_iou(&kept.bounding_rect, &boundary.bounding_rect) > MAX_OVERLAP_IOU
        });
        if !overlaps {
            accepted.push(boundary);
        }
    }
    accepted
}

/// Assign document roles.
///
/// A lone boundary is the single document. Otherwise adjacent pairs in
/// left-to-right order that sit close together with matching heights
/// become the left and right pages of a spread; everything else stays a
/// plain document.
pub fn classify_kinds(boundaries: &mut [Boundary]) {
    if boundaries.len() == 1 {
        boundaries[0].kind = BoundaryKind::SingleDocument;
        return;
    }

    let mut order: Vec<usize> = (0..boundaries.len()).collect();
    order.sort_by(|&a, &b| {
        boundaries[a]
            .bounding_rect
            .x
            .partial_cmp(&boundaries[b].bounding_rect.x)
            .unwrap_or(Ordering::Equal)
    });

    for pair in order.windows(2) {
        let (li, ri) = (pair[0], pair[1]);
        if boundaries[li].kind != BoundaryKind::Document
            || boundaries[ri].kind != BoundaryKind::Document
        {
            continue;
        }
        let left = &boundaries[li].bounding_rect;
        let right = &boundaries[ri].bounding_rect;

        let gap = right.x - left.right();
        let avg_width = (left.width + right.width) / 2.0;
        let height_diff = (left.height - right.height).abs();
        let avg_height = (left.height + right.height) / 2.0;

        if gap < SPREAD_TOLERANCE * avg_width && height_diff < SPREAD_TOLERANCE * avg_height {
            boundaries[li].kind = BoundaryKind::BookSpreadLeft;
            boundaries[ri].kind = BoundaryKind::BookSpreadRight;
        }
    }
}
