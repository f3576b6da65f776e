//! Moore-neighbor contour tracing over a binary mask.
//!
//! The scanner walks the interior of the mask in row-major order and
//! starts a trace at every unvisited white pixel whose left neighbor is
//! background (the left edge of a white region). Each trace follows the
//! region boundary clockwise through the 8-neighborhood until it
//! returns to its starting pixel, runs out of white neighbors, or
//! exhausts its step budget.

use crate::types::{Contour, GrayImage, Point};

/// Minimum number of points for a trace to count as a contour.
pub const MIN_CONTOUR_POINTS: usize = 20;

/// Neighbor offsets in clockwise order starting with east.
const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Trace region boundaries in a binary mask.
///
/// Returns one contour per traced region, in scan order. Traces shorter
/// than [`MIN_CONTOUR_POINTS`] and traces that exhaust the step budget
/// of `width * height` are dropped. Regions flush with the image's left
/// border have no background pixel to their left and are never started.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trace_contours(mask: &GrayImage) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w < 3 || h < 3 {
        return Vec::new();
    }

    let src = mask.as_raw();
    let mut visited = vec![false; w * h];
    let mut contours = Vec::new();

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            if src[i] != 255 || visited[i] || src[i - 1] != 0 {
                continue;
            }
            if let Some(points) = trace_from(src, w, h, (x, y), &mut visited) {
                if points.len() >= MIN_CONTOUR_POINTS {
                    let points = points
                        .into_iter()
                        .map(|(px, py)| Point::new(px as f64, py as f64))
                        .collect();
                    contours.push(Contour::new(points));
                }
            }
        }
    }

    contours
}

/// Follow one region boundary starting at `start`.
///
/// Returns `None` when the step budget runs out mid-trace (the partial
/// contour is discarded; visited marks are kept so the scanner does not
/// retry the same pixels). A closed trace repeats the starting pixel as
/// its final point.
fn trace_from(
    src: &[u8],
    w: usize,
    h: usize,
    start: (usize, usize),
    visited: &mut [bool],
) -> Option<Vec<(usize, usize)>> {
    let mut points = vec![start];
    visited[start.1 * w + start.0] = true;

    let mut current = start;
    let mut direction = 0usize;
    let budget = w * h;

    for _ in 0..budget {
        let mut advanced = false;
        // Resume two positions counterclockwise of the previous move and
        // sweep clockwise.
        for step in 0..8 {
            let d = (direction + 6 + step) % 8;
            let (dx, dy) = NEIGHBORS[d];
            let nx = current.0 as i64 + dx;
            let ny = current.1 as i64 + dy;
            if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                continue;
            }
            let next = (nx as usize, ny as usize);
            if src[next.1 * w + next.0] != 255 {
                continue;
            }
            if next == start {
                points.push(start);
                return Some(points);
            }
            visited[next.1 * w + next.0] = true;
            points.push(next);
            current = next;
            direction = d;
            advanced = true;
            break;
        }
        if !advanced {
            // Dead end: the region has no further white neighbor here.
            return Some(points);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn empty_mask_produces_no_contours() {
        let mask = GrayImage::new(30, 30);
        assert!(trace_contours(&mask).is_empty());
    }

    #[test]
    fn filled_rectangle_produces_one_closed_contour() {
        let mask = mask_with_rect(40, 30, 5, 5, 30, 20);
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);

        let points = contours[0].points();
        assert!(points.len() >= MIN_CONTOUR_POINTS);
        // Starts at the top-left region pixel and closes on it.
        assert_eq!(points[0], Point::new(5.0, 5.0));
        assert_eq!(*points.last().expect("non-empty"), points[0]);
        // Every traced point lies on the region border.
        for p in points {
            let on_border = p.x == 5.0 || p.x == 30.0 || p.y == 5.0 || p.y == 20.0;
            assert!(on_border, "interior point ({}, {}) in contour", p.x, p.y);
        }
    }

    #[test]
    fn trace_visits_all_four_extremes() {
        let mask = mask_with_rect(50, 50, 10, 10, 40, 35);
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 1);
        let points = contours[0].points();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        assert!(xs.iter().any(|&x| x == 10.0) && xs.iter().any(|&x| x == 40.0));
        assert!(ys.iter().any(|&y| y == 10.0) && ys.iter().any(|&y| y == 35.0));
    }

    #[test]
    fn small_blob_is_dropped() {
        // A 3x3 blob traces 8 boundary pixels plus closure, well under
        // the minimum.
        let mask = mask_with_rect(20, 20, 8, 8, 10, 10);
        assert!(trace_contours(&mask).is_empty());
    }

    #[test]
    fn two_regions_produce_two_contours_in_scan_order() {
        let mut mask = mask_with_rect(60, 25, 4, 4, 20, 20);
        for y in 4..=20 {
            for x in 35..=51 {
                mask.put_pixel(x, y, image::Luma([255]));
            }
        }
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
        // Scan order: the left region is found first.
        assert!(contours[0].points()[0].x < contours[1].points()[0].x);
    }

    #[test]
    fn region_flush_with_left_border_is_not_traced() {
        // No background pixel to the left of the region's left edge, so
        // no start condition ever fires.
        let mask = mask_with_rect(30, 30, 0, 5, 12, 25);
        assert!(trace_contours(&mask).is_empty());
    }

    #[test]
    fn ring_region_produces_outer_and_inner_contours() {
        // A 2-pixel-thick rectangular ring: the outer boundary is traced
        // first; the hole's right side then starts a second trace along
        // the interior boundary.
        let mut mask = mask_with_rect(60, 60, 10, 10, 49, 49);
        for y in 12..=47 {
            for x in 12..=47 {
                mask.put_pixel(x, y, image::Luma([0]));
            }
        }
        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points()[0], Point::new(10.0, 10.0));
        // The inner trace starts on the hole's far side.
        assert_eq!(contours[1].points()[0].x, 48.0);
    }

    #[test]
    fn tiny_mask_is_ignored() {
        let mask = GrayImage::from_fn(2, 2, |_, _| image::Luma([255]));
        assert!(trace_contours(&mask).is_empty());
    }
}
