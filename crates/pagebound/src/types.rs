//! Shared types for the pagebound detection pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate raster data without depending on `image` directly.
pub use image::GrayImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An ordered sequence of boundary pixels tracing the outer edge of a
/// connected white region in a binary mask.
///
/// The first point is the trace's starting pixel; for a closed trace the
/// last point repeats the starting pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    /// Create a new contour from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the contour has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the contour.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the contour and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// An axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent (non-negative).
    pub width: f64,
    /// Vertical extent (non-negative).
    pub height: f64,
}

impl BoundingBox {
    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Enclosed area (`width * height`).
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// The document layout role assigned to a detected boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryKind {
    /// The only boundary in the image.
    SingleDocument,
    /// One of several boundaries, not part of a book spread.
    Document,
    /// Left page of a detected book spread.
    BookSpreadLeft,
    /// Right page of a detected book spread.
    BookSpreadRight,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleDocument => f.write_str("single-document"),
            Self::Document => f.write_str("document"),
            Self::BookSpreadLeft => f.write_str("book-spread-left"),
            Self::BookSpreadRight => f.write_str("book-spread-right"),
        }
    }
}

/// A detected document outline.
///
/// `area`, `bounding_rect`, and `aspect_ratio` describe the traced
/// contour the boundary was filtered on; `points`, `num_vertices`, and
/// `is_convex` describe its polygon approximation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Polygon vertices, 4 to 8 of them. A 4-vertex boundary is ordered
    /// counterclockwise on screen starting from the vertex with the
    /// smallest `x + y`.
    pub points: Vec<Point>,
    /// Enclosed area of the source contour in pixels.
    pub area: f64,
    /// `bounding_rect.width / bounding_rect.height`.
    pub aspect_ratio: f64,
    /// Number of polygon vertices (`points.len()`).
    pub num_vertices: usize,
    /// Axis-aligned bounding rectangle of the source contour.
    pub bounding_rect: BoundingBox,
    /// Whether the polygon approximation is convex.
    pub is_convex: bool,
    /// Layout role assigned during classification.
    pub kind: BoundaryKind,
}

/// Configuration for a single detection run.
///
/// All parameters have documented defaults. Deserialization ignores
/// unknown fields and falls back to the defaults for missing ones, so
/// configs from older or newer callers keep working.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectOptions {
    /// Minimum fraction of the image area a boundary must cover.
    #[serde(default = "DetectOptions::default_min_area_ratio")]
    pub min_area_ratio: f64,

    /// Maximum fraction of the image area a boundary may cover.
    #[serde(default = "DetectOptions::default_max_area_ratio")]
    pub max_area_ratio: f64,

    /// Sobel magnitude above which a pixel counts as an edge when the
    /// edge and threshold maps are combined.
    #[serde(default = "DetectOptions::default_edge_threshold")]
    pub edge_threshold: u8,

    /// Gaussian blur kernel radius. The kernel spans `2 * radius + 1`
    /// pixels per axis with `sigma = radius / 2`.
    #[serde(default = "DetectOptions::default_blur_radius")]
    pub blur_radius: u32,
}

impl DetectOptions {
    /// Default minimum boundary area as a fraction of the image.
    pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.02;
    /// Default maximum boundary area as a fraction of the image.
    pub const DEFAULT_MAX_AREA_RATIO: f64 = 0.95;
    /// Default Sobel magnitude threshold for the combine stage.
    pub const DEFAULT_EDGE_THRESHOLD: u8 = 50;
    /// Default Gaussian blur radius.
    pub const DEFAULT_BLUR_RADIUS: u32 = 2;

    // Serde default helpers — serde's per-field `#[serde(default)]` uses
    // the *type's* `Default`, which is wrong for `f64` (0.0) and `u32`
    // (0). These functions return the detection-specific defaults.
    const fn default_min_area_ratio() -> f64 {
        Self::DEFAULT_MIN_AREA_RATIO
    }
    const fn default_max_area_ratio() -> f64 {
        Self::DEFAULT_MAX_AREA_RATIO
    }
    const fn default_edge_threshold() -> u8 {
        Self::DEFAULT_EDGE_THRESHOLD
    }
    const fn default_blur_radius() -> u32 {
        Self::DEFAULT_BLUR_RADIUS
    }

    /// Validate that all fields satisfy the documented invariants.
    ///
    /// `min_area_ratio > max_area_ratio` is deliberately *not* rejected:
    /// it is a valid (if unusual) configuration that filters out every
    /// candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidInput`] with a human-readable
    /// message describing the first violated constraint.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(self.min_area_ratio > 0.0 && self.min_area_ratio < 1.0) {
            return Err(DetectError::InvalidInput(format!(
                "min_area_ratio must be in (0, 1), got {}",
                self.min_area_ratio,
            )));
        }
        if !(self.max_area_ratio > 0.0 && self.max_area_ratio < 1.0) {
            return Err(DetectError::InvalidInput(format!(
                "max_area_ratio must be in (0, 1), got {}",
                self.max_area_ratio,
            )));
        }
        if self.blur_radius == 0 {
            return Err(DetectError::InvalidInput(
                "blur_radius must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            min_area_ratio: Self::DEFAULT_MIN_AREA_RATIO,
            max_area_ratio: Self::DEFAULT_MAX_AREA_RATIO,
            edge_threshold: Self::DEFAULT_EDGE_THRESHOLD,
            blur_radius: Self::DEFAULT_BLUR_RADIUS,
        }
    }
}

/// Intermediate single-channel buffers preserved from a detection run,
/// keyed by stage label.
///
/// Note: does not derive serde traits because `GrayImage` does not
/// implement them.
#[derive(Debug, Clone)]
pub struct Intermediates {
    /// Luminance conversion of the input raster.
    pub grayscale: GrayImage,
    /// Sobel gradient magnitude of the blurred grayscale.
    pub edges: GrayImage,
    /// Adaptive mean threshold of the blurred grayscale (binary).
    pub threshold: GrayImage,
    /// Combined mask after morphological closing (binary).
    pub processed: GrayImage,
}

impl Intermediates {
    /// Look up an intermediate buffer by its stage label.
    ///
    /// Recognized labels: `"grayscale"`, `"edges"`, `"threshold"`,
    /// `"processed"`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&GrayImage> {
        match label {
            "grayscale" => Some(&self.grayscale),
            "edges" => Some(&self.edges),
            "threshold" => Some(&self.threshold),
            "processed" => Some(&self.processed),
            _ => None,
        }
    }

    /// Zero-sized placeholder buffers, used when no pipeline run
    /// produced intermediates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            grayscale: GrayImage::new(0, 0),
            edges: GrayImage::new(0, 0),
            threshold: GrayImage::new(0, 0),
            processed: GrayImage::new(0, 0),
        }
    }
}

/// The fixed stage sequence every detection run executes.
pub const PROCESSING_PIPELINE: &[&str] = &[
    "grayscale",
    "blur",
    "edges",
    "threshold",
    "contours",
    "filter",
];

/// Summary counters from a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionStats {
    /// Number of boundaries in the final result.
    pub total_detected: usize,
    /// Number of contours traced from the processed mask.
    pub contour_count: usize,
    /// Number of candidates that survived filtering and approximation,
    /// before overlap suppression.
    pub candidate_count: usize,
    /// The fixed stage sequence ([`PROCESSING_PIPELINE`]).
    pub processing_pipeline: &'static [&'static str],
}

/// Result of a detection run.
///
/// Contains the detected boundaries sorted by area descending, every
/// named intermediate buffer, and summary counters.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Detected boundaries, largest first, with no overlapping pair.
    pub boundaries: Vec<Boundary>,
    /// Intermediate buffers keyed by stage label.
    pub intermediate: Intermediates,
    /// Summary counters.
    pub stats: DetectionStats,
}

impl DetectionResult {
    /// A result with no boundaries and no intermediates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            boundaries: Vec::new(),
            intermediate: Intermediates::empty(),
            stats: DetectionStats {
                total_detected: 0,
                contour_count: 0,
                candidate_count: 0,
                processing_pipeline: PROCESSING_PIPELINE,
            },
        }
    }
}

/// Errors that can occur during detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    /// Raster dimensions or pixel data are inconsistent, or an option
    /// is out of its permitted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An intermediate buffer could not be allocated.
    #[error("failed to allocate an intermediate buffer")]
    OutOfMemory,
}

/// Allocate a zeroed scratch vector, surfacing allocation failure
/// instead of aborting.
pub(crate) fn try_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>, DetectError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| DetectError::OutOfMemory)?;
    data.resize(len, T::default());
    Ok(data)
}

/// Wrap a filled pixel vector in a [`GrayImage`].
pub(crate) fn gray_from_vec(
    width: u32,
    height: u32,
    data: Vec<u8>,
) -> Result<GrayImage, DetectError> {
    GrayImage::from_raw(width, height, data).ok_or(DetectError::OutOfMemory)
}
