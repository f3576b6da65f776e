//! pagebound: document-boundary detection on raw RGBA rasters (sans-IO).
//!
//! Locates the convex quadrilateral (or near-quadrilateral) outlines of
//! documents, book pages, or paper sheets in an in-memory raster
//! through a fixed-topology classical pipeline:
//! grayscale -> Gaussian blur -> (Sobel magnitude, adaptive threshold)
//! -> combined mask -> morphological close -> contour tracing ->
//! polygon approximation -> filtering + classification.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. Decoding image files into
//! RGBA and rendering the detected boundaries are the caller's job.
//!
//! Detection is deterministic: the same raster and options always
//! produce bit-identical intermediate buffers and structurally
//! identical boundaries. A single call owns all of its allocations, so
//! independent rasters can be processed concurrently on separate
//! threads.

pub mod blur;
pub mod classify;
pub mod contour;
pub mod corners;
pub mod edge;
pub mod geometry;
pub mod grayscale;
pub mod mask;
pub mod pipeline;
pub mod simplify;
mod strategy;
pub mod threshold;
pub mod types;

pub use pipeline::Pipeline;
pub use types::{
    Boundary, BoundaryKind, BoundingBox, Contour, DetectError, DetectOptions, DetectionResult,
    DetectionStats, GrayImage, Intermediates, Point, PROCESSING_PIPELINE,
};

/// Detect document boundaries in an RGBA raster.
///
/// `rgba` is interleaved 8-bit RGBA, row-major, top-left origin, of
/// length `4 * width * height`.
///
/// Returns a [`DetectionResult`] with the boundaries sorted by area
/// descending, every intermediate buffer, and summary counters. Finding
/// no boundary is not an error: the result simply has an empty
/// boundary list.
///
/// # Errors
///
/// Returns [`DetectError::InvalidInput`] for inconsistent raster
/// dimensions or out-of-range options, and [`DetectError::OutOfMemory`]
/// if an intermediate buffer cannot be allocated.
pub fn detect(
    width: u32,
    height: u32,
    rgba: &[u8],
    options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    Ok(Pipeline::new(width, height, rgba, *options)?
        .grayscale()?
        .blur()?
        .detect_edges()?
        .threshold()?
        .assemble_mask()?
        .trace_contours()
        .classify()
        .into_result())
}

/// Detect document boundaries, retrying with alternative parameter
/// sets.
///
/// Runs [`detect`] with the base options and then with a fixed sequence
/// of overrides, returning the first result containing a quadrilateral
/// boundary. If no run produces one, the best run wins (most
/// quadrilaterals, then most boundaries, earliest on ties). A run that
/// fails is logged and skipped.
///
/// # Errors
///
/// Returns [`DetectError::InvalidInput`] when the raster or the base
/// options are invalid.
pub fn detect_enhanced(
    width: u32,
    height: u32,
    rgba: &[u8],
    options: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    strategy::run(width, height, rgba, options)
}
