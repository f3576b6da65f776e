//! Incremental detection pipeline: advance stage-by-stage, inspecting
//! each intermediate buffer before continuing.
//!
//! [`crate::detect`] drives the whole chain in one call; callers that
//! want to look at an individual stage's output can step manually:
//!
//! ```rust
//! # use pagebound::{DetectOptions, DetectError};
//! # fn run(rgba: &[u8]) -> Result<(), DetectError> {
//! let result = pagebound::Pipeline::new(64, 64, rgba, DetectOptions::default())?
//!     .grayscale()?
//!     .blur()?
//!     .detect_edges()?
//!     .threshold()?
//!     .assemble_mask()?
//!     .trace_contours()
//!     .classify()
//!     .into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state,
//! carrying the buffers later stages and the final result still need.
//! Buffers that no longer contribute (the blurred grayscale after
//! thresholding) are dropped at the earliest opportunity.
//!
//! Every buffer is owned by the current invocation; nothing is shared
//! between calls, so independent rasters can be processed on separate
//! threads without coordination.

use crate::classify;
use crate::contour;
use crate::mask;
use crate::threshold;
use crate::types::{
    Boundary, Contour, DetectError, DetectOptions, DetectionResult, DetectionStats, GrayImage,
    Intermediates, PROCESSING_PIPELINE,
};

/// Check that a raster's dimensions and pixel buffer are consistent.
///
/// # Errors
///
/// Returns [`DetectError::InvalidInput`] when a dimension is zero or
/// the buffer length is not `4 * width * height`.
pub(crate) fn validate_raster(width: u32, height: u32, rgba: &[u8]) -> Result<(), DetectError> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidInput(format!(
            "raster dimensions must be positive, got {width}x{height}",
        )));
    }
    let expected = 4 * u64::from(width) * u64::from(height);
    if rgba.len() as u64 != expected {
        return Err(DetectError::InvalidInput(format!(
            "pixel buffer length {} does not match {width}x{height} RGBA (expected {expected})",
            rgba.len(),
        )));
    }
    Ok(())
}

// ───────────────────────── Stage 0: Pipeline ─────────────────────────

/// Pipeline state before any processing has occurred.
///
/// The raster is borrowed, not copied; it is only read during the
/// grayscale stage.
#[must_use = "pipeline stages are consumed by advancing — call .grayscale() to continue"]
pub struct Pipeline<'a> {
    options: DetectOptions,
    width: u32,
    height: u32,
    rgba: &'a [u8],
}

impl<'a> Pipeline<'a> {
    /// Validate the raster and options and set up a pipeline run.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::InvalidInput`] for inconsistent raster
    /// dimensions or out-of-range options.
    pub fn new(
        width: u32,
        height: u32,
        rgba: &'a [u8],
        options: DetectOptions,
    ) -> Result<Self, DetectError> {
        validate_raster(width, height, rgba)?;
        options.validate()?;
        Ok(Self {
            options,
            width,
            height,
            rgba,
        })
    }

    /// Convert the raster to grayscale and advance.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::OutOfMemory`] if the buffer cannot be
    /// allocated.
    pub fn grayscale(self) -> Result<Grayscaled, DetectError> {
        let gray = crate::grayscale::luminance(self.width, self.height, self.rgba)?;
        Ok(Grayscaled {
            options: self.options,
            gray,
        })
    }
}

// ───────────────────────── Stage 1: Grayscaled ───────────────────────

/// Pipeline state after grayscale conversion.
#[must_use = "pipeline stages are consumed by advancing — call .blur() to continue"]
pub struct Grayscaled {
    options: DetectOptions,
    gray: GrayImage,
}

impl Grayscaled {
    /// The grayscale buffer.
    #[must_use]
    pub const fn grayscale(&self) -> &GrayImage {
        &self.gray
    }

    /// Apply Gaussian blur and advance.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::OutOfMemory`] if a buffer cannot be
    /// allocated.
    pub fn blur(self) -> Result<Blurred, DetectError> {
        let blurred = crate::blur::gaussian_blur(&self.gray, self.options.blur_radius)?;
        Ok(Blurred {
            options: self.options,
            gray: self.gray,
            blurred,
        })
    }
}

// ───────────────────────── Stage 2: Blurred ──────────────────────────

/// Pipeline state after Gaussian blur.
#[must_use = "pipeline stages are consumed by advancing — call .detect_edges() to continue"]
pub struct Blurred {
    options: DetectOptions,
    gray: GrayImage,
    blurred: GrayImage,
}

impl Blurred {
    /// The blurred grayscale buffer.
    #[must_use]
    pub const fn blurred(&self) -> &GrayImage {
        &self.blurred
    }

    /// Compute Sobel gradient magnitude and advance.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::OutOfMemory`] if the buffer cannot be
    /// allocated.
    pub fn detect_edges(self) -> Result<EdgesDetected, DetectError> {
        let edges = crate::edge::sobel_magnitude(&self.blurred)?;
        Ok(EdgesDetected {
            options: self.options,
            gray: self.gray,
            blurred: self.blurred,
            edges,
        })
    }
}

// ───────────────────────── Stage 3: EdgesDetected ────────────────────

/// Pipeline state after Sobel edge detection.
#[must_use = "pipeline stages are consumed by advancing — call .threshold() to continue"]
pub struct EdgesDetected {
    options: DetectOptions,
    gray: GrayImage,
    blurred: GrayImage,
    edges: GrayImage,
}

impl EdgesDetected {
    /// The gradient magnitude buffer.
    #[must_use]
    pub const fn edges(&self) -> &GrayImage {
        &self.edges
    }

    /// Binarize the blurred grayscale against its local mean and
    /// advance. The blurred buffer is no longer needed afterwards and
    /// is dropped here.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::OutOfMemory`] if a buffer cannot be
    /// allocated.
    pub fn threshold(self) -> Result<Thresholded, DetectError> {
        let thresholded = threshold::adaptive_mean(
            &self.blurred,
            threshold::BLOCK_SIZE,
            threshold::OFFSET_C,
        )?;
        Ok(Thresholded {
            options: self.options,
            gray: self.gray,
            edges: self.edges,
            threshold: thresholded,
        })
    }
}

// ───────────────────────── Stage 4: Thresholded ──────────────────────

/// Pipeline state after adaptive thresholding.
#[must_use = "pipeline stages are consumed by advancing — call .assemble_mask() to continue"]
pub struct Thresholded {
    options: DetectOptions,
    gray: GrayImage,
    edges: GrayImage,
    threshold: GrayImage,
}

impl Thresholded {
    /// The binary threshold mask.
    #[must_use]
    pub const fn threshold(&self) -> &GrayImage {
        &self.threshold
    }

    /// OR-combine the edge and threshold maps, close the result, and
    /// advance.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::OutOfMemory`] if a buffer cannot be
    /// allocated.
    pub fn assemble_mask(self) -> Result<Masked, DetectError> {
        let combined = mask::combine(&self.edges, &self.threshold, self.options.edge_threshold)?;
        let dilated = mask::dilate(&combined, mask::DILATE_RADIUS)?;
        let processed = mask::erode(&dilated, mask::ERODE_RADIUS)?;
        Ok(Masked {
            options: self.options,
            gray: self.gray,
            edges: self.edges,
            threshold: self.threshold,
            processed,
        })
    }
}

// ───────────────────────── Stage 5: Masked ───────────────────────────

/// Pipeline state after mask assembly and morphological closing.
#[must_use = "pipeline stages are consumed by advancing — call .trace_contours() to continue"]
pub struct Masked {
    options: DetectOptions,
    gray: GrayImage,
    edges: GrayImage,
    threshold: GrayImage,
    processed: GrayImage,
}

impl Masked {
    /// The processed binary mask.
    #[must_use]
    pub const fn processed(&self) -> &GrayImage {
        &self.processed
    }

    /// Trace region boundaries in the processed mask and advance.
    ///
    /// A mask with no traceable regions is not an error; the contour
    /// list is simply empty.
    pub fn trace_contours(self) -> ContoursTraced {
        let contours = contour::trace_contours(&self.processed);
        tracing::debug!(contour_count = contours.len(), "traced mask contours");
        ContoursTraced {
            options: self.options,
            gray: self.gray,
            edges: self.edges,
            threshold: self.threshold,
            processed: self.processed,
            contours,
        }
    }
}

// ───────────────────────── Stage 6: ContoursTraced ───────────────────

/// Pipeline state after contour tracing.
#[must_use = "pipeline stages are consumed by advancing — call .classify() to continue"]
pub struct ContoursTraced {
    options: DetectOptions,
    gray: GrayImage,
    edges: GrayImage,
    threshold: GrayImage,
    processed: GrayImage,
    contours: Vec<Contour>,
}

impl ContoursTraced {
    /// The traced contours.
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Filter, approximate, deduplicate, and label the contours — the
    /// final processing step.
    pub fn classify(self) -> Classified {
        let (width, height) = self.gray.dimensions();
        let (boundaries, candidate_count) =
            classify::build_boundaries(&self.contours, width, height, &self.options);
        Classified {
            gray: self.gray,
            edges: self.edges,
            threshold: self.threshold,
            processed: self.processed,
            contour_count: self.contours.len(),
            candidate_count,
            boundaries,
        }
    }
}

// ───────────────────────── Stage 7: Classified ───────────────────────

/// Final pipeline state: boundaries are filtered and labeled.
#[must_use = "call .into_result() to extract the DetectionResult"]
pub struct Classified {
    gray: GrayImage,
    edges: GrayImage,
    threshold: GrayImage,
    processed: GrayImage,
    contour_count: usize,
    candidate_count: usize,
    boundaries: Vec<Boundary>,
}

impl Classified {
    /// The detected boundaries.
    #[must_use]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Consume the pipeline and return the full [`DetectionResult`].
    #[must_use]
    pub fn into_result(self) -> DetectionResult {
        DetectionResult {
            stats: DetectionStats {
                total_detected: self.boundaries.len(),
                contour_count: self.contour_count,
                candidate_count: self.candidate_count,
                processing_pipeline: PROCESSING_PIPELINE,
            },
            boundaries: self.boundaries,
            intermediate: Intermediates {
                grayscale: self.gray,
                edges: self.edges,
                threshold: self.threshold,
                processed: self.processed,
            },
        }
    }
}
