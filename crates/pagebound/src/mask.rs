//! Binary mask assembly and square-kernel morphology.
//!
//! The edge and threshold maps are OR-combined into a single mask,
//! which is then closed (dilate, erode) to bridge small gaps in the
//! document outline. Mask values are always 0 or 255.

use crate::types::{gray_from_vec, try_vec, DetectError, GrayImage};

/// Dilation radius applied to the combined mask.
pub const DILATE_RADIUS: u32 = 2;

/// Erosion radius applied after dilation.
pub const ERODE_RADIUS: u32 = 1;

/// OR-combine the edge magnitude map and the threshold mask.
///
/// A pixel is white when its edge magnitude exceeds `edge_threshold`
/// or its threshold mask value exceeds 128. Both inputs have identical
/// dimensions.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if the output buffer cannot be
/// allocated.
pub fn combine(
    edges: &GrayImage,
    threshold: &GrayImage,
    edge_threshold: u8,
) -> Result<GrayImage, DetectError> {
    let (width, height) = edges.dimensions();
    let e = edges.as_raw();
    let t = threshold.as_raw();
    let mut out = try_vec::<u8>(e.len())?;
    for (i, value) in out.iter_mut().enumerate() {
        *value = if e[i] > edge_threshold || t[i] > 128 {
            255
        } else {
            0
        };
    }
    gray_from_vec(width, height, out)
}

/// Morphological dilation with a square structuring element.
///
/// Each output pixel is the maximum over the `(2r+1)^2` neighborhood.
/// Border replication cannot introduce values the in-bounds window does
/// not already contain, so the scan stays in bounds.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if the output buffer cannot be
/// allocated.
pub fn dilate(input: &GrayImage, radius: u32) -> Result<GrayImage, DetectError> {
    morph(input, radius, true)
}

/// Morphological erosion with a square structuring element.
///
/// Each output pixel is the minimum over the `(2r+1)^2` neighborhood.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if the output buffer cannot be
/// allocated.
pub fn erode(input: &GrayImage, radius: u32) -> Result<GrayImage, DetectError> {
    morph(input, radius, false)
}

fn morph(input: &GrayImage, radius: u32, take_max: bool) -> Result<GrayImage, DetectError> {
    let (width, height) = input.dimensions();
    let (w, h) = (width as usize, height as usize);
    let r = radius as usize;
    let src = input.as_raw();
    let mut out = try_vec::<u8>(w * h)?;

    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r).min(h.saturating_sub(1));
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r).min(w.saturating_sub(1));

            let mut value = if take_max { 0u8 } else { 255u8 };
            for sy in y0..=y1 {
                for sx in x0..=x1 {
                    let sample = src[sy * w + sx];
                    value = if take_max {
                        value.max(sample)
                    } else {
                        value.min(sample)
                    };
                }
            }
            out[y * w + x] = value;
        }
    }

    gray_from_vec(width, height, out)
}
