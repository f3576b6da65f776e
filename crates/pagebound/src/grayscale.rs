//! Luminance extraction from interleaved RGBA pixel data.
//!
//! This is the first pipeline stage: raw RGBA bytes in, single-channel
//! `GrayImage` out. The alpha channel is ignored.

use crate::types::{gray_from_vec, try_vec, DetectError, GrayImage};

/// Convert an interleaved 8-bit RGBA raster to grayscale.
///
/// Uses the standard luminance weights `0.299*R + 0.587*G + 0.114*B`,
/// rounded to the nearest integer. The caller guarantees
/// `rgba.len() == 4 * width * height`.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if the output buffer cannot be
/// allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn luminance(width: u32, height: u32, rgba: &[u8]) -> Result<GrayImage, DetectError> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or(DetectError::OutOfMemory)?;
    let mut out = try_vec::<u8>(len)?;

    for (i, value) in out.iter_mut().enumerate() {
        let r = f64::from(rgba[4 * i]);
        let g = f64::from(rgba[4 * i + 1]);
        let b = f64::from(rgba[4 * i + 2]);
        let luma = r.mul_add(0.299, g.mul_add(0.587, b * 0.114));
        *value = luma.round().clamp(0.0, 255.0) as u8;
    }

    gray_from_vec(width, height, out)
}
