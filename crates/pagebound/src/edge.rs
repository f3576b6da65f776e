//! Sobel gradient magnitude.
//!
//! Produces the "edges" intermediate: per-pixel gradient strength of
//! the blurred grayscale, clamped to 8 bits. The outermost one-pixel
//! frame is always zero, so downstream stages never see border
//! artifacts from a truncated 3x3 neighborhood.

use crate::types::{gray_from_vec, try_vec, DetectError, GrayImage};

/// Compute the Sobel gradient magnitude of a grayscale image.
///
/// Output pixels are `min(255, round(sqrt(gx^2 + gy^2)))`; the one-pixel
/// border frame is zero. Images narrower or shorter than 3 pixels come
/// out all zero.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if the output buffer cannot be
/// allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sobel_magnitude(input: &GrayImage) -> Result<GrayImage, DetectError> {
    let (width, height) = input.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = input.as_raw();
    let mut out = try_vec::<u8>(w * h)?;

    if w >= 3 && h >= 3 {
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                let up = i - w;
                let down = i + w;
                let gx = (f64::from(src[up + 1])
                    + 2.0 * f64::from(src[i + 1])
                    + f64::from(src[down + 1]))
                    - (f64::from(src[up - 1])
                        + 2.0 * f64::from(src[i - 1])
                        + f64::from(src[down - 1]));
                let gy = (f64::from(src[down - 1])
                    + 2.0 * f64::from(src[down])
                    + f64::from(src[down + 1]))
                    - (f64::from(src[up - 1])
                        + 2.0 * f64::from(src[up])
                        + f64::from(src[up + 1]));
                out[i] = gx.hypot(gy).round().min(255.0) as u8;
            }
        }
    }

    gray_from_vec(width, height, out)
}
