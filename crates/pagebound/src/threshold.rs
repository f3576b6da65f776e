//! Adaptive mean thresholding.
//!
//! Produces the "threshold" intermediate: a binary mask marking pixels
//! that are darker than their local neighborhood mean by more than a
//! fixed offset. The window mean counts only in-bounds samples, so the
//! statistic stays unbiased at the borders.
//!
//! Window sums come from an integral image, keeping the cost independent
//! of the block size.

use crate::types::{gray_from_vec, try_vec, DetectError, GrayImage};

/// Default window edge length in pixels (odd).
pub const BLOCK_SIZE: u32 = 15;

/// Default offset subtracted from the window mean.
pub const OFFSET_C: f64 = 5.0;

/// Binarize a grayscale image against its local mean.
///
/// A pixel becomes 255 when its value is below the mean of the
/// `block_size x block_size` window centered on it (in-bounds samples
/// only) minus `offset`; otherwise 0.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if a buffer cannot be allocated.
#[allow(clippy::cast_precision_loss)]
pub fn adaptive_mean(
    input: &GrayImage,
    block_size: u32,
    offset: f64,
) -> Result<GrayImage, DetectError> {
    debug_assert!(block_size % 2 == 1, "window must be odd-sized");

    let (width, height) = input.dimensions();
    let (w, h) = (width as usize, height as usize);
    let src = input.as_raw();

    // integral[(y + 1) * (w + 1) + (x + 1)] holds the sum over the
    // rectangle (0, 0)..=(x, y).
    let w1 = w + 1;
    let mut integral = try_vec::<u64>(w1 * (h + 1))?;
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += u64::from(src[y * w + x]);
            integral[(y + 1) * w1 + x + 1] = integral[y * w1 + x + 1] + row_sum;
        }
    }

    let radius = (block_size / 2) as usize;
    let mut out = try_vec::<u8>(w * h)?;
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(h - 1);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(w - 1);

            let sum = integral[(y1 + 1) * w1 + x1 + 1] + integral[y0 * w1 + x0]
                - integral[y0 * w1 + x1 + 1]
                - integral[(y1 + 1) * w1 + x0];
            let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f64;
            let mean = sum as f64 / count;

            out[y * w + x] = if f64::from(src[y * w + x]) < mean - offset {
                255
            } else {
                0
            };
        }
    }

    gray_from_vec(width, height, out)
}
