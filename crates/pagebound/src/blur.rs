//! Gaussian blur for noise reduction ahead of edge detection and
//! thresholding.
//!
//! The kernel spans `2 * radius + 1` pixels per axis with
//! `sigma = radius / 2`. Sampling past the image border replicates the
//! edge pixel, which keeps the kernel weight sum constant, so a single
//! normalization factor covers every pixel. Accumulation is in `f64`;
//! rounding to 8 bits happens once per output pixel.

use crate::types::{gray_from_vec, try_vec, DetectError, GrayImage};

/// Apply Gaussian blur to a grayscale image.
///
/// A radius of zero returns the image unchanged.
///
/// # Errors
///
/// Returns [`DetectError::OutOfMemory`] if a buffer cannot be allocated.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn gaussian_blur(input: &GrayImage, radius: u32) -> Result<GrayImage, DetectError> {
    if radius == 0 {
        return Ok(input.clone());
    }

    let (width, height) = input.dimensions();
    let (w, h) = (width as usize, height as usize);
    let r = radius as i64;
    let k = 2 * radius as usize + 1;

    let sigma = f64::from(radius) / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut weights = try_vec::<f64>(k * k)?;
    let mut total = 0.0;
    for dy in -r..=r {
        for dx in -r..=r {
            let weight = (-((dx * dx + dy * dy) as f64) / denom).exp();
            weights[(dy + r) as usize * k + (dx + r) as usize] = weight;
            total += weight;
        }
    }

    let src = input.as_raw();
    let mut out = try_vec::<u8>(w * h)?;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for dy in -r..=r {
                let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as usize;
                for dx in -r..=r {
                    let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as usize;
                    let weight = weights[(dy + r) as usize * k + (dx + r) as usize];
                    acc += weight * f64::from(src[sy * w + sx]);
                }
            }
            out[y * w + x] = (acc / total).round().clamp(0.0, 255.0) as u8;
        }
    }

    gray_from_vec(width, height, out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// 10x10 image with a sharp vertical boundary at x = 5.
    fn sharp_edge_image() -> GrayImage {
        GrayImage::from_fn(10, 10, |x, _y| {
            if x < 5 {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    #[test]
    fn zero_radius_returns_identical_image() {
        let img = sharp_edge_image();
        let blurred = gaussian_blur(&img, 0).unwrap();
        assert_eq!(img, blurred);
    }

    #[test]
    fn output_dimensions_preserved() {
        let img = GrayImage::new(17, 31);
        let blurred = gaussian_blur(&img, 2).unwrap();
        assert_eq!(blurred.width(), 17);
        assert_eq!(blurred.height(), 31);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        // A weighted average of a constant is the constant; border
        // replication keeps this exact at the edges too.
        let img = GrayImage::from_fn(9, 9, |_, _| image::Luma([128]));
        let blurred = gaussian_blur(&img, 2).unwrap();
        assert_eq!(img, blurred);
    }

    #[test]
    fn blur_smooths_sharp_edge() {
        let img = sharp_edge_image();
        let blurred = gaussian_blur(&img, 2).unwrap();

        let left_of_edge = blurred.get_pixel(4, 5).0[0];
        let right_of_edge = blurred.get_pixel(5, 5).0[0];
        assert!(
            left_of_edge > 0,
            "expected blur to raise left-of-edge above 0, got {left_of_edge}",
        );
        assert!(
            right_of_edge < 255,
            "expected blur to lower right-of-edge below 255, got {right_of_edge}",
        );
    }

    #[test]
    fn blur_is_symmetric_across_the_edge() {
        let img = sharp_edge_image();
        let blurred = gaussian_blur(&img, 2).unwrap();

        // The step is symmetric, so values equidistant from the boundary
        // must mirror around 255.
        for offset in 0..3u32 {
            let dark_side = blurred.get_pixel(4 - offset, 5).0[0];
            let bright_side = blurred.get_pixel(5 + offset, 5).0[0];
            let diff =
                (i16::from(dark_side) + i16::from(bright_side) - 255).abs();
            assert!(
                diff <= 1,
                "asymmetry at offset {offset}: {dark_side} + {bright_side} != 255",
            );
        }
    }

    #[test]
    fn larger_radius_smooths_more() {
        let img = sharp_edge_image();
        let narrow = gaussian_blur(&img, 1).unwrap();
        let wide = gaussian_blur(&img, 3).unwrap();

        // Two pixels into the dark side: the wider kernel pulls in more
        // of the bright half.
        assert!(wide.get_pixel(3, 5).0[0] > narrow.get_pixel(3, 5).0[0]);
    }
}
