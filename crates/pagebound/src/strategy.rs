//! Multi-parameterization detection.
//!
//! A fixed sequence of option overrides is tried in order until one run
//! produces a quadrilateral boundary. Runs that fail are logged and
//! skipped; they never abort the sequence.

use tracing::warn;

use crate::pipeline;
use crate::types::{DetectError, DetectOptions, DetectionResult};

/// The option overrides tried in order, applied on top of the caller's
/// base options.
fn strategy_sequence(base: DetectOptions) -> [DetectOptions; 4] {
    [
        base,
        DetectOptions {
            edge_threshold: 30,
            min_area_ratio: 0.03,
            ..base
        },
        DetectOptions {
            edge_threshold: 70,
            blur_radius: 3,
            ..base
        },
        DetectOptions {
            min_area_ratio: 0.01,
            max_area_ratio: 0.98,
            ..base
        },
    ]
}

/// Run the strategy sequence and return the best result.
///
/// The first run that yields at least one 4-vertex boundary wins
/// outright. Otherwise the run with the most 4-vertex boundaries is
/// kept, falling back to the most boundaries overall; earlier runs win
/// ties. When every run fails, the result is empty.
///
/// # Errors
///
/// Returns [`DetectError::InvalidInput`] when the raster or the base
/// options are invalid; per-strategy failures are only logged.
pub(crate) fn run(
    width: u32,
    height: u32,
    rgba: &[u8],
    base: &DetectOptions,
) -> Result<DetectionResult, DetectError> {
    pipeline::validate_raster(width, height, rgba)?;
    base.validate()?;

    let mut best: Option<(usize, usize, DetectionResult)> = None;
    for (index, options) in strategy_sequence(*base).into_iter().enumerate() {
        match crate::detect(width, height, rgba, &options) {
            Ok(result) => {
                let quads = result
                    .boundaries
                    .iter()
                    .filter(|b| b.num_vertices == 4)
                    .count();
                if quads > 0 {
                    return Ok(result);
                }
                let total = result.boundaries.len();
                let replace = best
                    .as_ref()
                    .map_or(true, |(bq, bt, _)| quads > *bq || (quads == *bq && total > *bt));
                if replace {
                    best = Some((quads, total, result));
                }
            }
            Err(error) => {
                warn!(strategy = index, %error, "detection strategy failed, skipping");
            }
        }
    }

    Ok(best.map_or_else(DetectionResult::empty, |(_, _, result)| result))
}
