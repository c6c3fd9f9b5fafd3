//! Generalized block-edge impairment metric (GBIM).
//!
//! A no-reference blockiness score for 8-bit luma after H. R. Wu and
//! M. Yuen, "A generalized block-edge impairment metric for video coding"
//! (IEEE SPL, 1997). Differences across block boundaries are weighted by a
//! luminance-masking term and compared with the differences inside blocks.
//! Unimpaired content scores close to 1; visible blocking pushes the score
//! up.

use tracing::debug;

use crate::error::{DspError, Result};
use crate::plane::Plane;

/// Mean luminance splitting the dark and bright masking curves.
const XI: f64 = 81.0;

/// Per-direction and combined GBIM scores.
///
/// A direction without intra-block activity has a zero denominator: the
/// score is then `inf`, or `NaN` when there are no boundary differences
/// either (for example a plane that is a single block wide).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbimScore {
    /// Blockiness across vertical block edges (column boundaries).
    pub horizontal: f64,
    /// Blockiness across horizontal block edges (row boundaries).
    pub vertical: f64,
    /// Mean of the two directions.
    pub score: f64,
}

/// Computes the GBIM of `plane` on a `block_size x block_size` grid.
///
/// Both plane dimensions must be multiples of `block_size`, and the block
/// size must be at least 2.
pub fn gbim(plane: &Plane<u8>, block_size: usize) -> Result<GbimScore> {
    if block_size < 2 {
        return Err(DspError::InvalidBlockSize(block_size));
    }
    let (width, height) = (plane.width(), plane.height());
    if width % block_size != 0 || height % block_size != 0 {
        return Err(DspError::NotBlockAligned {
            width,
            height,
            block_size,
        });
    }

    let horizontal = || {
        directional_score(height, width, block_size, |line, pos| {
            plane.row(line)[pos] as f64
        })
    };
    let vertical = || {
        directional_score(width, height, block_size, |line, pos| {
            plane.row(pos)[line] as f64
        })
    };

    #[cfg(feature = "rayon")]
    let (horizontal, vertical) = rayon::join(horizontal, vertical);
    #[cfg(not(feature = "rayon"))]
    let (horizontal, vertical) = (horizontal(), vertical());

    let score = GbimScore {
        horizontal,
        vertical,
        score: (horizontal + vertical) / 2.0,
    };
    debug!(
        width,
        height,
        block_size,
        horizontal = score.horizontal,
        vertical = score.vertical,
        "gbim"
    );
    Ok(score)
}

/// Scores the block edges met while walking along `lines` lines of `span`
/// samples each. `at(line, pos)` reads one sample.
fn directional_score(
    lines: usize,
    span: usize,
    block_size: usize,
    at: impl Fn(usize, usize) -> f64,
) -> f64 {
    let boundaries = span / block_size - 1;
    let lambda = (1.0 + (255.0 - XI).sqrt()).ln() / (1.0 + XI.sqrt()).ln();

    let mut weights = Vec::with_capacity(lines * boundaries);
    for line in 0..lines {
        for k in 0..boundaries {
            let start = k * block_size;
            let (mu0, sigma0) = mean_std((start..start + block_size).map(|p| at(line, p)));
            let (mu1, sigma1) =
                mean_std((start + block_size..start + 2 * block_size).map(|p| at(line, p)));
            weights.push(masking_weight(
                (mu0 + mu1) / 2.0,
                (sigma0 + sigma1) / 2.0,
                lambda,
            ));
        }
    }

    // Weighted energy of the differences between `offset + k * B` and the
    // sample after it, one term per boundary.
    let energy = |offset: usize| -> f64 {
        let mut sum = 0.0;
        for line in 0..lines {
            for k in 0..boundaries {
                let pos = offset + k * block_size;
                let d = weights[line * boundaries + k] * (at(line, pos) - at(line, pos + 1));
                sum += d * d;
            }
        }
        sum.sqrt()
    };

    let across = energy(block_size - 1);
    let inside = (block_size..2 * block_size - 1).map(energy).sum::<f64>()
        / (block_size - 1) as f64;
    across / inside
}

fn masking_weight(mu: f64, sigma: f64, lambda: f64) -> f64 {
    if mu <= XI {
        lambda * (1.0 + mu.sqrt() / (1.0 + sigma)).ln()
    } else {
        (1.0 + (255.0 - mu).sqrt() / (1.0 + sigma)).ln()
    }
}

/// Mean and population standard deviation.
fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count() as f64;
    let mean = values.clone().sum::<f64>() / n;
    let var = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    fn blocky() -> Plane<u8> {
        Plane::from_fn(16, 16, |r, c| {
            (40 * (r / 8) + 30 * (c / 8) + (r * 7 + c * 3) % 5) as u8
        })
        .unwrap()
    }

    #[test]
    fn blocky_plane_scores_high() {
        let s = gbim(&blocky(), 8).unwrap();
        assert_close(s.horizontal, 12.33829729441692);
        assert_close(s.vertical, 16.27185407283347);
        assert_close(s.score, 14.305075683625194);
    }

    #[test]
    fn linear_ramp_scores_one() {
        let ramp = Plane::from_fn(12, 8, |r, c| (4 * r + 3 * c) as u8).unwrap();
        let s = gbim(&ramp, 4).unwrap();
        assert_close(s.horizontal, 1.0);
        assert_close(s.vertical, 1.0);
    }

    #[test]
    fn bright_texture_uses_upper_masking_curve() {
        let bright = Plane::from_fn(8, 8, |r, c| (200 + (r * 5 + c * 11) % 37) as u8).unwrap();
        let s = gbim(&bright, 4).unwrap();
        assert_close(s.horizontal, 1.0410190237306003);
        assert_close(s.vertical, 1.438071566660892);
        assert_close(s.score, 1.2395452951957462);
    }

    #[test]
    fn flat_blocks_are_infinitely_blocky() {
        let tiles =
            Plane::from_fn(8, 8, |r, c| if (r / 4 + c / 4) % 2 == 1 { 60u8 } else { 20 }).unwrap();
        let s = gbim(&tiles, 4).unwrap();
        assert!(s.horizontal.is_infinite() && s.vertical.is_infinite());

        let single = Plane::new(2, 2, vec![1u8, 2, 3, 4]).unwrap();
        assert!(gbim(&single, 2).unwrap().score.is_nan());
    }

    #[test]
    fn directions_swap_under_transpose() {
        let plane = blocky();
        let transposed = Plane::from_fn(16, 16, |r, c| plane.get(c, r).unwrap()).unwrap();
        let a = gbim(&plane, 8).unwrap();
        let b = gbim(&transposed, 8).unwrap();
        assert_eq!(a.horizontal, b.vertical);
        assert_eq!(a.vertical, b.horizontal);
    }

    #[test]
    fn rejects_misaligned_planes_and_tiny_blocks() {
        let plane = Plane::filled(12, 8, 0u8).unwrap();
        assert_eq!(
            gbim(&plane, 8),
            Err(DspError::NotBlockAligned {
                width: 12,
                height: 8,
                block_size: 8
            })
        );
        assert_eq!(gbim(&plane, 1), Err(DspError::InvalidBlockSize(1)));
        assert_eq!(gbim(&plane, 0), Err(DspError::InvalidBlockSize(0)));
    }
}
