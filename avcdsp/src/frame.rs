//! Plane-level drivers that run the 4x4 transforms over a non-overlapping
//! block grid.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::block::{self, BLOCK_SIZE, Block};
use crate::error::{DspError, Result};
use crate::plane::Plane;
use crate::qp::Qp;
use crate::transform::{forward_transform, inverse_transform};

/// Forward transform and quantize every 4x4 block of `plane`.
///
/// Both dimensions must be multiples of 4.
pub fn forward_transform_plane(plane: &Plane<i32>, qp: Qp) -> Result<Plane<i32>> {
    debug!(
        width = plane.width(),
        height = plane.height(),
        %qp,
        "forward transform over plane"
    );
    map_blocks(plane, |b| forward_transform(b, qp))
}

/// Rescale and inverse transform every 4x4 block of `plane`.
pub fn inverse_transform_plane(plane: &Plane<i32>, qp: Qp) -> Result<Plane<i32>> {
    debug!(
        width = plane.width(),
        height = plane.height(),
        %qp,
        "inverse transform over plane"
    );
    map_blocks(plane, |b| inverse_transform(b, qp))
}

fn map_blocks<F>(plane: &Plane<i32>, f: F) -> Result<Plane<i32>>
where
    F: Fn(&Block) -> Block + Sync,
{
    let width = plane.width();
    let height = plane.height();
    if width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(DspError::NotBlockAligned {
            width,
            height,
            block_size: BLOCK_SIZE,
        });
    }

    let src = plane.data();
    let stripe = width * BLOCK_SIZE;
    let mut out = vec![0i32; src.len()];

    // Blocks never overlap, so each stripe of four rows is independent.
    let process = |(by, dst): (usize, &mut [i32])| {
        let src = &src[by * stripe..(by + 1) * stripe];
        for x in (0..width).step_by(BLOCK_SIZE) {
            let input = block::extract(src, width, x, 0);
            block::store(dst, width, x, 0, &f(&input));
        }
    };

    #[cfg(feature = "rayon")]
    out.par_chunks_mut(stripe).enumerate().for_each(process);
    #[cfg(not(feature = "rayon"))]
    out.chunks_mut(stripe).enumerate().for_each(process);

    Plane::new(width, height, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qp(v: i32) -> Qp {
        Qp::new(v).unwrap()
    }

    #[test]
    fn rejects_unaligned_planes() {
        let plane = Plane::filled(6, 4, 0i32).unwrap();
        assert_eq!(
            forward_transform_plane(&plane, qp(10)),
            Err(DspError::NotBlockAligned {
                width: 6,
                height: 4,
                block_size: 4,
            })
        );
        let plane = Plane::filled(4, 5, 0i32).unwrap();
        assert!(inverse_transform_plane(&plane, qp(10)).is_err());
    }

    #[test]
    fn every_block_matches_the_block_kernel() {
        let plane = Plane::from_fn(12, 8, |r, c| ((r * 31 + c * 17) % 255) as i32 - 100).unwrap();
        let coeffs = forward_transform_plane(&plane, qp(22)).unwrap();
        let recon = inverse_transform_plane(&coeffs, qp(22)).unwrap();

        for by in (0..8).step_by(4) {
            for bx in (0..12).step_by(4) {
                let input = block::extract(plane.data(), 12, bx, by);
                let expected = forward_transform(&input, qp(22));
                assert_eq!(block::extract(coeffs.data(), 12, bx, by), expected);
                assert_eq!(
                    block::extract(recon.data(), 12, bx, by),
                    inverse_transform(&expected, qp(22))
                );
            }
        }
    }

    #[test]
    fn constant_plane_yields_dc_grid() {
        let plane = Plane::filled(8, 8, 128i32).unwrap();
        let coeffs = forward_transform_plane(&plane, qp(0)).unwrap();
        for row in 0..8 {
            for col in 0..8 {
                let expected = if row % 4 == 0 && col % 4 == 0 { 819 } else { 0 };
                assert_eq!(coeffs.get(row, col), Some(expected));
            }
        }
    }
}
