use crate::block::{Block, WideBlock, saturate};
use crate::qp::Qp;
use crate::quant;

/// H.264 forward core transform matrix `T`.
const CORE: [[i32; 4]; 4] = [[1, 1, 1, 1], [2, 1, -1, -2], [1, -1, -1, 1], [1, -2, 2, -1]];

/// Computes `T * block * T'` without normalisation; the scaling is folded
/// into [`quant::quantize`]. The gain is at most 36, so 64-bit intermediates
/// hold the result for any `i32` input.
pub fn forward_core_transform(block: &Block) -> WideBlock {
    let mut temp = [0i64; 16];
    for r in 0..4 {
        for c in 0..4 {
            temp[r * 4 + c] = (0..4)
                .map(|j| CORE[r][j] as i64 * block[j * 4 + c] as i64)
                .sum();
        }
    }

    let mut out = [0i64; 16];
    for r in 0..4 {
        for c in 0..4 {
            out[r * 4 + c] = (0..4).map(|j| temp[r * 4 + j] * CORE[c][j] as i64).sum();
        }
    }
    out
}

#[inline]
fn inv_butterfly(a0: i64, a1: i64, a2: i64, a3: i64) -> [i64; 4] {
    let s02 = a0 + a2;
    let d02 = a0 - a2;
    let s13 = a1 + (a3 >> 1);
    let d13 = (a1 >> 1) - a3;
    [s02 + s13, d02 + d13, d02 - d13, s02 - s13]
}

/// Inverse core transform on rescaled coefficients: a horizontal butterfly
/// pass over rows, then a vertical pass over columns with `(x + 32) >> 6`.
///
/// Both passes run in 64 bits; outputs beyond `i32` saturate.
pub fn inverse_core_transform(coeffs: &WideBlock) -> Block {
    let mut rows = [0i64; 16];

    // Horizontal pass
    for i in 0..4 {
        let row = &coeffs[i * 4..i * 4 + 4];
        rows[i * 4..i * 4 + 4].copy_from_slice(&inv_butterfly(row[0], row[1], row[2], row[3]));
    }

    // Vertical pass
    let mut out = [0i32; 16];
    for i in 0..4 {
        let col = inv_butterfly(rows[i], rows[4 + i], rows[8 + i], rows[12 + i]);
        for (k, v) in col.into_iter().enumerate() {
            out[k * 4 + i] = saturate((v + 32) >> 6);
        }
    }
    out
}

/// Forward 4x4 integer transform followed by quantization.
pub fn forward_transform(block: &Block, qp: Qp) -> Block {
    quant::quantize(&forward_core_transform(block), qp)
}

/// Rescaling followed by the inverse 4x4 integer transform.
pub fn inverse_transform(levels: &Block, qp: Qp) -> Block {
    inverse_core_transform(&quant::rescale(levels, qp))
}
