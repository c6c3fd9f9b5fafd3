use crate::block::{Block, WideBlock};
use crate::qp::Qp;
use crate::tables::{self, QUANT_SHIFT};

/// Post-scales and quantizes core-transform coefficients.
///
/// The magnitude is scaled, offset and shifted on its own and the sign is put
/// back afterwards. Shifting a negative value directly would floor towards
/// minus infinity instead of truncating towards zero. Magnitudes that do
/// not fit in `i32` saturate to `i32::MAX`.
pub fn quantize(coeffs: &WideBlock, qp: Qp) -> Block {
    let mf = tables::post_scaling(qp.rem6());
    let offset = tables::rounding_offset(qp.div6()) as u64;
    let shift = QUANT_SHIFT + qp.div6();

    let mut levels = [0i32; 16];
    for i in 0..16 {
        let c = coeffs[i];
        let scaled = c
            .unsigned_abs()
            .saturating_mul(mf[i] as u64)
            .saturating_add(offset);
        let magnitude = i32::try_from(scaled >> shift).unwrap_or(i32::MAX);
        levels[i] = if c < 0 { -magnitude } else { magnitude };
    }
    levels
}

/// Rescales quantized levels ahead of the inverse core transform.
///
/// Any `i32` level times the largest multiplier, shifted by at most 8, stays
/// well inside `i64`.
pub fn rescale(levels: &Block, qp: Qp) -> WideBlock {
    let v = tables::rescaling(qp.rem6());
    let shift = qp.div6();

    let mut coeffs = [0i64; 16];
    for i in 0..16 {
        coeffs[i] = (levels[i] as i64 * v[i] as i64) << shift;
    }
    coeffs
}
