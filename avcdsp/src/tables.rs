//! Constant H.264/AVC quantization tables for the 4x4 integer transform.
//!
//! All tables are stored row-major over the 4x4 coefficient positions so they
//! line up with [`crate::Block`].

/// Forward post-scaling multipliers (`MF`), indexed by `QP mod 6`.
const POST_SCALING: [[i32; 16]; 6] = [
    [
        13107, 8066, 13107, 8066, 8066, 5243, 8066, 5243, 13107, 8066, 13107, 8066, 8066, 5243,
        8066, 5243,
    ],
    [
        11916, 7490, 11916, 7490, 7490, 4660, 7490, 4660, 11916, 7490, 11916, 7490, 7490, 4660,
        7490, 4660,
    ],
    [
        10082, 6554, 10082, 6554, 6554, 4194, 6554, 4194, 10082, 6554, 10082, 6554, 6554, 4194,
        6554, 4194,
    ],
    [
        9362, 5825, 9362, 5825, 5825, 3647, 5825, 3647, 9362, 5825, 9362, 5825, 5825, 3647, 5825,
        3647,
    ],
    [
        8192, 5243, 8192, 5243, 5243, 3355, 5243, 3355, 8192, 5243, 8192, 5243, 5243, 3355, 5243,
        3355,
    ],
    [
        7282, 4559, 7282, 4559, 4559, 2893, 4559, 2893, 7282, 4559, 7282, 4559, 4559, 2893, 4559,
        2893,
    ],
];

/// Inverse rescaling multipliers (`V`), indexed by `QP mod 6`.
const RESCALING: [[i32; 16]; 6] = [
    [10, 13, 10, 13, 13, 16, 13, 16, 10, 13, 10, 13, 13, 16, 13, 16],
    [11, 14, 11, 14, 14, 18, 14, 18, 11, 14, 11, 14, 14, 18, 14, 18],
    [13, 16, 13, 16, 16, 20, 16, 20, 13, 16, 13, 16, 16, 20, 16, 20],
    [14, 18, 14, 18, 18, 23, 18, 23, 14, 18, 14, 18, 18, 23, 18, 23],
    [16, 20, 16, 20, 20, 25, 20, 25, 16, 20, 16, 20, 20, 25, 20, 25],
    [18, 23, 18, 23, 23, 29, 23, 29, 18, 23, 18, 23, 23, 29, 23, 29],
];

/// Forward rounding offsets, indexed by `QP div 6`. Each entry doubles the
/// previous one so the offset tracks the growing quantizer shift.
const ROUNDING_OFFSET: [i32; 12] = [
    10912, 21824, 43648, 87296, 174592, 349184, 698368, 1396736, 2793472, 5586944, 11173888,
    22347776,
];

/// Base right shift of the forward quantizer; `QP div 6` is added on top.
pub const QUANT_SHIFT: u32 = 15;

#[inline]
pub fn post_scaling(qp_rem: usize) -> &'static [i32; 16] {
    &POST_SCALING[qp_rem]
}

#[inline]
pub fn rescaling(qp_rem: usize) -> &'static [i32; 16] {
    &RESCALING[qp_rem]
}

#[inline]
pub fn rounding_offset(qp_div: u32) -> i32 {
    ROUNDING_OFFSET[qp_div as usize]
}
