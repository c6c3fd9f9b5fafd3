use crate::error::{DspError, Result};

/// A 4x4 block of integers stored row-major (`row * 4 + col`).
pub type Block = [i32; 16];

/// Transform-domain intermediates between the core transforms and
/// quantization, held at 64 bits so no input can wrap them.
pub type WideBlock = [i64; 16];

pub const BLOCK_SIZE: usize = 4;

/// Narrows a 64-bit intermediate, saturating at the `i32` bounds.
#[inline]
pub(crate) fn saturate(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

pub fn from_rows(rows: [[i32; 4]; 4]) -> Block {
    let mut block = [0i32; 16];
    for (r, row) in rows.iter().enumerate() {
        block[r * 4..r * 4 + 4].copy_from_slice(row);
    }
    block
}

pub fn to_rows(block: &Block) -> [[i32; 4]; 4] {
    let mut rows = [[0i32; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        row.copy_from_slice(&block[r * 4..r * 4 + 4]);
    }
    rows
}

pub fn from_slice(values: &[i32]) -> Result<Block> {
    values
        .try_into()
        .map_err(|_| DspError::BlockLength(values.len()))
}

/// Copies the 4x4 block whose top-left sample is `(x, y)` out of a row-major
/// buffer with the given stride.
pub fn extract(src: &[i32], stride: usize, x: usize, y: usize) -> Block {
    let mut block = [0i32; 16];
    for r in 0..BLOCK_SIZE {
        let start = (y + r) * stride + x;
        block[r * 4..r * 4 + 4].copy_from_slice(&src[start..start + 4]);
    }
    block
}

pub fn store(dst: &mut [i32], stride: usize, x: usize, y: usize, block: &Block) {
    for r in 0..BLOCK_SIZE {
        let start = (y + r) * stride + x;
        dst[start..start + 4].copy_from_slice(&block[r * 4..r * 4 + 4]);
    }
}
