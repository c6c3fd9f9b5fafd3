use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DspError {
    #[error("quantization parameter {0} out of range 0..=51")]
    QpOutOfRange(i32),

    #[error("block must hold exactly 16 coefficients, got {0}")]
    BlockLength(usize),

    #[error("invalid plane dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: usize, height: usize },

    #[error("plane data length mismatch: expected {expected} samples, got {actual}")]
    PlaneLength { expected: usize, actual: usize },

    #[error("plane dimensions {width}x{height} are not multiples of the {block_size}x{block_size} block size")]
    NotBlockAligned {
        width: usize,
        height: usize,
        block_size: usize,
    },

    #[error("block size must be at least 2, got {0}")]
    InvalidBlockSize(usize),

    #[error("sample ({row}, {col}) lies outside the padded plane")]
    OutOfBounds { row: isize, col: isize },
}

pub type Result<T> = std::result::Result<T, DspError>;
