use std::fmt;

use crate::error::{DspError, Result};

pub const MAX_QP: u8 = 51;

/// Quantization parameter, guaranteed to lie in `0..=51`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qp(u8);

impl Qp {
    pub const MIN: Qp = Qp(0);
    pub const MAX: Qp = Qp(MAX_QP);

    pub fn new(value: i32) -> Result<Self> {
        if (0..=MAX_QP as i32).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(DspError::QpOutOfRange(value))
        }
    }

    pub fn all() -> impl Iterator<Item = Qp> {
        (0..=MAX_QP).map(Qp)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// `QP mod 6`, the row of the scaling tables.
    pub fn rem6(self) -> usize {
        (self.0 % 6) as usize
    }

    /// `QP div 6`, the extra shift applied on top of the base quantizer step.
    pub fn div6(self) -> u32 {
        (self.0 / 6) as u32
    }
}

impl TryFrom<i32> for Qp {
    type Error = DspError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Qp> for u8 {
    fn from(qp: Qp) -> u8 {
        qp.0
    }
}

impl fmt::Display for Qp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
