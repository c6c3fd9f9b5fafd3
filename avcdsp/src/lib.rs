#![forbid(unsafe_code)]

//! Bit-exact H.264/AVC integer DSP kernels: the 4x4 forward and inverse
//! integer transforms with their quantization tables, and quarter-sample luma
//! interpolation for motion compensation, plus the GBIM blockiness metric
//! for judging what the 4x4 block grid leaves behind.

pub mod block;
pub mod error;
pub mod frame;
pub mod gbim;
pub mod plane;
pub mod qp;
pub mod qpel;
pub mod quant;
pub mod tables;
pub mod transform;

pub use block::Block;
pub use error::{DspError, Result};
pub use frame::{forward_transform_plane, inverse_transform_plane};
pub use gbim::{GbimScore, gbim};
pub use plane::Plane;
pub use qp::Qp;
pub use qpel::{MotionVector, QuarterPelPlane, interpolate};
pub use transform::{forward_transform, inverse_transform};
