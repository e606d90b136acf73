//! 3D vector and quaternion math: rotations built from axis and angle,
//! composed with the Hamilton product and applied with the sandwich product.

pub mod vector;
pub mod quaternion;
pub mod matrix;
pub mod random;
pub mod config;
pub mod error;
mod convert;

pub use crate::vector::{Vector, GRAVITY};
pub use crate::quaternion::Quaternion;
pub use crate::matrix::Mat3x3;
pub use crate::random::Randf32;
