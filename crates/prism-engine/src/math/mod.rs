//! Vector and matrix primitives.
//!
//! Conventions:
//! - left-handed: +X right, +Y up, +Z into the screen
//! - row vectors multiplied on the left (`v' = v · M`)
//! - matrices stored row-major; angles in radians

mod matrix;
mod vector;

pub use matrix::Matrix4;
pub use vector::{Vector3, NORMALIZE_EPSILON};

/// Converts degrees to radians.
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * (core::f32::consts::PI / 180.0)
}
