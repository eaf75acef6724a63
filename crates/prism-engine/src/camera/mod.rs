//! Camera subsystem.
//!
//! Derives the per-frame view matrix from a world position and a
//! pitch/yaw/roll orientation expressed in degrees.

mod camera;

pub use camera::{look_at_lh, Camera, DEFAULT_CAMERA_POSITION};
