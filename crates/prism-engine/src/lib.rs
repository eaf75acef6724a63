//! Prism engine crate.
//!
//! A minimal real-time renderer: camera and matrix math, a frame sequencer
//! over narrow graphics-context traits, and the wgpu/winit runtime that
//! drives one shaded triangle per frame.

pub mod camera;
pub mod config;
pub mod device;
pub mod input;
pub mod math;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;

pub mod logging;
pub mod paint;

pub use config::SystemConfig;
pub use window::System;
