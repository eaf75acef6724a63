//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer
//! and the frame sequencer.

mod runtime;

pub use runtime::{System, TriangleScene};
