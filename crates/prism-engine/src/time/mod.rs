//! Time subsystem.
//!
//! One `FrameClock` per render loop; call `tick()` once per rendered frame
//! to obtain the `FrameTime` passed to the frame sequencer.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, DEFAULT_DT_MAX, DEFAULT_DT_MIN};
