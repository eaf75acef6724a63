//! Frame orchestration.
//!
//! The sequencer in [`Graphics`] only talks to capability traits; the wgpu
//! device, the color shader and the triangle model implement them, and tests
//! substitute recording doubles.

mod contract;
mod graphics;

pub use contract::{GraphicsContext, SceneGeometry, ShaderProgram};
pub use graphics::{FrameStage, Graphics};
