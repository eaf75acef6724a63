//! Shader programs and the transform-uniform contract.
//!
//! A program is "compiled" and "linked" on the CPU with naga before it ever
//! reaches the device, so missing entry points and unresolved uniforms are
//! reported as [`ShaderError`]s instead of device validation panics.

mod color;
mod error;
mod program;
mod source;

pub use color::ColorShader;
pub use error::ShaderError;
pub use program::{
    resolve_transform_uniforms, ProgramInterface, TransformLocations, UniformLocation,
    UniformSlot, FRAGMENT_ENTRY, MATRIX_UNIFORM_SIZE, PROJECTION_MATRIX, TRANSFORM_UNIFORMS,
    UNIFORM_GROUP, VERTEX_ENTRY, VIEW_MATRIX, WORLD_MATRIX,
};
pub use source::{
    ShaderSources, StageSource, BUNDLED_SHADER_DIR, COLOR_FRAGMENT_FILE, COLOR_VERTEX_FILE,
};
