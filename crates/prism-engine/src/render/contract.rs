use anyhow::Result;

use crate::math::Matrix4;
use crate::paint::Color;
use crate::shader::ShaderError;

/// Clear/present primitives and the fixed transforms owned by the context.
pub trait GraphicsContext {
    /// Starts a frame and clears color + depth to `clear`.
    fn begin_scene(&mut self, clear: Color) -> Result<()>;

    /// Finishes the frame and presents it.
    fn end_scene(&mut self) -> Result<()>;

    /// Model-to-world transform (identity for the demo scene).
    fn world_matrix(&self) -> Matrix4;

    /// Camera-to-clip transform built from the configured near/far planes.
    fn projection_matrix(&self) -> Matrix4;
}

/// A linked shader program exposing the transform uniforms.
pub trait ShaderProgram<G: ?Sized> {
    /// Makes this program the active one for subsequent draws.
    fn set_shader(&self, ctx: &mut G) -> Result<()>;

    /// Uploads `worldMatrix`, `viewMatrix` and `projectionMatrix`.
    ///
    /// Every uniform is resolved before anything is written; a missing one
    /// fails the whole call with [`ShaderError::UniformNotFound`].
    fn set_shader_params(
        &self,
        ctx: &mut G,
        world: &Matrix4,
        view: &Matrix4,
        projection: &Matrix4,
    ) -> Result<(), ShaderError>;
}

/// Pre-uploaded geometry that knows how to issue its own draw call.
pub trait SceneGeometry<G: ?Sized> {
    fn render(&self, ctx: &mut G) -> Result<()>;
}
