use std::fmt;

use anyhow::{Context, Result};

use crate::camera::Camera;
use crate::paint::Color;

use super::contract::{GraphicsContext, SceneGeometry, ShaderProgram};

/// Steps of a single frame, in execution order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStage {
    BeginScene,
    UpdateCamera,
    BindShader,
    Draw,
    EndScene,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameStage::BeginScene => "begin scene",
            FrameStage::UpdateCamera => "update camera",
            FrameStage::BindShader => "bind shader",
            FrameStage::Draw => "draw",
            FrameStage::EndScene => "end scene",
        };
        f.write_str(name)
    }
}

/// Owns the camera, the active shader and the scene geometry, and sequences
/// one frame against a [`GraphicsContext`].
///
/// Teardown happens on drop: shader first, then model, then camera.
pub struct Graphics<S, M> {
    shader: S,
    model: M,
    camera: Camera,
    clear_color: Color,
}

impl<S, M> Graphics<S, M> {
    pub fn new(camera: Camera, shader: S, model: M, clear_color: Color) -> Self {
        Self {
            shader,
            model,
            camera,
            clear_color,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera access for input/animation logic between frames.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Per-frame entry point.
    ///
    /// The second argument is the clamped time since the previous frame in
    /// seconds. The triangle scene is static, so it is not consumed yet.
    pub fn frame<G>(&mut self, ctx: &mut G, _dt: f32) -> Result<()>
    where
        G: GraphicsContext + ?Sized,
        S: ShaderProgram<G>,
        M: SceneGeometry<G>,
    {
        self.render(ctx)
    }

    fn render<G>(&mut self, ctx: &mut G) -> Result<()>
    where
        G: GraphicsContext + ?Sized,
        S: ShaderProgram<G>,
        M: SceneGeometry<G>,
    {
        ctx.begin_scene(self.clear_color)
            .with_context(|| stage_failed(FrameStage::BeginScene))?;

        self.camera.render();
        log::trace!("{}: view matrix recomputed", FrameStage::UpdateCamera);

        let world = ctx.world_matrix();
        let view = self.camera.view_matrix();
        let projection = ctx.projection_matrix();

        self.shader
            .set_shader(ctx)
            .with_context(|| stage_failed(FrameStage::BindShader))?;
        self.shader
            .set_shader_params(ctx, &world, &view, &projection)
            .with_context(|| stage_failed(FrameStage::BindShader))?;

        self.model
            .render(ctx)
            .with_context(|| stage_failed(FrameStage::Draw))?;

        ctx.end_scene()
            .with_context(|| stage_failed(FrameStage::EndScene))?;

        Ok(())
    }
}

fn stage_failed(stage: FrameStage) -> String {
    format!("frame aborted during {stage}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Matrix4, Vector3};
    use crate::shader::ShaderError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Begin(Color),
        SetShader,
        Params { view: Matrix4 },
        Draw,
        End,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_begin: bool,
    }

    impl GraphicsContext for Recorder {
        fn begin_scene(&mut self, clear: Color) -> Result<()> {
            anyhow::ensure!(!self.fail_begin, "device lost");
            self.calls.push(Call::Begin(clear));
            Ok(())
        }

        fn end_scene(&mut self) -> Result<()> {
            self.calls.push(Call::End);
            Ok(())
        }

        fn world_matrix(&self) -> Matrix4 {
            Matrix4::identity()
        }

        fn projection_matrix(&self) -> Matrix4 {
            Matrix4::perspective_fov_lh(1.0, 1.0, 0.1, 100.0)
        }
    }

    struct Shader {
        missing: Option<&'static str>,
    }

    impl ShaderProgram<Recorder> for Shader {
        fn set_shader(&self, ctx: &mut Recorder) -> Result<()> {
            ctx.calls.push(Call::SetShader);
            Ok(())
        }

        fn set_shader_params(
            &self,
            ctx: &mut Recorder,
            _world: &Matrix4,
            view: &Matrix4,
            _projection: &Matrix4,
        ) -> Result<(), ShaderError> {
            if let Some(name) = self.missing {
                return Err(ShaderError::UniformNotFound { name: name.to_string() });
            }
            ctx.calls.push(Call::Params { view: *view });
            Ok(())
        }
    }

    struct Model;

    impl SceneGeometry<Recorder> for Model {
        fn render(&self, ctx: &mut Recorder) -> Result<()> {
            ctx.calls.push(Call::Draw);
            Ok(())
        }
    }

    fn graphics(missing: Option<&'static str>) -> Graphics<Shader, Model> {
        Graphics::new(Camera::default(), Shader { missing }, Model, Color::BLACK)
    }

    #[test]
    fn frame_runs_stages_in_order() {
        let mut ctx = Recorder::default();
        let mut g = graphics(None);

        g.frame(&mut ctx, 0.016).unwrap();

        let view = g.camera().view_matrix();
        assert_eq!(
            ctx.calls,
            vec![
                Call::Begin(Color::BLACK),
                Call::SetShader,
                Call::Params { view },
                Call::Draw,
                Call::End,
            ]
        );
    }

    #[test]
    fn camera_changes_reach_the_next_frame() {
        let mut ctx = Recorder::default();
        let mut g = graphics(None);

        g.frame(&mut ctx, 0.016).unwrap();
        g.camera_mut().set_position(Vector3::new(0.0, 2.0, -5.0));
        g.frame(&mut ctx, 0.016).unwrap();

        let views: Vec<Matrix4> = ctx
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Params { view } => Some(*view),
                _ => None,
            })
            .collect();
        assert_eq!(views.len(), 2);
        assert_ne!(views[0], views[1]);
        assert_eq!(views[1], g.camera().view_matrix());
    }

    #[test]
    fn view_is_recomputed_once_per_frame() {
        let mut ctx = Recorder::default();
        let mut g = graphics(None);
        assert_eq!(g.camera().view_updates(), 0);

        g.frame(&mut ctx, 0.016).unwrap();
        assert_eq!(g.camera().view_updates(), 1);

        g.frame(&mut ctx, 0.016).unwrap();
        g.frame(&mut ctx, 0.016).unwrap();
        assert_eq!(g.camera().view_updates(), 3);
    }

    #[test]
    fn missing_uniform_aborts_before_draw() {
        let mut ctx = Recorder::default();
        let mut g = graphics(Some("viewMatrix"));

        let err = g.frame(&mut ctx, 0.016).unwrap_err();

        assert_eq!(ctx.calls, vec![Call::Begin(Color::BLACK), Call::SetShader]);
        let shader_err = err.downcast_ref::<ShaderError>().unwrap();
        assert_eq!(shader_err.missing_uniform(), Some("viewMatrix"));
        assert!(format!("{err:#}").contains("bind shader"));
    }

    #[test]
    fn context_error_propagates_with_stage() {
        let mut ctx = Recorder { fail_begin: true, ..Default::default() };
        let mut g = graphics(None);

        let err = g.frame(&mut ctx, 0.016).unwrap_err();

        assert!(ctx.calls.is_empty());
        let msg = format!("{err:#}");
        assert!(msg.contains("begin scene") && msg.contains("device lost"), "{msg}");
    }
}
