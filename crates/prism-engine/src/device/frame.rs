use crate::paint::Color;

use super::ErrorScope;

/// Pipeline + bind group made current by a shader program.
#[derive(Clone)]
pub struct BoundProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
}

/// One indexed draw, captured with the program that was current when it was issued.
pub(crate) struct DrawCall {
    pub program: BoundProgram,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
}

/// Frame between `begin_scene` and `end_scene`.
///
/// Holds the acquired surface texture; it must be presented (or dropped)
/// promptly, since holding it blocks acquisition of the next one.
pub(crate) struct SceneFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub clear: Color,
    pub program: Option<BoundProgram>,
    pub draws: Vec<DrawCall>,
    /// Open from acquisition until the frame's commands are submitted.
    pub errors: ErrorScope,
}

/// Where the context is within the begin/end protocol.
pub(crate) enum FrameState {
    Idle,
    /// Acquisition failed transiently; commands are dropped until `end_scene`.
    Skipped,
    Recording(SceneFrame),
}
