use anyhow::{anyhow, bail, Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::math::Matrix4;
use crate::paint::Color;
use crate::render::GraphicsContext;

use super::depth::DepthBuffer;
use super::frame::{BoundProgram, DrawCall, FrameState, SceneFrame};
use super::scope::captured;
use super::surface;
use super::{ErrorScope, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects, the surface configuration and the scene transforms.
///
/// This type is the low-level rendering context:
/// - negotiates adapter, device and surface format
/// - owns the depth buffer and the world/projection matrices
/// - records bound programs and draws between `begin_scene` and `end_scene`
pub struct Gpu<'w> {
    window: &'w Window,

    /// Kept alive for the lifetime of the surface.
    _instance: wgpu::Instance,

    /// Surface bound to the window.
    surface: wgpu::Surface<'w>,

    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    depth: DepthBuffer,

    field_of_view: f32,
    screen_near: f32,
    screen_depth: f32,
    world_matrix: Matrix4,
    projection_matrix: Matrix4,

    frame: FrameState,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");
        anyhow::ensure!(
            init.screen_near > 0.0 && init.screen_depth > init.screen_near,
            "invalid clip planes: near {} / depth {}",
            init.screen_near,
            init.screen_depth
        );

        let present_mode = init.present_mode();
        let GpuInit {
            prefer_srgb,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            field_of_view,
            screen_near,
            screen_depth,
            ..
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("adapter: {} - {} ({:?})", info.driver, info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        log::info!("surface format {format:?}, present mode {present_mode:?}");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let depth = DepthBuffer::new(&device, size);
        let projection_matrix =
            projection_for(size, field_of_view, screen_near, screen_depth);

        Ok(Self {
            window,
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            field_of_view,
            screen_near,
            screen_depth,
            world_matrix: Matrix4::identity(),
            projection_matrix,
            frame: FrameState::Idle,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface and depth buffer, and rebuilds the projection
    /// for the new aspect ratio.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that case,
    /// only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let applied = surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
        if !applied {
            return;
        }

        self.depth = DepthBuffer::new(&self.device, new_size);
        self.projection_matrix = projection_for(
            new_size,
            self.field_of_view,
            self.screen_near,
            self.screen_depth,
        );
        log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
    }

    /// Makes `program` current for subsequent draws in this frame.
    pub fn bind_program(&mut self, program: BoundProgram) -> Result<()> {
        match &mut self.frame {
            FrameState::Recording(frame) => {
                frame.program = Some(program);
                Ok(())
            }
            FrameState::Skipped => Ok(()),
            FrameState::Idle => bail!("no scene in progress: bind_program before begin_scene"),
        }
    }

    /// Uploads one matrix uniform.
    ///
    /// The write is staged on the queue and lands before the frame's submit.
    pub fn write_matrix(&self, buffer: &wgpu::Buffer, matrix: &Matrix4) {
        self.queue.write_buffer(buffer, 0, bytemuck::bytes_of(matrix));
    }

    /// Records an indexed draw with the currently bound program.
    pub fn draw_indexed(
        &mut self,
        vertex_buffer: &wgpu::Buffer,
        index_buffer: &wgpu::Buffer,
        index_format: wgpu::IndexFormat,
        index_count: u32,
    ) -> Result<()> {
        match &mut self.frame {
            FrameState::Recording(frame) => {
                let program = frame
                    .program
                    .clone()
                    .ok_or_else(|| anyhow!("draw issued with no shader program bound"))?;
                frame.draws.push(DrawCall {
                    program,
                    vertex_buffer: vertex_buffer.clone(),
                    index_buffer: index_buffer.clone(),
                    index_format,
                    index_count,
                });
                Ok(())
            }
            FrameState::Skipped => Ok(()),
            FrameState::Idle => bail!("no scene in progress: draw before begin_scene"),
        }
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }

    fn encode_scene(
        &self,
        view: &wgpu::TextureView,
        clear: Color,
        draws: &[DrawCall],
    ) -> wgpu::CommandBuffer {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("prism frame encoder"),
            });

        // Pass is dropped before the encoder is finished.
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("prism scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for draw in draws {
                rpass.set_pipeline(&draw.program.pipeline);
                rpass.set_bind_group(0, &draw.program.bind_group, &[]);
                rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                rpass.set_index_buffer(draw.index_buffer.slice(..), draw.index_format);
                rpass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        encoder.finish()
    }
}

impl GraphicsContext for Gpu<'_> {
    fn begin_scene(&mut self, clear: Color) -> Result<()> {
        if !matches!(self.frame, FrameState::Idle) {
            log::warn!("begin_scene while a frame is open; discarding it");
            self.frame = FrameState::Idle;
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                return match self.handle_surface_error(&err) {
                    SurfaceErrorAction::Fatal => {
                        Err(anyhow!("failed to acquire surface texture: {err}"))
                    }
                    action => {
                        log::debug!("surface error {err}: {action:?}, skipping frame");
                        self.frame = FrameState::Skipped;
                        Ok(())
                    }
                };
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.frame = FrameState::Recording(SceneFrame {
            surface_texture,
            view,
            clear,
            program: None,
            draws: Vec::new(),
            errors: ErrorScope::open(&self.device),
        });
        Ok(())
    }

    fn end_scene(&mut self) -> Result<()> {
        let frame = match std::mem::replace(&mut self.frame, FrameState::Idle) {
            FrameState::Recording(frame) => frame,
            FrameState::Skipped => return Ok(()),
            FrameState::Idle => bail!("end_scene without begin_scene"),
        };

        let SceneFrame {
            surface_texture,
            view,
            clear,
            program: _,
            draws,
            errors,
        } = frame;

        let commands = self.encode_scene(&view, clear, &draws);
        self.queue.submit(std::iter::once(commands));
        let submitted = captured("frame submission", errors.close());

        self.window.pre_present_notify();
        drop(view);
        surface_texture.present();
        submitted
    }

    fn world_matrix(&self) -> Matrix4 {
        self.world_matrix
    }

    fn projection_matrix(&self) -> Matrix4 {
        self.projection_matrix
    }
}

fn projection_for(
    size: PhysicalSize<u32>,
    field_of_view: f32,
    screen_near: f32,
    screen_depth: f32,
) -> Matrix4 {
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    Matrix4::perspective_fov_lh(field_of_view, aspect, screen_near, screen_depth)
}
