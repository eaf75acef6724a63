use std::num::NonZeroU64;

use crate::device::{BoundProgram, ErrorScope, Gpu};
use crate::math::Matrix4;
use crate::render::ShaderProgram;
use crate::scene::Vertex;

use super::program::{
    resolve_transform_uniforms, ProgramInterface, UniformLocation, FRAGMENT_ENTRY,
    MATRIX_UNIFORM_SIZE, VERTEX_ENTRY,
};
use super::{ShaderError, ShaderSources};

/// Vertex-colored program: transforms positions by world, view and
/// projection, and passes the per-vertex color through.
pub struct ColorShader {
    interface: ProgramInterface,
    program: BoundProgram,
    /// One 64-byte buffer per reflected uniform, keyed by its location.
    uniform_buffers: Vec<(UniformLocation, wgpu::Buffer)>,
}

impl ColorShader {
    /// Links `sources` and builds the pipeline for `color_format` render targets.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sources: &ShaderSources,
    ) -> Result<Self, ShaderError> {
        let interface = ProgramInterface::link(sources)?;
        let errors = ErrorScope::open(device);

        let min_binding_size = NonZeroU64::new(MATRIX_UNIFORM_SIZE);
        let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = interface
            .uniforms()
            .iter()
            .map(|slot| wgpu::BindGroupLayoutEntry {
                binding: slot.location.binding,
                visibility: slot.stages,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size,
                },
                count: None,
            })
            .collect();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("prism color bgl"),
            entries: &layout_entries,
        });

        let uniform_buffers: Vec<(UniformLocation, wgpu::Buffer)> = interface
            .uniforms()
            .iter()
            .map(|slot| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&slot.name),
                    size: MATRIX_UNIFORM_SIZE,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (slot.location, buffer)
            })
            .collect();

        let bind_entries: Vec<wgpu::BindGroupEntry> = uniform_buffers
            .iter()
            .map(|(location, buffer)| wgpu::BindGroupEntry {
                binding: location.binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("prism color bind group"),
            layout: &bind_group_layout,
            entries: &bind_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism color pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism color vertex shader"),
            source: wgpu::ShaderSource::Wgsl(sources.vertex.code.as_str().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism color fragment shader"),
            source: wgpu::ShaderSource::Wgsl(sources.fragment.code.as_str().into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prism color pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Geometry is authored clockwise as seen by the camera.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = errors.close() {
            return Err(ShaderError::Device(err.to_string()));
        }

        log::info!(
            "color shader ready ({} + {})",
            sources.vertex.path.display(),
            sources.fragment.path.display()
        );

        Ok(Self {
            interface,
            program: BoundProgram {
                pipeline,
                bind_group,
            },
            uniform_buffers,
        })
    }

    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }

    fn buffer_at(&self, location: UniformLocation) -> Result<&wgpu::Buffer, ShaderError> {
        self.uniform_buffers
            .iter()
            .find(|(l, _)| *l == location)
            .map(|(_, buffer)| buffer)
            .ok_or_else(|| ShaderError::link(format!("no uniform buffer allocated at {location}")))
    }
}

impl<'w> ShaderProgram<Gpu<'w>> for ColorShader {
    fn set_shader(&self, gpu: &mut Gpu<'w>) -> anyhow::Result<()> {
        gpu.bind_program(self.program.clone())
    }

    fn set_shader_params(
        &self,
        gpu: &mut Gpu<'w>,
        world: &Matrix4,
        view: &Matrix4,
        projection: &Matrix4,
    ) -> Result<(), ShaderError> {
        let locations = resolve_transform_uniforms(&self.interface)?;

        let world_buffer = self.buffer_at(locations.world)?;
        let view_buffer = self.buffer_at(locations.view)?;
        let projection_buffer = self.buffer_at(locations.projection)?;

        gpu.write_matrix(world_buffer, world);
        gpu.write_matrix(view_buffer, view);
        gpu.write_matrix(projection_buffer, projection);
        Ok(())
    }
}
