use wgpu::util::DeviceExt;

use crate::device::Gpu;
use crate::math::Vector3;
use crate::paint::Color;
use crate::render::SceneGeometry;

use super::Vertex;

/// Bottom-left, top, bottom-right: clockwise when viewed looking down +z.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(Vector3::new(-1.0, -1.0, 0.0), Color::GREEN),
    Vertex::new(Vector3::new(0.0, 1.0, 0.0), Color::GREEN),
    Vertex::new(Vector3::new(1.0, -1.0, 0.0), Color::GREEN),
];

pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// A single green triangle, uploaded once at construction.
pub struct TriangleModel {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

impl TriangleModel {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertices = TRIANGLE_VERTICES.to_vec();
        let indices = TRIANGLE_INDICES.to_vec();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism triangle vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("prism triangle ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "triangle model uploaded: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );

        Self {
            vertices,
            indices,
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

impl<'w> SceneGeometry<Gpu<'w>> for TriangleModel {
    fn render(&self, gpu: &mut Gpu<'w>) -> anyhow::Result<()> {
        gpu.draw_indexed(
            &self.vertex_buffer,
            &self.index_buffer,
            wgpu::IndexFormat::Uint32,
            self.index_count(),
        )
    }
}
