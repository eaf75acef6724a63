use bytemuck::{Pod, Zeroable};

use crate::math::Vector3;
use crate::paint::Color;

/// Position + color vertex, matching `VertexInput` in `color.vert.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // inputPosition
        1 => Float32x3  // inputColor
    ];

    /// Alpha is dropped; the fragment stage writes an opaque color.
    pub const fn new(position: Vector3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.rgb(),
        }
    }

    pub fn position(&self) -> Vector3 {
        Vector3::from(self.position)
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
