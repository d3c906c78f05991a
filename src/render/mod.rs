//! Render module for GPU rendering
//!
//! Handles wgpu rendering of the per-eye scenes into offscreen textures
//! that the UI shows side by side.

#![allow(dead_code)]

mod stereo;

pub use stereo::StereoRenderer;

use crate::rig::EyeCamera;
use crate::scene::Billboard;

/// Vertex format for billboard rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Uniform data for the billboard shader
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BillboardUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl BillboardUniforms {
    pub fn new(camera: &EyeCamera, billboard: &Billboard) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: billboard.model_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for BillboardUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Unit quad centered on the origin, scaled by the billboard model matrix
pub fn unit_quad() -> [Vertex; 6] {
    [
        Vertex::new([-0.5, -0.5], [0.0, 1.0]),
        Vertex::new([0.5, -0.5], [1.0, 1.0]),
        Vertex::new([0.5, 0.5], [1.0, 0.0]),
        Vertex::new([-0.5, -0.5], [0.0, 1.0]),
        Vertex::new([0.5, 0.5], [1.0, 0.0]),
        Vertex::new([-0.5, 0.5], [0.0, 0.0]),
    ]
}
