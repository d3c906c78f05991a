//! Stereo renderer
//!
//! Renders each eye's scene into its own offscreen texture. Billboard
//! pixels are uploaded once and cached by billboard id; the draw path is a
//! clear pass followed by one textured quad per billboard.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use wgpu;

use super::{unit_quad, BillboardUniforms, Vertex};
use crate::rig::{Eye, EyeCamera, EyeSink};
use crate::scene::{Billboard, BillboardId, Scene};

/// Offscreen render target for one eye
struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }
}

/// Uploaded billboard pixels plus their bind group
struct BillboardTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// GPU renderer for the two eye scenes
pub struct StereoRenderer {
    device: Option<Arc<wgpu::Device>>,
    queue: Option<Arc<wgpu::Queue>>,
    pipeline: Option<wgpu::RenderPipeline>,
    texture_bind_group_layout: Option<wgpu::BindGroupLayout>,
    uniform_bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    uniform_buffer: Option<wgpu::Buffer>,
    vertex_buffer: Option<wgpu::Buffer>,
    left_target: Option<RenderTarget>,
    right_target: Option<RenderTarget>,
    /// Uploaded panel pixels keyed by billboard id
    textures: HashMap<BillboardId, BillboardTexture>,
    /// Per-eye target size
    width: u32,
    height: u32,
}

impl Default for StereoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoRenderer {
    pub fn new() -> Self {
        Self {
            device: None,
            queue: None,
            pipeline: None,
            texture_bind_group_layout: None,
            uniform_bind_group_layout: None,
            sampler: None,
            uniform_buffer: None,
            vertex_buffer: None,
            left_target: None,
            right_target: None,
            textures: HashMap::new(),
            width: 640,
            height: 720,
        }
    }

    /// Initialize with GPU resources
    pub fn initialize(&mut self, device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) {
        self.device = Some(device.clone());
        self.queue = Some(queue);
        self.create_pipeline(&device);
        self.create_targets();
    }

    /// Check if initialized
    pub fn is_initialized(&self) -> bool {
        self.device.is_some() && self.queue.is_some()
    }

    fn create_pipeline(&mut self, device: &wgpu::Device) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Billboard Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/billboard.wgsl").into()),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Billboard Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Billboard Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Billboard Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Billboard Pipeline Layout"),
            bind_group_layouts: &[&texture_bind_group_layout, &uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Billboard Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::LAYOUT],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Billboard Uniform Buffer"),
            size: std::mem::size_of::<BillboardUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertices = unit_quad();
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Billboard Vertex Buffer"),
            size: (std::mem::size_of::<Vertex>() * vertices.len()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if let Some(queue) = &self.queue {
            queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        self.pipeline = Some(pipeline);
        self.texture_bind_group_layout = Some(texture_bind_group_layout);
        self.uniform_bind_group_layout = Some(uniform_bind_group_layout);
        self.sampler = Some(sampler);
        self.uniform_buffer = Some(uniform_buffer);
        self.vertex_buffer = Some(vertex_buffer);
    }

    fn create_targets(&mut self) {
        let Some(device) = &self.device else { return };
        self.left_target = Some(RenderTarget::new(
            device,
            "Left Eye Target",
            self.width,
            self.height,
        ));
        self.right_target = Some(RenderTarget::new(
            device,
            "Right Eye Target",
            self.width,
            self.height,
        ));
        log::info!("Created eye render targets {}x{}", self.width, self.height);
    }

    /// Resize the per-eye render targets
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.create_targets();
        }
    }

    /// Per-eye target size
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texture view for one eye's target
    pub fn eye_view(&self, eye: Eye) -> Option<&wgpu::TextureView> {
        let target = match eye {
            Eye::Left => self.left_target.as_ref(),
            Eye::Right => self.right_target.as_ref(),
        };
        target.map(|t| &t.view)
    }

    /// Drop all cached billboard textures, forcing re-upload on the next
    /// frame. Called when the scene content is replaced.
    pub fn clear_textures(&mut self) {
        self.textures.clear();
    }

    /// Upload pixels for any billboard not yet cached
    fn prepare_textures(&mut self, scene: &Scene) {
        let Some(device) = &self.device else { return };
        let Some(queue) = &self.queue else { return };
        let Some(layout) = &self.texture_bind_group_layout else {
            return;
        };
        let Some(sampler) = &self.sampler else { return };

        for billboard in &scene.billboards {
            if self.textures.contains_key(&billboard.id) {
                continue;
            }
            let uploaded = upload_billboard(device, queue, layout, sampler, billboard);
            self.textures.insert(billboard.id, uploaded);
        }
    }

    fn render_scene(&self, eye: Eye, scene: &Scene, camera: &EyeCamera) {
        let Some(device) = &self.device else { return };
        let Some(queue) = &self.queue else { return };
        let Some(pipeline) = &self.pipeline else { return };
        let Some(uniform_layout) = &self.uniform_bind_group_layout else {
            return;
        };
        let Some(uniform_buffer) = &self.uniform_buffer else {
            return;
        };
        let Some(vertex_buffer) = &self.vertex_buffer else {
            return;
        };
        let target = match eye {
            Eye::Left => self.left_target.as_ref(),
            Eye::Right => self.right_target.as_ref(),
        };
        let Some(target) = target else { return };

        let bg = scene.background;
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Eye Clear Encoder"),
        });

        // Clear pass with the scene background
        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Eye Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: bg[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        queue.submit(std::iter::once(encoder.finish()));

        // One pass per billboard, loading the previous contents
        for billboard in &scene.billboards {
            let Some(uploaded) = self.textures.get(&billboard.id) else {
                continue;
            };

            let uniforms = BillboardUniforms::new(camera, billboard);
            queue.write_buffer(uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

            let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Billboard Uniform Bind Group"),
                layout: uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Billboard Encoder"),
            });
            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Billboard Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &uploaded.bind_group, &[]);
                render_pass.set_bind_group(1, &uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                render_pass.draw(0..6, 0..1);
            }
            queue.submit(std::iter::once(encoder.finish()));
        }
    }
}

impl EyeSink for StereoRenderer {
    fn render_eye(&mut self, eye: Eye, scene: &Scene, camera: &EyeCamera) {
        if !self.is_initialized() {
            return;
        }
        self.prepare_textures(scene);
        self.render_scene(eye, scene, camera);
    }
}

fn upload_billboard(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    billboard: &Billboard,
) -> BillboardTexture {
    let image = &billboard.image;
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Billboard Panel Texture"),
        size: wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(image.width * 4),
            rows_per_image: None,
        },
        wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Billboard Texture Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    BillboardTexture {
        texture,
        bind_group,
        width: image.width,
        height: image.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PanelDocument, PanelSource, ScenePair};

    #[test]
    fn test_uninitialized_renderer_skips_render() {
        let mut renderer = StereoRenderer::new();
        assert!(!renderer.is_initialized());
        let source = PanelSource::Document(PanelDocument::builtin());
        let mut pair = ScenePair::default();
        crate::scene::instance_panel(&source, &mut pair);
        let camera = EyeCamera::new(glam::Vec3::new(-5.0, 0.0, 350.0), 1.0);
        // Must be a no-op without GPU resources
        renderer.render_eye(Eye::Left, &pair.left, &camera);
        assert!(renderer.eye_view(Eye::Left).is_none());
    }

    #[test]
    fn test_resize_ignores_degenerate_sizes() {
        let mut renderer = StereoRenderer::new();
        let before = renderer.dimensions();
        renderer.resize(0, 720);
        renderer.resize(640, 0);
        assert_eq!(renderer.dimensions(), before);
        renderer.resize(800, 600);
        assert_eq!(renderer.dimensions(), (800, 600));
    }

    #[test]
    fn test_clear_textures_empties_cache() {
        let mut renderer = StereoRenderer::new();
        renderer.clear_textures();
        assert!(renderer.textures.is_empty());
    }
}
