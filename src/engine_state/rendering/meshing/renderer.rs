//! Ground plane renderer.
//!
//! Owns the render pipeline of the 3D pass. The plane's vertices live in a
//! static vertex buffer uploaded once; each frame the frozen mesh bucket is
//! copied into the instance buffer and its transform into the uniform buffer,
//! and the plane is drawn once per instance.

use wgpu::{Device, RenderPass, RenderPipeline, TextureFormat};

use super::{
    mesh_plane::MeshPlane, MESH_INSTANCE_BUFFER, PLANE_VERTEX_BUFFER, TRANSFORM_UNIFORM_BUFFER,
};
use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::BufferState,
        rendering::{
            bind_group_state::{BindGroupState, TRANSFORM_BIND_GROUP, TRANSFORM_BIND_GROUP_LAYOUT},
            draw_bucket::{FrozenBucket, MESH_BUCKET_CAPACITY},
            vertex::{MeshInstance, TransformUniform, Vertex3d},
        },
    },
};

/// Draws the ground plane with its own pipeline.
pub struct PlaneRenderer {
    /// The WebGPU render pipeline for the plane
    render_pipeline: RenderPipeline,
    /// Shared state for buffer management
    buffer_state: StSystem<BufferState>,
    /// Shared state for bind group management
    bind_group_state: StSystem<BindGroupState>,
}

impl PlaneRenderer {
    /// Creates the plane's vertex, instance and uniform buffers.
    ///
    /// Must run before the bind groups are created, since the transform bind
    /// group points at the uniform buffer.
    pub fn create_buffers(buffer_state: &mut BufferState, plane: &MeshPlane) {
        buffer_state.create_buffer_init(
            PLANE_VERTEX_BUFFER,
            wgpu::util::BufferInitDescriptor {
                label: Some(PLANE_VERTEX_BUFFER),
                contents: bytemuck::cast_slice(plane.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        buffer_state.create_buffer(
            MESH_INSTANCE_BUFFER,
            wgpu::BufferDescriptor {
                label: Some(MESH_INSTANCE_BUFFER),
                size: (std::mem::size_of::<MeshInstance>() * MESH_BUCKET_CAPACITY) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            },
        );

        buffer_state.create_buffer_init(
            TRANSFORM_UNIFORM_BUFFER,
            wgpu::util::BufferInitDescriptor {
                label: Some(TRANSFORM_UNIFORM_BUFFER),
                contents: bytemuck::cast_slice(&[TransformUniform::new()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
    }

    /// Creates a new `PlaneRenderer` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    /// * `bind_group_state` - State for managing bind groups
    /// * `shader_source` - The WGSL source of the plane shader
    /// * `texture_format` - The texture format to use for rendering
    /// * `depth_stencil` - Optional depth stencil state
    pub fn new(
        device: StSystem<Device>,
        buffer_state: StSystem<BufferState>,
        bind_group_state: StSystem<BindGroupState>,
        shader_source: &str,
        texture_format: TextureFormat,
        depth_stencil: Option<wgpu::DepthStencilState>,
    ) -> Self {
        let device_ref = device.get();

        let pipeline_layout = device_ref.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plane Render Pipeline Layout"),
            bind_group_layouts: &[bind_group_state
                .get()
                .get_bind_group_layout(TRANSFORM_BIND_GROUP_LAYOUT)],
            push_constant_ranges: &[],
        });

        let shader = device_ref.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Plane Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let render_pipeline = device_ref.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Plane Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex3d::desc(), MeshInstance::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The plane is seen from both sides while it spins.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            render_pipeline,
            buffer_state,
            bind_group_state,
        }
    }

    /// Copies a frozen mesh bucket into the instance and uniform buffers.
    ///
    /// # Returns
    /// The number of instances to draw
    pub fn upload(&self, bucket: &FrozenBucket<'_, MeshInstance>) -> u32 {
        let buffer_state = self.buffer_state.get();

        if let Some(transform) = bucket.transform {
            let mut uniform = TransformUniform::new();
            uniform.update(&transform);
            buffer_state.write_buffer(
                TRANSFORM_UNIFORM_BUFFER,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }

        if !bucket.is_empty() {
            buffer_state.write_buffer(
                MESH_INSTANCE_BUFFER,
                0,
                bytemuck::cast_slice(bucket.instances),
            );
        }

        bucket.instance_count()
    }

    /// Records the plane draw into the render pass.
    ///
    /// # Arguments
    /// * `render_pass` - The render pass to draw with
    /// * `vertex_count` - Number of plane vertices
    /// * `instance_count` - Number of instances uploaded by [`PlaneRenderer::upload`]
    pub fn render(&self, render_pass: &mut RenderPass<'_>, vertex_count: u32, instance_count: u32) {
        if instance_count == 0 || vertex_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(
            0,
            self.bind_group_state.get().get_bind_group(TRANSFORM_BIND_GROUP),
            &[],
        );
        render_pass.set_vertex_buffer(
            0,
            self.buffer_state.get().get_buffer(PLANE_VERTEX_BUFFER).slice(..),
        );
        render_pass.set_vertex_buffer(
            1,
            self.buffer_state.get().get_buffer(MESH_INSTANCE_BUFFER).slice(..),
        );
        render_pass.draw(0..vertex_count, 0..instance_count);
    }
}
