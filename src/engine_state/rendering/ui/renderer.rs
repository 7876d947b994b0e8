//! UI rendering module.
//!
//! This module draws the UI bucket on top of the 3D scene. Every element is one
//! instance of a shared unit quad; the vertex shader stretches the quad between
//! the instance's pixel corners and maps pixels to clip space with the screen
//! uniform.

use wgpu::{DepthStencilState, Device, RenderPass, RenderPipeline, ShaderModule, TextureFormat};

use super::primitives::{QuadInstance, QuadVertex, UNIT_QUAD};
use crate::core::StSystem;
use crate::engine_state::buffer_state::BufferState;
use crate::engine_state::rendering::bind_group_state::{
    BindGroupState, SCREEN_BIND_GROUP, SCREEN_BIND_GROUP_LAYOUT,
};
use crate::engine_state::rendering::draw_bucket::{FrozenBucket, UI_BUCKET_CAPACITY};
use crate::engine_state::rendering::vertex::ScreenUniform;

/// Buffer names used by the UI system
pub mod buffer_names {
    /// Name of the unit quad vertex buffer
    pub const UI_QUAD_VERTEX_BUFFER: &str = "ui_quad_vertex_buffer";
    /// Name of the per-instance buffer of the UI bucket
    pub const UI_INSTANCE_BUFFER: &str = "ui_instance_buffer";
    /// Name of the uniform buffer holding the surface size
    pub const SCREEN_UNIFORM_BUFFER: &str = "screen_uniform_buffer";
}

use buffer_names::{SCREEN_UNIFORM_BUFFER, UI_INSTANCE_BUFFER, UI_QUAD_VERTEX_BUFFER};

/// Draws the UI bucket with its own pipeline.
pub struct UiRenderer {
    /// The WebGPU render pipeline for UI elements
    render_pipeline: RenderPipeline,
    buffer_state: StSystem<BufferState>,
    bind_group_state: StSystem<BindGroupState>,
}

impl UiRenderer {
    /// Creates the unit quad, instance and screen uniform buffers.
    pub fn create_buffers(buffer_state: &mut BufferState, width: u32, height: u32) {
        buffer_state.create_buffer_init(
            UI_QUAD_VERTEX_BUFFER,
            wgpu::util::BufferInitDescriptor {
                label: Some(UI_QUAD_VERTEX_BUFFER),
                contents: bytemuck::cast_slice(&UNIT_QUAD),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        buffer_state.create_buffer(
            UI_INSTANCE_BUFFER,
            wgpu::BufferDescriptor {
                label: Some(UI_INSTANCE_BUFFER),
                size: (std::mem::size_of::<QuadInstance>() * UI_BUCKET_CAPACITY) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            },
        );

        buffer_state.create_buffer_init(
            SCREEN_UNIFORM_BUFFER,
            wgpu::util::BufferInitDescriptor {
                label: Some(SCREEN_UNIFORM_BUFFER),
                contents: bytemuck::cast_slice(&[ScreenUniform::new(width, height)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
    }

    /// Creates a new `UiRenderer` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `format` - Texture format for the surface
    /// * `depth_stencil` - Optional depth stencil state
    /// * `ui_shader_source` - Source code for the UI shader
    /// * `buffer_state` - Reference to the buffer state for managing GPU buffers
    /// * `bind_group_state` - Reference to the bind group registry
    pub fn new(
        device: &Device,
        format: TextureFormat,
        depth_stencil: Option<DepthStencilState>,
        ui_shader_source: &str,
        buffer_state: StSystem<BufferState>,
        bind_group_state: StSystem<BindGroupState>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("UI Shader"),
            source: wgpu::ShaderSource::Wgsl(ui_shader_source.into()),
        });

        let render_pipeline = Self::create_render_pipeline(
            device,
            &shader,
            format,
            depth_stencil,
            &bind_group_state.get(),
        );

        Self {
            render_pipeline,
            buffer_state,
            bind_group_state,
        }
    }

    fn create_render_pipeline(
        device: &Device,
        shader: &ShaderModule,
        format: TextureFormat,
        depth_stencil: Option<DepthStencilState>,
        bind_group_state: &BindGroupState,
    ) -> RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("UI Pipeline Layout"),
            bind_group_layouts: &[bind_group_state.get_bind_group_layout(SCREEN_BIND_GROUP_LAYOUT)],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("UI Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::desc(), QuadInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
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
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Copies a frozen UI bucket into the instance buffer.
    ///
    /// # Returns
    /// The number of instances to draw
    pub fn upload(&self, bucket: &FrozenBucket<'_, QuadInstance>) -> u32 {
        if !bucket.is_empty() {
            self.buffer_state.get().write_buffer(
                UI_INSTANCE_BUFFER,
                0,
                bytemuck::cast_slice(bucket.instances),
            );
        }
        bucket.instance_count()
    }

    /// Updates the screen uniform after a resize.
    pub fn resize(&self, width: u32, height: u32) {
        self.buffer_state.get().write_buffer(
            SCREEN_UNIFORM_BUFFER,
            0,
            bytemuck::cast_slice(&[ScreenUniform::new(width, height)]),
        );
    }

    /// Renders the uploaded UI instances, bottom first.
    pub fn render(&self, render_pass: &mut RenderPass<'_>, instance_count: u32) {
        if instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(
            0,
            self.bind_group_state.get().get_bind_group(SCREEN_BIND_GROUP),
            &[],
        );
        render_pass.set_vertex_buffer(
            0,
            self.buffer_state.get().get_buffer(UI_QUAD_VERTEX_BUFFER).slice(..),
        );
        render_pass.set_vertex_buffer(
            1,
            self.buffer_state.get().get_buffer(UI_INSTANCE_BUFFER).slice(..),
        );
        render_pass.draw(0..UNIT_QUAD.len() as u32, 0..instance_count);
    }
}
