//! Manages the WebGPU render pipelines and the frame's render pass.
//!
//! # Architecture
//!
//! - `PipelineManager`: records the frame's draws and encodes them into one pass
//! - `PlaneRenderer`: draws the ground plane with its own pipeline
//! - `UiRenderer`: draws the UI quads with its own pipeline
//!
//! Draws are recorded as they arrive from the frame driver and replayed in that
//! order when the frame is submitted, so the UI composites over the plane.

use log::warn;
use wgpu::{
    CompareFunction, Device, Queue, Surface, SurfaceConfiguration, SurfaceError, TextureFormat,
};

use super::{
    bind_group_state::BindGroupState,
    draw_bucket::FrozenBucket,
    meshing::{MeshPlane, PlaneRenderer},
    texture,
    ui::{QuadInstance, UiRenderer},
    vertex::MeshInstance,
};
use crate::{
    core::StSystem,
    engine_state::buffer_state::BufferState,
    error::{EngineError, EngineResult},
};

/// A draw recorded for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDraw {
    /// The ground plane, drawn once per mesh instance
    Plane {
        /// Vertices of the plane
        vertex_count: u32,
        /// Instances uploaded from the mesh bucket
        instance_count: u32,
    },
    /// The UI quads
    Ui {
        /// Quads uploaded from the UI bucket
        instance_count: u32,
    },
}

/// Shader sources of the two pipelines.
pub struct ShaderSources<'a> {
    /// Source of the ground plane shader
    pub plane: &'a str,
    /// Source of the UI shader
    pub ui: &'a str,
}

/// Coordinates the renderers, shared resources and the render pass.
pub struct PipelineManager {
    /// Manages all bind groups used in the pipeline
    pub bind_group_state: StSystem<BindGroupState>,
    /// Shared state for buffer management
    pub buffer_state: StSystem<BufferState>,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    /// Renderer of the ground plane
    pub plane_renderer: PlaneRenderer,
    /// Renderer of the UI quads
    pub ui_renderer: UiRenderer,
    /// Color the next frame is cleared to
    clear_color: wgpu::Color,
    /// Draws recorded since the last submit
    pending_draws: Vec<PendingDraw>,
}

impl PipelineManager {
    /// Creates a new `PipelineManager` instance.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `config` - Surface configuration containing size and format
    /// * `texture_format` - The texture format to use for rendering
    /// * `buffer_state` - Shared state for buffer management
    /// * `shaders` - WGSL sources of the plane and UI pipelines
    /// * `plane` - Plane geometry uploaded to the static vertex buffer
    pub fn new(
        device: StSystem<Device>,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: StSystem<BufferState>,
        shaders: ShaderSources<'_>,
        plane: &MeshPlane,
    ) -> Self {
        PlaneRenderer::create_buffers(&mut buffer_state.get_mut(), plane);
        UiRenderer::create_buffers(&mut buffer_state.get_mut(), config.width, config.height);

        let bind_group_state = StSystem::new(Box::new(BindGroupState::new(
            device.clone(),
            buffer_state.clone(),
        )));

        let depth_texture =
            texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");

        let plane_depth = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });
        // UI ignores depth and is drawn in submission order
        let ui_depth = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let plane_renderer = PlaneRenderer::new(
            device.clone(),
            buffer_state.clone(),
            bind_group_state.clone(),
            shaders.plane,
            texture_format,
            plane_depth,
        );

        let ui_renderer = UiRenderer::new(
            &device.get(),
            texture_format,
            ui_depth,
            shaders.ui,
            buffer_state.clone(),
            bind_group_state.clone(),
        );

        Self {
            bind_group_state,
            buffer_state,
            depth_texture,
            plane_renderer,
            ui_renderer,
            clear_color: wgpu::Color::BLACK,
            pending_draws: Vec::new(),
        }
    }

    /// Sets the color the next frame is cleared to.
    pub fn set_clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };
    }

    /// Uploads a mesh bucket and records its draw.
    pub fn queue_plane(&mut self, bucket: &FrozenBucket<'_, MeshInstance>, vertex_count: u32) {
        let instance_count = self.plane_renderer.upload(bucket);
        self.pending_draws.push(PendingDraw::Plane {
            vertex_count,
            instance_count,
        });
    }

    /// Uploads a UI bucket and records its draw.
    pub fn queue_ui(&mut self, bucket: &FrozenBucket<'_, QuadInstance>) {
        let instance_count = self.ui_renderer.upload(bucket);
        self.pending_draws.push(PendingDraw::Ui { instance_count });
    }

    /// Encodes the recorded draws into one pass, submits it and presents.
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    ///
    /// # Arguments
    /// * `surface` - The target surface to render to
    /// * `surface_config` - Configuration used to reconfigure a lost surface
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for command submission
    pub fn render(
        &mut self,
        surface: &Surface,
        surface_config: &SurfaceConfiguration,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
    ) -> EngineResult<()> {
        let pending_draws = std::mem::take(&mut self.pending_draws);

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                warn!("Surface {:?}, reconfiguring and skipping the frame", err);
                surface.configure(&device.get(), surface_config);
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(err) => return Err(EngineError::Surface(err.to_string())),
        };

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.get().create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });

            for draw in pending_draws {
                match draw {
                    PendingDraw::Plane {
                        vertex_count,
                        instance_count,
                    } => self
                        .plane_renderer
                        .render(&mut rpass, vertex_count, instance_count),
                    PendingDraw::Ui { instance_count } => {
                        self.ui_renderer.render(&mut rpass, instance_count)
                    }
                }
            }
        }

        queue.get().submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Handles window resize events by recreating the depth texture and
    /// updating the UI's screen size.
    pub fn resize(&mut self, device: StSystem<Device>, config: &SurfaceConfiguration) {
        if self.depth_texture.size() != (config.width, config.height) {
            self.depth_texture =
                texture::Texture::create_depth_texture(&device.get(), config, "DEPTH TEXTURE");
        }
        self.ui_renderer.resize(config.width, config.height);
    }
}
