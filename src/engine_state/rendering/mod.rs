//! Rendering system of the sandbox.
//!
//! This module contains the draw buckets, the UI and the ground plane, and the
//! wgpu backend that turns frozen buckets into frames.
//!
//! # Frame flow
//! 1. The frame driver fills the UI and mesh buckets and freezes them.
//! 2. It hands them to a [`DrawBackend`], here the [`RenderManager`].
//! 3. The render manager uploads the instances, records the draws and encodes
//!    them into a single render pass on `swap_buffers`.
//!
//! Pipelines are built from user-supplied WGSL, so their creation runs inside
//! a validation error scope and a bad shader fails the session instead of the
//! process.

use log::{debug, info};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::{
    core::StSystem,
    engine_state::buffer_state::BufferState,
    error::{EngineError, EngineResult},
};

mod backend;
mod bind_group_state;
pub mod draw_bucket;
pub mod meshing;
mod pipeline_manager;
mod texture;
pub mod ui;
mod vertex;

pub use backend::DrawBackend;
pub use draw_bucket::{
    BucketState, BucketTransform, DrawBucket, FrozenBucket, MESH_BUCKET_CAPACITY,
    UI_BUCKET_CAPACITY,
};
pub use pipeline_manager::{PendingDraw, ShaderSources};
pub use vertex::{MeshInstance, ScreenUniform, TransformUniform, Vertex3d};

use meshing::MeshPlane;
use pipeline_manager::PipelineManager;
use ui::QuadInstance;

/// Owns the graphics session: surface, device, queue and pipelines.
///
/// Dropping it releases every GPU resource of the session.
pub struct RenderManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: StSystem<Device>,
    /// The WebGPU queue for submitting command buffers
    pub queue: StSystem<Queue>,
    /// Registry of every GPU buffer of the session
    pub buffer_state: StSystem<BufferState>,
    /// Manages the rendering pipelines and the render pass
    pub pipeline_manager: PipelineManager,
}

impl RenderManager {
    /// Creates the pipelines and GPU buffers of a new session.
    ///
    /// # Arguments
    /// * `surface` - The WebGPU surface to render to, already configured
    /// * `surface_config` - Configuration for the surface
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `shaders` - WGSL sources of the plane and UI pipelines
    /// * `plane` - Geometry of the ground plane
    ///
    /// # Returns
    /// `BackendInitFailure` if a shader, pipeline or buffer fails validation
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shaders: ShaderSources<'_>,
        plane: &MeshPlane,
    ) -> EngineResult<Self> {
        let device = StSystem::new(Box::new(device));
        let queue = StSystem::new(Box::new(queue));
        let buffer_state = StSystem::new(Box::new(BufferState::new(
            device.clone(),
            queue.clone(),
        )));

        device.get().push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline_manager = PipelineManager::new(
            device.clone(),
            &surface_config,
            surface_config.format,
            buffer_state.clone(),
            shaders,
            plane,
        );
        let scope_error = pollster::block_on(device.get().pop_error_scope());
        scope_outcome("pipeline creation", scope_error)?;

        info!(
            "Render manager ready: {}x{} {:?}",
            surface_config.width, surface_config.height, surface_config.format
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state,
            pipeline_manager,
        })
    }

    /// Handles window resize events.
    ///
    /// # Arguments
    /// * `size` - The new window size in physical pixels
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device.get(), &self.surface_config);
        self.pipeline_manager
            .resize(self.device.clone(), &self.surface_config);
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}

/// Maps the error caught by a popped validation scope to a session failure.
fn scope_outcome(context: &str, error: Option<wgpu::Error>) -> EngineResult<()> {
    match error {
        Some(err) => Err(EngineError::BackendInitFailure(format!(
            "{}: {}",
            context, err
        ))),
        None => Ok(()),
    }
}

impl DrawBackend for RenderManager {
    fn clear_screen(&mut self, color: [f32; 4]) {
        self.pipeline_manager.set_clear_color(color);
    }

    fn draw_mesh(
        &mut self,
        bucket: FrozenBucket<'_, MeshInstance>,
        vertex_count: u32,
    ) -> EngineResult<()> {
        self.pipeline_manager.queue_plane(&bucket, vertex_count);
        Ok(())
    }

    fn draw_instanced(&mut self, bucket: FrozenBucket<'_, QuadInstance>) -> EngineResult<()> {
        self.pipeline_manager.queue_ui(&bucket);
        Ok(())
    }

    fn swap_buffers(&mut self) -> EngineResult<()> {
        self.pipeline_manager.render(
            &self.surface,
            &self.surface_config,
            self.device.clone(),
            self.queue.clone(),
        )
    }
}

impl Drop for RenderManager {
    fn drop(&mut self) {
        self.buffer_state.get().log_analytics();
        debug!("Render manager dropped, GPU resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_scope_is_ok() {
        assert_eq!(scope_outcome("pipeline creation", None), Ok(()));
    }

    #[test]
    fn test_validation_error_fails_the_session() {
        let error = wgpu::Error::Validation {
            source: Box::new(std::fmt::Error),
            description: String::from("Shader 'UI Shader' parsing error: expected ';'"),
        };

        let result = scope_outcome("pipeline creation", Some(error));
        assert_eq!(
            result,
            Err(EngineError::BackendInitFailure(String::from(
                "pipeline creation: Shader 'UI Shader' parsing error: expected ';'"
            )))
        );
    }
}
