//! # Engine State Module
//!
//! The core engine module that owns the sandbox's state and drives one frame at
//! a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container: element store, draw buckets and
//!   the ground plane
//! * `buffer_state` - Manages GPU buffers for rendering
//! * `rendering` - Draw buckets, the UI, the ground plane and the wgpu backend
//!
//! ## Architecture
//!
//! `EngineState` never talks to the GPU directly. Each frame it updates the UI,
//! fills its draw buckets and hands the frozen buckets to a
//! [`DrawBackend`](rendering::DrawBackend). The wgpu
//! [`RenderManager`](rendering::RenderManager) is one such backend; tests use a
//! recording one.

use cgmath::Vector2;
use log::{debug, warn};

use rendering::{
    meshing::{plane_transform, MeshPlane, QUAD_TEMPLATE},
    ui::{ElementStore, QuadInstance, UiFrameReport, UiManager},
    DrawBackend, DrawBucket, MeshInstance, MESH_BUCKET_CAPACITY, UI_BUCKET_CAPACITY,
};

use crate::{application_state::input_state::FrameInput, config::EngineConfig, error::EngineResult};

pub mod buffer_state;
mod frame_timer;
pub mod rendering;

pub use frame_timer::FrameTimer;

/// What one call to [`EngineState::frame`] produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Result of the UI update
    pub ui: UiFrameReport,
    /// Quads submitted in the UI bucket
    pub ui_instances: u32,
    /// Instances submitted in the mesh bucket
    pub mesh_instances: u32,
}

/// The main state container of the sandbox.
///
/// # Examples
///
/// ```ignore
/// let mut engine_state = EngineState::new(EngineConfig::default())?;
/// engine_state.bootstrap(Vector2::new(1080.0, 2000.0))?;
///
/// // Once per displayed frame
/// let input = input_manager.get_and_reset_frame_input();
/// engine_state.frame(&input, &mut render_manager)?;
/// ```
pub struct EngineState {
    config: EngineConfig,
    /// UI elements, bottom first
    element_store: ElementStore,
    ui_bucket: DrawBucket<QuadInstance>,
    mesh_bucket: DrawBucket<MeshInstance>,
    /// Ground plane geometry, built once
    plane: MeshPlane,
    /// Surface size in pixels
    resolution: Vector2<f32>,
    frame_timer: FrameTimer,
}

impl EngineState {
    /// Creates the engine state and generates the ground plane.
    ///
    /// The UI is empty until [`bootstrap`](Self::bootstrap) is called. Fails
    /// when the configured plane does not fit in one vertex buffer.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let plane = MeshPlane::generate(config.plane_quads_per_side, &QUAD_TEMPLATE)?;
        debug!(
            "Ground plane generated: {} quads per side, {} vertices",
            plane.side_count(),
            plane.vertex_count()
        );

        Ok(Self {
            config,
            element_store: ElementStore::new(),
            ui_bucket: DrawBucket::new("ui bucket", UI_BUCKET_CAPACITY),
            mesh_bucket: DrawBucket::new("mesh bucket", MESH_BUCKET_CAPACITY),
            plane,
            resolution: Vector2::new(0.0, 0.0),
            frame_timer: FrameTimer::new(),
        })
    }

    /// Sets the resolution and rebuilds the built-in UI elements for it.
    ///
    /// Spawned elements and the selection are discarded.
    pub fn bootstrap(&mut self, resolution: Vector2<f32>) -> EngineResult<()> {
        self.resolution = resolution;
        UiManager::bootstrap(&mut self.element_store, resolution)
    }

    /// Updates the resolution used by hit testing and the plane projection.
    ///
    /// Existing elements keep their rectangles.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.resolution = Vector2::new(width as f32, height as f32);
    }

    /// Runs one frame against `backend`.
    ///
    /// # Arguments
    /// * `input` - Input snapshot of this frame
    /// * `backend` - Consumer of the frozen buckets
    ///
    /// # Returns
    /// What the frame did, or the first backend error. Instances dropped by a
    /// full bucket are logged and the frame goes on.
    pub fn frame<B: DrawBackend>(
        &mut self,
        input: &FrameInput,
        backend: &mut B,
    ) -> EngineResult<FrameReport> {
        let ui = UiManager::update(&mut self.element_store, input, self.resolution);

        if let Err(err) = UiManager::fill_bucket(&self.element_store, &mut self.ui_bucket) {
            warn!("UI bucket incomplete: {}", err);
        }

        self.mesh_bucket
            .begin(Some(plane_transform(input.touch, self.resolution)));
        if let Err(err) = self.mesh_bucket.push_instance(MeshInstance::identity()) {
            warn!("Mesh bucket incomplete: {}", err);
        }
        self.mesh_bucket.end()?;

        let mesh = self.mesh_bucket.frozen()?;
        let quads = self.ui_bucket.frozen()?;
        let report = FrameReport {
            ui,
            ui_instances: quads.instance_count(),
            mesh_instances: mesh.instance_count(),
        };

        backend.clear_screen(self.config.clear_color);
        backend.draw_mesh(mesh, self.plane.vertex_count())?;
        backend.draw_instanced(quads)?;
        backend.swap_buffers()?;

        if let Some(fps) = self.frame_timer.tick() {
            debug!(
                "{:.1} fps, last frame {:.2} ms",
                fps,
                self.frame_timer.last_delta().as_secs_f32() * 1000.0
            );
        }

        Ok(report)
    }

    /// Settings of this run.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// UI elements, bottom first.
    pub fn element_store(&self) -> &ElementStore {
        &self.element_store
    }

    /// Ground plane geometry.
    pub fn plane(&self) -> &MeshPlane {
        &self.plane
    }

    /// Surface size in pixels used by hit testing.
    pub fn resolution(&self) -> Vector2<f32> {
        self.resolution
    }
}
