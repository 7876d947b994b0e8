//! # Graphics Resources Builder
//!
//! Creates the wgpu session for a window: instance, surface, adapter, device
//! and queue, plus the WGSL sources named by the configuration.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources of one session
//! - `GraphicsBuilder`: Builds a session and sends it back through the event loop

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use log::info;
use wgpu::{Device, Features, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::EngineConfig,
    error::{EngineError, EngineResult},
};

/// Outcome of one build, delivered as the event loop's user event.
pub type GraphicsEvent = EngineResult<Graphics>;

/// Everything a [`RenderManager`](crate::engine_state::rendering::RenderManager)
/// needs to start a session.
pub struct Graphics {
    /// Window the surface draws into
    pub window: Arc<Window>,
    /// Surface of the window, already configured
    pub surface: Surface<'static>,
    /// Configuration the surface was configured with
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device
    pub device: Device,
    /// The WebGPU queue
    pub queue: Queue,
    /// WGSL source of the ground plane pipeline
    pub plane_shader: String,
    /// WGSL source of the UI pipeline
    pub ui_shader: String,
}

fn init_failure(context: &str, err: impl std::fmt::Display) -> EngineError {
    EngineError::BackendInitFailure(format!("{}: {}", context, err))
}

fn read_shader(path: &Path) -> EngineResult<String> {
    std::fs::read_to_string(path).map_err(|e| init_failure(&path.display().to_string(), e))
}

/// Creates the graphics resources for `window`, or for a new window.
///
/// The window and surface are created up front; adapter and device requests
/// happen in the returned future.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window
/// * `config` - Window title and shader paths
/// * `window` - Window of a previous session, reused after a suspend
fn create_graphics(
    event_loop: &ActiveEventLoop,
    config: &EngineConfig,
    window: Option<Arc<Window>>,
) -> EngineResult<impl Future<Output = GraphicsEvent> + 'static> {
    let window = match window {
        Some(window) => window,
        None => {
            let window_attrs = Window::default_attributes().with_title(config.window_title.clone());
            Arc::new(
                event_loop
                    .create_window(window_attrs)
                    .map_err(|e| init_failure("window creation", e))?,
            )
        }
    };

    let plane_shader = read_shader(&config.plane_shader_path)?;
    let ui_shader = read_shader(&config.ui_shader_path)?;

    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .map_err(|e| init_failure("surface creation", e))?;

    Ok(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| init_failure("adapter request", e))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| init_failure("device request", e))?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| init_failure("surface", "no supported format"))?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        info!(
            "Graphics ready on {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            plane_shader,
            ui_shader,
        })
    })
}

/// Builds graphics sessions and hands them to the event loop.
///
/// One builder serves every `resumed` of the application: each call to
/// [`build_and_send`](Self::build_and_send) delivers exactly one
/// [`GraphicsEvent`].
pub struct GraphicsBuilder {
    event_loop_proxy: EventLoopProxy<GraphicsEvent>,
}

impl GraphicsBuilder {
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the built session back to the event loop
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsEvent>) -> Self {
        Self { event_loop_proxy }
    }

    /// Builds a session and sends the outcome as a user event.
    ///
    /// Failures are sent too, so the application can end the session.
    pub fn build_and_send(
        &self,
        event_loop: &ActiveEventLoop,
        config: &EngineConfig,
        window: Option<Arc<Window>>,
    ) {
        let gfx = match create_graphics(event_loop, config, window) {
            Ok(gfx_fut) => pollster::block_on(gfx_fut),
            Err(err) => Err(err),
        };

        if self.event_loop_proxy.send_event(gfx).is_err() {
            log::error!("Event loop closed before graphics could be delivered");
        }
    }
}
