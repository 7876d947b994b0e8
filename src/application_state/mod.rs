//! # Application State Management
//!
//! This module handles the application's lifecycle, including:
//! - Window and graphics session creation on `resumed`
//! - Session teardown on `suspended`
//! - Input intake and per-frame input snapshots
//! - Driving the engine once per redraw

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use cgmath::Vector2;
use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsEvent};
use input_manager::InputManager;
use log::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::EngineConfig,
    engine_state::{
        rendering::{RenderManager, ShaderSources},
        EngineState,
    },
    error::EngineResult,
};

/// A live graphics session: the window and everything drawn into it.
pub struct GraphicsSession {
    /// Handle to the application window
    pub window: Arc<Window>,
    /// The wgpu backend of the session
    pub render_manager: RenderManager,
}

/// The main application state container that manages the application's lifecycle.
///
/// The engine state and the input manager live as long as the application.
/// The graphics session only exists between `resumed` and `suspended`.
pub struct ApplicationState {
    /// Builds graphics sessions on `resumed`
    graphics_builder: GraphicsBuilder,
    /// UI, buckets and the ground plane
    pub engine_state: EngineState,
    /// Manages input state and event processing
    pub input_manager: InputManager,
    /// The current session, if the window is initialized
    pub session: Option<GraphicsSession>,
    /// Window of the last session, reused when the application resumes
    window: Option<Arc<Window>>,
    has_focus: bool,
}

impl ApplicationState {
    /// Creates the application state. No window exists until `resumed`.
    ///
    /// # Arguments
    /// * `config` - Settings of this run
    /// * `event_loop_proxy` - Delivers built graphics sessions back to the event loop
    pub fn new(
        config: EngineConfig,
        event_loop_proxy: EventLoopProxy<GraphicsEvent>,
    ) -> EngineResult<Self> {
        Ok(Self {
            graphics_builder: GraphicsBuilder::new(event_loop_proxy),
            engine_state: EngineState::new(config)?,
            input_manager: InputManager::new(),
            session: None,
            window: None,
            has_focus: true,
        })
    }

    /// Starts a session with freshly built graphics.
    ///
    /// The UI is rebuilt for the surface size and one frame is drawn. If the
    /// pipelines cannot be created the session is not started.
    fn start_session(&mut self, graphics: Graphics) {
        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            plane_shader,
            ui_shader,
        } = graphics;

        let resolution = Vector2::new(surface_config.width as f32, surface_config.height as f32);
        let render_manager = match RenderManager::new(
            surface,
            surface_config,
            device,
            queue,
            ShaderSources {
                plane: &plane_shader,
                ui: &ui_shader,
            },
            self.engine_state.plane(),
        ) {
            Ok(render_manager) => render_manager,
            Err(err) => {
                error!("Session not started: {}", err);
                self.window = Some(window);
                return;
            }
        };

        if let Err(err) = self.engine_state.bootstrap(resolution) {
            error!("UI bootstrap failed: {}", err);
        }

        self.window = Some(window.clone());
        self.session = Some(GraphicsSession {
            window,
            render_manager,
        });
        info!("Session started at {}x{}", resolution.x, resolution.y);

        self.draw_frame();
    }

    /// Drops every backend resource. The engine state survives.
    fn end_session(&mut self) {
        if self.session.take().is_some() {
            info!("Session ended");
        }
    }

    /// Runs one frame against the current session, if any.
    fn draw_frame(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };

        let input = self.input_manager.get_and_reset_frame_input();
        if let Err(err) = self.engine_state.frame(&input, &mut session.render_manager) {
            warn!("Frame skipped: {}", err);
        }
    }

    fn request_redraw(&self) {
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }
}

impl ApplicationHandler<GraphicsEvent> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                if let Some(session) = &mut self.session {
                    session.render_manager.resize_surface(size);
                    let (width, height) = session.render_manager.size();
                    self.engine_state.resize(width, height);
                }
                self.request_redraw();
            }
            WindowEvent::Focused(true) => {
                self.has_focus = true;
                self.request_redraw();
            }
            WindowEvent::Focused(false) => {
                self.has_focus = false;
                self.input_manager.reset_inputs();
                self.draw_frame();
            }
            WindowEvent::RedrawRequested => {
                self.draw_frame();
            }
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            _ => (),
        }
    }

    /// Builds a graphics session for the window.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        self.graphics_builder.build_and_send(
            event_loop,
            self.engine_state.config(),
            self.window.clone(),
        );
    }

    /// Receives the outcome of a graphics build.
    ///
    /// # Arguments
    /// * `_event_loop` - Reference to the active event loop
    /// * `graphics` - The built session, or why it could not be built
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: GraphicsEvent) {
        match graphics {
            Ok(graphics) => self.start_session(graphics),
            Err(err) => {
                error!("Graphics initialization failed: {}", err);
                self.end_session();
            }
        }
    }

    /// Releases the graphics session when the window goes away.
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.input_manager.reset_inputs();
        self.end_session();
    }

    /// Called before the event loop goes to sleep.
    ///
    /// Keeps frames coming while the window has focus.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.has_focus {
            self.request_redraw();
        }
    }
}
