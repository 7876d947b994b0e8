#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Touch Sandbox
//!
//! A small touch-driven sandbox rendered with WGPU: an immediate-mode UI of
//! stacked rectangles drawn over a spinning ground plane.
//!
//! ## Key Modules
//!
//! * `application_state` - Manages the application lifecycle, the window and input
//! * `core` - Shared-ownership containers used throughout the engine
//! * `engine_state` - The element store, draw buckets, ground plane and wgpu backend
//! * `config` - Settings loaded from `assets/config.json`
//! * `error` - The engine's error type
//!
//! ## Architecture
//!
//! Each frame the platform layer snapshots the input, the UI state machine
//! updates the element store, and the frame driver fills two draw buckets and
//! submits them to a `DrawBackend`: first the ground plane, then the UI on top.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     touch_sandbox::run();
//! }
//! ```

use application_state::ApplicationState;
use config::EngineConfig;
use log::{error, info};
use winit::event_loop::EventLoop;

pub mod application_state;
pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

/// Initializes logging, loads the configuration and runs the event loop until
/// the window is closed.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = EngineConfig::load();

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Failed to create the event loop: {}", err);
            return;
        }
    };

    let mut state = match ApplicationState::new(config, event_loop.create_proxy()) {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to create the engine state: {}", err);
            return;
        }
    };

    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop stopped: {}", err);
    }
}
