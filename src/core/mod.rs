//! # Core Module
//!
//! Shared-ownership containers used to hand GPU handles and registries to the
//! renderers that need them. Everything in the sandbox runs on the event loop
//! thread, so both containers are single-threaded.
//!
//! ## Key Components
//! - `StSystem`: boxed system behind `Rc<RefCell<_>>`, used for the device, the
//!   queue and the buffer and bind group registries
//! - `StResource`: plain value behind `Rc<RwLock<_>>`, used for bookkeeping data
//!
//! ## Usage
//! ```rust
//! use touch_sandbox::core::{StResource, StSystem};
//!
//! let system = StSystem::new(Box::new(42u32));
//! let shared = system.clone();
//! **shared.get_mut() += 1;
//! assert_eq!(**system.get(), 43);
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod st_resource;
pub mod st_system;

pub use st_resource::StResource;
pub use st_system::StSystem;
