//! # Touch Sandbox Entry Point
//!
//! The native entry point. It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    touch_sandbox::run();
}
