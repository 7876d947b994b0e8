//! Ground plane geometry and rendering.
//!
//! # Architecture
//! - `MeshPlane`: one-time N×N plane generation from a template quad
//! - `plane_transform`: per-frame model and projection of the plane
//! - `PlaneRenderer`: pipeline and draw of the plane, one draw per bucket

mod mesh_plane;
mod plane_transform;
mod renderer;

pub use mesh_plane::{MeshPlane, MAX_PLANE_BUFFER_BYTES, MAX_PLANE_QUADS_PER_SIDE, QUAD_TEMPLATE};
pub use plane_transform::{plane_angle, plane_transform, OPENGL_TO_WGPU_MATRIX};
pub use renderer::PlaneRenderer;

/// Name of the static plane vertex buffer
pub const PLANE_VERTEX_BUFFER: &str = "Plane Vertex Buffer";
/// Name of the per-instance buffer of the mesh bucket
pub const MESH_INSTANCE_BUFFER: &str = "Mesh Instance Buffer";
/// Name of the uniform buffer holding the mesh bucket transform
pub const TRANSFORM_UNIFORM_BUFFER: &str = "Transform Uniform Buffer";
