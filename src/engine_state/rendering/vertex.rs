//! Vertex, instance and uniform layouts for the ground plane.
//!
//! This module defines the GPU-facing data of the 3D pass: the plane's vertex
//! format, the per-instance attributes of the mesh bucket and the uniform that
//! carries the bucket transform.

use cgmath::{Matrix4, SquareMatrix};

use super::draw_bucket::BucketTransform;

/// A vertex of the ground plane.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in model space
    pub position: [f32; 3],
    /// Texture coordinates, offset by the vertex's final XZ position
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Creates a vertex from its position and texture coordinates.
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: uv (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex3d>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance attributes of one mesh draw, the 3D form of a bucket instance.
///
/// Total size: 64 bytes (a column-major 4x4 matrix)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshInstance {
    /// Model matrix, column major
    pub transform: [[f32; 4]; 4],
}

impl MeshInstance {
    /// An instance drawn where the bucket transform puts it.
    pub fn identity() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    /// An instance placed by `matrix`.
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        Self {
            transform: matrix.into(),
        }
    }

    /// Instance buffer layout, one matrix column per attribute.
    ///
    /// # Shader Attributes
    /// - `location = 2..=5`: transform columns (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Uniform holding `projection * model` of the mesh bucket.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    /// Projection times model, column major
    pub view_proj: [[f32; 4]; 4],
}

impl TransformUniform {
    /// Identity view-projection.
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    /// Copies the view-projection of `transform`.
    pub fn update(&mut self, transform: &BucketTransform) {
        self.view_proj = transform.view_projection().into();
    }
}

impl Default for TransformUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform holding the surface size, used to map UI pixels to clip space.
///
/// Padded to 16 bytes for uniform buffer alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniform {
    /// Surface width and height in pixels
    pub resolution: [f32; 2],
    _padding: [f32; 2],
}

impl ScreenUniform {
    /// Uniform for a surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<Vertex3d>(), 20);
        assert_eq!(std::mem::size_of::<MeshInstance>(), 64);
        assert_eq!(std::mem::size_of::<ScreenUniform>(), 16);
    }

    #[test]
    fn test_uniform_takes_projection_times_model() {
        let transform = BucketTransform {
            model: Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)),
            projection: Matrix4::from_scale(2.0),
        };
        let mut uniform = TransformUniform::new();
        uniform.update(&transform);

        // Column-major: the translation lives in the last column.
        assert_eq!(uniform.view_proj[3], [2.0, 4.0, 6.0, 1.0]);
    }
}
