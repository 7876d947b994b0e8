//! Ground plane geometry.
//!
//! The plane is an N×N grid of copies of one template quad. Every copy is
//! shrunk by `s = 1 / N²` and shifted to its cell, with cells `2s` apart and
//! the grid starting at `-N·s` on both axes. The resulting plane is `2/N` wide
//! and relies on the model transform for its final size.

use crate::{
    engine_state::rendering::vertex::Vertex3d,
    error::{EngineError, EngineResult},
};

/// A unit quad in the XZ plane, two triangles spanning `-1..1` on both axes.
pub const QUAD_TEMPLATE: [Vertex3d; 6] = [
    Vertex3d::new([-1.0, 0.0, -1.0], [0.0, 0.0]),
    Vertex3d::new([-1.0, 0.0, 1.0], [0.0, 1.0]),
    Vertex3d::new([1.0, 0.0, 1.0], [1.0, 1.0]),
    Vertex3d::new([-1.0, 0.0, -1.0], [0.0, 0.0]),
    Vertex3d::new([1.0, 0.0, 1.0], [1.0, 1.0]),
    Vertex3d::new([1.0, 0.0, -1.0], [1.0, 0.0]),
];

/// Largest vertex buffer the plane may occupy, wgpu's default `max_buffer_size`.
pub const MAX_PLANE_BUFFER_BYTES: u64 = 256 << 20;

/// Largest side count whose [`QUAD_TEMPLATE`] plane fits in
/// [`MAX_PLANE_BUFFER_BYTES`].
pub const MAX_PLANE_QUADS_PER_SIDE: u32 = max_side_count(
    std::mem::size_of::<Vertex3d>() as u64 * QUAD_TEMPLATE.len() as u64,
    MAX_PLANE_BUFFER_BYTES,
);

const fn max_side_count(quad_bytes: u64, limit: u64) -> u32 {
    let mut n: u64 = 0;
    while (n + 1) * (n + 1) * quad_bytes <= limit {
        n += 1;
    }
    n as u32
}

/// Immutable ground plane vertices.
#[derive(Debug, Clone)]
pub struct MeshPlane {
    vertices: Vec<Vertex3d>,
    side_count: u32,
    template_len: usize,
}

impl MeshPlane {
    /// Builds the plane from `side_count²` copies of `template`.
    ///
    /// # Arguments
    /// * `side_count` - Number of quads along one side (N)
    /// * `template` - Vertices of one quad
    ///
    /// # Returns
    /// A plane with `side_count² × template.len()` vertices, quad by quad in
    /// row-major cell order, or `CapacityExceeded` when the vertices would not
    /// fit in [`MAX_PLANE_BUFFER_BYTES`]
    pub fn generate(side_count: u32, template: &[Vertex3d]) -> EngineResult<Self> {
        let too_large = EngineError::CapacityExceeded {
            container: "ground plane vertex buffer",
            capacity: MAX_PLANE_BUFFER_BYTES as usize,
        };
        let quad_count = side_count
            .checked_mul(side_count)
            .ok_or_else(|| too_large.clone())?;
        let vertex_count = (quad_count as usize)
            .checked_mul(template.len())
            .ok_or_else(|| too_large.clone())?;
        let buffer_bytes = (vertex_count as u64)
            .checked_mul(std::mem::size_of::<Vertex3d>() as u64)
            .ok_or_else(|| too_large.clone())?;
        if buffer_bytes > MAX_PLANE_BUFFER_BYTES {
            return Err(too_large);
        }

        let n = side_count as f32;
        let scale = Self::scale_for(side_count);

        let mut vertices = Vec::with_capacity(vertex_count);
        for id in 0..quad_count {
            let column = (id % side_count) as f32;
            let row = (id / side_count) as f32;
            let offset_x = column * scale * 2.0;
            let offset_z = row * scale * 2.0;

            for vertex in template {
                let [x, y, z] = vertex.position;
                let x = x * scale + offset_x - n * scale;
                let z = z * scale + offset_z - n * scale;
                vertices.push(Vertex3d::new(
                    [x, y, z],
                    [vertex.uv[0] + x, vertex.uv[1] + z],
                ));
            }
        }

        Ok(Self {
            vertices,
            side_count,
            template_len: template.len(),
        })
    }

    /// Per-quad scale factor for a plane of the given side count.
    pub fn scale_for(side_count: u32) -> f32 {
        let n = side_count.max(1) as f32;
        1.0 / (n * n)
    }

    /// All vertices, quad by quad.
    pub fn vertices(&self) -> &[Vertex3d] {
        &self.vertices
    }

    /// Number of vertices, the draw's vertex count.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Quads along one side.
    pub fn side_count(&self) -> u32 {
        self.side_count
    }

    /// Vertices of the quad with the given id.
    pub fn quad(&self, id: u32) -> &[Vertex3d] {
        let start = id as usize * self.template_len;
        &self.vertices[start..start + self.template_len]
    }

    /// `(column, row)` of every quad, in generation order.
    pub fn quad_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.side_count;
        (0..n * n).map(move |id| (id % n, id / n))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_count() {
        let plane = MeshPlane::generate(64, &QUAD_TEMPLATE).expect("plane");
        assert_eq!(plane.vertex_count(), 64 * 64 * 6);
        assert_eq!(plane.side_count(), 64);
    }

    #[test]
    fn test_cells_cover_the_grid_once() {
        let n = 8;
        let plane = MeshPlane::generate(n, &QUAD_TEMPLATE).expect("plane");

        let cells: HashSet<(u32, u32)> = plane.quad_cells().collect();
        assert_eq!(cells.len(), (n * n) as usize);
        for column in 0..n {
            for row in 0..n {
                assert!(cells.contains(&(column, row)));
            }
        }
    }

    #[test]
    fn test_quads_sit_on_distinct_cells() {
        let n = 4;
        let plane = MeshPlane::generate(n, &QUAD_TEMPLATE).expect("plane");
        let s = MeshPlane::scale_for(n);

        for (id, (column, row)) in plane.quad_cells().enumerate() {
            let quad = plane.quad(id as u32);
            let min_x = quad.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
            let min_z = quad.iter().map(|v| v.position[2]).fold(f32::MAX, f32::min);
            assert_relative_eq!(min_x, -s + column as f32 * 2.0 * s - n as f32 * s);
            assert_relative_eq!(min_z, -s + row as f32 * 2.0 * s - n as f32 * s);
        }
    }

    #[test]
    fn test_scale_regression_for_64() {
        let plane = MeshPlane::generate(64, &QUAD_TEMPLATE).expect("plane");
        let s = 1.0 / 4096.0;
        assert_relative_eq!(MeshPlane::scale_for(64), s);

        // First template vertex of quad 0 sits at (-1, -1).
        let first = plane.quad(0)[0];
        assert_relative_eq!(first.position[0], -0.015869140625);
        assert_relative_eq!(first.position[2], -0.015869140625);

        // Vertex (1, 1) of the last quad.
        let last = plane.quad(64 * 64 - 1)[2];
        assert_relative_eq!(last.position[0], 0.015380859375);
        assert_relative_eq!(last.position[2], 0.015380859375);
    }

    #[test]
    fn test_uv_offset_by_position() {
        let plane = MeshPlane::generate(2, &QUAD_TEMPLATE).expect("plane");
        let first = plane.quad(0)[0];

        assert_relative_eq!(first.position[0], -0.75);
        assert_relative_eq!(first.position[2], -0.75);
        assert_relative_eq!(first.uv[0], -0.75);
        assert_relative_eq!(first.uv[1], -0.75);
        assert_relative_eq!(first.position[1], 0.0);
    }

    #[test]
    fn test_max_side_count_fits_the_buffer_limit() {
        let quad_bytes = (std::mem::size_of::<Vertex3d>() * QUAD_TEMPLATE.len()) as u64;
        let max = MAX_PLANE_QUADS_PER_SIDE as u64;
        assert_eq!(MAX_PLANE_QUADS_PER_SIDE, 1495);
        assert!(max * max * quad_bytes <= MAX_PLANE_BUFFER_BYTES);
        assert!((max + 1) * (max + 1) * quad_bytes > MAX_PLANE_BUFFER_BYTES);
    }

    #[test]
    fn test_oversized_plane_is_rejected() {
        for side_count in [MAX_PLANE_QUADS_PER_SIDE + 1, 2000, 70000, u32::MAX] {
            let result = MeshPlane::generate(side_count, &QUAD_TEMPLATE);
            assert!(
                matches!(result, Err(EngineError::CapacityExceeded { .. })),
                "side count {} was accepted",
                side_count
            );
        }
    }
}
