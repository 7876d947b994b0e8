//! The contract between the frame driver and a graphics backend.

use crate::error::EngineResult;

use super::{draw_bucket::FrozenBucket, ui::QuadInstance, vertex::MeshInstance};

/// Consumer of the frozen draw buckets of a frame.
///
/// Calls arrive in frame order: one `clear_screen`, the draws in the order they
/// should appear on screen, then `swap_buffers`. Draws consume the bucket's
/// instances in insertion order.
pub trait DrawBackend {
    /// Sets the color the frame is cleared to.
    fn clear_screen(&mut self, color: [f32; 4]);

    /// Draws the static plane mesh once per instance of `bucket`.
    fn draw_mesh(
        &mut self,
        bucket: FrozenBucket<'_, MeshInstance>,
        vertex_count: u32,
    ) -> EngineResult<()>;

    /// Draws one UI quad per instance of `bucket`.
    fn draw_instanced(&mut self, bucket: FrozenBucket<'_, QuadInstance>) -> EngineResult<()>;

    /// Presents the frame.
    fn swap_buffers(&mut self) -> EngineResult<()>;
}
