//! UI primitive elements for the sandbox.
//!
//! This module defines the UI element itself, its flags and reserved ids, and
//! the two GPU-facing types used to draw elements: the unit quad template
//! vertex and the per-instance quad attributes.

mod rectangle;

use bitflags::bitflags;

pub use rectangle::{point_in_rect, Rect};

/// Id of the built-in button that spawns a new element.
pub const PUSH_BUTTON_ID: u32 = 0;
/// Id of the built-in button that removes the last spawned element.
pub const POP_BUTTON_ID: u32 = 1;
/// Id of the built-in, non-selectable background panel.
pub const BACKGROUND_PANEL_ID: u32 = 2;
/// Number of built-in elements that can never be popped.
pub const RESERVED_ELEMENT_COUNT: usize = 3;

bitflags! {
    /// Behavior flags of a UI element. The empty set is a purely decorative element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UiFlags: u32 {
        /// The element can hold the selection and receive presses
        const SELECTABLE = 1 << 0;
    }
}

/// A rectangular, colored, optionally selectable UI unit.
///
/// Identity is the `id`. Elements are owned by the
/// [`ElementStore`](super::ElementStore) and only ever leave it through a pop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiElement {
    /// Stable identity of the element
    pub id: u32,
    /// Screen-space bounds in pixels
    pub rect: Rect,
    /// Fill color (RGBA, 0.0 - 1.0)
    pub color: [f32; 4],
    /// Behavior flags
    pub flags: UiFlags,
}

impl UiElement {
    /// Creates a new element.
    pub fn new(id: u32, rect: Rect, color: [f32; 4], flags: UiFlags) -> Self {
        Self {
            id,
            rect,
            color,
            flags,
        }
    }

    /// Whether the element may hold the selection.
    pub fn is_selectable(&self) -> bool {
        self.flags.contains(UiFlags::SELECTABLE)
    }

    /// Per-instance draw attributes for this element.
    pub fn to_instance(&self) -> QuadInstance {
        QuadInstance {
            min: [self.rect.min.x, self.rect.min.y],
            max: [self.rect.max.x, self.rect.max.y],
            color: self.color,
        }
    }
}

/// One corner of the unit quad shared by every UI instance.
///
/// The vertex shader places the corner between the instance's `min` and `max`
/// with `mix(min, max, corner)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Corner in unit space, each component 0.0 or 1.0
    pub corner: [f32; 2],
}

/// Two triangles covering the unit square.
pub const UNIT_QUAD: [QuadVertex; 6] = [
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 0.0] },
    QuadVertex { corner: [1.0, 1.0] },
    QuadVertex { corner: [0.0, 1.0] },
];

impl QuadVertex {
    /// Vertex buffer layout of the unit quad (slot 0, per vertex).
    ///
    /// # Shader Attributes
    /// - `location = 0`: corner (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Per-instance attributes of one UI quad, the 2D form of a bucket instance.
///
/// # Memory Layout
/// - `min`: 8 bytes (2 × f32)
/// - `max`: 8 bytes (2 × f32)
/// - `color`: 16 bytes (4 × f32)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadInstance {
    /// Top-left corner in pixels
    pub min: [f32; 2],
    /// Bottom-right corner in pixels
    pub max: [f32; 2],
    /// Fill color (RGBA)
    pub color: [f32; 4],
}

impl QuadInstance {
    /// Instance buffer layout (slot 1, per instance).
    ///
    /// # Shader Attributes
    /// - `location = 1`: min (vec2<f32>)
    /// - `location = 2`: max (vec2<f32>)
    /// - `location = 3`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_matches_element() {
        let element = UiElement::new(
            7,
            Rect::from_coords(10.0, 20.0, 30.0, 40.0),
            [0.0, 1.0, 1.0, 1.0],
            UiFlags::SELECTABLE,
        );
        let instance = element.to_instance();
        assert_eq!(instance.min, [10.0, 20.0]);
        assert_eq!(instance.max, [30.0, 40.0]);
        assert_eq!(instance.color, [0.0, 1.0, 1.0, 1.0]);
        assert!(element.is_selectable());
    }

    #[test]
    fn test_empty_flags_are_not_selectable() {
        let element = UiElement::new(2, Rect::from_coords(0.0, 0.0, 1.0, 1.0), [1.0; 4], UiFlags::empty());
        assert!(!element.is_selectable());
    }

    #[test]
    fn test_instance_size_matches_layout() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 32);
        assert_eq!(std::mem::size_of::<QuadVertex>(), 8);
    }
}
