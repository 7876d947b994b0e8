//! Manages WebGPU bind groups and their layouts.
//!
//! Bind groups are registered under static names so that renderers can look
//! them up without owning them. The sandbox has two, both single uniform
//! buffers: the mesh bucket transform and the screen size for the UI.

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Device, ShaderStages};

use crate::{
    core::StSystem,
    engine_state::buffer_state::BufferState,
};

use super::{meshing::TRANSFORM_UNIFORM_BUFFER, ui::buffer_names::SCREEN_UNIFORM_BUFFER};

/// Name of the bind group holding the plane transform
pub const TRANSFORM_BIND_GROUP: &str = "transform_bind_group";
/// Name of the layout of [`TRANSFORM_BIND_GROUP`]
pub const TRANSFORM_BIND_GROUP_LAYOUT: &str = "transform_bind_group_layout";
/// Name of the bind group holding the screen size
pub const SCREEN_BIND_GROUP: &str = "screen_bind_group";
/// Name of the layout of [`SCREEN_BIND_GROUP`]
pub const SCREEN_BIND_GROUP_LAYOUT: &str = "screen_bind_group_layout";

/// Registry of named bind groups and bind group layouts.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, BindGroupLayout>,
}

impl BindGroupState {
    /// Creates the transform and screen bind groups.
    ///
    /// The uniform buffers they point at must already exist in `buffer_state`.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Shared state for buffer management
    pub fn new(device: StSystem<Device>, buffer_state: StSystem<BufferState>) -> Self {
        let mut state = Self {
            bind_groups: HashMap::new(),
            bind_group_layouts: HashMap::new(),
        };

        let device = device.get();
        let buffer_state = buffer_state.get();

        state.insert_uniform_bind_group(
            &device,
            &buffer_state,
            TRANSFORM_UNIFORM_BUFFER,
            ShaderStages::VERTEX,
            (TRANSFORM_BIND_GROUP, TRANSFORM_BIND_GROUP_LAYOUT),
        );
        state.insert_uniform_bind_group(
            &device,
            &buffer_state,
            SCREEN_UNIFORM_BUFFER,
            ShaderStages::VERTEX,
            (SCREEN_BIND_GROUP, SCREEN_BIND_GROUP_LAYOUT),
        );

        state
    }

    /// Retrieves a bind group by name.
    ///
    /// # Panics
    /// Panics if no bind group with the given name exists
    pub fn get_bind_group(&self, name: &'static str) -> &BindGroup {
        self.bind_groups
            .get(name)
            .unwrap_or_else(|| panic!("bind group '{name}' was never created"))
    }

    /// Retrieves a bind group layout by name.
    ///
    /// # Panics
    /// Panics if no bind group layout with the given name exists
    pub fn get_bind_group_layout(&self, name: &'static str) -> &BindGroupLayout {
        self.bind_group_layouts
            .get(name)
            .unwrap_or_else(|| panic!("bind group layout '{name}' was never created"))
    }

    /// Creates a layout and a bind group exposing one uniform buffer at binding 0.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Registry holding the uniform buffer
    /// * `buffer_name` - Name of the uniform buffer
    /// * `visibility` - Shader stages that read the uniform
    /// * `names` - Names to register the bind group and its layout under
    fn insert_uniform_bind_group(
        &mut self,
        device: &Device,
        buffer_state: &BufferState,
        buffer_name: &'static str,
        visibility: ShaderStages,
        (bind_group_name, layout_name): (&'static str, &'static str),
    ) {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(layout_name),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer_state.get_entire_binding(buffer_name),
            }],
            label: Some(bind_group_name),
        });

        self.bind_groups.insert(bind_group_name, bind_group);
        self.bind_group_layouts.insert(layout_name, layout);
    }
}
