//! # Buffer State Module
//!
//! Central registry for the GPU buffers of the sandbox: the plane's vertex,
//! instance and uniform buffers and the UI's quad, instance and uniform
//! buffers.
//!
//! ## Architecture
//!
//! Buffers are referenced by static name and created once when the graphics
//! session starts. Every write is bounds-checked against the allocation and
//! recorded in per-buffer analytics, which are logged when the session ends.

use std::collections::HashMap;

use log::debug;
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::{StResource, StSystem};

/// Analytics data for a GPU buffer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Highest byte written so far
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

impl BufferAnalytics {
    fn record_write(&mut self, offset: u64, size: u64) {
        self.used_memory = self.used_memory.max(offset + size);
        self.times_written += 1;
    }
}

/// Registry of named GPU buffers.
///
/// # Examples
///
/// ```ignore
/// let mut buffer_state = BufferState::new(device, queue);
/// buffer_state.create_buffer_init(
///     "vertex_buffer",
///     wgpu::util::BufferInitDescriptor {
///         label: Some("Vertex Buffer"),
///         contents: bytemuck::cast_slice(&vertices),
///         usage: wgpu::BufferUsages::VERTEX,
///     },
/// );
/// let vertex_buffer = buffer_state.get_buffer("vertex_buffer");
/// ```
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    /// Map of buffer names to buffer objects
    pub buffers: HashMap<&'static str, Buffer>,
    /// Analytics data for each buffer
    buffer_analytics: StResource<HashMap<&'static str, BufferAnalytics>>,
}

impl BufferState {
    /// Creates an empty registry.
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: StResource::new(HashMap::new()),
        }
    }

    /// Creates an empty buffer with the specified descriptor
    ///
    /// # Arguments
    ///
    /// * `buffer_name` - Unique name for the buffer
    /// * `buffer_descriptor` - Buffer configuration descriptor
    pub fn create_buffer(
        &mut self,
        buffer_name: &'static str,
        buffer_descriptor: wgpu::BufferDescriptor,
    ) {
        let analytics = BufferAnalytics {
            allocated_memory: buffer_descriptor.size,
            ..Default::default()
        };
        let buffer = self.device.get().create_buffer(&buffer_descriptor);
        self.register(buffer_name, buffer, analytics);
    }

    /// Creates a buffer and initializes it with data
    ///
    /// # Arguments
    ///
    /// * `buffer_name` - Unique name for the buffer
    /// * `init_descriptor` - Buffer initialization descriptor with data
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let size = init_descriptor.contents.len() as u64;
        let analytics = BufferAnalytics {
            allocated_memory: size,
            used_memory: size,
            times_written: 1,
        };
        let buffer = self.device.get().create_buffer_init(&init_descriptor);
        self.register(buffer_name, buffer, analytics);
    }

    fn register(&mut self, buffer_name: &'static str, buffer: Buffer, analytics: BufferAnalytics) {
        debug!(
            "Created buffer '{}' ({} bytes)",
            buffer_name, analytics.allocated_memory
        );
        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics.get_mut().insert(buffer_name, analytics);
    }

    /// Writes raw byte data to a buffer
    ///
    /// # Arguments
    ///
    /// * `buffer_name` - Name of the buffer to write to
    /// * `offset` - Byte offset in the buffer to start writing
    /// * `data` - Raw byte data to write
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not exist or if the write would exceed buffer bounds
    pub fn write_buffer(&self, buffer_name: &'static str, offset: wgpu::BufferAddress, data: &[u8]) {
        let buffer = self.get_buffer(buffer_name);
        let mut analytics_map = self.buffer_analytics.get_mut();
        let analytics = analytics_map
            .get_mut(buffer_name)
            .unwrap_or_else(|| panic!("no analytics for buffer '{buffer_name}'"));

        let data_size = data.len() as u64;
        if offset + data_size > analytics.allocated_memory {
            panic!(
                "Buffer write out of bounds for buffer name '{}'",
                buffer_name
            );
        }

        self.queue.get().write_buffer(buffer, offset, data);
        analytics.record_write(offset, data_size);
    }

    /// Gets a reference to a buffer by name
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not exist
    pub fn get_buffer(&self, buffer_name: &'static str) -> &Buffer {
        self.buffers
            .get(buffer_name)
            .unwrap_or_else(|| panic!("buffer '{buffer_name}' was never created"))
    }

    /// Gets a binding resource for the entire buffer
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not exist
    pub fn get_entire_binding(&self, buffer_name: &'static str) -> wgpu::BindingResource<'_> {
        self.get_buffer(buffer_name).as_entire_binding()
    }

    /// Analytics of one buffer, if it exists.
    pub fn analytics(&self, buffer_name: &'static str) -> Option<BufferAnalytics> {
        self.buffer_analytics.get().get(buffer_name).copied()
    }

    /// Gets the total allocated memory across all buffers
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .values()
            .map(|analytics| analytics.allocated_memory)
            .sum()
    }

    /// Gets the total used memory across all buffers
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .values()
            .map(|analytics| analytics.used_memory)
            .sum()
    }

    /// Logs allocation and write counts of every buffer at debug level.
    pub fn log_analytics(&self) {
        let analytics_map = self.buffer_analytics.get();
        let mut names: Vec<_> = analytics_map.keys().copied().collect();
        names.sort_unstable();
        for name in names {
            let analytics = analytics_map[name];
            debug!(
                "Buffer '{}': {} / {} bytes used, {} writes",
                name, analytics.used_memory, analytics.allocated_memory, analytics.times_written
            );
        }
        debug!(
            "Buffers total: {} / {} bytes used",
            self.get_total_used_memory(),
            self.get_total_allocated_memory()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_write_tracks_high_water_mark() {
        let mut analytics = BufferAnalytics {
            allocated_memory: 128,
            ..Default::default()
        };
        analytics.record_write(0, 64);
        analytics.record_write(0, 32);
        assert_eq!(analytics.used_memory, 64);
        assert_eq!(analytics.times_written, 2);

        analytics.record_write(96, 32);
        assert_eq!(analytics.used_memory, 128);
    }
}
