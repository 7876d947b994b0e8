//! Per-frame instance accumulation for batched draws.
//!
//! A [`DrawBucket`] collects the per-instance attributes of one draw call. Each
//! frame it goes through `begin`, any number of `push_instance` calls and
//! `end`, after which its contents are frozen and handed to the backend as a
//! [`FrozenBucket`] borrow.
//!
//! # Lifecycle
//! ```text
//! Empty ──begin──▶ Accumulating ──end──▶ Frozen
//!                   ▲                      │
//!                   └────────begin─────────┘
//! ```
//! Storage is allocated once with the bucket's capacity and never grows.
//! Instances pushed past capacity are dropped and counted.

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::error::{EngineError, EngineResult};

/// Capacity of the bucket holding UI quads
pub const UI_BUCKET_CAPACITY: usize = 256;
/// Capacity of the bucket holding mesh instances
pub const MESH_BUCKET_CAPACITY: usize = 16;

/// Lifecycle state of a [`DrawBucket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketState {
    /// Never begun
    Empty,
    /// Between `begin` and `end`; accepts instances
    Accumulating,
    /// After `end`; read-only until the next `begin`
    Frozen,
}

/// Transform shared by every instance of a bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketTransform {
    /// Model matrix of the bucket's geometry
    pub model: Matrix4<f32>,
    /// Projection applied after the model matrix
    pub projection: Matrix4<f32>,
}

impl BucketTransform {
    /// `projection * model`, the matrix uploaded to the shader.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.model
    }
}

impl Default for BucketTransform {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            projection: Matrix4::identity(),
        }
    }
}

/// Bounded accumulator of per-instance attributes.
pub struct DrawBucket<T> {
    label: &'static str,
    instances: Vec<T>,
    capacity: usize,
    transform: Option<BucketTransform>,
    state: BucketState,
    dropped: u32,
}

impl<T> DrawBucket<T> {
    /// Creates an empty bucket.
    ///
    /// # Arguments
    /// * `label` - Name used in errors and log lines
    /// * `capacity` - Maximum number of instances per frame
    pub fn new(label: &'static str, capacity: usize) -> Self {
        Self {
            label,
            instances: Vec::with_capacity(capacity),
            capacity,
            transform: None,
            state: BucketState::Empty,
            dropped: 0,
        }
    }

    /// Starts a new accumulation, discarding whatever the bucket held.
    ///
    /// Valid from every state.
    pub fn begin(&mut self, transform: Option<BucketTransform>) {
        self.instances.clear();
        self.transform = transform;
        self.dropped = 0;
        self.state = BucketState::Accumulating;
    }

    /// Appends one instance.
    ///
    /// # Returns
    /// `Err(BucketNotAccumulating)` outside of `begin`/`end`, and
    /// `Err(CapacityExceeded)` when the bucket is full. In the latter case the
    /// instance is dropped and counted.
    pub fn push_instance(&mut self, instance: T) -> EngineResult<()> {
        if self.state != BucketState::Accumulating {
            return Err(EngineError::BucketNotAccumulating {
                bucket: self.label,
                state: self.state,
            });
        }
        if self.instances.len() >= self.capacity {
            self.dropped += 1;
            return Err(EngineError::CapacityExceeded {
                container: self.label,
                capacity: self.capacity,
            });
        }

        self.instances.push(instance);
        Ok(())
    }

    /// Freezes the accumulated instances.
    pub fn end(&mut self) -> EngineResult<()> {
        if self.state != BucketState::Accumulating {
            return Err(EngineError::BucketNotAccumulating {
                bucket: self.label,
                state: self.state,
            });
        }

        if self.dropped > 0 {
            warn!(
                "Bucket '{}' dropped {} instance(s) over capacity {}",
                self.label, self.dropped, self.capacity
            );
        }
        self.state = BucketState::Frozen;
        Ok(())
    }

    /// Read access to the frozen contents.
    pub fn frozen(&self) -> EngineResult<FrozenBucket<'_, T>> {
        if self.state != BucketState::Frozen {
            return Err(EngineError::BucketNotFrozen {
                bucket: self.label,
                state: self.state,
            });
        }

        Ok(FrozenBucket {
            label: self.label,
            instances: &self.instances,
            transform: self.transform,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BucketState {
        self.state
    }

    /// Number of instances accepted since the last `begin`.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance was accepted since the last `begin`.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Maximum number of instances per frame.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances dropped since the last `begin`.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Name used in logs and errors.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Read-only view of a frozen bucket, consumed by the draw backend.
#[derive(Debug, Clone, Copy)]
pub struct FrozenBucket<'a, T> {
    /// Label of the bucket it was frozen from
    pub label: &'static str,
    /// Instances in insertion order
    pub instances: &'a [T],
    /// Transform shared by every instance, if the bucket has one
    pub transform: Option<BucketTransform>,
}

impl<T> FrozenBucket<'_, T> {
    /// Number of instances to draw.
    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_before_begin_is_rejected() {
        let mut bucket: DrawBucket<u32> = DrawBucket::new("test", 4);
        assert_eq!(
            bucket.push_instance(1),
            Err(EngineError::BucketNotAccumulating {
                bucket: "test",
                state: BucketState::Empty
            })
        );
        assert_eq!(bucket.len(), 0);
    }

    #[test]
    fn test_end_before_begin_is_rejected() {
        let mut bucket: DrawBucket<u32> = DrawBucket::new("test", 4);
        assert!(matches!(
            bucket.end(),
            Err(EngineError::BucketNotAccumulating { .. })
        ));
    }

    #[test]
    fn test_frozen_contents_keep_insertion_order() {
        let mut bucket = DrawBucket::new("test", 4);
        bucket.begin(None);
        for value in [3, 1, 2] {
            bucket.push_instance(value).unwrap();
        }
        bucket.end().unwrap();

        let frozen = bucket.frozen().unwrap();
        assert_eq!(frozen.instances, &[3, 1, 2]);
        assert_eq!(frozen.instance_count(), 3);
        assert!(frozen.transform.is_none());
    }

    #[test]
    fn test_read_while_accumulating_is_rejected() {
        let mut bucket = DrawBucket::new("test", 4);
        bucket.begin(None);
        bucket.push_instance(1).unwrap();
        assert!(matches!(
            bucket.frozen(),
            Err(EngineError::BucketNotFrozen {
                state: BucketState::Accumulating,
                ..
            })
        ));
    }

    #[test]
    fn test_push_after_end_is_rejected() {
        let mut bucket = DrawBucket::new("test", 4);
        bucket.begin(None);
        bucket.end().unwrap();
        assert!(matches!(
            bucket.push_instance(7),
            Err(EngineError::BucketNotAccumulating {
                state: BucketState::Frozen,
                ..
            })
        ));
        assert!(bucket.frozen().unwrap().is_empty());
    }

    #[test]
    fn test_overflow_drops_and_counts() {
        let mut bucket = DrawBucket::new("test", 2);
        bucket.begin(None);
        bucket.push_instance(1).unwrap();
        bucket.push_instance(2).unwrap();
        assert_eq!(
            bucket.push_instance(3),
            Err(EngineError::CapacityExceeded {
                container: "test",
                capacity: 2
            })
        );
        assert_eq!(bucket.dropped(), 1);
        bucket.end().unwrap();
        assert_eq!(bucket.frozen().unwrap().instances, &[1, 2]);
    }

    #[test]
    fn test_begin_resets_from_frozen() {
        let mut bucket = DrawBucket::new("test", 2);
        bucket.begin(None);
        bucket.push_instance(1).unwrap();
        bucket.push_instance(2).unwrap();
        let _ = bucket.push_instance(3);
        bucket.end().unwrap();

        let transform = BucketTransform::default();
        bucket.begin(Some(transform));
        assert_eq!(bucket.state(), BucketState::Accumulating);
        assert_eq!(bucket.len(), 0);
        assert_eq!(bucket.dropped(), 0);
        bucket.end().unwrap();
        assert_eq!(bucket.frozen().unwrap().transform, Some(transform));
    }
}
