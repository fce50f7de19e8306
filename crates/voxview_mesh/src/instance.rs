//! Instance data structures for GPU upload.
//!
//! A built mesh becomes one flat buffer of [`CubeInstance`] records ordered
//! by color group, plus one [`DrawBatch`] per group. The host draws each
//! batch with a unit cube and the batch's material.

use bytemuck::{Pod, Zeroable};

use crate::color::Color;

/// Per-instance data for one cube.
///
/// Layout is two vec4s, 16-byte friendly for vertex-rate instance buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CubeInstance {
    /// Cube center (x, y, z) + edge length in w.
    pub position_scale: [f32; 4],
    /// Normalized RGBA.
    pub color: [f32; 4],
}

impl CubeInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates an instance at a position.
    #[inline]
    #[must_use]
    pub fn new(position: [f32; 3], size: f32, color: Color) -> Self {
        Self {
            position_scale: [position[0], position[1], position[2], size],
            color: color.as_float(),
        }
    }

    /// Cube center.
    #[inline]
    #[must_use]
    pub fn position(&self) -> [f32; 3] {
        [self.position_scale[0], self.position_scale[1], self.position_scale[2]]
    }
}

/// A contiguous instance range drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    /// Material color for the whole range.
    pub color: Color,
    /// First instance in the buffer.
    pub first_instance: u32,
    /// Number of instances.
    pub instance_count: u32,
}

impl DrawBatch {
    /// Instance range as buffer indices.
    #[inline]
    #[must_use]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.first_instance as usize;
        start..start + self.instance_count as usize
    }
}

/// Flat instance buffer plus its per-color draw batches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuffer {
    /// All instances, grouped by batch.
    pub instances: Vec<CubeInstance>,
    /// One batch per color group, in group order.
    pub batches: Vec<DrawBatch>,
}

impl InstanceBuffer {
    /// Raw bytes for upload.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Instances of one batch.
    #[must_use]
    pub fn batch_instances(&self, batch: &DrawBatch) -> &[CubeInstance] {
        &self.instances[batch.range()]
    }

    /// Number of draw calls needed.
    #[inline]
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.batches.len()
    }
}
