//! Palette-index lookups.
//!
//! Asset loaders hand out palette indices as a dense `[x][y][z]` volume that
//! covers the model's whole box, even though only occupied cells matter.
//! Lookups outside the volume return `None` instead of indexing out of bounds.

use std::collections::HashMap;

use crate::error::{MeshError, MeshResult};
use crate::grid::VoxelIndex;

/// Maps grid cells to palette indices.
pub trait PaletteIndexVolume {
    /// Palette index stored for a cell, or `None` if the volume has no entry.
    fn palette_index(&self, index: VoxelIndex) -> Option<i32>;
}

impl PaletteIndexVolume for HashMap<VoxelIndex, i32> {
    fn palette_index(&self, index: VoxelIndex) -> Option<i32> {
        self.get(&index).copied()
    }
}

/// Dense palette-index volume stored flat in `[x][y][z]` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseIndexVolume {
    dims: [u32; 3],
    /// `z` varies fastest.
    data: Vec<i32>,
}

impl DenseIndexVolume {
    /// Wraps a flat buffer of `dims[0] * dims[1] * dims[2]` entries.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidVolume`] if the buffer length does not
    /// match the dimensions.
    pub fn new(dims: [u32; 3], data: Vec<i32>) -> MeshResult<Self> {
        let expected = Self::volume_len(dims)?;
        if data.len() != expected {
            return Err(MeshError::InvalidVolume(format!(
                "dims {dims:?} need {expected} entries, got {}",
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Creates a volume with every entry set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidVolume`] if the entry count overflows.
    pub fn filled(dims: [u32; 3], value: i32) -> MeshResult<Self> {
        let len = Self::volume_len(dims)?;
        Ok(Self { dims, data: vec![value; len] })
    }

    /// Builds from nested `[x][y][z]` arrays, the layout asset loaders expose.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidVolume`] if the arrays are ragged.
    pub fn from_nested(nested: &[Vec<Vec<i32>>]) -> MeshResult<Self> {
        let size_x = nested.len();
        let size_y = nested.first().map_or(0, Vec::len);
        let size_z = nested
            .first()
            .and_then(|plane| plane.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(size_x * size_y * size_z);
        for (x, plane) in nested.iter().enumerate() {
            if plane.len() != size_y {
                return Err(MeshError::InvalidVolume(format!(
                    "plane x={x} has {} rows, expected {size_y}",
                    plane.len()
                )));
            }
            for (y, row) in plane.iter().enumerate() {
                if row.len() != size_z {
                    return Err(MeshError::InvalidVolume(format!(
                        "row x={x} y={y} has {} entries, expected {size_z}",
                        row.len()
                    )));
                }
                data.extend_from_slice(row);
            }
        }

        let dims = [
            Self::dim_u32(size_x)?,
            Self::dim_u32(size_y)?,
            Self::dim_u32(size_z)?,
        ];
        Ok(Self { dims, data })
    }

    /// Size along x, y, z.
    #[inline]
    #[must_use]
    pub fn dims(&self) -> [u32; 3] {
        self.dims
    }

    /// Entry at a cell, `None` outside the volume.
    #[inline]
    #[must_use]
    pub fn get(&self, index: VoxelIndex) -> Option<i32> {
        self.offset(index).map(|i| self.data[i])
    }

    /// Overwrites the entry at a cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UncoveredVoxel`] if the cell is outside the volume.
    pub fn set(&mut self, index: VoxelIndex, palette_index: i32) -> MeshResult<()> {
        let offset = self
            .offset(index)
            .ok_or(MeshError::UncoveredVoxel { voxel: index })?;
        self.data[offset] = palette_index;
        Ok(())
    }

    fn offset(&self, index: VoxelIndex) -> Option<usize> {
        let x = u32::try_from(index.x).ok()?;
        let y = u32::try_from(index.y).ok()?;
        let z = u32::try_from(index.z).ok()?;
        let [dx, dy, dz] = self.dims;
        if x >= dx || y >= dy || z >= dz {
            return None;
        }
        // Bounded by the length check at construction.
        Some((x as usize * dy as usize + y as usize) * dz as usize + z as usize)
    }

    fn volume_len(dims: [u32; 3]) -> MeshResult<usize> {
        dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
            .ok_or_else(|| MeshError::InvalidVolume(format!("dims {dims:?} overflow")))
    }

    fn dim_u32(len: usize) -> MeshResult<u32> {
        u32::try_from(len)
            .map_err(|_| MeshError::InvalidVolume(format!("dimension {len} exceeds u32")))
    }
}

impl PaletteIndexVolume for DenseIndexVolume {
    fn palette_index(&self, index: VoxelIndex) -> Option<i32> {
        self.get(index)
    }
}
