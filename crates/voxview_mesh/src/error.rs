//! # Mesh Error Types
//!
//! All errors that can occur while describing or building a voxel mesh.
//! Build errors abort the whole call; no partial result is ever returned.

use thiserror::Error;

use crate::grid::VoxelIndex;

/// Errors that can occur in the mesh builder and its inputs.
///
/// [`build`](crate::build) fails with exactly three variants:
/// [`IndexOutOfRange`](Self::IndexOutOfRange),
/// [`EmptyPaletteForNonEmptyGrid`](Self::EmptyPaletteForNonEmptyGrid) and
/// [`UncoveredVoxel`](Self::UncoveredVoxel). The last one reports a volume
/// that does not cover every occupied voxel; match it alongside the other
/// two. The remaining variants come from constructing inputs or config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// An occupied voxel references a palette slot outside the palette.
    #[error("palette index {palette_index} at voxel {voxel} is out of range (palette has {palette_len} colors)")]
    IndexOutOfRange {
        /// The voxel whose lookup failed.
        voxel: VoxelIndex,
        /// The palette index stored for that voxel.
        palette_index: i32,
        /// Number of colors in the palette.
        palette_len: usize,
    },

    /// The grid has occupied voxels but the palette has no colors.
    #[error("palette is empty but the grid has {voxel_count} occupied voxels")]
    EmptyPaletteForNonEmptyGrid {
        /// Number of occupied voxels in the grid.
        voxel_count: usize,
    },

    /// The palette-index volume has no entry for an occupied voxel.
    #[error("palette-index volume does not cover voxel {voxel}")]
    UncoveredVoxel {
        /// The occupied voxel outside the volume.
        voxel: VoxelIndex,
    },

    /// A palette-index volume could not be constructed.
    #[error("invalid palette-index volume: {0}")]
    InvalidVolume(String),

    /// A voxel grid could not be constructed.
    #[error("invalid voxel grid: {0}")]
    InvalidGrid(String),

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
