//! # Voxel Mesh Builder
//!
//! Single pass over the occupied cells of a grid. Each cell resolves to a
//! color through the palette-index volume and the palette, and its position
//! is appended to that color's group. One group per distinct color means one
//! material per group on the rendering side.
//!
//! ```text
//! VoxelIndex ─→ PaletteIndexVolume ─→ i32 ─→ Palette ─→ Color ─┐
//!     │                                                       ├─→ ColorGroup
//!     └──────────→ VoxelSource::spatial_location ─→ [f32; 3] ─┘
//! ```
//!
//! Groups appear in first-occurrence order, so identical input always
//! produces identical output.

use std::collections::HashMap;

use crate::color::{Color, Palette};
use crate::config::{MeshBuildConfig, UpAxis};
use crate::error::{MeshError, MeshResult};
use crate::grid::{BoundingBox, VoxelSource};
use crate::instance::{CubeInstance, DrawBatch, InstanceBuffer};
use crate::volume::PaletteIndexVolume;

/// All voxels sharing one resolved color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGroup {
    color: Color,
    positions: Vec<[f32; 3]>,
}

impl ColorGroup {
    fn new(color: Color) -> Self {
        Self { color, positions: Vec::new() }
    }

    /// The group's color.
    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Voxel positions in visit order.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Number of voxels in the group.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false for groups produced by a build.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// One cube instance per voxel.
    pub fn instances(&self, cube_size: f32) -> impl Iterator<Item = CubeInstance> + '_ {
        self.positions
            .iter()
            .map(move |&p| CubeInstance::new(p, cube_size, self.color))
    }
}

/// Summary counts of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Voxels across all groups.
    pub voxel_count: usize,
    /// Distinct colors.
    pub group_count: usize,
    /// Voxels in the largest group.
    pub largest_group: usize,
}

/// Output of one build: color groups plus the source grid's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuildResult {
    groups: Vec<ColorGroup>,
    bounds: BoundingBox,
    cube_size: f32,
    up_axis: UpAxis,
}

impl MeshBuildResult {
    /// Color groups in first-occurrence order.
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[ColorGroup] {
        &self.groups
    }

    /// Bounding box of the source grid, unchanged.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Cube edge length the host should instance with.
    #[inline]
    #[must_use]
    pub fn cube_size(&self) -> f32 {
        self.cube_size
    }

    /// Up axis of the source grid.
    #[inline]
    #[must_use]
    pub fn up_axis(&self) -> UpAxis {
        self.up_axis
    }

    /// Pivot for the model root: the bounds center in x and y, zero in z.
    ///
    /// Applied before [`UpAxis::to_y_up_euler`], it centers the model over
    /// the origin horizontally while keeping its base on the ground plane.
    #[must_use]
    pub fn model_pivot(&self) -> [f32; 3] {
        let [x, y, _] = self.bounds.center();
        [x, y, 0.0]
    }

    /// Total voxels across all groups.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.groups.iter().map(ColorGroup::len).sum()
    }

    /// True if the source grid had no occupied voxels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group holding a color, if any voxel resolved to it.
    #[must_use]
    pub fn group_for(&self, color: Color) -> Option<&ColorGroup> {
        self.groups.iter().find(|g| g.color == color)
    }

    /// Summary counts.
    #[must_use]
    pub fn stats(&self) -> BuildStats {
        BuildStats {
            voxel_count: self.voxel_count(),
            group_count: self.groups.len(),
            largest_group: self.groups.iter().map(ColorGroup::len).max().unwrap_or(0),
        }
    }

    /// Flattens the groups into one instance buffer with a draw batch per
    /// group. Batches tile the buffer in group order.
    ///
    /// Draw ranges are `u32`, the width of GPU instance indices. Counts past
    /// `u32::MAX` saturate; split such models before instancing.
    #[must_use]
    pub fn instance_buffer(&self) -> InstanceBuffer {
        let mut instances = Vec::with_capacity(self.voxel_count());
        let mut batches = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            let first_instance = instance_index(instances.len());
            instances.extend(group.instances(self.cube_size));
            batches.push(DrawBatch {
                color: group.color,
                first_instance,
                instance_count: instance_index(group.len()),
            });
        }

        InstanceBuffer { instances, batches }
    }

    /// Moves the groups out.
    #[must_use]
    pub fn into_groups(self) -> Vec<ColorGroup> {
        self.groups
    }
}

fn instance_index(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Converts voxel grids into color-grouped cube instances.
#[derive(Debug, Clone, Default)]
pub struct VoxelMeshBuilder {
    config: MeshBuildConfig,
}

impl VoxelMeshBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if the config fails validation.
    pub fn new(config: MeshBuildConfig) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Groups every occupied voxel of `grid` by its resolved color.
    ///
    /// # Errors
    ///
    /// - [`MeshError::EmptyPaletteForNonEmptyGrid`] if `palette` is empty and
    ///   `grid` is not.
    /// - [`MeshError::UncoveredVoxel`] if `volume` has no entry for an
    ///   occupied voxel.
    /// - [`MeshError::IndexOutOfRange`] if an entry is negative or past the
    ///   end of `palette`.
    pub fn build<G, V>(&self, grid: &G, volume: &V, palette: &Palette) -> MeshResult<MeshBuildResult>
    where
        G: VoxelSource + ?Sized,
        V: PaletteIndexVolume + ?Sized,
    {
        let voxels = grid.voxel_indices();
        if !voxels.is_empty() && palette.is_empty() {
            return Err(MeshError::EmptyPaletteForNonEmptyGrid { voxel_count: voxels.len() });
        }

        let mut slots: HashMap<Color, usize> = HashMap::new();
        let mut groups: Vec<ColorGroup> = Vec::new();

        for &voxel in voxels {
            let palette_index = volume
                .palette_index(voxel)
                .ok_or(MeshError::UncoveredVoxel { voxel })?;
            let color = palette.get(palette_index).ok_or(MeshError::IndexOutOfRange {
                voxel,
                palette_index,
                palette_len: palette.len(),
            })?;
            let position = grid.spatial_location(voxel);

            let slot = *slots.entry(color).or_insert_with(|| {
                tracing::trace!(?color, palette_index, "new color group");
                groups.push(ColorGroup::new(color));
                groups.len() - 1
            });
            groups[slot].positions.push(position);
        }

        tracing::debug!(
            voxels = voxels.len(),
            groups = groups.len(),
            "built voxel mesh"
        );

        Ok(MeshBuildResult {
            groups,
            bounds: grid.bounding_box(),
            cube_size: self.config.cube_size,
            up_axis: self.config.up_axis,
        })
    }
}

/// Builds with the default configuration.
///
/// # Errors
///
/// Same as [`VoxelMeshBuilder::build`].
pub fn build<G, V>(grid: &G, volume: &V, palette: &Palette) -> MeshResult<MeshBuildResult>
where
    G: VoxelSource + ?Sized,
    V: PaletteIndexVolume + ?Sized,
{
    VoxelMeshBuilder::default().build(grid, volume, palette)
}
