//! Sparse voxel grids.
//!
//! A grid is the set of occupied cells plus the mapping from cell index to
//! model space. [`VoxelSource`] is what the builder consumes; [`VoxelArray`]
//! is the in-crate implementation used when the host does not bring its own.
//!
//! ## Coordinate Mapping
//!
//! ```text
//! position(i) = origin + (i + 0.5) * spacing     (cell center)
//! bounds.min  = origin + min(i) * spacing
//! bounds.max  = origin + (max(i) + 1) * spacing
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::error::{MeshError, MeshResult};

/// Integer cell coordinate in a voxel grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelIndex {
    /// X cell.
    pub x: i32,
    /// Y cell.
    pub y: i32,
    /// Z cell.
    pub z: i32,
}

impl VoxelIndex {
    /// Creates a new index.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn component_min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn component_max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Creates a box from its corners.
    #[inline]
    #[must_use]
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Zero-size box collapsed onto a single point.
    #[inline]
    #[must_use]
    pub const fn degenerate_at(point: [f32; 3]) -> Self {
        Self { min: point, max: point }
    }

    /// True if the box has no volume on every axis.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Size along each axis.
    #[must_use]
    pub fn extents(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        let e = self.extents();
        [
            self.min[0] + e[0] * 0.5,
            self.min[1] + e[1] * 0.5,
            self.min[2] + e[2] * 0.5,
        ]
    }

    /// Length of the min-to-max diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        let [x, y, z] = self.extents();
        (x * x + y * y + z * z).sqrt()
    }
}

/// A sparse voxel grid the mesh builder can read.
///
/// Implementations must list each occupied index once. The enumeration
/// order of [`voxel_indices`](Self::voxel_indices) is the order in which
/// the builder visits voxels.
pub trait VoxelSource {
    /// Occupied cells, each exactly once.
    fn voxel_indices(&self) -> &[VoxelIndex];

    /// Model-space position of a cell.
    fn spatial_location(&self, index: VoxelIndex) -> [f32; 3];

    /// Bounds of all occupied cells. Degenerate for an empty grid.
    fn bounding_box(&self) -> BoundingBox;

    /// Number of occupied cells.
    fn voxel_count(&self) -> usize {
        self.voxel_indices().len()
    }
}

/// Sparse voxel grid with a uniform cell size.
///
/// Supported cell indices are `i32::MIN..i32::MAX` on each axis. A cell at
/// `i32::MAX` has no representable far corner, so its bounding box
/// collapses to zero width on that axis. Positions are `f32`, so cells far
/// from the origin also lose precision well before that limit.
#[derive(Debug, Clone)]
pub struct VoxelArray {
    origin: [f32; 3],
    spacing: f32,
    /// Occupied cells in insertion order.
    indices: Vec<VoxelIndex>,
    occupied: HashSet<VoxelIndex>,
    /// Inclusive index range of occupied cells, `None` while empty.
    extent: Option<(VoxelIndex, VoxelIndex)>,
}

impl VoxelArray {
    /// Creates an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidGrid`] if the origin is not finite or the
    /// spacing is not a finite positive number.
    pub fn new(origin: [f32; 3], spacing: f32) -> MeshResult<Self> {
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(MeshError::InvalidGrid(format!("origin must be finite, got {origin:?}")));
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(MeshError::InvalidGrid(format!(
                "spacing must be finite and > 0, got {spacing}"
            )));
        }

        Ok(Self {
            origin,
            spacing,
            indices: Vec::new(),
            occupied: HashSet::new(),
            extent: None,
        })
    }

    /// Creates a grid from a list of cells. Repeated cells are kept once, at
    /// their first position.
    ///
    /// # Errors
    ///
    /// Same as [`VoxelArray::new`].
    pub fn from_indices<I>(origin: [f32; 3], spacing: f32, indices: I) -> MeshResult<Self>
    where
        I: IntoIterator<Item = VoxelIndex>,
    {
        let mut grid = Self::new(origin, spacing)?;
        for index in indices {
            grid.insert(index);
        }
        Ok(grid)
    }

    /// Marks a cell occupied. Returns false if it already was.
    pub fn insert(&mut self, index: VoxelIndex) -> bool {
        if !self.occupied.insert(index) {
            return false;
        }
        self.indices.push(index);
        self.extent = Some(match self.extent {
            Some((lo, hi)) => (lo.component_min(index), hi.component_max(index)),
            None => (index, index),
        });
        true
    }

    /// True if the cell is occupied.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: VoxelIndex) -> bool {
        self.occupied.contains(&index)
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if no cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Model-space corner of cell (0, 0, 0).
    #[inline]
    #[must_use]
    pub fn origin(&self) -> [f32; 3] {
        self.origin
    }

    /// Edge length of one cell.
    #[inline]
    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Inclusive range of occupied cell indices.
    #[inline]
    #[must_use]
    pub fn index_extent(&self) -> Option<(VoxelIndex, VoxelIndex)> {
        self.extent
    }

    #[allow(clippy::cast_precision_loss)]
    fn corner(&self, x: i32, y: i32, z: i32) -> [f32; 3] {
        [
            self.origin[0] + x as f32 * self.spacing,
            self.origin[1] + y as f32 * self.spacing,
            self.origin[2] + z as f32 * self.spacing,
        ]
    }
}

impl VoxelSource for VoxelArray {
    fn voxel_indices(&self) -> &[VoxelIndex] {
        &self.indices
    }

    fn spatial_location(&self, index: VoxelIndex) -> [f32; 3] {
        let half = self.spacing * 0.5;
        let [x, y, z] = self.corner(index.x, index.y, index.z);
        [x + half, y + half, z + half]
    }

    fn bounding_box(&self) -> BoundingBox {
        match self.extent {
            Some((lo, hi)) => BoundingBox::new(
                self.corner(lo.x, lo.y, lo.z),
                self.corner(hi.x.saturating_add(1), hi.y.saturating_add(1), hi.z.saturating_add(1)),
            ),
            None => BoundingBox::degenerate_at(self.origin),
        }
    }
}
