//! # VOXVIEW Mesh
//!
//! Turns a palette-indexed voxel grid into cube instances batched by color,
//! ready for a rendering host to draw with one material per batch.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       MESH PIPELINE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  VoxelSource + PaletteIndexVolume + Palette                  │
//! │                      ↓                                       │
//! │            VoxelMeshBuilder::build                           │
//! │                      ↓                                       │
//! │  MeshBuildResult (ColorGroups + bounds) → InstanceBuffer     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading the voxel asset and drawing the result both live in the host.
//!
//! ## Example
//!
//! ```
//! use voxview_mesh::{build, Color, DenseIndexVolume, Palette, VoxelArray, VoxelIndex};
//!
//! let grid = VoxelArray::from_indices(
//!     [0.0; 3],
//!     1.0,
//!     [VoxelIndex::new(0, 0, 0), VoxelIndex::new(1, 0, 0)],
//! )?;
//! let volume = DenseIndexVolume::new([2, 1, 1], vec![0, 1])?;
//! let red = Color::rgb(255, 0, 0);
//! let palette = Palette::new(vec![red, red]);
//!
//! let mesh = build(&grid, &volume, &palette)?;
//! assert_eq!(mesh.groups().len(), 1);
//! assert_eq!(mesh.groups()[0].positions(), &[[0.5, 0.5, 0.5], [1.5, 0.5, 0.5]]);
//! # Ok::<(), voxview_mesh::MeshError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod builder;
pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod instance;
pub mod volume;

pub use builder::{build, BuildStats, ColorGroup, MeshBuildResult, VoxelMeshBuilder};
pub use color::{Color, Palette};
pub use config::{MeshBuildConfig, UpAxis};
pub use error::{MeshError, MeshResult};
pub use grid::{BoundingBox, VoxelArray, VoxelIndex, VoxelSource};
pub use instance::{CubeInstance, DrawBatch, InstanceBuffer};
pub use volume::{DenseIndexVolume, PaletteIndexVolume};
