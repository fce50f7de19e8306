//! Builder configuration.
//!
//! Loaded once from TOML; every key is optional.
//!
//! ```toml
//! cube_size = 1.0
//! up_axis = "z"
//! ```

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Which model axis points up in the source data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpAxis {
    /// +Y is up; no correction needed.
    Y,
    /// +Z is up, the `.vox` convention.
    #[default]
    Z,
}

impl UpAxis {
    /// Euler angles (radians, XYZ) that rotate the model root so +Y is up.
    #[must_use]
    pub fn to_y_up_euler(self) -> [f32; 3] {
        match self {
            Self::Y => [0.0, 0.0, 0.0],
            Self::Z => [-FRAC_PI_2, 0.0, 0.0],
        }
    }
}

/// Settings for [`VoxelMeshBuilder`](crate::VoxelMeshBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshBuildConfig {
    /// Edge length of each emitted cube.
    pub cube_size: f32,
    /// Up axis of the source grid.
    pub up_axis: UpAxis,
}

impl Default for MeshBuildConfig {
    fn default() -> Self {
        Self {
            cube_size: 1.0,
            up_axis: UpAxis::default(),
        }
    }
}

impl MeshBuildConfig {
    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] on syntax errors, unknown keys,
    /// or out-of-range values.
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MeshError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if the file cannot be read or
    /// does not hold a valid config.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MeshError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if `cube_size` is not a finite
    /// positive number.
    pub fn validate(&self) -> MeshResult<()> {
        if !self.cube_size.is_finite() || self.cube_size <= 0.0 {
            return Err(MeshError::InvalidConfig(format!(
                "cube_size must be finite and > 0, got {}",
                self.cube_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = MeshBuildConfig::from_toml_str("").unwrap();
        assert_eq!(config, MeshBuildConfig::default());
        assert_eq!(config.up_axis, UpAxis::Z);
    }

    #[test]
    fn test_parse_all_keys() {
        let config = MeshBuildConfig::from_toml_str("cube_size = 0.5\nup_axis = \"y\"\n").unwrap();
        assert_eq!(config.cube_size, 0.5);
        assert_eq!(config.up_axis, UpAxis::Y);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            MeshBuildConfig::from_toml_str("cube_sise = 1.0"),
            Err(MeshError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_cube_size() {
        assert!(MeshBuildConfig::from_toml_str("cube_size = 0.0").is_err());
        assert!(MeshBuildConfig::from_toml_str("cube_size = -2.0").is_err());
        assert!(MeshBuildConfig::from_toml_str("cube_size = nan").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = MeshBuildConfig::from_toml_file("/nonexistent/voxview.toml").unwrap_err();
        assert!(matches!(err, MeshError::InvalidConfig(msg) if msg.contains("voxview.toml")));
    }

    #[test]
    fn test_up_axis_rotation() {
        assert_eq!(UpAxis::Y.to_y_up_euler(), [0.0; 3]);
        assert_eq!(UpAxis::Z.to_y_up_euler()[0], -FRAC_PI_2);
    }
}
