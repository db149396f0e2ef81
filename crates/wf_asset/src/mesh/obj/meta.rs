use serde::Deserialize;
use std::path::Path;

use crate::config::ConfigError;

/// Per-model import options, read from a `.toml` file next to the model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjMeta {
    pub flip_axis: [bool; 3],
    /// fill in flat normals for face corners that reference none
    pub calculate_normals: bool,
    /// synthesize tangents for every textured mesh, not only for normal mapped materials
    pub calculate_tangents: bool,
}

impl ObjMeta {
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path)?;
        Ok(Self::from_slice(&data)?)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, toml::de::Error> {
        toml::from_slice(data)
    }
}
