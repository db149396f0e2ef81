use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Path has no usable file name: {0}")]
    InvalidPath(PathBuf),
}

/// Converter settings, usually read from an `assets.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub models_dir: PathBuf,
    pub textures_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("resources/Models"),
            textures_dir: PathBuf::from("resources"),
            output_dir: None,
        }
    }
}

impl AssetConfig {
    pub fn parse(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path)?;
        Ok(toml::from_slice(&data)?)
    }

    pub fn paths(&self) -> AssetPaths {
        AssetPaths {
            models_dir: self.models_dir.clone(),
            textures_dir: self.textures_dir.clone(),
        }
    }
}

/// Fixed roots every resource path is resolved against.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPaths {
    pub models_dir: PathBuf,
    pub textures_dir: PathBuf,
}

impl AssetPaths {
    pub fn model_path(&self, model: &Path) -> PathBuf {
        self.models_dir.join(model)
    }

    /// Material libraries live next to the model that references them.
    pub fn material_path(&self, model_path: &Path, library: &str) -> PathBuf {
        model_path
            .parent()
            .unwrap_or(&self.models_dir)
            .join(library)
    }

    pub fn texture_path(&self, texture: &str) -> PathBuf {
        self.textures_dir.join(texture)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        AssetConfig::default().paths()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_partial_config() -> Result<(), toml::de::Error> {
        let config: AssetConfig = toml::from_str("textures_dir = \"textures\"")?;

        assert_eq!(config.textures_dir, Path::new("textures"));
        assert_eq!(config.models_dir, Path::new("resources/Models"));
        assert_eq!(config.output_dir, None);
        Ok(())
    }

    #[test]
    fn test_path_convention() {
        let paths = AssetPaths::default();
        let model = paths.model_path(Path::new("house/house.obj"));

        assert_eq!(model, Path::new("resources/Models/house/house.obj"));
        assert_eq!(
            paths.material_path(&model, "house.mtl"),
            Path::new("resources/Models/house/house.mtl")
        );
        assert_eq!(paths.texture_path("brick.JPG"), Path::new("resources/brick.JPG"));
    }
}
