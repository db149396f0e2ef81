use serde::{Deserialize, Serialize};

/// Name of the material assigned when a model references no material library.
pub const DEFAULT_MATERIAL_NAME: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub ambient_color: [f32; 3],
    pub diffuse_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub specular_exponent: f32,
    pub alpha: f32,
    pub ambient_texture: Option<String>,
    pub diffuse_texture: Option<String>,
    pub normal_texture: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient_color: [1.0, 1.0, 1.0],
            diffuse_color: [1.0, 1.0, 1.0],
            specular_color: [0.0, 0.0, 0.0],
            specular_exponent: 0.0,
            alpha: 1.0,
            ambient_texture: None,
            diffuse_texture: None,
            normal_texture: None,
        }
    }

    pub fn default_named() -> Self {
        Self::new(DEFAULT_MATERIAL_NAME)
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::default_named()
    }
}
