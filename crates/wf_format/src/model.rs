use crate::error::{FormatError, Result};
use crate::material::Material;
use crate::mesh::Mesh;
use gfx_maths::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: BTreeMap<String, Material>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            materials: BTreeMap::new(),
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Inserts a material under its own name, replacing an earlier one with the same name.
    pub fn insert_material(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.name.clone(), material)
    }

    /// The material a mesh is drawn with, if its reference resolves.
    pub fn mesh_material(&self, mesh: &Mesh) -> Option<&Material> {
        mesh.material_name
            .as_deref()
            .and_then(|name| self.materials.get(name))
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn validate(&self) -> Result<()> {
        for mesh in &self.meshes {
            mesh.validate()?;

            let material = mesh.material_name.as_deref().unwrap_or_default();
            if !self.materials.contains_key(material) {
                return Err(FormatError::UnresolvedMaterial {
                    mesh: mesh.name.clone(),
                    material: material.to_owned(),
                });
            }
        }

        Ok(())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(bincode::deserialize::<Model>(&bytes)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Model::from_bytes(data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self)?)
    }
}
