use crate::error::{FormatError, Result};
use serde::{Deserialize, Serialize};

/// Opaque slot for whatever a renderer allocates for a mesh (vertex array, buffer id, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// A flattened submesh. Every face corner owns its own vertex, so all attribute
/// arrays run in parallel and `indices` count up from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// empty if the faces of this mesh carry no texture coordinates
    pub texcoords: Vec<[f32; 2]>,
    /// empty until tangents are synthesized
    pub tangents: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub material_name: Option<String>,
    #[serde(skip)]
    pub render_handle: Option<RenderHandle>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    /// Checks that the attribute arrays line up and that every index points at a vertex.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertex_count();

        self.check_attribute("normals", self.normals.len(), false)?;
        self.check_attribute("texcoords", self.texcoords.len(), true)?;
        self.check_attribute("tangents", self.tangents.len(), true)?;

        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(FormatError::IndexOutOfRange {
                mesh: self.name.clone(),
                index,
                count,
            });
        }

        Ok(())
    }

    fn check_attribute(&self, attribute: &'static str, found: usize, optional: bool) -> Result<()> {
        let expected = self.vertex_count();
        if found == expected || (optional && found == 0) {
            return Ok(());
        }

        Err(FormatError::MismatchedAttributes {
            mesh: self.name.clone(),
            attribute,
            expected,
            found,
        })
    }
}
