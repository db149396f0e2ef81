use std::collections::BTreeMap;

use gfx_maths::*;
use log::{debug, warn};
use wf_format::{Material, Mesh, DEFAULT_MATERIAL_NAME};

use super::{face::ObjFace, geometry::ObjGeometry, meta::ObjMeta, parser::ParserError};

/// Corners of the submesh that is currently being filled.
#[derive(Debug, Default)]
pub(crate) struct ObjSubmesh {
    pub(crate) material: Option<String>,
    pub(crate) positions: Vec<[f32; 3]>,
    pub(crate) uvs: Vec<Option<[f32; 2]>>,
    pub(crate) normals: Vec<Option<[f32; 3]>>,
    pub(crate) indices: Vec<u32>,
}

impl ObjSubmesh {
    fn with_material(material: &str) -> Self {
        Self {
            material: Some(material.into()),
            ..Default::default()
        }
    }

    fn push_corner(&mut self, position: [f32; 3], uv: Option<[f32; 2]>, normal: Option<[f32; 3]>) {
        // indices are local to the submesh and every corner gets its own vertex
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
        self.indices.push(index);
    }

    fn into_mesh(self, name: String, calculate_normals: bool) -> Mesh {
        let texcoords = if self.uvs.iter().any(Option::is_some) {
            self.uvs.iter().map(|uv| uv.unwrap_or([0.0, 0.0])).collect()
        } else {
            Vec::new()
        };

        let normals = self
            .normals
            .iter()
            .enumerate()
            .map(|(corner, normal)| match normal {
                Some(normal) => *normal,
                None if calculate_normals => face_normal(&self.positions, corner),
                None => [0.0, 0.0, 0.0],
            })
            .collect();

        Mesh {
            vertices: self.positions,
            normals,
            texcoords,
            indices: self.indices,
            material_name: self.material,
            ..Mesh::new(name)
        }
    }
}

/// flat normal of the triangle a corner belongs to
// corners are pushed three per triangle, so the triangle starts at the corner rounded down to a multiple of three
// - u = v1 - v0
// - v = v2 - v0
// - face_normal = cross(u, v) for counter-clockwise winding
fn face_normal(positions: &[[f32; 3]], corner: usize) -> [f32; 3] {
    let first = corner - corner % 3;
    let (v0, v1, v2): (Vec3, Vec3, Vec3) = (
        positions[first].into(),
        positions[first + 1].into(),
        positions[first + 2].into(),
    );
    let u: Vec3 = &v1 - &v0;
    let v: Vec3 = &v2 - &v0;
    let normal = u.cross(v);

    let length = (normal.x * normal.x + normal.y * normal.y + normal.z * normal.z).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [normal.x / length, normal.y / length, normal.z / length]
}

/// Result of assembling one `.obj` source.
#[derive(Debug)]
pub struct ObjOutput {
    pub meshes: Vec<Mesh>,
    /// first `mtllib` reference of the source, if any
    pub material_library: Option<String>,
    /// holds the synthesized default material when no library was referenced
    pub materials: BTreeMap<String, Material>,
}

#[derive(Debug)]
pub(crate) struct ObjMeshBuilder {
    pub(crate) name: String,
    pub(crate) geometry: ObjGeometry,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) curr_submesh: ObjSubmesh,
    pub(crate) material_library: Option<String>,
    pub(crate) meta: ObjMeta,
}

impl ObjMeshBuilder {
    pub(crate) fn new(name: &str, meta: ObjMeta) -> Self {
        Self {
            name: name.into(),
            geometry: ObjGeometry::default(),
            meshes: Vec::new(),
            curr_submesh: ObjSubmesh::default(),
            material_library: None,
            meta,
        }
    }

    pub(crate) fn push_vertex(&mut self, mut position: [f32; 3]) {
        // invert vertex if necessary
        for n in 0..3 {
            if self.meta.flip_axis[n] {
                position[n] = -position[n];
            }
        }

        self.geometry.positions.push(position);
    }

    pub(crate) fn push_uv(&mut self, uv: [f32; 2]) {
        self.geometry.uvs.push(uv);
    }

    pub(crate) fn push_normal(&mut self, mut normal: [f32; 3]) {
        // invert normals if necessary
        for n in 0..3 {
            if self.meta.flip_axis[n] {
                normal[n] = -normal[n];
            }
        }

        self.geometry.normals.push(normal);
    }

    /// Every `usemtl` after the first one opens a new submesh, even when it names the same material.
    pub(crate) fn use_material(&mut self, material: &str) {
        if self.curr_submesh.material.is_none() {
            self.curr_submesh.material = Some(material.into());
            return;
        }

        let finished = std::mem::replace(&mut self.curr_submesh, ObjSubmesh::with_material(material));
        self.finish_submesh(finished);
    }

    pub(crate) fn set_material_library(&mut self, library: &str) {
        match &self.material_library {
            None => self.material_library = Some(library.into()),
            Some(first) => warn!(
                "There is more than one .mtl file. Keeping \"{}\", ignoring \"{}\".",
                first, library
            ),
        }
    }

    pub(crate) fn push_face(&mut self, face: &ObjFace) -> Result<(), ParserError> {
        for triangle in face.triangles() {
            for corner in triangle {
                let position = self.geometry.position(corner.vert_i)?;
                let uv = corner.uv_i.map(|i| self.geometry.uv(i)).transpose()?;
                let normal = corner.normal_i.map(|i| self.geometry.normal(i)).transpose()?;

                self.curr_submesh.push_corner(position, uv, normal);
            }
        }

        Ok(())
    }

    fn finish_submesh(&mut self, submesh: ObjSubmesh) {
        if submesh.indices.is_empty() {
            debug!("Dropping submesh without faces (material: {:?})", submesh.material);
            return;
        }

        let name = format!("{}_{}", self.name, self.meshes.len());
        let mesh = submesh.into_mesh(name, self.meta.calculate_normals);
        self.meshes.push(mesh);
    }

    pub(crate) fn build(mut self) -> ObjOutput {
        let last = std::mem::take(&mut self.curr_submesh);
        self.finish_submesh(last); // push the last submesh

        let mut materials = BTreeMap::new();
        if self.material_library.is_none() {
            for mesh in &mut self.meshes {
                mesh.material_name = Some(DEFAULT_MATERIAL_NAME.into());
            }
            materials.insert(DEFAULT_MATERIAL_NAME.to_owned(), Material::default_named());
        }

        ObjOutput {
            meshes: self.meshes,
            material_library: self.material_library,
            materials,
        }
    }
}
