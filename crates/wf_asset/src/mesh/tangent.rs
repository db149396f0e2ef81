use gfx_maths::*;
use log::{debug, warn};
use wf_format::{FormatError, Mesh};

/// UV triangles whose determinant is smaller than this are treated as degenerate.
pub const TANGENT_EPSILON: f32 = 1e-7;

/// calculates per-corner tangents of the mesh
// for each triangle:
// - e1 = p1 - p0, e2 = p2 - p0
// - duv1 = t1 - t0, duv2 = t2 - t0
// - tangent = (duv2.y * e1 - duv1.y * e2) / (duv1.x * duv2.y - duv2.x * duv1.y)
// the tangent is written to the three corners of the triangle; corners are never shared
// between triangles, so nothing is averaged
//
// Returns the number of triangles that were skipped because of degenerate texture coordinates,
// their corners keep a zero tangent. Meshes whose attributes don't line up are rejected.
pub fn calculate_tangents(mesh: &mut Mesh) -> Result<usize, FormatError> {
    mesh.validate()?;
    if !mesh.has_texcoords() {
        debug!("Mesh `{}` has no texture coordinates, skipping tangents", mesh.name);
        return Ok(0);
    }

    let mut tangents = vec![[0.0; 3]; mesh.vertex_count()];
    let mut degenerate = 0;

    for triangle in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );

        match triangle_tangent(
            [mesh.vertices[i0], mesh.vertices[i1], mesh.vertices[i2]],
            [mesh.texcoords[i0], mesh.texcoords[i1], mesh.texcoords[i2]],
        ) {
            Some(tangent) => {
                tangents[i0] = tangent;
                tangents[i1] = tangent;
                tangents[i2] = tangent;
            }
            None => degenerate += 1,
        }
    }

    if degenerate > 0 {
        warn!(
            "Mesh `{}` has {} triangles with degenerate texture coordinates, their tangents are zero",
            mesh.name, degenerate
        );
    }

    mesh.tangents = tangents;
    Ok(degenerate)
}

fn triangle_tangent(positions: [[f32; 3]; 3], uvs: [[f32; 2]; 3]) -> Option<[f32; 3]> {
    let (p0, p1, p2): (Vec3, Vec3, Vec3) = (positions[0].into(), positions[1].into(), positions[2].into());
    let e1: Vec3 = &p1 - &p0;
    let e2: Vec3 = &p2 - &p0;

    let duv1 = [uvs[1][0] - uvs[0][0], uvs[1][1] - uvs[0][1]];
    let duv2 = [uvs[2][0] - uvs[0][0], uvs[2][1] - uvs[0][1]];

    let denom = duv1[0] * duv2[1] - duv2[0] * duv1[1];
    if denom.abs() < TANGENT_EPSILON {
        return None;
    }

    let f = 1.0 / denom;
    Some([
        f * (duv2[1] * e1.x - duv1[1] * e2.x),
        f * (duv2[1] * e1.y - duv1[1] * e2.y),
        f * (duv2[1] * e1.z - duv1[1] * e2.z),
    ])
}
